//! Infrastructure layer for Roomie.
//!
//! Contains implementations of the ports defined in `roomie-core`: SQLite
//! storage for participants and messages, a REST client that speaks to a
//! remote message store, and the config/data-directory plumbing.

pub mod config;
pub mod rest;
pub mod sqlite;
