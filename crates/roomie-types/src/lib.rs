//! Shared domain types for Roomie messaging.
//!
//! This crate contains the domain types used across the messaging subsystem:
//! participants, rooms, messages, relay events, conversation summaries,
//! configuration and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod message;
pub mod participant;
pub mod room;
pub mod wire;
