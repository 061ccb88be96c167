//! Business logic and port definitions for Roomie messaging.
//!
//! This crate defines the "ports" (repository, store and transport traits)
//! that the infrastructure layer implements, together with the two pieces
//! of real coordination in the system: the room relay and the chat session
//! manager. It depends only on `roomie-types` -- never on `roomie-infra` or
//! any database/IO crate.

pub mod chat;
pub mod relay;
pub mod repository;
pub mod service;
pub mod store;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;
