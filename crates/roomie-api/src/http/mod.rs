//! HTTP/REST API layer for Roomie.
//!
//! Axum-based REST API at `/api/v1/` for the message store, plus the
//! WebSocket room relay at `/ws`. Envelope response format, CORS support.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
