//! REST adapter for a remote message store.

pub mod client;

pub use client::HttpMessageStore;
