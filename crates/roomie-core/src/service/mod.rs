//! Services layering validation over the repository ports.

pub mod message;
