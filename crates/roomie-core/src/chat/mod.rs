//! Client-side chat: the session manager plus the pure helpers it uses to
//! label timestamps and summarise conversations.

pub mod conversation;
pub mod display;
pub mod session;

pub use session::{ChatSession, HistoryRequest};
