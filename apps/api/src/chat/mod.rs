//! General-purpose chat backed by one shared conversation.

pub mod handlers;
pub mod session;

pub use session::ChatSession;
