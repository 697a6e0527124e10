//! Append-only conversation log.
//!
//! Every resolved exchange is persisted through a bounded background
//! queue; owners can read their own history back, newest first.

pub mod recorder;
pub mod store;
pub mod types;

pub use recorder::ExchangeRecorder;
pub use store::{ConversationStore, SqliteConversationStore};
pub use types::Exchange;
