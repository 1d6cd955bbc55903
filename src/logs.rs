//! Conversation log retrieval and rendering.

mod format;
mod range;

pub use format::{format_log_entries, paginate};
pub use range::LogRange;
