//! Automatic search replies in monitored channels.

mod handler;
mod response;

pub use handler::handle_auto_search;
