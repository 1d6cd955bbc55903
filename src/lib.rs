pub mod autosearch;
pub mod bot;
pub mod channels;
pub mod commands;
pub mod config;
pub mod error;
pub mod llm;
pub mod logs;
pub mod memory;
pub mod openrouter;
pub mod pipeline;
pub mod text;
pub mod types;

pub use bot::run;
