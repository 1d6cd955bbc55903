//! Message-to-response search pipeline.
//!
//! A message is turned into search queries, each query is resolved into an
//! information blob by the language model, and the blobs are folded into one
//! reply. Model failures never escape this module; storage failures do.

mod extract;
mod gather;
mod orchestrator;
mod prompt;
mod synthesize;

#[cfg(test)]
mod testing;

pub use extract::{FALLBACK_MIN_CHARS, MAX_QUERIES, extract_queries, parse_queries};
pub use gather::{MIN_PACING, gather, gather_all};
pub use orchestrator::{ContextLimits, NO_QUERY_RESPONSE, SearchAssistant, SearchPipeline};
pub use synthesize::{search_info_block, synthesize};
