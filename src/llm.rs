//! The text-completion capability the search pipeline is built on.

use std::future::Future;

use crate::error::Result;

/// A black-box text-completion service.
///
/// Every failure mode (network, quota, malformed payload) surfaces as an
/// `Err`; callers treat them all the same way.
pub trait LanguageModel: Send + Sync {
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}
