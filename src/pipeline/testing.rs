//! Scripted language model for pipeline tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{BotError, Result};
use crate::llm::LanguageModel;

/// Replays canned replies in order and records every prompt it receives.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new<'a>(
        replies: impl IntoIterator<Item = std::result::Result<&'a str, &'a str>>,
    ) -> Self {
        Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock").clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().expect("prompts lock").len()
    }
}

impl LanguageModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .expect("prompts lock")
            .push(prompt.to_string());

        let next = self.replies.lock().expect("replies lock").pop_front();
        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(BotError::OpenRouterResponse(message)),
            None => Err(BotError::OpenRouterResponse(
                "no scripted reply left".to_string(),
            )),
        }
    }
}
