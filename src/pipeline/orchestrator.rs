//! Sequencing of extraction, gathering and synthesis.

use std::time::Duration;

use chrono::TimeDelta;
use log::{debug, info};

use crate::error::Result;
use crate::llm::LanguageModel;
use crate::memory::ConversationStore;
use crate::types::{ConversationTurn, PipelineResult};

use super::{extract_queries, gather_all, synthesize};

pub const NO_QUERY_RESPONSE: &str =
    "I'm not sure what to search for. Could you please be more specific?";

/// Stateless pipeline: every call depends only on its inputs.
pub struct SearchPipeline<M> {
    model: M,
    pacing: Duration,
}

impl<M: LanguageModel> SearchPipeline<M> {
    pub fn new(model: M, pacing: Duration) -> Self {
        Self { model, pacing }
    }

    /// Run one message through the pipeline.
    ///
    /// The caller supplies the context and persists the turn afterwards.
    pub async fn process(&self, message: &str, context: &[ConversationTurn]) -> PipelineResult {
        let queries = extract_queries(&self.model, message, context).await;

        if queries.is_empty() {
            debug!("No search queries extracted, asking for clarification");
            return PipelineResult {
                response: NO_QUERY_RESPONSE.to_string(),
                search_queries: Vec::new(),
                search_results: Vec::new(),
            };
        }

        let results = gather_all(&self.model, &queries, self.pacing).await;
        let failed = results.iter().filter(|r| !r.success).count();
        if failed > 0 {
            debug!("{failed} of {} searches failed", results.len());
        }

        let response = synthesize(&self.model, message, &results, context).await;

        PipelineResult {
            response,
            search_queries: queries,
            search_results: results,
        }
    }
}

/// Size of the context window fetched before each run.
#[derive(Debug, Clone, Copy)]
pub struct ContextLimits {
    pub max_age: TimeDelta,
    pub max_count: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            max_age: TimeDelta::hours(24),
            max_count: 5,
        }
    }
}

/// Pipeline bound to conversation memory: fetches context, runs, records.
pub struct SearchAssistant<M> {
    pipeline: SearchPipeline<M>,
    store: ConversationStore,
    limits: ContextLimits,
}

impl<M: LanguageModel> SearchAssistant<M> {
    pub fn new(
        pipeline: SearchPipeline<M>,
        store: ConversationStore,
        limits: ContextLimits,
    ) -> Self {
        Self {
            pipeline,
            store,
            limits,
        }
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Handle one incoming message from `user_id` in `channel_id`.
    ///
    /// # Errors
    ///
    /// Only storage failures are returned; model failures are folded into the
    /// reply.
    pub async fn handle_message(
        &self,
        user_id: &str,
        channel_id: &str,
        message: &str,
    ) -> Result<PipelineResult> {
        let context = self
            .store
            .recent_context(user_id, channel_id, self.limits.max_age, self.limits.max_count)
            .await?;
        debug!(
            "Loaded {} context turns for user {user_id} in channel {channel_id}",
            context.len()
        );

        let result = self.pipeline.process(message, &context).await;

        let turn = ConversationTurn::new(user_id, channel_id, message)
            .with_response(result.response.clone())
            .with_queries(&result.search_queries);
        self.store.record_turn(turn).await?;

        info!(
            "Answered user {user_id} in channel {channel_id} using {} queries",
            result.search_queries.len()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::ScriptedModel;

    fn pipeline(model: ScriptedModel) -> SearchPipeline<ScriptedModel> {
        SearchPipeline::new(model, Duration::from_millis(500))
    }

    #[tokio::test(start_paused = true)]
    async fn weather_question_end_to_end() {
        let model = ScriptedModel::new([
            Ok("current weather Paris"),
            Ok("Paris today: 21°C, light clouds, 10% chance of rain."),
            Ok("It's about 21°C in Paris today with light clouds, so no umbrella needed."),
        ]);
        let pipeline = pipeline(model);

        let result = pipeline
            .process("What's the weather in Paris today?", &[])
            .await;

        assert!(!result.response.is_empty());
        assert!(result.response.contains("Paris"));
        assert_eq!(result.search_queries, vec!["current weather Paris"]);
        assert_eq!(result.search_results.len(), 1);
        assert!(result.search_results[0].success);
    }

    #[tokio::test(start_paused = true)]
    async fn no_queries_short_circuits() {
        let pipeline = pipeline(ScriptedModel::new([Ok("# nothing useful\n- really")]));

        let result = pipeline.process("hmm, interesting", &[]).await;

        assert_eq!(result.response, NO_QUERY_RESPONSE);
        assert!(result.search_queries.is_empty());
        assert!(result.search_results.is_empty());
        assert_eq!(pipeline.model.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn partial_gather_failure_still_synthesizes() {
        let model = ScriptedModel::new([
            Ok("1. rust 2024 edition\n2. rust let chains"),
            Ok("The 2024 edition shipped with Rust 1.85."),
            Err("rate limited"),
            Ok("Rust 2024 is out."),
        ]);
        let pipeline = pipeline(model);

        let result = pipeline.process("What changed in Rust 2024?", &[]).await;

        assert_eq!(result.response, "Rust 2024 is out.");
        assert_eq!(result.search_results.len(), 2);
        assert!(result.search_results[0].success);
        assert!(!result.search_results[1].success);

        let prompts = pipeline.model.prompts();
        assert_eq!(prompts.len(), 4);
        let synthesis = &prompts[3];
        assert!(synthesis.contains("Search Query 1: rust 2024 edition"));
        assert!(synthesis.contains("shipped with Rust 1.85"));
        assert!(!synthesis.contains("Search Query 2"));
        assert!(!synthesis.contains("rate limited"));
    }

    #[tokio::test(start_paused = true)]
    async fn total_model_outage_degrades_gracefully() {
        let pipeline = pipeline(ScriptedModel::new([
            Err("down"),
            Err("down"),
            Err("still down"),
        ]));

        let result = pipeline.process("tell me about tokio", &[]).await;

        assert_eq!(result.search_queries, vec!["tell me about tokio"]);
        assert!(!result.search_results[0].success);
        assert!(result.response.contains("still down"));
    }

    #[tokio::test]
    async fn assistant_records_turn_and_feeds_it_back() {
        let store = ConversationStore::in_memory().expect("store");
        let model = ScriptedModel::new([
            Ok("best pizza in Naples"),
            Ok("Da Michele is famous."),
            Ok("Try L'Antica Pizzeria da Michele."),
            Ok(""),
        ]);
        let assistant = SearchAssistant::new(
            pipeline(model),
            store.clone(),
            ContextLimits::default(),
        );

        let first = assistant
            .handle_message("u1", "c1", "Where is the best pizza in Naples?")
            .await
            .expect("first message");
        assert_eq!(first.search_queries, vec!["best pizza in Naples"]);

        let second = assistant
            .handle_message("u1", "c1", "and what about pasta?")
            .await
            .expect("second message");
        assert_eq!(second.response, NO_QUERY_RESPONSE);

        let prompts = assistant.pipeline.model.prompts();
        let follow_up_extraction = prompts.last().expect("prompt");
        assert!(follow_up_extraction.contains("User: Where is the best pizza in Naples?"));
        assert!(follow_up_extraction.contains("Bot: Try L'Antica Pizzeria da Michele."));

        let turns = store
            .recent_context("u1", "c1", TimeDelta::hours(1), 10)
            .await
            .expect("context");
        assert_eq!(turns.len(), 2);
        assert_eq!(
            turns[0].search_query.as_deref(),
            Some("best pizza in Naples")
        );
        assert_eq!(turns[1].search_query.as_deref(), Some(""));
        assert_eq!(turns[1].response.as_deref(), Some(NO_QUERY_RESPONSE));
    }
}
