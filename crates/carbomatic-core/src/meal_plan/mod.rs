//! Meal plan drafting: prompt construction, generation, and extraction.
//!
//! [`MealPlanner`] is the service entry point. It owns an injected
//! [`TextGenerator`] and a [`PlanExtractor`], and never fails because of what
//! the generated text says; only configuration and transport problems are
//! surfaced as [`MealPlanError`].

pub mod extract;
pub mod prompt;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::llm::{LlmError, TextGenerator};

pub use extract::{BestEffortExtractor, ExtractionFailure, PlanExtractor, best_effort};
pub use prompt::build_prompt;

/// Output budget for a generated plan, in tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Errors that prevent a meal plan from being produced at all.
#[derive(Debug, Error)]
pub enum MealPlanError {
    #[error("invalid request body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Generation(#[from] LlmError),
}

/// Input to the meal planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanRequest {
    pub daily_carb_grams: f64,
    pub days: i64,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub meal_preferences: Vec<String>,
}

impl MealPlanRequest {
    /// Decode a raw JSON body.
    pub fn from_json(body: &[u8]) -> Result<Self, MealPlanError> {
        Ok(serde_json::from_slice(body)?)
    }
}

/// Planner output: the extracted plan, or the error-shaped fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanResult {
    pub meal_plan: Value,
}

/// Drafts meal plans through an injected [`TextGenerator`].
pub struct MealPlanner {
    generator: Arc<dyn TextGenerator>,
    extractor: Box<dyn PlanExtractor>,
    max_tokens: u32,
}

impl MealPlanner {
    /// Planner using the best-effort extractor and the default token budget.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            extractor: Box::new(BestEffortExtractor),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_extractor(mut self, extractor: impl PlanExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Prompt the generator and extract a plan from its reply.
    ///
    /// Unparseable replies come back as `Ok` with an error-shaped
    /// `meal_plan`; see [`ExtractionFailure::into_meal_plan`].
    #[instrument(skip_all, fields(generator = self.generator.name(), days = request.days))]
    pub async fn plan(&self, request: &MealPlanRequest) -> Result<MealPlanResult, MealPlanError> {
        let prompt = build_prompt(request);
        let text = self.generator.generate(&prompt, self.max_tokens).await?;

        let meal_plan = match self.extractor.extract(&text) {
            Ok(plan) => {
                info!("meal plan extracted");
                plan
            }
            Err(failure) => {
                warn!(error = %failure, "reply did not contain a usable meal plan");
                failure.into_meal_plan(&text)
            }
        };

        Ok(MealPlanResult { meal_plan })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;

    /// Returns a fixed reply and remembers what it was asked.
    struct CannedGenerator {
        reply: Result<String, u16>,
        seen: Mutex<Vec<(String, u32)>>,
    }

    impl CannedGenerator {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(status),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
            self.seen
                .lock()
                .unwrap()
                .push((prompt.to_string(), max_tokens));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Status {
                    status: *status,
                    body: "overloaded".to_string(),
                }),
            }
        }
    }

    fn request() -> MealPlanRequest {
        MealPlanRequest {
            daily_carb_grams: 560.0,
            days: 3,
            dietary_restrictions: vec!["vegan".to_string()],
            meal_preferences: vec![],
        }
    }

    #[tokio::test]
    async fn well_formed_reply_is_returned_as_plan() {
        let generator = CannedGenerator::replying(r#"Sure! {"day_1": {"total_carbs": 560}}"#);
        let planner = MealPlanner::new(generator.clone());

        let result = planner.plan(&request()).await.unwrap();
        assert_eq!(result.meal_plan, json!({"day_1": {"total_carbs": 560}}));

        let seen = generator.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].0.contains("Dietary restrictions: vegan. "));
        assert_eq!(seen[0].1, DEFAULT_MAX_TOKENS);
    }

    #[tokio::test]
    async fn unparseable_reply_is_not_an_error() {
        let planner = MealPlanner::new(CannedGenerator::replying("no plan today"));
        let result = planner.plan(&request()).await.unwrap();
        assert_eq!(result.meal_plan["error"], "Could not parse meal plan");
        assert_eq!(result.meal_plan["raw_response"], "no plan today");
    }

    #[tokio::test]
    async fn generator_failure_propagates() {
        let planner = MealPlanner::new(CannedGenerator::failing(529));
        let err = planner.plan(&request()).await.unwrap_err();
        assert!(matches!(
            err,
            MealPlanError::Generation(LlmError::Status { status: 529, .. })
        ));
    }

    #[tokio::test]
    async fn token_budget_is_forwarded() {
        let generator = CannedGenerator::replying("{}");
        let planner = MealPlanner::new(generator.clone()).with_max_tokens(512);
        planner.plan(&request()).await.unwrap();
        assert_eq!(generator.seen.lock().unwrap()[0].1, 512);
    }

    #[tokio::test]
    async fn custom_extractor_replaces_best_effort() {
        struct WholeText;
        impl PlanExtractor for WholeText {
            fn extract(&self, text: &str) -> Result<Value, ExtractionFailure> {
                Ok(serde_json::from_str(text)?)
            }
        }

        let planner = MealPlanner::new(CannedGenerator::replying(r#"x {"a": 1}"#))
            .with_extractor(WholeText);
        let result = planner.plan(&request()).await.unwrap();
        let error = result.meal_plan["error"].as_str().unwrap();
        assert!(error.starts_with("JSON decode error:"));
    }

    #[test]
    fn request_lists_default_to_empty() {
        let req = MealPlanRequest::from_json(br#"{"daily_carb_grams": 840, "days": 2}"#).unwrap();
        assert!(req.dietary_restrictions.is_empty());
        assert!(req.meal_preferences.is_empty());
    }

    #[test]
    fn request_without_days_is_rejected() {
        let err = MealPlanRequest::from_json(br#"{"daily_carb_grams": 840}"#).unwrap_err();
        assert!(err.to_string().contains("days"));
    }
}
