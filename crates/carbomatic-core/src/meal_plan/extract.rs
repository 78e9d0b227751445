//! Pulling a JSON meal plan out of free-text replies.
//!
//! [`BestEffortExtractor`] slices from the first `{` to the last `}` and
//! parses whatever lies between. It fails on replies that contain several
//! top-level objects or stray braces in surrounding prose; a stricter
//! [`PlanExtractor`] can be swapped in on [`super::MealPlanner`] without
//! touching callers.

use serde_json::{Value, json};
use thiserror::Error;

/// Message used when the reply holds no brace-delimited span.
pub const NO_OBJECT_MESSAGE: &str = "Could not parse meal plan";

/// Why a reply could not be turned into a meal plan value.
#[derive(Debug, Error)]
pub enum ExtractionFailure {
    #[error("Could not parse meal plan")]
    NoObject,

    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ExtractionFailure {
    /// Error-shaped meal plan carrying the failure and the untouched reply.
    pub fn into_meal_plan(self, raw_response: &str) -> Value {
        json!({
            "error": self.to_string(),
            "raw_response": raw_response,
        })
    }
}

/// Strategy for turning reply text into a meal plan value.
pub trait PlanExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Result<Value, ExtractionFailure>;
}

/// First-`{`-to-last-`}` extractor. Accepts any JSON shape found in the span.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestEffortExtractor;

impl PlanExtractor for BestEffortExtractor {
    fn extract(&self, text: &str) -> Result<Value, ExtractionFailure> {
        best_effort(text)
    }
}

/// Parse the span between the first `{` and the last `}` of `text`.
///
/// A last `}` that precedes the first `{` yields an empty span, which fails
/// as a decode error.
pub fn best_effort(text: &str) -> Result<Value, ExtractionFailure> {
    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Err(ExtractionFailure::NoObject);
    };

    let span = if end >= start { &text[start..=end] } else { "" };
    Ok(serde_json::from_str(span)?)
}

/// Run `extractor` and fold any failure into the error-shaped meal plan.
pub fn extract_or_describe(extractor: &dyn PlanExtractor, text: &str) -> Value {
    extractor
        .extract(text)
        .unwrap_or_else(|failure| failure.into_meal_plan(text))
}
