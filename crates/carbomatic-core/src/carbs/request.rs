//! Wire body for carb calculation and its resolution into a [`CarbRequest`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{CarbRequest, Intensity, RateStrategy};

/// Errors from turning a request body into a [`CarbRequest`].
#[derive(Debug, Error)]
pub enum CarbError {
    #[error("invalid request body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("missing field {0:?}")]
    MissingField(&'static str),

    #[error("missing rate selector: provide either \"carb_load_days\" or \"intensity_level\"")]
    MissingSelector,

    #[error(
        "ambiguous rate selector: \"carb_load_days\" and \"intensity_level\" select different policies, provide only one"
    )]
    AmbiguousSelector,
}

/// JSON body accepted by the calculator endpoints.
///
/// Every field is optional at the decoding layer so that absence is reported
/// as a [`CarbError`] naming the field rather than a generic decode failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculateCarbsBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    /// Selects [`RateStrategy::ByLoadingDays`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carb_load_days: Option<i64>,
    /// Accepted alongside `intensity_level`; it does not change the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marathon_duration_hours: Option<f64>,
    /// Selects [`RateStrategy::ByIntensity`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity_level: Option<String>,
}

impl CalculateCarbsBody {
    /// Decode a raw JSON body.
    pub fn from_slice(body: &[u8]) -> Result<Self, CarbError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Resolve the body into a validated request with an explicit strategy.
    pub fn into_request(self) -> Result<CarbRequest, CarbError> {
        let weight_kg = self.weight_kg.ok_or(CarbError::MissingField("weight_kg"))?;

        let strategy = match (self.carb_load_days, self.intensity_level) {
            (Some(_), Some(_)) => return Err(CarbError::AmbiguousSelector),
            (Some(loading_days), None) => RateStrategy::ByLoadingDays { loading_days },
            (None, Some(label)) => RateStrategy::ByIntensity {
                intensity: Intensity::from_label(&label),
            },
            (None, None) => return Err(CarbError::MissingSelector),
        };

        Ok(CarbRequest {
            weight_kg,
            strategy,
        })
    }
}

impl CarbRequest {
    /// Decode and resolve a raw JSON body in one step.
    pub fn from_json(body: &[u8]) -> Result<Self, CarbError> {
        CalculateCarbsBody::from_slice(body)?.into_request()
    }
}
