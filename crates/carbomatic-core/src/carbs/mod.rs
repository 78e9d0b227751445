//! Carb target calculator.
//!
//! Maps a body weight and a [`RateStrategy`] to daily and total carbohydrate
//! targets. This module contains pure logic (no I/O).
//!
//! # Rate policies
//!
//! Two rate policies exist and they disagree:
//!
//! | Strategy | Selector | g/kg/day | Loading days |
//! |---|---|---|---|
//! | [`RateStrategy::ByLoadingDays`] | `carb_load_days` | 12 for 2 days, 8 otherwise | echoed from input |
//! | [`RateStrategy::ByIntensity`] | `intensity_level` | 12 for `"high"`, 10 otherwise | always 3 |
//!
//! Neither is treated as canonical. Callers pick one explicitly, and
//! [`CalculateCarbsBody`] refuses bodies that carry both selectors.

pub mod request;

use serde::{Deserialize, Serialize};

pub use request::{CalculateCarbsBody, CarbError};

/// Pounds to kilograms, as used by the calculator front end.
pub const KG_PER_LB: f64 = 0.453592;

/// Loading window used by the intensity-based policy, whatever the input.
pub const INTENSITY_LOADING_DAYS: i64 = 3;

/// Convert a body weight in pounds to kilograms.
pub fn pounds_to_kg(lbs: f64) -> f64 {
    lbs * KG_PER_LB
}

/// Athlete-reported effort level for the intensity-based policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intensity {
    /// The exact label `"high"`.
    High,
    /// Any other label, kept verbatim for logging.
    Standard(String),
}

impl Intensity {
    /// Classify a raw label. Only the exact, lowercase `"high"` counts as high.
    pub fn from_label(label: &str) -> Self {
        if label == "high" {
            Self::High
        } else {
            Self::Standard(label.to_string())
        }
    }
}

/// How the per-kilogram carbohydrate rate is chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum RateStrategy {
    /// Duration-based: 2 days at 12 g/kg, anything else at 8 g/kg.
    ///
    /// Values outside `{2, 3}` are not rejected; they take the 8 g/kg branch
    /// and are echoed back as the loading window.
    ByLoadingDays { loading_days: i64 },
    /// Intensity-based: 12 g/kg for high intensity, 10 g/kg otherwise, over a
    /// fixed 3-day window.
    ByIntensity { intensity: Intensity },
}

impl RateStrategy {
    /// Grams of carbohydrate per kilogram of body weight per day.
    pub fn grams_per_kg(&self) -> f64 {
        match self {
            Self::ByLoadingDays { loading_days: 2 } => 12.0,
            Self::ByLoadingDays { .. } => 8.0,
            Self::ByIntensity {
                intensity: Intensity::High,
            } => 12.0,
            Self::ByIntensity { .. } => 10.0,
        }
    }

    /// Number of days the daily target is held for.
    pub fn loading_days(&self) -> i64 {
        match self {
            Self::ByLoadingDays { loading_days } => *loading_days,
            Self::ByIntensity { .. } => INTENSITY_LOADING_DAYS,
        }
    }
}

/// Validated calculator input.
#[derive(Debug, Clone, PartialEq)]
pub struct CarbRequest {
    pub weight_kg: f64,
    pub strategy: RateStrategy,
}

/// Calculator output. Values are not rounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarbResult {
    pub daily_carb_grams: f64,
    pub total_carb_grams: f64,
    pub loading_days: i64,
}

/// Compute carbohydrate targets for a validated request.
pub fn calculate(request: &CarbRequest) -> CarbResult {
    let daily_carb_grams = request.weight_kg * request.strategy.grams_per_kg();
    let loading_days = request.strategy.loading_days();
    CarbResult {
        daily_carb_grams,
        total_carb_grams: daily_carb_grams * loading_days as f64,
        loading_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_days(weight_kg: f64, loading_days: i64) -> CarbResult {
        calculate(&CarbRequest {
            weight_kg,
            strategy: RateStrategy::ByLoadingDays { loading_days },
        })
    }

    fn by_intensity(weight_kg: f64, label: &str) -> CarbResult {
        calculate(&CarbRequest {
            weight_kg,
            strategy: RateStrategy::ByIntensity {
                intensity: Intensity::from_label(label),
            },
        })
    }

    #[test]
    fn two_day_load_uses_twelve_grams_per_kg() {
        let result = by_days(70.0, 2);
        assert_eq!(result.daily_carb_grams, 840.0);
        assert_eq!(result.total_carb_grams, 1680.0);
        assert_eq!(result.loading_days, 2);
    }

    #[test]
    fn three_day_load_uses_eight_grams_per_kg() {
        let result = by_days(70.0, 3);
        assert_eq!(result.daily_carb_grams, 560.0);
        assert_eq!(result.total_carb_grams, 1680.0);
        assert_eq!(result.loading_days, 3);
    }

    #[test]
    fn out_of_domain_days_fall_to_eight_grams_per_kg() {
        for days in [0, 1, 4, 7, -1] {
            let result = by_days(50.0, days);
            assert_eq!(result.daily_carb_grams, 400.0, "days = {days}");
            assert_eq!(result.loading_days, days);
            assert_eq!(result.total_carb_grams, 400.0 * days as f64);
        }
    }

    #[test]
    fn high_intensity_uses_twelve_grams_over_three_days() {
        let result = by_intensity(60.0, "high");
        assert_eq!(result.daily_carb_grams, 720.0);
        assert_eq!(result.total_carb_grams, 2160.0);
        assert_eq!(result.loading_days, 3);
    }

    #[test]
    fn other_intensity_labels_use_ten_grams_per_kg() {
        for label in ["moderate", "low", "High", ""] {
            let result = by_intensity(60.0, label);
            assert_eq!(result.daily_carb_grams, 600.0, "label = {label:?}");
            assert_eq!(result.loading_days, 3);
        }
    }

    #[test]
    fn results_are_not_rounded() {
        let result = by_days(61.3, 2);
        assert_eq!(result.daily_carb_grams, 61.3 * 12.0);
        assert_eq!(result.total_carb_grams, 61.3 * 12.0 * 2.0);
    }

    #[test]
    fn calculation_is_deterministic() {
        let request = CarbRequest {
            weight_kg: 72.5,
            strategy: RateStrategy::ByLoadingDays { loading_days: 3 },
        };
        assert_eq!(calculate(&request), calculate(&request));
    }

    #[test]
    fn daily_and_total_follow_the_rate_formula() {
        for weight in [40.0, 55.5, 70.0, 82.25, 120.0] {
            for days in [2, 3] {
                let result = by_days(weight, days);
                let rate = if days == 2 { 12.0 } else { 8.0 };
                assert_eq!(result.daily_carb_grams, weight * rate);
                assert_eq!(result.total_carb_grams, weight * rate * days as f64);
            }
        }
    }

    #[test]
    fn pounds_convert_with_front_end_factor() {
        assert_eq!(pounds_to_kg(154.0), 154.0 * 0.453592);
        assert!((pounds_to_kg(154.0) - 69.853).abs() < 0.001);
    }

    #[test]
    fn intensity_label_is_case_sensitive() {
        assert_eq!(Intensity::from_label("high"), Intensity::High);
        assert_eq!(
            Intensity::from_label("HIGH"),
            Intensity::Standard("HIGH".to_string())
        );
    }
}
