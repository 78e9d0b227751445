//! `carbomatic calc`: one-shot carb target calculation.

use anyhow::{Context, Result};

use carbomatic_core::carbs::{CalculateCarbsBody, pounds_to_kg};
use carbomatic_core::{CarbResult, calculate};

/// Body weight as given on the command line.
#[derive(Debug, Clone, Copy)]
pub enum Weight {
    Kilograms(f64),
    Pounds(f64),
}

impl Weight {
    pub fn kilograms(self) -> f64 {
        match self {
            Self::Kilograms(kg) => kg,
            Self::Pounds(lbs) => pounds_to_kg(lbs),
        }
    }
}

/// Compute targets through the same body resolution the HTTP endpoint uses.
pub fn compute(weight: Weight, days: Option<i64>, intensity: Option<String>) -> Result<CarbResult> {
    let body = CalculateCarbsBody {
        weight_kg: Some(weight.kilograms()),
        carb_load_days: days,
        intensity_level: intensity,
        ..Default::default()
    };
    let request = body.into_request().context("invalid calculator input")?;
    Ok(calculate(&request))
}

pub fn run_calc(weight: Weight, days: Option<i64>, intensity: Option<String>) -> Result<()> {
    let result = compute(weight, days, intensity)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kilograms_with_days() {
        let result = compute(Weight::Kilograms(70.0), Some(2), None).unwrap();
        assert_eq!(result.daily_carb_grams, 840.0);
        assert_eq!(result.loading_days, 2);
    }

    #[test]
    fn pounds_are_converted_before_calculating() {
        let result = compute(Weight::Pounds(154.0), Some(3), None).unwrap();
        assert_eq!(result.daily_carb_grams, 154.0 * 0.453592 * 8.0);
    }

    #[test]
    fn intensity_selects_fixed_three_day_window() {
        let result = compute(Weight::Kilograms(60.0), None, Some("high".to_string())).unwrap();
        assert_eq!(result.daily_carb_grams, 720.0);
        assert_eq!(result.loading_days, 3);
    }

    #[test]
    fn no_selector_is_an_error() {
        let err = compute(Weight::Kilograms(60.0), None, None).unwrap_err();
        assert!(format!("{err:#}").contains("missing rate selector"));
    }
}
