//! `carbomatic meal-plan`: one-shot meal plan drafting.

use std::sync::Arc;

use anyhow::{Context, Result};

use carbomatic_core::llm::anthropic::API_KEY_ENV;
use carbomatic_core::llm::{AnthropicClient, LlmError};
use carbomatic_core::{MealPlanRequest, MealPlanner};

use crate::config::CarbomaticConfig;

/// Build a planner from resolved configuration, failing fast without a key.
pub fn planner_from_config(config: &CarbomaticConfig) -> Result<MealPlanner> {
    let anthropic = config.anthropic.clone().ok_or(LlmError::MissingCredential {
        env_var: API_KEY_ENV,
    })?;
    let client = AnthropicClient::new(anthropic);
    Ok(MealPlanner::new(Arc::new(client)).with_max_tokens(config.max_tokens))
}

pub async fn run_meal_plan(config: &CarbomaticConfig, request: MealPlanRequest) -> Result<()> {
    let planner = planner_from_config(config)?;
    let result = planner
        .plan(&request)
        .await
        .context("Error generating meal plan")?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_fails_before_any_request() {
        let config = CarbomaticConfig {
            bind: CarbomaticConfig::DEFAULT_BIND.to_string(),
            port: CarbomaticConfig::DEFAULT_PORT,
            anthropic: None,
            max_tokens: 2000,
        };
        let err = planner_from_config(&config).err().expect("should fail");
        assert_eq!(
            err.to_string(),
            "ANTHROPIC_API_KEY not found in environment variables"
        );
    }

    #[test]
    fn configured_token_budget_is_applied() {
        let config = CarbomaticConfig {
            bind: CarbomaticConfig::DEFAULT_BIND.to_string(),
            port: CarbomaticConfig::DEFAULT_PORT,
            anthropic: Some(carbomatic_core::llm::AnthropicConfig::new("k")),
            max_tokens: 750,
        };
        let planner = planner_from_config(&config).unwrap();
        assert_eq!(planner.max_tokens(), 750);
    }
}
