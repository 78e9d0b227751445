//! Carbomatic service layer.
//!
//! Transport-agnostic logic shared by every adapter (HTTP server, CLI):
//!
//! - [`carbs`] computes carb-loading targets from body weight and an explicit
//!   rate strategy.
//! - [`meal_plan`] drafts a multi-day meal plan through a [`llm::TextGenerator`]
//!   and extracts a JSON plan from the reply.
//! - [`llm`] defines the generator interface and the Anthropic client.

pub mod carbs;
pub mod llm;
pub mod meal_plan;

pub use carbs::{CarbError, CarbRequest, CarbResult, RateStrategy, calculate};
pub use meal_plan::{MealPlanError, MealPlanRequest, MealPlanResult, MealPlanner};
