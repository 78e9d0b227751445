//! Shared test utilities for carbomatic tests.
//!
//! Provides [`TextGenerator`] fakes so planner and server tests run without
//! network access, plus fixtures shaped like real generative-service replies.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use carbomatic_core::llm::{LlmError, TextGenerator};

/// Generator that returns a fixed reply and records every prompt it receives.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    reply: String,
    prompts: Mutex<Vec<(String, u32)>>,
}

impl ScriptedGenerator {
    pub fn replying(reply: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// Prompts and token budgets seen so far, oldest first.
    pub fn prompts(&self) -> Vec<(String, u32)> {
        self.prompts.lock().expect("prompt log poisoned").clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        self.prompts
            .lock()
            .expect("prompt log poisoned")
            .push((prompt.to_string(), max_tokens));
        Ok(self.reply.clone())
    }
}

/// Generator that always fails with a non-success status.
#[derive(Debug, Clone, Copy)]
pub struct FailingGenerator {
    pub status: u16,
}

#[async_trait]
impl TextGenerator for FailingGenerator {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _prompt: &str, _max_tokens: u32) -> Result<String, LlmError> {
        Err(LlmError::Status {
            status: self.status,
            body: "service unavailable".to_string(),
        })
    }
}

/// A two-day plan in the shape the prompt asks for.
pub fn sample_meal_plan() -> Value {
    json!({
        "day_1": {
            "breakfast": {"meal": "Oatmeal with honey and banana", "carbs": 120},
            "lunch": {"meal": "White rice with chicken", "carbs": 200},
            "dinner": {"meal": "Pasta with marinara", "carbs": 250},
            "snacks": [
                {"snack": "Bagel with jam", "carbs": 70},
                {"snack": "Sports drink", "carbs": 40}
            ],
            "total_carbs": 680,
            "hydration_notes": "Drink 2-3 liters of water"
        },
        "day_2": {
            "breakfast": {"meal": "Pancakes with maple syrup", "carbs": 130},
            "lunch": {"meal": "Baked potato", "carbs": 190},
            "dinner": {"meal": "Rice noodles", "carbs": 240},
            "snacks": [{"snack": "Pretzels", "carbs": 60}],
            "total_carbs": 620,
            "hydration_notes": "Add electrolytes"
        }
    })
}

/// Wrap `plan` in the chatty prose generative services tend to add.
pub fn chatty_reply(plan: &Value) -> String {
    format!("Here's your carb loading plan!\n\n```json\n{plan:#}\n```\n\nGood luck with your race!")
}

/// A Messages API response envelope carrying `text` as its only block.
pub fn anthropic_envelope(text: &str) -> Value {
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "model": "claude-3-5-haiku-20241022",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 300, "output_tokens": 900}
    })
}
