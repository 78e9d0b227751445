//! Text generation adapter interface.
//!
//! The meal planner talks to a [`TextGenerator`], never to a concrete HTTP
//! client. The production implementation is [`AnthropicClient`]; tests inject
//! scripted generators.
//!
//! ```text
//! MealPlanner --generate(prompt, max_tokens)--> &dyn TextGenerator
//!                                                   |
//!                                                   v
//!                                    first text segment of the reply
//! ```

pub mod anthropic;

use async_trait::async_trait;
use thiserror::Error;

pub use anthropic::{AnthropicClient, AnthropicConfig};

/// Errors raised while obtaining text from a generative service.
///
/// A reply whose *text* is unusable is not an error at this layer; only
/// configuration and transport-level failures are.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{env_var} not found in environment variables")]
    MissingCredential { env_var: &'static str },

    #[error("request to generative service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("generative service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response envelope: {0}")]
    Envelope(String),

    #[error("response contained no text segment")]
    NoTextSegment,
}

/// Adapter interface for a generative text service.
///
/// Object-safe so it can be shared as `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Human-readable name for logging (e.g. "anthropic").
    fn name(&self) -> &str;

    /// Send a single user prompt and return the first text segment of the
    /// reply. `max_tokens` bounds the length of the generated output.
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError>;
}

// Compile-time assertion: TextGenerator must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn TextGenerator) {}
};

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoGenerator;

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, prompt: &str, _max_tokens: u32) -> Result<String, LlmError> {
            Ok(prompt.to_string())
        }
    }

    #[tokio::test]
    async fn generator_is_usable_as_trait_object() {
        let generator: Box<dyn TextGenerator> = Box::new(EchoGenerator);
        assert_eq!(generator.name(), "echo");
        assert_eq!(generator.generate("hi", 10).await.unwrap(), "hi");
    }

    #[test]
    fn missing_credential_names_the_variable() {
        let err = LlmError::MissingCredential {
            env_var: "ANTHROPIC_API_KEY",
        };
        assert_eq!(
            err.to_string(),
            "ANTHROPIC_API_KEY not found in environment variables"
        );
    }
}
