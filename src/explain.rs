//! Plain-language explanation service for intake questions.
//!
//! Optional collaborator: when no provider is configured, or a provider call
//! fails, the user still always gets *some* string back. Explanation failures
//! are never fatal and never propagate.

use std::sync::Arc;

use crate::llm::LlmProvider;

/// Returned when no LLM provider is configured.
pub const NOT_CONFIGURED_FALLBACK: &str =
    "Explanation unavailable: no language model is configured.";

/// Returned when the provider call fails.
pub const REQUEST_FAILED_FALLBACK: &str = "Could not generate explanation right now.";

const SYSTEM_PROMPT: &str = "You provide plain-language legal form guidance.";

/// Explains intake questions in plain language.
pub struct Explainer {
    provider: Option<Arc<dyn LlmProvider>>,
}

impl Explainer {
    pub fn new(provider: Option<Arc<dyn LlmProvider>>) -> Self {
        Self { provider }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Explain the given question label. Always returns a displayable string.
    pub async fn explain(&self, label: &str) -> String {
        let Some(provider) = &self.provider else {
            return NOT_CONFIGURED_FALLBACK.to_string();
        };

        let prompt = explanation_prompt(label);
        match provider.complete(SYSTEM_PROMPT, &prompt).await {
            Ok(explanation) => explanation.trim().to_string(),
            Err(e) => {
                tracing::warn!(question = label, error = %e, "Explanation request failed");
                REQUEST_FAILED_FALLBACK.to_string()
            }
        }
    }
}

/// Build the explanation prompt for a question label.
fn explanation_prompt(label: &str) -> String {
    format!(
        "You are a legal information assistant for Missouri family law users. \
         Explain the following intake question in plain language (2-4 sentences). \
         Do NOT give legal advice. Keep it practical and neutral.\n\n\
         Question: {label}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use async_trait::async_trait;

    struct CannedProvider(&'static str);

    #[async_trait]
    impl LlmProvider for CannedProvider {
        fn model_name(&self) -> &str {
            "canned"
        }
        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
            Ok(format!("  {}  ", self.0))
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl LlmProvider for FailingProvider {
        fn model_name(&self) -> &str {
            "failing"
        }
        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
            Err(LlmError::RequestFailed {
                provider: "test".to_string(),
                reason: "boom".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn unconfigured_explainer_returns_fallback() {
        let explainer = Explainer::new(None);
        assert!(!explainer.is_configured());
        assert_eq!(
            explainer.explain("Your full legal name").await,
            NOT_CONFIGURED_FALLBACK
        );
    }

    #[tokio::test]
    async fn provider_failure_resolves_to_fallback() {
        let explainer = Explainer::new(Some(Arc::new(FailingProvider)));
        assert_eq!(
            explainer.explain("Type of case").await,
            REQUEST_FAILED_FALLBACK
        );
    }

    #[tokio::test]
    async fn provider_response_is_trimmed() {
        let explainer = Explainer::new(Some(Arc::new(CannedProvider(
            "This asks for your name as it appears on legal documents.",
        ))));
        assert_eq!(
            explainer.explain("Your full legal name").await,
            "This asks for your name as it appears on legal documents."
        );
    }

    #[test]
    fn prompt_includes_label_and_guardrails() {
        let prompt = explanation_prompt("Cash on hand (USD)");
        assert!(prompt.contains("Cash on hand (USD)"));
        assert!(prompt.contains("Do NOT give legal advice"));
    }
}
