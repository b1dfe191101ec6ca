//! Error types for Form Assist.

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Duplicate question key in schema: {0}")]
    DuplicateQuestionKey(String),

    #[error("Radio question {key} has no choices")]
    RadioWithoutChoices { key: String },
}

/// LLM provider errors.
///
/// These never cross the explanation boundary — the `Explainer` absorbs them
/// and substitutes a fallback sentence.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

/// Document rendering errors.
///
/// `TemplateMissing` is the only kind a render attempt reports to callers;
/// per-field draw problems are skipped and logged, never surfaced here.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The template form could not be resolved or read. Configuration-level:
    /// the message carries the configured location so an operator can fix it.
    #[error("Template form not found or unreadable at '{path}': {source}")]
    TemplateMissing {
        path: String,
        #[source]
        source: lopdf::Error,
    },

    /// Writing the merged output document failed. Practically unreachable
    /// for in-memory buffers, kept explicit in the type contract.
    #[error("Failed to write output document: {0}")]
    OutputWrite(#[from] lopdf::Error),
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
