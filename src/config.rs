//! Configuration types.

/// Service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the REST server listens on.
    pub port: u16,
    /// Location of the template form PDF. Resolution happens lazily at each
    /// render; a bad path surfaces as a failed generation, not at startup.
    pub template_path: String,
    /// Model used by the explanation service.
    pub model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 7860,
            template_path: "Missouri-InFormaPauperis.pdf".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
        }
    }
}

impl AppConfig {
    /// Build configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            port: std::env::var("FORM_ASSIST_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),
            template_path: std::env::var("FORM_ASSIST_TEMPLATE")
                .unwrap_or(default.template_path),
            model: std::env::var("FORM_ASSIST_MODEL").unwrap_or(default.model),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = AppConfig::default();
        assert_eq!(config.port, 7860);
        assert!(config.template_path.ends_with(".pdf"));
        assert!(!config.model.is_empty());
    }
}
