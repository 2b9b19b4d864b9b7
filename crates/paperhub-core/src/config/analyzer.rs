//! Content analyzer configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the HTTP content analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Chat-completions endpoint URL (OpenAI-compatible).
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API key sent as a bearer token. Empty disables authentication.
    #[serde(default)]
    pub api_key: String,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Locale hint forwarded with every analysis request (BCP 47).
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Maximum number of document bytes sent for deep analysis.
    #[serde(default = "default_max_content")]
    pub max_content_bytes: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: String::new(),
            model: default_model(),
            timeout_seconds: default_timeout(),
            locale: default_locale(),
            max_content_bytes: default_max_content(),
        }
    }
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_locale() -> String {
    "de-DE".to_string()
}

fn default_max_content() -> usize {
    65_536
}
