//! HTTP client against an OpenAI-compatible chat-completions endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use paperhub_core::config::analyzer::AnalyzerConfig;
use paperhub_core::error::{AppError, ErrorKind};
use paperhub_core::result::AppResult;
use paperhub_core::traits::analyzer::{
    AnalysisOutcome, AnalysisRequest, ContentAnalyzer, DocumentSuggestion,
};

use crate::mime;
use crate::prompt;

/// Content analyzer talking to an OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct HttpAnalyzer {
    client: reqwest::Client,
    config: AnalyzerConfig,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: ApiErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<String>,
}

impl HttpAnalyzer {
    /// Create a new analyzer from configuration.
    pub fn new(config: AnalyzerConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build analyzer HTTP client",
                    e,
                )
            })?;
        Ok(Self { client, config })
    }

    /// Map a non-success response to the appropriate outcome or error.
    fn classify_failure(status: reqwest::StatusCode, body: &str) -> AppResult<AnalysisOutcome> {
        let detail: ApiErrorDetail = serde_json::from_str::<ApiErrorBody>(body)
            .map(|b| b.error)
            .unwrap_or_default();

        if detail.code.as_deref() == Some("insufficient_quota")
            || detail.message.contains("insufficient_quota")
        {
            return Ok(AnalysisOutcome::QuotaExhausted);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Ok(AnalysisOutcome::RateLimited);
        }
        if status == reqwest::StatusCode::PAYMENT_REQUIRED {
            return Ok(AnalysisOutcome::QuotaExhausted);
        }
        Err(AppError::external_service(format!(
            "Analyzer request failed with status {status}: {}",
            if detail.message.is_empty() {
                body
            } else {
                &detail.message
            }
        )))
    }
}

/// Parse the model's reply into a suggestion.
///
/// Returns `None` when the reply is not usable JSON or proposes neither
/// a title nor a path — the caller treats that as "no suggestion".
pub fn parse_suggestion(content: &str) -> Option<DocumentSuggestion> {
    // Tolerate a fenced code block around the JSON object.
    let trimmed = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let mut suggestion: DocumentSuggestion = serde_json::from_str(trimmed).ok()?;
    suggestion.suggested_title = suggestion.suggested_title.trim().to_string();
    suggestion.suggested_path = suggestion
        .suggested_path
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    suggestion.keywords = suggestion
        .keywords
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if suggestion.suggested_title.is_empty() && suggestion.suggested_path.is_empty() {
        return None;
    }
    Some(suggestion)
}

#[async_trait]
impl ContentAnalyzer for HttpAnalyzer {
    async fn analyze(&self, request: &AnalysisRequest) -> AppResult<AnalysisOutcome> {
        if let Some(reason) = mime::rejection_reason(&request.file_name, request.mime_type.as_deref())
        {
            debug!(file_name = %request.file_name, %reason, "Analysis rejected before dispatch");
            return Ok(AnalysisOutcome::Unsupported { reason });
        }

        let body = serde_json::json!({
            "model": self.config.model,
            "temperature": 0.2,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": prompt::system_prompt(&self.config.locale) },
                { "role": "user", "content": prompt::user_prompt(request, self.config.max_content_bytes) },
            ],
        });

        let mut http_request = self.client.post(&self.config.endpoint).json(&body);
        if !self.config.api_key.is_empty() {
            http_request = http_request.bearer_auth(&self.config.api_key);
        }

        let response = http_request.send().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Analyzer transport error: {e}"),
                e,
            )
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Self::classify_failure(status, &body);
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Analyzer returned an unreadable response: {e}"),
                e,
            )
        })?;

        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or_default();

        match parse_suggestion(content) {
            Some(suggestion) => {
                debug!(
                    file_name = %request.file_name,
                    title = %suggestion.suggested_title,
                    segments = suggestion.suggested_path.len(),
                    "Analyzer produced a suggestion"
                );
                Ok(AnalysisOutcome::Suggestion(suggestion))
            }
            None => {
                warn!(file_name = %request.file_name, "Analyzer reply held no usable suggestion");
                Ok(AnalysisOutcome::Unsupported {
                    reason: "analyzer returned no usable suggestion".to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let content = r#"{
            "suggested_title": "Stromrechnung Januar 2024",
            "document_type": "invoice",
            "keywords": ["strom", "2024"],
            "suggested_path": ["Rechnungen", "2024", "Stromanbieter"],
            "date": "2024-01-15",
            "party": "Stadtwerke",
            "amount": "89.20 EUR"
        }"#;

        let suggestion = parse_suggestion(content).unwrap();
        assert_eq!(suggestion.suggested_title, "Stromrechnung Januar 2024");
        assert_eq!(
            suggestion.suggested_path,
            vec!["Rechnungen", "2024", "Stromanbieter"]
        );
        assert_eq!(suggestion.party.as_deref(), Some("Stadtwerke"));
    }

    #[test]
    fn test_parse_fenced_json_and_blank_segments() {
        let content = "```json\n{\"suggested_title\": \" Vertrag \", \"suggested_path\": [\"Vertraege\", \"  \"]}\n```";
        let suggestion = parse_suggestion(content).unwrap();
        assert_eq!(suggestion.suggested_title, "Vertrag");
        assert_eq!(suggestion.suggested_path, vec!["Vertraege"]);
    }

    #[test]
    fn test_unusable_reply_is_none() {
        assert!(parse_suggestion("I could not read this document.").is_none());
        assert!(parse_suggestion("{\"suggested_title\": \"\", \"suggested_path\": []}").is_none());
    }

    #[test]
    fn test_classify_failure() {
        let outcome = HttpAnalyzer::classify_failure(
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            r#"{"error": {"message": "Rate limit reached", "code": "rate_limit_exceeded"}}"#,
        )
        .unwrap();
        assert_eq!(outcome, AnalysisOutcome::RateLimited);

        let outcome = HttpAnalyzer::classify_failure(
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            r#"{"error": {"message": "You exceeded your current quota", "code": "insufficient_quota"}}"#,
        )
        .unwrap();
        assert_eq!(outcome, AnalysisOutcome::QuotaExhausted);

        let err = HttpAnalyzer::classify_failure(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            "upstream exploded",
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExternalService);
    }
}
