//! Content analyzer trait and its request/outcome value types.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// A structured filing suggestion produced by the content analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSuggestion {
    /// Proposed human-readable title.
    pub suggested_title: String,
    /// Document type classification (e.g., "invoice", "contract").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    /// Keywords extracted from the content, used as tag candidates.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Ordered folder-name segments proposing a filing location.
    #[serde(default)]
    pub suggested_path: Vec<String>,
    /// Document date, if one was extracted (ISO 8601 string).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Counterparty name, if one was extracted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
    /// Monetary amount, if one was extracted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

/// Everything the analyzer needs to produce a suggestion for one file.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Original file name (including extension).
    pub file_name: String,
    /// MIME type, if known.
    pub mime_type: Option<String>,
    /// Document bytes. `None` when only filename/metadata analysis is
    /// requested.
    pub content: Option<Bytes>,
    /// The owner's existing folder paths, one string per leaf (e.g.
    /// `"Rechnungen/2024"`). The analyzer is instructed to reuse these
    /// instead of inventing near-duplicate names.
    pub existing_paths: Vec<String>,
    /// Locale hint (BCP 47).
    pub locale: String,
    /// Free-text hint supplied by the user, if any.
    pub user_hint: Option<String>,
    /// When set, skip content inspection and rely on filename/metadata.
    pub skip_deep_analysis: bool,
}

/// The four outcomes the core must branch on distinctly.
///
/// Hard transport failures are reported as `Err(AppError)` with kind
/// `ExternalService`, not as an outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// A structured suggestion is available.
    Suggestion(DocumentSuggestion),
    /// The analyzer cannot process this document type. Not an error;
    /// the task returns to its stored state.
    Unsupported {
        /// Why the document was rejected.
        reason: String,
    },
    /// The analyzer is rate limited; retry later.
    RateLimited,
    /// The analyzer quota is exhausted.
    QuotaExhausted,
}

/// Trait for the content analyzer collaborator.
#[async_trait]
pub trait ContentAnalyzer: Send + Sync + 'static {
    /// Inspect one document and propose a title, tags, and a filing
    /// location.
    async fn analyze(&self, request: &AnalysisRequest) -> AppResult<AnalysisOutcome>;
}
