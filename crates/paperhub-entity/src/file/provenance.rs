//! Intake provenance value object.
//!
//! Serialized into the file's `meta` bag when a Smart Upload commit goes
//! through, so a file always records how it was filed.

use serde::{Deserialize, Serialize};

use paperhub_core::traits::analyzer::DocumentSuggestion;

/// Provenance fields written by the intake pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileProvenance {
    /// Document type classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    /// Extracted document date (ISO 8601 string).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Extracted counterparty name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
    /// Extracted monetary amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    /// The path the analyzer suggested (before user edits).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ai_suggested_path: Vec<String>,
    /// Whether the AI pipeline was involved in filing this document.
    #[serde(default)]
    pub ai_assisted: bool,
}

impl FileProvenance {
    /// Build provenance from the analyzer's (unedited) suggestion.
    pub fn from_suggestion(suggestion: &DocumentSuggestion) -> Self {
        Self {
            doc_type: suggestion.document_type.clone(),
            date: suggestion.date.clone(),
            party: suggestion.party.clone(),
            amount: suggestion.amount.clone(),
            ai_suggested_path: suggestion.suggested_path.clone(),
            ai_assisted: true,
        }
    }

    /// Merge these fields into an existing `meta` bag, preserving any
    /// unrelated keys already present.
    pub fn merged_into(&self, existing: Option<serde_json::Value>) -> serde_json::Value {
        let mut object = match existing {
            Some(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        if let Ok(serde_json::Value::Object(fields)) = serde_json::to_value(self) {
            for (key, value) in fields {
                object.insert(key, value);
            }
        }
        serde_json::Value::Object(object)
    }

    /// Parse provenance back out of a `meta` bag. Unknown keys are
    /// ignored; missing fields default.
    pub fn from_meta(meta: Option<&serde_json::Value>) -> Self {
        meta.and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_preserves_unrelated_keys() {
        let provenance = FileProvenance {
            doc_type: Some("invoice".into()),
            ai_suggested_path: vec!["Rechnungen".into(), "2024".into()],
            ai_assisted: true,
            ..Default::default()
        };
        let existing = serde_json::json!({ "color": "red" });

        let merged = provenance.merged_into(Some(existing));

        assert_eq!(merged["color"], "red");
        assert_eq!(merged["doc_type"], "invoice");
        assert_eq!(merged["ai_assisted"], true);

        let round_trip = FileProvenance::from_meta(Some(&merged));
        assert_eq!(round_trip, provenance);
    }
}
