//! Prompt construction for the analysis request.

use paperhub_core::traits::analyzer::AnalysisRequest;

/// System instructions for the model.
///
/// The near-duplicate-avoidance instruction matters: the path resolver
/// downstream performs exact name matching only, so reusing existing
/// folder names is the analyzer's job.
pub fn system_prompt(locale: &str) -> String {
    format!(
        "You are a filing assistant for a document management system. \
         Given a document, respond with a single JSON object and nothing else: \
         {{\"suggested_title\": string, \"document_type\": string, \
         \"keywords\": [string], \"suggested_path\": [string], \
         \"date\": string|null, \"party\": string|null, \"amount\": string|null}}. \
         suggested_path is an ordered list of 1 to 4 folder names, general to specific. \
         Reuse the user's existing folder names verbatim whenever one fits; never invent \
         a folder name that differs from an existing one only in casing, spelling, or \
         singular/plural form. Write titles and folder names in the language of \
         locale {locale}."
    )
}

/// User message carrying the document identity, tree context, and
/// (optionally) a content excerpt.
pub fn user_prompt(request: &AnalysisRequest, max_content_bytes: usize) -> String {
    let mut prompt = format!("File name: {}\n", request.file_name);
    if let Some(mime) = &request.mime_type {
        prompt.push_str(&format!("Content type: {mime}\n"));
    }
    if request.existing_paths.is_empty() {
        prompt.push_str("Existing folders: (none)\n");
    } else {
        prompt.push_str("Existing folders:\n");
        for path in &request.existing_paths {
            prompt.push_str(&format!("  {path}\n"));
        }
    }
    if let Some(hint) = &request.user_hint {
        prompt.push_str(&format!("User hint: {hint}\n"));
    }
    match &request.content {
        Some(content) if !request.skip_deep_analysis => {
            let excerpt = &content[..content.len().min(max_content_bytes)];
            prompt.push_str("Document content (may be truncated):\n");
            prompt.push_str(&String::from_utf8_lossy(excerpt));
        }
        _ => {
            prompt.push_str(
                "No document content available; base the suggestion on the file name \
                 and metadata only.\n",
            );
        }
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            file_name: "stadtwerke-01-2024.pdf".into(),
            mime_type: Some("application/pdf".into()),
            content: Some(Bytes::from_static(b"Stadtwerke Rechnung Januar 2024")),
            existing_paths: vec!["Rechnungen/2024".into(), "Vertraege".into()],
            locale: "de-DE".into(),
            user_hint: Some("Nebenkosten".into()),
            skip_deep_analysis: false,
        }
    }

    #[test]
    fn test_user_prompt_carries_tree_and_hint() {
        let prompt = user_prompt(&request(), 1024);
        assert!(prompt.contains("stadtwerke-01-2024.pdf"));
        assert!(prompt.contains("Rechnungen/2024"));
        assert!(prompt.contains("User hint: Nebenkosten"));
        assert!(prompt.contains("Stadtwerke Rechnung"));
    }

    #[test]
    fn test_skip_deep_analysis_omits_content() {
        let mut req = request();
        req.skip_deep_analysis = true;
        let prompt = user_prompt(&req, 1024);
        assert!(!prompt.contains("Stadtwerke Rechnung"));
        assert!(prompt.contains("file name"));
    }

    #[test]
    fn test_content_is_truncated() {
        let mut req = request();
        req.content = Some(Bytes::from(vec![b'x'; 4096]));
        let prompt = user_prompt(&req, 16);
        assert!(prompt.len() < 1024);
    }
}
