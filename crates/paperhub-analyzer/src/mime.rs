//! Pre-flight gate for document types the analyzer cannot process.

/// Extensions that never yield a useful suggestion.
const REJECTED_EXTENSIONS: &[&str] = &[
    "zip", "rar", "7z", "tar", "gz", "bz2", "xz", "exe", "dll", "so", "dylib", "bin", "iso",
    "dmg", "apk",
];

/// MIME prefixes that never yield a useful suggestion.
const REJECTED_MIME_PREFIXES: &[&str] = &[
    "application/zip",
    "application/x-tar",
    "application/gzip",
    "application/x-7z-compressed",
    "application/x-rar-compressed",
    "application/x-executable",
    "application/x-msdownload",
    "application/octet-stream",
];

/// Check whether a document is worth sending to the analyzer.
///
/// Returns `Some(reason)` when the document must be rejected as
/// unsupported, `None` when analysis may proceed.
pub fn rejection_reason(file_name: &str, mime_type: Option<&str>) -> Option<String> {
    if let Some(mime) = mime_type {
        let mime = mime.to_ascii_lowercase();
        if REJECTED_MIME_PREFIXES.iter().any(|p| mime.starts_with(p)) {
            return Some(format!("unsupported content type: {mime}"));
        }
    }

    let extension = file_name
        .rsplit('.')
        .next()
        .filter(|ext| *ext != file_name)
        .map(|ext| ext.to_ascii_lowercase());
    if let Some(ext) = extension {
        if REJECTED_EXTENSIONS.contains(&ext.as_str()) {
            return Some(format!("unsupported file extension: .{ext}"));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archives_are_rejected() {
        assert!(rejection_reason("backup.zip", None).is_some());
        assert!(rejection_reason("backup", Some("application/zip")).is_some());
        assert!(rejection_reason("setup.exe", None).is_some());
    }

    #[test]
    fn test_documents_pass() {
        assert!(rejection_reason("Rechnung.pdf", Some("application/pdf")).is_none());
        assert!(rejection_reason("notes.txt", Some("text/plain")).is_none());
        assert!(rejection_reason("scan.jpg", Some("image/jpeg")).is_none());
    }
}
