//! Owner-scoped object key construction.
//!
//! Keys are namespaced per owner and carry a uniqueness-breaking
//! timestamp plus the sanitized original file name:
//! `{owner}/{millis}-{sanitized-name}`.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Build the object key for one upload.
pub fn object_key(owner_id: Uuid, file_name: &str, now: DateTime<Utc>) -> String {
    format!(
        "{}/{}-{}",
        owner_id,
        now.timestamp_millis(),
        sanitize_file_name(file_name)
    )
}

/// Reduce a file name to a safe key component.
///
/// Keeps ASCII alphanumerics, `.`, `-`, and `_`; every other character
/// (including path separators) becomes a single `_`. Leading and
/// trailing dots and underscores are stripped, so `..` segments never
/// survive. Empty input maps to `"unnamed"`.
pub fn sanitize_file_name(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len());
    let mut last_was_replacement = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
            sanitized.push(ch);
            last_was_replacement = false;
        } else if !last_was_replacement {
            sanitized.push('_');
            last_was_replacement = true;
        }
    }
    let trimmed = sanitized.trim_matches(|c| c == '_' || c == '.');
    if trimmed.is_empty() {
        "unnamed".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_safe_characters() {
        assert_eq!(sanitize_file_name("Rechnung-2024.pdf"), "Rechnung-2024.pdf");
        assert_eq!(sanitize_file_name("Strom Anbieter.pdf"), "Strom_Anbieter.pdf");
    }

    #[test]
    fn test_sanitize_collapses_and_strips_separators() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_file_name("a///b"), "a_b");
        assert_eq!(sanitize_file_name("äöü"), "unnamed");
    }

    #[test]
    fn test_object_key_shape() {
        let owner = Uuid::new_v4();
        let now = Utc::now();
        let key = object_key(owner, "scan 001.pdf", now);
        assert!(key.starts_with(&format!("{owner}/")));
        assert!(key.ends_with("-scan_001.pdf"));
    }
}
