use std::path::{Path, PathBuf};

use crate::shared::constants::{FALLBACK_OUTPUT_NAME, ORIGINAL_NAME_PLACEHOLDER};

/// Reduce a free-form title to a filesystem-safe stem.
///
/// Keeps alphanumerics, spaces, `-` and `_`, trims, then turns spaces into
/// underscores.
pub fn sanitize_name(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    kept.trim().replace(' ', "_")
}

/// Substitute the sanitized `original_name` into `pattern`.
pub fn render_output_name(pattern: &str, original_name: &str) -> String {
    let mut stem = sanitize_name(original_name);
    if stem.is_empty() {
        stem = FALLBACK_OUTPUT_NAME.to_string();
    }
    pattern.replace(ORIGINAL_NAME_PLACEHOLDER, &stem)
}

/// Full output path: `<dir>/<rendered pattern>.<extension>`.
pub fn output_path(
    directory: Option<&Path>,
    pattern: &str,
    original_name: &str,
    extension: &str,
) -> PathBuf {
    let file_name = format!("{}.{extension}", render_output_name(pattern, original_name));
    match directory {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}
