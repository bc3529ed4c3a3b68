//! Content types assumed when the remote service does not declare one.

/// Default for image downloads.
pub const DEFAULT_IMAGE_MIME: &str = "image/png";

/// Default for message attachment downloads.
pub const DEFAULT_FILE_MIME: &str = "application/octet-stream";

/// Pick the declared content type, falling back to `default` when the
/// declaration is missing or blank.
#[must_use]
pub fn content_type_or<'a>(declared: Option<&'a str>, default: &'a str) -> &'a str {
    declared
        .map(str::trim)
        .filter(|ct| !ct.is_empty())
        .unwrap_or(default)
}
