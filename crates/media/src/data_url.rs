//! `data:<mime>;base64,<payload>` encoding for binary downloads.

use base64::Engine as _;

/// Encode `bytes` as a base64 data URL with the given content type.
#[must_use]
pub fn encode(content_type: &str, bytes: &[u8]) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{content_type};base64,{b64}")
}
