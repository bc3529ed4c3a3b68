//! Uniform result envelope returned by every tool.

use {serde::Serialize, serde_json::Value, std::fmt};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

/// Outcome of a tool call.
///
/// Serializes to `{"content": [...], "details": ...}` on success and
/// `{"content": [...], "error": "..."}` on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolResult {
    Success {
        content: Vec<ContentBlock>,
        details: Value,
    },
    Failure {
        content: Vec<ContentBlock>,
        error: String,
    },
}

impl ToolResult {
    #[must_use]
    pub fn success(summary: impl Into<String>, details: Value) -> Self {
        Self::Success {
            content: vec![ContentBlock::Text {
                text: summary.into(),
            }],
            details,
        }
    }

    /// Success whose summary is the pretty-printed details.
    #[must_use]
    pub fn json(details: Value) -> Self {
        let summary =
            serde_json::to_string_pretty(&details).unwrap_or_else(|_| details.to_string());
        Self::success(summary, details)
    }

    #[must_use]
    pub fn failure(error: impl fmt::Display) -> Self {
        let error = error.to_string();
        Self::Failure {
            content: vec![ContentBlock::Text {
                text: format!("Error: {error}"),
            }],
            error,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Summary text of the first content block.
    #[must_use]
    pub fn text(&self) -> &str {
        let (Self::Success { content, .. } | Self::Failure { content, .. }) = self;
        content
            .first()
            .map_or("", |ContentBlock::Text { text }| text.as_str())
    }

    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        match self {
            Self::Success { details, .. } => Some(details),
            Self::Failure { .. } => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn success_serializes_content_and_details_only() {
        let result = ToolResult::success("done", json!({ "imageKey": "img_1" }));
        let value = result.to_value();
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["content"][0]["text"], "done");
        assert_eq!(value["details"]["imageKey"], "img_1");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn failure_prefixes_summary_and_omits_details() {
        let result = ToolResult::failure("'path' is required");
        let value = result.to_value();
        assert_eq!(value["content"][0]["text"], "Error: 'path' is required");
        assert_eq!(value["error"], "'path' is required");
        assert!(value.get("details").is_none());
        assert!(!result.is_success());
    }

    #[test]
    fn json_summary_is_pretty_printed_details() {
        let details = json!({ "fileKey": "file_1", "fileType": "pdf" });
        let result = ToolResult::json(details.clone());
        assert_eq!(result.text(), serde_json::to_string_pretty(&details).unwrap());
        assert_eq!(result.details(), Some(&details));
        assert_eq!(result.error(), None);
    }
}
