//! Feishu media tools: upload, download and send images and files.
//!
//! Each operation is a fixed pipeline over a shared [`MediaClient`]:
//! uploads resolve the local path first, downloads embed the payload as a
//! data URL, sends return the service acknowledgement. Any failure along
//! the way becomes a [`ToolResult::Failure`].

use std::sync::Arc;

use {
    async_trait::async_trait,
    larkbridge_feishu::{FileUpload, MediaClient, SendTarget, SentMessage, classify},
    larkbridge_media::{data_url, mime, paths},
    serde::Serialize,
    serde_json::{Value, json},
    tracing::{debug, warn},
};

use crate::{
    error::Result,
    request::{MediaOperation, MediaRequest},
    result::ToolResult,
    tool_registry::{AgentTool, ToolRegistry},
};

/// Runs media requests against a client and normalizes the outcome.
pub struct MediaTransfer {
    client: Arc<dyn MediaClient>,
}

impl MediaTransfer {
    #[must_use]
    pub fn new(client: Arc<dyn MediaClient>) -> Self {
        Self { client }
    }

    /// Validate raw parameters for `operation` and run it.
    pub async fn call(&self, operation: MediaOperation, params: &Value) -> ToolResult {
        match MediaRequest::parse(operation, params) {
            Ok(request) => self.execute(request).await,
            Err(e) => {
                debug!(tool = operation.name(), error = %e, "rejected tool parameters");
                ToolResult::failure(e)
            },
        }
    }

    pub async fn execute(&self, request: MediaRequest) -> ToolResult {
        let tool = request.operation().name();
        match self.run(request).await {
            Ok(result) => result,
            Err(e) => {
                warn!(tool, error = %e, "media tool failed");
                ToolResult::failure(e)
            },
        }
    }

    async fn run(&self, request: MediaRequest) -> Result<ToolResult> {
        match request {
            MediaRequest::UploadImage { path, image_type } => {
                let resolved = paths::resolve_existing(&path).await?;
                let uploaded = self.client.upload_image(&resolved, image_type).await?;
                Ok(ToolResult::json(json!({
                    "imageKey": uploaded.image_key,
                    "imageType": image_type.as_str(),
                    "path": resolved.display().to_string(),
                })))
            },
            MediaRequest::UploadFile {
                path,
                file_type,
                file_name,
                duration,
            } => {
                let resolved = paths::resolve_existing(&path).await?;
                let file_name = file_name
                    .or_else(|| paths::file_name_of(&resolved))
                    .unwrap_or_else(|| "file".to_string());
                let file_type = file_type.unwrap_or_else(|| classify(&file_name));
                let upload = FileUpload {
                    file_name,
                    file_type,
                    duration,
                };
                let uploaded = self.client.upload_file(&resolved, &upload).await?;

                let mut details = json!({
                    "fileKey": uploaded.file_key,
                    "fileType": upload.file_type.as_str(),
                    "fileName": upload.file_name,
                    "path": resolved.display().to_string(),
                });
                if let Some(duration) = upload.duration {
                    details["duration"] = json!(duration);
                }
                Ok(ToolResult::json(details))
            },
            MediaRequest::DownloadImage { image_key } => {
                let resource = self.client.download_image(&image_key).await?;
                let content_type = mime::content_type_or(
                    resource.content_type.as_deref(),
                    mime::DEFAULT_IMAGE_MIME,
                );
                let size = resource.bytes.len();
                Ok(ToolResult::success(
                    format!("Downloaded image {image_key} ({size} bytes, {content_type})"),
                    json!({
                        "imageKey": image_key,
                        "contentType": content_type,
                        "size": size,
                        "dataUrl": data_url::encode(content_type, &resource.bytes),
                    }),
                ))
            },
            MediaRequest::DownloadFile {
                message_id,
                file_key,
                kind,
            } => {
                let resource = self
                    .client
                    .download_message_resource(&message_id, &file_key, kind)
                    .await?;
                let content_type = mime::content_type_or(
                    resource.content_type.as_deref(),
                    mime::DEFAULT_FILE_MIME,
                );
                let size = resource.bytes.len();
                let label = resource.file_name.as_deref().unwrap_or(&file_key);
                let summary = format!("Downloaded {label} ({size} bytes, {content_type})");

                let mut details = json!({
                    "messageId": message_id,
                    "fileKey": file_key,
                    "type": kind.as_str(),
                    "contentType": content_type,
                    "size": size,
                    "dataUrl": data_url::encode(content_type, &resource.bytes),
                });
                if let Some(name) = resource.file_name.as_deref() {
                    details["fileName"] = json!(name);
                }
                Ok(ToolResult::success(summary, details))
            },
            MediaRequest::SendImage { target, image_key } => {
                let sent = self.client.send_image(&target, &image_key).await?;
                let details = SendDetails {
                    image_key: Some(image_key.as_str()),
                    ..SendDetails::new(&sent, &target)
                };
                Ok(ToolResult::json(serde_json::to_value(details)?))
            },
            MediaRequest::SendFile { target, file_key } => {
                let sent = self.client.send_file(&target, &file_key).await?;
                let details = SendDetails {
                    file_key: Some(file_key.as_str()),
                    ..SendDetails::new(&sent, &target)
                };
                Ok(ToolResult::json(serde_json::to_value(details)?))
            },
        }
    }
}

/// Tool details for a send acknowledgement.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendDetails<'a> {
    message_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    chat_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    create_time: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_key: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_key: Option<&'a str>,
    to: &'a str,
}

impl<'a> SendDetails<'a> {
    fn new(sent: &'a SentMessage, target: &'a SendTarget) -> Self {
        Self {
            message_id: &sent.message_id,
            chat_id: sent.chat_id.as_deref(),
            create_time: sent.create_time.as_deref(),
            image_key: None,
            file_key: None,
            to: &target.to,
        }
    }
}

/// One media operation exposed as an agent tool.
pub struct FeishuMediaTool {
    operation: MediaOperation,
    transfer: Arc<MediaTransfer>,
}

impl FeishuMediaTool {
    #[must_use]
    pub fn new(operation: MediaOperation, transfer: Arc<MediaTransfer>) -> Self {
        Self {
            operation,
            transfer,
        }
    }
}

#[async_trait]
impl AgentTool for FeishuMediaTool {
    fn name(&self) -> &str {
        self.operation.name()
    }

    fn description(&self) -> &str {
        match self.operation {
            MediaOperation::UploadImage => {
                "Upload a local image to Feishu and return its image_key. \
                 Use imageType \"avatar\" for profile pictures."
            },
            MediaOperation::UploadFile => {
                "Upload a local file to Feishu and return its file_key. The file type \
                 is inferred from the extension unless fileType is given."
            },
            MediaOperation::DownloadImage => {
                "Download an image by image_key. Returns the bytes as a base64 data URL."
            },
            MediaOperation::DownloadFile => {
                "Download an image or file attached to a message. Returns the bytes as a \
                 base64 data URL."
            },
            MediaOperation::SendImage => "Send a previously uploaded image to a chat or user.",
            MediaOperation::SendFile => "Send a previously uploaded file to a chat or user.",
        }
    }

    fn parameters_schema(&self) -> Value {
        let receive_id_type = json!({
            "type": "string",
            "enum": ["chat_id", "open_id", "user_id", "union_id", "email"],
            "description": "How 'to' is interpreted (inferred from its prefix when omitted)"
        });
        let reply_to = json!({
            "type": "string",
            "description": "Message ID to reply to"
        });
        match self.operation {
            MediaOperation::UploadImage => json!({
                "type": "object",
                "required": ["path"],
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Local image path (~ is expanded)"
                    },
                    "imageType": {
                        "type": "string",
                        "enum": ["message", "avatar"],
                        "default": "message"
                    }
                }
            }),
            MediaOperation::UploadFile => json!({
                "type": "object",
                "required": ["path"],
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Local file path (~ is expanded)"
                    },
                    "fileType": {
                        "type": "string",
                        "enum": ["opus", "mp4", "pdf", "doc", "xls", "ppt", "stream"]
                    },
                    "fileName": {
                        "type": "string",
                        "description": "Name shown in chat (defaults to the path's file name)"
                    },
                    "duration": {
                        "type": "integer",
                        "description": "Duration in milliseconds, for opus and mp4"
                    }
                }
            }),
            MediaOperation::DownloadImage => json!({
                "type": "object",
                "required": ["imageKey"],
                "properties": {
                    "imageKey": { "type": "string" }
                }
            }),
            MediaOperation::DownloadFile => json!({
                "type": "object",
                "required": ["messageId", "fileKey"],
                "properties": {
                    "messageId": { "type": "string" },
                    "fileKey": { "type": "string" },
                    "type": {
                        "type": "string",
                        "enum": ["image", "file"],
                        "default": "file"
                    }
                }
            }),
            MediaOperation::SendImage => json!({
                "type": "object",
                "required": ["to", "imageKey"],
                "properties": {
                    "to": { "type": "string", "description": "Chat or user ID" },
                    "imageKey": { "type": "string" },
                    "replyTo": reply_to,
                    "receiveIdType": receive_id_type
                }
            }),
            MediaOperation::SendFile => json!({
                "type": "object",
                "required": ["to", "fileKey"],
                "properties": {
                    "to": { "type": "string", "description": "Chat or user ID" },
                    "fileKey": { "type": "string" },
                    "replyTo": reply_to,
                    "receiveIdType": receive_id_type
                }
            }),
        }
    }

    async fn execute(&self, params: Value) -> ToolResult {
        self.transfer.call(self.operation, &params).await
    }
}

/// Register all six media tools, sharing one client.
pub fn register_media_tools(registry: &mut ToolRegistry, client: Arc<dyn MediaClient>) {
    let transfer = Arc::new(MediaTransfer::new(client));
    for operation in MediaOperation::ALL {
        registry.register(Box::new(FeishuMediaTool::new(
            operation,
            Arc::clone(&transfer),
        )));
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_details_use_camel_case_keys() {
        let sent = SentMessage {
            message_id: "om_1".into(),
            chat_id: Some("oc_1".into()),
            create_time: Some("1700000000000".into()),
        };
        let target = SendTarget::new("oc_1");
        let details = SendDetails {
            file_key: Some("file_1"),
            ..SendDetails::new(&sent, &target)
        };
        assert_eq!(serde_json::to_value(details).unwrap(), json!({
            "messageId": "om_1",
            "chatId": "oc_1",
            "createTime": "1700000000000",
            "fileKey": "file_1",
            "to": "oc_1"
        }));
    }

    #[test]
    fn send_details_omit_absent_fields() {
        let sent = SentMessage {
            message_id: "om_2".into(),
            chat_id: None,
            create_time: None,
        };
        let target = SendTarget::new("ou_user");
        let details = SendDetails {
            image_key: Some("img_1"),
            ..SendDetails::new(&sent, &target)
        };
        assert_eq!(serde_json::to_value(details).unwrap(), json!({
            "messageId": "om_2",
            "imageKey": "img_1",
            "to": "ou_user"
        }));
    }
}
