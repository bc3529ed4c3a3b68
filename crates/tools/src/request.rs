//! Typed requests parsed from raw tool parameters.
//!
//! Mandatory identifying fields are checked first, so a call missing one
//! fails with `'<field>' is required` regardless of what else is wrong.

use std::str::FromStr;

use {
    larkbridge_feishu::{FileType, ImageType, ReceiveIdType, ResourceKind, SendTarget},
    serde_json::Value,
};

use crate::error::{Error, Result};

/// The six media operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaOperation {
    UploadImage,
    UploadFile,
    DownloadImage,
    DownloadFile,
    SendImage,
    SendFile,
}

impl MediaOperation {
    pub const ALL: [Self; 6] = [
        Self::UploadImage,
        Self::UploadFile,
        Self::DownloadImage,
        Self::DownloadFile,
        Self::SendImage,
        Self::SendFile,
    ];

    /// Tool name under which the operation is registered.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::UploadImage => "upload_image",
            Self::UploadFile => "upload_file",
            Self::DownloadImage => "download_image",
            Self::DownloadFile => "download_file",
            Self::SendImage => "send_image",
            Self::SendFile => "send_file",
        }
    }
}

/// A validated media request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaRequest {
    UploadImage {
        path: String,
        image_type: ImageType,
    },
    UploadFile {
        path: String,
        /// Explicit type; inferred from the file name when absent.
        file_type: Option<FileType>,
        file_name: Option<String>,
        duration: Option<u64>,
    },
    DownloadImage {
        image_key: String,
    },
    DownloadFile {
        message_id: String,
        file_key: String,
        kind: ResourceKind,
    },
    SendImage {
        target: SendTarget,
        image_key: String,
    },
    SendFile {
        target: SendTarget,
        file_key: String,
    },
}

impl MediaRequest {
    pub fn parse(operation: MediaOperation, params: &Value) -> Result<Self> {
        match operation {
            MediaOperation::UploadImage => {
                let path = required_str(params, "path")?;
                Ok(Self::UploadImage {
                    path,
                    image_type: optional_parsed(params, "imageType")?.unwrap_or_default(),
                })
            },
            MediaOperation::UploadFile => {
                let path = required_str(params, "path")?;
                Ok(Self::UploadFile {
                    path,
                    file_type: optional_parsed(params, "fileType")?,
                    file_name: optional_str(params, "fileName")?,
                    duration: optional_u64(params, "duration")?,
                })
            },
            MediaOperation::DownloadImage => Ok(Self::DownloadImage {
                image_key: required_str(params, "imageKey")?,
            }),
            MediaOperation::DownloadFile => {
                let message_id = required_str(params, "messageId")?;
                let file_key = required_str(params, "fileKey")?;
                Ok(Self::DownloadFile {
                    message_id,
                    file_key,
                    kind: optional_parsed(params, "type")?.unwrap_or_default(),
                })
            },
            MediaOperation::SendImage => {
                let to = required_str(params, "to")?;
                let image_key = required_str(params, "imageKey")?;
                Ok(Self::SendImage {
                    target: send_target(to, params)?,
                    image_key,
                })
            },
            MediaOperation::SendFile => {
                let to = required_str(params, "to")?;
                let file_key = required_str(params, "fileKey")?;
                Ok(Self::SendFile {
                    target: send_target(to, params)?,
                    file_key,
                })
            },
        }
    }

    #[must_use]
    pub fn operation(&self) -> MediaOperation {
        match self {
            Self::UploadImage { .. } => MediaOperation::UploadImage,
            Self::UploadFile { .. } => MediaOperation::UploadFile,
            Self::DownloadImage { .. } => MediaOperation::DownloadImage,
            Self::DownloadFile { .. } => MediaOperation::DownloadFile,
            Self::SendImage { .. } => MediaOperation::SendImage,
            Self::SendFile { .. } => MediaOperation::SendFile,
        }
    }
}

fn send_target(to: String, params: &Value) -> Result<SendTarget> {
    let mut target = SendTarget::new(to);
    if let Some(kind) = optional_parsed::<ReceiveIdType>(params, "receiveIdType")? {
        target = target.with_receive_id_type(kind);
    }
    if let Some(reply_to) = optional_str(params, "replyTo")? {
        target = target.replying_to(reply_to);
    }
    Ok(target)
}

fn non_empty<'a>(params: &'a Value, name: &str) -> Option<&'a str> {
    params
        .get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn required_str(params: &Value, name: &'static str) -> Result<String> {
    non_empty(params, name)
        .map(str::to_string)
        .ok_or_else(|| Error::missing(name))
}

fn optional_str(params: &Value, name: &'static str) -> Result<Option<String>> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(Error::invalid(name, format!("expected a string, got {other}"))),
    }
}

fn optional_parsed<T>(params: &Value, name: &'static str) -> Result<Option<T>>
where
    T: FromStr<Err = String>,
{
    match params.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s.parse().map(Some).map_err(|e| Error::invalid(name, e)),
        Some(other) => Err(Error::invalid(name, format!("expected a string, got {other}"))),
    }
}

fn optional_u64(params: &Value, name: &'static str) -> Result<Option<u64>> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| Error::invalid(name, format!("expected a non-negative integer, got {n}"))),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::invalid(name, format!("expected a non-negative integer, got '{s}'"))),
        Some(other) => Err(Error::invalid(
            name,
            format!("expected a non-negative integer, got {other}"),
        )),
    }
}
