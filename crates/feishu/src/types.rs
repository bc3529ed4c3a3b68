use {
    serde::{Deserialize, Serialize},
    std::{fmt, str::FromStr},
};

use crate::file_type::FileType;

/// Scope of an uploaded image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    /// Sendable in chat messages.
    #[default]
    Message,
    /// Usable as an avatar.
    Avatar,
}

impl ImageType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Avatar => "avatar",
        }
    }
}

impl FromStr for ImageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "message" => Ok(Self::Message),
            "avatar" => Ok(Self::Avatar),
            _ => Err(format!(
                "unknown image type '{s}' (expected message or avatar)"
            )),
        }
    }
}

/// Which message resource endpoint variant to hit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Image,
    #[default]
    File,
}

impl ResourceKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::File => "file",
        }
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "file" => Ok(Self::File),
            _ => Err(format!("unknown resource type '{s}' (expected image or file)")),
        }
    }
}

/// How a message destination identifier is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiveIdType {
    #[default]
    ChatId,
    OpenId,
    UserId,
    UnionId,
    Email,
}

impl ReceiveIdType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ChatId => "chat_id",
            Self::OpenId => "open_id",
            Self::UserId => "user_id",
            Self::UnionId => "union_id",
            Self::Email => "email",
        }
    }

    /// Guess the id type from the identifier's shape.
    ///
    /// `oc_` chats, `ou_` open ids and `on_` union ids are prefixed by the
    /// service; anything with an `@` is treated as an email address. The
    /// rest is assumed to be a chat id.
    #[must_use]
    pub fn infer(destination: &str) -> Self {
        if destination.starts_with("ou_") {
            Self::OpenId
        } else if destination.starts_with("on_") {
            Self::UnionId
        } else if destination.contains('@') {
            Self::Email
        } else {
            Self::ChatId
        }
    }
}

impl FromStr for ReceiveIdType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chat_id" => Ok(Self::ChatId),
            "open_id" => Ok(Self::OpenId),
            "user_id" => Ok(Self::UserId),
            "union_id" => Ok(Self::UnionId),
            "email" => Ok(Self::Email),
            _ => Err(format!(
                "unknown receive id type '{s}' (expected chat_id, open_id, user_id, union_id or email)"
            )),
        }
    }
}

impl fmt::Display for ReceiveIdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an uploaded key should be posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendTarget {
    pub to: String,
    pub receive_id_type: ReceiveIdType,
    /// Message to thread the new message under.
    pub reply_to: Option<String>,
}

impl SendTarget {
    /// Target `to`, inferring how the identifier is interpreted.
    #[must_use]
    pub fn new(to: impl Into<String>) -> Self {
        let to = to.into();
        Self {
            receive_id_type: ReceiveIdType::infer(&to),
            to,
            reply_to: None,
        }
    }

    #[must_use]
    pub fn with_receive_id_type(mut self, receive_id_type: ReceiveIdType) -> Self {
        self.receive_id_type = receive_id_type;
        self
    }

    #[must_use]
    pub fn replying_to(mut self, message_id: impl Into<String>) -> Self {
        self.reply_to = Some(message_id.into());
        self
    }
}

/// Parameters of a file upload besides the bytes themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub file_type: FileType,
    /// Milliseconds; meaningful for audio and video, forwarded untouched.
    pub duration: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub image_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub file_key: String,
}

/// Payload of an image or message attachment download.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadedResource {
    pub bytes: Vec<u8>,
    /// `Content-Type` declared by the service, if any.
    pub content_type: Option<String>,
    /// Original file name, for message attachments.
    pub file_name: Option<String>,
}

/// Acknowledgement of a sent message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentMessage {
    pub message_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    /// Milliseconds since the epoch, as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
}
