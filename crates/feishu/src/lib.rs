//! Feishu / Lark Open API media client.
//!
//! Uploads images and files, downloads images and message attachments, and
//! sends uploaded keys as chat messages, authenticating with an app's
//! tenant access token.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod file_type;
pub mod types;

pub use {
    api::FeishuClient,
    client::MediaClient,
    config::{FeishuAccountConfig, FeishuDomain},
    error::{Error, Result},
    file_type::{FileType, classify},
    types::{
        DownloadedResource, FileUpload, ImageType, ReceiveIdType, ResourceKind, SendTarget,
        SentMessage, UploadedFile, UploadedImage,
    },
};
