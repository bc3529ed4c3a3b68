use {async_trait::async_trait, std::path::Path};

use crate::{
    error::Result,
    types::{
        DownloadedResource, FileUpload, ImageType, ResourceKind, SendTarget, SentMessage,
        UploadedFile, UploadedImage,
    },
};

/// Media primitives of the chat service.
///
/// Every method is a single request/response exchange; nothing is retried.
#[async_trait]
pub trait MediaClient: Send + Sync {
    /// Read `path` and upload it as an image.
    async fn upload_image(&self, path: &Path, image_type: ImageType) -> Result<UploadedImage>;

    /// Read `path` and upload it as a file.
    async fn upload_file(&self, path: &Path, upload: &FileUpload) -> Result<UploadedFile>;

    /// Fetch an image previously uploaded by this app.
    async fn download_image(&self, image_key: &str) -> Result<DownloadedResource>;

    /// Fetch an image or file attached to a message.
    async fn download_message_resource(
        &self,
        message_id: &str,
        file_key: &str,
        kind: ResourceKind,
    ) -> Result<DownloadedResource>;

    /// Post an uploaded image as a new message.
    async fn send_image(&self, target: &SendTarget, image_key: &str) -> Result<SentMessage>;

    /// Post an uploaded file as a new message.
    async fn send_file(&self, target: &SendTarget, file_key: &str) -> Result<SentMessage>;
}
