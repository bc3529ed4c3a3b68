use std::{path::Path, sync::Arc};

use {
    anyhow::{Context, Result},
    async_trait::async_trait,
    clap::Subcommand,
    larkbridge_feishu::{
        DownloadedResource, Error, FeishuAccountConfig, FeishuClient, FileUpload, ImageType,
        MediaClient, ResourceKind, SendTarget, SentMessage, UploadedFile, UploadedImage,
    },
    larkbridge_tools::{ToolRegistry, register_media_tools},
    serde_json::Value,
    tracing::warn,
};

#[derive(Subcommand)]
pub enum ToolAction {
    /// List the media tools and their parameter schemas.
    List,
    /// Invoke a tool and print its result envelope.
    Call {
        /// Tool name (e.g. upload_image).
        name: String,
        /// Tool parameters as a JSON object.
        #[arg(long, default_value = "{}")]
        params: String,
    },
}

pub async fn handle_tools(action: ToolAction, config: &FeishuAccountConfig) -> Result<()> {
    let registry = build_registry(config);
    match action {
        ToolAction::List => {
            let schemas = Value::Array(registry.list_schemas());
            println!("{}", serde_json::to_string_pretty(&schemas)?);
        },
        ToolAction::Call { name, params } => {
            let params: Value =
                serde_json::from_str(&params).context("--params must be a JSON object")?;
            let result = registry.call(&name, params).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        },
    }
    Ok(())
}

/// Build the tool registry. Without usable credentials the tools are still
/// registered, but every remote call reports the configuration problem.
fn build_registry(config: &FeishuAccountConfig) -> ToolRegistry {
    let client: Arc<dyn MediaClient> = match FeishuClient::new(config.clone()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            warn!(error = %e, "feishu credentials unusable; media tools will fail");
            let message = match e {
                Error::InvalidConfig { message } => message,
                other => other.to_string(),
            };
            Arc::new(Unconfigured(message))
        },
    };
    let mut registry = ToolRegistry::new();
    register_media_tools(&mut registry, client);
    registry
}

/// Stand-in client used when no credentials are configured.
struct Unconfigured(String);

impl Unconfigured {
    fn fail<T>(&self) -> larkbridge_feishu::Result<T> {
        Err(Error::invalid_config(self.0.clone()))
    }
}

#[async_trait]
impl MediaClient for Unconfigured {
    async fn upload_image(
        &self,
        _path: &Path,
        _image_type: ImageType,
    ) -> larkbridge_feishu::Result<UploadedImage> {
        self.fail()
    }

    async fn upload_file(
        &self,
        _path: &Path,
        _upload: &FileUpload,
    ) -> larkbridge_feishu::Result<UploadedFile> {
        self.fail()
    }

    async fn download_image(
        &self,
        _image_key: &str,
    ) -> larkbridge_feishu::Result<DownloadedResource> {
        self.fail()
    }

    async fn download_message_resource(
        &self,
        _message_id: &str,
        _file_key: &str,
        _kind: ResourceKind,
    ) -> larkbridge_feishu::Result<DownloadedResource> {
        self.fail()
    }

    async fn send_image(
        &self,
        _target: &SendTarget,
        _image_key: &str,
    ) -> larkbridge_feishu::Result<SentMessage> {
        self.fail()
    }

    async fn send_file(
        &self,
        _target: &SendTarget,
        _file_key: &str,
    ) -> larkbridge_feishu::Result<SentMessage> {
        self.fail()
    }
}
