//! HTTP adapter for the Feishu / Lark IM media endpoints.

use std::{path::Path, sync::Arc};

use {
    async_trait::async_trait,
    reqwest::{
        RequestBuilder, Response, StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE, HeaderMap},
        multipart::{Form, Part},
    },
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, de::DeserializeOwned},
    serde_json::{Value, json},
    tokio::sync::Mutex,
    tracing::{debug, warn},
};

use crate::{
    auth::{CachedAccessToken, get_tenant_access_token},
    client::MediaClient,
    config::FeishuAccountConfig,
    error::{Error, Result},
    types::{
        DownloadedResource, FileUpload, ImageType, ResourceKind, SendTarget, SentMessage,
        UploadedFile, UploadedImage,
    },
};

const IMAGES_PATH: &str = "/open-apis/im/v1/images";
const FILES_PATH: &str = "/open-apis/im/v1/files";
const MESSAGES_PATH: &str = "/open-apis/im/v1/messages";

/// Common reply wrapper of the Open API.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    code: i64,
    #[serde(default)]
    msg: String,
    data: Option<T>,
}

/// Error-only view of a reply, used when the body may not be JSON.
#[derive(Debug, Deserialize)]
struct ApiStatus {
    code: i64,
    #[serde(default)]
    msg: String,
}

/// Media client backed by the Open API.
pub struct FeishuClient {
    config: Arc<FeishuAccountConfig>,
    http: reqwest::Client,
    token_cache: Arc<Mutex<Option<CachedAccessToken>>>,
}

impl FeishuClient {
    pub fn new(config: FeishuAccountConfig) -> Result<Self> {
        Self::with_http_client(config, reqwest::Client::new())
    }

    pub fn with_http_client(config: FeishuAccountConfig, http: reqwest::Client) -> Result<Self> {
        if config.app_id.is_empty() {
            return Err(Error::invalid_config("app_id is required"));
        }
        if config.app_secret.expose_secret().is_empty() {
            return Err(Error::invalid_config("app_secret is required"));
        }
        Ok(Self {
            config: Arc::new(config),
            http,
            token_cache: Arc::new(Mutex::new(None)),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_base())
    }

    async fn token(&self) -> Result<Secret<String>> {
        get_tenant_access_token(&self.http, &self.config, &self.token_cache).await
    }

    async fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.token().await?;
        Ok(builder.bearer_auth(token.expose_secret()))
    }

    async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T> {
        let request = self.authorized(self.http.post(self.url(path))).await?;
        let resp = request.multipart(form).send().await?;
        parse_api_response(resp).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &Value,
    ) -> Result<T> {
        let request = self.authorized(self.http.post(self.url(path))).await?;
        let resp = request.query(query).json(body).send().await?;
        parse_api_response(resp).await
    }

    async fn get_binary(&self, path: &str, query: &[(&str, &str)]) -> Result<DownloadedResource> {
        let request = self.authorized(self.http.get(self.url(path))).await?;
        let resp = request.query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(error_from_body(status, &body));
        }

        let content_type = header_value(resp.headers(), CONTENT_TYPE.as_str());
        let disposition = header_value(resp.headers(), CONTENT_DISPOSITION.as_str());
        let file_name = disposition.as_deref().and_then(filename_from_disposition);
        let bytes = resp.bytes().await?.to_vec();

        // Some failures come back as 200 with a JSON status body. Attachments
        // always carry a disposition, so their content is never inspected.
        if disposition.is_none()
            && let Some(rejected) = status_rejection(content_type.as_deref(), &bytes)
        {
            return Err(rejected);
        }

        Ok(DownloadedResource {
            bytes,
            content_type,
            file_name,
        })
    }

    async fn send_message(
        &self,
        target: &SendTarget,
        msg_type: &str,
        content: Value,
    ) -> Result<SentMessage> {
        let content = content.to_string();
        let sent: SentMessage = match target.reply_to.as_deref() {
            Some(reply_to) => {
                let path = format!("{MESSAGES_PATH}/{}/reply", urlencoding::encode(reply_to));
                let body = json!({ "msg_type": msg_type, "content": content });
                self.post_json(&path, &[], &body).await?
            },
            None => {
                let body = json!({
                    "receive_id": target.to,
                    "msg_type": msg_type,
                    "content": content,
                });
                let query = [("receive_id_type", target.receive_id_type.as_str())];
                self.post_json(MESSAGES_PATH, &query, &body).await?
            },
        };
        debug!(
            to = %target.to,
            msg_type,
            message_id = %sent.message_id,
            "sent media message"
        );
        Ok(sent)
    }
}

#[async_trait]
impl MediaClient for FeishuClient {
    async fn upload_image(&self, path: &Path, image_type: ImageType) -> Result<UploadedImage> {
        let bytes = read_local(path).await?;
        let size = bytes.len();
        let file_name = upload_name(path, "image");
        let form = Form::new()
            .text("image_type", image_type.as_str())
            .part("image", Part::bytes(bytes).file_name(file_name));

        let uploaded: UploadedImage = self.post_multipart(IMAGES_PATH, form).await?;
        debug!(
            path = %path.display(),
            size,
            image_key = %uploaded.image_key,
            "uploaded image"
        );
        Ok(uploaded)
    }

    async fn upload_file(&self, path: &Path, upload: &FileUpload) -> Result<UploadedFile> {
        let bytes = read_local(path).await?;
        let size = bytes.len();
        let mut form = Form::new()
            .text("file_type", upload.file_type.as_str())
            .text("file_name", upload.file_name.clone());
        if let Some(duration) = upload.duration {
            form = form.text("duration", duration.to_string());
        } else if upload.file_type.is_media() {
            warn!(
                file_name = %upload.file_name,
                file_type = %upload.file_type,
                "uploading audio/video without a duration"
            );
        }
        let form = form.part(
            "file",
            Part::bytes(bytes).file_name(upload.file_name.clone()),
        );

        let uploaded: UploadedFile = self.post_multipart(FILES_PATH, form).await?;
        debug!(
            path = %path.display(),
            size,
            file_type = %upload.file_type,
            file_key = %uploaded.file_key,
            "uploaded file"
        );
        Ok(uploaded)
    }

    async fn download_image(&self, image_key: &str) -> Result<DownloadedResource> {
        let path = format!("{IMAGES_PATH}/{}", urlencoding::encode(image_key));
        let resource = self.get_binary(&path, &[]).await?;
        debug!(image_key, size = resource.bytes.len(), "downloaded image");
        Ok(resource)
    }

    async fn download_message_resource(
        &self,
        message_id: &str,
        file_key: &str,
        kind: ResourceKind,
    ) -> Result<DownloadedResource> {
        let path = format!(
            "{MESSAGES_PATH}/{}/resources/{}",
            urlencoding::encode(message_id),
            urlencoding::encode(file_key)
        );
        let resource = self.get_binary(&path, &[("type", kind.as_str())]).await?;
        debug!(
            message_id,
            file_key,
            kind = kind.as_str(),
            size = resource.bytes.len(),
            "downloaded message resource"
        );
        Ok(resource)
    }

    async fn send_image(&self, target: &SendTarget, image_key: &str) -> Result<SentMessage> {
        self.send_message(target, "image", json!({ "image_key": image_key }))
            .await
    }

    async fn send_file(&self, target: &SendTarget, file_key: &str) -> Result<SentMessage> {
        self.send_message(target, "file", json!({ "file_key": file_key }))
            .await
    }
}

async fn read_local(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|e| Error::read_failed(path, e))
}

fn upload_name(path: &Path, fallback: &str) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(fallback)
        .to_string()
}

async fn parse_api_response<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(error_from_body(status, &body));
    }

    let parsed: ApiResponse<T> =
        serde_json::from_str(&body).map_err(|e| Error::invalid_response(e.to_string()))?;
    if parsed.code != 0 {
        return Err(Error::remote_rejected(Some(parsed.code), parsed.msg));
    }
    parsed
        .data
        .ok_or_else(|| Error::invalid_response("reply has no data"))
}

/// Error reply delivered with a success status. Both fields must be present.
#[derive(Debug, Deserialize)]
struct StatusReply {
    code: i64,
    msg: String,
}

fn status_rejection(content_type: Option<&str>, body: &[u8]) -> Option<Error> {
    if !content_type.is_some_and(|ct| ct.starts_with("application/json")) {
        return None;
    }
    let reply = serde_json::from_slice::<StatusReply>(body).ok()?;
    (reply.code != 0).then(|| Error::remote_rejected(Some(reply.code), reply.msg))
}

/// Map a non-2xx reply to `NotFound` (404) or `RemoteRejected`, keeping the
/// service's `msg` when the body carries one.
fn error_from_body(status: StatusCode, body: &str) -> Error {
    let api = serde_json::from_str::<ApiStatus>(body).ok();
    let code = api.as_ref().map(|a| a.code);
    let message = match api {
        Some(a) if !a.msg.is_empty() => a.msg,
        _ if body.trim().is_empty() => format!("Feishu API request failed ({status})"),
        _ => format!("Feishu API request failed ({status}): {}", body.trim()),
    };
    if status == StatusCode::NOT_FOUND {
        Error::not_found(message)
    } else {
        Error::remote_rejected(code, message)
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Extract the file name from a `Content-Disposition` header, preferring the
/// RFC 5987 `filename*` form.
fn filename_from_disposition(value: &str) -> Option<String> {
    let mut plain = None;
    for part in value.split(';').map(str::trim) {
        if let Some(ext) = strip_prefix_ignore_case(part, "filename*=") {
            let encoded = ext.rsplit_once('\'').map_or(ext, |(_, v)| v);
            if let Ok(decoded) = urlencoding::decode(encoded.trim_matches('"')) {
                return Some(decoded.into_owned()).filter(|n| !n.is_empty());
            }
        } else if let Some(name) = strip_prefix_ignore_case(part, "filename=") {
            plain = Some(name.trim_matches('"').to_string());
        }
    }
    plain.filter(|n| !n.is_empty())
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &s[prefix.len()..])
}
