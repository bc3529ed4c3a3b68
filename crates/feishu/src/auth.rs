use std::time::{Duration, Instant};

use {
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    tokio::sync::Mutex,
    tracing::debug,
};

use crate::{
    config::FeishuAccountConfig,
    error::{Error, Result},
};

const TOKEN_PATH: &str = "/open-apis/auth/v3/tenant_access_token/internal";

#[derive(Clone)]
pub struct CachedAccessToken {
    pub token: Secret<String>,
    pub expires_at: Instant,
}

impl CachedAccessToken {
    fn is_valid(&self) -> bool {
        let refresh_skew = Duration::from_secs(300);
        self.expires_at > Instant::now() + refresh_skew
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    code: i64,
    #[serde(default)]
    msg: String,
    tenant_access_token: Option<String>,
    expire: Option<u64>,
}

/// Return a tenant access token for `config`, reusing the cached one while
/// it has more than a few minutes left.
pub async fn get_tenant_access_token(
    client: &reqwest::Client,
    config: &FeishuAccountConfig,
    cache: &Mutex<Option<CachedAccessToken>>,
) -> Result<Secret<String>> {
    {
        let guard = cache.lock().await;
        if let Some(token) = guard.as_ref()
            && token.is_valid()
        {
            return Ok(token.token.clone());
        }
    }

    let url = format!("{}{TOKEN_PATH}", config.api_base());
    let body = serde_json::json!({
        "app_id": config.app_id,
        "app_secret": config.app_secret.expose_secret(),
    });

    let resp = client.post(url).json(&body).send().await?;
    let status = resp.status();
    let text = resp.text().await?;
    let parsed: TokenResponse = serde_json::from_str(&text).map_err(|e| {
        if status.is_success() {
            Error::invalid_response(format!("tenant access token: {e}"))
        } else {
            Error::remote_rejected(
                None,
                format!("tenant access token request failed ({status}): {text}"),
            )
        }
    })?;

    let token = match parsed.tenant_access_token {
        Some(token) if parsed.code == 0 && !token.is_empty() => token,
        _ => {
            return Err(Error::remote_rejected(
                Some(parsed.code),
                format!("tenant access token request failed: {}", parsed.msg),
            ));
        },
    };

    let ttl = parsed.expire.unwrap_or(7200);
    debug!(app_id = %config.app_id, ttl, "obtained tenant access token");
    let cached = CachedAccessToken {
        token: Secret::new(token),
        expires_at: Instant::now() + Duration::from_secs(ttl),
    };
    let token = cached.token.clone();

    let mut guard = cache.lock().await;
    *guard = Some(cached);
    Ok(token)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, mockito::Matcher};

    fn config_for(server: &mockito::ServerGuard) -> FeishuAccountConfig {
        FeishuAccountConfig {
            app_id: "cli_test".into(),
            app_secret: Secret::new("secret".into()),
            base_url: Some(server.url()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn fetches_and_caches_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", TOKEN_PATH)
            .match_body(Matcher::Json(serde_json::json!({
                "app_id": "cli_test",
                "app_secret": "secret",
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"code":0,"msg":"ok","tenant_access_token":"t-abc","expire":7200}"#)
            .expect(1)
            .create_async()
            .await;

        let http = reqwest::Client::new();
        let config = config_for(&server);
        let cache = Mutex::new(None);

        let first = get_tenant_access_token(&http, &config, &cache)
            .await
            .unwrap();
        let second = get_tenant_access_token(&http, &config, &cache)
            .await
            .unwrap();

        assert_eq!(first.expose_secret(), "t-abc");
        assert_eq!(second.expose_secret(), "t-abc");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn refreshes_expiring_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", TOKEN_PATH)
            .with_status(200)
            .with_body(r#"{"code":0,"msg":"ok","tenant_access_token":"t-new","expire":7200}"#)
            .expect(1)
            .create_async()
            .await;

        let cache = Mutex::new(Some(CachedAccessToken {
            token: Secret::new("t-old".into()),
            expires_at: Instant::now() + Duration::from_secs(10),
        }));
        let token = get_tenant_access_token(&reqwest::Client::new(), &config_for(&server), &cache)
            .await
            .unwrap();

        assert_eq!(token.expose_secret(), "t-new");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn short_lived_token_keeps_reported_expiry() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", TOKEN_PATH)
            .with_status(200)
            .with_body(r#"{"code":0,"msg":"ok","tenant_access_token":"t-short","expire":60}"#)
            .expect(2)
            .create_async()
            .await;

        let http = reqwest::Client::new();
        let config = config_for(&server);
        let cache = Mutex::new(None);

        let token = get_tenant_access_token(&http, &config, &cache)
            .await
            .unwrap();
        assert_eq!(token.expose_secret(), "t-short");
        {
            let guard = cache.lock().await;
            let cached = guard.as_ref().unwrap();
            assert!(cached.expires_at <= Instant::now() + Duration::from_secs(60));
            assert!(!cached.is_valid());
        }

        get_tenant_access_token(&http, &config, &cache)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_credentials_surface_service_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", TOKEN_PATH)
            .with_status(200)
            .with_body(r#"{"code":10003,"msg":"invalid param"}"#)
            .create_async()
            .await;

        let err = get_tenant_access_token(
            &reqwest::Client::new(),
            &config_for(&server),
            &Mutex::new(None),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::RemoteRejected {
            code: Some(10003),
            ..
        }));
        assert!(err.to_string().contains("invalid param"));
    }
}
