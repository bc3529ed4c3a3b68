use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Regional Open API endpoint.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeishuDomain {
    /// Mainland China (`open.feishu.cn`).
    #[default]
    Feishu,
    /// International edition (`open.larksuite.com`).
    Lark,
}

impl FeishuDomain {
    #[must_use]
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Feishu => "https://open.feishu.cn",
            Self::Lark => "https://open.larksuite.com",
        }
    }
}

/// Credentials for a single Feishu/Lark app.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeishuAccountConfig {
    /// App ID from the developer console (`cli_...`).
    pub app_id: String,

    /// App secret.
    #[serde(serialize_with = "serialize_secret")]
    pub app_secret: Secret<String>,

    /// Which regional endpoint to talk to.
    pub domain: FeishuDomain,

    /// Explicit API origin, overriding `domain` (private deployments).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl FeishuAccountConfig {
    /// API origin without a trailing slash.
    #[must_use]
    pub fn api_base(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| self.domain.base_url())
            .trim_end_matches('/')
    }

    /// Whether both halves of the credential are present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.app_id.is_empty() && !self.app_secret.expose_secret().is_empty()
    }
}

impl std::fmt::Debug for FeishuAccountConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeishuAccountConfig")
            .field("app_id", &self.app_id)
            .field("app_secret", &"[REDACTED]")
            .field("domain", &self.domain)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

impl Default for FeishuAccountConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            app_secret: Secret::new(String::new()),
            domain: FeishuDomain::default(),
            base_url: None,
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = FeishuAccountConfig::default();
        assert_eq!(cfg.domain, FeishuDomain::Feishu);
        assert_eq!(cfg.api_base(), "https://open.feishu.cn");
        assert!(!cfg.is_configured());
    }

    #[test]
    fn deserialize_from_json() {
        let json = r#"{
            "app_id": "cli_a1b2",
            "app_secret": "s3cret",
            "domain": "lark"
        }"#;
        let cfg: FeishuAccountConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.app_id, "cli_a1b2");
        assert_eq!(cfg.app_secret.expose_secret(), "s3cret");
        assert_eq!(cfg.api_base(), "https://open.larksuite.com");
        assert!(cfg.is_configured());
    }

    #[test]
    fn base_url_overrides_domain() {
        let cfg = FeishuAccountConfig {
            base_url: Some("http://127.0.0.1:8080/".into()),
            ..Default::default()
        };
        assert_eq!(cfg.api_base(), "http://127.0.0.1:8080");
    }

    #[test]
    fn debug_redacts_secret() {
        let cfg = FeishuAccountConfig {
            app_secret: Secret::new("hunter2".into()),
            ..Default::default()
        };
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
