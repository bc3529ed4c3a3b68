//! Config discovery and loading.
//!
//! Files: `larkbridge.toml`, `larkbridge.yaml`, `larkbridge.yml` or
//! `larkbridge.json`, searched in `./` then `~/.config/larkbridge/`. The
//! Feishu credential lives under the `feishu` key.

use std::path::{Path, PathBuf};

use {
    anyhow::Context,
    larkbridge_feishu::FeishuAccountConfig,
    serde::Deserialize,
    tracing::debug,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "larkbridge.toml",
    "larkbridge.yaml",
    "larkbridge.yml",
    "larkbridge.json",
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LarkbridgeConfig {
    pub feishu: FeishuAccountConfig,
}

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<LarkbridgeConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_config(&raw, path).with_context(|| format!("failed to parse {}", path.display()))
}

/// Load `explicit` if given, else the first discovered config file, else
/// defaults. Returns the path that was loaded, if any.
pub fn resolve_config(
    explicit: Option<&Path>,
) -> anyhow::Result<(Option<PathBuf>, LarkbridgeConfig)> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file(),
    };
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            let config = load_config(&path)?;
            Ok((Some(path), config))
        },
        None => {
            debug!("no config file found, using defaults");
            Ok((None, LarkbridgeConfig::default()))
        },
    }
}

/// Returns the user-global config directory (`~/.config/larkbridge/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "larkbridge").map(|d| d.config_dir().to_path_buf())
}

fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    let dir = config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<LarkbridgeConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
