use std::path::Path;

use {anyhow::Result, clap::Subcommand, serde_json::json};

use crate::config::{LarkbridgeConfig, config_dir};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the resolved configuration with secrets redacted.
    Show,
}

pub fn handle_config(
    action: ConfigAction,
    path: Option<&Path>,
    config: &LarkbridgeConfig,
) -> Result<()> {
    match action {
        ConfigAction::Show => {
            match path {
                Some(path) => eprintln!("Loaded {}\n", path.display()),
                None => {
                    let hint = config_dir()
                        .map(|d| d.join("larkbridge.toml").display().to_string())
                        .unwrap_or_else(|| "./larkbridge.toml".into());
                    eprintln!("No config file found (expected e.g. {hint}); showing defaults.\n");
                },
            }
            println!("{}", serde_json::to_string_pretty(&redacted(config))?);
            Ok(())
        },
    }
}

fn redacted(config: &LarkbridgeConfig) -> serde_json::Value {
    let feishu = &config.feishu;
    json!({
        "feishu": {
            "app_id": feishu.app_id,
            "app_secret": if feishu.is_configured() { "[REDACTED]" } else { "" },
            "domain": feishu.domain,
            "api_base": feishu.api_base(),
        }
    })
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, secrecy::Secret};

    #[test]
    fn redacts_secret() {
        let mut config = LarkbridgeConfig::default();
        config.feishu.app_id = "cli_1".into();
        config.feishu.app_secret = Secret::new("hunter2".into());

        let value = redacted(&config);
        assert_eq!(value["feishu"]["app_secret"], "[REDACTED]");
        assert_eq!(value["feishu"]["domain"], "feishu");
        assert!(!value.to_string().contains("hunter2"));
    }
}
