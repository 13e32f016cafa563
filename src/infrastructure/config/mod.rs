use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;

pub const CONFIG_FILE: &str = "datastory.toml";
pub const ENV_PREFIX: &str = "DATASTORY_";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    #[validate(range(min = 1))]
    pub working_file_ttl_secs: u64,
    #[validate(range(min = 1))]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub server: ServerConfig,
    #[validate(nested)]
    pub storage: StorageConfig,
    #[validate(range(min = 1, max = 1000))]
    pub preview_rows: usize,
    #[validate(nested)]
    pub llm: LLMConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
            },
            storage: StorageConfig {
                upload_dir: PathBuf::from("uploads"),
                working_file_ttl_secs: 3600,
                max_upload_bytes: 50 * 1024 * 1024,
            },
            preview_rows: 10,
            llm: LLMConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then `datastory.toml`, then `DATASTORY_*`
    /// variables (`__` separates nested keys), then `OPENAI_API_KEY`.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_figment(Self::figment())
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(
                Env::raw()
                    .only(&["OPENAI_API_KEY"])
                    .map(|_| "llm.api_key".into()),
            )
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: AppConfig = figment
            .extract()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;
        config
            .validate()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::from_figment(Figment::from(Serialized::defaults(
            AppConfig::default(),
        )))
        .unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.preview_rows, 10);
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn test_layered_sources() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                    preview_rows = 5

                    [llm]
                    model = "gpt-4o-mini"
                "#,
            )?;
            jail.set_env("DATASTORY_SERVER__PORT", "8080");
            jail.set_env("OPENAI_API_KEY", "sk-test");

            let config = AppConfig::from_figment(AppConfig::figment()).unwrap();
            assert_eq!(config.preview_rows, 5);
            assert_eq!(config.llm.model, "gpt-4o-mini");
            assert_eq!(config.server.port, 8080);
            assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_values_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("DATASTORY_PREVIEW_ROWS", "0");
            let err = AppConfig::from_figment(AppConfig::figment()).unwrap_err();
            assert!(matches!(err, AppError::ConfigError(_)));
            Ok(())
        });
    }
}
