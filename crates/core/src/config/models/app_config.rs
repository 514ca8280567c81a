use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{
    api_observability::{ApiConfig, ObservabilityConfig},
    database::DatabaseConfig,
    network::{ApiNodeConfig, FeeStatsConfig, NetworkIdentityConfig},
};

/// Default config file locations searched when no path is given
const DEFAULT_CONFIG_PATHS: [&str; 3] = [
    "config/chainrest.toml",
    "chainrest.toml",
    "/etc/chainrest/config.toml",
];

/// System configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub network: NetworkIdentityConfig,
    pub api_node: ApiNodeConfig,
    pub fees: FeeStatsConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load configuration from config file and environment variables
    ///
    /// Load order:
    /// 1. Default configuration
    /// 2. Config file (TOML format)
    /// 3. Environment variable overrides (prefix: CHAINREST__, e.g. `CHAINREST__API__BIND_ADDRESS`)
    ///
    /// # Arguments
    ///
    /// * `config_path` - Config file path, if None use default paths
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = ConfigBuilder::builder()
            .set_default("network.name", "testnet")?
            .set_default("network.description", "catapult development network")?
            .set_default(
                "api_node.network_property_file_path",
                "resources/config-network.properties",
            )?
            .set_default(
                "api_node.node_property_file_path",
                "resources/config-node.properties",
            )?
            .set_default(
                "api_node.inflation_property_file_path",
                "resources/config-inflation.properties",
            )?
            .set_default("fees.num_blocks_transaction_fee_stats", 300)?
            .set_default("database.url", "sqlite://chainrest.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connection_timeout_seconds", 30)?
            .set_default("api.bind_address", "0.0.0.0:3000")?
            .set_default("api.cors_enabled", true)?
            .set_default("api.cors_origins", vec!["*"])?
            .set_default("observability.log_level", "info")?
            .set_default("observability.log_format", "pretty")?;

        // 1. Load config file if provided
        if let Some(path) = config_path {
            if Path::new(path).exists() {
                builder = builder.add_source(File::new(path, FileFormat::Toml));
            } else {
                return Err(anyhow::anyhow!("配置文件不存在: {}", path));
            }
        } else if let Some(path) = DEFAULT_CONFIG_PATHS
            .iter()
            .find(|path| Path::new(path).exists())
        {
            builder = builder.add_source(File::new(path, FileFormat::Toml));
        }

        // 2. Environment variable overrides - highest priority
        builder = builder.add_source(
            Environment::with_prefix("CHAINREST")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder
            .build()
            .context("构建配置失败")?
            .try_deserialize()
            .context("反序列化配置失败")?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(toml_str).context("解析TOML配置失败")?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("序列化配置为TOML失败")
    }

    /// Validate configuration effectiveness
    pub fn validate(&self) -> Result<()> {
        self.network.validate().context("网络配置验证失败")?;
        self.api_node.validate().context("属性文件配置验证失败")?;
        self.database.validate().context("数据库配置验证失败")?;
        self.api.validate().context("API配置验证失败")?;
        self.observability
            .validate()
            .context("可观测性配置验证失败")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;
    use std::io::Write;

    const SAMPLE_CONFIG: &str = r#"
[network]
name = "mainnet"
description = "public main network"

[api_node]
network_property_file_path = "/opt/node/config-network.properties"
node_property_file_path = "/opt/node/config-node.properties"
inflation_property_file_path = "/opt/node/config-inflation.properties"

[fees]
num_blocks_transaction_fee_stats = 0

[database]
url = "sqlite::memory:"
max_connections = 4
min_connections = 1
connection_timeout_seconds = 5

[api]
bind_address = "127.0.0.1:3000"
cors_enabled = false
cors_origins = []

[observability]
log_level = "debug"
log_format = "json"
"#;

    #[test]
    fn test_from_toml() {
        let config = AppConfig::from_toml(SAMPLE_CONFIG).unwrap();

        assert_eq!(config.network.name, "mainnet");
        assert_eq!(
            config.api_node.node_property_file_path,
            "/opt/node/config-node.properties"
        );
        assert_eq!(config.fees.num_blocks_transaction_fee_stats, 0);
        assert_eq!(config.fees.effective_num_blocks(), 1);
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_toml_roundtrip_keeps_paths() {
        let config = AppConfig::from_toml(SAMPLE_CONFIG).unwrap();
        let serialized = config.to_toml().unwrap();
        let reparsed = AppConfig::from_toml(&serialized).unwrap();

        assert_eq!(
            reparsed.api_node.inflation_property_file_path,
            config.api_node.inflation_property_file_path
        );
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.database.url = "postgres://localhost/db".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.api.bind_address = "localhost".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.api_node.inflation_property_file_path.clear();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.observability.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(SAMPLE_CONFIG.as_bytes()).unwrap();

        let config = AppConfig::load(Some(file.path().to_str().unwrap())).unwrap();
        assert_eq!(config.network.description, "public main network");
        assert_eq!(config.database.max_connections, 4);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = AppConfig::load(Some("/definitely/not/here/chainrest.toml"));
        assert!(result.is_err());
    }
}
