use serde::{Deserialize, Serialize};

/// Static network identity served by `GET /network`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkIdentityConfig {
    pub name: String,
    pub description: String,
}

/// Locations of the node property files the API derives its payloads from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiNodeConfig {
    /// Network (chain-wide) properties, parsed once per process
    pub network_property_file_path: String,
    /// Node-local properties, re-parsed whenever the file changes
    pub node_property_file_path: String,
    /// Inflation schedule properties, parsed once per process
    pub inflation_property_file_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeStatsConfig {
    /// Number of most recent blocks sampled for transaction fee statistics.
    /// Zero is treated as one.
    pub num_blocks_transaction_fee_stats: u32,
}

impl Default for NetworkIdentityConfig {
    fn default() -> Self {
        Self {
            name: "testnet".to_string(),
            description: "catapult development network".to_string(),
        }
    }
}

impl Default for ApiNodeConfig {
    fn default() -> Self {
        Self {
            network_property_file_path: "resources/config-network.properties".to_string(),
            node_property_file_path: "resources/config-node.properties".to_string(),
            inflation_property_file_path: "resources/config-inflation.properties".to_string(),
        }
    }
}

impl Default for FeeStatsConfig {
    fn default() -> Self {
        Self {
            num_blocks_transaction_fee_stats: 300,
        }
    }
}

impl NetworkIdentityConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.name.is_empty() {
            return Err(anyhow::anyhow!("网络名称不能为空"));
        }

        Ok(())
    }
}

impl ApiNodeConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        let paths = [
            ("network_property_file_path", &self.network_property_file_path),
            ("node_property_file_path", &self.node_property_file_path),
            ("inflation_property_file_path", &self.inflation_property_file_path),
        ];

        for (name, path) in paths {
            if path.is_empty() {
                return Err(anyhow::anyhow!("属性文件路径不能为空: {}", name));
            }
        }

        Ok(())
    }
}

impl FeeStatsConfig {
    /// Sample count actually queried; an unset (zero) value falls back to one block
    pub fn effective_num_blocks(&self) -> u32 {
        self.num_blocks_transaction_fee_stats.max(1)
    }
}
