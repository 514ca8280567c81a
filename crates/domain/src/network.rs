//! 网络属性解析
//!
//! 将网络属性文件转换为 `GET /network/properties` 的响应视图，并提供插件参数查询。

use std::collections::BTreeMap;

use chainrest_core::{NetworkError, NetworkResult};
use serde::Serialize;
use sha3::{Digest, Sha3_256};

use crate::properties::{parse_sanitized_u64, PropertyDocument, PropertySection};

pub const NETWORK_SECTION: &str = "network";
pub const CHAIN_SECTION: &str = "chain";
pub const FORK_HEIGHTS_SECTION: &str = "fork_heights";
pub const PLUGIN_SECTION_PREFIX: &str = "plugin:catapult.plugins.";
pub const TREASURY_SIGNATURES_SECTION: &str = "treasury_reissuance_transaction_signatures";
pub const CORRUPT_HASHES_SECTION: &str = "corrupt_aggregate_transaction_hashes";

/// 网络标识 (来自服务自身配置)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkIdentity {
    pub name: String,
    pub description: String,
}

/// 网络属性视图
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<PropertySection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<PropertySection>,
    /// 插件名 -> 插件参数
    pub plugins: BTreeMap<String, PropertySection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fork_heights: Option<PropertySection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treasury_reissuance_transaction_signatures: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrupt_aggregate_transaction_hashes: Option<String>,
}

impl NetworkProperties {
    pub fn resolve(document: &PropertyDocument) -> NetworkResult<Self> {
        let plugins: BTreeMap<String, PropertySection> = document
            .sections_with_prefix(PLUGIN_SECTION_PREFIX)
            .map(|(name, section)| (name.to_string(), section.clone()))
            .collect();

        if plugins.is_empty() {
            return Err(NetworkError::missing_section("plugin:catapult"));
        }

        let corrupt_aggregate_transaction_hashes = document
            .section(CORRUPT_HASHES_SECTION)
            .map(corrupt_hashes_digest)
            .transpose()?;

        Ok(Self {
            network: document.section(NETWORK_SECTION).cloned(),
            chain: document.section(CHAIN_SECTION).cloned(),
            plugins,
            fork_heights: document.section(FORK_HEIGHTS_SECTION).cloned(),
            treasury_reissuance_transaction_signatures: document
                .section(TREASURY_SIGNATURES_SECTION)
                .map(treasury_signatures),
            corrupt_aggregate_transaction_hashes,
        })
    }
}

/// 属性值是否为真; 空串、`false` 与 `null` 为假
pub fn is_truthy(value: &str) -> bool {
    !matches!(value.trim(), "" | "false" | "null")
}

/// 国库增发交易签名白名单: 仅保留值为真的签名，按字典序排列
pub fn treasury_signatures(section: &PropertySection) -> Vec<String> {
    let mut signatures: Vec<String> = section
        .iter()
        .filter(|(_, enabled)| is_truthy(enabled))
        .map(|(signature, _)| signature.clone())
        .collect();
    signatures.sort();
    signatures
}

/// 损坏聚合交易哈希集合的指纹
///
/// 每项拼接为 `key + value` 后排序、连接、十六进制解码，再做 SHA3-256。
/// 结果与文件中各项的书写顺序无关。
pub fn corrupt_hashes_digest(section: &PropertySection) -> NetworkResult<String> {
    let mut entries: Vec<String> = section
        .iter()
        .map(|(hash, replacement)| format!("{hash}{replacement}"))
        .collect();
    entries.sort();

    let bytes = hex::decode(entries.concat())
        .map_err(|e| NetworkError::InvalidHex(e.to_string()))?;

    Ok(hex::encode_upper(Sha3_256::digest(&bytes)))
}

/// 读取插件参数并按 u64 解析
pub fn plugin_property_u64(
    document: &PropertyDocument,
    plugin: &str,
    property: &str,
) -> NetworkResult<u64> {
    let section = format!("{PLUGIN_SECTION_PREFIX}{plugin}");
    parse_sanitized_u64(document.value(&section, property)?)
}
