//! 费用统计
//!
//! 区块费用乘数样本中的 0 表示"使用链默认值"。平均值与中位数基于替换默认值后的样本，
//! 最高与最低值基于原始样本。全部计算使用无符号整数，结果向下取整。

use chainrest_core::{NetworkError, NetworkResult};
use serde::Serialize;

use crate::network::{plugin_property_u64, CHAIN_SECTION};
use crate::properties::{parse_sanitized_u32, parse_sanitized_u64, PropertyDocument};

pub const NODE_SECTION: &str = "node";

/// 将 0 样本替换为默认乘数
pub fn apply_default(samples: &[u32], default_multiplier: u32) -> Vec<u32> {
    samples
        .iter()
        .map(|&sample| if sample == 0 { default_multiplier } else { sample })
        .collect()
}

pub fn average(samples: &[u32]) -> Option<u32> {
    if samples.is_empty() {
        return None;
    }

    let sum: u64 = samples.iter().map(|&sample| u64::from(sample)).sum();
    // 平均值不会超过最大样本
    Some((sum / samples.len() as u64) as u32)
}

/// 中位数; 偶数个样本时取中间两值均值并向下取整
pub fn median(samples: &[u32]) -> Option<u32> {
    if samples.is_empty() {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_unstable();

    let middle = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        let sum = u64::from(sorted[middle - 1]) + u64::from(sorted[middle]);
        Some((sum / 2) as u32)
    } else {
        Some(sorted[middle])
    }
}

/// 费用乘数汇总统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeMultiplierStats {
    pub average: Option<u32>,
    pub median: Option<u32>,
    pub highest: Option<u32>,
    pub lowest: Option<u32>,
}

impl FeeMultiplierStats {
    pub fn from_samples(samples: &[u32], default_multiplier: u32) -> Self {
        let defaulted = apply_default(samples, default_multiplier);

        Self {
            average: average(&defaulted),
            median: median(&defaulted),
            highest: samples.iter().copied().max(),
            lowest: samples.iter().copied().min(),
        }
    }
}

/// `GET /network/fees/transaction` 响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFeeStats {
    pub average_fee_multiplier: Option<u32>,
    pub median_fee_multiplier: Option<u32>,
    pub highest_fee_multiplier: Option<u32>,
    pub lowest_fee_multiplier: Option<u32>,
    pub min_fee_multiplier: u64,
}

impl TransactionFeeStats {
    pub fn compute(
        samples: &[u32],
        network: &PropertyDocument,
        node: &PropertyDocument,
    ) -> NetworkResult<Self> {
        let stats = FeeMultiplierStats::from_samples(samples, default_dynamic_fee_multiplier(network)?);

        Ok(Self {
            average_fee_multiplier: stats.average,
            median_fee_multiplier: stats.median,
            highest_fee_multiplier: stats.highest,
            lowest_fee_multiplier: stats.lowest,
            min_fee_multiplier: min_fee_multiplier(node)?,
        })
    }
}

/// `GET /network/fees/rental` 响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalFees {
    pub effective_root_namespace_rental_fee_per_block: String,
    pub effective_child_namespace_rental_fee: String,
    pub effective_mosaic_rental_fee: String,
}

impl RentalFees {
    /// `samples` 为最近 `max_difficulty_blocks` 个区块的乘数
    pub fn compute(samples: &[u32], network: &PropertyDocument) -> NetworkResult<Self> {
        let default_multiplier = default_dynamic_fee_multiplier(network)?;
        let multiplier = median(&apply_default(samples, default_multiplier)).unwrap_or(default_multiplier);

        let root = plugin_property_u64(network, "namespace", "rootNamespaceRentalFeePerBlock")?;
        let child = plugin_property_u64(network, "namespace", "childNamespaceRentalFee")?;
        let mosaic = plugin_property_u64(network, "mosaic", "mosaicRentalFee")?;

        Ok(Self {
            effective_root_namespace_rental_fee_per_block: effective_fee(root, multiplier)?.to_string(),
            effective_child_namespace_rental_fee: effective_fee(child, multiplier)?.to_string(),
            effective_mosaic_rental_fee: effective_fee(mosaic, multiplier)?.to_string(),
        })
    }
}

/// 基础费用乘以中位乘数，溢出视为错误
pub fn effective_fee(base_fee: u64, multiplier: u32) -> NetworkResult<u64> {
    base_fee
        .checked_mul(u64::from(multiplier))
        .ok_or_else(|| NetworkError::Overflow(format!("{base_fee} x {multiplier}")))
}

pub fn default_dynamic_fee_multiplier(network: &PropertyDocument) -> NetworkResult<u32> {
    parse_sanitized_u32(network.value(CHAIN_SECTION, "defaultDynamicFeeMultiplier")?)
}

/// 计算租赁费用时采样的区块数; 为 0 或无法解析时取 1
pub fn max_difficulty_blocks(network: &PropertyDocument) -> NetworkResult<u32> {
    let raw = network.value(CHAIN_SECTION, "maxDifficultyBlocks")?;
    Ok(parse_sanitized_u32(raw).ok().filter(|&blocks| blocks > 0).unwrap_or(1))
}

/// 节点配置中的最低费用乘数，去掉 `'` 分隔符后解析
pub fn min_fee_multiplier(node: &PropertyDocument) -> NetworkResult<u64> {
    let raw = node.value(NODE_SECTION, "minFeeMultiplier")?;
    let value = raw.replace('\'', "");
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| NetworkError::invalid_number(raw, e))
}
