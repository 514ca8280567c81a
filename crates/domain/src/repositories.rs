use async_trait::async_trait;
use chainrest_core::NetworkResult;

/// 区块数据仓储
#[async_trait]
pub trait BlockRepository: Send + Sync {
    /// 最近 `count` 个区块的费用乘数，按高度从新到旧
    async fn latest_blocks_fee_multiplier(&self, count: u32) -> NetworkResult<Vec<u32>>;
}
