use std::collections::BTreeMap;

use async_trait::async_trait;
use chainrest_core::NetworkResult;
use chainrest_domain::BlockRepository;
use tokio::sync::RwLock;

/// 内存区块仓储
///
/// 高度 -> 费用乘数，适用于测试与嵌入式部署。
#[derive(Debug, Default)]
pub struct InMemoryBlockRepository {
    blocks: RwLock<BTreeMap<u64, u32>>,
}

impl InMemoryBlockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按高度顺序依次填充
    pub fn with_fee_multipliers(multipliers: impl IntoIterator<Item = u32>) -> Self {
        let blocks = (1u64..).zip(multipliers).collect();
        Self {
            blocks: RwLock::new(blocks),
        }
    }

    pub async fn save_block(&self, height: u64, fee_multiplier: u32) {
        self.blocks.write().await.insert(height, fee_multiplier);
    }
}

#[async_trait]
impl BlockRepository for InMemoryBlockRepository {
    async fn latest_blocks_fee_multiplier(&self, count: u32) -> NetworkResult<Vec<u32>> {
        let blocks = self.blocks.read().await;
        Ok(blocks
            .values()
            .rev()
            .take(count as usize)
            .copied()
            .collect())
    }
}
