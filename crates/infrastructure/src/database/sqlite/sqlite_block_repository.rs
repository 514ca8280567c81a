use async_trait::async_trait;
use chainrest_core::{NetworkError, NetworkResult};
use chainrest_domain::BlockRepository;
use sqlx::{Row, SqlitePool};
use tracing::debug;

pub struct SqliteBlockRepository {
    pool: SqlitePool,
}

impl SqliteBlockRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 写入或覆盖区块的费用乘数
    pub async fn save_block(&self, height: u64, fee_multiplier: u32) -> NetworkResult<()> {
        let height = i64::try_from(height)
            .map_err(|_| NetworkError::Overflow(format!("区块高度超出范围: {height}")))?;

        sqlx::query(
            r#"
            INSERT INTO blocks (height, fee_multiplier)
            VALUES ($1, $2)
            ON CONFLICT(height) DO UPDATE SET fee_multiplier = excluded.fee_multiplier
            "#,
        )
        .bind(height)
        .bind(i64::from(fee_multiplier))
        .execute(&self.pool)
        .await
        .map_err(NetworkError::Database)?;

        debug!("保存区块费用乘数: height={}, multiplier={}", height, fee_multiplier);
        Ok(())
    }
}

#[async_trait]
impl BlockRepository for SqliteBlockRepository {
    async fn latest_blocks_fee_multiplier(&self, count: u32) -> NetworkResult<Vec<u32>> {
        let rows = sqlx::query("SELECT fee_multiplier FROM blocks ORDER BY height DESC LIMIT $1")
            .bind(i64::from(count))
            .fetch_all(&self.pool)
            .await
            .map_err(NetworkError::Database)?;

        let multipliers = rows
            .iter()
            .map(|row| {
                let value: i64 = row.try_get("fee_multiplier")?;
                u32::try_from(value).map_err(|_| {
                    NetworkError::Internal(format!("区块费用乘数超出范围: {value}"))
                })
            })
            .collect::<NetworkResult<Vec<_>>>()?;

        debug!("查询最近 {} 个区块的费用乘数, 返回 {} 条", count, multipliers.len());
        Ok(multipliers)
    }
}
