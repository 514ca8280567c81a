use std::time::Duration;

use chainrest_core::{DatabaseConfig, NetworkError, NetworkResult};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::sqlite::SqliteBlockRepository;

const CREATE_BLOCKS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS blocks (
    height INTEGER PRIMARY KEY,
    fee_multiplier INTEGER NOT NULL
)
"#;

/// SQLite 连接池管理
pub struct DatabaseManager {
    pool: SqlitePool,
}

impl DatabaseManager {
    pub async fn new(config: &DatabaseConfig) -> NetworkResult<Self> {
        info!("连接数据库: {}", config.url);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(NetworkError::Database)?;

        Ok(Self { pool })
    }

    /// 直接使用连接字符串创建，主要用于测试
    pub async fn connect(url: &str, max_connections: u32) -> NetworkResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(NetworkError::Database)?;

        Ok(Self { pool })
    }

    /// 创建区块表 (已存在时跳过)
    pub async fn bootstrap(&self) -> NetworkResult<()> {
        sqlx::query(CREATE_BLOCKS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(NetworkError::Database)?;

        debug!("区块表初始化完成");
        Ok(())
    }

    pub async fn health_check(&self) -> NetworkResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(NetworkError::Database)?;
        Ok(())
    }

    pub fn block_repository(&self) -> SqliteBlockRepository {
        SqliteBlockRepository::new(self.pool.clone())
    }

    pub async fn close(&self) {
        self.pool.close().await
    }
}
