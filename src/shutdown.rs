use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

/// 优雅关闭管理器
pub struct ShutdownManager {
    /// 关闭信号发送器
    shutdown_tx: Arc<RwLock<Option<broadcast::Sender<()>>>>,
    /// 是否已经关闭
    is_shutdown: Arc<RwLock<bool>>,
}

impl ShutdownManager {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(16);

        Self {
            shutdown_tx: Arc::new(RwLock::new(Some(shutdown_tx))),
            is_shutdown: Arc::new(RwLock::new(false)),
        }
    }

    /// 订阅关闭信号
    pub async fn subscribe(&self) -> broadcast::Receiver<()> {
        let shutdown_tx = self.shutdown_tx.read().await;
        if let Some(ref tx) = *shutdown_tx {
            tx.subscribe()
        } else {
            // 已经关闭，返回立即触发的接收器
            let (tx, rx) = broadcast::channel(1);
            let _ = tx.send(());
            rx
        }
    }

    /// 触发关闭，重复调用无效果
    pub async fn shutdown(&self) {
        let mut is_shutdown = self.is_shutdown.write().await;
        if *is_shutdown {
            debug!("关闭管理器已经触发过关闭");
            return;
        }

        info!("触发系统关闭");
        *is_shutdown = true;

        let mut shutdown_tx = self.shutdown_tx.write().await;
        if let Some(tx) = shutdown_tx.take() {
            debug!("发送关闭信号给 {} 个订阅者", tx.receiver_count());
            // 没有订阅者时发送失败，可以忽略
            let _ = tx.send(());
        }

        info!("关闭信号已发送");
    }

    pub async fn is_shutdown(&self) -> bool {
        *self.is_shutdown.read().await
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ShutdownManager {
    fn clone(&self) -> Self {
        Self {
            shutdown_tx: Arc::clone(&self.shutdown_tx),
            is_shutdown: Arc::clone(&self.is_shutdown),
        }
    }
}
