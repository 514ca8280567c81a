use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use chainrest_api::create_app;
use chainrest_core::AppConfig;
use chainrest_domain::{BlockRepository, NetworkIdentity};
use chainrest_infrastructure::{DatabaseManager, NetworkService};
use tokio::{net::TcpListener, sync::broadcast};
use tracing::info;

/// 主应用程序
pub struct Application {
    config: AppConfig,
    database: Arc<DatabaseManager>,
    router: Router,
}

impl Application {
    pub async fn new(config: AppConfig) -> Result<Self> {
        info!("初始化应用程序: 网络 {}", config.network.name);

        let database = Arc::new(
            DatabaseManager::new(&config.database)
                .await
                .context("创建数据库连接池失败")?,
        );
        database.bootstrap().await.context("初始化数据库表失败")?;

        let blocks: Arc<dyn BlockRepository> = Arc::new(database.block_repository());
        let service = NetworkService::new(config.api_node.clone(), config.fees.clone(), blocks);

        let identity = NetworkIdentity {
            name: config.network.name.clone(),
            description: config.network.description.clone(),
        };
        let router = create_app(
            identity,
            Arc::new(service),
            Arc::clone(&database),
            &config.api,
        );

        Ok(Self {
            config,
            database,
            router,
        })
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// 启动HTTP服务，收到关闭信号后停止接收新请求并关闭连接池
    pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        let listener = TcpListener::bind(&self.config.api.bind_address)
            .await
            .with_context(|| format!("绑定地址失败: {}", self.config.api.bind_address))?;

        info!("API服务器启动在: {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("API服务器收到关闭信号");
            })
            .await
            .context("API服务器运行失败")?;

        self.database.close().await;
        info!("API服务器已停止");
        Ok(())
    }
}
