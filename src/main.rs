use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chainrest::{app::Application, shutdown::ShutdownManager};
use chainrest_core::{init_logging, AppConfig, LogFormat};
use clap::{Arg, Command};
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let matches = Command::new("chainrest")
        .version(env!("CARGO_PKG_VERSION"))
        .about("区块链节点网络属性与费用统计 REST 服务")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("配置文件路径 (未指定时按默认路径查找)"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("日志级别")
                .value_parser(["trace", "debug", "info", "warn", "error"]),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_name("FORMAT")
                .help("日志格式")
                .value_parser(["json", "pretty", "compact"]),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config");

    // 加载配置
    let mut config = AppConfig::load(config_path.map(String::as_str))
        .with_context(|| format!("加载配置失败: {}", config_path.map_or("<默认>", String::as_str)))?;

    // 命令行参数覆盖配置
    if let Some(level) = matches.get_one::<String>("log-level") {
        config.observability.log_level = level.clone();
    }
    if let Some(format) = matches.get_one::<String>("log-format") {
        config.observability.log_format = format.parse::<LogFormat>()?;
    }

    // 初始化日志系统
    init_logging(&config.observability).context("初始化日志系统失败")?;

    info!("启动 chainrest 服务");
    if let Some(path) = config_path {
        info!("配置文件: {path}");
    }

    let app = Arc::new(Application::new(config).await?);

    // 创建优雅关闭管理器
    let shutdown_manager = ShutdownManager::new();

    let app_handle = {
        let shutdown_rx = shutdown_manager.subscribe().await;
        let app = Arc::clone(&app);

        tokio::spawn(async move {
            if let Err(e) = app.run(shutdown_rx).await {
                error!("应用运行失败: {e:#}");
            }
        })
    };

    // 等待关闭信号
    wait_for_shutdown_signal().await;

    info!("收到关闭信号，开始优雅关闭...");
    shutdown_manager.shutdown().await;

    // 等待应用关闭，设置超时
    match tokio::time::timeout(Duration::from_secs(30), app_handle).await {
        Ok(Ok(())) => info!("应用已优雅关闭"),
        Ok(Err(e)) => error!("应用关闭时发生错误: {e}"),
        Err(_) => warn!("应用关闭超时，强制退出"),
    }

    info!("chainrest 服务已退出");
    Ok(())
}

/// 等待关闭信号
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("安装Ctrl+C信号处理器失败: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("安装SIGTERM信号处理器失败: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("收到Ctrl+C信号");
        },
        _ = terminate => {
            info!("收到SIGTERM信号");
        },
    }
}
