//! # Chainrest API
//!
//! 网络属性 REST 接口，基于 Axum 构建。
//!
//! ## API 端点
//!
//! - `GET /health` - 健康检查 (含数据库连通性，不可用时返回 503)
//! - `GET /network` - 网络名称与描述
//! - `GET /network/properties` - 网络、链与插件属性
//! - `GET /network/inflation` - 通胀计划
//! - `GET /network/inflation/at/{height}` - 指定高度的通胀拐点
//! - `GET /network/fees/transaction` - 交易费用乘数统计
//! - `GET /network/fees/rental` - 命名空间与马赛克的有效租赁费用
//!
//! ## 错误响应
//!
//! 属性文件相关的失败返回 409:
//!
//! ```json
//! { "code": "InvalidArgument", "message": "there was an error reading the network properties file" }
//! ```
//!
//! 其他失败返回 500，`code` 为 `Internal`。

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;

use axum::Router;
use chainrest_core::ApiConfig;
use chainrest_domain::NetworkIdentity;
use chainrest_infrastructure::{DatabaseManager, NetworkService};
use std::sync::Arc;
use tower::ServiceBuilder;

use middleware::{cors_layer, request_logging, trace_layer};
use routes::{create_routes, AppState};

/// 创建完整的API应用
pub fn create_app(
    network: NetworkIdentity,
    service: Arc<NetworkService>,
    database: Arc<DatabaseManager>,
    api_config: &ApiConfig,
) -> Router {
    let state = AppState {
        network: Arc::new(network),
        service,
        database,
    };

    create_routes(state).layer(
        ServiceBuilder::new()
            .layer(trace_layer())
            .layer(cors_layer(api_config))
            .layer(axum::middleware::from_fn(request_logging)),
    )
}
