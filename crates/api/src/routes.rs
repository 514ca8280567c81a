use axum::{routing::get, Router};
use chainrest_domain::NetworkIdentity;
use chainrest_infrastructure::{DatabaseManager, NetworkService};
use std::sync::Arc;

use crate::handlers::{
    health::health_check,
    network::{
        get_inflation, get_inflation_at, get_network, get_network_properties, get_rental_fees,
        get_transaction_fees,
    },
};

/// API应用状态
#[derive(Clone)]
pub struct AppState {
    pub network: Arc<NetworkIdentity>,
    pub service: Arc<NetworkService>,
    pub database: Arc<DatabaseManager>,
}

/// 创建API路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        // 健康检查
        .route("/health", get(health_check))
        // 网络属性
        .route("/network", get(get_network))
        .route("/network/properties", get(get_network_properties))
        // 通胀计划
        .route("/network/inflation", get(get_inflation))
        .route("/network/inflation/at/{height}", get(get_inflation_at))
        // 费用
        .route("/network/fees/transaction", get(get_transaction_fees))
        .route("/network/fees/rental", get(get_rental_fees))
        .with_state(state)
}
