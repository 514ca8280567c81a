use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::routes::AppState;

/// 健康检查，数据库不可用时返回 503
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (code, status, database) = match state.database.health_check().await {
        Ok(()) => (StatusCode::OK, "ok", "up"),
        Err(e) => {
            warn!("数据库健康检查失败: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "down")
        }
    };

    let body = json!({
        "status": status,
        "database": database,
        "network": state.network.name,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": "chainrest",
        "version": env!("CARGO_PKG_VERSION")
    });

    (code, Json(body))
}
