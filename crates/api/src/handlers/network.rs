use axum::{
    extract::{Path, State},
    Json,
};
use chainrest_domain::{
    InflationPointView, NetworkIdentity, NetworkProperties, RentalFees, TransactionFeeStats,
};
use tracing::warn;

use crate::error::{ApiError, ApiResult, INFLATION_PROPERTIES_ERROR, NETWORK_PROPERTIES_ERROR};
use crate::routes::AppState;

pub async fn get_network(State(state): State<AppState>) -> Json<NetworkIdentity> {
    Json(state.network.as_ref().clone())
}

pub async fn get_network_properties(
    State(state): State<AppState>,
) -> ApiResult<Json<NetworkProperties>> {
    state
        .service
        .network_properties()
        .await
        .map(Json)
        .map_err(|e| ApiError::from_file_error(e, NETWORK_PROPERTIES_ERROR))
}

pub async fn get_inflation(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<InflationPointView>>> {
    state
        .service
        .inflation_points()
        .await
        .map(Json)
        .map_err(|e| ApiError::from_file_error(e, INFLATION_PROPERTIES_ERROR))
}

pub async fn get_inflation_at(
    State(state): State<AppState>,
    Path(height): Path<String>,
) -> ApiResult<Json<InflationPointView>> {
    let height = height.trim().parse::<u64>().map_err(|e| {
        warn!("无效的区块高度 '{}': {}", height, e);
        ApiError::InvalidArgument(INFLATION_PROPERTIES_ERROR)
    })?;

    state
        .service
        .inflation_at(height)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_file_error(e, INFLATION_PROPERTIES_ERROR))
}

/// 任何失败都按内部错误返回
pub async fn get_transaction_fees(
    State(state): State<AppState>,
) -> ApiResult<Json<TransactionFeeStats>> {
    Ok(Json(state.service.transaction_fees().await?))
}

pub async fn get_rental_fees(State(state): State<AppState>) -> ApiResult<Json<RentalFees>> {
    state
        .service
        .rental_fees()
        .await
        .map(Json)
        .map_err(|e| ApiError::from_file_error(e, NETWORK_PROPERTIES_ERROR))
}
