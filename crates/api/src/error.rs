use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chainrest_core::NetworkError;
use serde_json::json;
use tracing::{error, warn};

pub const NETWORK_PROPERTIES_ERROR: &str = "there was an error reading the network properties file";
pub const INFLATION_PROPERTIES_ERROR: &str = "there was an error reading the inflation properties file";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 对外只返回固定消息，具体原因写入日志
    #[error("{0}")]
    InvalidArgument(&'static str),

    #[error("网络属性服务错误: {0}")]
    Network(#[from] NetworkError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// 文件读取、解析与派生失败映射为参数错误，其余保持内部错误
    pub fn from_file_error(err: NetworkError, message: &'static str) -> Self {
        if err.is_file_related() {
            warn!(error = %err, "{}", message);
            ApiError::InvalidArgument(message)
        } else {
            ApiError::Network(err)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::InvalidArgument(message) => {
                (StatusCode::CONFLICT, "InvalidArgument", message.to_string())
            }
            ApiError::Network(err) => {
                error!("请求处理失败: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal", err.to_string())
            }
        };

        (status, Json(json!({ "code": code, "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_errors_become_invalid_argument() {
        let err = ApiError::from_file_error(NetworkError::EmptySchedule, INFLATION_PROPERTIES_ERROR);
        assert!(matches!(err, ApiError::InvalidArgument(INFLATION_PROPERTIES_ERROR)));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_other_errors_stay_internal() {
        let err = ApiError::from_file_error(
            NetworkError::Internal("连接中断".to_string()),
            NETWORK_PROPERTIES_ERROR,
        );
        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
