use axum::{
    extract::Request,
    http::{HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use chainrest_core::ApiConfig;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    info!("开始处理请求: {} {}", method, uri);

    let response = next.run(request).await;
    let duration = start.elapsed();

    info!(
        "完成请求处理: {} {} - 状态: {} - 耗时: {:?}",
        method,
        uri,
        response.status(),
        duration
    );

    response
}

/// 未启用时返回不放行任何来源的空配置
pub fn cors_layer(config: &ApiConfig) -> CorsLayer {
    if !config.cors_enabled {
        return CorsLayer::new();
    }

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    if config.cors_origins.iter().any(|origin| origin == "*") {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn trace_layer(
) -> TraceLayer<tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>>
{
    TraceLayer::new_for_http()
}
