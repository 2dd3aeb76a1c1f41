//! 路由组装和 HTTP 中间件

use std::any::Any;

use axum::Router;
use axum::response::{IntoResponse, Response};
use http::{HeaderName, HeaderValue};
use shared::error::{AppError, ErrorCode};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api;
use crate::core::ServerState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// 每个请求生成一个 UUID v4 作为 x-request-id
#[derive(Clone, Copy)]
struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// 处理器 panic 时返回 500 + 统一错误体
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    tracing::error!(panic = %detail, "Request handler panicked");
    AppError::new(ErrorCode::InternalError).into_response()
}

/// 所有路由 (无中间件、无状态)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(api::products::router())
        .merge(api::carts::router())
        .merge(api::ws_router())
        .merge(api::health::router())
}

/// 完整应用: 路由 + tower-http 中间件
///
/// 服务器和集成测试共用。浏览器页面与 API 可能不同源，CORS 全放开。
pub fn build_app() -> Router<ServerState> {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    build_router()
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        // Router::layer 后加的在外层: 先生成 id，再回写到响应头
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, UuidRequestId))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::routing::get;
    use http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn boom() -> StatusCode {
        panic!("boom")
    }

    #[tokio::test]
    async fn test_handler_panic_becomes_internal_error() {
        let app: Router = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(panic_response));

        let response = app
            .oneshot(Request::get("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], 9001);
        assert_eq!(body["message"], "Internal server error");
    }
}
