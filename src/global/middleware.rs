use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::utils::client_ip;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 요청 단위 식별자 (request extension)
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// 요청마다 request_id span을 열고 응답 헤더에 같은 값을 돌려줍니다.
///
/// 클라이언트가 보낸 `x-request-id`가 있으면 그대로 사용합니다.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let client_ip = client_ip::resolve(request.headers(), request.extensions())
        .unwrap_or_else(|| "-".to_string());

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %path,
        client_ip = %client_ip,
    );

    let start = std::time::Instant::now();

    async move {
        let mut response = next.run(request).await;

        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            status = response.status().as_u16(),
            "request completed"
        );

        response.headers_mut().insert(
            REQUEST_ID_HEADER,
            HeaderValue::from_str(&request_id)
                .unwrap_or_else(|_| HeaderValue::from_static("unknown")),
        );
        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request as HttpRequest, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(middleware::from_fn(request_id_middleware))
    }

    #[tokio::test]
    async fn should_echo_incoming_request_id() {
        let response = app()
            .oneshot(
                HttpRequest::builder()
                    .uri("/ping")
                    .header(REQUEST_ID_HEADER, "req-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(REQUEST_ID_HEADER).unwrap(),
            "req-123"
        );
    }

    #[tokio::test]
    async fn should_generate_request_id_when_missing() {
        let response = app()
            .oneshot(HttpRequest::builder().uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let value = response.headers().get(REQUEST_ID_HEADER).unwrap();
        assert!(Uuid::parse_str(value.to_str().unwrap()).is_ok());
    }
}
