//! IP 기반 요청 제한
//!
//! `RATE_LIMIT_PER_SECOND`, `RATE_LIMIT_BURST`가 설정된 경우에만 API 라우터에 적용됩니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use std::sync::Arc;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorError,
    GovernorLayer,
};

use crate::config::RateLimitConfig;
use crate::utils::ErrorResponse;

/// 설정값으로 Rate Limiter 레이어를 씌운 라우터를 반환합니다.
///
/// - replenish: 초당 `per_second`개 (GovernorConfigBuilder의 주기는 1개당 간격이라 ms로 환산)
/// - 버스트: `burst_size`개
/// - 키: X-Forwarded-For, X-Real-IP, 접속 IP 순
///
/// 설정값이 0이면 레이어 없이 그대로 반환합니다.
pub fn with_rate_limit<S>(router: Router<S>, config: &RateLimitConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if config.per_second == 0 {
        return router;
    }
    let replenish_interval_ms = (1000 / config.per_second).max(1);

    let governor_config = GovernorConfigBuilder::default()
        .per_millisecond(replenish_interval_ms)
        .burst_size(config.burst_size)
        .key_extractor(SmartIpKeyExtractor)
        .error_handler(|err| RateLimitResponse::from(err).into_response())
        .finish();

    match governor_config {
        Some(governor_config) => router.layer(GovernorLayer {
            config: Arc::new(governor_config),
        }),
        None => {
            tracing::warn!(
                per_second = config.per_second,
                burst_size = config.burst_size,
                "invalid rate limit configuration, rate limiting disabled"
            );
            router
        }
    }
}

/// Rate Limit 초과 시 응답
#[derive(Debug)]
struct RateLimitResponse {
    retry_after: Option<u64>,
}

impl From<GovernorError> for RateLimitResponse {
    fn from(err: GovernorError) -> Self {
        match err {
            GovernorError::TooManyRequests { wait_time, .. } => Self {
                retry_after: Some(wait_time),
            },
            _ => Self { retry_after: None },
        }
    }
}

impl IntoResponse for RateLimitResponse {
    fn into_response(self) -> Response {
        tracing::warn!(
            retry_after_secs = ?self.retry_after,
            "Rate limit exceeded"
        );

        let body = ErrorResponse::new(
            "COMMON429",
            "요청이 너무 많습니다. 잠시 후 다시 시도해주세요.",
        );

        let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();

        if let Some(retry_after) = self.retry_after {
            if let Ok(value) = retry_after.to_string().parse() {
                response.headers_mut().insert("Retry-After", value);
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    fn limited(config: RateLimitConfig) -> Router {
        with_rate_limit(Router::new().route("/ping", get(|| async { "pong" })), &config)
    }

    fn request() -> Request<Body> {
        Request::builder()
            .uri("/ping")
            .header("x-forwarded-for", "10.0.0.1")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn requests_over_burst_should_be_rejected() {
        let app = limited(RateLimitConfig {
            per_second: 1,
            burst_size: 1,
        });

        let first = app.clone().oneshot(request()).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app.oneshot(request()).await.unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(second.headers().contains_key("Retry-After"));
    }

    #[tokio::test]
    async fn zero_rate_should_leave_router_unlimited() {
        let app = limited(RateLimitConfig {
            per_second: 0,
            burst_size: 1,
        });

        for _ in 0..3 {
            let response = app.clone().oneshot(request()).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[test]
    fn rate_limit_response_should_include_retry_after_header() {
        let response = RateLimitResponse {
            retry_after: Some(30),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let retry_after = response.headers().get("Retry-After");
        assert_eq!(retry_after.unwrap().to_str().unwrap(), "30");
    }

    #[test]
    fn rate_limit_response_without_retry_after_should_work() {
        let response = RateLimitResponse { retry_after: None }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().get("Retry-After").is_none());
    }
}
