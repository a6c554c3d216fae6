use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::request::Parts;
use axum::http::{Extensions, HeaderMap};

const FORWARDED_FOR: &str = "x-forwarded-for";

/// 호출자 IP (best-effort)
///
/// `X-Forwarded-For`의 첫 항목을 우선하고, 없으면 커넥션 peer 주소를 사용합니다.
pub fn client_ip(parts: &Parts) -> Option<String> {
    resolve(&parts.headers, &parts.extensions)
}

pub fn resolve(headers: &HeaderMap, extensions: &Extensions) -> Option<String> {
    forwarded_for(headers).or_else(|| {
        extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
    })
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = value {
            builder = builder.header(FORWARDED_FOR, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn should_take_first_forwarded_address() {
        let parts = parts_with_header(Some("203.0.113.7, 10.0.0.1"));
        assert_eq!(client_ip(&parts).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn should_fall_back_to_peer_address() {
        let mut parts = parts_with_header(None);
        parts
            .extensions
            .insert(ConnectInfo(SocketAddr::from(([192, 168, 0, 5], 41000))));

        assert_eq!(client_ip(&parts).as_deref(), Some("192.168.0.5"));
    }

    #[test]
    fn should_ignore_empty_forwarded_header() {
        let parts = parts_with_header(Some("  "));
        assert_eq!(client_ip(&parts), None);
    }
}
