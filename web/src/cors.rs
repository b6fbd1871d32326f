//! CORS configuration for browser clients.
//!
//! Dispatch front ends are served from a different origin than the API during
//! development, so every response carries the CORS headers they need.

use axum::http::{
    header::{ACCEPT, CONTENT_TYPE, ORIGIN},
    HeaderName, HeaderValue, Method,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Build a CORS layer allowing `GET`, `POST` and `OPTIONS`.
///
/// `allowed_origin` is either `*` (any origin) or one exact origin such as
/// `http://localhost:5173`.
///
/// # Errors
///
/// Returns an error if `allowed_origin` is not a valid header value.
pub fn cors_layer(
    allowed_origin: &str,
) -> Result<CorsLayer, axum::http::header::InvalidHeaderValue> {
    let origin = if allowed_origin.trim() == "*" {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::exact(HeaderValue::from_str(allowed_origin.trim())?)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            ORIGIN,
            HeaderName::from_static("x-requested-with"),
            CONTENT_TYPE,
            ACCEPT,
        ]))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    fn app(origin: &str) -> Router {
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(cors_layer(origin).unwrap())
    }

    #[tokio::test]
    async fn test_any_origin_is_allowed() {
        let request = Request::builder()
            .uri("/ping")
            .header(ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap();

        let response = app("*").oneshot(request).await.unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_exact_origin_is_echoed() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/ping")
            .header(ORIGIN, "http://dispatch.local")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();

        let response = app("http://dispatch.local").oneshot(request).await.unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://dispatch.local"
        );
        let methods = response
            .headers()
            .get("access-control-allow-methods")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(methods.contains("POST"));
    }

    #[test]
    fn test_invalid_origin_is_rejected() {
        assert!(cors_layer("bad\norigin").is_err());
    }
}
