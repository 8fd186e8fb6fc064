use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use subtle::ConstantTimeEq;

use crate::config::get_config;

/// Shared-secret guard for the admin review endpoints. The key is
/// compared in constant time.
pub async fn require_admin_key(req: Request<Body>, next: Next) -> Response {
    let provided = req
        .headers()
        .get("x-admin-key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let expected = get_config().admin_api_key.as_bytes();

    if bool::from(provided.as_bytes().ct_eq(expected)) {
        next.run(req).await
    } else {
        (StatusCode::UNAUTHORIZED, "invalid_admin_key").into_response()
    }
}
