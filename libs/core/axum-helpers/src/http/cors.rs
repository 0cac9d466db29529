use axum::http::{HeaderValue, Method, header};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// CORS layer for an explicit list of origins.
///
/// Allows the methods the REST API exposes plus `OPTIONS`, JSON content
/// headers and a one hour preflight cache. Fails on the first origin that is
/// not a valid header value.
pub fn create_cors_layer<S: AsRef<str>>(
    allowed_origins: &[S],
) -> Result<CorsLayer, axum::http::header::InvalidHeaderValue> {
    let origins = allowed_origins
        .iter()
        .map(|o| HeaderValue::from_str(o.as_ref().trim()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600)))
}
