use http::Method;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Build the CORS layer for the browser front-end.
///
/// Pass "*" in the origins list to allow all origins. Other entries match
/// as origin prefixes, so `http://localhost` also admits
/// `http://localhost:5173`.
pub fn build_cors_layer(cors_origins: Vec<String>) -> CorsLayer {
    let allow_all_origins = cors_origins.iter().any(|o| o == "*");

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin, _| {
            if allow_all_origins {
                return true;
            }
            origin.to_str().is_ok_and(|origin_str| {
                cors_origins
                    .iter()
                    .any(|allowed| origin_str.starts_with(allowed.as_str()))
            })
        }))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .expose_headers(Any)
}
