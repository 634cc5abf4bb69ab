use axum::{
    Router,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::{AppState, middleware, routes};

// 公开路由
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/user/ping", get(routes::user::ping))
        .route("/user/hello", get(routes::user::hello))
        .route("/user/details/{id}", get(routes::user::details))
        .route("/auth/sign-in", post(routes::auth::sign_in))
        .route("/auth/refresh", post(routes::auth::refresh))
}

// 需要 Bearer access token 的路由
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/user/me", get(routes::user::me))
        .route("/user/", get(routes::user::list))
        .route_layer(from_fn_with_state(state, middleware::auth_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// 创建主路由：业务路由 + 请求处理管道 + CORS
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()));

    let router = Router::new()
        .nest(&state.config.api_path(), api)
        .fallback(routes::route_not_found)
        .method_not_allowed_fallback(routes::method_not_allowed)
        .with_state(state.clone());

    middleware::pipeline(router, state.clone()).layer(cors_layer(&state.config.cors_allow_origins))
}
