use axum::{
    Extension, Json,
    extract::State,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    AppState,
    error::AppError,
    infrastructure::auth::TokenClaims,
    middleware::{RequestContext, require_role},
    result::ApiResponse,
    utils::{PathParam, success_to_api_response},
};

use super::model::{GreetingResponse, MeResponse, PingResponse, UserResponse};

#[axum::debug_handler(state = AppState)]
pub async fn ping() -> impl IntoResponse {
    success_to_api_response(PingResponse {
        message: "pong".into(),
    })
}

#[axum::debug_handler(state = AppState)]
pub async fn hello(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> impl IntoResponse {
    let message = ctx.t(
        state.users.greeting(),
        Some(&json!({ "Name": "Ben", "Count": 1 })),
    );
    success_to_api_response(GreetingResponse { message })
}

#[axum::debug_handler(state = AppState)]
pub async fn details(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = state.users.find_by_id(&id)?;
    Ok(success_to_api_response(user.into()))
}

/// 返回当前 token 的持有者信息
#[axum::debug_handler(state = AppState)]
pub async fn me(Extension(claims): Extension<TokenClaims>) -> impl IntoResponse {
    success_to_api_response(MeResponse::from(claims))
}

// 仅管理员
#[axum::debug_handler(state = AppState)]
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, AppError> {
    require_role(&claims, "admin")?;
    let users = state.users.all().into_iter().map(UserResponse::from).collect();
    Ok(success_to_api_response(users))
}
