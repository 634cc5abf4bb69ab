use axum::{Json, extract::State};

use crate::{
    AppState,
    error::AppError,
    infrastructure::auth::TokenPair,
    result::ApiResponse,
    services::SignInRequest,
    utils::{JsonBody, success_to_api_response},
};

use super::model::RefreshRequest;

#[axum::debug_handler(state = AppState)]
pub async fn sign_in(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SignInRequest>,
) -> Result<Json<ApiResponse<TokenPair>>, AppError> {
    let tokens = state.auth.tokens(&req)?;
    Ok(success_to_api_response(tokens))
}

#[axum::debug_handler(state = AppState)]
pub async fn refresh(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RefreshRequest>,
) -> Result<Json<ApiResponse<TokenPair>>, AppError> {
    let tokens = state.auth.refresh(&req.refresh_token)?;
    Ok(success_to_api_response(tokens))
}
