pub mod auth;
pub mod user;

use crate::error::{AppError, ERRORS};

pub async fn route_not_found() -> AppError {
    ERRORS.not_found.route.into()
}

pub async fn method_not_allowed() -> AppError {
    ERRORS.not_allowed.method.into()
}
