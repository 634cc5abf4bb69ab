use std::sync::Arc;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::infrastructure::auth::TokenError;

/// 结构化错误：code 由类别前缀和具体名称组成，message_key 用于国际化查找
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubError {
    pub code: &'static str,
    pub message_key: &'static str,
}

impl SubError {
    const fn new(code: &'static str, message_key: &'static str) -> Self {
        Self { code, message_key }
    }

    pub fn status(&self) -> StatusCode {
        status_for_code(self.code)
    }
}

#[derive(Debug)]
pub struct InvalidErrors {
    pub username: SubError,
    pub request_body: SubError,
    pub path_param: SubError,
}

#[derive(Debug)]
pub struct AuthErrors {
    pub unauthenticated: SubError,
    pub token_expired: SubError,
    pub invalid_token: SubError,
    pub forbidden: SubError,
}

#[derive(Debug)]
pub struct NotFoundErrors {
    pub user: SubError,
    pub route: SubError,
}

#[derive(Debug)]
pub struct NotAllowedErrors {
    pub method: SubError,
}

#[derive(Debug)]
pub struct InternalErrors {
    pub server_error: SubError,
}

#[derive(Debug)]
pub struct ErrorCatalogue {
    pub invalid: InvalidErrors,
    pub auth: AuthErrors,
    pub not_found: NotFoundErrors,
    pub not_allowed: NotAllowedErrors,
    pub internal: InternalErrors,
}

/// 全部错误目录，只读
pub static ERRORS: ErrorCatalogue = ErrorCatalogue {
    invalid: InvalidErrors {
        username: SubError::new("invalid/username", "invalid_username"),
        request_body: SubError::new("invalid/request_body", "invalid_request_body"),
        path_param: SubError::new("invalid/path_param", "invalid_path_param"),
    },
    auth: AuthErrors {
        unauthenticated: SubError::new("auth/unauthenticated", "unauthenticated"),
        token_expired: SubError::new("auth/unauthenticated/token_expired", "token_expired"),
        invalid_token: SubError::new("auth/unauthenticated/invalid_token", "invalid_token"),
        forbidden: SubError::new("auth/forbidden", "forbidden"),
    },
    not_found: NotFoundErrors {
        user: SubError::new("not_found/user", "user_not_found"),
        route: SubError::new("not_found/route", "route_not_found"),
    },
    not_allowed: NotAllowedErrors {
        method: SubError::new("not_allowed/method", "method_not_allowed"),
    },
    internal: InternalErrors {
        server_error: SubError::new("internal/server_error", "internal_server_error"),
    },
};

// 顺序敏感：前缀先匹配者优先
const STATUS_TABLE: &[(&str, StatusCode)] = &[
    ("invalid/", StatusCode::BAD_REQUEST),
    ("auth/unauthenticated", StatusCode::UNAUTHORIZED),
    ("auth/forbidden", StatusCode::FORBIDDEN),
    ("not_found/", StatusCode::NOT_FOUND),
    ("not_allowed/", StatusCode::METHOD_NOT_ALLOWED),
];

pub fn status_for_code(code: &str) -> StatusCode {
    STATUS_TABLE
        .iter()
        .find(|(prefix, _)| code.starts_with(prefix))
        .map(|(_, status)| *status)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}", .0.code)]
    Sub(SubError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<SubError> for AppError {
    fn from(err: SubError) -> Self {
        AppError::Sub(err)
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => ERRORS.auth.token_expired.into(),
            TokenError::InvalidToken(_) | TokenError::Malformed(_) => {
                ERRORS.auth.invalid_token.into()
            }
            TokenError::Signing(_) => AppError::Internal(err.into()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        ERRORS.invalid.request_body.into()
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Rejected path parameter: {}", rejection.body_text());
        ERRORS.invalid.path_param.into()
    }
}

/// 记录在响应扩展中的错误，由 error_handler 中间件取出并写最终响应
#[derive(Debug, Clone)]
pub struct RecordedError(pub Arc<AppError>);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response
            .extensions_mut()
            .insert(RecordedError(Arc::new(self)));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_category_prefixes_to_status() {
        assert_eq!(status_for_code("invalid/username"), StatusCode::BAD_REQUEST);
        assert_eq!(status_for_code("auth/unauthenticated"), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_for_code("auth/unauthenticated/token_expired"),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_for_code("auth/forbidden"), StatusCode::FORBIDDEN);
        assert_eq!(status_for_code("not_found/user"), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for_code("not_allowed/method"),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            status_for_code("internal/server_error"),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(status_for_code("auth/other"), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_for_code(""), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn every_catalogue_entry_has_a_category_status() {
        let entries = [
            (ERRORS.invalid.username, StatusCode::BAD_REQUEST),
            (ERRORS.invalid.request_body, StatusCode::BAD_REQUEST),
            (ERRORS.invalid.path_param, StatusCode::BAD_REQUEST),
            (ERRORS.auth.unauthenticated, StatusCode::UNAUTHORIZED),
            (ERRORS.auth.token_expired, StatusCode::UNAUTHORIZED),
            (ERRORS.auth.invalid_token, StatusCode::UNAUTHORIZED),
            (ERRORS.auth.forbidden, StatusCode::FORBIDDEN),
            (ERRORS.not_found.user, StatusCode::NOT_FOUND),
            (ERRORS.not_found.route, StatusCode::NOT_FOUND),
            (ERRORS.not_allowed.method, StatusCode::METHOD_NOT_ALLOWED),
            (ERRORS.internal.server_error, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (entry, status) in entries {
            assert_eq!(entry.status(), status, "{}", entry.code);
        }
    }

    #[test]
    fn token_errors_map_to_unauthenticated_codes() {
        let expired = AppError::from(TokenError::Expired);
        assert!(matches!(expired, AppError::Sub(e) if e == ERRORS.auth.token_expired));

        let tampered = AppError::from(TokenError::InvalidToken("InvalidSignature".into()));
        assert!(matches!(tampered, AppError::Sub(e) if e == ERRORS.auth.invalid_token));

        let signing = AppError::from(TokenError::Signing("bad duration".into()));
        assert!(matches!(signing, AppError::Internal(_)));
    }

    #[test]
    fn into_response_records_the_error() {
        let response = AppError::from(ERRORS.not_found.user).into_response();
        let recorded = response.extensions().get::<RecordedError>().unwrap();
        assert!(matches!(*recorded.0, AppError::Sub(e) if e.code == "not_found/user"));
    }
}
