use axum::{
    RequestPartsExt,
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{
    AppState,
    error::{AppError, ERRORS},
    infrastructure::auth::{TokenClaims, TokenKind},
};

/// 校验 Bearer access token，通过后把 TokenClaims 放入请求扩展
pub async fn auth_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    let TypedHeader(Authorization(bearer)) = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .map_err(|_| AppError::from(ERRORS.auth.unauthenticated))?;

    let claims = state
        .jwt
        .verify_kind(bearer.token(), TokenKind::Access)
        .inspect_err(|e| tracing::debug!("Token rejected: {}", e))?;

    parts.extensions.insert(claims);
    Ok(next.run(Request::from_parts(parts, body)).await)
}

pub fn require_role(claims: &TokenClaims, role: &str) -> Result<(), AppError> {
    if claims.roles.contains(role) {
        Ok(())
    } else {
        tracing::debug!("User {} lacks role {}", claims.sub, role);
        Err(ERRORS.auth.forbidden.into())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn claims(roles: &[&str]) -> TokenClaims {
        TokenClaims {
            sub: "2".into(),
            roles: roles.iter().map(|r| r.to_string()).collect::<BTreeSet<_>>(),
            iss: "test".into(),
            iat: 0,
            nbf: 0,
            exp: 1,
            kind: TokenKind::Access,
        }
    }

    #[test]
    fn role_check() {
        assert!(require_role(&claims(&["admin", "user"]), "admin").is_ok());
        let err = require_role(&claims(&["user"]), "admin").unwrap_err();
        assert!(matches!(err, AppError::Sub(e) if e == ERRORS.auth.forbidden));
    }
}
