use std::sync::Arc;

use serde::Deserialize;

use crate::error::{AppError, ERRORS};
use crate::infrastructure::auth::{JwtManager, TokenKind, TokenPair};
use crate::lifecycle::Startable;

use super::UserService;

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub username: String,
    // 目前不校验密码
    #[allow(dead_code)]
    pub password: String,
}

pub struct AuthenticationService {
    users: Arc<UserService>,
    jwt: Arc<JwtManager>,
}

impl AuthenticationService {
    pub fn new(users: Arc<UserService>, jwt: Arc<JwtManager>) -> Self {
        Self { users, jwt }
    }

    pub fn tokens(&self, request: &SignInRequest) -> Result<TokenPair, AppError> {
        let user = self
            .users
            .find_by_username(&request.username)
            .map_err(|_| AppError::from(ERRORS.invalid.username))?;

        let pair = self.jwt.sign_pair(&user.id, &user.role_list())?;
        tracing::info!("Issued tokens for user {}", user.id);
        Ok(pair)
    }

    /// 用 refresh token 换新的令牌对，角色按当前用户数据重新签发
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let claims = self.jwt.verify_kind(refresh_token, TokenKind::Refresh)?;
        let user = self
            .users
            .find_by_id(&claims.sub)
            .map_err(|_| AppError::from(ERRORS.auth.unauthenticated))?;

        Ok(self.jwt.sign_pair(&user.id, &user.role_list())?)
    }
}

impl Startable for AuthenticationService {
    fn name(&self) -> &'static str {
        "AuthenticationService"
    }
}
