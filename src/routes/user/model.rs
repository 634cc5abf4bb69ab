use serde::{Deserialize, Serialize};

use crate::infrastructure::auth::{TokenClaims, TokenKind};
use crate::models::User;

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub name: String,
    pub age: u8,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            age: user.age,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GreetingResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PingResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user_id: String,
    pub roles: Vec<String>,
    pub kind: TokenKind,
    pub expires_at: i64,
}

impl From<TokenClaims> for MeResponse {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.sub,
            roles: claims.roles.into_iter().collect(),
            kind: claims.kind,
            expires_at: claims.exp,
        }
    }
}
