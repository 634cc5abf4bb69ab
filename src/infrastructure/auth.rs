use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::JwtConfig;
use crate::lifecycle::Startable;
use crate::utils::parse_duration;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    Expired,

    #[error("malformed token: {0}")]
    Malformed(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_)
            | ErrorKind::MissingRequiredClaim(_) => TokenError::Malformed(err.to_string()),
            _ => TokenError::InvalidToken(err.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("failed to read key file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {which} key: {source}")]
    Parse {
        which: &'static str,
        #[source]
        source: jsonwebtoken::errors::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,      // 用户ID
    pub roles: BTreeSet<String>,
    pub iss: String,
    pub iat: i64,         // 签发时间
    pub nbf: i64,
    pub exp: i64,         // 过期时间
    pub kind: TokenKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// RSA 密钥对，进程启动时加载一次
pub struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    pub fn from_pem(private_pem: &[u8], public_pem: &[u8]) -> Result<Self, KeyError> {
        let encoding = EncodingKey::from_rsa_pem(private_pem).map_err(|source| KeyError::Parse {
            which: "private",
            source,
        })?;
        let decoding = DecodingKey::from_rsa_pem(public_pem).map_err(|source| KeyError::Parse {
            which: "public",
            source,
        })?;
        Ok(Self { encoding, decoding })
    }

    pub fn from_pem_files(
        private_path: impl AsRef<Path>,
        public_path: impl AsRef<Path>,
    ) -> Result<Self, KeyError> {
        let read = |path: &Path| {
            tracing::info!("Loading key file: {}", path.display());
            fs::read(path).map_err(|source| KeyError::Read {
                path: path.display().to_string(),
                source,
            })
        };
        let private_pem = read(private_path.as_ref())?;
        let public_pem = read(public_path.as_ref())?;
        Self::from_pem(&private_pem, &public_pem)
    }
}

pub struct JwtManager {
    keys: KeyPair,
    issuer: String,
    access_duration: String,
    refresh_duration: String,
}

impl JwtManager {
    pub fn new(config: &JwtConfig, keys: KeyPair) -> Self {
        Self {
            keys,
            issuer: config.issuer.clone(),
            access_duration: config.access_duration.clone(),
            refresh_duration: config.refresh_duration.clone(),
        }
    }

    pub fn from_config(config: &JwtConfig) -> Result<Self, KeyError> {
        let keys = KeyPair::from_pem_files(&config.private_key_path, &config.public_key_path)?;
        Ok(Self::new(config, keys))
    }

    fn lifetime(&self, kind: TokenKind) -> Result<Duration, TokenError> {
        let raw = match kind {
            TokenKind::Access => &self.access_duration,
            TokenKind::Refresh => &self.refresh_duration,
        };
        let lifetime = parse_duration(raw).map_err(|e| TokenError::Signing(e.to_string()))?;
        // 声明以秒为单位，不足一秒的非零时长签出的 token 可能一签发就过期
        if !lifetime.is_zero() && lifetime < Duration::from_secs(1) {
            return Err(TokenError::Signing(format!(
                "{kind:?} token lifetime {raw:?} is shorter than one second"
            )));
        }
        Ok(lifetime)
    }

    pub fn sign<I, S>(&self, kind: TokenKind, subject: &str, roles: I) -> Result<String, TokenError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lifetime = chrono::Duration::from_std(self.lifetime(kind)?)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(lifetime)
            .ok_or_else(|| TokenError::Signing("expiry out of range".into()))?;

        let claims = TokenClaims {
            sub: subject.to_string(),
            roles: roles.into_iter().map(Into::into).collect(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
            kind,
        };

        encode(&Header::new(Algorithm::RS256), &claims, &self.keys.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn sign_pair(&self, subject: &str, roles: &[String]) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.sign(TokenKind::Access, subject, roles.iter().cloned())?,
            refresh_token: self.sign(TokenKind::Refresh, subject, roles.iter().cloned())?,
        })
    }

    /// 验证签名、签发者和时间窗口，任何无效输入都返回错误而不是终止进程
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        // 时间校验在下面手动完成，零容差
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;

        let claims = decode::<TokenClaims>(token, &self.keys.decoding, &validation)?.claims;

        let now = Utc::now().timestamp();
        if claims.exp <= now {
            return Err(TokenError::Expired);
        }
        if claims.nbf > now {
            return Err(TokenError::InvalidToken("token not yet valid".into()));
        }

        Ok(claims)
    }

    pub fn verify_kind(&self, token: &str, expected: TokenKind) -> Result<TokenClaims, TokenError> {
        let claims = self.verify(token)?;
        if claims.kind != expected {
            return Err(TokenError::InvalidToken(format!(
                "expected {:?} token, got {:?}",
                expected, claims.kind
            )));
        }
        Ok(claims)
    }
}

impl Startable for JwtManager {
    fn name(&self) -> &'static str {
        "JwtManager"
    }

    fn start(&self) -> anyhow::Result<()> {
        self.lifetime(TokenKind::Access)?;
        self.lifetime(TokenKind::Refresh)?;
        tracing::debug!("{} initialized", self.name());
        Ok(())
    }
}
