use std::env;
use std::path::PathBuf;

use axum::http::HeaderName;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("invalid header name {value:?} for {key}")]
    InvalidHeader { key: &'static str, value: String },
}

/// 签名相关配置，时长保持字符串形式，签发时再解析
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub issuer: String,
    pub access_duration: String,
    pub refresh_duration: String,
    pub private_key_path: PathBuf,
    pub public_key_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mode: String,
    pub server_host: String,
    pub server_port: u16,
    pub api_prefix: String,
    pub api_version: String,
    pub jwt: JwtConfig,
    pub default_locale: String,
    pub i18n_dir: PathBuf,
    pub locale_header: HeaderName,
    pub trace_header: HeaderName,
    pub cors_allow_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: "dev".into(),
            server_host: "0.0.0.0".into(),
            server_port: 8080,
            api_prefix: "/restful".into(),
            api_version: "/v1".into(),
            jwt: JwtConfig {
                issuer: "veg-store-backend".into(),
                access_duration: "15m".into(),
                refresh_duration: "7d".into(),
                private_key_path: PathBuf::from("secrets/keypair/private.pem"),
                public_key_path: PathBuf::from("secrets/keypair/public.pem"),
            },
            default_locale: "en".into(),
            i18n_dir: PathBuf::from("i18n"),
            locale_header: HeaderName::from_static("accept-language"),
            trace_header: HeaderName::from_static("x-request-id"),
            cors_allow_origins: vec!["*".into()],
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let defaults = Config::default();
        let var = |key: &str, default: &str| env::var(key).unwrap_or_else(|_| default.to_string());

        let server_port = match env::var("SERVER_PORT") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "SERVER_PORT",
                value,
            })?,
            Err(_) => defaults.server_port,
        };

        let config = Config {
            mode: var("MODE", &defaults.mode),
            server_host: var("SERVER_HOST", &defaults.server_host),
            server_port,
            api_prefix: var("API_PREFIX", &defaults.api_prefix),
            api_version: var("API_VERSION", &defaults.api_version),
            jwt: JwtConfig {
                issuer: var("JWT_ISSUER", &defaults.jwt.issuer),
                access_duration: var("JWT_ACCESS_DURATION", &defaults.jwt.access_duration),
                refresh_duration: var("JWT_REFRESH_DURATION", &defaults.jwt.refresh_duration),
                private_key_path: env::var("JWT_PRIVATE_KEY_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.jwt.private_key_path),
                public_key_path: env::var("JWT_PUBLIC_KEY_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.jwt.public_key_path),
            },
            default_locale: var("DEFAULT_LOCALE", &defaults.default_locale),
            i18n_dir: env::var("I18N_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.i18n_dir),
            locale_header: header_from_env("LOCALE_HEADER", defaults.locale_header)?,
            trace_header: header_from_env("TRACE_HEADER", defaults.trace_header)?,
            cors_allow_origins: env::var("CORS_ALLOW_ORIGINS")
                .map(|value| split_list(&value))
                .unwrap_or(defaults.cors_allow_origins),
        };

        validate_api_path(&config.api_path())?;

        if !config.is_production() {
            config.log_summary();
        }

        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        matches!(self.mode.as_str(), "prod" | "production")
    }

    /// API 路由前缀，如 "/restful/v1"
    pub fn api_path(&self) -> String {
        format!("{}{}", self.api_prefix, self.api_version)
    }

    fn log_summary(&self) {
        tracing::info!(
            mode = %self.mode,
            server = %format!("{}:{}", self.server_host, self.server_port),
            api_path = %self.api_path(),
            jwt_issuer = %self.jwt.issuer,
            access_duration = %self.jwt.access_duration,
            refresh_duration = %self.jwt.refresh_duration,
            private_key_path = %self.jwt.private_key_path.display(),
            public_key_path = %self.jwt.public_key_path.display(),
            default_locale = %self.default_locale,
            locale_header = %self.locale_header,
            trace_header = %self.trace_header,
            "Application configuration loaded"
        );
    }
}

// 路由嵌套在该前缀下，不能为空也不能是根路径
fn validate_api_path(path: &str) -> Result<(), ConfigError> {
    if path.starts_with('/') && path != "/" {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key: "API_PREFIX",
            value: path.to_string(),
        })
    }
}

fn header_from_env(key: &'static str, default: HeaderName) -> Result<HeaderName, ConfigError> {
    match env::var(key) {
        Ok(value) => HeaderName::from_bytes(value.trim().as_bytes())
            .map_err(|_| ConfigError::InvalidHeader { key, value }),
        Err(_) => Ok(default),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
