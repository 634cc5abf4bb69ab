#![allow(dead_code)]

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use serde_json::Value;
use tower::ServiceExt;
use tracing_subscriber::fmt::MakeWriter;
use veg_store_backend::{
    AppState,
    config::{Config, JwtConfig},
    i18n::Translator,
    infrastructure::auth::{JwtManager, KeyPair},
};

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/keys")
        .join(name)
}

pub fn jwt_config(access_duration: &str, refresh_duration: &str) -> JwtConfig {
    JwtConfig {
        issuer: "veg-store-backend-test".into(),
        access_duration: access_duration.into(),
        refresh_duration: refresh_duration.into(),
        private_key_path: fixture("private.pem"),
        public_key_path: fixture("public.pem"),
    }
}

pub fn jwt_manager(access_duration: &str, refresh_duration: &str) -> JwtManager {
    JwtManager::from_config(&jwt_config(access_duration, refresh_duration))
        .expect("fixture keys load")
}

/// 用另一对密钥签名，公钥不匹配
pub fn foreign_jwt_manager() -> JwtManager {
    let keys = KeyPair::from_pem_files(fixture("other_private.pem"), fixture("other_public.pem"))
        .expect("fixture keys load");
    JwtManager::new(&jwt_config("15m", "7d"), keys)
}

pub fn test_state() -> AppState {
    let mut config = Config::default();
    config.jwt = jwt_config("15m", "7d");
    config.i18n_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("i18n");

    let translator =
        Translator::load_dir(&config.i18n_dir, &config.default_locale).expect("i18n loads");
    let jwt = JwtManager::from_config(&config.jwt).expect("fixture keys load");
    AppState::new(config, translator, jwt)
}

pub async fn send(app: Router, request: Request<Body>) -> (Response<Body>, Value) {
    let response = app.oneshot(request).await.expect("infallible");
    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.expect("body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (Response::from_parts(parts, Body::empty()), json)
}

pub fn get(uri: &str) -> axum::http::request::Builder {
    Request::builder().method("GET").uri(uri)
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

/// 收集 tracing 输出，便于断言日志内容
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
