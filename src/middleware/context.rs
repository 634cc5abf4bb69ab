use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use serde_json::Value;

use crate::{AppState, i18n::Translator};

use super::{locale::Locale, trace_id::TraceId};

/// 每个请求独立的上下文：语言、追踪ID和翻译函数
#[derive(Clone)]
pub struct RequestContext {
    locale: String,
    trace_id: String,
    translator: Arc<Translator>,
}

impl RequestContext {
    pub fn new(locale: String, trace_id: String, translator: Arc<Translator>) -> Self {
        Self {
            locale,
            trace_id,
            translator,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn t(&self, key: &str, params: Option<&Value>) -> String {
        self.translator.translate(&self.locale, key, params)
    }
}

pub async fn request_context(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let locale = req
        .extensions()
        .get::<Locale>()
        .map(|l| l.0.clone())
        .unwrap_or_else(|| state.config.default_locale.clone());
    let trace_id = req
        .extensions()
        .get::<TraceId>()
        .map(|t| t.0.clone())
        .unwrap_or_default();

    req.extensions_mut()
        .insert(RequestContext::new(locale, trace_id, state.translator.clone()));
    next.run(req).await
}
