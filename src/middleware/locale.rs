use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::{AppState, utils::header_str};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

/// 只取第一个语言标签，去掉权重和地区并转小写，如 "en-US,en;q=0.9" -> "en"
pub fn resolve_locale(header: Option<&str>, default_locale: &str) -> String {
    let lang = header
        .and_then(|value| value.split(',').next())
        .and_then(|tag| tag.split(';').next())
        .and_then(|tag| tag.split('-').next())
        .map(str::trim)
        .unwrap_or_default();

    if lang.is_empty() || lang == "*" {
        default_locale.to_string()
    } else {
        lang.to_ascii_lowercase()
    }
}

pub async fn locale(State(state): State<AppState>, mut req: Request<Body>, next: Next) -> Response {
    let header = header_str(req.headers(), &state.config.locale_header);
    let lang = resolve_locale(header, &state.config.default_locale);
    tracing::debug!("{}: {:?} -> {}", state.config.locale_header, header, lang);

    req.extensions_mut().insert(Locale(lang));
    next.run(req).await
}
