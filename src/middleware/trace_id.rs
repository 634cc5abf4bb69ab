use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::{AppState, utils::header_str};

/// 当前请求的追踪ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceId(pub String);

/// 非空请求头原样使用，否则生成新的 UUID
pub fn resolve_trace_id(header: Option<&str>) -> String {
    match header {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => Uuid::new_v4().to_string(),
    }
}

pub async fn trace_id(State(state): State<AppState>, mut req: Request<Body>, next: Next) -> Response {
    let header_name = &state.config.trace_header;
    let trace_id = resolve_trace_id(header_str(req.headers(), header_name));
    req.extensions_mut().insert(TraceId(trace_id.clone()));

    let span = tracing::info_span!(
        "request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.uri().path(),
    );
    let started = Instant::now();
    let mut response = next.run(req).instrument(span.clone()).await;

    span.in_scope(|| {
        tracing::info!(
            status = response.status().as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            "Request completed"
        );
    });

    // 错误响应也要回写追踪ID
    match HeaderValue::from_str(&trace_id) {
        Ok(value) => {
            response.headers_mut().insert(header_name.clone(), value);
        }
        Err(e) => tracing::warn!("Trace id is not a valid header value: {}", e),
    }
    response
}
