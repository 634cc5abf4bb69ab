use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::panic::AssertUnwindSafe;

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures_util::FutureExt;

use crate::{
    AppState,
    error::{AppError, ERRORS, RecordedError},
    result::ApiResponse,
};

use super::context::RequestContext;

const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

thread_local! {
    static PANIC_BACKTRACE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// 在 panic 发生的线程上记录调用栈，供 handle_errors 记录日志
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let backtrace = Backtrace::force_capture().to_string();
        PANIC_BACKTRACE.with(|slot| *slot.borrow_mut() = Some(backtrace));
        previous(info);
    }));
}

/// 最后一道中间件：捕获 panic，把记录的错误转换为统一的 JSON 响应
pub async fn handle_errors(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
    let ctx = req
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_else(|| {
            RequestContext::new(
                state.config.default_locale.clone(),
                String::new(),
                state.translator.clone(),
            )
        });
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let mut response = match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(response) => response,
        Err(payload) => return panic_response(&ctx, payload.as_ref()),
    };

    let Some(RecordedError(error)) = response.extensions_mut().remove::<RecordedError>() else {
        return response;
    };

    match error.as_ref() {
        AppError::Sub(sub) => {
            let status = sub.status();
            tracing::error!(
                trace_id = %ctx.trace_id(),
                code = sub.code,
                message_key = sub.message_key,
                path = %path,
                method = %method,
                "Request failed"
            );
            let body = ApiResponse::<()>::error(
                status.as_u16(),
                Some(sub.code),
                ctx.t(sub.message_key, None),
            );
            (status, Json(body)).into_response()
        }
        AppError::Internal(err) => {
            tracing::error!(
                trace_id = %ctx.trace_id(),
                code = ERRORS.internal.server_error.code,
                path = %path,
                method = %method,
                error = %format!("{err:#}"),
                "Unhandled error"
            );
            internal_error_response(None)
        }
    }
}

fn panic_response(ctx: &RequestContext, payload: &(dyn Any + Send)) -> Response {
    let backtrace = PANIC_BACKTRACE
        .with(|slot| slot.borrow_mut().take())
        .unwrap_or_else(|| Backtrace::force_capture().to_string());

    tracing::error!(
        trace_id = %ctx.trace_id(),
        panic = %panic_message(payload),
        "[PANIC] handler panicked, stack trace:\n{}",
        backtrace
    );

    internal_error_response(Some(ctx.trace_id()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn internal_error_response(trace_id: Option<&str>) -> Response {
    let status = StatusCode::INTERNAL_SERVER_ERROR;
    let mut body = ApiResponse::<()>::error(status.as_u16(), None, INTERNAL_SERVER_ERROR.into());
    if let Some(trace_id) = trace_id {
        body = body.with_trace_id(trace_id);
    }
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_string_panic_payloads() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload: Box<dyn Any + Send> = Box::new(String::from("kaboom"));
        assert_eq!(panic_message(payload.as_ref()), "kaboom");

        let payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
