mod auth;
mod context;
mod error_handler;
mod locale;
mod trace_id;

use axum::{Router, middleware::from_fn_with_state};
use tower::ServiceBuilder;

use crate::AppState;

pub use auth::{auth_middleware, require_role};
pub use context::{RequestContext, request_context};
pub use error_handler::{handle_errors, install_panic_hook};
pub use locale::{Locale, locale, resolve_locale};
pub use trace_id::{TraceId, resolve_trace_id, trace_id};

/// 请求处理管道，外层在前：trace_id → locale → request_context → handle_errors
// handle_errors 在最内层，先拿到处理函数的结果
pub fn pipeline(router: Router, state: AppState) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(from_fn_with_state(state.clone(), trace_id))
            .layer(from_fn_with_state(state.clone(), locale))
            .layer(from_fn_with_state(state.clone(), request_context))
            .layer(from_fn_with_state(state, handle_errors)),
    )
}
