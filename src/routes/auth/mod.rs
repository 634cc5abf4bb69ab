mod handler;
mod model;

pub use handler::{refresh, sign_in};
pub use model::RefreshRequest;
