mod handler;
mod model;

pub use handler::{details, hello, list, me, ping};
pub use model::{GreetingResponse, MeResponse, PingResponse, UserResponse};
