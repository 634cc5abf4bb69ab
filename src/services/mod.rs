mod authentication;
mod user;

pub use authentication::{AuthenticationService, SignInRequest};
pub use user::UserService;
