pub mod http;
pub mod middleware;
pub mod tokens;

pub use middleware::auth_middleware;
pub use tokens::{issue_token, verify_token, IssuedToken, TokenSettings};
