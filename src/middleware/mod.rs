pub mod auth;
pub mod log;
pub mod response;

pub use auth::AuthUser;
pub use response::{ApiResponse, ApiResult};
