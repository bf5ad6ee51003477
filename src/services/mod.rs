// Service exports
pub mod auth;
pub mod connections;
pub mod feed;
pub mod postgres;
pub mod profiles;

pub use auth::{bearer_token, hash_password, verify_password, AuthError, AuthUser, Claims, JwtService};
pub use feed::{PostFilter, Toggled, EXPLORE_LIMIT};
pub use postgres::{PostgresClient, PostgresError};
