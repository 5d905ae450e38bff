/// Security primitives for post-service
///
/// - password: Argon2id password hashing for the user directory
/// - token: HS256 access tokens carrying the user id
pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};
