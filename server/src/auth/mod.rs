mod cookie;
mod crypto;
mod db;
mod extractor;
mod middleware;

pub use cookie::{clear_session_cookie, session_cookie};
pub use crypto::{hash_password, verify_password};
pub use db::{create_session, delete_session, SessionTtl};
pub use extractor::{AuthUser, SessionToken};
pub use middleware::require_auth;
