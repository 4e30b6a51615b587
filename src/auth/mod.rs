mod middleware;
mod password;
mod token;

pub use middleware::{AuthError, RequireUser, SESSION_COOKIE, cookie_value};
pub use password::PasswordHasher;
pub use token::{TOKEN_LENGTH, generate_token};
