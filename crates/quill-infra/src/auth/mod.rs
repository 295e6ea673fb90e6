//! Authentication implementations.

mod password;
mod reset;
mod session;

pub use password::Argon2PasswordService;
pub use reset::{JwtResetTokenService, ResetTokenConfig};
pub use session::{JwtSessionService, SessionTokenConfig};
