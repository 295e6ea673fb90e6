//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod avatar;
mod mail;
mod repository;

pub use auth::{AuthError, PasswordService, ResetTokenService, SessionClaims, SessionTokenService};
pub use avatar::{AvatarError, AvatarStore};
pub use mail::{MailError, Mailer};
pub use repository::{BaseRepository, PostRepository, UserRepository};
