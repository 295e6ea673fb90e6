//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! Postgres repositories, Argon2 password hashing, JWT session and reset
//! tokens, filesystem avatar storage, a logging mailer, and in-memory
//! repositories used as the no-database fallback and as test doubles.

pub mod auth;
pub mod avatar;
pub mod database;
pub mod mail;
pub mod memory;

pub use auth::{
    Argon2PasswordService, JwtResetTokenService, JwtSessionService, ResetTokenConfig,
    SessionTokenConfig,
};
pub use avatar::FsAvatarStore;
pub use database::{DatabaseConfig, PostgresPostRepository, PostgresUserRepository};
pub use mail::LogMailer;
pub use memory::{InMemoryPostRepository, InMemoryUserRepository};
