//! Outbound mail port.

use async_trait::async_trait;

use crate::domain::User;

/// Mail delivery boundary.
///
/// The core supplies the recipient and the reset token; message
/// composition and transport live entirely behind this trait.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_reset_email(&self, user: &User, token: &str) -> Result<(), MailError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Mail delivery failed: {0}")]
    Delivery(String),
}
