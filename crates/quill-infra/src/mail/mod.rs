//! Mail adapters.

use async_trait::async_trait;

use quill_core::domain::User;
use quill_core::ports::{MailError, Mailer};

/// Mailer that writes the reset link to the log instead of sending mail.
///
/// Stands in for a real transport in development; the handler contract
/// (recipient and token in, delivery behind the port) is identical.
pub struct LogMailer {
    base_url: String,
}

impl LogMailer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_reset_email(&self, user: &User, token: &str) -> Result<(), MailError> {
        let link = format!(
            "{}/reset_password/{}",
            self.base_url.trim_end_matches('/'),
            token
        );

        tracing::info!(
            recipient = %mask_email(&user.email),
            %link,
            "Password reset link issued"
        );

        Ok(())
    }
}

/// Mask an address so no usable PII lands in the logs.
pub(crate) fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let masked_local = if local.len() > 1 {
            format!("{}***", &local[..1])
        } else {
            "***".to_string()
        };
        format!("{masked_local}{domain}")
    } else {
        "***".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("alice@example.com"), "a***@example.com");
        assert_eq!(mask_email("a@example.com"), "***@example.com");
        assert_eq!(mask_email("not-an-address"), "***");
    }

    #[tokio::test]
    async fn test_send_reset_email_is_infallible() {
        let mailer = LogMailer::new("https://blog.example.com/");
        let user = User::new(
            "alice".to_string(),
            "alice-nick".to_string(),
            "alice@example.com".to_string(),
            "hash".to_string(),
        );

        assert!(mailer.send_reset_email(&user, "some-token").await.is_ok());
    }
}
