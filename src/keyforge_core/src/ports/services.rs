use async_trait::async_trait;

use crate::domain::email::Email;

/// Outbound email delivery. The caller hands over only the recipient and
/// the reset token; composing the message is the client's concern.
#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send_password_reset(
        &self,
        recipient: &Email,
        reset_token: &str,
    ) -> Result<(), String>;
}
