use std::sync::Arc;

use keyforge_core::{Email, EmailClient};
use tokio::sync::RwLock;

/// Test double that records every send instead of delivering anything.
#[derive(Debug, Clone, Default)]
pub struct MockEmailClient {
    sent: Arc<RwLock<Vec<(Email, String)>>>,
    fail: bool,
}

impl MockEmailClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client whose every send fails, for delivery-failure paths.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn sent(&self) -> Vec<(Email, String)> {
        self.sent.read().await.clone()
    }
}

#[async_trait::async_trait]
impl EmailClient for MockEmailClient {
    async fn send_password_reset(
        &self,
        recipient: &Email,
        reset_token: &str,
    ) -> Result<(), String> {
        if self.fail {
            return Err("email delivery refused".to_owned());
        }
        self.sent
            .write()
            .await
            .push((recipient.clone(), reset_token.to_owned()));
        Ok(())
    }
}
