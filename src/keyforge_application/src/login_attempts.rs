use chrono::Utc;
use keyforge_core::{LoginAttemptRecord, LoginAttemptRepository, StoreError};

/// Appends one audit row per authentication attempt. Whether a failed
/// append aborts the surrounding flow is the caller's decision; the login
/// use case tolerates it.
#[derive(Debug, Clone)]
pub struct LoginAttemptRecorder<L> {
    attempts: L,
}

impl<L> LoginAttemptRecorder<L>
where
    L: LoginAttemptRepository,
{
    pub fn new(attempts: L) -> Self {
        Self { attempts }
    }

    #[tracing::instrument(name = "Recording login attempt", skip(self))]
    pub async fn record(&self, account_id: i64, success: bool) -> Result<(), StoreError> {
        self.attempts
            .append(LoginAttemptRecord {
                account_id,
                attempted_at: Utc::now(),
                success,
            })
            .await?;
        tracing::info!(account_id, success, "persisted login attempt");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::RwLock;

    use super::*;

    #[derive(Clone, Default)]
    struct InMemoryLog {
        records: Arc<RwLock<Vec<LoginAttemptRecord>>>,
    }

    #[async_trait]
    impl LoginAttemptRepository for InMemoryLog {
        async fn append(&self, record: LoginAttemptRecord) -> Result<(), StoreError> {
            self.records.write().await.push(record);
            Ok(())
        }
    }

    #[tokio::test]
    async fn record_appends_one_row_per_attempt() {
        let log = InMemoryLog::default();
        let recorder = LoginAttemptRecorder::new(log.clone());

        recorder.record(1, true).await.unwrap();
        recorder.record(1, false).await.unwrap();

        let records = log.records.read().await;
        assert_eq!(records.len(), 2);
        assert!(records[0].success);
        assert!(!records[1].success);
        assert!(records.iter().all(|r| r.account_id == 1));
    }
}
