use std::sync::Arc;

use keyforge_core::{
    LoginAttemptRecord, LoginAttemptRepository, PasswordResetRecord, PasswordResetRepository,
    RefreshTokenRecord, RefreshTokenRepository, StoreError,
};
use tokio::sync::RwLock;

/// In-memory refresh-token rows. Insertion order stands in for the
/// database's id ordering, so the last pushed row is the most recent.
#[derive(Clone, Default)]
pub struct HashMapRefreshTokenRepository {
    records: Arc<RwLock<Vec<RefreshTokenRecord>>>,
}

impl HashMapRefreshTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records_for(&self, account_id: i64) -> Vec<RefreshTokenRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| r.account_id == account_id)
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl RefreshTokenRepository for HashMapRefreshTokenRepository {
    async fn persist(&self, record: RefreshTokenRecord) -> Result<(), StoreError> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn latest_for_account(
        &self,
        account_id: i64,
    ) -> Result<Option<RefreshTokenRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .rev()
            .find(|r| r.account_id == account_id)
            .cloned())
    }
}

#[derive(Clone, Default)]
pub struct HashMapPasswordResetRepository {
    records: Arc<RwLock<Vec<PasswordResetRecord>>>,
}

impl HashMapPasswordResetRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PasswordResetRepository for HashMapPasswordResetRepository {
    async fn persist(&self, record: PasswordResetRecord) -> Result<(), StoreError> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn latest_for_account(
        &self,
        account_id: i64,
    ) -> Result<Option<PasswordResetRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .rev()
            .find(|r| r.account_id == account_id)
            .cloned())
    }
}

#[derive(Clone, Default)]
pub struct HashMapLoginAttemptRepository {
    records: Arc<RwLock<Vec<LoginAttemptRecord>>>,
}

impl HashMapLoginAttemptRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// The port is append-only; this accessor exists so tests can assert
    /// on the audit trail.
    pub async fn attempts_for(&self, account_id: i64) -> Vec<LoginAttemptRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| r.account_id == account_id)
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl LoginAttemptRepository for HashMapLoginAttemptRepository {
    async fn append(&self, record: LoginAttemptRecord) -> Result<(), StoreError> {
        self.records.write().await.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[tokio::test]
    async fn latest_for_account_returns_the_most_recent_row() {
        let repo = HashMapRefreshTokenRepository::new();
        for token in ["first", "second", "third"] {
            repo.persist(RefreshTokenRecord {
                account_id: 1,
                token: token.to_owned(),
                expires_at: Utc::now(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        }
        repo.persist(RefreshTokenRecord {
            account_id: 2,
            token: "other-account".to_owned(),
            expires_at: Utc::now(),
            created_at: Utc::now(),
        })
        .await
        .unwrap();

        let latest = repo.latest_for_account(1).await.unwrap().unwrap();
        assert_eq!(latest.token, "third");
        assert_eq!(repo.records_for(1).await.len(), 3);
        assert!(repo.latest_for_account(3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn attempts_accumulate_per_account() {
        let repo = HashMapLoginAttemptRepository::new();
        for success in [true, false, true] {
            repo.append(LoginAttemptRecord {
                account_id: 7,
                attempted_at: Utc::now(),
                success,
            })
            .await
            .unwrap();
        }
        assert_eq!(repo.attempts_for(7).await.len(), 3);
        assert!(repo.attempts_for(8).await.is_empty());
    }
}
