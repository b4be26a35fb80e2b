use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use keyforge_core::{
    Account, AccountRole, AccountStatus, DEFAULT_QUOTA, Email, NewAccount, UserDirectory,
    UserDirectoryError,
};
use secrecy::Secret;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    accounts: HashMap<i64, Account>,
    next_id: i64,
}

/// In-memory [`UserDirectory`] for tests and local runs. Ids are assigned
/// sequentially, mirroring the database's bigserial column.
#[derive(Clone, Default)]
pub struct HashMapUserDirectory {
    inner: Arc<RwLock<Inner>>,
}

impl HashMapUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserDirectory for HashMapUserDirectory {
    async fn insert(&self, account: NewAccount) -> Result<Account, UserDirectoryError> {
        let mut inner = self.inner.write().await;
        if inner.accounts.values().any(|a| a.email == account.email) {
            return Err(UserDirectoryError::AlreadyExists);
        }
        inner.next_id += 1;
        let account = Account {
            id: inner.next_id,
            email: account.email,
            password_hash: account.password_hash,
            first_name: account.first_name,
            last_name: account.last_name,
            status: AccountStatus::Active,
            roles: BTreeSet::from([AccountRole::User]),
            quota: DEFAULT_QUOTA.to_owned(),
            created_at: Utc::now(),
            last_login: None,
        };
        inner.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Account, UserDirectoryError> {
        self.inner
            .read()
            .await
            .accounts
            .values()
            .find(|a| &a.email == email)
            .cloned()
            .ok_or(UserDirectoryError::NotFound)
    }

    async fn find_by_id(&self, id: i64) -> Result<Account, UserDirectoryError> {
        self.inner
            .read()
            .await
            .accounts
            .get(&id)
            .cloned()
            .ok_or(UserDirectoryError::NotFound)
    }

    async fn update_password(
        &self,
        id: i64,
        password_hash: Secret<String>,
    ) -> Result<(), UserDirectoryError> {
        let mut inner = self.inner.write().await;
        let account = inner
            .accounts
            .get_mut(&id)
            .ok_or(UserDirectoryError::NotFound)?;
        account.password_hash = password_hash;
        Ok(())
    }

    async fn touch_last_login(&self, id: i64, at: DateTime<Utc>) -> Result<(), UserDirectoryError> {
        let mut inner = self.inner.write().await;
        let account = inner
            .accounts
            .get_mut(&id)
            .ok_or(UserDirectoryError::NotFound)?;
        account.last_login = Some(at);
        Ok(())
    }
}
