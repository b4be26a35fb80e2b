use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use keyforge_core::{
    Account, AccountRole, AccountStatus, DEFAULT_QUOTA, Email, NewAccount, UserDirectory,
    UserDirectoryError,
};
use secrecy::{ExposeSecret, Secret};
use sqlx::{PgPool, Row, postgres::PgRow};

/// PostgreSQL-backed [`UserDirectory`]. The `accounts.email` unique index
/// is the registration race arbiter; violations surface as
/// [`UserDirectoryError::AlreadyExists`].
#[derive(Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn roles_for(&self, account_id: i64) -> Result<BTreeSet<AccountRole>, UserDirectoryError> {
        let rows = sqlx::query("SELECT role FROM account_roles WHERE account_id = $1")
            .bind(account_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| UserDirectoryError::Unexpected(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let raw: String = row
                    .try_get("role")
                    .map_err(|e| UserDirectoryError::Unexpected(e.to_string()))?;
                AccountRole::parse(&raw)
                    .ok_or_else(|| UserDirectoryError::Unexpected(format!("unknown role {raw}")))
            })
            .collect()
    }

    async fn account_from_row(&self, row: PgRow) -> Result<Account, UserDirectoryError> {
        let unexpected = |e: sqlx::Error| UserDirectoryError::Unexpected(e.to_string());

        let id: i64 = row.try_get("id").map_err(unexpected)?;
        let email: String = row.try_get("email").map_err(unexpected)?;
        let password_hash: String = row.try_get("password_hash").map_err(unexpected)?;
        let status: String = row.try_get("status").map_err(unexpected)?;

        Ok(Account {
            id,
            email: Email::parse(&email)
                .map_err(|e| UserDirectoryError::Unexpected(e.to_string()))?,
            password_hash: Secret::from(password_hash),
            first_name: row.try_get("first_name").map_err(unexpected)?,
            last_name: row.try_get("last_name").map_err(unexpected)?,
            status: AccountStatus::parse(&status)
                .ok_or_else(|| UserDirectoryError::Unexpected(format!("unknown status {status}")))?,
            roles: self.roles_for(id).await?,
            quota: row.try_get("quota").map_err(unexpected)?,
            created_at: row.try_get("created_at").map_err(unexpected)?,
            last_login: row.try_get("last_login").map_err(unexpected)?,
        })
    }
}

const SELECT_ACCOUNT: &str = "SELECT id, email, password_hash, first_name, last_name, status, \
                              quota, created_at, last_login FROM accounts";

#[async_trait::async_trait]
impl UserDirectory for PostgresUserDirectory {
    #[tracing::instrument(name = "Adding account to PostgreSQL", skip_all)]
    async fn insert(&self, account: NewAccount) -> Result<Account, UserDirectoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| UserDirectoryError::Unexpected(e.to_string()))?;

        let row = sqlx::query(
            "INSERT INTO accounts (email, password_hash, first_name, last_name, status, quota) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id, created_at",
        )
        .bind(account.email.as_str())
        .bind(account.password_hash.expose_secret())
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(AccountStatus::Active.as_str())
        .bind(DEFAULT_QUOTA)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.constraint().is_some() {
                    return UserDirectoryError::AlreadyExists;
                }
            }
            UserDirectoryError::Unexpected(e.to_string())
        })?;

        let id: i64 = row
            .try_get("id")
            .map_err(|e| UserDirectoryError::Unexpected(e.to_string()))?;
        let created_at: DateTime<Utc> = row
            .try_get("created_at")
            .map_err(|e| UserDirectoryError::Unexpected(e.to_string()))?;

        sqlx::query("INSERT INTO account_roles (account_id, role) VALUES ($1, $2)")
            .bind(id)
            .bind(AccountRole::User.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| UserDirectoryError::Unexpected(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| UserDirectoryError::Unexpected(e.to_string()))?;

        Ok(Account {
            id,
            email: account.email,
            password_hash: account.password_hash,
            first_name: account.first_name,
            last_name: account.last_name,
            status: AccountStatus::Active,
            roles: BTreeSet::from([AccountRole::User]),
            quota: DEFAULT_QUOTA.to_owned(),
            created_at,
            last_login: None,
        })
    }

    #[tracing::instrument(name = "Fetching account by email from PostgreSQL", skip_all)]
    async fn find_by_email(&self, email: &Email) -> Result<Account, UserDirectoryError> {
        let row = sqlx::query(&format!("{SELECT_ACCOUNT} WHERE email = $1"))
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserDirectoryError::Unexpected(e.to_string()))?
            .ok_or(UserDirectoryError::NotFound)?;

        self.account_from_row(row).await
    }

    #[tracing::instrument(name = "Fetching account by id from PostgreSQL", skip_all)]
    async fn find_by_id(&self, id: i64) -> Result<Account, UserDirectoryError> {
        let row = sqlx::query(&format!("{SELECT_ACCOUNT} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserDirectoryError::Unexpected(e.to_string()))?
            .ok_or(UserDirectoryError::NotFound)?;

        self.account_from_row(row).await
    }

    #[tracing::instrument(name = "Updating account password in PostgreSQL", skip_all)]
    async fn update_password(
        &self,
        id: i64,
        password_hash: Secret<String>,
    ) -> Result<(), UserDirectoryError> {
        let result = sqlx::query("UPDATE accounts SET password_hash = $1 WHERE id = $2")
            .bind(password_hash.expose_secret())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| UserDirectoryError::Unexpected(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserDirectoryError::NotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Touching last login in PostgreSQL", skip_all)]
    async fn touch_last_login(&self, id: i64, at: DateTime<Utc>) -> Result<(), UserDirectoryError> {
        let result = sqlx::query("UPDATE accounts SET last_login = $1 WHERE id = $2")
            .bind(at)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| UserDirectoryError::Unexpected(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserDirectoryError::NotFound);
        }
        Ok(())
    }
}
