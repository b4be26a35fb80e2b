use keyforge_core::{
    LoginAttemptRecord, LoginAttemptRepository, PasswordResetRecord, PasswordResetRepository,
    RefreshTokenRecord, RefreshTokenRepository, StoreError,
};
use sqlx::{PgPool, Row, postgres::PgRow};

fn database_error(e: sqlx::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

/// PostgreSQL refresh-token rows. `ORDER BY id DESC LIMIT 1` implements the
/// recency ordering that supersedes older tokens without deleting them.
#[derive(Clone)]
pub struct PostgresRefreshTokenRepository {
    pool: PgPool,
}

impl PostgresRefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn refresh_record_from_row(row: &PgRow) -> Result<RefreshTokenRecord, StoreError> {
    Ok(RefreshTokenRecord {
        account_id: row.try_get("account_id").map_err(database_error)?,
        token: row.try_get("token").map_err(database_error)?,
        expires_at: row.try_get("expires_at").map_err(database_error)?,
        created_at: row.try_get("created_at").map_err(database_error)?,
    })
}

#[async_trait::async_trait]
impl RefreshTokenRepository for PostgresRefreshTokenRepository {
    #[tracing::instrument(name = "Persisting refresh token row", skip_all)]
    async fn persist(&self, record: RefreshTokenRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO refresh_tokens (account_id, token, expires_at, created_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(record.account_id)
        .bind(&record.token)
        .bind(record.expires_at)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;
        Ok(())
    }

    #[tracing::instrument(name = "Fetching latest refresh token row", skip_all)]
    async fn latest_for_account(
        &self,
        account_id: i64,
    ) -> Result<Option<RefreshTokenRecord>, StoreError> {
        let row = sqlx::query(
            "SELECT account_id, token, expires_at, created_at FROM refresh_tokens \
             WHERE account_id = $1 ORDER BY id DESC LIMIT 1",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref().map(refresh_record_from_row).transpose()
    }
}

#[derive(Clone)]
pub struct PostgresPasswordResetRepository {
    pool: PgPool,
}

impl PostgresPasswordResetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PasswordResetRepository for PostgresPasswordResetRepository {
    #[tracing::instrument(name = "Persisting password reset row", skip_all)]
    async fn persist(&self, record: PasswordResetRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO password_resets (account_id, reset_token, expires_at, created_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(record.account_id)
        .bind(&record.reset_token)
        .bind(record.expires_at)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;
        Ok(())
    }

    #[tracing::instrument(name = "Fetching latest password reset row", skip_all)]
    async fn latest_for_account(
        &self,
        account_id: i64,
    ) -> Result<Option<PasswordResetRecord>, StoreError> {
        let row = sqlx::query(
            "SELECT account_id, reset_token, expires_at, created_at FROM password_resets \
             WHERE account_id = $1 ORDER BY id DESC LIMIT 1",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(|row| {
            Ok(PasswordResetRecord {
                account_id: row.try_get("account_id").map_err(database_error)?,
                reset_token: row.try_get("reset_token").map_err(database_error)?,
                expires_at: row.try_get("expires_at").map_err(database_error)?,
                created_at: row.try_get("created_at").map_err(database_error)?,
            })
        })
        .transpose()
    }
}

#[derive(Clone)]
pub struct PostgresLoginAttemptRepository {
    pool: PgPool,
}

impl PostgresLoginAttemptRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl LoginAttemptRepository for PostgresLoginAttemptRepository {
    #[tracing::instrument(name = "Appending login attempt row", skip_all)]
    async fn append(&self, record: LoginAttemptRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO login_attempts (account_id, attempted_at, success) VALUES ($1, $2, $3)",
        )
        .bind(record.account_id)
        .bind(record.attempted_at)
        .bind(record.success)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;
        Ok(())
    }
}
