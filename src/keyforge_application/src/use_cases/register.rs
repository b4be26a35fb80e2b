use keyforge_core::{Email, NewAccount, Password, UserDirectory, UserDirectoryError};
use serde::{Deserialize, Serialize};

use crate::password_hasher::{PasswordHashError, PasswordHasher};

/// Projection returned to a freshly registered caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredAccount {
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("Account already exists for email : {0}")]
    AccountAlreadyExists(Email),
    #[error("Registration failed: {0}")]
    RegistrationFailed(String),
}

impl From<PasswordHashError> for RegisterError {
    fn from(error: PasswordHashError) -> Self {
        RegisterError::RegistrationFailed(error.to_string())
    }
}

/// Register use case - creates an account with the default role
pub struct RegisterUseCase<'a, D>
where
    D: UserDirectory,
{
    directory: &'a D,
    hasher: &'a PasswordHasher,
}

impl<'a, D> RegisterUseCase<'a, D>
where
    D: UserDirectory,
{
    pub fn new(directory: &'a D, hasher: &'a PasswordHasher) -> Self {
        Self { directory, hasher }
    }

    #[tracing::instrument(name = "RegisterUseCase::execute", skip_all, fields(email = %email))]
    pub async fn execute(
        &self,
        email: Email,
        password: Password,
        first_name: String,
        last_name: String,
    ) -> Result<RegisteredAccount, RegisterError> {
        let password_hash = self.hasher.hash(password).await?;

        let account = self
            .directory
            .insert(NewAccount {
                email: email.clone(),
                password_hash,
                first_name,
                last_name,
            })
            .await
            .map_err(|e| match e {
                UserDirectoryError::AlreadyExists => {
                    tracing::error!(%email, "account already exists");
                    RegisterError::AccountAlreadyExists(email)
                }
                other => RegisterError::RegistrationFailed(other.to_string()),
            })?;

        tracing::info!(email = %account.email, "successfully created account");
        Ok(RegisteredAccount {
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
        })
    }
}
