use keyforge_core::{AccountView, UserDirectory};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CurrentUserError {
    #[error("Account does not exists")]
    AccountDoesNotExist,
}

/// Fetch-current-user use case - projects an account to its public view.
/// The caller supplies an account id taken from an already-verified access
/// token subject.
pub struct CurrentUserUseCase<'a, D>
where
    D: UserDirectory,
{
    directory: &'a D,
}

impl<'a, D> CurrentUserUseCase<'a, D>
where
    D: UserDirectory,
{
    pub fn new(directory: &'a D) -> Self {
        Self { directory }
    }

    #[tracing::instrument(name = "CurrentUserUseCase::execute", skip(self))]
    pub async fn execute(&self, account_id: i64) -> Result<AccountView, CurrentUserError> {
        let account = self.directory.find_by_id(account_id).await.map_err(|e| {
            tracing::error!(account_id, error = %e, "account lookup failed");
            CurrentUserError::AccountDoesNotExist
        })?;
        Ok(AccountView::from(&account))
    }
}

#[cfg(test)]
mod tests {
    use keyforge_core::{AccountRole, Email, Password};
    use secrecy::Secret;

    use crate::password_hasher::PasswordHasher;
    use crate::use_cases::register::RegisterUseCase;
    use crate::use_cases::test_support::MockDirectory;

    use super::*;

    #[tokio::test]
    async fn existing_account_projects_to_its_public_view() {
        let directory = MockDirectory::default();
        let hasher = PasswordHasher::new();
        RegisterUseCase::new(&directory, &hasher)
            .execute(
                Email::parse("user@example.com").unwrap(),
                Password::parse(Secret::from("Abc12345!".to_owned())).unwrap(),
                "Ada".to_owned(),
                "Lovelace".to_owned(),
            )
            .await
            .unwrap();

        let view = CurrentUserUseCase::new(&directory).execute(1).await.unwrap();
        assert_eq!(view.email.as_str(), "user@example.com");
        assert_eq!(view.first_name, "Ada");
        assert!(view.roles.contains(&AccountRole::User));
    }

    #[tokio::test]
    async fn missing_account_reports_not_found() {
        let directory = MockDirectory::default();
        let result = CurrentUserUseCase::new(&directory).execute(42).await;
        assert_eq!(result, Err(CurrentUserError::AccountDoesNotExist));
    }
}
