use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use secrecy::Secret;
use serde::{Deserialize, Serialize};

use crate::domain::email::Email;

/// Storage quota assigned to accounts that never had one set explicitly.
pub const DEFAULT_QUOTA: &str = "10GB";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountRole {
    User,
    Admin,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::User => "USER",
            AccountRole::Admin => "ADMIN",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "USER" => Some(AccountRole::User),
            "ADMIN" => Some(AccountRole::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    Active,
    Suspended,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "ACTIVE",
            AccountStatus::Suspended => "SUSPENDED",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "ACTIVE" => Some(AccountStatus::Active),
            "SUSPENDED" => Some(AccountStatus::Suspended),
            _ => None,
        }
    }
}

/// A registered identity with credentials, roles and status.
///
/// Invariants: the email is unique within the directory and the role set is
/// never empty (`USER` is granted at registration).
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i64,
    pub email: Email,
    pub password_hash: Secret<String>,
    pub first_name: String,
    pub last_name: String,
    pub status: AccountStatus,
    pub roles: BTreeSet<AccountRole>,
    pub quota: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl Account {
    pub fn role_names(&self) -> BTreeSet<String> {
        self.roles.iter().map(|r| r.as_str().to_owned()).collect()
    }
}

/// Payload for creating an account. The directory assigns id, timestamps,
/// the default `USER` role, `ACTIVE` status and the default quota.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: Email,
    pub password_hash: Secret<String>,
    pub first_name: String,
    pub last_name: String,
}

/// Projection of an [`Account`] safe to hand to callers: everything except
/// the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: i64,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub status: AccountStatus,
    pub roles: BTreeSet<AccountRole>,
    pub quota: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            status: account.status,
            roles: account.roles.clone(),
            quota: account.quota.clone(),
            created_at: account.created_at,
            last_login: account.last_login,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account {
            id: 7,
            email: Email::parse("user@example.com").unwrap(),
            password_hash: Secret::from("$argon2id$stub".to_owned()),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            status: AccountStatus::Active,
            roles: BTreeSet::from([AccountRole::User, AccountRole::Admin]),
            quota: DEFAULT_QUOTA.to_owned(),
            created_at: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn role_names_render_uppercase() {
        let names = account().role_names();
        assert!(names.contains("USER"));
        assert!(names.contains("ADMIN"));
    }

    #[test]
    fn roles_round_trip_through_strings() {
        for role in [AccountRole::User, AccountRole::Admin] {
            assert_eq!(AccountRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(AccountRole::parse("ROOT"), None);
    }

    #[test]
    fn view_omits_the_password_hash() {
        let view = AccountView::from(&account());
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("passwordHash"));
        assert!(json.contains(r#""email":"user@example.com""#));
    }
}
