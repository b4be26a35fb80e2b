pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    account::{Account, AccountRole, AccountStatus, AccountView, NewAccount, DEFAULT_QUOTA},
    email::{Email, EmailError},
    password::{Password, PasswordError},
    records::{LoginAttemptRecord, PasswordResetRecord, RefreshTokenRecord},
};

pub use ports::{
    repositories::{
        LoginAttemptRepository, PasswordResetRepository, RefreshTokenRepository, StoreError,
        UserDirectory, UserDirectoryError,
    },
    services::EmailClient,
};
