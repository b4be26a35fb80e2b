pub mod config;
pub mod email;
pub mod http;
pub mod persistence;

pub use config::Settings;
pub use email::{MockEmailClient, PostmarkEmailClient};
pub use http::{AuthState, routes};
pub use persistence::{
    HashMapLoginAttemptRepository, HashMapPasswordResetRepository, HashMapRefreshTokenRepository,
    HashMapUserDirectory, PostgresLoginAttemptRepository, PostgresPasswordResetRepository,
    PostgresRefreshTokenRepository, PostgresUserDirectory,
};
