pub mod hashmap_token_stores;
pub mod hashmap_user_directory;
pub mod postgres_token_stores;
pub mod postgres_user_directory;

pub use hashmap_token_stores::{
    HashMapLoginAttemptRepository, HashMapPasswordResetRepository, HashMapRefreshTokenRepository,
};
pub use hashmap_user_directory::HashMapUserDirectory;
pub use postgres_token_stores::{
    PostgresLoginAttemptRepository, PostgresPasswordResetRepository,
    PostgresRefreshTokenRepository,
};
pub use postgres_user_directory::PostgresUserDirectory;
