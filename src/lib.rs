//! # Keyforge - Identity & Token Lifecycle Library
//!
//! Facade crate re-exporting the public APIs of the keyforge components.
//! Use this crate to get the whole identity engine in one place.
//!
//! ## Structure
//!
//! - **Core domain types**: `Email`, `Password`, `Account`, token records
//! - **Repository traits**: `UserDirectory`, `RefreshTokenRepository`,
//!   `PasswordResetRepository`, `LoginAttemptRepository`
//! - **Engine components**: `PasswordHasher`, `TokenCodec`,
//!   `RefreshTokenStore`, `PasswordResetFlow`, `LoginAttemptRecorder`
//! - **Use cases**: `RegisterUseCase`, `LoginUseCase`, `RefreshUseCase`, etc.
//! - **Adapters**: `PostgresUserDirectory`, `PostmarkEmailClient`,
//!   in-memory HashMap doubles, configuration, HTTP routes
//! - **Service**: `AuthService` - the composed HTTP entry point

/// Core domain types and value objects
pub mod core {
    pub use keyforge_core::*;
}

// Re-export most commonly used core types at the root level
pub use keyforge_core::{
    Account, AccountRole, AccountStatus, AccountView, Email, EmailClient, LoginAttemptRecord,
    LoginAttemptRepository, NewAccount, Password, PasswordResetRecord, PasswordResetRepository,
    RefreshTokenRecord, RefreshTokenRepository, StoreError, UserDirectory, UserDirectoryError,
};

/// Engine components and application use cases
pub mod application {
    pub use keyforge_application::*;
}

// Re-export the engine and use cases at root level
pub use keyforge_application::{
    Claims, CurrentUserUseCase, ForgotPasswordUseCase, JwtConfig, LoginAttemptRecorder,
    LoginUseCase, PasswordHasher, PasswordResetFlow, RefreshTokenStore, RefreshUseCase,
    RegisterUseCase, ResetPasswordUseCase, TokenCodec, TokenKind, TokenPair,
};

/// Infrastructure adapters
pub mod adapters {
    /// HTTP state and route handlers
    pub mod http {
        pub use keyforge_adapters::http::*;
    }

    /// Persistence implementations
    pub mod persistence {
        pub use keyforge_adapters::persistence::*;
    }

    /// Email client implementations
    pub mod email {
        pub use keyforge_adapters::email::*;
    }

    /// Configuration
    pub mod config {
        pub use keyforge_adapters::config::*;
    }
}

// Re-export commonly used adapters at root level
pub use keyforge_adapters::{
    AuthState, Settings,
    email::{MockEmailClient, PostmarkEmailClient},
    persistence::{
        HashMapLoginAttemptRepository, HashMapPasswordResetRepository,
        HashMapRefreshTokenRepository, HashMapUserDirectory, PostgresLoginAttemptRepository,
        PostgresPasswordResetRepository, PostgresRefreshTokenRepository, PostgresUserDirectory,
    },
};

/// Main auth service
pub use keyforge_service::AuthService;

// Re-export common external dependencies
/// Re-export async-trait for implementing repository traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};

pub use http;
