pub mod login_attempts;
pub mod password_hasher;
pub mod password_reset;
pub mod refresh_tokens;
pub mod token_codec;
pub mod use_cases;

pub use login_attempts::LoginAttemptRecorder;
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use password_reset::{PasswordResetError, PasswordResetFlow};
pub use refresh_tokens::{RefreshTokenStore, RefreshValidationError};
pub use token_codec::{Claims, JwtConfig, TokenCodec, TokenCodecError, TokenKind, TokenPair};
pub use use_cases::{
    current_user::{CurrentUserError, CurrentUserUseCase},
    forgot_password::{ForgotPasswordError, ForgotPasswordUseCase},
    login::{LoginError, LoginUseCase},
    refresh::{RefreshError, RefreshUseCase},
    register::{RegisterError, RegisterUseCase, RegisteredAccount},
    reset_password::{ResetPasswordError, ResetPasswordUseCase},
};
