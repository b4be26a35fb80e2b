//! Smoke test that the facade re-exports compose into a working engine.

use keyforge::{
    AuthState, Email, HashMapLoginAttemptRepository, HashMapPasswordResetRepository,
    HashMapRefreshTokenRepository, HashMapUserDirectory, JwtConfig, LoginUseCase, MockEmailClient,
    Password, RefreshUseCase, RegisterUseCase, Secret, TokenCodec,
};

fn state() -> AuthState<
    HashMapUserDirectory,
    HashMapRefreshTokenRepository,
    HashMapPasswordResetRepository,
    HashMapLoginAttemptRepository,
    MockEmailClient,
> {
    AuthState::new(
        HashMapUserDirectory::new(),
        HashMapRefreshTokenRepository::new(),
        HashMapPasswordResetRepository::new(),
        HashMapLoginAttemptRepository::new(),
        MockEmailClient::new(),
        TokenCodec::new(JwtConfig {
            issuer: "https://keyforge.test".to_owned(),
            audience: "keyforge".to_owned(),
            signing_key: Secret::from("facade-test-key".to_owned()),
            access_ttl_seconds: 900,
            refresh_ttl_seconds: 86_400,
            reset_ttl_seconds: 1800,
        }),
    )
}

#[tokio::test]
async fn register_login_refresh_through_the_facade() {
    let state = state();
    let email = Email::parse("user@example.com").unwrap();
    let password = Password::parse(Secret::from("Abc12345!".to_owned())).unwrap();

    RegisterUseCase::new(&state.directory, &state.hasher)
        .execute(
            email.clone(),
            password.clone(),
            "Ada".to_owned(),
            "Lovelace".to_owned(),
        )
        .await
        .unwrap();

    let pair = LoginUseCase::new(
        &state.directory,
        &state.refresh_tokens,
        &state.attempts,
        &state.hasher,
        &state.codec,
    )
    .execute(email, password)
    .await
    .unwrap();

    let renewed = RefreshUseCase::new(&state.directory, &state.refresh_tokens, &state.codec)
        .execute(&pair.refresh_token)
        .await
        .unwrap();
    assert_ne!(renewed.refresh_token, pair.refresh_token);
}
