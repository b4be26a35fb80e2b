use color_eyre::eyre::Result;
use keyforge_adapters::{
    AuthState, PostgresLoginAttemptRepository, PostgresPasswordResetRepository,
    PostgresRefreshTokenRepository, PostgresUserDirectory, PostmarkEmailClient, Settings,
};
use keyforge_application::TokenCodec;
use keyforge_core::Email;
use keyforge_service::{AuthService, telemetry::init_tracing};
use reqwest::Client as HttpClient;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;
    init_tracing()?;

    let settings = Settings::load()?;

    let pg_pool = PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(settings.database.url.expose_secret())
        .await?;

    sqlx::migrate!().run(&pg_pool).await?;

    let http_client = HttpClient::builder()
        .timeout(settings.email.timeout())
        .build()?;
    let email_client = PostmarkEmailClient::new(
        settings.email.base_url.clone(),
        Email::parse(&settings.email.sender)
            .map_err(|e| color_eyre::eyre::eyre!("invalid sender address: {e}"))?,
        settings.email.authorization_token.clone(),
        settings.email.reset_base_url.clone(),
        http_client,
    );

    let state = AuthState::new(
        PostgresUserDirectory::new(pg_pool.clone()),
        PostgresRefreshTokenRepository::new(pg_pool.clone()),
        PostgresPasswordResetRepository::new(pg_pool.clone()),
        PostgresLoginAttemptRepository::new(pg_pool),
        email_client,
        TokenCodec::new(settings.jwt.to_jwt_config()),
    );

    let address = format!(
        "{}:{}",
        settings.application.host, settings.application.port
    );
    let listener = TcpListener::bind(&address).await?;

    AuthService::new(state)
        .with_trace_layer()
        .run(listener)
        .await?;

    Ok(())
}
