use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::user::service::AuthService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::mail::LoggingMailer;
use account_service::outbound::repositories::PostgresUserRepository;
use account_service::outbound::reset_tokens::PostgresResetTokenLedger;
use account_service::outbound::reset_tokens::SignedResetTokens;
use auth::Authenticator;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        access_expiration_minutes = config.jwt.access_expiration_minutes,
        refresh_expiration_hours = config.jwt.refresh_expiration_hours,
        reset_expiration_minutes = config.password_reset.expiration_minutes,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let authenticator = Arc::new(Authenticator::new(
        config.jwt.secret.as_bytes(),
        config.jwt.lifetimes(),
    ));
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let reset_tokens = Arc::new(SignedResetTokens::new(
        Arc::clone(&authenticator),
        Arc::new(PostgresResetTokenLedger::new(pg_pool)),
        config.password_reset.lifetime(),
    ));
    let mailer = Arc::new(LoggingMailer::new(
        config.password_reset.link_base_url.clone(),
    ));

    let auth_service = Arc::new(AuthService::new(
        user_repository,
        reset_tokens,
        mailer,
        Arc::clone(&authenticator),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, authenticator);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited");
    Ok(())
}
