use anyhow::{Context, Result};
use eshop_auth::application::{
    commands::users::RegisterUserCommand,
    error::ApplicationError,
    ports::{
        authorization_code::AuthorizationCodeStore,
        security::{PasswordHasher, TokenManager},
        time::Clock,
        util::CodeGenerator,
    },
    services::ApplicationServices,
};
use eshop_auth::config::{AppConfig, CodeStoreBackend, SeedUser};
use eshop_auth::domain::user::UserRepository;
use eshop_auth::infrastructure::{
    database,
    repositories::PostgresUserRepository,
    security::{
        authorization_code_store::InMemoryAuthorizationCodeStore,
        password::Argon2PasswordHasher,
        postgres_authorization_code_store::PostgresAuthorizationCodeStore,
        redis_authorization_code_store::RedisAuthorizationCodeStore, token::BiscuitTokenManager,
    },
    sweeper::spawn_code_sweeper,
    time::SystemClock,
    util::OsRngCodeGenerator,
};
use eshop_auth::presentation::http::{routes::build_router_with_rate_limiter, state::HttpState};
use sqlx::PgPool;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err:#}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    let pool = database::init_pool(config.database_url())
        .await
        .context("connecting to postgres")?;
    database::run_migrations(&pool)
        .await
        .context("running migrations")?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let user_repo: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(pool.clone()));
    let code_store = build_code_store(config.code_store(), &pool)?;
    let password_hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher);
    let token_manager: Arc<dyn TokenManager> = Arc::new(BiscuitTokenManager::new(
        config.token_signing_key(),
        config.access_token_ttl(),
        Arc::clone(&clock),
    )?);
    let code_generator: Arc<dyn CodeGenerator> = Arc::new(OsRngCodeGenerator);

    let services = Arc::new(ApplicationServices::new(
        user_repo,
        code_store,
        password_hasher,
        token_manager,
        code_generator,
        clock,
        config.auth_code_ttl(),
    ));

    if let Some(seed) = config.seed_user() {
        seed_user(&services, seed).await?;
    }

    if let Some(period) = config.code_sweep_interval() {
        spawn_code_sweeper(Arc::clone(&services.authorization_codes), period);
    }

    let state = HttpState {
        services: Arc::clone(&services),
    };
    let app = build_router_with_rate_limiter(state, config.rate_limit_enabled());

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

fn build_code_store(
    backend: &CodeStoreBackend,
    pool: &PgPool,
) -> Result<Arc<dyn AuthorizationCodeStore>> {
    let store: Arc<dyn AuthorizationCodeStore> = match backend {
        CodeStoreBackend::Postgres => Arc::new(PostgresAuthorizationCodeStore::new(pool.clone())),
        CodeStoreBackend::Redis { url } => Arc::new(RedisAuthorizationCodeStore::from_url(url)?),
        CodeStoreBackend::Memory => {
            tracing::warn!("authorization codes are kept in process memory");
            Arc::new(InMemoryAuthorizationCodeStore::new())
        }
    };
    Ok(store)
}

async fn seed_user(services: &ApplicationServices, seed: &SeedUser) -> Result<()> {
    let command = RegisterUserCommand {
        email: seed.email.clone(),
        name: seed.name.clone(),
        password: seed.password.clone(),
    };

    match services.user_commands.register(command).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, "seed user created");
            Ok(())
        }
        Err(ApplicationError::Conflict(_)) => {
            tracing::debug!("seed user already present");
            Ok(())
        }
        Err(err) => Err(err).context("creating seed user"),
    }
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
