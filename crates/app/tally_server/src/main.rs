//! Tally API server binary.

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use tally_core::auth::jwt::DEFAULT_TOKEN_VALIDITY_SECS;

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "tally_server", about = "Tally todo API server")]
struct Args {
    /// Address to bind the HTTP listener.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3000")]
    bind_addr: String,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/tally"
    )]
    database_url: String,

    /// Token validity window in seconds.
    #[arg(long, env = "TOKEN_TTL_SECS", default_value_t = DEFAULT_TOKEN_VALIDITY_SECS)]
    token_ttl_secs: i64,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tally_api=debug,tally_core=debug".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    info!(database_url = %args.database_url, bind_addr = %args.bind_addr, "starting tally_server");

    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&args.database_url)
        .await?;

    info!("running database migrations");
    tally_api::migrate(&pool).await?;

    let config = tally_api::config::ApiConfig {
        bind_addr: args.bind_addr,
        pg_connection_url: args.database_url,
        jwt_secret: tally_core::auth::jwt::resolve_jwt_secret(),
        token_validity_secs: args.token_ttl_secs,
    };

    let state = tally_api::AppState {
        pool,
        config: config.clone(),
    };
    let app = tally_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app).await?;

    Ok(())
}
