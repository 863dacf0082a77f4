//! Backend entry-point: wires configuration, migrations, and the REST surface.

mod server;

use std::net::SocketAddr;

use actix_web::web;
use clap::Parser;
use diesel::Connection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ecoswap_backend::inbound::http::health::HealthState;
use ecoswap_backend::outbound::persistence::{DbPool, PoolConfig};
use server::ServerConfig;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// EcoSwap marketplace backend.
#[derive(Debug, Parser)]
#[command(name = "ecoswap-backend")]
struct Cli {
    /// Socket address to bind the HTTP server to.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    bind_addr: SocketAddr,

    /// PostgreSQL connection URL; fixture data is served when absent.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Maximum number of pooled database connections.
    #[arg(long, env = "DB_POOL_SIZE", default_value_t = 10)]
    db_pool_size: u32,
}

fn run_migrations(database_url: &str) -> std::io::Result<()> {
    let mut conn = diesel::pg::PgConnection::establish(database_url)
        .map_err(|err| std::io::Error::other(format!("database connection failed: {err}")))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| std::io::Error::other(format!("migrations failed: {err}")))?;
    for migration in applied {
        info!(%migration, "applied migration");
    }
    Ok(())
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();

    let mut config = ServerConfig::new(cli.bind_addr);
    if let Some(database_url) = &cli.database_url {
        run_migrations(database_url)?;
        let pool = DbPool::new(
            PoolConfig::new(database_url.clone()).with_max_size(cli.db_pool_size),
        )
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(bind_addr = %cli.bind_addr, "starting ecoswap backend");
    let server = server::create_server(health_state, config)?;
    server.await
}
