//! Orders API - service entry point
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────┐    ┌────────────┐
//! │ Handlers │───▶│ Service  │───▶│   Repo   │───▶│ PostgreSQL │
//! │  (axum)  │    │ (rules)  │    │  (sqlx)  │    │ / in-mem   │
//! └──────────┘    └──────────┘    └──────────┘    └────────────┘
//! ```
//!
//! Flags: `--env <name>` (config/<name>.yaml), `--port <n>`, `--memory`.

use std::sync::Arc;

use anyhow::Context;

use orders_api::config::AppConfig;
use orders_api::db::Database;
use orders_api::gateway::{self, state::AppState};
use orders_api::{InMemoryOrderRepository, OrderRepository, PgOrderRepository};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

fn use_memory_mode() -> bool {
    std::env::args().any(|a| a == "--memory")
}

async fn build_repository(config: &AppConfig) -> anyhow::Result<Arc<dyn OrderRepository>> {
    match config.postgres_url.as_deref() {
        Some(url) if !use_memory_mode() => {
            let db = Database::connect(url)
                .await
                .context("Failed to connect to PostgreSQL")?;
            db.health_check()
                .await
                .context("PostgreSQL health check failed")?;
            db.ensure_schema()
                .await
                .context("Failed to prepare orders schema")?;
            let repository: Arc<dyn OrderRepository> =
                Arc::new(PgOrderRepository::new(db.pool().clone()));
            Ok(repository)
        }
        _ => {
            tracing::warn!("Using in-memory order store; orders are lost on restart");
            let repository: Arc<dyn OrderRepository> = Arc::new(InMemoryOrderRepository::new());
            Ok(repository)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let app_config = AppConfig::load(&env)?;
    let _log_guard = orders_api::logging::init_logging(&app_config);

    tracing::info!("Starting Orders API in {} mode", env);

    let repository = build_repository(&app_config).await?;
    let state = Arc::new(AppState::new(repository));

    let port = get_port_override().unwrap_or(app_config.gateway.port);
    let addr = format!("{}:{}", app_config.gateway.host, port);

    gateway::run_server(&addr, state).await
}
