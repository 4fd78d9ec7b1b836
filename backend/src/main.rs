//! Bloggle REST API server.

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use bloggle_backend::{routes, state};
use bloggle_shared::Database;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let db_path = env::var("DATABASE_PATH").unwrap_or_else(|_| "./data/bloggle.db".to_string());

    tracing::info!("Starting Bloggle backend server");
    tracing::info!("Database path: {}", db_path);

    let db = Database::open(&PathBuf::from(db_path))?;
    let app_state = state::AppState::new(db);
    let app = routes::create_router(app_state);

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());
    let addr = format!("{}:{}", bind_addr, port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
