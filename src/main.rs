//! Application entry point for the `drought-dashboard` backend service.
//!
//! This binary orchestrates the full startup sequence:
//! - Initializing structured logging/tracing
//! - Loading configuration from environment variables or `.env`
//! - Opening the SQLite connection pool
//! - Creating the database schema if it does not exist
//! - Seeding synthetic nationwide data when the store is empty
//! - Mounting all API routes via the `routes` gateway (EMBP pattern)
//! - Binding the Axum HTTP server and serving requests
//!
//! # Environment Variables
//! - `DATABASE_URL` (optional) – SQLite URL (default: `sqlite://drought_system.db`)
//! - `DB_POOL_MAX` (optional) – maximum number of DB connections (default: 5)
//! - `PORT` (optional) – listen port (default: 3000)
//! - `SEED_RNG_SEED` (optional) – fixed seed for the first-boot data
//! - `GEMINI_API_KEY` (optional) – enables the chat assistant
//! - `AXUM_LOG_LEVEL` (optional) – log verbosity (default: `debug`)
//! - `AXUM_SPAN_EVENTS` (optional) – span event mode for tracing
use std::{env, net::SocketAddr};

use anyhow::{Context, Result};
use axum::Router;
use dotenvy::dotenv;
use is_terminal::IsTerminal;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use drought_dashboard::{config, db, routes, schema, seed};

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    init_tracing();
    dotenv().ok();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    tracing::info!("Opening database: {}", cfg.db_url);
    let pool = db::connect(&cfg).await?;
    tracing::info!("Successfully connected to database");

    schema::create_schema(&pool)
        .await
        .context("Failed to create schema")?;

    let mut rng = match cfg.seed_rng_seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    seed::seed_if_empty(&pool, &mut rng)
        .await
        .context("Failed to seed initial data")?;

    // Build app from routes gateway (EMBP)
    let app: Router = routes::router(pool.clone(), cfg.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ---

/// Install the process-wide log subscriber for the dashboard server.
///
/// Events print one compact line each, tagged with target, file and line.
/// Knobs, all read from the environment before `.env` is loaded:
/// - `RUST_LOG` wins outright when set
/// - otherwise `AXUM_LOG_LEVEL` picks the base level (default `debug`);
///   sqlx statement logging is held at `warn` so seeding stays readable
/// - `AXUM_SPAN_EVENTS=full` or `enter_exit` adds span lifecycle events on
///   top of the default CLOSE timing line
/// - `FORCE_COLOR` overrides TTY detection for ANSI colour
///
/// Must run once, before the first log line.
fn init_tracing() {
    // ---
    let span_events = match env::var("AXUM_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    };

    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1" | "true" | "yes") => true,
        Ok("0" | "false" | "no") => false,
        _ => std::io::stdout().is_terminal(),
    };

    let env_filter = match env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::new(default_directives(env::var("AXUM_LOG_LEVEL").ok().as_deref())),
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}

/// Filter directives used when `RUST_LOG` is unset. Unknown levels fall back
/// to `debug`.
fn default_directives(level: Option<&str>) -> String {
    let level = level
        .and_then(|l| l.parse::<tracing::Level>().ok())
        .unwrap_or(tracing::Level::DEBUG);
    format!("{},sqlx::query=warn", level.to_string().to_lowercase())
}
