//! # Admin Panel Server
//!
//! REST back end for the internal administration panel, built with Axum and
//! Tokio on top of PostgreSQL.
//!
//! ## Features
//! - `POST /login` verifies credentials against `staging.users` (Argon2id)
//!   and issues a one-hour HS256 session token
//! - Bearer-token middleware guarding every resource route
//! - Employee (`usuarios`) CRUD over a repository trait
//! - Structured logging with tracing
//!
//! ## Architecture
//! - `server`: router assembly and startup
//! - `config`: environment variable configuration
//! - `auth`: verifier, token service, password hashing, middleware
//! - `database`: connection pool, credential store, repositories, migrations
//! - `routes`: HTTP handlers
//!
//! ## Running the Server
//! ```bash
//! JWT_SECRET=... DATABASE_URL=postgres://root:pw@localhost:5432/datalake cargo run
//! ```
//!
//! ## Seeding an account
//! ```bash
//! echo -n 'secret' | cargo run -- hash-password
//! # INSERT INTO staging.users (username, password_hash) VALUES ('alice', '<output>');
//! ```

mod auth;
mod config;
mod database;
mod error;
mod routes;
mod server;

#[cfg(test)]
mod testing;

use std::io::Read;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::auth::password::PasswordHasher;
use crate::config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    // Missing .env is fine; variables may come from the real environment.
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();

    let result = match std::env::args().nth(1).as_deref() {
        Some("hash-password") => hash_password_from_stdin(),
        Some(other) => Err(anyhow::anyhow!("unknown command: {}", other)),
        None => run().await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    tracing::info!("🏁 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    tracing::info!("🏗️  Build profile: {}", if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    });

    let config = Config::from_env().context("Failed to load configuration from environment")?;

    server::start(config).await
}

/// Prints the Argon2id hash of the password read from stdin.
fn hash_password_from_stdin() -> Result<()> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read password from stdin")?;
    let password = input.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        anyhow::bail!("password must not be empty");
    }

    println!("{}", PasswordHasher::default().hash(password)?);
    Ok(())
}
