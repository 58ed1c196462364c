//! Runtime Configuration
//! Mission: Resolve server settings from flags, environment, and .env files

use anyhow::{bail, Result};
use clap::Parser;
use std::path::Path;

const DEV_JWT_SECRET: &str = "dev-secret-change-in-production-minimum-32-characters";

/// One year
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// Fallback when `RUST_LOG` is unset; covers the library and the server binary
pub const DEFAULT_LOG_FILTER: &str = "notes_backend=debug,notes_server=debug";

#[derive(Parser, Debug, Clone)]
#[command(name = "notes-server")]
#[command(about = "Note-taking REST backend with token authentication")]
pub struct Config {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// SQLite database path (or ":memory:")
    #[arg(long, env = "DATABASE_URL", default_value = "notes.db")]
    pub database_url: String,

    /// Secret used to sign session tokens
    #[arg(long, env = "JWT_SECRET", default_value = DEV_JWT_SECRET, hide_default_value = true)]
    pub jwt_secret: String,

    /// Session token lifetime in hours
    #[arg(long, env = "TOKEN_TTL_HOURS", default_value = "24")]
    pub token_ttl_hours: i64,

    /// bcrypt work factor
    #[arg(long, env = "BCRYPT_COST", default_value_t = bcrypt::DEFAULT_COST)]
    pub bcrypt_cost: u32,

    /// Build the application without binding a listener
    #[arg(long, env = "APP_TEST_MODE")]
    pub test_mode: bool,
}

impl Config {
    /// Load `.env` files, then parse flags with environment fallbacks
    pub fn load() -> Result<Self> {
        load_env();
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            bail!("PORT must be between 1 and 65535");
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            bail!("BCRYPT_COST must be between 4 and 31, got {}", self.bcrypt_cost);
        }
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&self.token_ttl_hours) {
            bail!(
                "TOKEN_TTL_HOURS must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_HOURS,
                self.token_ttl_hours
            );
        }
        if self.jwt_secret.trim().is_empty() {
            bail!("JWT_SECRET must not be empty");
        }
        Ok(())
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn load_env() {
    // cwd + parents first
    let _ = dotenv::dotenv();

    // CARGO_MANIFEST_DIR points at the crate root at compile time.
    let candidate = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if candidate.exists() {
        let _ = dotenv::from_path(&candidate);
    }
}
