//! Process configuration, read from the environment (after `.env`).

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Signing key used when `JWT_SECRET` is unset. Kept so an unconfigured
/// server still starts; anything real must set `JWT_SECRET`.
pub const DEFAULT_JWT_SECRET: &str = "MY_SUPER_SECRET_KEY";

pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://localhost:4173",
    "https://matts-cio-challenge.netlify.app",
];

#[derive(Clone)]
pub struct Config {
    pub jwt_secret: String,
    /// True when `jwt_secret` is [`DEFAULT_JWT_SECRET`].
    pub using_default_secret: bool,
    pub host: String,
    pub port: u16,
    /// `:memory:` keeps everything in a private in-memory store.
    pub db_path: PathBuf,
    /// Directory holding `users.csv` and `notifications.csv`; `None` skips seeding.
    pub seed_dir: Option<PathBuf>,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let (jwt_secret, using_default_secret) = match var("JWT_SECRET") {
            Some(secret) => (secret, false),
            None => (DEFAULT_JWT_SECRET.to_string(), true),
        };

        let port = match var("PORT") {
            Some(p) => p.parse().with_context(|| format!("invalid PORT '{}'", p))?,
            None => 8080,
        };

        // Set-but-empty disables seeding, unset uses ./seed
        let seed_dir = match lookup("COURIER_SEED_DIR") {
            Some(dir) if dir.is_empty() => None,
            Some(dir) => Some(PathBuf::from(dir)),
            None => Some(PathBuf::from("seed")),
        };

        let cors_origins = match var("COURIER_CORS_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            jwt_secret,
            using_default_secret,
            host: var("COURIER_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            db_path: var("COURIER_DB_PATH").unwrap_or_else(|| courier_db::IN_MEMORY.into()).into(),
            seed_dir,
            cors_origins,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("jwt_secret", &"<redacted>")
            .field("using_default_secret", &self.using_default_secret)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("db_path", &self.db_path)
            .field("seed_dir", &self.seed_dir)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}
