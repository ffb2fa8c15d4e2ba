use anyhow::{bail, Context, Result};

const DEFAULT_DATABASE_URL: &str = "sqlite://db/mydb.sqlite";
const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Which lookup enrichments the profile page action runs alongside the
/// completion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enrichment {
    /// Attach exact/higher/lower SAT percentile rows for the submitted score.
    pub sat_data: bool,
    /// Attach admissions bands for the colleges named in the completion.
    pub college_data: bool,
}

impl Enrichment {
    pub const NONE: Enrichment = Enrichment {
        sat_data: false,
        college_data: false,
    };
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub openai_api_key: String,
    pub openai_api_base: String,
    pub enrichment: Enrichment,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            db_max_connections: optional_env("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse::<u32>()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_api_base: optional_env("OPENAI_API_BASE")
                .unwrap_or_else(|| DEFAULT_OPENAI_API_BASE.to_string()),
            enrichment: Enrichment {
                sat_data: bool_env("ENRICH_SAT_DATA", true)?,
                college_data: bool_env("ENRICH_COLLEGE_DATA", true)?,
            },
            port: optional_env("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn bool_env(key: &str, default: bool) -> Result<bool> {
    match optional_env(key) {
        Some(raw) => parse_bool(&raw)
            .with_context(|| format!("Environment variable '{key}' must be a boolean")),
        None => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => bail!("unrecognised boolean '{other}'"),
    }
}
