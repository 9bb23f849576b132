use std::env;
use std::time::Duration;

use crate::shared::constants::{DEFAULT_CASE_API_URL, DEFAULT_UPSTREAM_USER_AGENT};

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub case_api: CaseApiConfig,
    pub reports: ReportsConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

/// Connection settings for the upstream forensic case API
#[derive(Debug, Clone)]
pub struct CaseApiConfig {
    /// Base URL without trailing slash, e.g. `https://case-api.example.com`
    pub base_url: String,
    pub request_timeout: Duration,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct ReportsConfig {
    /// How long an aggregated report feed may be served from memory.
    /// Zero disables the feed cache.
    pub feed_cache_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            case_api: CaseApiConfig::from_env()?,
            reports: ReportsConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024; // 1MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let cors_allowed_origins = parse_origins(
            &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl CaseApiConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 15;

    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("CASE_API_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CASE_API_URL.to_string());
        let base_url = normalize_base_url(&base_url)?;

        let timeout_secs = env::var("CASE_API_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "CASE_API_TIMEOUT_SECS must be a valid number".to_string())?;

        let user_agent = env::var("CASE_API_USER_AGENT")
            .unwrap_or_else(|_| DEFAULT_UPSTREAM_USER_AGENT.to_string());

        Ok(Self {
            base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            user_agent,
        })
    }
}

impl ReportsConfig {
    pub fn from_env() -> Result<Self, String> {
        let ttl_secs = env::var("REPORT_FEED_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "0".to_string())
            .parse::<u64>()
            .map_err(|_| "REPORT_FEED_CACHE_TTL_SECS must be a valid number".to_string())?;

        Ok(Self {
            feed_cache_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Forensic Case Gateway API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "Aggregated case reports and dental charts for the forensic mobile app".to_string()
        });

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

/// Split a comma-separated origin list, dropping blanks
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn normalize_base_url(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(format!(
            "CASE_API_URL must start with http:// or https:// (got '{}')",
            raw
        ));
    }
    Ok(trimmed.to_string())
}
