use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

/// Postgres connection settings.
///
/// `DATABASE_URL` wins when present, otherwise the discrete `DB_*` variables are used.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DbConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let url = std::env::var("DATABASE_URL").ok();
        let part = |key: &str| -> anyhow::Result<String> {
            match (&url, std::env::var(key)) {
                (_, Ok(v)) => Ok(v),
                (Some(_), Err(_)) => Ok(String::new()),
                (None, Err(_)) => anyhow::bail!("{key} must be set when DATABASE_URL is not"),
            }
        };
        let port = part("DB_PORT")?;
        Ok(Self {
            host: part("DB_HOST")?,
            port: if port.is_empty() {
                5432
            } else {
                port.parse().context("DB_PORT must be a port number")?
            },
            name: part("DB_NAME")?,
            user: part("DB_USER")?,
            password: part("DB_PASSWORD")?,
            url,
            max_connections: env_parse("DB_MAX_CONNECTIONS", 10),
            acquire_timeout: Duration::from_secs(env_parse("DB_ACQUIRE_TIMEOUT_SECS", 5)),
        })
    }

    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        if let Some(url) = &self.url {
            return url.parse().context("parse DATABASE_URL");
        }
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.user)
            .password(&self.password))
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

impl JwtConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            secret: check_secret(
                std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            )?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "tablegate".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "tablegate-clients".into()),
            ttl_minutes: env_parse("JWT_TTL_MINUTES", 30),
        })
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub db: DbConfig,
    pub schema: String,
    /// `None` serves the open variant without `/token`.
    pub jwt: Option<JwtConfig>,
}

impl GatewayConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let require_auth = env_flag("GATEWAY_REQUIRE_AUTH", true)?;
        Ok(Self {
            db: DbConfig::from_env()?,
            schema: std::env::var("GATEWAY_SCHEMA").unwrap_or_else(|_| "public".into()),
            jwt: if require_auth {
                Some(JwtConfig::from_env()?)
            } else {
                None
            },
        })
    }
}

/// Third-party keys file, read once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeys {
    #[serde(rename = "sendMail")]
    pub send_mail: SendMailKeys,
    #[serde(rename = "empaMail")]
    pub sender: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendMailKeys {
    #[serde(rename = "SENDGRID_API_KEY")]
    pub sendgrid_api_key: String,
}

impl ApiKeys {
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read api keys from {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))
    }
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub keys: ApiKeys,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct AccountsConfig {
    pub db: DbConfig,
    pub mail: MailConfig,
    pub app_name: String,
}

impl AccountsConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let keys_path = std::env::var("API_KEYS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("authorization.json"));
        Ok(Self {
            db: DbConfig::from_env()?,
            mail: MailConfig {
                keys: ApiKeys::load(&keys_path)?,
                api_base: std::env::var("SENDGRID_API_BASE")
                    .unwrap_or_else(|_| "https://api.sendgrid.com".into()),
            },
            app_name: std::env::var("APP_NAME").unwrap_or_else(|_| "tablegate".into()),
        })
    }
}

#[derive(Debug, Clone)]
pub struct LinksConfig {
    pub backends: Vec<String>,
    pub timeout: Duration,
}

impl LinksConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let raw = std::env::var("LINK_BACKENDS")
            .unwrap_or_else(|_| "http://db1.example.com,http://db2.example.com".into());
        let backends = parse_backends(&raw);
        if backends.is_empty() {
            anyhow::bail!("LINK_BACKENDS must name at least one backend");
        }
        Ok(Self {
            backends,
            timeout: Duration::from_secs(env_parse("LINK_TIMEOUT_SECS", 10)),
        })
    }
}

/// Splits a comma-separated backend list, dropping blanks and trailing slashes.
pub fn parse_backends(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
        .collect()
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// HMAC keys shorter than this are rejected at startup.
pub const MIN_SECRET_LEN: usize = 32;

fn check_secret(secret: String) -> anyhow::Result<String> {
    if secret.trim().is_empty() {
        anyhow::bail!("JWT_SECRET must not be empty");
    }
    if secret.len() < MIN_SECRET_LEN {
        anyhow::bail!("JWT_SECRET must be at least {MIN_SECRET_LEN} bytes");
    }
    Ok(secret)
}

fn env_flag(key: &str, default: bool) -> anyhow::Result<bool> {
    parse_flag(key, std::env::var(key).ok().as_deref(), default)
}

fn parse_flag(key: &str, raw: Option<&str>, default: bool) -> anyhow::Result<bool> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("{key} must be true or false, got {other:?}"),
    }
}
