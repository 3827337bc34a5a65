use std::env;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use chrono::FixedOffset;

use crate::error::ConfigError;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BREVO_API_URL: &str = "https://api.brevo.com";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_SENDER_NAME: &str = "Karlin Pharmaceuticals Website";
const DEFAULT_COMPANY_NAME: &str = "Karlin Pharmaceuticals";
const DEFAULT_RELAY_TIMEOUT_SECS: u64 = 10;
const DEFAULT_RATE_LIMIT_MAX: u32 = 5;
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 15 * 60;
/// India Standard Time, where the inbox is read
const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;

/// Deployment mode; development echoes provider error detail to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn exposes_error_detail(self) -> bool {
        self == Environment::Development
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

/// Who the relayed mail comes from and goes to
#[derive(Clone)]
pub struct MailboxConfig {
    pub sender_name: String,
    pub sender_email: String,
    pub recipient: String,
    /// Used in the subject line and body heading
    pub company_name: String,
    /// Offset the "Submitted" timestamp is rendered in
    pub utc_offset: FixedOffset,
}

#[derive(Clone)]
pub struct BrevoConfig {
    pub api_key: String,
    pub api_url: String,
}

#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// Outbound transport, picked from whichever credentials are present
#[derive(Clone)]
pub enum TransportConfig {
    Brevo(BrevoConfig),
    Smtp(SmtpConfig),
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

#[derive(Debug, Clone)]
pub enum AllowedOrigins {
    Any,
    List(Vec<HeaderValue>),
}

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub transport: TransportConfig,
    pub mailbox: MailboxConfig,
    pub relay_timeout: Duration,
    pub rate_limit: RateLimitConfig,
    pub allowed_origins: AllowedOrigins,
    /// Take the client IP from X-Forwarded-For / X-Real-IP (behind a reverse proxy)
    pub trust_proxy: bool,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let transport = if let Some(api_key) = get("BREVO_API_KEY") {
            TransportConfig::Brevo(BrevoConfig {
                api_key,
                api_url: get("BREVO_API_URL")
                    .unwrap_or_else(|| DEFAULT_BREVO_API_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
            })
        } else if let Some(host) = get("SMTP_HOST") {
            TransportConfig::Smtp(SmtpConfig {
                host,
                port: parse_or(get("SMTP_PORT"), "SMTP_PORT", DEFAULT_SMTP_PORT)?,
                username: required("SMTP_USER")?,
                password: required("SMTP_PASS")?,
            })
        } else {
            return Err(ConfigError::NoTransport);
        };

        let offset_minutes: i32 = parse_or(
            get("SUBMISSION_UTC_OFFSET_MINUTES"),
            "SUBMISSION_UTC_OFFSET_MINUTES",
            DEFAULT_UTC_OFFSET_MINUTES,
        )?;
        let utc_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| ConfigError::Invalid {
                key: "SUBMISSION_UTC_OFFSET_MINUTES",
                reason: format!("{} is out of range", offset_minutes),
            })?;

        let mailbox = MailboxConfig {
            sender_name: get("FROM_NAME").unwrap_or_else(|| DEFAULT_SENDER_NAME.to_string()),
            sender_email: required("FROM_EMAIL")?,
            recipient: required("TO_EMAIL")?,
            company_name: get("COMPANY_NAME").unwrap_or_else(|| DEFAULT_COMPANY_NAME.to_string()),
            utc_offset,
        };

        let relay_timeout_secs: u64 = parse_or(
            get("RELAY_TIMEOUT_SECS"),
            "RELAY_TIMEOUT_SECS",
            DEFAULT_RELAY_TIMEOUT_SECS,
        )?;
        let max_requests: u32 =
            parse_or(get("RATE_LIMIT_MAX"), "RATE_LIMIT_MAX", DEFAULT_RATE_LIMIT_MAX)?;
        let window_secs: u64 = parse_or(
            get("RATE_LIMIT_WINDOW_SECS"),
            "RATE_LIMIT_WINDOW_SECS",
            DEFAULT_RATE_LIMIT_WINDOW_SECS,
        )?;

        for (key, value) in [
            ("RELAY_TIMEOUT_SECS", relay_timeout_secs),
            ("RATE_LIMIT_MAX", u64::from(max_requests)),
            ("RATE_LIMIT_WINDOW_SECS", window_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    key,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        let environment = match get("APP_ENV") {
            Some(value) => value.parse().map_err(|reason| ConfigError::Invalid {
                key: "APP_ENV",
                reason,
            })?,
            None => Environment::Production,
        };

        Ok(Self {
            port: parse_or(get("PORT"), "PORT", DEFAULT_PORT)?,
            transport,
            mailbox,
            relay_timeout: Duration::from_secs(relay_timeout_secs),
            rate_limit: RateLimitConfig {
                max_requests,
                window: Duration::from_secs(window_secs),
            },
            allowed_origins: parse_origins(get("ALLOWED_ORIGINS"))?,
            trust_proxy: parse_flag(get("TRUST_PROXY"), "TRUST_PROXY", false)?,
            environment,
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// Boolean switch; accepts the usual spellings in any case
fn parse_flag(value: Option<String>, key: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = value else {
        return Ok(default);
    };

    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            reason: format!("expected true or false, got {}", raw),
        }),
    }
}

fn parse_origins(value: Option<String>) -> Result<AllowedOrigins, ConfigError> {
    let Some(raw) = value else {
        return Ok(AllowedOrigins::Any);
    };
    if raw == "*" {
        return Ok(AllowedOrigins::Any);
    }

    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin.trim_end_matches('/')).map_err(|e| ConfigError::Invalid {
                key: "ALLOWED_ORIGINS",
                reason: format!("{}: {}", origin, e),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(AllowedOrigins::List)
}
