use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::contracts::TransitionPolicy;
use crate::offers::OfferDeletionPolicy;

const DEFAULT_NUMBER_ATTEMPTS: u8 = 5;
const MAX_NUMBER_ATTEMPTS: u8 = 20;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub identity: IdentityConfig,
    pub contracts: ContractPolicyConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = match env::var("APP_LOG_FORMAT") {
            Ok(raw) => LogFormat::parse(&raw).ok_or(ConfigError::InvalidPolicy {
                variable: "APP_LOG_FORMAT",
                value: raw,
            })?,
            Err(_) => LogFormat::Compact,
        };

        let admin_tokens = env::var("APP_ADMIN_TOKENS")
            .map(|raw| split_tokens(&raw))
            .unwrap_or_default();

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                format: log_format,
            },
            identity: IdentityConfig { admin_tokens },
            contracts: ContractPolicyConfig::from_env()?,
        })
    }
}

fn split_tokens(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing output controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Some(Self::Compact),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Bearer tokens accepted by the development identity provider.
#[derive(Clone, Default)]
pub struct IdentityConfig {
    pub admin_tokens: Vec<String>,
}

impl fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("admin_tokens", &format_args!("[{} redacted]", self.admin_tokens.len()))
            .finish()
    }
}

/// Product decisions around contract numbering and referential behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractPolicyConfig {
    pub number_attempts: u8,
    pub transitions: TransitionPolicy,
    pub offer_deletion: OfferDeletionPolicy,
}

impl Default for ContractPolicyConfig {
    fn default() -> Self {
        Self {
            number_attempts: DEFAULT_NUMBER_ATTEMPTS,
            transitions: TransitionPolicy::Permissive,
            offer_deletion: OfferDeletionPolicy::Detach,
        }
    }
}

impl ContractPolicyConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(raw) = env::var("APP_CONTRACT_NUMBER_ATTEMPTS") {
            config.number_attempts = raw
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|attempts| (1..=MAX_NUMBER_ATTEMPTS).contains(attempts))
                .ok_or(ConfigError::InvalidNumberAttempts)?;
        }

        if let Ok(raw) = env::var("APP_CONTRACT_TRANSITIONS") {
            config.transitions =
                TransitionPolicy::parse(&raw).ok_or(ConfigError::InvalidPolicy {
                    variable: "APP_CONTRACT_TRANSITIONS",
                    value: raw,
                })?;
        }

        if let Ok(raw) = env::var("APP_OFFER_DELETE_POLICY") {
            config.offer_deletion =
                OfferDeletionPolicy::parse(&raw).ok_or(ConfigError::InvalidPolicy {
                    variable: "APP_OFFER_DELETE_POLICY",
                    value: raw,
                })?;
        }

        Ok(config)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumberAttempts,
    InvalidPolicy {
        variable: &'static str,
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumberAttempts => write!(
                f,
                "APP_CONTRACT_NUMBER_ATTEMPTS must be between 1 and {MAX_NUMBER_ATTEMPTS}"
            ),
            ConfigError::InvalidPolicy { variable, value } => {
                write!(f, "{variable} does not accept '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumberAttempts
            | ConfigError::InvalidPolicy { .. } => None,
        }
    }
}
