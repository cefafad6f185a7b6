use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::workflows::triage::{InvalidConfig, ScoringWeights};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variables feeding the `weights.*` options, in option-key order.
const WEIGHT_VARS: [&str; 4] = [
    "APP_WEIGHTS_SEVERITY",
    "APP_WEIGHTS_CONDITION",
    "APP_WEIGHTS_TRAFFIC",
    "APP_WEIGHTS_PROXIMITY",
];

/// Deployment stage the process runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnvironment {
    #[default]
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Everything the service and CLI read from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringWeights,
    /// Defect export served instead of the bundled dataset.
    pub defects_csv: Option<PathBuf>,
}

impl AppConfig {
    /// Reads `.env` (when present) and then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = read_var("APP_ENV")
            .map(|raw| AppEnvironment::parse(&raw))
            .unwrap_or_default();

        Ok(Self {
            environment,
            server: ServerConfig::from_env()?,
            telemetry: TelemetryConfig::from_env()?,
            scoring: scoring_weights_from_env()?,
            defects_csv: read_var("APP_DEFECTS_CSV").map(PathBuf::from),
        })
    }
}

/// Non-empty, trimmed value of `name`.
fn read_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn scoring_weights_from_env() -> Result<ScoringWeights, ConfigError> {
    let mut options = Vec::with_capacity(WEIGHT_VARS.len());
    for (var, key) in WEIGHT_VARS.into_iter().zip(ScoringWeights::OPTION_KEYS) {
        let Some(raw) = read_var(var) else {
            continue;
        };
        let value = raw
            .parse::<f64>()
            .map_err(|_| ConfigError::InvalidWeight { var })?;
        options.push((key, value));
    }

    ScoringWeights::from_options(options).map_err(ConfigError::Weights)
}

/// HTTP listener binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let host = read_var("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match read_var("APP_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        Ok(Self { host, port })
    }

    /// Resolves the bind address. `localhost` maps to the IPv4 loopback.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse::<IpAddr>()
                .map_err(|source| ConfigError::InvalidHost {
                    host: self.host.clone(),
                    source,
                })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
}

impl LogFormat {
    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "compact" => Some(Self::Compact),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Log filter and output layout for the tracing subscriber.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

impl TelemetryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let log_level = read_var("APP_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let log_format = match read_var("APP_LOG_FORMAT") {
            Some(raw) => LogFormat::parse(&raw).ok_or(ConfigError::InvalidLogFormat(raw))?,
            None => LogFormat::default(),
        };
        Ok(Self {
            log_level,
            log_format,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort(String),
    InvalidHost {
        host: String,
        source: std::net::AddrParseError,
    },
    InvalidLogFormat(String),
    InvalidWeight { var: &'static str },
    Weights(InvalidConfig),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort(raw) => write!(f, "APP_PORT '{raw}' is not a port number"),
            ConfigError::InvalidHost { host, .. } => {
                write!(f, "APP_HOST '{host}' is neither localhost nor an IP address")
            }
            ConfigError::InvalidLogFormat(raw) => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'pretty', got '{raw}'")
            }
            ConfigError::InvalidWeight { var } => write!(f, "{var} must be a number"),
            ConfigError::Weights(err) => write!(f, "scoring weights rejected: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source, .. } => Some(source),
            ConfigError::Weights(err) => Some(err),
            ConfigError::InvalidPort(_)
            | ConfigError::InvalidLogFormat(_)
            | ConfigError::InvalidWeight { .. } => None,
        }
    }
}
