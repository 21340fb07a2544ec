use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

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
    pub engine: EngineConfig,
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

        let engine = EngineConfig::load_from_env()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            engine,
        })
    }
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Declared range for the credit score. Scores outside the range are a
/// computation fault, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBounds {
    pub min: u16,
    pub max: u16,
}

impl ScoreBounds {
    pub const fn contains(&self, score: u16) -> bool {
        score >= self.min && score <= self.max
    }

    pub const fn span(&self) -> u16 {
        self.max - self.min
    }
}

impl Default for ScoreBounds {
    fn default() -> Self {
        Self { min: 300, max: 900 }
    }
}

/// Tuning knobs for the evaluation engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub bounds: ScoreBounds,
    pub scoring_timeout: Duration,
    pub top_schemes: usize,
    pub profile_write_retries: u32,
}

impl EngineConfig {
    fn load_from_env() -> Result<Self, ConfigError> {
        let min = parse_env_u16("APP_SCORE_MIN", 300)?;
        let max = parse_env_u16("APP_SCORE_MAX", 900)?;
        if min == 0 || max <= min {
            return Err(ConfigError::InvalidScoreBounds { min, max });
        }

        let timeout_ms = parse_env_u64("APP_SCORING_TIMEOUT_MS", 2_000)?;
        let top_schemes = parse_env_u64("APP_TOP_SCHEMES", 3)? as usize;
        let profile_write_retries = parse_env_u64("APP_PROFILE_WRITE_RETRIES", 3)? as u32;

        Ok(Self {
            bounds: ScoreBounds { min, max },
            scoring_timeout: Duration::from_millis(timeout_ms),
            top_schemes,
            profile_write_retries,
        })
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bounds: ScoreBounds::default(),
            scoring_timeout: Duration::from_millis(2_000),
            top_schemes: 3,
            profile_write_retries: 3,
        }
    }
}

fn parse_env_u16(key: &'static str, default: u16) -> Result<u16, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
    }
}

fn parse_env_u64(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
    InvalidScoreBounds { min: u16, max: u16 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a non-negative integer")
            }
            ConfigError::InvalidScoreBounds { min, max } => {
                write!(f, "score bounds {min}..{max} are not a valid range")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
