use crate::decision::{LendingPolicy, PolicyError};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

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

/// Top-level configuration for the decision service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub policy: LendingPolicy,
}

impl AppConfig {
    /// Read `.env` and the `APP_*` variables. The lending policy is loaded once here and
    /// never reloaded while the process runs.
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
        let format = LogFormat::from_str(
            &env::var("APP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
        );

        let policy = policy_from_env()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, format },
            policy,
        })
    }
}

/// Lending policy named by `APP_POLICY_PATH`, or the standard one when unset.
///
/// Reads `.env` like [`AppConfig::load`] but ignores the server and telemetry variables,
/// so callers that only evaluate decisions are not tied to a valid listener setup.
pub fn load_policy_from_env() -> Result<LendingPolicy, ConfigError> {
    dotenvy::dotenv().ok();
    policy_from_env()
}

fn policy_from_env() -> Result<LendingPolicy, ConfigError> {
    match env::var_os("APP_POLICY_PATH") {
        Some(path) => load_policy(Path::new(&path)),
        None => Ok(LendingPolicy::standard()),
    }
}

/// Parse and validate a JSON-serialized [`LendingPolicy`].
pub fn load_policy(path: &Path) -> Result<LendingPolicy, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::PolicyRead {
        path: path.to_path_buf(),
        source,
    })?;
    let policy: LendingPolicy =
        serde_json::from_str(&raw).map_err(|source| ConfigError::PolicyParse {
            path: path.to_path_buf(),
            source,
        })?;
    policy.validate()?;
    Ok(policy)
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

/// Output layout for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Full,
}

impl LogFormat {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" | "verbose" => Self::Full,
            _ => Self::Compact,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    PolicyRead {
        path: PathBuf,
        source: std::io::Error,
    },
    PolicyParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidPolicy(PolicyError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::PolicyRead { path, .. } => {
                write!(f, "unable to read lending policy from {}", path.display())
            }
            ConfigError::PolicyParse { path, .. } => {
                write!(f, "lending policy in {} is not valid JSON", path.display())
            }
            ConfigError::InvalidPolicy(err) => write!(f, "lending policy rejected: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::PolicyRead { source, .. } => Some(source),
            ConfigError::PolicyParse { source, .. } => Some(source),
            ConfigError::InvalidPolicy(err) => Some(err),
        }
    }
}

impl From<PolicyError> for ConfigError {
    fn from(value: PolicyError) -> Self {
        Self::InvalidPolicy(value)
    }
}
