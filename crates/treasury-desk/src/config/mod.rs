use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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

pub const MAX_FORECAST_HORIZON_DAYS: u32 = 90;

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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            engine: EngineConfig::from_env()?,
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Rule-engine and persistence settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// JSON state file; `None` keeps state in memory for the process lifetime.
    pub state_path: Option<PathBuf>,
    pub mock_seed: u64,
    pub forecast_horizon_days: u32,
    pub fallback_cash_balance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            state_path: None,
            mock_seed: 42,
            forecast_horizon_days: 7,
            fallback_cash_balance: 0.0,
        }
    }
}

impl EngineConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let state_path = env::var("TREASURY_STATE_PATH")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let mock_seed = match env::var("TREASURY_MOCK_SEED") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidSeed)?,
            Err(_) => defaults.mock_seed,
        };

        let forecast_horizon_days = match env::var("TREASURY_FORECAST_HORIZON_DAYS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|days| (1..=MAX_FORECAST_HORIZON_DAYS).contains(days))
                .ok_or(ConfigError::InvalidHorizon)?,
            Err(_) => defaults.forecast_horizon_days,
        };

        let fallback_cash_balance = match env::var("TREASURY_FALLBACK_CASH") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or(ConfigError::InvalidFallbackCash)?,
            Err(_) => defaults.fallback_cash_balance,
        };

        Ok(Self {
            state_path,
            mock_seed,
            forecast_horizon_days,
            fallback_cash_balance,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSeed,
    InvalidHorizon,
    InvalidFallbackCash,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSeed => write!(f, "TREASURY_MOCK_SEED must be a valid u64"),
            ConfigError::InvalidHorizon => write!(
                f,
                "TREASURY_FORECAST_HORIZON_DAYS must be between 1 and {}",
                MAX_FORECAST_HORIZON_DAYS
            ),
            ConfigError::InvalidFallbackCash => {
                write!(f, "TREASURY_FALLBACK_CASH must be a finite number")
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "TREASURY_STATE_PATH",
            "TREASURY_MOCK_SEED",
            "TREASURY_FORECAST_HORIZON_DAYS",
            "TREASURY_FALLBACK_CASH",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_engine_settings() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("TREASURY_STATE_PATH", "/var/lib/treasury/state.json");
        env::set_var("TREASURY_MOCK_SEED", "7");
        env::set_var("TREASURY_FORECAST_HORIZON_DAYS", "14");
        env::set_var("TREASURY_FALLBACK_CASH", "2500.5");

        let engine = AppConfig::load().expect("config loads").engine;
        assert_eq!(
            engine.state_path,
            Some(PathBuf::from("/var/lib/treasury/state.json"))
        );
        assert_eq!(engine.mock_seed, 7);
        assert_eq!(engine.forecast_horizon_days, 14);
        assert_eq!(engine.fallback_cash_balance, 2500.5);
        reset_env();
    }

    #[test]
    fn rejects_out_of_range_horizon() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("TREASURY_FORECAST_HORIZON_DAYS", "0");
        let error = AppConfig::load().expect_err("zero horizon rejected");
        assert!(matches!(error, ConfigError::InvalidHorizon));
        reset_env();
    }
}
