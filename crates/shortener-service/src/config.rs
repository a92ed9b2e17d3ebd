use secrecy::SecretString;
use std::collections::HashMap;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8082";

/// Default per-attempt timeout for SSO RPC calls in milliseconds.
pub const DEFAULT_SSO_TIMEOUT_MS: u64 = 1000;

/// Default maximum number of SSO RPC attempts.
pub const DEFAULT_SSO_RETRIES: u32 = 3;

/// Default length of generated aliases.
pub const DEFAULT_ALIAS_LENGTH: usize = 6;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    /// Symmetric key the SSO service signs user tokens with.
    pub app_secret: SecretString,
    /// gRPC endpoint of the SSO service, e.g. `http://sso:44044`.
    pub sso_address: String,
    /// Per-attempt timeout for SSO RPC calls.
    pub sso_timeout: Duration,
    /// Maximum number of SSO RPC attempts (>= 1).
    pub sso_retries: u32,
    pub alias_length: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let app_secret = vars
            .get("APP_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("APP_SECRET".to_string()))?;

        let sso_address = vars
            .get("SSO_ADDRESS")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("SSO_ADDRESS".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let sso_timeout_ms = parse_var(vars, "SSO_TIMEOUT_MS", DEFAULT_SSO_TIMEOUT_MS)?;
        let sso_retries: u32 = parse_var(vars, "SSO_RETRIES", DEFAULT_SSO_RETRIES)?;
        let alias_length = parse_var(vars, "ALIAS_LENGTH", DEFAULT_ALIAS_LENGTH)?;

        if sso_retries == 0 {
            return Err(ConfigError::InvalidValue {
                var: "SSO_RETRIES".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Config {
            bind_address,
            app_secret: SecretString::from(app_secret.as_str()),
            sso_address,
            sso_timeout: Duration::from_millis(sso_timeout_ms),
            sso_retries,
            alias_length,
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    vars: &HashMap<String, String>,
    var: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match vars.get(var) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e| ConfigError::InvalidValue {
            var: var.to_string(),
            reason: format!("{e}"),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn required_vars() -> HashMap<String, String> {
        HashMap::from([
            ("APP_SECRET".to_string(), "test-secret".to_string()),
            ("SSO_ADDRESS".to_string(), "http://localhost:44044".to_string()),
        ])
    }

    #[test]
    fn test_from_vars_success_with_defaults() {
        let config = Config::from_vars(&required_vars()).expect("Config should load successfully");

        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.sso_address, "http://localhost:44044");
        assert_eq!(config.sso_timeout, Duration::from_millis(DEFAULT_SSO_TIMEOUT_MS));
        assert_eq!(config.sso_retries, DEFAULT_SSO_RETRIES);
        assert_eq!(config.alias_length, DEFAULT_ALIAS_LENGTH);
    }

    #[test]
    fn test_from_vars_overrides() {
        let mut vars = required_vars();
        vars.insert("BIND_ADDRESS".to_string(), "127.0.0.1:9000".to_string());
        vars.insert("SSO_TIMEOUT_MS".to_string(), "250".to_string());
        vars.insert("SSO_RETRIES".to_string(), "5".to_string());
        vars.insert("ALIAS_LENGTH".to_string(), "10".to_string());

        let config = Config::from_vars(&vars).expect("Config should load successfully");

        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.sso_timeout, Duration::from_millis(250));
        assert_eq!(config.sso_retries, 5);
        assert_eq!(config.alias_length, 10);
    }

    #[test]
    fn test_from_vars_missing_app_secret() {
        let mut vars = required_vars();
        vars.remove("APP_SECRET");

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "APP_SECRET"));
    }

    #[test]
    fn test_from_vars_empty_app_secret() {
        let mut vars = required_vars();
        vars.insert("APP_SECRET".to_string(), String::new());

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "APP_SECRET"));
    }

    #[test]
    fn test_from_vars_missing_sso_address() {
        let mut vars = required_vars();
        vars.remove("SSO_ADDRESS");

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "SSO_ADDRESS"));
    }

    #[test]
    fn test_from_vars_invalid_timeout() {
        let mut vars = required_vars();
        vars.insert("SSO_TIMEOUT_MS".to_string(), "not-a-number".to_string());

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::InvalidValue { var, .. }) if var == "SSO_TIMEOUT_MS"));
    }

    #[test]
    fn test_from_vars_zero_retries_rejected() {
        let mut vars = required_vars();
        vars.insert("SSO_RETRIES".to_string(), "0".to_string());

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::InvalidValue { var, .. }) if var == "SSO_RETRIES"));
    }

    #[test]
    fn test_app_secret_is_redacted_in_debug() {
        let config = Config::from_vars(&required_vars()).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("test-secret"));
    }
}
