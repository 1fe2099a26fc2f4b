//! Configuration module for the RBAC policy adapter.
//!
//! Workspace credentials and the project id come from `STYTCH_*`
//! environment variables; adapter tuning comes from `RBACPOLICY_*`.

use std::fmt;
use std::time::Duration;

use config::{Config as ConfigLoader, Environment, Map};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;

pub const WORKSPACE_KEY_ID_VAR: &str = "STYTCH_WORKSPACE_KEY_ID";
pub const WORKSPACE_KEY_SECRET_VAR: &str = "STYTCH_WORKSPACE_KEY_SECRET";
pub const PROJECT_ID_VAR: &str = "STYTCH_PROJECT_ID";

const DEFAULT_API_BASE_URL: &str = "https://management.stytch.com";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVariable(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] config::ConfigError),
}

/// Root configuration structure.
#[derive(Clone)]
pub struct Config {
    pub workspace_key_id: String,
    pub workspace_key_secret: String,
    pub project_id: String,
    /// Base URL of the management API.
    pub api_base_url: String,
    /// Per-call timeout for the management API.
    pub request_timeout: Duration,
    /// Serve over a local HTTP listener instead of the event runtime.
    pub listen_addr: Option<String>,
}

/// `STYTCH_*` variables, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StytchVars {
    workspace_key_id: Option<String>,
    workspace_key_secret: Option<String>,
    project_id: Option<String>,
}

/// `RBACPOLICY_*` variables.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AdapterVars {
    api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    listen_addr: Option<String>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(None)
    }

    /// Load configuration from an explicit set of variables instead of the
    /// process environment.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut source = Map::new();
        for (key, value) in vars {
            source.insert(key.into(), value.into());
        }
        Self::build(Some(source))
    }

    fn build(source: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        let stytch: StytchVars = load_prefixed("STYTCH", source.clone())?;
        let adapter: AdapterVars = load_prefixed("RBACPOLICY", source)?;

        validate(stytch, adapter)
    }
}

/// Deserialize the variables under one prefix. Prefixes never mix.
fn load_prefixed<T: DeserializeOwned>(
    prefix: &str,
    source: Option<Map<String, String>>,
) -> Result<T, ConfigError> {
    Ok(ConfigLoader::builder()
        .add_source(Environment::with_prefix(prefix).source(source))
        .build()?
        .try_deserialize()?)
}

/// Checks required values in a fixed order and reports the first one
/// that is missing or empty.
fn validate(stytch: StytchVars, adapter: AdapterVars) -> Result<Config, ConfigError> {
    let workspace_key_id = required(stytch.workspace_key_id, WORKSPACE_KEY_ID_VAR)?;
    let workspace_key_secret = required(stytch.workspace_key_secret, WORKSPACE_KEY_SECRET_VAR)?;
    let project_id = required(stytch.project_id, PROJECT_ID_VAR)?;

    Ok(Config {
        workspace_key_id,
        workspace_key_secret,
        project_id,
        api_base_url: adapter
            .api_base_url
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        request_timeout: Duration::from_secs(
            adapter
                .request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        ),
        listen_addr: adapter.listen_addr.filter(|addr| !addr.is_empty()),
    })
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingVariable(name))
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("workspace_key_id", &self.workspace_key_id)
            .field("workspace_key_secret", &"<redacted>")
            .field("project_id", &self.project_id)
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout", &self.request_timeout)
            .field("listen_addr", &self.listen_addr)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_vars() -> Vec<(&'static str, &'static str)> {
        vec![
            (WORKSPACE_KEY_ID_VAR, "test-key-id"),
            (WORKSPACE_KEY_SECRET_VAR, "test-key-secret"),
            (PROJECT_ID_VAR, "test-project-id"),
        ]
    }

    fn without(name: &str) -> Vec<(&'static str, &'static str)> {
        full_vars().into_iter().filter(|(k, _)| *k != name).collect()
    }

    fn error_message(result: Result<Config, ConfigError>) -> String {
        match result {
            Ok(config) => panic!("expected error, got {config:?}"),
            Err(e) => e.to_string(),
        }
    }

    #[test]
    fn test_valid_configuration() {
        let config = Config::from_vars(full_vars()).unwrap();

        assert_eq!(config.workspace_key_id, "test-key-id");
        assert_eq!(config.workspace_key_secret, "test-key-secret");
        assert_eq!(config.project_id, "test-project-id");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(config.listen_addr.is_none());
    }

    #[test]
    fn test_missing_workspace_key_id() {
        let result = Config::from_vars(without(WORKSPACE_KEY_ID_VAR));
        assert_eq!(
            error_message(result),
            "STYTCH_WORKSPACE_KEY_ID environment variable is required"
        );
    }

    #[test]
    fn test_missing_workspace_key_secret() {
        let result = Config::from_vars(without(WORKSPACE_KEY_SECRET_VAR));
        assert_eq!(
            error_message(result),
            "STYTCH_WORKSPACE_KEY_SECRET environment variable is required"
        );
    }

    #[test]
    fn test_missing_project_id() {
        let result = Config::from_vars(without(PROJECT_ID_VAR));
        assert_eq!(
            error_message(result),
            "STYTCH_PROJECT_ID environment variable is required"
        );
    }

    #[test]
    fn test_all_missing_reports_first() {
        let result = Config::from_vars(Vec::<(String, String)>::new());
        assert_eq!(
            error_message(result),
            "STYTCH_WORKSPACE_KEY_ID environment variable is required"
        );
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let mut vars = without(WORKSPACE_KEY_SECRET_VAR);
        vars.push((WORKSPACE_KEY_SECRET_VAR, ""));

        let result = Config::from_vars(vars);
        assert!(matches!(
            result,
            Err(ConfigError::MissingVariable(WORKSPACE_KEY_SECRET_VAR))
        ));
    }

    #[test]
    fn test_adapter_overrides() {
        let mut vars = full_vars();
        vars.push(("RBACPOLICY_API_BASE_URL", "http://localhost:9000"));
        vars.push(("RBACPOLICY_REQUEST_TIMEOUT_SECS", "3"));
        vars.push(("RBACPOLICY_LISTEN_ADDR", "127.0.0.1:8080"));

        let config = Config::from_vars(vars).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:9000");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.listen_addr.as_deref(), Some("127.0.0.1:8080"));
    }

    #[test]
    fn test_adapter_prefix_cannot_supply_credentials() {
        let mut vars = without(PROJECT_ID_VAR);
        vars.push(("RBACPOLICY_PROJECT_ID", "other-project"));

        assert_eq!(
            error_message(Config::from_vars(vars)),
            "STYTCH_PROJECT_ID environment variable is required"
        );
    }

    #[test]
    fn test_adapter_prefix_does_not_override_credentials() {
        let mut vars = full_vars();
        vars.push(("RBACPOLICY_PROJECT_ID", "other-project"));
        vars.push(("RBACPOLICY_WORKSPACE_KEY_SECRET", "other-secret"));

        let config = Config::from_vars(vars).unwrap();
        assert_eq!(config.project_id, "test-project-id");
        assert_eq!(config.workspace_key_secret, "test-key-secret");
    }

    #[test]
    fn test_stytch_prefix_does_not_reach_adapter_settings() {
        let mut vars = full_vars();
        vars.push(("STYTCH_API_BASE_URL", "http://localhost:9000"));
        vars.push(("STYTCH_LISTEN_ADDR", "127.0.0.1:8080"));

        let config = Config::from_vars(vars).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert!(config.listen_addr.is_none());
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let mut vars = full_vars();
        vars.push(("RBACPOLICY_REQUEST_TIMEOUT_SECS", "soon"));

        assert!(matches!(
            Config::from_vars(vars),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = Config::from_vars(full_vars()).unwrap();
        let rendered = format!("{config:?}");

        assert!(rendered.contains("test-key-id"));
        assert!(!rendered.contains("test-key-secret"));
    }
}
