use crate::error::Result;
use crate::services::{ApiClient, Backend};
use serde::Deserialize;
use std::sync::Arc;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8001/api/";

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub bind_address: String,
    pub api_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Defaults overridden by `EMPDESK_*` environment variables
    pub fn load() -> Result<Self> {
        Self::from_env(config::Environment::with_prefix("EMPDESK"))
    }

    fn from_env(env: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .add_source(env)
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub backend: Arc<dyn Backend>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let client = ApiClient::new(&config.api_base_url)?;
        tracing::info!("Forwarding to backend at {}", client.base_url());
        Ok(Self::with_backend(config, Arc::new(client)))
    }

    pub fn with_backend(config: Config, backend: Arc<dyn Backend>) -> Self {
        Self { config, backend }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix("EMPDESK").source(Some(map))
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = Config::from_env(env(&[])).unwrap();
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = Config::from_env(env(&[
            ("EMPDESK_BIND_ADDRESS", "127.0.0.1:9000"),
            ("EMPDESK_API_BASE_URL", "http://backend:8001/api/"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.api_base_url, "http://backend:8001/api/");
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let config = Config {
            api_base_url: "ftp://backend/".to_string(),
            ..Config::default()
        };

        assert!(matches!(
            AppState::new(config),
            Err(AppError::InvalidBaseUrl(_))
        ));
    }
}
