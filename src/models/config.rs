//! Configuration model loaded from external sources.

use std::time::Duration;

use serde::Deserialize;

use crate::controller::DEFAULT_DEBOUNCE;

fn default_page_limit() -> usize {
    10
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE.as_millis() as u64
}

#[derive(Clone, Debug, Deserialize)]
/// Settings for talking to the platform backend.
pub struct ClientConfig {
    pub api_base_url: String,
    /// Token for a pre-authenticated session, mostly useful for scripts.
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Loads `config/default`, the `APP_ENV` profile and `APP_*` variables.
    pub fn load(app_env: &str) -> Result<Self, ::config::ConfigError> {
        ::config::Config::builder()
            .add_source(::config::File::with_name("config/default"))
            .add_source(::config::File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(::config::Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }
}
