//! Configuration for Mixpanel API access

use crate::error::{MixpanelError, Result};
use nestor_utils::{EnvSource, ProcessEnv};
use std::fmt;
use std::time::Duration;

/// Environment variable holding the Mixpanel API key
pub const API_KEY_VAR: &str = "NESTOR_MIXPANEL_API_KEY";
/// Environment variable holding the Mixpanel API secret
pub const API_SECRET_VAR: &str = "NESTOR_MIXPANEL_API_SECRET";
/// Environment variable overriding the API base URL
pub const API_BASE_VAR: &str = "NESTOR_MIXPANEL_API_BASE";
/// Environment variable overriding the request timeout, in seconds
pub const TIMEOUT_VAR: &str = "NESTOR_MIXPANEL_TIMEOUT_SECS";

/// Default data export API base
pub const DEFAULT_API_BASE: &str = "https://mixpanel.com/api/2.0";

/// Configuration for Mixpanel API access
#[derive(Clone)]
pub struct MixpanelConfig {
    /// Project API key
    pub api_key: String,

    /// Project API secret, used to sign requests
    pub api_secret: String,

    /// Data export API base URL
    pub api_base: String,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// How long a signed request stays valid (`expire` parameter)
    pub signature_ttl: Duration,
}

impl Default for MixpanelConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(30),
            signature_ttl: Duration::from_secs(600), // 10 minutes
        }
    }
}

impl fmt::Debug for MixpanelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MixpanelConfig")
            .field("api_key", &mask(&self.api_key))
            .field("api_secret", &mask(&self.api_secret))
            .field("api_base", &self.api_base)
            .field("request_timeout", &self.request_timeout)
            .field("signature_ttl", &self.signature_ttl)
            .finish()
    }
}

fn mask(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "***" }
}

impl MixpanelConfig {
    /// Create a new configuration builder
    pub fn builder() -> MixpanelConfigBuilder {
        MixpanelConfigBuilder::default()
    }

    /// Load the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_source(&ProcessEnv)
    }

    /// Load the configuration from any environment-like source
    pub fn from_source(env: &impl EnvSource) -> Result<Self> {
        let mut builder = Self::builder()
            .api_key(env.require(API_KEY_VAR)?)
            .api_secret(env.require(API_SECRET_VAR)?);

        if let Some(base) = env.var(API_BASE_VAR) {
            builder = builder.api_base(base);
        }
        if let Some(secs) = env.parse::<u64>(TIMEOUT_VAR)? {
            builder = builder.request_timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(MixpanelError::ConfigError(format!(
                "{API_KEY_VAR} is required"
            )));
        }

        if self.api_secret.trim().is_empty() {
            return Err(MixpanelError::ConfigError(format!(
                "{API_SECRET_VAR} is required"
            )));
        }

        url::Url::parse(&self.api_base)?;

        if self.request_timeout.is_zero() {
            return Err(MixpanelError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for MixpanelConfig
#[derive(Debug, Default)]
pub struct MixpanelConfigBuilder {
    api_key: Option<String>,
    api_secret: Option<String>,
    api_base: Option<String>,
    request_timeout: Option<Duration>,
    signature_ttl: Option<Duration>,
}

impl MixpanelConfigBuilder {
    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the API secret
    pub fn api_secret(mut self, secret: impl Into<String>) -> Self {
        self.api_secret = Some(secret.into());
        self
    }

    /// Set the API base URL
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set how long signed requests stay valid
    pub fn signature_ttl(mut self, duration: Duration) -> Self {
        self.signature_ttl = Some(duration);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<MixpanelConfig> {
        let defaults = MixpanelConfig::default();

        let config = MixpanelConfig {
            api_key: self.api_key.unwrap_or(defaults.api_key),
            api_secret: self.api_secret.unwrap_or(defaults.api_secret),
            api_base: self
                .api_base
                .map(|b| b.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            signature_ttl: self.signature_ttl.unwrap_or(defaults.signature_ttl),
        };

        config.validate()?;
        Ok(config)
    }
}
