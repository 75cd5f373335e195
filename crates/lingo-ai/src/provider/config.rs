//! Chat client configuration and vendor selection.

use std::fmt;
use std::time::Duration;

use crate::ConfigError;

/// Which upstream vendor serves the completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vendor {
    Mistral,
    OpenAi,
}

impl Vendor {
    pub(crate) fn default_endpoint(self) -> &'static str {
        match self {
            Vendor::Mistral => "https://api.mistral.ai/v1/chat/completions",
            Vendor::OpenAi => "https://api.openai.com/v1/chat/completions",
        }
    }

    pub(crate) fn default_model(self) -> &'static str {
        match self {
            Vendor::Mistral => "mistral-small",
            Vendor::OpenAi => "gpt-4o-mini",
        }
    }

    fn credential_var(self) -> &'static str {
        match self {
            Vendor::Mistral => "MISTRAL_API_KEY",
            Vendor::OpenAi => "OPENAI_API_KEY",
        }
    }
}

/// Chat-completions client configuration.
#[derive(Clone)]
pub struct ChatConfig {
    pub vendor: Vendor,
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout: Duration,
}

impl fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfig")
            .field("vendor", &self.vendor)
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ChatConfig {
    pub fn new(vendor: Vendor, api_key: impl Into<String>) -> Self {
        Self {
            vendor,
            api_key: api_key.into(),
            endpoint: vendor.default_endpoint().to_string(),
            model: vendor.default_model().to_string(),
            max_tokens: 500,
            temperature: 0.7,
            timeout: Duration::from_secs(30),
        }
    }

    /// Resolve configuration from the environment.
    ///
    /// `LINGO_VENDOR` selects the vendor (`mistral`, default, or `openai`);
    /// the credential comes from the vendor's key variable
    /// (`MISTRAL_API_KEY` / `OPENAI_API_KEY`). `LINGO_MODEL` and
    /// `LINGO_ENDPOINT` override the vendor defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let vendor = match std::env::var("LINGO_VENDOR").as_deref() {
            Ok("openai") => Vendor::OpenAi,
            Ok("mistral") | Err(_) => Vendor::Mistral,
            Ok(other) => {
                return Err(ConfigError::Invalid(format!(
                    "unknown LINGO_VENDOR '{other}' (expected 'mistral' or 'openai')"
                )))
            }
        };

        let key_var = vendor.credential_var();
        let api_key =
            std::env::var(key_var).map_err(|_| ConfigError::MissingCredential(key_var))?;

        let mut config = Self::new(vendor, api_key);
        if let Ok(model) = std::env::var("LINGO_MODEL") {
            config.model = model;
        }
        if let Ok(endpoint) = std::env::var("LINGO_ENDPOINT") {
            config.endpoint = endpoint;
        }
        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_defaults() {
        let config = ChatConfig::new(Vendor::Mistral, "sk-test");
        assert_eq!(config.endpoint, "https://api.mistral.ai/v1/chat/completions");
        assert_eq!(config.model, "mistral-small");
        assert_eq!(config.max_tokens, 500);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn debug_redacts_the_credential() {
        let config = ChatConfig::new(Vendor::OpenAi, "sk-very-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
