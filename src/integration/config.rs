//! Application configuration
//!
//! A single backend base-URL setting drives the whole client; everything
//! else has sensible defaults.

use std::time::Duration;

/// Environment variable naming the backend base URL
pub const BASE_URL_ENV: &str = "ABSHER_BACKEND_URL";

/// Default backend address when the environment does not say otherwise
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Per-request timeout; a hung backend surfaces as a timeout error instead
/// of a permanently disabled control.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Backend base URL
    pub base_url: String,

    /// Timeout applied to every backend request
    pub request_timeout: Duration,

    /// Whether to enable microphone capture
    pub enable_audio_input: bool,

    /// Fallback capture sample rate when no device has been opened yet
    pub input_sample_rate: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: REQUEST_TIMEOUT,
            enable_audio_input: true,
            input_sample_rate: 16000,
        }
    }
}

impl AppConfig {
    /// Build a configuration from the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.base_url = url.trim().to_string();
            }
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Disable microphone capture (text-only mode)
    pub fn without_audio_input(mut self) -> Self {
        self.enable_audio_input = false;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("Backend base URL is required".to_string());
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!("Backend base URL is not HTTP(S): {}", self.base_url));
        }
        if self.request_timeout.is_zero() {
            return Err("Request timeout must be non-zero".to_string());
        }
        Ok(())
    }
}
