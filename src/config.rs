use std::time::Duration;

use crate::error::ConfigError;
use crate::prompt::GenerationOptions;

/// Model queried when none is configured.
pub const DEFAULT_MODEL_ID: &str = "smolvlm256m";
/// Local Ollama generate endpoint.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:11434/api/generate";
/// Upper bound for a single backend call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings handed to the orchestrator at construction time.
#[derive(Clone, Debug, PartialEq)]
pub struct RelayConfig {
    /// Which backend model to query.
    pub model_id: String,
    /// Inference endpoint.
    pub backend_url: String,
    /// Max wait per backend call; a slower call counts as a failure.
    pub timeout: Duration,
    pub options: GenerationOptions,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            options: GenerationOptions::default(),
        }
    }
}

impl RelayConfig {
    /// Checks every field and returns the config unchanged when it is usable.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.model_id.trim().is_empty() {
            return Err(ConfigError::EmptyModelId);
        }
        if reqwest::Url::parse(&self.backend_url).is_err() {
            return Err(ConfigError::InvalidBackendUrl(self.backend_url));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        let temperature = self.options.temperature;
        if !temperature.is_finite() || temperature < 0.0 {
            return Err(ConfigError::InvalidTemperature(temperature));
        }
        let max_tokens = self.options.max_tokens;
        if !(GenerationOptions::MIN_TOKENS..=GenerationOptions::MAX_TOKENS).contains(&max_tokens) {
            return Err(ConfigError::MaxTokensOutOfRange {
                min: GenerationOptions::MIN_TOKENS,
                max: GenerationOptions::MAX_TOKENS,
                got: max_tokens,
            });
        }
        Ok(self)
    }
}
