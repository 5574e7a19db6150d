use std::time::Duration;

/// Failures of a single call to the inference backend.
///
/// None of these ever reach the remote controller: the orchestrator turns each one into the safe
/// default command.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    /// The backend could not be reached (connection refused, reset, DNS, ...).
    #[error("inference backend unreachable: {0}")]
    Unreachable(String),
    /// The backend did not answer within the configured budget.
    #[error("inference backend timed out after {0:?}")]
    Timeout(Duration),
    /// The backend answered with a non-success HTTP status.
    #[error("inference backend returned status {0}")]
    Status(u16),
    /// The backend answered but the body is not a completion object.
    #[error("malformed inference response: {0}")]
    Malformed(String),
}

/// The inbound image could not be decoded from its transport encoding.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("image payload is not valid base64: {0}")]
pub struct DecodeError(#[from] pub base64::DecodeError);

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The model id is empty or whitespace.
    #[error("model id must not be empty")]
    EmptyModelId,
    /// The backend url is not an absolute URL.
    #[error("invalid backend url `{0}`")]
    InvalidBackendUrl(String),
    /// reqwest refused to build a client (TLS backend, system config).
    #[error("failed to build http client: {0}")]
    HttpClient(String),
    /// A zero timeout would fail every call.
    #[error("timeout must be greater than zero")]
    ZeroTimeout,
    /// Temperature is negative, NaN or infinite.
    #[error("temperature must be a finite non-negative number, got {0}")]
    InvalidTemperature(f32),
    /// The output cap is outside the accepted range.
    #[error("max output tokens must be within {min}..={max}, got {got}")]
    MaxTokensOutOfRange { min: u32, max: u32, got: u32 },
}
