use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use crate::error::{BackendError, ConfigError, DecodeError};
use crate::prompt::{GenerationOptions, Prompt};

/// A JPEG snapshot in its transport encoding (base64 text).
///
/// The encoded form is what travels to the backend; decoding only matters for the debug sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageSample {
    encoded: String,
}

impl ImageSample {
    /// Wraps base64 text received from the controller. The text is not validated here.
    pub fn from_base64(encoded: impl Into<String>) -> Self {
        Self {
            encoded: encoded.into(),
        }
    }

    /// Encodes raw image bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            encoded: STANDARD.encode(bytes),
        }
    }

    /// The base64 text exactly as it is sent to the backend.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// Decodes the transport text back into image bytes.
    pub fn decode(&self) -> Result<Vec<u8>, DecodeError> {
        Ok(STANDARD.decode(self.encoded.as_bytes())?)
    }
}

/// Everything needed for one completion call. Built per call and dropped afterwards.
#[derive(Clone, Copy, Debug)]
pub struct InferenceRequest<'a> {
    /// Backend model to run.
    pub model_id: &'a str,
    pub prompt: &'a Prompt,
    pub image: &'a ImageSample,
    pub options: GenerationOptions,
}

/// A vision-language completion service.
///
/// Implementations perform exactly one call per `complete` and report every failure as a
/// [`BackendError`]; they never retry.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Returns the generated text for the prompt and image.
    async fn complete(&self, request: &InferenceRequest<'_>) -> Result<String, BackendError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    images: [&'a str; 1],
    stream: bool,
    options: GenerationOptions,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Client for an Ollama-style `/api/generate` endpoint.
#[derive(Clone, Debug)]
pub struct OllamaBackend {
    client: reqwest::Client,
    url: reqwest::Url,
    timeout: Duration,
}

impl OllamaBackend {
    /// Targets `url`; every request is cut off after `timeout`.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let url =
            reqwest::Url::parse(url).map_err(|_| ConfigError::InvalidBackendUrl(url.to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            url,
            timeout,
        })
    }

    fn transport_error(&self, error: reqwest::Error) -> BackendError {
        if error.is_timeout() {
            BackendError::Timeout(self.timeout)
        } else {
            BackendError::Unreachable(error.to_string())
        }
    }
}

#[async_trait]
impl InferenceBackend for OllamaBackend {
    async fn complete(&self, request: &InferenceRequest<'_>) -> Result<String, BackendError> {
        let body = GenerateRequest {
            model: request.model_id,
            prompt: request.prompt.text,
            images: [request.image.encoded()],
            stream: false,
            options: request.options,
        };

        log::debug!("Sending {} prompt to {}", request.prompt.name, self.url);

        let response = self
            .client
            .post(self.url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        let parsed: GenerateResponse =
            serde_json::from_slice(&bytes).map_err(|e| BackendError::Malformed(e.to_string()))?;

        Ok(parsed.response)
    }
}
