use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use crate::backend::{ImageSample, InferenceBackend, InferenceRequest, OllamaBackend};
use crate::command::{Command, terrain_command};
use crate::config::RelayConfig;
use crate::error::{BackendError, ConfigError};
use crate::parser::{TERRAIN_RULES, Terrain};
use crate::prompt::{LANDING_ZONE, Prompt};
use crate::sink::{ImageSink, NullSink};

/// Why the relay answered with the safe default instead of a parsed decision.
#[derive(Clone, Debug, PartialEq)]
pub enum Fallback {
    /// The request carried no image; the backend was not contacted.
    InputMissing,
    /// The backend call failed or timed out.
    Backend(BackendError),
}

/// How a request ended.
#[derive(Clone, Debug, PartialEq)]
pub enum DecisionState {
    /// The backend answered and the answer was classified (possibly as unknown).
    Decided(Terrain),
    /// No usable answer; the safe default was returned.
    Fallback(Fallback),
}

impl DecisionState {
    /// Short tag used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionState::Decided(_) => "decided",
            DecisionState::Fallback(_) => "fallback",
        }
    }
}

/// Outcome of one request, with timing for logs.
#[derive(Clone, Debug)]
pub struct Decision {
    pub command: Command,
    pub state: DecisionState,
    /// Backend text as received, when there was any.
    pub raw_response: Option<String>,
    /// Time from request arrival to the command.
    pub duration: Duration,
}

impl Decision {
    fn fallback(reason: Fallback, start_time: Instant) -> Self {
        Self {
            command: Command::SAFE_DEFAULT,
            state: DecisionState::Fallback(reason),
            raw_response: None,
            duration: start_time.elapsed(),
        }
    }
}

/// The decision pipeline: one image in, one command out.
///
/// A `Relay` holds no per-request state, so a single instance can be shared behind an `Arc` by
/// any number of concurrent request handlers. Each call to [`Relay::decide`] runs
/// `Idle -> AwaitingBackend -> Decided | Fallback` once, without retries.
pub struct Relay {
    config: RelayConfig,
    prompt: Prompt,
    backend: Arc<dyn InferenceBackend>,
    sink: Arc<dyn ImageSink>,
}

impl Relay {
    /// Creates a relay around an arbitrary backend. Snapshots are discarded until a sink is set.
    pub fn new(config: RelayConfig, backend: Arc<dyn InferenceBackend>) -> Self {
        Self {
            config,
            prompt: LANDING_ZONE,
            backend,
            sink: Arc::new(NullSink),
        }
    }

    /// Validates `config` and talks to the HTTP backend it names.
    pub fn from_config(config: RelayConfig) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        let backend = OllamaBackend::new(&config.backend_url, config.timeout)?;
        Ok(Self::new(config, Arc::new(backend)))
    }

    /// Replaces the debug image sink.
    pub fn with_sink(mut self, sink: Arc<dyn ImageSink>) -> Self {
        self.sink = sink;
        self
    }

    /// The validated settings this relay runs with.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Produces a command for the snapshot. Never fails: every problem maps to a command.
    pub async fn decide(&self, image: Option<&ImageSample>) -> Decision {
        let start_time = Instant::now();

        let Some(image) = image else {
            log::warn!("Request carried no image, answering {}", Command::SAFE_DEFAULT);
            return Decision::fallback(Fallback::InputMissing, start_time);
        };

        self.persist(image).await;

        let request = InferenceRequest {
            model_id: &self.config.model_id,
            prompt: &self.prompt,
            image,
            options: self.config.options,
        };

        log::debug!("Querying {} with the {} prompt", request.model_id, self.prompt.name);

        let result = match tokio::time::timeout(self.config.timeout, self.backend.complete(&request))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(BackendError::Timeout(self.config.timeout)),
        };

        let raw = match result {
            Ok(raw) => raw,
            Err(error) => {
                log::error!("Backend call failed ({error}), answering {}", Command::SAFE_DEFAULT);
                return Decision::fallback(Fallback::Backend(error), start_time);
            }
        };

        log::info!("Raw model output: [{raw}]");

        let terrain = TERRAIN_RULES.classify(&raw);
        let command = terrain_command(terrain);

        log::info!(
            "Classified as {}, command {} ({:?})",
            terrain.as_str(),
            command,
            start_time.elapsed()
        );

        Decision {
            command,
            state: DecisionState::Decided(terrain),
            raw_response: Some(raw),
            duration: start_time.elapsed(),
        }
    }

    /// Sinks may block on disk, so the write runs on the blocking pool.
    async fn persist(&self, image: &ImageSample) {
        let bytes = match image.decode() {
            Ok(bytes) => bytes,
            Err(error) => {
                log::warn!("Could not decode snapshot: {error}");
                return;
            }
        };
        let sink = self.sink.clone();
        match tokio::task::spawn_blocking(move || sink.persist(&bytes)).await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => log::warn!("Could not save snapshot: {error}"),
            Err(error) => log::warn!("Snapshot writer panicked: {error}"),
        }
    }
}
