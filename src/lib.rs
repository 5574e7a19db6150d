//! Decision relay between a camera-equipped controller and a vision-language model.
//!
//! A controller posts one JPEG snapshot; the relay asks the model a closed question about it,
//! reads the (often chatty) answer through an ordered rule table and returns one discrete
//! [`Command`]. Whatever goes wrong (no image, unreachable backend, timeout, nonsense answer) the
//! caller still receives a command, biased toward the safe action.
//!
//! The pipeline, leaves first:
//! - [`backend`]: the [`InferenceBackend`] trait and an Ollama-style HTTP client.
//! - [`parser`]: normalization and [`RuleTable`]s per task.
//! - [`command`]: total mappings from classifications to commands or display labels.
//! - [`relay`]: the [`Relay`] orchestrator with timeout and fallback.
//!
//! [`service`] exposes the relay over HTTP and [`probe`] runs the calibration questions.

pub mod backend;
pub mod command;
pub mod config;
pub mod error;
pub mod parser;
pub mod probe;
pub mod prompt;
pub mod relay;
pub mod service;
pub mod sink;

pub use backend::{ImageSample, InferenceBackend, InferenceRequest, OllamaBackend};
pub use command::Command;
pub use config::RelayConfig;
pub use error::{BackendError, ConfigError, DecodeError};
pub use parser::{Observation, RuleTable, Terrain};
pub use prompt::{GenerationOptions, Prompt};
pub use relay::{Decision, DecisionState, Fallback, Relay};
pub use sink::{FileSink, ImageSink, NullSink};
