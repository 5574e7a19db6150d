//! Batch probing: one image, several fixed questions, one report line per question.
//!
//! Used to calibrate prompts against a model, not to fly anything.

use std::time::Duration;

use crate::backend::{ImageSample, InferenceBackend, InferenceRequest};
use crate::command::observation_label;
use crate::config::RelayConfig;
use crate::error::{BackendError, ConfigError};
use crate::parser::{Observation, PRESENCE_RULES, RuleTable, SURFACE_RULES};
use crate::prompt::{GROUND_SURFACE, GenerationOptions, HAZARD_PRESENT, HUMAN_VISIBLE, Prompt};

/// A question paired with the rules that read its answer.
#[derive(Clone, Copy, Debug)]
pub struct ProbeTask {
    pub prompt: Prompt,
    pub rules: RuleTable<Observation>,
}

/// The three calibration questions, in the order they are asked.
pub const DEFAULT_TASKS: [ProbeTask; 3] = [
    ProbeTask {
        prompt: HUMAN_VISIBLE,
        rules: PRESENCE_RULES,
    },
    ProbeTask {
        prompt: GROUND_SURFACE,
        rules: SURFACE_RULES,
    },
    ProbeTask {
        prompt: HAZARD_PRESENT,
        rules: PRESENCE_RULES,
    },
];

/// Output cap used while probing.
pub const PROBE_MAX_TOKENS: u32 = 3;

/// Builds and validates the backend settings for a probe run.
pub fn probe_config(
    model_id: impl Into<String>,
    backend_url: impl Into<String>,
    timeout: Duration,
) -> Result<RelayConfig, ConfigError> {
    RelayConfig {
        model_id: model_id.into(),
        backend_url: backend_url.into(),
        timeout,
        options: GenerationOptions::greedy(PROBE_MAX_TOKENS),
    }
    .validate()
}

/// Result of asking one task.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbeReport {
    /// Prompt name, e.g. `SAR`.
    pub task: &'static str,
    pub prompt: &'static str,
    /// Raw model text, or why there was none.
    pub output: Result<String, BackendError>,
    pub observation: Observation,
}

impl ProbeReport {
    /// Human-readable block for standard output.
    pub fn render(&self) -> String {
        let output = match &self.output {
            Ok(text) => format!("'{}'", text.trim()),
            Err(error) => format!("<error: {error}>"),
        };
        format!(
            "[{}]\n   Input Prompt: {}\n   Output: {}\n   Final Decision: {}\n",
            self.task,
            self.prompt.replace('\n', " "),
            output,
            observation_label(self.observation)
        )
    }
}

/// Asks every task about `image`, one after the other.
///
/// A failed call is reported and classified as unknown; the remaining tasks still run.
pub async fn run_tasks(
    backend: &dyn InferenceBackend,
    config: &RelayConfig,
    image: &ImageSample,
    tasks: &[ProbeTask],
) -> Vec<ProbeReport> {
    let timeout = config.timeout;
    let mut reports = Vec::with_capacity(tasks.len());

    for task in tasks {
        let request = InferenceRequest {
            model_id: &config.model_id,
            prompt: &task.prompt,
            image,
            options: config.options,
        };

        let output = match tokio::time::timeout(timeout, backend.complete(&request)).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::Timeout(timeout)),
        };

        let observation = match &output {
            Ok(text) => task.rules.classify(text),
            Err(error) => {
                log::warn!("{} probe failed: {error}", task.prompt.name);
                task.rules.unknown()
            }
        };

        log::debug!("{} -> {:?}", task.prompt.name, observation);

        reports.push(ProbeReport {
            task: task.prompt.name,
            prompt: task.prompt.text,
            output,
            observation,
        });
    }

    reports
}
