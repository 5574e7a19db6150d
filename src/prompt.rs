use serde::Serialize;

/// An immutable question for the vision-language model with a closed answer space.
///
/// The answers listed in `answers` are the short forms the model is asked to reply with; the
/// parser rule table paired with the prompt decides how free text collapses onto them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prompt {
    /// Short name used in logs and reports.
    pub name: &'static str,
    /// The text sent to the backend.
    pub text: &'static str,
    /// The closed answer space embedded in `text`.
    pub answers: &'static [&'static str],
}

/// Decoding options sent along with every completion request.
///
/// Serialized with the field names the backend expects (`num_predict` caps the output length).
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GenerationOptions {
    /// Sampling temperature; 0.0 means greedy decoding.
    pub temperature: f32,
    /// Cap on generated tokens.
    #[serde(rename = "num_predict")]
    pub max_tokens: u32,
}

impl GenerationOptions {
    /// Lowest accepted output cap.
    pub const MIN_TOKENS: u32 = 1;
    /// Highest accepted output cap; longer answers only add noise for the parser.
    pub const MAX_TOKENS: u32 = 5;

    /// Greedy decoding capped at `max_tokens`.
    pub const fn greedy(max_tokens: u32) -> Self {
        Self {
            temperature: 0.0,
            max_tokens,
        }
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::greedy(Self::MAX_TOKENS)
    }
}

/// Landing-zone question asked by the decision service.
pub const LANDING_ZONE: Prompt = Prompt {
    name: "landing-zone",
    text: "Look at the image closely and choose the best description.
Do NOT describe, just answer.

Option A: Green grass ground
Option B: Dense forest or Mountain Cliffs

Answer with just one letter in A or B.
Answer:",
    answers: &["A", "B"],
};

/// Search-and-rescue question: is a person in view.
pub const HUMAN_VISIBLE: Prompt = Prompt {
    name: "SAR",
    text: "Look at the image. Is a human visible? Answer **strictly** with 'YES' or 'NO'.\nAnswer:",
    answers: &["YES", "NO"],
};

/// Terrain question for the probe harness.
pub const GROUND_SURFACE: Prompt = Prompt {
    name: "LANDING",
    text: "Look at the ground. Is it FLAT or ROCKY? Answer with JUST KEYWORD.\nAnswer:",
    answers: &["FLAT", "ROCKY"],
};

/// Weather and fire hazard question.
pub const HAZARD_PRESENT: Prompt = Prompt {
    name: "HAZARD",
    text: "Is there fog, snow, or fire? Answer strictly with 'YES' or 'NO'.\nAnswer:",
    answers: &["YES", "NO"],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_serialize_with_backend_field_names() {
        let json = serde_json::to_value(GenerationOptions::greedy(3)).unwrap();
        assert_eq!(json, serde_json::json!({ "temperature": 0.0, "num_predict": 3 }));
    }

    #[test]
    fn every_prompt_spells_out_its_answers() {
        for prompt in [LANDING_ZONE, HUMAN_VISIBLE, GROUND_SURFACE, HAZARD_PRESENT] {
            for answer in prompt.answers {
                assert!(
                    prompt.text.contains(answer),
                    "{} does not mention {answer}",
                    prompt.name
                );
            }
        }
    }
}
