//! HTTP surface of the decision service.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::ImageSample;
use crate::command::Command;
use crate::relay::{DecisionState, Fallback, Relay};

/// Body posted by the remote controller.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PilotRequest {
    /// Base64 JPEG. `null` counts as missing.
    #[serde(default)]
    pub image: Option<String>,
}

/// Body returned for every request, errors included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PilotResponse {
    /// Serialized as `"HOVER"`, `"LAND"` or `"MOVE_NEXT"`.
    pub command: Command,
}

/// What the `image` field of a request body holds.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ImageField {
    /// Absent, `null`, or the body is not a JSON object.
    Missing,
    Base64(String),
    /// Present but not a string.
    Invalid,
}

fn image_field(body: &Value) -> ImageField {
    match body.get("image") {
        None | Some(Value::Null) => ImageField::Missing,
        Some(Value::String(encoded)) => ImageField::Base64(encoded.clone()),
        Some(_) => ImageField::Invalid,
    }
}

/// Builds the router: `GET /` for liveness, `POST /pilot` for decisions.
pub fn router(relay: Arc<Relay>) -> Router {
    Router::new()
        .route("/", get(|| async { "VLM pilot relay is running" }))
        .route("/pilot", post(post_pilot))
        .with_state(relay)
}

/// Answers with a command no matter what. Only a missing image yields a non-OK status.
///
/// An `image` that is present but not a string cannot be forwarded; it is answered with the safe
/// default and an OK status without contacting the backend.
pub async fn post_pilot(
    State(relay): State<Arc<Relay>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> (StatusCode, Json<PilotResponse>) {
    let field = match payload {
        Ok(Json(body)) => image_field(&body),
        Err(rejection) => {
            log::warn!("Unreadable request body: {rejection}");
            ImageField::Missing
        }
    };

    let image = match field {
        ImageField::Missing => None,
        ImageField::Base64(encoded) => Some(ImageSample::from_base64(encoded)),
        ImageField::Invalid => {
            log::warn!(
                "Image field is not a string, answering {}",
                Command::SAFE_DEFAULT
            );
            return (
                StatusCode::OK,
                Json(PilotResponse {
                    command: Command::SAFE_DEFAULT,
                }),
            );
        }
    };

    let decision = relay.decide(image.as_ref()).await;

    log::info!(
        "Final command: {} ({}, {:?})",
        decision.command,
        decision.state.as_str(),
        decision.duration
    );

    let status = match decision.state {
        DecisionState::Fallback(Fallback::InputMissing) => StatusCode::BAD_REQUEST,
        _ => StatusCode::OK,
    };

    (
        status,
        Json(PilotResponse {
            command: decision.command,
        }),
    )
}
