use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde_json::{Value, json};
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};
use vlm_pilot::{
    BackendError, Command, GenerationOptions, ImageSample, InferenceBackend, InferenceRequest,
    OllamaBackend, Relay, RelayConfig, prompt::LANDING_ZONE,
};

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn generate_url(addr: SocketAddr) -> String {
    format!("http://{}/api/generate", addr)
}

fn request<'a>(image: &'a ImageSample) -> InferenceRequest<'a> {
    InferenceRequest {
        model_id: "smolvlm256m",
        prompt: &LANDING_ZONE,
        image,
        options: GenerationOptions::greedy(5),
    }
}

#[tokio::test]
async fn returns_response_field_and_sends_generate_body() {
    let seen: Arc<Mutex<Option<Value>>> = Arc::default();
    let app = Router::new()
        .route(
            "/api/generate",
            post(
                |State(seen): State<Arc<Mutex<Option<Value>>>>, Json(body): Json<Value>| async move {
                    *seen.lock().unwrap() = Some(body);
                    Json(json!({ "model": "smolvlm256m", "response": " A", "done": true }))
                },
            ),
        )
        .with_state(seen.clone());
    let addr = spawn(app).await;

    let backend = OllamaBackend::new(&generate_url(addr), Duration::from_secs(5)).unwrap();
    let image = ImageSample::from_base64("/9j/4A==");
    let text = backend.complete(&request(&image)).await.unwrap();

    assert_eq!(text, " A");
    let body = seen.lock().unwrap().take().unwrap();
    assert_eq!(
        body,
        json!({
            "model": "smolvlm256m",
            "prompt": LANDING_ZONE.text,
            "images": ["/9j/4A=="],
            "stream": false,
            "options": { "temperature": 0.0, "num_predict": 5 }
        })
    );
}

#[tokio::test]
async fn missing_response_field_is_malformed() {
    let app = Router::new().route(
        "/api/generate",
        post(|| async { Json(json!({ "error": "model not loaded" })) }),
    );
    let addr = spawn(app).await;

    let backend = OllamaBackend::new(&generate_url(addr), Duration::from_secs(5)).unwrap();
    let image = ImageSample::from_base64("/9j/4A==");
    let err = backend.complete(&request(&image)).await.unwrap_err();

    assert!(matches!(err, BackendError::Malformed(_)), "{err:?}");
}

#[tokio::test]
async fn error_status_is_reported() {
    let app = Router::new().route(
        "/api/generate",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let addr = spawn(app).await;

    let backend = OllamaBackend::new(&generate_url(addr), Duration::from_secs(5)).unwrap();
    let image = ImageSample::from_base64("/9j/4A==");
    let err = backend.complete(&request(&image)).await.unwrap_err();

    assert_eq!(err, BackendError::Status(500));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let app = Router::new().route(
        "/api/generate",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Json(json!({ "response": "A" }))
        }),
    );
    let addr = spawn(app).await;

    let timeout = Duration::from_millis(100);
    let backend = OllamaBackend::new(&generate_url(addr), timeout).unwrap();
    let image = ImageSample::from_base64("/9j/4A==");
    let err = backend.complete(&request(&image)).await.unwrap_err();

    assert_eq!(err, BackendError::Timeout(timeout));
}

#[tokio::test]
async fn closed_port_is_unreachable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = OllamaBackend::new(&generate_url(addr), Duration::from_secs(5)).unwrap();
    let image = ImageSample::from_base64("/9j/4A==");
    let err = backend.complete(&request(&image)).await.unwrap_err();

    assert!(matches!(err, BackendError::Unreachable(_)), "{err:?}");
}

#[tokio::test]
async fn relay_over_http_backend() {
    let app = Router::new().route(
        "/api/generate",
        post(|| async { Json(json!({ "response": "Option B, dense forest" })) }),
    );
    let addr = spawn(app).await;

    let relay = Relay::from_config(RelayConfig {
        backend_url: generate_url(addr),
        ..Default::default()
    })
    .unwrap();
    let decision = relay
        .decide(Some(&ImageSample::from_bytes(b"\xFF\xD8")))
        .await;

    assert_eq!(decision.command, Command::MoveNext);
}
