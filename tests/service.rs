use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use vlm_pilot::{
    BackendError, InferenceBackend, InferenceRequest, Relay, RelayConfig, service,
};

/// Canned backend that counts how often it is asked.
struct Stub {
    reply: Result<&'static str, BackendError>,
    calls: AtomicUsize,
}

#[async_trait]
impl InferenceBackend for Stub {
    async fn complete(&self, _request: &InferenceRequest<'_>) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map(str::to_string)
    }
}

async fn serve(reply: Result<&'static str, BackendError>) -> (SocketAddr, Arc<Stub>) {
    let stub = Arc::new(Stub {
        reply,
        calls: AtomicUsize::new(0),
    });
    let config = RelayConfig {
        timeout: Duration::from_secs(5),
        ..Default::default()
    };
    let relay = Relay::new(config, stub.clone());
    let app = service::router(Arc::new(relay));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, stub)
}

async fn pilot(addr: SocketAddr, body: reqwest::Body) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .post(format!("http://{}/pilot", addr))
        .header("content-type", "application/json")
        .body(body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn letter_a_lands() {
    let (addr, _) = serve(Ok("A")).await;
    let (status, body) = pilot(addr, json!({ "image": "/9j/4A==" }).to_string().into()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "command": "LAND" }));
}

#[tokio::test]
async fn verbose_option_b_moves_next() {
    let (addr, _) = serve(Ok("Option B, dense forest")).await;
    let (status, body) = pilot(addr, json!({ "image": "/9j/4A==" }).to_string().into()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "command": "MOVE_NEXT" }));
}

#[tokio::test]
async fn unsure_answer_moves_next() {
    let (addr, _) = serve(Ok("I think it's grass but not sure")).await;
    let (status, body) = pilot(addr, json!({ "image": "/9j/4A==" }).to_string().into()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "command": "MOVE_NEXT" }));
}

#[tokio::test]
async fn backend_down_hovers_with_ok_status() {
    let (addr, stub) = serve(Err(BackendError::Unreachable("refused".to_string()))).await;
    let (status, body) = pilot(addr, json!({ "image": "/9j/4A==" }).to_string().into()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "command": "HOVER" }));
    assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_image_is_rejected_with_hover() {
    let (addr, stub) = serve(Ok("A")).await;
    let (status, body) = pilot(addr, json!({ "frame": 1 }).to_string().into()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "command": "HOVER" }));
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn garbage_body_is_rejected_with_hover() {
    let (addr, stub) = serve(Ok("A")).await;
    let (status, body) = pilot(addr, "{not json".into()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "command": "HOVER" }));
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn undecodable_image_still_decides() {
    let (addr, stub) = serve(Ok("B")).await;
    let (status, body) = pilot(addr, json!({ "image": "%%%" }).to_string().into()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "command": "MOVE_NEXT" }));
    assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn root_answers() {
    let (addr, _) = serve(Ok("A")).await;
    let response = reqwest::get(format!("http://{}/", addr)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn non_string_image_hovers_without_backend() {
    let (addr, stub) = serve(Ok("A")).await;
    let (status, body) = pilot(addr, json!({ "image": 5 }).to_string().into()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "command": "HOVER" }));
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}
