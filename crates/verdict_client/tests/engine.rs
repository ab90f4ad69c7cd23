use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use verdict_client::{
    AnalysisRequest, AnalysisService, ClientSettings, EngineEvent, EngineHandle, EngineStopped,
    TransportError, TransportErrorKind,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct RecordingService {
    calls: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl AnalysisService for RecordingService {
    async fn predict_text(&self, text: &str) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push(format!("text:{text}"));
        Ok(json!({ "echo": text }))
    }

    async fn predict_url(&self, url: &str) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push(format!("url:{url}"));
        Err(TransportError {
            kind: TransportErrorKind::HttpStatus(422),
            message: "Unable to extract content".to_string(),
        })
    }

    async fn analyze_text(&self, _text: &str) -> Result<Value, TransportError> {
        Ok(json!({}))
    }

    async fn health(&self) -> Result<String, TransportError> {
        Ok("ok".to_string())
    }
}

#[test]
fn engine_dispatches_by_request_kind() {
    let service = Arc::new(RecordingService::default());
    let engine = EngineHandle::with_service(service.clone()).expect("engine");

    engine
        .submit(1, AnalysisRequest::PredictText("hello".to_string()))
        .expect("engine running");
    let event = engine
        .recv_timeout(WAIT)
        .expect("engine running")
        .expect("completion");
    assert_eq!(
        event,
        EngineEvent::Completed {
            seq: 1,
            result: Ok(json!({ "echo": "hello" })),
        }
    );

    engine
        .submit(2, AnalysisRequest::PredictUrl("https://x.example".to_string()))
        .expect("engine running");
    match engine
        .recv_timeout(WAIT)
        .expect("engine running")
        .expect("completion")
    {
        EngineEvent::Completed { seq, result } => {
            assert_eq!(seq, 2);
            assert_eq!(result.unwrap_err().message, "Unable to extract content");
        }
    }

    assert_eq!(
        *service.calls.lock().unwrap(),
        vec!["text:hello".to_string(), "url:https://x.example".to_string()]
    );
    assert_eq!(engine.try_recv(), Ok(None));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn engine_round_trip_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/predict_text"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ml_label": "Fake",
            "ml_confidence": 66,
            "web_similarity": 3,
            "combined_score": 41
        })))
        .expect(1)
        .mount(&server)
        .await;

    let engine = EngineHandle::new(ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
    .expect("engine");
    engine
        .submit(7, AnalysisRequest::PredictText("article".to_string()))
        .expect("engine running");

    let event = tokio::task::spawn_blocking(move || engine.recv_timeout(WAIT))
        .await
        .unwrap()
        .expect("engine running")
        .expect("completion");
    match event {
        EngineEvent::Completed { seq, result } => {
            assert_eq!(seq, 7);
            assert_eq!(result.unwrap()["ml_label"], "Fake");
        }
    }
}

/// Never answers, so a request stays in flight until the engine goes away.
struct StalledService;

#[async_trait::async_trait]
impl AnalysisService for StalledService {
    async fn predict_text(&self, _text: &str) -> Result<Value, TransportError> {
        std::future::pending().await
    }

    async fn predict_url(&self, _url: &str) -> Result<Value, TransportError> {
        std::future::pending().await
    }

    async fn analyze_text(&self, _text: &str) -> Result<Value, TransportError> {
        std::future::pending().await
    }

    async fn health(&self) -> Result<String, TransportError> {
        std::future::pending().await
    }
}

#[test]
fn shutdown_reports_stopped_engine() {
    let engine = EngineHandle::with_service(Arc::new(StalledService)).expect("engine");
    engine
        .submit(1, AnalysisRequest::PredictText("hello".to_string()))
        .expect("engine running");
    engine.shutdown();

    // The stalled request is dropped with the runtime; no completion arrives.
    assert_eq!(engine.recv_timeout(WAIT), Err(EngineStopped));
    assert_eq!(engine.try_recv(), Err(EngineStopped));
    assert_eq!(
        engine.submit(2, AnalysisRequest::PredictUrl("https://x.example".to_string())),
        Err(EngineStopped)
    );
}
