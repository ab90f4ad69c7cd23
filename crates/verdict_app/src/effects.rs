use std::time::Duration;

use verdict_client::{
    AnalysisRequest, EngineEvent, EngineHandle, EngineStopped, Seq, GENERIC_FAILURE,
};
use verdict_core::{Effect, Msg};
use verdict_logging::{verdict_error, verdict_info, verdict_warn};

/// Executes core effects on the engine and turns engine events back into
/// messages for the update loop.
pub struct EffectRunner {
    engine: EngineHandle,
    /// Submitted sequences with no completion yet.
    pending: Vec<Seq>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            pending: Vec::new(),
        }
    }

    /// Hands effects to the engine. Returns failure messages for anything the
    /// engine could not accept.
    pub fn enqueue(&mut self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut rejected = Vec::new();
        for effect in effects {
            let seq = effect.seq();
            let request = match effect {
                Effect::SubmitText { seq, text } => {
                    verdict_info!("SubmitText seq={} text_len={}", seq, text.len());
                    AnalysisRequest::PredictText(text)
                }
                Effect::SubmitUrl { seq, url } => {
                    verdict_info!("SubmitUrl seq={} url={}", seq, url);
                    AnalysisRequest::PredictUrl(url)
                }
            };
            match self.engine.submit(seq, request) {
                Ok(()) => self.pending.push(seq),
                Err(stopped) => {
                    verdict_error!("seq={} not submitted: {}", seq, stopped);
                    rejected.push(stopped_msg(seq, stopped));
                }
            }
        }
        rejected
    }

    /// Waits up to `timeout` for the first engine event, then drains whatever
    /// else is ready. A stopped engine fails every pending submission.
    pub fn poll(&mut self, timeout: Duration) -> Vec<Msg> {
        let mut msgs = Vec::new();
        let mut next = self.engine.recv_timeout(timeout);
        loop {
            match next {
                Ok(Some(event)) => msgs.push(self.complete(event)),
                Ok(None) => break,
                Err(stopped) => {
                    if !self.pending.is_empty() {
                        verdict_error!("{}; failing {} pending request(s)", stopped, self.pending.len());
                    }
                    msgs.extend(self.pending.drain(..).map(|seq| stopped_msg(seq, stopped)));
                    break;
                }
            }
            next = self.engine.try_recv();
        }
        msgs
    }

    pub fn shutdown(&self) {
        self.engine.shutdown();
    }

    fn complete(&mut self, event: EngineEvent) -> Msg {
        let EngineEvent::Completed { seq, .. } = &event;
        let seq = *seq;
        self.pending.retain(|pending| *pending != seq);
        map_event(event)
    }
}

fn stopped_msg(seq: Seq, stopped: EngineStopped) -> Msg {
    Msg::AnalysisFailed {
        seq,
        message: format!("{GENERIC_FAILURE}: {stopped}"),
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Completed { seq, result } => match result {
            Ok(payload) => Msg::AnalysisReceived { seq, payload },
            Err(err) => {
                verdict_warn!("seq={} failed ({}): {}", seq, err.kind, err.message);
                Msg::AnalysisFailed {
                    seq,
                    message: err.message,
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use super::{map_event, EffectRunner};
    use serde_json::{json, Value};
    use verdict_client::{AnalysisService, EngineEvent, EngineHandle, TransportError, TransportErrorKind};
    use verdict_core::{Effect, Msg};

    #[test]
    fn engine_events_map_to_messages() {
        let ok = map_event(EngineEvent::Completed {
            seq: 3,
            result: Ok(json!({ "ml_label": "Real" })),
        });
        assert_eq!(
            ok,
            Msg::AnalysisReceived {
                seq: 3,
                payload: json!({ "ml_label": "Real" }),
            }
        );

        let failed = map_event(EngineEvent::Completed {
            seq: 4,
            result: Err(TransportError {
                kind: TransportErrorKind::HttpStatus(400),
                message: "No text provided".to_string(),
            }),
        });
        assert_eq!(
            failed,
            Msg::AnalysisFailed {
                seq: 4,
                message: "No text provided".to_string(),
            }
        );
    }

    #[test]
    fn stopped_engine_fails_pending_submission() {
        struct Stalled;

        #[async_trait::async_trait]
        impl AnalysisService for Stalled {
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

        let engine = EngineHandle::with_service(Arc::new(Stalled)).unwrap();
        let mut runner = EffectRunner::new(engine);
        let mut msgs = runner.enqueue(vec![Effect::SubmitText {
            seq: 4,
            text: "article".to_string(),
        }]);
        runner.shutdown();

        let deadline = Instant::now() + Duration::from_secs(5);
        while msgs.is_empty() && Instant::now() < deadline {
            msgs = runner.poll(Duration::from_millis(50));
        }
        assert_eq!(
            msgs,
            vec![Msg::AnalysisFailed {
                seq: 4,
                message: "Request failed: analysis engine stopped".to_string(),
            }]
        );

        // Later submissions are refused straight away.
        let refused = runner.enqueue(vec![Effect::SubmitUrl {
            seq: 5,
            url: "https://x.example".to_string(),
        }]);
        assert_eq!(refused.len(), 1);
        assert!(runner.poll(Duration::ZERO).is_empty());
    }
}
