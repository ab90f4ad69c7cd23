use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tokio::sync::mpsc as async_mpsc;
use verdict_logging::{verdict_debug, verdict_info};

use crate::client::{execute, AnalysisService, ReqwestAnalysisClient};
use crate::{AnalysisRequest, ClientError, ClientSettings, EngineEvent, EngineStopped, Seq};

enum EngineCommand {
    Submit { seq: Seq, request: AnalysisRequest },
    Shutdown,
}

/// Runs analysis requests on a dedicated thread with a single-threaded
/// runtime. While the engine runs, every submitted request yields exactly one
/// [`EngineEvent::Completed`]; deciding whether it is still wanted is up to
/// the caller.
pub struct EngineHandle {
    cmd_tx: async_mpsc::UnboundedSender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let client = ReqwestAnalysisClient::new(settings)?;
        Self::with_service(Arc::new(client))
    }

    pub fn with_service(service: Arc<dyn AnalysisService>) -> Result<Self, ClientError> {
        let (cmd_tx, mut cmd_rx) = async_mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("verdict-engine".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    while let Some(command) = cmd_rx.recv().await {
                        match command {
                            EngineCommand::Submit { seq, request } => {
                                let service = service.clone();
                                let event_tx = event_tx.clone();
                                tokio::spawn(async move {
                                    run_request(service.as_ref(), seq, request, event_tx).await;
                                });
                            }
                            EngineCommand::Shutdown => break,
                        }
                    }
                    verdict_debug!("engine loop finished");
                });
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, seq: Seq, request: AnalysisRequest) -> Result<(), EngineStopped> {
        self.cmd_tx
            .send(EngineCommand::Submit { seq, request })
            .map_err(|_| EngineStopped)
    }

    /// Stops the engine loop. Requests still in flight are dropped without a
    /// completion; the event channel then reports [`EngineStopped`].
    pub fn shutdown(&self) {
        if self.cmd_tx.send(EngineCommand::Shutdown).is_err() {
            verdict_debug!("shutdown requested on a stopped engine");
        }
    }

    pub fn try_recv(&self) -> Result<Option<EngineEvent>, EngineStopped> {
        match self.event_rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => Err(EngineStopped),
        }
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineStopped> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineStopped),
        }
    }
}

async fn run_request(
    service: &dyn AnalysisService,
    seq: Seq,
    request: AnalysisRequest,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    verdict_info!("seq={} starting {}", seq, request_label(&request));
    let result = execute(service, &request).await;
    let _ = event_tx.send(EngineEvent::Completed { seq, result });
}

fn request_label(request: &AnalysisRequest) -> &'static str {
    match request {
        AnalysisRequest::PredictText(_) => "predict_text",
        AnalysisRequest::PredictUrl(_) => "predict_url",
    }
}
