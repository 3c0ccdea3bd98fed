use crate::service::TranscriptionService;
use crate::sink::TranscriptSink;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use voxpad_core::AudioSource;

/// Session results shared between the worker task and the UI broadcaster.
#[derive(Debug, Default)]
pub struct SessionShared {
    pub transcript: String,
    pub history: Vec<String>,
    pub busy: bool,
}

/// Owns the worker task that feeds requests through the service, strictly in
/// submission order, one at a time. Requests are `Option<AudioSource>` so an
/// absent-input submission travels the same queue as a real one.
pub struct SessionHost {
    task_handle: Option<tokio::task::JoinHandle<()>>,
}

impl SessionHost {
    /// Spawn the worker. The returned sender is the only way in; the worker
    /// exits (and shuts the recognizer down) once every sender is dropped.
    pub fn spawn(
        service: TranscriptionService,
        shared: Arc<Mutex<SessionShared>>,
        sink: Option<TranscriptSink>,
        history_limit: usize,
    ) -> (Self, mpsc::UnboundedSender<Option<AudioSource>>) {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<Option<AudioSource>>();

        let handle = tokio::spawn(async move {
            while let Some(source) = request_rx.recv().await {
                if let Ok(mut s) = shared.lock() {
                    s.busy = true;
                }

                let text = service.transcribe(source).await;

                if let Ok(mut s) = shared.lock() {
                    s.busy = false;
                    s.transcript = text.clone();
                    s.history.push(text.clone());
                    while s.history.len() > history_limit {
                        s.history.remove(0);
                    }
                }

                if let Some(ref sink) = sink {
                    if let Err(e) = sink.append(&text) {
                        tracing::error!("transcript sink write failed: {e}");
                    }
                }
            }
            service.shutdown().await;
        });

        (
            Self {
                task_handle: Some(handle),
            },
            request_tx,
        )
    }

    /// Wait for the worker to finish. Callers drop their senders first.
    pub async fn shutdown(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            let _ = handle.await;
        }
    }
}
