use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use tokio::{sync::oneshot, task::JoinHandle};

use crate::{
    portal::{PortalConnector, TrashPortal},
    scheduler::IdleScheduler,
    types::{RequestState, TrashError, TrashFileReply},
};

pub type CompletionFn = Box<dyn FnOnce() + Send + 'static>;
pub type ErrorFn = Box<dyn FnOnce(TrashError) + Send + 'static>;

/// Moves one file to the trash through the desktop portal.
///
/// The outcome reaches the caller through the idle scheduler, never from
/// inside the task that observed it. At most one of the two callbacks runs,
/// at most once. Without an error callback, failures are logged instead.
pub struct TrashRequest {
    file_path: PathBuf,
    completion: Option<CompletionFn>,
    error: Option<ErrorFn>,
    connector: Arc<dyn PortalConnector>,
    scheduler: Arc<dyn IdleScheduler>,
    state: RequestState,
}

impl TrashRequest {
    pub fn new(
        file_path: impl Into<PathBuf>,
        connector: Arc<dyn PortalConnector>,
        scheduler: Arc<dyn IdleScheduler>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            completion: None,
            error: None,
            connector,
            scheduler,
            state: RequestState::Created,
        }
    }

    pub fn on_completion(mut self, completion: impl FnOnce() + Send + 'static) -> Self {
        self.completion = Some(Box::new(completion));
        self
    }

    pub fn on_error(mut self, error: impl FnOnce(TrashError) + Send + 'static) -> Self {
        self.error = Some(Box::new(error));
        self
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Spawns the request on the current tokio runtime and returns at once.
    pub fn start(self) -> JoinHandle<RequestState> {
        tokio::spawn(self.run())
    }

    /// Drives the request to its end and returns the state it stopped in:
    /// `Completed`, `Failed` or `ConnectionFailed`.
    pub async fn run(mut self) -> RequestState {
        self.transition(RequestState::ConnectionPending);
        let connected = Arc::clone(&self.connector).connect().await;

        let portal = match connected {
            Ok(Some(portal)) => portal,
            Ok(None) => {
                self.transition(RequestState::ConnectionFailed);
                self.report_error(TrashError::Connection {
                    reason: "the connection layer returned no portal handle".to_string(),
                    source: None,
                });
                return self.state;
            }
            Err(error) => {
                self.transition(RequestState::ConnectionFailed);
                self.report_error(error);
                return self.state;
            }
        };
        self.transition(RequestState::ConnectionEstablished);

        match self.trash_file(portal.as_ref()).await {
            Ok(reply) => self.handle_reply(reply),
            Err(error) => {
                self.transition(RequestState::Failed);
                self.report_error(error);
            }
        }
        self.state
    }

    async fn trash_file(&mut self, portal: &dyn TrashPortal) -> Result<TrashFileReply, TrashError> {
        let file = File::open(&self.file_path).map_err(|source| TrashError::FileAccess {
            path: self.file_path.display().to_string(),
            source,
        })?;

        self.transition(RequestState::CallPending);
        portal.trash_file(file).await
    }

    fn handle_reply(&mut self, reply: TrashFileReply) {
        if reply.is_success() {
            self.transition(RequestState::Completed);
            self.report_completion();
        } else {
            self.transition(RequestState::Failed);
            self.report_error(TrashError::Rejected {
                path: self.file_path.display().to_string(),
            });
        }
    }

    fn report_error(&mut self, error: TrashError) {
        match self.error.take() {
            Some(on_error) => self
                .scheduler
                .schedule(Box::new(move || on_error(error))),
            None => tracing::error!(
                path = %self.file_path.display(),
                error = ?error,
                "failed to trash file: {error}"
            ),
        }
        self.completion = None;
    }

    fn report_completion(&mut self) {
        if let Some(completion) = self.completion.take() {
            self.scheduler.schedule(completion);
        }
        self.error = None;
    }

    fn transition(&mut self, next: RequestState) {
        tracing::debug!(
            path = %self.file_path.display(),
            from = ?self.state,
            to = ?next,
            "trash request state change"
        );
        self.state = next;
    }
}

/// Trashes `file_path` and resolves once the outcome has been delivered
/// through `scheduler`.
pub async fn trash_file(
    file_path: impl Into<PathBuf>,
    connector: Arc<dyn PortalConnector>,
    scheduler: Arc<dyn IdleScheduler>,
) -> Result<(), TrashError> {
    let (outcome_tx, outcome_rx) = oneshot::channel();
    let completion_slot = Arc::new(Mutex::new(Some(outcome_tx)));
    let error_slot = Arc::clone(&completion_slot);

    TrashRequest::new(file_path, connector, scheduler)
        .on_completion(move || deliver(&completion_slot, Ok(())))
        .on_error(move |error| deliver(&error_slot, Err(error)))
        .start();

    outcome_rx.await.unwrap_or(Err(TrashError::Abandoned))
}

type OutcomeSlot = Mutex<Option<oneshot::Sender<Result<(), TrashError>>>>;

fn deliver(slot: &OutcomeSlot, outcome: Result<(), TrashError>) {
    let sender = slot
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .take();
    if let Some(sender) = sender {
        let _ = sender.send(outcome);
    }
}
