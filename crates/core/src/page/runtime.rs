use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::{ApplicationError, RecommendationError, SearchError};
use crate::page::controller::{Command, Intent, PageController, PageView, Response};
use crate::service::ComparisonService;

const CHANNEL_CAPACITY: usize = 64;

type Ack = oneshot::Sender<Result<(), ApplicationError>>;

/// Intents and backend answers share one queue so they are applied in arrival order.
enum Envelope {
    Intent(Intent, Ack),
    Response(Response),
}

/// Handle to a page running on its own task. Cloning shares the same page.
#[derive(Clone, Debug)]
pub struct PageHandle {
    tx: mpsc::Sender<Envelope>,
    views: watch::Receiver<PageView>,
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Intent(intent, _) => f.debug_tuple("Intent").field(intent).finish(),
            Self::Response(response) => f.debug_tuple("Response").field(response).finish(),
        }
    }
}

impl PageHandle {
    /// Resolves once the intent has been applied; validation errors come back here.
    pub async fn dispatch(&self, intent: Intent) -> Result<(), ApplicationError> {
        let (ack, applied) = oneshot::channel();
        self.tx
            .send(Envelope::Intent(intent, ack))
            .await
            .map_err(|_| ApplicationError::RuntimeStopped)?;
        applied.await.map_err(|_| ApplicationError::RuntimeStopped)?
    }

    pub fn view(&self) -> PageView {
        self.views.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PageView> {
        self.views.clone()
    }

    /// Waits until no request is in flight and returns that view.
    pub async fn settled(&self) -> Result<PageView, ApplicationError> {
        let mut views = self.views.clone();
        let view = views
            .wait_for(|view| view.pending_request.is_none())
            .await
            .map_err(|_| ApplicationError::RuntimeStopped)?;
        Ok(view.clone())
    }
}

/// Starts the page task. It stops once every [`PageHandle`] is dropped and
/// no backend call is outstanding.
pub fn spawn_page<S>(service: Arc<S>, controller: PageController) -> (PageHandle, JoinHandle<()>)
where
    S: ComparisonService + ?Sized + 'static,
{
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (view_tx, views) = watch::channel(controller.view().clone());
    let runtime = PageRuntime { controller, service, responses: tx.downgrade(), views: view_tx };
    let task = tokio::spawn(runtime.run(rx));
    (PageHandle { tx, views }, task)
}

struct PageRuntime<S: ?Sized> {
    controller: PageController,
    service: Arc<S>,
    responses: mpsc::WeakSender<Envelope>,
    views: watch::Sender<PageView>,
}

impl<S> PageRuntime<S>
where
    S: ComparisonService + ?Sized + 'static,
{
    async fn run(mut self, mut rx: mpsc::Receiver<Envelope>) {
        info!(event_name = "page.runtime.started", correlation_id = "runtime", "page runtime started");
        while let Some(envelope) = rx.recv().await {
            match envelope {
                Envelope::Intent(intent, ack) => {
                    let result = self.controller.dispatch(intent).map(|command| {
                        if let Some(command) = command {
                            self.execute(command);
                        }
                    });
                    self.publish();
                    let _ = ack.send(result);
                }
                Envelope::Response(response) => {
                    if let Some(command) = self.controller.receive(response) {
                        self.execute(command);
                    }
                    self.publish();
                }
            }
        }
        info!(event_name = "page.runtime.stopped", correlation_id = "runtime", "page runtime stopped");
    }

    fn publish(&self) {
        self.views.send_replace(self.controller.view().clone());
    }

    fn execute(&self, command: Command) {
        let Some(responses) = self.responses.upgrade() else {
            return;
        };
        let service = Arc::clone(&self.service);
        debug!(
            event_name = "page.backend.dispatched",
            correlation_id = %command.request_id(),
            "backend call dispatched"
        );
        tokio::spawn(async move {
            let request_id = command.request_id();
            let is_search = matches!(command, Command::Search { .. });
            let response = match tokio::spawn(call_backend(service, command)).await {
                Ok(response) => response,
                Err(error) => {
                    warn!(
                        event_name = "page.backend.panicked",
                        correlation_id = %request_id,
                        error = %error,
                        "backend call did not complete"
                    );
                    let detail = format!("backend task failed: {error}");
                    if is_search {
                        Response::Search { request_id, result: Err(SearchError::Transport(detail)) }
                    } else {
                        Response::Recommendations {
                            request_id,
                            result: Err(RecommendationError::Transport(detail)),
                        }
                    }
                }
            };
            let _ = responses.send(Envelope::Response(response)).await;
        });
    }
}

async fn call_backend<S>(service: Arc<S>, command: Command) -> Response
where
    S: ComparisonService + ?Sized + 'static,
{
    match command {
        Command::Search { request_id, query } => {
            Response::Search { request_id, result: service.search(&query).await }
        }
        Command::Recommend { request_id, request } => {
            Response::Recommendations { request_id, result: service.recommendations(&request).await }
        }
    }
}
