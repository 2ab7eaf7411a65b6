use super::errors::AppError;
use super::server::{GameServer, ServerReply, ServerRequest};
use log::{debug, warn};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};

pub type RequestId = u64;

/// Outcome of one dispatched request, tagged with the id it was issued under.
#[derive(Debug, Clone)]
pub struct ServerEvent {
    pub id: RequestId,
    pub result: Result<ServerReply, AppError>,
}

/// Runs server calls on a background runtime and posts the outcome back to the
/// UI event channel, so the terminal keeps drawing while a request is pending.
pub struct Dispatcher<E> {
    runtime: Runtime,
    server: Arc<GameServer>,
    tx: Sender<E>,
}

impl<E> Dispatcher<E>
where
    E: From<ServerEvent> + Send + 'static,
{
    pub fn new(server: GameServer, tx: Sender<E>) -> Result<Self, AppError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("tak-term-net")
            .enable_all()
            .build()
            .map_err(|e| AppError::terminal(format!("Can't start network runtime: {}", e)))?;

        Ok(Dispatcher {
            runtime,
            server: Arc::new(server),
            tx,
        })
    }

    pub fn dispatch(&self, id: RequestId, request: ServerRequest, delay: Duration) {
        let server = self.server.clone();
        let tx = self.tx.clone();

        debug!("dispatching request {} to '{}'", id, request.endpoint());

        self.runtime.spawn(async move {
            if delay > Duration::from_millis(0) {
                tokio::time::sleep(delay).await;
            }

            let result = server.send_and_await(&request).await;

            if tx.send(E::from(ServerEvent { id, result })).is_err() {
                warn!("reply to request {} dropped, event loop is gone", id);
            }
        });
    }
}
