//! Router state and the event loop behind the REST adapter.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use noticeboard_core::dispatch::EventLoop;
use noticeboard_types::event::InboundEvent;

use crate::http::outbox::OutboxTransport;
use crate::state::AppState;

const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// State shared by every handler.
#[derive(Clone)]
pub struct ServerState {
    pub app: AppState,
    pub outbox: Arc<OutboxTransport>,
    pub events: mpsc::Sender<InboundEvent>,
}

/// The running board: handler state plus the event loop task.
pub struct Board {
    pub state: ServerState,
    shutdown: CancellationToken,
    event_loop: JoinHandle<usize>,
}

impl Board {
    /// Wire a dispatcher to a fresh outbox and start the event loop.
    pub fn start(app: AppState) -> Self {
        let outbox = Arc::new(OutboxTransport::new());
        let dispatcher = Arc::new(app.dispatcher(outbox.clone()));
        let (events, rx) = mpsc::channel(app.config.event_buffer.max(1));
        let shutdown = CancellationToken::new();
        let event_loop = tokio::spawn(EventLoop::new(dispatcher, shutdown.clone()).run(rx));

        Self {
            state: ServerState {
                app,
                outbox,
                events,
            },
            shutdown,
            event_loop,
        }
    }

    /// Stop accepting events and let queued ones finish.
    ///
    /// Every `ServerState` clone must be gone for the queue to close; if one
    /// is still held after the drain timeout the loop is cancelled.
    pub async fn stop(self) -> usize {
        let Board {
            state,
            shutdown,
            mut event_loop,
        } = self;
        drop(state);

        let joined = match tokio::time::timeout(DRAIN_TIMEOUT, &mut event_loop).await {
            Ok(joined) => joined,
            Err(_) => {
                tracing::warn!("event queue still open after shutdown, cancelling");
                shutdown.cancel();
                event_loop.await
            }
        };
        match joined {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!(error = %e, "event loop task failed");
                0
            }
        }
    }
}
