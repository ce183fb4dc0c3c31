//! Inbound event loop.
//!
//! Reads events from a single `mpsc` stream. Each chat with pending events
//! gets one worker task that handles them in arrival order; workers for
//! different chats run in parallel. A worker that runs dry hands its queue
//! back to the loop, which either restarts it or forgets the chat.

use std::collections::HashMap;
use std::sync::Arc;

use noticeboard_types::chat::ChatId;
use noticeboard_types::event::InboundEvent;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::auth::Authorizer;
use crate::content::SectionContent;
use crate::dispatch::Dispatcher;
use crate::repository::record::RecordRepository;
use crate::transport::Transport;

type ChatQueue = mpsc::UnboundedReceiver<InboundEvent>;

pub struct EventLoop<R, T, C, A>
where
    R: RecordRepository,
    T: Transport,
    C: SectionContent,
    A: Authorizer,
{
    dispatcher: Arc<Dispatcher<R, T, C, A>>,
    shutdown: CancellationToken,
}

impl<R, T, C, A> EventLoop<R, T, C, A>
where
    R: RecordRepository + 'static,
    T: Transport + 'static,
    C: SectionContent + 'static,
    A: Authorizer + 'static,
{
    pub fn new(dispatcher: Arc<Dispatcher<R, T, C, A>>, shutdown: CancellationToken) -> Self {
        Self {
            dispatcher,
            shutdown,
        }
    }

    /// Run until the sender side closes or the token is cancelled, then wait
    /// for queued events to finish. Returns the number of events accepted.
    pub async fn run(self, mut events: mpsc::Receiver<InboundEvent>) -> usize {
        let mut workers = JoinSet::new();
        let mut queues: HashMap<ChatId, mpsc::UnboundedSender<InboundEvent>> = HashMap::new();
        let mut accepted = 0usize;

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    debug!("event loop cancelled");
                    break;
                }
                event = events.recv() => {
                    let Some(event) = event else {
                        debug!("event stream closed");
                        break;
                    };
                    self.enqueue(&mut workers, &mut queues, event);
                    accepted += 1;
                }
                Some(joined) = workers.join_next(), if !workers.is_empty() => {
                    self.settle(&mut workers, &mut queues, joined);
                }
            }
        }

        while let Some(joined) = workers.join_next().await {
            self.settle(&mut workers, &mut queues, joined);
        }
        info!(accepted, "event loop stopped");
        accepted
    }

    /// Append `event` to its chat's queue, starting a worker if none runs.
    fn enqueue(
        &self,
        workers: &mut JoinSet<(ChatId, ChatQueue)>,
        queues: &mut HashMap<ChatId, mpsc::UnboundedSender<InboundEvent>>,
        event: InboundEvent,
    ) {
        let chat = event.chat;
        let event = match queues.get(&chat) {
            Some(queue) => match queue.send(event) {
                Ok(()) => return,
                // The worker panicked and took its queue with it.
                Err(mpsc::error::SendError(event)) => event,
            },
            None => event,
        };

        let (tx, rx) = mpsc::unbounded_channel();
        queues.insert(chat, tx);
        workers.spawn(drain(self.dispatcher.clone(), chat, event, rx));
    }

    /// Restart a finished worker if events arrived meanwhile, else forget
    /// the chat.
    fn settle(
        &self,
        workers: &mut JoinSet<(ChatId, ChatQueue)>,
        queues: &mut HashMap<ChatId, mpsc::UnboundedSender<InboundEvent>>,
        joined: Result<(ChatId, ChatQueue), JoinError>,
    ) {
        match joined {
            Ok((chat, mut queue)) => match queue.try_recv() {
                Ok(next) => {
                    workers.spawn(drain(self.dispatcher.clone(), chat, next, queue));
                }
                Err(_) => {
                    queues.remove(&chat);
                }
            },
            Err(e) => warn!(error = %e, "event worker failed"),
        }
    }
}

/// Handle `first` and then everything already queued for `chat`, in order.
async fn drain<R, T, C, A>(
    dispatcher: Arc<Dispatcher<R, T, C, A>>,
    chat: ChatId,
    first: InboundEvent,
    mut queue: ChatQueue,
) -> (ChatId, ChatQueue)
where
    R: RecordRepository,
    T: Transport,
    C: SectionContent,
    A: Authorizer,
{
    dispatcher.dispatch(first).await;
    while let Ok(event) = queue.try_recv() {
        dispatcher.dispatch(event).await;
    }
    (chat, queue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DispatchSettings;
    use crate::testing::{MapContent, MemoryRecordRepository, RecordingTransport, VISITOR, admins};
    use noticeboard_types::chat::ChatId;
    use noticeboard_types::section::SectionKey;
    use noticeboard_types::view::Action;

    fn dispatcher() -> (
        Arc<MemoryRecordRepository>,
        Arc<RecordingTransport>,
        Arc<Dispatcher<MemoryRecordRepository, RecordingTransport, MapContent, crate::auth::StaticAllowList>>,
    ) {
        let records = Arc::new(MemoryRecordRepository::new());
        let transport = Arc::new(RecordingTransport::new());
        let dispatcher = Arc::new(Dispatcher::new(
            records.clone(),
            transport.clone(),
            Arc::new(MapContent::default()),
            Arc::new(admins()),
            DispatchSettings::default(),
        ));
        (records, transport, dispatcher)
    }

    #[tokio::test]
    async fn test_runs_until_stream_closes() {
        let (records, transport, dispatcher) = dispatcher();
        records.seed(SectionKey::Groups, 4);
        let (tx, rx) = mpsc::channel(16);
        let event_loop = EventLoop::new(dispatcher.clone(), CancellationToken::new());
        let handle = tokio::spawn(event_loop.run(rx));

        let chat = ChatId(1);
        tx.send(InboundEvent::action(chat, VISITOR, Action::Schedule(SectionKey::Groups)))
            .await
            .unwrap();
        for _ in 0..3 {
            tx.send(InboundEvent::action(chat, VISITOR, Action::NavNext))
                .await
                .unwrap();
        }
        drop(tx);

        assert_eq!(handle.await.unwrap(), 4);
        assert_eq!(dispatcher.state(chat).await.session.cursor(), Some(3));
        assert_eq!(transport.messages(chat).len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_same_chat_keeps_arrival_order() {
        let (records, transport, dispatcher) = dispatcher();
        records.seed(SectionKey::Films, 5);
        let (tx, rx) = mpsc::channel(64);
        let handle = tokio::spawn(EventLoop::new(dispatcher.clone(), CancellationToken::new()).run(rx));

        for chat in 0..10 {
            let chat = ChatId(chat);
            tx.send(InboundEvent::action(chat, VISITOR, Action::Schedule(SectionKey::Films)))
                .await
                .unwrap();
            for _ in 0..4 {
                tx.send(InboundEvent::action(chat, VISITOR, Action::NavNext))
                    .await
                    .unwrap();
            }
        }
        drop(tx);

        assert_eq!(handle.await.unwrap(), 50);
        for chat in 0..10 {
            let chat = ChatId(chat);
            assert_eq!(dispatcher.state(chat).await.session.cursor(), Some(4));
            assert!(transport.notices(chat).is_empty());
            assert_eq!(transport.sends(chat), 1);
        }
    }

    #[tokio::test]
    async fn test_stops_on_cancel() {
        let (_, _, dispatcher) = dispatcher();
        let (tx, rx) = mpsc::channel::<InboundEvent>(4);
        let token = CancellationToken::new();
        let handle = tokio::spawn(EventLoop::new(dispatcher, token.clone()).run(rx));

        token.cancel();
        let accepted = tokio::time::timeout(std::time::Duration::from_secs(1), handle)
            .await
            .expect("loop should stop after cancel")
            .unwrap();
        assert_eq!(accepted, 0);
        drop(tx);
    }

    #[tokio::test]
    async fn test_many_chats_in_parallel() {
        let (records, transport, dispatcher) = dispatcher();
        records.seed(SectionKey::Library, 2);
        let (tx, rx) = mpsc::channel(64);
        let handle = tokio::spawn(EventLoop::new(dispatcher, CancellationToken::new()).run(rx));

        for chat in 0..20 {
            tx.send(InboundEvent::action(
                ChatId(chat),
                VISITOR,
                Action::Schedule(SectionKey::Library),
            ))
            .await
            .unwrap();
        }
        drop(tx);

        assert_eq!(handle.await.unwrap(), 20);
        for chat in 0..20 {
            assert_eq!(transport.sends(ChatId(chat)), 1);
        }
    }
}
