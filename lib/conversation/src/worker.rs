//! Per-session event processing.
//!
//! Each live session gets exactly one worker task fed by its own
//! bounded queue. Events for a session are processed strictly in commit
//! order with no overlap; sessions run in parallel with each other and
//! share no mutable state.

use crate::channel::SessionChannel;
use crate::coordinator::DialogueCoordinator;
use crate::message::{MessageRole, UtteranceContent};
use crate::prompts;
use crate::session::Session;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use switchboard_contacts::ContactToolDispatcher;
use switchboard_core::SessionId;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Queue depth per session.
const EVENT_QUEUE_DEPTH: usize = 32;

/// An inbound event for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum SessionEvent {
    /// The transport committed a user utterance.
    UtteranceCommitted { content: UtteranceContent },
    /// The model invoked a tool.
    ToolCall { name: String, arguments: JsonValue },
    /// The transport closed the session.
    Closed,
}

/// The worker loop for one session.
pub struct SessionWorker {
    session: Session,
    coordinator: Arc<DialogueCoordinator>,
    dispatcher: Arc<ContactToolDispatcher>,
    channel: Arc<dyn SessionChannel>,
}

impl SessionWorker {
    /// Creates a worker for the given session.
    #[must_use]
    pub fn new(
        session: Session,
        coordinator: Arc<DialogueCoordinator>,
        dispatcher: Arc<ContactToolDispatcher>,
        channel: Arc<dyn SessionChannel>,
    ) -> Self {
        Self {
            session,
            coordinator,
            dispatcher,
            channel,
        }
    }

    /// Greets the user, then processes events until the queue closes.
    ///
    /// Events arrive and are handled one at a time, so each turn sees
    /// the dialogue state exactly as the previous turn left it.
    pub async fn run(mut self, mut events: mpsc::Receiver<SessionEvent>) {
        let session_id = self.session.id;
        tracing::info!(session = %session_id, "session worker started");

        if let Err(error) = self
            .channel
            .append_message(MessageRole::Assistant, prompts::WELCOME_MESSAGE)
            .await
        {
            tracing::error!(session = %session_id, %error, "failed to send welcome message");
        } else if let Err(error) = self.channel.request_response().await {
            tracing::error!(session = %session_id, %error, "failed to request welcome response");
        }

        while let Some(event) = events.recv().await {
            self.session.touch();
            match event {
                SessionEvent::UtteranceCommitted { content } => {
                    self.handle_utterance(&content).await;
                }
                SessionEvent::ToolCall { name, arguments } => {
                    self.handle_tool_call(&name, arguments).await;
                }
                SessionEvent::Closed => {
                    tracing::info!(session = %session_id, "session closed by transport");
                    break;
                }
            }
        }

        tracing::info!(session = %session_id, "session worker stopped");
    }

    async fn handle_utterance(&mut self, content: &UtteranceContent) {
        let result = self
            .coordinator
            .on_utterance_committed(&mut self.session.dialogue, self.channel.as_ref(), content)
            .await;

        match result {
            Ok(route) => {
                tracing::debug!(session = %self.session.id, ?route, "turn routed");
            }
            Err(error) => {
                tracing::error!(session = %self.session.id, %error, "turn abandoned");
            }
        }
    }

    async fn handle_tool_call(&mut self, name: &str, arguments: JsonValue) {
        let reply = self
            .dispatcher
            .dispatch(&mut self.session.dialogue, name, arguments)
            .await;

        if let Err(error) = self.channel.append_message(MessageRole::Tool, &reply).await {
            tracing::error!(session = %self.session.id, %error, "failed to append tool result");
            return;
        }
        if let Err(error) = self.channel.request_response().await {
            tracing::error!(session = %self.session.id, %error, "failed to request response");
        }
    }
}

/// Handle for feeding events to a running session worker.
pub struct SessionHandle {
    sender: mpsc::Sender<SessionEvent>,
    join: JoinHandle<()>,
}

impl SessionHandle {
    /// Waits for the worker to drain its queue and finish.
    pub async fn join(self) {
        drop(self.sender);
        let _ = self.join.await;
    }
}

/// Builds session channels for new sessions.
pub trait ChannelFactory: Send + Sync {
    /// Creates the outbound channel for a session.
    fn channel_for(&self, session_id: SessionId) -> Arc<dyn SessionChannel>;
}

/// Tracks live sessions and spawns a worker per session.
pub struct SessionRegistry {
    coordinator: Arc<DialogueCoordinator>,
    dispatcher: Arc<ContactToolDispatcher>,
    channels: Arc<dyn ChannelFactory>,
    sessions: tokio::sync::Mutex<HashMap<SessionId, SessionHandle>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(
        coordinator: Arc<DialogueCoordinator>,
        dispatcher: Arc<ContactToolDispatcher>,
        channels: Arc<dyn ChannelFactory>,
    ) -> Self {
        Self {
            coordinator,
            dispatcher,
            channels,
            sessions: tokio::sync::Mutex::new(HashMap::new()),
        }
    }

    /// Routes an event to its session, spawning a worker on first sight.
    ///
    /// `Closed` removes the session immediately; its worker drains any
    /// queued events in the background. The registry lock is never held
    /// across a queue send, so one backed-up session cannot stall
    /// delivery to the others.
    pub async fn deliver(&self, session_id: SessionId, event: SessionEvent) {
        if matches!(event, SessionEvent::Closed) {
            let handle = self.sessions.lock().await.remove(&session_id);
            if let Some(handle) = handle {
                tokio::spawn(handle.join());
            }
            return;
        }

        let sender = {
            let mut sessions = self.sessions.lock().await;
            match sessions.get(&session_id) {
                Some(handle) if !handle.sender.is_closed() => handle.sender.clone(),
                _ => {
                    let handle = self.spawn(session_id);
                    let sender = handle.sender.clone();
                    sessions.insert(session_id, handle);
                    sender
                }
            }
        };

        if sender.send(event).await.is_err() {
            tracing::warn!(session = %session_id, "worker stopped before delivery");
            self.sessions.lock().await.remove(&session_id);
        }
    }

    /// Tears down one session, waiting for its queued events to drain.
    pub async fn close(&self, session_id: SessionId) {
        let handle = self.sessions.lock().await.remove(&session_id);
        if let Some(handle) = handle {
            handle.join().await;
        }
    }

    fn spawn(&self, session_id: SessionId) -> SessionHandle {
        let (sender, receiver) = mpsc::channel(EVENT_QUEUE_DEPTH);
        let worker = SessionWorker::new(
            Session::with_id(session_id),
            Arc::clone(&self.coordinator),
            Arc::clone(&self.dispatcher),
            self.channels.channel_for(session_id),
        );
        let join = tokio::spawn(worker.run(receiver));
        SessionHandle { sender, join }
    }

    /// Returns the number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Returns whether any sessions are live.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
