//! Send/edit state machine for one conversation.
//!
//! All state lives in [`ChatCoordinator`] and is mutated through `&mut self`,
//! so the owning task is the only writer. Remote calls run on spawned tasks
//! and report back over a channel; their results are applied when the owner
//! calls [`ChatCoordinator::next_completion`] or
//! [`ChatCoordinator::poll_completions`]. At most one call is in flight.

use super::message::{Message, MessageId};
use super::store::MessageStore;
use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::core::error::HeartTalkError;
use crate::service::ServiceStatus;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

pub type RequestId = u64;

/// What happened to the remote side of a submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Requested(RequestId),
    /// No call was needed.
    Skipped,
    /// A call was needed but the service is not configured.
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was empty after trimming; nothing changed.
    Ignored,
    /// A request is still outstanding; nothing changed.
    Busy,
    Sent {
        message: MessageId,
        dispatch: Dispatch,
    },
    Edited {
        message: MessageId,
        dispatch: Dispatch,
    },
}

impl SubmitOutcome {
    pub fn request(&self) -> Option<RequestId> {
        match self {
            SubmitOutcome::Sent {
                dispatch: Dispatch::Requested(id),
                ..
            }
            | SubmitOutcome::Edited {
                dispatch: Dispatch::Requested(id),
                ..
            } => Some(*id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// An assistant message was appended.
    Replied(MessageId),
    /// The call failed; the conversation did not change.
    Failed(String),
}

/// Everything a renderer needs to draw the chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSnapshot {
    pub messages: Vec<Message>,
    pub editing: Option<MessageId>,
    pub input: String,
    pub loading: bool,
}

struct Completion {
    request: RequestId,
    result: Result<String, HeartTalkError>,
}

struct InFlight {
    request: RequestId,
    task: JoinHandle<()>,
}

pub struct ChatCoordinator {
    store: MessageStore,
    editing: Option<MessageId>,
    input: String,
    service: ServiceStatus,
    request_timeout: Duration,
    next_request: RequestId,
    in_flight: Option<InFlight>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    updates: watch::Sender<ChatSnapshot>,
}

impl ChatCoordinator {
    pub fn new(service: ServiceStatus) -> Self {
        let store = MessageStore::new();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (updates, _) = watch::channel(ChatSnapshot {
            messages: store.messages().to_vec(),
            editing: None,
            input: String::new(),
            loading: false,
        });

        Self {
            store,
            editing: None,
            input: String::new(),
            service,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            next_request: 0,
            in_flight: None,
            completions_tx,
            completions_rx,
            updates,
        }
    }

    /// Upper bound on a single remote call. Elapsed calls count as failures.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn messages(&self) -> &[Message] {
        self.store.messages()
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn editing(&self) -> Option<MessageId> {
        self.editing
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn service(&self) -> &ServiceStatus {
        &self.service
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        ChatSnapshot {
            messages: self.store.messages().to_vec(),
            editing: self.editing,
            input: self.input.clone(),
            loading: self.is_loading(),
        }
    }

    /// Receiver that sees a fresh snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<ChatSnapshot> {
        self.updates.subscribe()
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.publish();
    }

    /// Submits whatever is in the pending input buffer.
    pub fn submit_input(&mut self) -> SubmitOutcome {
        let raw = self.input.clone();
        self.submit(&raw)
    }

    /// Must be called from within a tokio runtime when a remote call may be
    /// issued.
    pub fn submit(&mut self, raw_input: &str) -> SubmitOutcome {
        let text = raw_input.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored;
        }
        if self.is_loading() {
            debug!("submit rejected: request in flight");
            return SubmitOutcome::Busy;
        }

        let text = text.to_string();
        let outcome = match self.editing.take() {
            Some(id) => self.submit_edit(id, text),
            None => self.submit_new(text),
        };
        self.publish();
        outcome
    }

    fn submit_new(&mut self, text: String) -> SubmitOutcome {
        let message = Message::user(text.as_str());
        let id = message.id();
        self.store.append(message);
        self.input.clear();

        let dispatch = self.dispatch(text);
        SubmitOutcome::Sent {
            message: id,
            dispatch,
        }
    }

    fn submit_edit(&mut self, id: MessageId, text: String) -> SubmitOutcome {
        self.input.clear();
        if !self.store.replace_text(id, text.as_str()) {
            warn!(%id, "edited message is no longer in the conversation");
            return SubmitOutcome::Edited {
                message: id,
                dispatch: Dispatch::Skipped,
            };
        }

        // The old reply stays in place; the regenerated one is appended.
        let has_reply = self
            .store
            .message_following(id)
            .is_some_and(|next| !next.is_user());
        let dispatch = if has_reply {
            self.dispatch(text)
        } else {
            Dispatch::Skipped
        };

        SubmitOutcome::Edited {
            message: id,
            dispatch,
        }
    }

    fn dispatch(&mut self, text: String) -> Dispatch {
        let service = match &self.service {
            ServiceStatus::Ready(service) => service.clone(),
            ServiceStatus::Unavailable(reason) => {
                warn!(%reason, "no completion requested: service unavailable");
                return Dispatch::Unavailable;
            }
        };

        self.next_request += 1;
        let request = self.next_request;
        let tx = self.completions_tx.clone();
        let timeout = self.request_timeout;

        let task = tokio::spawn(async move {
            let result = match tokio::time::timeout(timeout, service.complete(&text)).await {
                Ok(result) => result,
                Err(_) => Err(HeartTalkError::Timeout(timeout)),
            };
            let _ = tx.send(Completion { request, result });
        });

        debug!(request, "loading: idle -> awaiting");
        self.in_flight = Some(InFlight { request, task });
        Dispatch::Requested(request)
    }

    /// Marks `id` as the message being revised and copies its text into the
    /// input buffer. Returns `false` if the message does not exist.
    pub fn begin_edit(&mut self, id: MessageId) -> bool {
        let Some(message) = self.store.get(id) else {
            return false;
        };
        self.input = message.text.clone();
        self.editing = Some(id);
        self.publish();
        true
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.input.clear();
        self.publish();
    }

    /// Back to a lone welcome message. An outstanding request is abandoned
    /// and its reply, if any, is dropped.
    pub fn reset(&mut self) {
        self.abort_in_flight();
        self.store.reset();
        self.editing = None;
        self.input.clear();
        self.publish();
    }

    /// Abandons the outstanding request. Returns `false` if there was none.
    pub fn cancel(&mut self) -> bool {
        let cancelled = self.abort_in_flight();
        if cancelled {
            self.publish();
        }
        cancelled
    }

    fn abort_in_flight(&mut self) -> bool {
        match self.in_flight.take() {
            Some(in_flight) => {
                in_flight.task.abort();
                info!(request = in_flight.request, "request cancelled");
                true
            }
            None => false,
        }
    }

    /// Waits for the outstanding request and applies its result. Returns
    /// `None` straight away when nothing is in flight.
    ///
    /// Cancel safe: dropping the future loses no completion.
    pub async fn next_completion(&mut self) -> Option<CompletionOutcome> {
        while self.in_flight.is_some() {
            let completion = self.completions_rx.recv().await?;
            if let Some(outcome) = self.apply(completion) {
                return Some(outcome);
            }
        }
        None
    }

    /// Applies every completion that has already arrived without waiting.
    pub fn poll_completions(&mut self) -> Vec<CompletionOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(completion) = self.completions_rx.try_recv() {
            if let Some(outcome) = self.apply(completion) {
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    fn apply(&mut self, completion: Completion) -> Option<CompletionOutcome> {
        match &self.in_flight {
            Some(in_flight) if in_flight.request == completion.request => {}
            _ => {
                debug!(request = completion.request, "dropping stale completion");
                return None;
            }
        }
        self.in_flight = None;
        debug!(request = completion.request, "loading: awaiting -> idle");

        let outcome = match completion.result {
            Ok(text) => {
                let message = Message::assistant(text);
                let id = message.id();
                self.store.append(message);
                CompletionOutcome::Replied(id)
            }
            Err(e) => {
                if e.is_remote_failure() {
                    warn!(request = completion.request, "completion failed: {}", e);
                } else {
                    error!(request = completion.request, "completion failed: {}", e);
                }
                CompletionOutcome::Failed(e.to_string())
            }
        };

        self.publish();
        Some(outcome)
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }
}

impl Drop for ChatCoordinator {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.task.abort();
        }
    }
}
