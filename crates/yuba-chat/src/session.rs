//! Conversation session: history, draft input and the send protocol
//!
//! A send turns the user's text into one or two backend round-trips:
//!
//! 1. `POST /chat` with the text and the configuration reference
//! 2. if the reply carries a callback and a host bridge is registered, the
//!    bridge runs and its result goes through `POST /format`
//!
//! Every send ends with exactly one bot message, either a reply or one of the
//! fixed failure texts. Nothing is retried.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use yuba_api::{BackendClient, ChatRequest, FormatRequest};
use yuba_types::{
    formatted_text, CallbackRequest, ChatReply, ConfigReference, Message, CALLBACK_FAILURE_TEXT,
    TRANSPORT_FAILURE_TEXT,
};

use crate::bridge::HostBridge;

/// Why a send did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Text was empty after trimming
    Empty,
    /// Another send is still waiting on the backend
    Busy,
}

/// How a send ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Ignored(IgnoreReason),
    /// A bot reply was appended
    Replied,
    /// `/chat` failed; the transport failure text was appended
    TransportFailed,
    /// The host callback or its formatting failed; the callback failure text was appended
    CallbackFailed,
}

impl SendOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, SendOutcome::TransportFailed | SendOutcome::CallbackFailed)
    }
}

#[derive(Default)]
struct SessionState {
    draft: String,
    history: Vec<Message>,
    listening: bool,
    pending: bool,
}

type Observer = Box<dyn Fn(&ConversationSession)>;

pub struct ConversationSession {
    backend: Rc<dyn BackendClient>,
    config: ConfigReference,
    bridge: Option<Rc<dyn HostBridge>>,
    state: RefCell<SessionState>,
    observer: RefCell<Option<Observer>>,
}

impl ConversationSession {
    pub fn new(backend: Rc<dyn BackendClient>, config: ConfigReference) -> Self {
        Self {
            backend,
            config,
            bridge: None,
            state: RefCell::new(SessionState::default()),
            observer: RefCell::new(None),
        }
    }

    /// Register the host callback bridge
    pub fn with_bridge(mut self, bridge: Rc<dyn HostBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    /// Called after every state change, e.g. to re-render
    pub fn set_observer(&self, observer: impl Fn(&ConversationSession) + 'static) {
        *self.observer.borrow_mut() = Some(Box::new(observer));
    }

    pub fn history(&self) -> Vec<Message> {
        self.state.borrow().history.clone()
    }

    pub fn draft(&self) -> String {
        self.state.borrow().draft.clone()
    }

    pub fn set_draft(&self, draft: impl Into<String>) {
        let draft = draft.into();
        self.update(|s| s.draft = draft);
    }

    /// Append to the draft rather than replacing it (speech transcripts)
    pub fn append_to_draft(&self, text: &str) {
        self.update(|s| s.draft.push_str(text));
    }

    pub fn is_listening(&self) -> bool {
        self.state.borrow().listening
    }

    pub fn set_listening(&self, listening: bool) {
        self.update(|s| s.listening = listening);
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().pending
    }

    /// Send whatever is in the draft
    pub async fn submit_draft(&self) -> SendOutcome {
        let text = self.draft();
        self.send(&text).await
    }

    /// Send `text` and append the outcome to the history.
    ///
    /// Sends do not overlap: while one is waiting on the backend, further
    /// sends are ignored and leave history and draft untouched.
    pub async fn send(&self, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::Ignored(IgnoreReason::Empty);
        }
        if self.is_pending() {
            log::debug!("Ignoring send while a reply is outstanding");
            return SendOutcome::Ignored(IgnoreReason::Busy);
        }

        self.update(|s| {
            s.pending = true;
            s.history.push(Message::user(text));
            s.draft.clear();
            s.history.push(Message::typing());
        });

        let outcome = self.exchange(text).await;

        self.update(|s| s.pending = false);
        outcome
    }

    async fn exchange(&self, text: &str) -> SendOutcome {
        let request = ChatRequest {
            message: text.to_string(),
            config_url: self.config.clone(),
        };
        log::debug!("Sending to backend: {:?}", request);

        let body = match self.backend.chat(&request).await {
            Ok(body) => body,
            Err(e) => {
                log::error!("Error receiving response from backend: {}", e);
                return self.finish(Message::bot(TRANSPORT_FAILURE_TEXT), SendOutcome::TransportFailed);
            }
        };

        match ChatReply::classify(body) {
            ChatReply::Malformed => {
                log::error!("Backend returned an empty (null) reply");
                self.finish(Message::bot(TRANSPORT_FAILURE_TEXT), SendOutcome::TransportFailed)
            }
            ChatReply::Callback(callback) => match self.bridge.clone() {
                Some(bridge) => {
                    self.update(clear_transient);
                    self.run_callback(bridge.as_ref(), callback, text).await
                }
                None => {
                    // Kept for compatibility: without a bridge the reply is an empty bot message
                    log::warn!(
                        "Backend requested callback '{}' but no host bridge is registered",
                        callback.action
                    );
                    self.finish(Message::bot(String::new()), SendOutcome::Replied)
                }
            },
            reply => {
                let bot_text = reply.into_bot_text().unwrap_or(Value::Null);
                self.finish(Message::bot(bot_text), SendOutcome::Replied)
            }
        }
    }

    async fn run_callback(&self, bridge: &dyn HostBridge, callback: CallbackRequest, text: &str) -> SendOutcome {
        log::info!("Invoking host callback '{}'", callback.action);

        let result = match bridge.invoke(&callback.action, callback.payload).await {
            Ok(result) => result,
            Err(e) => {
                log::error!("Callback error: {}", e);
                return self.finish(Message::bot(CALLBACK_FAILURE_TEXT), SendOutcome::CallbackFailed);
            }
        };

        let request = FormatRequest {
            raw_data: result,
            org_msg: text.to_string(),
        };
        match self.backend.format(&request).await.map(formatted_text) {
            Ok(Some(text)) => self.finish(Message::bot(text), SendOutcome::Replied),
            Ok(None) => {
                log::error!("Formatting the callback result returned an empty (null) reply");
                self.finish(Message::bot(CALLBACK_FAILURE_TEXT), SendOutcome::CallbackFailed)
            }
            Err(e) => {
                log::error!("Formatting the callback result failed: {}", e);
                self.finish(Message::bot(CALLBACK_FAILURE_TEXT), SendOutcome::CallbackFailed)
            }
        }
    }

    /// Drop the placeholder and append the final bot message
    fn finish(&self, message: Message, outcome: SendOutcome) -> SendOutcome {
        self.update(|s| {
            clear_transient(s);
            s.history.push(message);
        });
        outcome
    }

    fn update<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let result = f(&mut self.state.borrow_mut());
        if let Some(observer) = self.observer.borrow().as_ref() {
            observer(self);
        }
        result
    }
}

fn clear_transient(state: &mut SessionState) {
    state.history.retain(|m| !m.transient);
}
