#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use serde_json::Value;
use yuba_api::{BackendClient, ChatRequest, FormatRequest, TransportError};
use yuba_chat::{BridgeError, ConversationSession, FnBridge, HostBridge};
use yuba_types::ConfigReference;

pub const CONFIG: &str = "https://example.com/yuba-config.json";

/// Backend answering from pre-recorded replies and recording every request
#[derive(Default)]
pub struct ScriptedBackend {
    chat_replies: RefCell<VecDeque<Result<Value, TransportError>>>,
    format_replies: RefCell<VecDeque<Result<Value, TransportError>>>,
    pub chat_requests: RefCell<Vec<ChatRequest>>,
    pub format_requests: RefCell<Vec<FormatRequest>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chat(self, reply: Result<Value, TransportError>) -> Self {
        self.chat_replies.borrow_mut().push_back(reply);
        self
    }

    pub fn with_format(self, reply: Result<Value, TransportError>) -> Self {
        self.format_replies.borrow_mut().push_back(reply);
        self
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_requests.borrow().len()
    }

    pub fn format_calls(&self) -> usize {
        self.format_requests.borrow().len()
    }
}

fn unscripted() -> Result<Value, TransportError> {
    Err(TransportError::Network("no scripted reply".to_string()))
}

#[async_trait(?Send)]
impl BackendClient for ScriptedBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<Value, TransportError> {
        self.chat_requests.borrow_mut().push(request.clone());
        self.chat_replies.borrow_mut().pop_front().unwrap_or_else(unscripted)
    }

    async fn format(&self, request: &FormatRequest) -> Result<Value, TransportError> {
        self.format_requests.borrow_mut().push(request.clone());
        self.format_replies.borrow_mut().pop_front().unwrap_or_else(unscripted)
    }
}

/// Backend whose `/chat` reply is held back until the test releases it
pub struct GatedBackend {
    gate: RefCell<Option<oneshot::Receiver<Value>>>,
    pub chat_requests: RefCell<Vec<ChatRequest>>,
}

impl GatedBackend {
    pub fn new() -> (Self, oneshot::Sender<Value>) {
        let (tx, rx) = oneshot::channel();
        let backend = Self {
            gate: RefCell::new(Some(rx)),
            chat_requests: RefCell::new(Vec::new()),
        };
        (backend, tx)
    }
}

#[async_trait(?Send)]
impl BackendClient for GatedBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<Value, TransportError> {
        self.chat_requests.borrow_mut().push(request.clone());
        let gate = self.gate.borrow_mut().take();
        match gate {
            Some(rx) => rx.await.map_err(|_| TransportError::Network("gate dropped".to_string())),
            None => unscripted(),
        }
    }

    async fn format(&self, _request: &FormatRequest) -> Result<Value, TransportError> {
        unscripted()
    }
}

/// Bridge that records its invocations and answers with a fixed result
pub fn recording_bridge(
    result: Result<Value, String>,
) -> (Rc<dyn HostBridge>, Rc<RefCell<Vec<(String, Value)>>>) {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let recorded = calls.clone();
    let bridge = FnBridge::new(move |action: String, payload: Value| {
        recorded.borrow_mut().push((action, payload));
        let result = result.clone().map_err(BridgeError::Rejected);
        async move { result }
    });
    (Rc::new(bridge), calls)
}

pub fn session_with(backend: Rc<dyn BackendClient>) -> ConversationSession {
    ConversationSession::new(backend, ConfigReference::url(CONFIG))
}
