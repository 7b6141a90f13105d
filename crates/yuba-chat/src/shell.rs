use std::rc::Rc;

use crate::session::ConversationSession;

/// The floating toggle: open or closed, closed by default.
///
/// Opening builds a fresh session from the factory; closing drops it, so
/// nothing carries over to the next open.
pub struct Widget {
    factory: Box<dyn Fn() -> ConversationSession>,
    session: Option<Rc<ConversationSession>>,
}

impl Widget {
    pub fn new(factory: impl Fn() -> ConversationSession + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            session: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Flip between open and closed; returns the new state
    pub fn toggle(&mut self) -> bool {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
        self.is_open()
    }

    /// Open the chat window, keeping the current session if already open
    pub fn open(&mut self) -> Rc<ConversationSession> {
        let factory = &self.factory;
        self.session
            .get_or_insert_with(|| {
                log::debug!("Opening chat window");
                Rc::new(factory())
            })
            .clone()
    }

    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            log::debug!("Closing chat window, discarding {} messages", session.history().len());
        }
    }

    pub fn session(&self) -> Option<Rc<ConversationSession>> {
        self.session.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use yuba_api::{BackendClient, ChatRequest, FormatRequest, TransportError};
    use yuba_types::ConfigReference;

    struct EchoBackend;

    #[async_trait(?Send)]
    impl BackendClient for EchoBackend {
        async fn chat(&self, request: &ChatRequest) -> Result<Value, TransportError> {
            Ok(json!({"response": request.message}))
        }

        async fn format(&self, _request: &FormatRequest) -> Result<Value, TransportError> {
            Ok(Value::Null)
        }
    }

    fn widget() -> Widget {
        Widget::new(|| ConversationSession::new(Rc::new(EchoBackend), ConfigReference::url("cfg")))
    }

    #[test]
    fn test_starts_closed_and_toggles() {
        let mut widget = widget();
        assert!(!widget.is_open());
        assert!(widget.session().is_none());

        assert!(widget.toggle());
        assert!(widget.session().is_some());
        assert!(!widget.toggle());
        assert!(widget.session().is_none());
        assert!(widget.toggle());
    }

    #[test]
    fn test_open_twice_keeps_session() {
        let mut widget = widget();
        let first = widget.open();
        first.set_draft("half typed");
        let second = widget.open();

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(second.draft(), "half typed");
    }

    #[tokio::test]
    async fn test_reopening_resets_history() {
        let mut widget = widget();
        let session = widget.open();
        session.send("hello").await;
        assert_eq!(session.history().len(), 2);

        widget.close();
        let reopened = widget.open();

        assert!(reopened.history().is_empty());
        assert_eq!(reopened.draft(), "");
    }

    #[test]
    fn test_close_when_closed_is_harmless() {
        let mut widget = widget();
        widget.close();
        widget.close();
        assert!(!widget.is_open());
    }
}
