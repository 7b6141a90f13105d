//! Speech-to-text input for the draft message

use std::rc::Rc;

use thiserror::Error;

use crate::session::ConversationSession;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Speech recognition not supported in this browser.")]
    Unsupported,
    #[error("speech recognition failed to start: {0}")]
    Start(String),
}

/// Settings for one recognition session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionOptions {
    pub continuous: bool,
    pub lang: String,
    pub interim_results: bool,
    pub max_alternatives: u32,
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self {
            continuous: false,
            lang: "en-US".to_string(),
            interim_results: false,
            max_alternatives: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    Started,
    /// Top alternative of the first result
    Transcript(String),
    Error(String),
    Ended,
}

/// A platform speech recognizer able to run a single-shot session
pub trait SpeechRecognizer {
    fn start(
        &self,
        options: &RecognitionOptions,
        on_event: Rc<dyn Fn(RecognitionEvent)>,
    ) -> Result<(), SpeechError>;
}

/// Feeds recognized speech into a session's draft.
///
/// Holding no recognizer means the platform has none; `listen` then reports
/// [`SpeechError::Unsupported`] and leaves the session alone. Exclusivity of
/// recognition sessions is left to the front-end (it disables the mic while
/// `is_listening`).
pub struct SpeechInput {
    recognizer: Option<Rc<dyn SpeechRecognizer>>,
    options: RecognitionOptions,
}

impl SpeechInput {
    pub fn new(recognizer: Rc<dyn SpeechRecognizer>) -> Self {
        Self {
            recognizer: Some(recognizer),
            options: RecognitionOptions::default(),
        }
    }

    pub fn unsupported() -> Self {
        Self {
            recognizer: None,
            options: RecognitionOptions::default(),
        }
    }

    pub fn listen(&self, session: &Rc<ConversationSession>) -> Result<(), SpeechError> {
        let recognizer = self.recognizer.as_ref().ok_or(SpeechError::Unsupported)?;

        // Weak so closing the widget can still drop the session mid-capture
        let target = Rc::downgrade(session);
        let on_event: Rc<dyn Fn(RecognitionEvent)> = Rc::new(move |event| {
            if let Some(session) = target.upgrade() {
                apply_event(&session, event);
            }
        });

        recognizer.start(&self.options, on_event).map_err(|e| {
            log::error!("Speech recognition error: {}", e);
            e
        })
    }
}

fn apply_event(session: &ConversationSession, event: RecognitionEvent) {
    match event {
        RecognitionEvent::Started => {
            log::debug!("Listening...");
            session.set_listening(true);
        }
        RecognitionEvent::Transcript(transcript) => {
            log::debug!("Transcript: {}", transcript);
            session.append_to_draft(&transcript);
            session.set_listening(false);
        }
        RecognitionEvent::Error(error) => {
            log::error!("Speech recognition error: {}", error);
            session.set_listening(false);
        }
        RecognitionEvent::Ended => session.set_listening(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::cell::RefCell;
    use yuba_api::{BackendClient, ChatRequest, FormatRequest, TransportError};
    use yuba_types::ConfigReference;

    struct OfflineBackend;

    #[async_trait(?Send)]
    impl BackendClient for OfflineBackend {
        async fn chat(&self, _request: &ChatRequest) -> Result<Value, TransportError> {
            Err(TransportError::Network("offline".into()))
        }

        async fn format(&self, _request: &FormatRequest) -> Result<Value, TransportError> {
            Err(TransportError::Network("offline".into()))
        }
    }

    /// Emits a fixed event sequence as soon as it is started
    struct ScriptedRecognizer {
        events: Vec<RecognitionEvent>,
        seen_options: RefCell<Option<RecognitionOptions>>,
        listening_during: RefCell<Vec<bool>>,
        session: RefCell<Option<Rc<ConversationSession>>>,
    }

    impl ScriptedRecognizer {
        fn new(events: Vec<RecognitionEvent>) -> Self {
            Self {
                events,
                seen_options: RefCell::new(None),
                listening_during: RefCell::new(Vec::new()),
                session: RefCell::new(None),
            }
        }
    }

    impl SpeechRecognizer for ScriptedRecognizer {
        fn start(
            &self,
            options: &RecognitionOptions,
            on_event: Rc<dyn Fn(RecognitionEvent)>,
        ) -> Result<(), SpeechError> {
            *self.seen_options.borrow_mut() = Some(options.clone());
            for event in &self.events {
                on_event(event.clone());
                if let Some(session) = self.session.borrow().as_ref() {
                    self.listening_during.borrow_mut().push(session.is_listening());
                }
            }
            Ok(())
        }
    }

    fn session() -> Rc<ConversationSession> {
        Rc::new(ConversationSession::new(Rc::new(OfflineBackend), ConfigReference::url("cfg")))
    }

    #[test]
    fn test_unsupported_leaves_session_untouched() {
        let session = session();
        session.set_draft("hello");

        let input = SpeechInput::unsupported();
        let result = input.listen(&session);

        assert!(matches!(result, Err(SpeechError::Unsupported)));
        assert!(!session.is_listening());
        assert_eq!(session.draft(), "hello");
    }

    #[test]
    fn test_transcript_is_appended_to_draft() {
        let session = session();
        session.set_draft("show me ");

        let recognizer = Rc::new(ScriptedRecognizer::new(vec![
            RecognitionEvent::Started,
            RecognitionEvent::Transcript("the weather".into()),
            RecognitionEvent::Ended,
        ]));
        *recognizer.session.borrow_mut() = Some(session.clone());

        let input = SpeechInput::new(recognizer.clone());
        input.listen(&session).unwrap();

        assert_eq!(session.draft(), "show me the weather");
        assert_eq!(*recognizer.listening_during.borrow(), vec![true, false, false]);
        assert!(!session.is_listening());
    }

    #[test]
    fn test_error_clears_listening_flag() {
        let session = session();
        let recognizer = Rc::new(ScriptedRecognizer::new(vec![
            RecognitionEvent::Started,
            RecognitionEvent::Error("no-speech".into()),
        ]));

        SpeechInput::new(recognizer).listen(&session).unwrap();

        assert!(!session.is_listening());
        assert_eq!(session.draft(), "");
    }

    #[test]
    fn test_recognizer_receives_single_shot_english_options() {
        let session = session();
        let recognizer = Rc::new(ScriptedRecognizer::new(vec![]));

        SpeechInput::new(recognizer.clone()).listen(&session).unwrap();

        let options = recognizer.seen_options.borrow().clone().unwrap();
        assert!(!options.continuous);
        assert!(!options.interim_results);
        assert_eq!(options.lang, "en-US");
        assert_eq!(options.max_alternatives, 1);
    }

    #[test]
    fn test_events_after_session_dropped_are_ignored() {
        let session = session();
        let captured: Rc<RefCell<Option<Rc<dyn Fn(RecognitionEvent)>>>> = Rc::new(RefCell::new(None));

        struct DeferredRecognizer(Rc<RefCell<Option<Rc<dyn Fn(RecognitionEvent)>>>>);
        impl SpeechRecognizer for DeferredRecognizer {
            fn start(
                &self,
                _options: &RecognitionOptions,
                on_event: Rc<dyn Fn(RecognitionEvent)>,
            ) -> Result<(), SpeechError> {
                *self.0.borrow_mut() = Some(on_event);
                Ok(())
            }
        }

        SpeechInput::new(Rc::new(DeferredRecognizer(captured.clone())))
            .listen(&session)
            .unwrap();
        drop(session);

        let on_event = captured.borrow().clone().unwrap();
        on_event(RecognitionEvent::Transcript("too late".into()));
    }
}
