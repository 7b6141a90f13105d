//! Conversation core of the yuba chat widget
//!
//! This crate holds everything between the front-end and the transport:
//! the conversation session with its send/receive/callback protocol, the
//! host callback bridge, the speech-input adapter and the open/closed shell.
//! It does not depend on any async runtime.

pub mod bridge;
pub mod session;
pub mod shell;
pub mod speech;

pub use bridge::{BridgeError, FnBridge, HostBridge};
pub use session::{ConversationSession, IgnoreReason, SendOutcome};
pub use shell::Widget;
pub use speech::{RecognitionEvent, RecognitionOptions, SpeechError, SpeechInput, SpeechRecognizer};

// Re-exported so front-ends only need this crate for the data model
pub use yuba_types::{ConfigReference, Message, Sender};
