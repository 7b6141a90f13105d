// Application modes

pub mod repl;
pub mod task;

pub use repl::run_repl_mode;
pub use task::{exit_code, run_ask_mode};

use colored::Colorize;
use yuba_chat::{Message, Sender};

/// Print history entries as the chat window would show them
pub(crate) fn print_messages(messages: &[Message]) {
    for msg in messages.iter().filter(|m| !m.transient) {
        match msg.sender {
            Sender::User => println!("{}{}", msg.sender.label().bright_blue().bold(), msg.display_text()),
            Sender::Bot => println!("{}{}", msg.sender.label().bright_green().bold(), msg.display_text()),
        }
    }
}
