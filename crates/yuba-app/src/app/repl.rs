use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use yuba_chat::{SpeechError, SpeechInput, Widget};

use crate::app::print_messages;
use crate::cli::Cli;

/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Open,
    Close,
    Toggle,
    Mic,
    History,
    Help,
    Exit,
    Unknown(String),
    Message(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if matches!(trimmed, "exit" | "quit") {
            return ReplCommand::Exit;
        }
        match trimmed.strip_prefix('/') {
            Some("open") => ReplCommand::Open,
            Some("close") => ReplCommand::Close,
            Some("toggle") => ReplCommand::Toggle,
            Some("mic") => ReplCommand::Mic,
            Some("history") => ReplCommand::History,
            Some("help") => ReplCommand::Help,
            Some(other) => ReplCommand::Unknown(other.to_string()),
            None => ReplCommand::Message(line.to_string()),
        }
    }
}

fn print_help() {
    println!("{}", "Commands:".bright_cyan());
    println!("  /open      open the chat window");
    println!("  /close     close the chat window (history is discarded)");
    println!("  /toggle    open or close the chat window");
    println!("  /mic       dictate into the message (speech input)");
    println!("  /history   show the conversation so far");
    println!("  /help      show this help");
    println!("  exit       leave yuba");
}

/// Run interactive REPL mode
pub async fn run_repl_mode(cli: &Cli, mut widget: Widget) -> Result<()> {
    println!("{}", "🤖 Yuba - Your Ultimate Backend Agent".bright_cyan().bold());
    println!("{}", format!("Backend: {}", cli.backend).bright_black());
    if cli.host_api.is_none() {
        println!("{}", "No --host-api configured: callback actions will not run".bright_black());
    }
    println!("{}", "Type /open to start chatting, /help for commands\n".bright_black());

    // Terminals have no speech recognizer
    let speech = SpeechInput::unsupported();
    let mut rl = DefaultEditor::new()?;

    loop {
        let prompt = if widget.is_open() { "You: " } else { "yuba> " };
        let line = match rl.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        if line.trim().is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(line.as_str());

        match ReplCommand::parse(&line) {
            ReplCommand::Exit => break,
            ReplCommand::Help => print_help(),
            ReplCommand::Open => {
                widget.open();
                println!("{}", "Chat window open".green());
            }
            ReplCommand::Close => {
                widget.close();
                println!("{}", "Chat window closed".bright_black());
            }
            ReplCommand::Toggle => {
                if widget.toggle() {
                    println!("{}", "Chat window open".green());
                } else {
                    println!("{}", "Chat window closed".bright_black());
                }
            }
            ReplCommand::History => match widget.session() {
                Some(session) => print_messages(&session.history()),
                None => println!("{}", "The chat window is closed".bright_black()),
            },
            ReplCommand::Mic => match widget.session() {
                Some(session) => match speech.listen(&session) {
                    Ok(()) => {}
                    Err(SpeechError::Unsupported) => {
                        println!("{}", "Speech recognition is not supported in this terminal.".yellow())
                    }
                    Err(e) => println!("{} {}", "⚠️".yellow(), e),
                },
                None => println!("{}", "Open the chat window first (/open)".bright_black()),
            },
            ReplCommand::Unknown(cmd) => {
                println!("{} /{} (try /help)", "Unknown command:".yellow(), cmd);
            }
            ReplCommand::Message(text) => {
                let Some(session) = widget.session() else {
                    println!("{}", "The chat window is closed. Type /open first.".bright_black());
                    continue;
                };

                session.set_draft(text);
                let before = session.history().len();
                session.submit_draft().await;

                // The user's own line is already on screen
                let history = session.history();
                let new_replies: Vec<_> = history
                    .into_iter()
                    .skip(before)
                    .filter(|m| m.sender == yuba_chat::Sender::Bot)
                    .collect();
                print_messages(&new_replies);
            }
        }
    }

    println!("{}", "Bye!".bright_cyan());
    Ok(())
}
