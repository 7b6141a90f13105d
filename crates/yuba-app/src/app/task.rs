use anyhow::Result;
use colored::Colorize;
use yuba_chat::{SendOutcome, Sender, Widget};

/// Open the widget, send one message, print the reply and close again
pub async fn run_ask_mode(mut widget: Widget, text: &str, json: bool) -> Result<SendOutcome> {
    let session = widget.open();
    let outcome = session.send(text).await;

    if let SendOutcome::Ignored(reason) = outcome {
        eprintln!("{} nothing to send ({:?})", "Error:".bright_red().bold(), reason);
        widget.close();
        return Ok(outcome);
    }

    let reply = session
        .history()
        .into_iter()
        .rev()
        .find(|m| m.sender == Sender::Bot && !m.transient);

    if json {
        let json = serde_json::json!({
            "reply": reply.as_ref().map(|m| m.text.clone()),
            "failed": outcome.is_failure(),
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else if let Some(reply) = reply {
        println!("{}", reply.display_text());
    }

    widget.close();
    Ok(outcome)
}

/// Process exit status for an ask-mode outcome: 0 only when a reply arrived
pub fn exit_code(outcome: SendOutcome) -> i32 {
    match outcome {
        SendOutcome::Replied => 0,
        SendOutcome::Ignored(_) => 2,
        SendOutcome::TransportFailed | SendOutcome::CallbackFailed => 1,
    }
}
