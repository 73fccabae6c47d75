//! UI utilities for the client.

use std::io::Write;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

pub fn prompt(user: &str) -> String {
    format!("{}> ", user)
}

/// Redisplay the prompt after receiving a message
pub fn redisplay_prompt(user: &str) {
    print!("{}", prompt(user));
    std::io::stdout().flush().ok();
}

/// Print a block of output and put the prompt back
pub fn show(text: &str, user: &str) {
    print!("{}", text);
    redisplay_prompt(user);
}

/// Read prompt lines on a dedicated thread (rustyline is synchronous).
///
/// The channel closes on Ctrl+C, Ctrl+D or a terminal error. The reader outlives
/// individual connections so reconnects keep the same prompt.
pub fn spawn_line_reader(user: &str) -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();
    let prompt = prompt(user);

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                tracing::error!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line).ok();
                    if input_tx.send(line.to_string()).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}
