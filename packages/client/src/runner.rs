//! Client execution logic with reconnection support.

use std::time::Duration;

use super::{
    api,
    domain::{SessionRole, should_attempt_reconnect, should_exit_immediately, websocket_url},
    error::ClientError,
    formatter::MessageFormatter,
    session::run_client_session,
    ui::spawn_line_reader,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// What to connect to and as whom
#[derive(Clone)]
pub struct ClientOptions {
    /// HTTP base URL of the server
    pub server: String,
    /// Broadcaster password; viewers connect without one
    pub password: Option<String>,
    pub role: SessionRole,
}

/// Run the WebSocket client with reconnection logic
pub async fn run_client(options: ClientOptions) -> Result<(), ClientError> {
    let token = match &options.password {
        Some(password) => Some(api::login(&options.server, password).await?),
        None => None,
    };
    let url = websocket_url(&options.server, token.as_deref());

    let hint = match options.role {
        SessionRole::Broadcaster { .. } => "Commands: /stop, /start, /delete <id>.",
        SessionRole::Viewer { .. } => "Commands: /delete <id> (if allowed).",
    };
    println!(
        "\nYou are '{}'. Type messages and press Enter to send. {} Press Ctrl+C to exit.\n",
        options.role.user(),
        hint
    );
    let mut input = spawn_line_reader(options.role.user());

    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} (attempt {}/{})",
            options.server,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&url, &options.role, &mut input).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Err(e) => {
                if should_exit_immediately(&e) {
                    return Err(e);
                }

                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        MAX_RECONNECT_ATTEMPTS
                    );
                    return Err(e);
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }
}

/// Print the current stream status once
pub async fn print_stream_status(server: &str) -> Result<(), ClientError> {
    let status = api::fetch_stream_status(server).await?;
    println!("{}", MessageFormatter::format_stream_status(&status));
    Ok(())
}
