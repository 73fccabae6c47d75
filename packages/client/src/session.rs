//! WebSocket client session management.

use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use tokio::{net::TcpStream, sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{self, Message, http::StatusCode},
};
use yagura_server::infrastructure::dto::websocket::{ClientMessage, ServerMessage};

use super::{
    domain::{ReadyRetryPolicy, SessionRole, parse_input},
    error::ClientError,
    formatter::MessageFormatter,
    ui::show,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Run one WebSocket session until the user exits (`Ok`) or the connection drops (`Err`)
pub async fn run_client_session(
    url: &str,
    role: &SessionRole,
    input: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _) = match connect_async(url).await {
        Ok(result) => result,
        Err(tungstenite::Error::Http(response))
            if response.status() == StatusCode::UNAUTHORIZED =>
        {
            return Err(ClientError::Unauthorized(
                "the server rejected the broadcaster token".to_string(),
            ));
        }
        Err(e) => return Err(ClientError::ConnectionError(e.to_string())),
    };

    // The query string may carry the token
    tracing::info!("Connected to {}", url.split('?').next().unwrap_or(url));

    let (mut write, read) = ws_stream.split();
    let (signal_tx, mut signal_rx) = mpsc::unbounded_channel::<ClientMessage>();

    for message in role.opening_messages() {
        send(&mut write, &message).await?;
    }

    let user = role.user().to_string();
    let scheduler = ReadyScheduler::for_role(role, signal_tx);
    let mut read_task = tokio::spawn(read_loop(read, user.clone(), scheduler));

    loop {
        tokio::select! {
            _ = &mut read_task => {
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
            line = input.recv() => match line {
                Some(line) => match role.message_for(parse_input(&line)) {
                    Ok(message) => {
                        if let Err(e) = send(&mut write, &message).await {
                            read_task.abort();
                            return Err(e);
                        }
                    }
                    Err(notice) => show(&MessageFormatter::format_notice(&notice), &user),
                },
                None => {
                    // Prompt closed (Ctrl+C / Ctrl+D)
                    write.send(Message::Close(None)).await.ok();
                    read_task.abort();
                    return Ok(());
                }
            },
            Some(signal) = signal_rx.recv() => {
                if let Err(e) = send(&mut write, &signal).await {
                    read_task.abort();
                    return Err(e);
                }
            }
        }
    }
}

async fn send(
    write: &mut SplitSink<WsStream, Message>,
    message: &ClientMessage,
) -> Result<(), ClientError> {
    let json = serde_json::to_string(message)?;
    tracing::debug!("Sending: {}", json);
    write
        .send(Message::text(json))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))
}

async fn read_loop(mut read: SplitStream<WsStream>, user: String, mut scheduler: ReadyScheduler) {
    while let Some(message) = read.next().await {
        match message {
            Ok(Message::Text(text)) => match serde_json::from_str::<ServerMessage>(text.as_str()) {
                Ok(server_message) => {
                    scheduler.on_event(&server_message);
                    show(&MessageFormatter::format_server_message(&server_message), &user);
                }
                Err(_) => show(&MessageFormatter::format_raw_message(text.as_str()), &user),
            },
            Ok(Message::Close(_)) => {
                tracing::info!("Server closed the connection");
                break;
            }
            Err(e) => {
                tracing::warn!("WebSocket read error: {}", e);
                break;
            }
            _ => {}
        }
    }
}

/// Drives the viewer's `ready` re-sends from the stream events it sees.
///
/// `stream-started` (re)starts the schedule, `stream-stopped` cancels it.
/// Broadcasters get a scheduler with no target, which never sends anything.
struct ReadyScheduler {
    target: Option<(String, ReadyRetryPolicy)>,
    signal_tx: mpsc::UnboundedSender<ClientMessage>,
    task: Option<JoinHandle<()>>,
}

impl ReadyScheduler {
    fn for_role(role: &SessionRole, signal_tx: mpsc::UnboundedSender<ClientMessage>) -> Self {
        let target = match role {
            SessionRole::Viewer {
                media_address,
                ready_policy,
                ..
            } => Some((media_address.clone(), *ready_policy)),
            SessionRole::Broadcaster { .. } => None,
        };
        Self {
            target,
            signal_tx,
            task: None,
        }
    }

    fn on_event(&mut self, message: &ServerMessage) {
        let Some((media_address, policy)) = self.target.clone() else {
            return;
        };

        match message {
            ServerMessage::StreamStarted { .. } => {
                self.cancel();
                self.task = Some(spawn_ready_retries(
                    media_address,
                    policy,
                    self.signal_tx.clone(),
                ));
            }
            ServerMessage::StreamStopped => self.cancel(),
            _ => {}
        }
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for ReadyScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn spawn_ready_retries(
    viewer_media_address: String,
    policy: ReadyRetryPolicy,
    signal_tx: mpsc::UnboundedSender<ClientMessage>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut attempt = 0;
        while let Some(delay) = policy.delay_before(attempt) {
            tokio::time::sleep(delay).await;
            tracing::debug!(
                "Sending ready (attempt {}/{})",
                attempt + 1,
                policy.max_attempts
            );
            let ready = ClientMessage::Ready {
                viewer_media_address: viewer_media_address.clone(),
            };
            if signal_tx.send(ready).is_err() {
                break;
            }
            attempt += 1;
        }
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;
    use yagura_server::domain::SourceKind;

    use super::*;

    fn viewer(policy: ReadyRetryPolicy) -> SessionRole {
        SessionRole::Viewer {
            user: "bob".to_string(),
            media_address: "V1".to_string(),
            ready_policy: policy,
        }
    }

    fn started() -> ServerMessage {
        ServerMessage::StreamStarted {
            media_address: "A1".to_string(),
            source_kind: SourceKind::Camera,
        }
    }

    fn ready() -> ClientMessage {
        ClientMessage::Ready {
            viewer_media_address: "V1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_ready_is_sent_up_to_max_attempts() {
        // テスト項目: stream-started の後、ready が max_attempts 回だけ送られる
        // given (前提条件):
        let (tx, mut rx) = mpsc::unbounded_channel();
        let policy = ReadyRetryPolicy::new(3, Duration::from_millis(10));
        let mut scheduler = ReadyScheduler::for_role(&viewer(policy), tx);

        // when (操作):
        scheduler.on_event(&started());

        // then (期待する結果):
        for _ in 0..3 {
            let message = timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
            assert_eq!(message, Some(ready()));
        }
        let extra = timeout(Duration::from_millis(100), rx.recv()).await;
        assert!(extra.is_err());
    }

    #[tokio::test]
    async fn test_stream_stopped_cancels_retries() {
        // テスト項目: stream-stopped を受けると残りの ready は送られない
        // given (前提条件):
        let (tx, mut rx) = mpsc::unbounded_channel();
        let policy = ReadyRetryPolicy::new(5, Duration::from_millis(50));
        let mut scheduler = ReadyScheduler::for_role(&viewer(policy), tx);
        scheduler.on_event(&started());
        let first = timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
        assert_eq!(first, Some(ready()));

        // when (操作):
        scheduler.on_event(&ServerMessage::StreamStopped);

        // then (期待する結果):
        let next = timeout(Duration::from_millis(200), rx.recv()).await;
        assert!(next.is_err());
    }

    #[tokio::test]
    async fn test_broadcaster_never_sends_ready() {
        // テスト項目: 配信者のスケジューラは ready を送らない
        // given (前提条件):
        let (tx, mut rx) = mpsc::unbounded_channel();
        let role = SessionRole::Broadcaster {
            user: "host".to_string(),
            media_address: "A1".to_string(),
            source_kind: SourceKind::Camera,
        };
        let mut scheduler = ReadyScheduler::for_role(&role, tx);

        // when (操作):
        scheduler.on_event(&started());

        // then (期待する結果):
        let next = timeout(Duration::from_millis(100), rx.recv()).await;
        assert!(next.is_err());
    }
}
