//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use super::{
    handler::{debug_stage, health_check, login, stream_status, verify, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Yagura signaling server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(AppState::new(repository, pusher, authenticator, clock));
/// server.run("127.0.0.1", 8080).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    cors: CorsLayer,
}

impl Server {
    /// Any origin may call the HTTP API until `with_cors_origin` narrows it
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
            cors: cors_layer("*"),
        }
    }

    /// Restrict cross-origin access to a comma separated origin list (`*` allows any)
    pub fn with_cors_origin(mut self, origins: &str) -> Self {
        self.cors = cors_layer(origins);
        self
    }

    /// Build the router with every endpoint
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/stream-status", get(stream_status))
            .route("/api/login", post(login))
            .route("/api/verify", get(verify))
            .route("/debug/stage", get(debug_stage))
            .layer(TraceLayer::new_for_http())
            .layer(self.cors.clone())
            .with_state(self.state.clone())
    }

    /// Run the server until a shutdown signal arrives
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Yagura server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

/// Build the CORS layer for the HTTP API
///
/// Origins that are not valid header values are skipped with a warning.
pub fn cors_layer(origins: &str) -> CorsLayer {
    let allow_origin = if origins.trim() == "*" {
        AllowOrigin::any()
    } else {
        let list: Vec<HeaderValue> = origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(list)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
