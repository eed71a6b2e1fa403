//! Server execution logic.

use std::{future::Future, num::NonZeroUsize, sync::Arc, time::Duration};

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use chrono::FixedOffset;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    domain::{BotGatewayError, MessageHistory},
    infrastructure::{
        auth::{InMemorySessionAuthority, JwtTokenVerifier},
        bot::{HttpBotGateway, bot_reply_channel},
        message_pusher::WebSocketMessagePusher,
    },
    usecase::{
        BotReplyConsumer, BroadcastEngine, CommandDispatcher, ConnectConnectionUseCase,
        DisconnectConnectionUseCase, ReceiveMessageUseCase, TimestampIssuer,
        ViewHistoryUseCase,
    },
};

use super::{
    handler::{
        delete_session, get_history, health_check, post_bot_reply, put_session, websocket_handler,
    },
    middleware::require_internal_secret,
    signal::shutdown_signal,
    state::AppState,
};

/// Runtime configuration of the chat server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Maximum number of messages kept for replay
    pub history_capacity: NonZeroUsize,
    /// Capacity of the ordering point in front of the broadcast engine
    pub queue_capacity: NonZeroUsize,
    /// Capacity of the bot reply queue
    pub reply_queue_capacity: usize,
    /// HS256 secret shared with the login flow
    pub jwt_secret: String,
    /// Bearer secret required on the bot reply and session routes
    pub internal_secret: String,
    /// Base URL of the bot service
    pub bot_url: String,
    pub bot_timeout: Duration,
    /// Offset used to render acceptance timestamps
    pub utc_offset: FixedOffset,
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Failed to set up bot gateway: {0}")]
    BotGateway(#[from] BotGatewayError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// WebSocket chat server
///
/// # Example
///
/// ```ignore
/// let server = Server::from_config(&config)?;
/// server.run("127.0.0.1", 8080).await?;
/// ```
pub struct Server {
    app_state: Arc<AppState>,
}

impl Server {
    pub fn new(app_state: Arc<AppState>) -> Self {
        Self { app_state }
    }

    /// Wire every component and start the background tasks.
    ///
    /// Spawns the broadcast engine and the bot reply consumer, so this must
    /// be called inside a Tokio runtime.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        if config.internal_secret.is_empty() {
            return Err(ServerError::Config(
                "internal secret must not be empty".to_string(),
            ));
        }

        // Initialize dependencies in order:
        // 1. MessagePusher (connection registry)
        // 2. Broadcast engine
        // 3. Collaborators (token verifier, session authority, bot gateway)
        // 4. UseCases and background consumers
        // 5. AppState

        // 1. Create MessagePusher (WebSocket implementation)
        let message_pusher = Arc::new(WebSocketMessagePusher::new());

        // 2. Create and start the broadcast engine
        let (engine, broadcast) = BroadcastEngine::new(
            MessageHistory::new(config.history_capacity),
            message_pusher.clone(),
            config.queue_capacity,
        );
        engine.spawn();

        // 3. Create collaborators
        let token_verifier = Arc::new(JwtTokenVerifier::new(&config.jwt_secret));
        let session_authority = Arc::new(InMemorySessionAuthority::new());
        let bot_gateway = Arc::new(HttpBotGateway::new(&config.bot_url, config.bot_timeout)?);
        tracing::info!("Bot gateway: {}", bot_gateway.endpoint());
        let (bot_replies, reply_source) = bot_reply_channel(config.reply_queue_capacity);

        // 4. Create UseCases and the bot reply consumer
        let timestamps = TimestampIssuer::system(config.utc_offset);
        let connect_connection_usecase =
            Arc::new(ConnectConnectionUseCase::new(broadcast.clone()));
        let disconnect_connection_usecase =
            Arc::new(DisconnectConnectionUseCase::new(message_pusher.clone()));
        let receive_message_usecase = Arc::new(ReceiveMessageUseCase::new(
            token_verifier.clone(),
            CommandDispatcher::new(bot_gateway),
            broadcast.clone(),
            timestamps.clone(),
        ));
        let view_history_usecase = Arc::new(ViewHistoryUseCase::new(
            token_verifier,
            session_authority.clone(),
            broadcast.clone(),
        ));
        BotReplyConsumer::new(Arc::new(reply_source), broadcast, timestamps).spawn();

        // 5. Create AppState
        Ok(Self::new(Arc::new(AppState {
            connect_connection_usecase,
            disconnect_connection_usecase,
            receive_message_usecase,
            view_history_usecase,
            session_authority,
            bot_replies,
            internal_secret: config.internal_secret.clone(),
        })))
    }

    /// Build the router with every endpoint.
    pub fn router(&self) -> Router {
        // 内部エンドポイント（Bot サービスとログインフローのみ）
        let internal = Router::new()
            .route("/api/bot/replies", post(post_bot_reply))
            .route(
                "/internal/sessions/{username}",
                put(put_session).delete(delete_session),
            )
            .route_layer(middleware::from_fn_with_state(
                self.app_state.clone(),
                require_internal_secret,
            ));

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/history", get(get_history))
            .merge(internal)
            .layer(TraceLayer::new_for_http())
            .with_state(self.app_state.clone())
    }

    /// Run the WebSocket chat server until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: &str, port: u16) -> Result<(), ServerError> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already-bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!(
            "WebSocket chat server listening on {}",
            listener.local_addr()?
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}
