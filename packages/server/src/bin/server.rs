//! Hiroba chat server.
//!
//! A single shared room: every accepted message is appended to a bounded
//! history and the full history is pushed to every connected client.
//! `/stock=<code>` commands are forwarded to the stock bot, whose replies come
//! back through `POST /api/bot/replies`, which requires the internal secret.
//!
//! Run with:
//! ```not_rust
//! HIROBA_JWT_SECRET=secret HIROBA_INTERNAL_SECRET=internal cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --jwt-secret secret --internal-secret internal --port 3000
//! ```

use std::num::NonZeroUsize;

use clap::Parser;

use hiroba_server::{
    infrastructure::bot::{channel::DEFAULT_REPLY_QUEUE_CAPACITY, http::DEFAULT_SUBMIT_TIMEOUT},
    ui::{Server, ServerConfig},
};
use hiroba_shared::{logger::setup_logger, time::offset_from_hours};

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "Real-time chat broadcast server with a stock quote bot", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HIROBA_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "HIROBA_PORT", default_value = "8080")]
    port: u16,

    /// Number of messages kept and replayed to joining clients
    #[arg(long, env = "HIROBA_HISTORY_CAPACITY", default_value = "50")]
    history_capacity: NonZeroUsize,

    /// Capacity of the queue in front of the broadcast engine
    #[arg(long, env = "HIROBA_QUEUE_CAPACITY", default_value = "256")]
    queue_capacity: NonZeroUsize,

    /// Secret used to verify HS256 tokens
    #[arg(long, env = "HIROBA_JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// Bearer secret the bot service and the login flow present on internal routes
    #[arg(long, env = "HIROBA_INTERNAL_SECRET", hide_env_values = true)]
    internal_secret: String,

    /// Base URL of the stock bot service
    #[arg(long, env = "HIROBA_BOT_URL", default_value = "http://localhost:8082")]
    bot_url: String,

    /// UTC offset (hours) used for message timestamps
    #[arg(
        long,
        env = "HIROBA_UTC_OFFSET_HOURS",
        default_value = "0",
        allow_negative_numbers = true
    )]
    utc_offset_hours: i32,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger("hiroba-server", env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let Some(utc_offset) = offset_from_hours(args.utc_offset_hours) else {
        tracing::error!("Invalid UTC offset: {} hours", args.utc_offset_hours);
        std::process::exit(1);
    };

    let config = ServerConfig {
        history_capacity: args.history_capacity,
        queue_capacity: args.queue_capacity,
        reply_queue_capacity: DEFAULT_REPLY_QUEUE_CAPACITY,
        jwt_secret: args.jwt_secret,
        internal_secret: args.internal_secret,
        bot_url: args.bot_url,
        bot_timeout: DEFAULT_SUBMIT_TIMEOUT,
        utc_offset,
    };

    let server = match Server::from_config(&config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run(&args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
