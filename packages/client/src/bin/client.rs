//! Yagura CLI client: broadcast, watch, or check the stream status.
//!
//! Reconnects on disconnection (max 5 attempts with 5 second interval).
//! A rejected password or token exits immediately.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin yagura-client -- broadcast --password admin --media-address A1 --source screen
//! cargo run --bin yagura-client -- watch --media-address V1 --user bob
//! cargo run --bin yagura-client -- -s http://127.0.0.1:8080 status
//! ```

use std::time::Duration;

use clap::{Parser, Subcommand};

use yagura_client::{
    ClientOptions,
    domain::{ReadyRetryPolicy, SessionRole},
    print_stream_status, run_client,
};
use yagura_server::domain::SourceKind;
use yagura_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "yagura-client")]
#[command(about = "Broadcaster and viewer client for the Yagura streaming relay", long_about = None)]
struct Args {
    /// Server base URL
    #[arg(
        short = 's',
        long,
        env = "YAGURA_SERVER",
        default_value = "http://127.0.0.1:8080"
    )]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in as the broadcaster and go live
    Broadcast {
        /// Admin password
        #[arg(long, env = "YAGURA_ADMIN_PASSWORD")]
        password: String,

        /// Media address viewers should connect to
        #[arg(long)]
        media_address: String,

        /// camera, screen or file
        #[arg(long, default_value = "camera")]
        source: SourceKind,

        /// Name shown on chat messages
        #[arg(long, default_value = "broadcaster")]
        user: String,
    },

    /// Join as a viewer
    Watch {
        /// This viewer's media address, forwarded to the broadcaster
        #[arg(long)]
        media_address: String,

        /// Name shown on chat messages
        #[arg(long, default_value = "viewer")]
        user: String,

        /// How many times to send `ready` after the stream starts
        #[arg(long, default_value_t = 5)]
        ready_attempts: u32,

        /// Interval between `ready` re-sends
        #[arg(long, default_value_t = 2000)]
        ready_interval_ms: u64,
    },

    /// Print whether the stream is live and how many viewers are watching
    Status,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let result = match args.command {
        Command::Broadcast {
            password,
            media_address,
            source,
            user,
        } => {
            run_client(ClientOptions {
                server: args.server,
                password: Some(password),
                role: SessionRole::Broadcaster {
                    user,
                    media_address,
                    source_kind: source,
                },
            })
            .await
        }
        Command::Watch {
            media_address,
            user,
            ready_attempts,
            ready_interval_ms,
        } => {
            run_client(ClientOptions {
                server: args.server,
                password: None,
                role: SessionRole::Viewer {
                    user,
                    media_address,
                    ready_policy: ReadyRetryPolicy::new(
                        ready_attempts,
                        Duration::from_millis(ready_interval_ms),
                    ),
                },
            })
            .await
        }
        Command::Status => print_stream_status(&args.server).await,
    };

    if let Err(e) = result {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
