//! Terminal agent console for the chatdesk real-time pipeline.
//!
//! Connects to the backend WebSocket with an access token, prints toasts and
//! desktop notifications for inbound messages, and keeps the unread counter
//! in sync. Reconnects automatically while the session is open.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chatdesk-client -- --token <ACCESS_TOKEN>
//! cargo run --bin chatdesk-client -- -t <ACCESS_TOKEN> --hidden --permission granted
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use chatdesk_client::{
    config::RealtimeConfig,
    console::{ConsoleOptions, run_console},
    domain::PermissionState,
};
use chatdesk_shared::logger::setup_logger;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Permission {
    Default,
    Granted,
    Denied,
}

impl From<Permission> for PermissionState {
    fn from(permission: Permission) -> Self {
        match permission {
            Permission::Default => PermissionState::Default,
            Permission::Granted => PermissionState::Granted,
            Permission::Denied => PermissionState::Denied,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "chatdesk-client")]
#[command(about = "Terminal console for the chatdesk real-time event pipeline", long_about = None)]
struct Args {
    /// Access token sent with the WebSocket handshake and API requests
    #[arg(short = 't', long)]
    token: String,

    /// WebSocket endpoint
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8000/ws")]
    url: String,

    /// REST API base URL
    #[arg(long, default_value = "http://127.0.0.1:8000/api")]
    api_base: String,

    /// Notification preferences file
    #[arg(short = 'p', long, default_value = "chatdesk-preferences.json")]
    preferences: PathBuf,

    /// Start with the window treated as hidden
    #[arg(long)]
    hidden: bool,

    /// Desktop notification permission at startup
    #[arg(long, value_enum, default_value_t = Permission::Default)]
    permission: Permission,

    /// Answer given when the permission prompt is shown
    #[arg(long, value_enum, default_value_t = Permission::Granted)]
    permission_answer: Permission,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let options = ConsoleOptions {
        config: RealtimeConfig::new(args.url, args.api_base),
        token: args.token,
        preferences_path: args.preferences,
        hidden: args.hidden,
        permission: args.permission.into(),
        permission_answer: args.permission_answer.into(),
    };

    if let Err(e) = run_console(options).await {
        tracing::error!("Console error: {}", e);
        std::process::exit(1);
    }
}
