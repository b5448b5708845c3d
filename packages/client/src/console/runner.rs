//! Console execution: wires the pipeline to the terminal and runs the input
//! loop.

use std::{path::PathBuf, sync::Arc};

use chatdesk_shared::time::SystemClock;
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use crate::{
    config::RealtimeConfig,
    domain::{NotificationPlatform, PermissionState, RealtimeEvent, ToastAction},
    infrastructure::{
        FilePreferenceStore, HttpUnreadSummarySource, InMemoryRequestCache, StaticTokenSource,
        WebSocketConnector,
    },
    notification::{NotificationPresenter, PermissionManager},
    realtime::{
        CacheInvalidator, EventDispatcher, EventListener, RealtimeClient, UnreadCounterStore,
        spawn_unread_resync,
    },
};

use super::{
    command::{Command, parse_command},
    formatter::MessageFormatter,
    ui::{PROMPT, TerminalNavigator, TerminalNotifier, VisibilityFlag, redisplay_prompt},
};

/// Console settings, resolved from the command line
#[derive(Debug, Clone)]
pub struct ConsoleOptions {
    pub config: RealtimeConfig,
    pub token: String,
    pub preferences_path: PathBuf,
    /// Start with the window treated as hidden
    pub hidden: bool,
    /// Desktop permission before any prompt
    pub permission: PermissionState,
    /// How the simulated permission prompt is answered
    pub permission_answer: PermissionState,
}

/// Run the console until the user quits
pub async fn run_console(options: ConsoleOptions) -> Result<(), Box<dyn std::error::Error>> {
    let ConsoleOptions {
        config,
        token,
        preferences_path,
        hidden,
        permission,
        permission_answer,
    } = options;

    let auth = Arc::new(StaticTokenSource::new(Some(token)));
    let cache = Arc::new(InMemoryRequestCache::new());
    let dispatcher = Arc::new(EventDispatcher::new(CacheInvalidator::new(
        cache,
        UnreadCounterStore::new(),
    )));
    let client = RealtimeClient::new(
        config.clone(),
        auth.clone(),
        Arc::new(WebSocketConnector::new()),
        dispatcher,
    );

    let preferences = Arc::new(FilePreferenceStore::open(preferences_path));
    tracing::info!("Using preferences at {}", preferences.path().display());
    let notifier = Arc::new(TerminalNotifier::new(permission, permission_answer));
    let visibility = Arc::new(VisibilityFlag::new(hidden));
    let clock = Arc::new(SystemClock);

    let platform: Arc<dyn NotificationPlatform> = notifier.clone();
    let permissions = PermissionManager::new(
        Some(platform.clone()),
        preferences.clone(),
        notifier.clone(),
        clock.clone(),
    );
    permissions.request_automatically().await;

    let presenter = Arc::new(NotificationPresenter::new(
        preferences,
        visibility.clone(),
        notifier.clone(),
        Some(platform),
        Arc::new(TerminalNavigator),
        clock,
    ));
    let presenter_listener: Arc<dyn EventListener> = presenter.clone();
    let activity_listener: Arc<dyn EventListener> = Arc::new(|event: &RealtimeEvent| {
        if let Some(line) = MessageFormatter::format_activity(event) {
            print!("{}", line);
            redisplay_prompt();
        }
    });

    let _status_subscription = client.subscribe_status(|status| {
        print!("{}", MessageFormatter::format_status(*status));
        redisplay_prompt();
    });
    let _unread_subscription = client.unread().subscribe(|snapshot| {
        tracing::debug!(
            "Unread counter: {} messages, {} contacts",
            snapshot.total,
            snapshot.contacts_with_unread
        );
    });

    if !client.acquire(presenter_listener.clone()) || !client.acquire(activity_listener.clone()) {
        return Err("an access token is required".into());
    }

    let resync = spawn_unread_resync(
        client.unread().clone(),
        Arc::new(HttpUnreadSummarySource::new(&config, auth.clone())),
        config.resync_interval,
    );

    println!(
        "\nConnecting to {}. Type /help for commands. Press Ctrl+C to exit.\n",
        config.ws_url
    );

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
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

    while let Some(line) = input_rx.recv().await {
        match parse_command(&line) {
            Command::Send(payload) => {
                if !client.is_connected() {
                    println!("not connected; payload dropped");
                }
                client.send(&payload);
            }
            Command::Ping => client.send(&serde_json::json!({ "type": "ping" })),
            Command::Read(count) => {
                client.unread().decrement(count);
                print!("{}", MessageFormatter::format_unread(client.unread().snapshot()));
            }
            Command::Unread => {
                print!("{}", MessageFormatter::format_unread(client.unread().snapshot()));
            }
            Command::Open(conversation_id) => {
                presenter.activate_toast(&ToastAction::OpenConversation(conversation_id));
            }
            Command::Click => match notifier.last_desktop_notification() {
                Some(notification) => presenter.activate_desktop(&notification),
                None => println!("no desktop notification to click"),
            },
            Command::Notifications => {
                let state = permissions.request_manually().await;
                println!("desktop notifications: {:?}", state);
            }
            Command::Hidden(hidden) => {
                visibility.set_hidden(hidden);
                println!("window {}", if hidden { "hidden" } else { "visible" });
            }
            Command::Logout => {
                // Token loss tears the socket down.
                auth.clear();
                resync.abort();
                client.unread().reset();
                println!("signed out");
            }
            Command::Help => print!("{}", MessageFormatter::format_help()),
            Command::Quit => break,
            Command::Invalid(reason) => println!("{}", reason),
        }
    }

    client.release(&presenter_listener);
    client.release(&activity_listener);
    client.shutdown();
    resync.abort();
    tracing::info!("Console session ended");

    Ok(())
}
