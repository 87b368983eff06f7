use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use clap::Parser;
use futures_util::{SinkExt, StreamExt};
use liminal_core::assets::{load_area_assets, AssetSource, DirectoryAssetSource, StaticAssetSource};
use liminal_core::config::SimConfig;
use liminal_core::constants::{TICK_MS, TICK_RATE};
use liminal_core::engine::GameEngine;
use liminal_core::server_protocol::{parse_client_message, ParsedClientMessage};
use liminal_core::types::InputFrame;
use serde_json::{json, Value};
use tokio::sync::{mpsc, Mutex};
use tower_http::services::{ServeDir, ServeFile};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

type SharedState = Arc<Mutex<ServerState>>;

#[derive(Parser, Debug)]
#[command(name = "server")]
struct Cli {
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,
    #[arg(long)]
    seed: Option<u32>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, env = "STATIC_DIR")]
    static_dir: Option<PathBuf>,
    /// Asset root served under /assets. Without it every asset is a bundled stand-in.
    #[arg(long, env = "ASSETS_DIR")]
    assets_dir: Option<PathBuf>,
}

#[derive(Clone)]
struct ClientContext {
    tx: mpsc::Sender<OutboundMessage>,
}

#[derive(Clone, Debug)]
enum OutboundMessage {
    Text(String),
    Close { code: u16, reason: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum QueuePolicy {
    DropOnFull,
    DisconnectOnFull,
}

struct ServerState {
    clients: HashMap<String, ClientContext>,
    game: GameEngine,
    /// Movement persists between messages; actions and look deltas fire once.
    pending_input: InputFrame,
    assets: Arc<dyn AssetSource>,
    /// Bumped on every new session so stale asset loads are discarded.
    area_epoch: u64,
    load_in_flight: bool,
    game_over_sent: bool,
}

impl ServerState {
    fn new(game: GameEngine, assets: Arc<dyn AssetSource>) -> Self {
        Self {
            clients: HashMap::new(),
            game,
            pending_input: InputFrame::default(),
            assets,
            area_epoch: 0,
            load_in_flight: false,
            game_over_sent: false,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    let seed = cli.seed.unwrap_or_else(rand::random);
    let game = GameEngine::new(config, Some(seed))?;

    let assets: Arc<dyn AssetSource> = match &cli.assets_dir {
        Some(dir) => Arc::new(DirectoryAssetSource::new(dir.clone(), "/assets")),
        None => Arc::new(StaticAssetSource::all()),
    };

    let state = Arc::new(Mutex::new(ServerState::new(game, assets)));
    start_tick_loop(state.clone());

    let mut app = Router::new()
        .route("/healthz", get(healthz))
        .route("/ws", get(ws_handler))
        .with_state(state);

    if let Some(dir) = &cli.assets_dir {
        app = app.nest_service("/assets", ServeDir::new(dir.clone()));
    }

    let app = if let Some(static_dir) = resolve_static_dir(cli.static_dir) {
        let index_file = static_dir.join("index.html");
        info!(root = %static_dir.display(), "serving static client");
        app.fallback_service(
            ServeDir::new(static_dir).not_found_service(ServeFile::new(index_file)),
        )
    } else {
        warn!("static client root not found; only /ws and /healthz are served");
        app
    };

    let bind_addr = format!("0.0.0.0:{}", cli.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(port = cli.port, seed, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn resolve_static_dir(explicit: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if path.join("index.html").is_file() {
            return Some(path);
        }
    }

    let candidates = [PathBuf::from("dist/client"), PathBuf::from("../dist/client")];
    candidates
        .into_iter()
        .find(|path| path.join("index.html").is_file())
}

async fn healthz() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, socket))
}

async fn handle_socket(state: SharedState, socket: WebSocket) {
    let client_id = make_id("client");
    let (tx, mut rx) = mpsc::channel::<OutboundMessage>(256);

    {
        let mut guard = state.lock().await;
        guard
            .clients
            .insert(client_id.clone(), ClientContext { tx: tx.clone() });
        send_welcome_and_initial_state(&mut guard, &client_id);
    }
    info!(client = %client_id, "client connected");

    let (mut ws_sender, mut ws_receiver) = socket.split();
    let writer = tokio::spawn(async move {
        while let Some(outbound) = rx.recv().await {
            let should_close = matches!(outbound, OutboundMessage::Close { .. });
            let result = match outbound {
                OutboundMessage::Text(payload) => {
                    ws_sender.send(Message::Text(payload.into())).await
                }
                OutboundMessage::Close { code, reason } => {
                    let frame = CloseFrame {
                        code,
                        reason: reason.into(),
                    };
                    ws_sender.send(Message::Close(Some(frame))).await
                }
            };
            if result.is_err() || should_close {
                break;
            }
        }
    });

    while let Some(received) = ws_receiver.next().await {
        let Ok(message) = received else {
            break;
        };

        match message {
            Message::Text(raw) => {
                handle_client_message(&state, &client_id, raw.as_str()).await;
            }
            Message::Binary(raw) => {
                if let Ok(text) = std::str::from_utf8(&raw) {
                    handle_client_message(&state, &client_id, text).await;
                } else {
                    send_error_to_client(&state, &client_id, "invalid utf8 message").await;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    {
        let mut guard = state.lock().await;
        guard.clients.remove(&client_id);
    }
    info!(client = %client_id, "client disconnected");
    drop(tx);
    let _ = writer.await;
}

async fn handle_client_message(state: &SharedState, client_id: &str, raw: &str) {
    let Some(message) = parse_client_message(raw) else {
        send_error_to_client(state, client_id, "invalid message").await;
        return;
    };

    let mut guard = state.lock().await;
    match message {
        ParsedClientMessage::Input(frame) => merge_input(&mut guard.pending_input, &frame),
        ParsedClientMessage::NewSession { seed } => {
            let seed = seed.unwrap_or_else(rand::random);
            if let Err(err) = guard.game.new_session(Some(seed)) {
                let message = json!({ "type": "error", "message": err.to_string() });
                send_to_client(&mut guard, client_id, &message, QueuePolicy::DisconnectOnFull);
                return;
            }
            guard.pending_input = InputFrame::default();
            guard.area_epoch += 1;
            guard.load_in_flight = false;
            guard.game_over_sent = false;
            let welcome = welcome_message(&guard);
            broadcast(&mut guard, &welcome, QueuePolicy::DisconnectOnFull);
        }
        ParsedClientMessage::Ping { t } => {
            let message = json!({ "type": "pong", "t": t });
            send_to_client(&mut guard, client_id, &message, QueuePolicy::DisconnectOnFull);
        }
    }
}

/// Latches one-shot actions until the next tick consumes them.
fn merge_input(pending: &mut InputFrame, frame: &InputFrame) {
    pending.move_x = frame.move_x;
    pending.move_z = frame.move_z;
    pending.look_yaw += frame.look_yaw;
    pending.look_pitch += frame.look_pitch;
    pending.interact |= frame.interact;
    pending.primary |= frame.primary;
    pending.secondary |= frame.secondary;
    pending.quick_use |= frame.quick_use;
}

fn welcome_message(state: &ServerState) -> Value {
    json!({
        "type": "welcome",
        "sessionSeed": state.game.session_seed(),
        "tickRate": TICK_RATE,
    })
}

fn send_welcome_and_initial_state(state: &mut ServerState, client_id: &str) {
    let welcome = welcome_message(state);
    send_to_client(state, client_id, &welcome, QueuePolicy::DisconnectOnFull);

    let area = json!({
        "type": "area_init",
        "area": state.game.area_init(),
    });
    send_to_client(state, client_id, &area, QueuePolicy::DisconnectOnFull);

    let snapshot = state.game.build_snapshot(false);
    send_to_client(
        state,
        client_id,
        &json!({
            "type": "state",
            "snapshot": snapshot,
        }),
        QueuePolicy::DisconnectOnFull,
    );
}

fn start_tick_loop(state: SharedState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(TICK_MS));
        loop {
            interval.tick().await;
            let mut guard = state.lock().await;
            tick_game(&mut guard, &state);
        }
    });
}

fn tick_game(state: &mut ServerState, shared: &SharedState) {
    if state.game.is_loading() && !state.load_in_flight {
        begin_area_load(state, shared);
    }

    let input = state.pending_input;
    state.game.step(TICK_MS, &input);
    state.pending_input.clear_actions();

    let snapshot = state.game.build_snapshot(true);
    broadcast(
        state,
        &json!({
            "type": "state",
            "snapshot": snapshot,
        }),
        QueuePolicy::DropOnFull,
    );

    if state.game.is_ended() && !state.game_over_sent {
        state.game_over_sent = true;
        let message = json!({
            "type": "game_over",
            "reason": state.game.end_reason(),
            "seed": state.game.session_seed(),
            "elapsedMs": state.game.elapsed_ms(),
        });
        broadcast(state, &message, QueuePolicy::DisconnectOnFull);
    }
}

/// Sends the new layout and resolves its assets off the tick loop.
fn begin_area_load(state: &mut ServerState, shared: &SharedState) {
    state.load_in_flight = true;
    let area = json!({
        "type": "area_init",
        "area": state.game.area_init(),
    });
    broadcast(state, &area, QueuePolicy::DisconnectOnFull);

    let manifest = state.game.asset_manifest();
    let source = state.assets.clone();
    let epoch = state.area_epoch;
    let shared = shared.clone();
    tokio::spawn(async move {
        let loaded = load_area_assets(source.as_ref(), &manifest).await;
        let mut guard = shared.lock().await;
        if guard.area_epoch != epoch || !guard.load_in_flight {
            debug!(epoch, "discarding stale asset load");
            return;
        }
        guard.load_in_flight = false;
        guard.game.complete_area_load(&loaded);
        let handles: Vec<_> = loaded.handles.into_values().collect();
        let message = json!({
            "type": "assets",
            "handles": handles,
        });
        broadcast(&mut guard, &message, QueuePolicy::DisconnectOnFull);
    });
}

fn send_to_client(state: &mut ServerState, client_id: &str, message: &Value, policy: QueuePolicy) {
    let send_failed = state
        .clients
        .get(client_id)
        .map(|client| {
            client
                .tx
                .try_send(OutboundMessage::Text(message.to_string()))
                .is_err()
        })
        .unwrap_or(false);
    if send_failed && policy == QueuePolicy::DisconnectOnFull {
        disconnect_client(state, client_id);
    }
}

fn broadcast(state: &mut ServerState, message: &Value, policy: QueuePolicy) {
    let payload = message.to_string();
    let mut failed_clients = Vec::new();
    for (client_id, client) in &state.clients {
        if client
            .tx
            .try_send(OutboundMessage::Text(payload.clone()))
            .is_err()
            && policy == QueuePolicy::DisconnectOnFull
        {
            failed_clients.push(client_id.clone());
        }
    }
    for client_id in failed_clients {
        disconnect_client(state, &client_id);
    }
}

fn disconnect_client(state: &mut ServerState, client_id: &str) {
    if let Some(client) = state.clients.remove(client_id) {
        warn!(client = %client_id, "outbound queue full, disconnecting");
        let _ = client.tx.try_send(OutboundMessage::Close {
            code: 4002,
            reason: "outbound queue full".to_string(),
        });
    }
}

async fn send_error_to_client(state: &SharedState, client_id: &str, message: &str) {
    let mut guard = state.lock().await;
    send_to_client(
        &mut guard,
        client_id,
        &json!({
            "type": "error",
            "message": message,
        }),
        QueuePolicy::DisconnectOnFull,
    );
}

fn make_id(prefix: &str) -> String {
    let seq = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}_{seq}")
}
