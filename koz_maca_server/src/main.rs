use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use dashmap::DashMap;
use futures_util::{stream::StreamExt, SinkExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use koz_maca_core::{ClientMessage, GameState, ServerMessage, SessionId};

mod config;
mod error;
mod manifest;

use config::ServerConfig;
use error::ServerError;

// 服务器全局状态
// 每个会话的 GameState 归其连接任务独占，这里只登记在线会话
pub(crate) struct AppState {
    pub(crate) config: ServerConfig,
    sessions: DashMap<SessionId, SessionEntry>,
}

// 在线会话的登记信息
struct SessionEntry {
    identifier: String,
}

impl AppState {
    pub(crate) fn new(config: ServerConfig) -> Self {
        AppState { config, sessions: DashMap::new() }
    }
}

pub(crate) type SharedState = Arc<AppState>;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let addr = config.bind_addr;
    let state = SharedState::new(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("服务器正在监听 {}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/manifest.json", get(manifest::app_manifest))
        .route("/farcaster/manifest.json", get(manifest::farcaster_manifest))
        .route("/.well-known/farcaster.json", get(manifest::farcaster_manifest))
        .route("/ws", get(websocket_handler))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// 处理 WebSocket 连接请求
async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// 处理单个 WebSocket 连接（即一个游戏会话）的生命周期
async fn handle_socket(socket: WebSocket, state: SharedState) {
    let (mut sender, mut receiver) = socket.split();

    // 连接任务把回复放进通道，由单独的任务写回 WebSocket
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(32);

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let payload = match serde_json::to_string(&msg) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("序列化消息失败: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(payload.into())).await.is_err() {
                // 发送失败，说明客户端已断开
                break;
            }
        }
    });

    // 收到 StartSession 后才有会话
    let mut session: Option<GameState> = None;

    'recv: while let Some(Ok(msg)) = receiver.next().await {
        if let Message::Text(text) = msg {
            let replies = match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => handle_client_message(client_msg, &state, &mut session),
                Err(e) => {
                    warn!("解析消息失败: {}", e);
                    vec![ServerMessage::Error { message: format!("无法解析消息: {}", e) }]
                }
            };
            for reply in replies {
                if tx.send(reply).await.is_err() {
                    break 'recv;
                }
            }
        }
    }

    if let Some(game_state) = session {
        handle_disconnect(&state, game_state.session_id);
    }
    drop(tx);
    let _ = send_task.await;
    info!("客户端连接关闭");
}

/// 核心消息处理逻辑，返回需要发回给该连接的消息
fn handle_client_message(
    msg: ClientMessage,
    state: &AppState,
    session: &mut Option<GameState>,
) -> Vec<ServerMessage> {
    // 会话开始之后的所有消息（包括重复的 StartSession）都交给 GameState 处理
    let Some(game_state) = session.as_mut() else {
        return match msg {
            ClientMessage::StartSession { identifier } => {
                vec![start_session(identifier, state, session)]
            }
            _ => vec![ServerMessage::Error { message: "请先开始会话".to_string() }],
        };
    };

    let replies = game_state.handle_message(msg);
    for reply in &replies {
        match reply {
            ServerMessage::ReadyAcknowledged => {
                info!("会话 {} 的宿主已就绪", game_state.session_id)
            }
            ServerMessage::RoundPlayed(result) => info!(
                "会话 {} 结算: 叫 {} 实得 {} 成功={}",
                game_state.session_id, result.bid, result.actual, result.success
            ),
            ServerMessage::Error { message } => {
                warn!("会话 {} 的请求被拒绝: {}", game_state.session_id, message)
            }
            _ => {}
        }
    }
    debug!("会话 {} 当前阶段: {:?}", game_state.session_id, game_state.phase());
    replies
}

/// 创建会话并登记。没有标识符（或为空）时用会话 ID 作为种子来源
fn start_session(
    identifier: Option<String>,
    state: &AppState,
    session: &mut Option<GameState>,
) -> ServerMessage {
    let session_id = Uuid::new_v4();
    let identifier = identifier
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| session_id.to_string());

    let game_state = GameState::new(session_id, identifier.clone());
    info!("会话 {} 已开始, 标识符 {:?}", session_id, identifier);
    state.sessions.insert(session_id, SessionEntry { identifier });
    info!("当前在线会话数: {}", state.sessions.len());

    let reply = ServerMessage::SessionStarted { session_id, game_state: game_state.clone() };
    *session = Some(game_state);
    reply
}

/// 连接断开后注销会话
fn handle_disconnect(state: &AppState, session_id: SessionId) {
    if let Some((_, entry)) = state.sessions.remove(&session_id) {
        info!("会话 {} ({}) 已结束", session_id, entry.identifier);
    }
}
