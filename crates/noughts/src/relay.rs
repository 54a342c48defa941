//! WebSocket relay: carries wire events between sockets and the room manager.

use crate::config::NoughtsConfig;
use crate::protocol::{ClientEvent, ParticipantId, ProtocolError, ServerEvent};
use crate::room::{LobbySummary, Outbox, RoomManager};
use axum::body::Body;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::Request;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tower::ServiceBuilder;
use tracing::{debug, info, instrument, warn};

/// Builds the HTTP router: `/ws`, `/health`, `/lobbies`.
pub fn router(rooms: RoomManager) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .route("/lobbies", get(list_lobbies))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            debug!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(rooms)
}

/// Binds and serves until Ctrl+C.
#[instrument(skip_all, fields(host = %config.host(), port = config.port()))]
pub async fn serve(config: &NoughtsConfig) -> anyhow::Result<()> {
    let rooms = RoomManager::with_grace(config.disposal_grace());
    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!("Relay ready at ws://{}:{}/ws", config.host(), config.port());

    axum::serve(listener, router(rooms))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down relay");
        })
        .await?;
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

async fn list_lobbies(State(rooms): State<RoomManager>) -> Json<Vec<LobbySummary>> {
    Json(rooms.lobbies())
}

async fn ws_handler(State(rooms): State<RoomManager>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(rooms, socket))
}

#[instrument(skip_all, fields(participant = tracing::field::Empty))]
async fn handle_socket(rooms: RoomManager, socket: WebSocket) {
    let participant = ParticipantId::next();
    tracing::Span::current().record("participant", tracing::field::display(participant));
    info!("Client connected");

    let (mut ws_tx, mut ws_rx) = socket.split();
    let (outbox, mut inbox) = mpsc::unbounded_channel::<ServerEvent>();

    let forward = tokio::spawn(async move {
        while let Some(event) = inbox.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "Failed to encode server event");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = ws_rx.next().await {
        match msg {
            Message::Text(text) => dispatch(&rooms, participant, &outbox, text.as_str()),
            Message::Close(_) => break,
            Message::Binary(_) | Message::Ping(_) | Message::Pong(_) => {}
        }
    }

    // An applied move stays applied; leaving only affects disposal.
    rooms.leave(participant);
    forward.abort();
    info!("Client disconnected");
}

/// Handles one client frame on behalf of `participant`.
///
/// A missing lobby id is reported back as `errorMsg`. Every other bad
/// frame is logged and dropped.
#[instrument(skip(rooms, outbox, text))]
pub fn dispatch(rooms: &RoomManager, participant: ParticipantId, outbox: &Outbox, text: &str) {
    match ClientEvent::decode(text) {
        Ok(ClientEvent::JoinLobby { lobby_id, mark }) => {
            rooms.join_lobby(&lobby_id, participant, outbox.clone(), mark);
        }
        Ok(ClientEvent::MakeMove { index }) => {
            rooms.make_move(participant, index);
        }
        Ok(ClientEvent::NewGame) => {
            rooms.new_game(participant);
        }
        Ok(ClientEvent::ResetStats) => {
            rooms.reset_stats(participant);
        }
        Err(ProtocolError::MissingLobbyId) => {
            warn!("Join without lobby id");
            let _ = outbox.send(ServerEvent::ErrorMsg(ProtocolError::MissingLobbyId.to_string()));
        }
        Err(e @ ProtocolError::BadPayload { .. }) => {
            debug!(error = %e, "Dropping frame");
        }
        Err(e) => {
            warn!(error = %e, "Dropping frame");
        }
    }
}
