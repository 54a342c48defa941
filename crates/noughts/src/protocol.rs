//! JSON wire protocol between browser clients and the relay.
//!
//! Every WebSocket text frame is `{"event": <name>, "data": <payload>}`.

use derive_more::{Display, Error, From};
use noughts_engine::{Board, Mark, Statistics};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::instrument;

/// Lobby identifier chosen by clients.
pub type LobbyId = String;

/// Server-issued identity of one connection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ParticipantId(u64);

static NEXT_PARTICIPANT: AtomicU64 = AtomicU64::new(1);

impl ParticipantId {
    /// Allocates a fresh, process-unique id.
    pub fn next() -> Self {
        Self(NEXT_PARTICIPANT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Full room state as seen by one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    /// Cells, `"X"`, `"O"` or `null`.
    pub board: Board,
    /// Mark to move.
    pub current_mark: Mark,
    /// False once the game is won or drawn.
    pub active: bool,
    /// Series counters.
    pub stats: Statistics,
    /// The lobby this snapshot belongs to.
    pub lobby_id: LobbyId,
    /// The receiving participant's mark, absent for spectators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub your_mark: Option<Mark>,
}

/// Messages sent from the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Full snapshot after any mutation.
    RoomState(RoomSnapshot),
    /// Someone joined the lobby.
    PlayerJoined {
        /// The joiner's id.
        #[serde(rename = "playerId")]
        player_id: ParticipantId,
    },
    /// Human-readable problem report.
    ErrorMsg(String),
}

/// Messages sent by clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Create or join a lobby.
    JoinLobby {
        /// Non-empty lobby id.
        lobby_id: LobbyId,
        /// Preferred mark, honoured when free.
        mark: Option<Mark>,
    },
    /// Move intent. Range is checked by the room.
    MakeMove {
        /// Requested cell.
        index: i64,
    },
    /// Reset the board, keep statistics.
    NewGame,
    /// Reset statistics, keep the board.
    ResetStats,
}

/// Why a client frame could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ProtocolError {
    /// Not a `{event, data}` JSON object.
    #[display("Malformed frame: {}", _0)]
    Malformed(#[error(not(source))] String),

    /// Event name not recognised.
    #[display("Unknown event: {}", _0)]
    UnknownEvent(#[error(not(source))] String),

    /// `joinLobby` without a usable lobby id.
    #[display("Lobby ID is required")]
    MissingLobbyId,

    /// Payload did not match the event.
    #[display("Bad {} payload: {}", event, message)]
    BadPayload {
        /// Event name.
        event: String,
        /// Decoder message.
        message: String,
    },
}

#[derive(Deserialize)]
struct Frame {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Deserialize)]
struct MovePayload {
    index: i64,
}

impl ClientEvent {
    /// Decodes one text frame.
    #[instrument(level = "debug")]
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let frame: Frame =
            serde_json::from_str(text).map_err(|e| ProtocolError::Malformed(e.to_string()))?;

        match frame.event.as_str() {
            "joinLobby" => {
                // Joins never fail on shape: anything without a usable lobby id
                // is reported back, and an unreadable mark is just not requested.
                let lobby_id = frame
                    .data
                    .get("lobbyId")
                    .and_then(serde_json::Value::as_str)
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .ok_or(ProtocolError::MissingLobbyId)?
                    .to_string();
                let mark = frame
                    .data
                    .get("mark")
                    .and_then(serde_json::Value::as_str)
                    .and_then(|mark| mark.parse::<Mark>().ok());
                Ok(ClientEvent::JoinLobby { lobby_id, mark })
            }
            "makeMove" => {
                let MovePayload { index } = payload(&frame)?;
                Ok(ClientEvent::MakeMove { index })
            }
            "newGame" => Ok(ClientEvent::NewGame),
            "resetStats" => Ok(ClientEvent::ResetStats),
            other => Err(ProtocolError::UnknownEvent(other.to_string())),
        }
    }
}

fn payload<T: serde::de::DeserializeOwned>(frame: &Frame) -> Result<T, ProtocolError> {
    // A missing payload reads as an empty object so optional fields default.
    let data = match &frame.data {
        serde_json::Value::Null => serde_json::Value::Object(Default::default()),
        other => other.clone(),
    };
    serde_json::from_value(data).map_err(|e| ProtocolError::BadPayload {
        event: frame.event.clone(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_join() {
        let event = ClientEvent::decode(r#"{"event":"joinLobby","data":{"lobbyId":" den "}}"#).unwrap();
        assert_eq!(
            event,
            ClientEvent::JoinLobby {
                lobby_id: "den".into(),
                mark: None
            }
        );
    }

    #[test]
    fn test_decode_join_with_mark() {
        let event =
            ClientEvent::decode(r#"{"event":"joinLobby","data":{"lobbyId":"den","mark":"O"}}"#).unwrap();
        assert_eq!(
            event,
            ClientEvent::JoinLobby {
                lobby_id: "den".into(),
                mark: Some(Mark::O)
            }
        );
    }

    #[test]
    fn test_missing_lobby_id() {
        for text in [
            r#"{"event":"joinLobby","data":{}}"#,
            r#"{"event":"joinLobby"}"#,
            r#"{"event":"joinLobby","data":{"lobbyId":"   "}}"#,
        ] {
            assert_eq!(ClientEvent::decode(text), Err(ProtocolError::MissingLobbyId), "{text}");
        }
    }

    #[test]
    fn test_join_with_unusable_lobby_id() {
        for text in [
            r#"{"event":"joinLobby","data":{"lobbyId":42}}"#,
            r#"{"event":"joinLobby","data":"den"}"#,
            r#"{"event":"joinLobby","data":["den"]}"#,
        ] {
            assert_eq!(ClientEvent::decode(text), Err(ProtocolError::MissingLobbyId), "{text}");
        }
    }

    #[test]
    fn test_join_mark_is_lenient() {
        let lower = ClientEvent::decode(r#"{"event":"joinLobby","data":{"lobbyId":"den","mark":"o"}}"#);
        assert_eq!(
            lower,
            Ok(ClientEvent::JoinLobby {
                lobby_id: "den".into(),
                mark: Some(Mark::O)
            })
        );
        let junk = ClientEvent::decode(r#"{"event":"joinLobby","data":{"lobbyId":"den","mark":7}}"#);
        assert_eq!(
            junk,
            Ok(ClientEvent::JoinLobby {
                lobby_id: "den".into(),
                mark: None
            })
        );
    }

    #[test]
    fn test_non_integer_index_is_bad_payload() {
        let err = ClientEvent::decode(r#"{"event":"makeMove","data":{"index":"4"}}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::BadPayload { .. }));
        let err = ClientEvent::decode(r#"{"event":"makeMove","data":{"index":1.5}}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::BadPayload { .. }));
    }

    #[test]
    fn test_empty_payload_events() {
        assert_eq!(ClientEvent::decode(r#"{"event":"newGame","data":{}}"#), Ok(ClientEvent::NewGame));
        assert_eq!(ClientEvent::decode(r#"{"event":"resetStats"}"#), Ok(ClientEvent::ResetStats));
    }

    #[test]
    fn test_unknown_and_malformed() {
        assert!(matches!(
            ClientEvent::decode(r#"{"event":"chat","data":"hi"}"#),
            Err(ProtocolError::UnknownEvent(_))
        ));
        assert!(matches!(ClientEvent::decode("not json"), Err(ProtocolError::Malformed(_))));
    }

    #[test]
    fn test_server_event_encoding() {
        let joined = serde_json::to_value(ServerEvent::PlayerJoined {
            player_id: ParticipantId::from(7),
        })
        .unwrap();
        assert_eq!(joined, serde_json::json!({"event": "playerJoined", "data": {"playerId": 7}}));

        let error = serde_json::to_value(ServerEvent::ErrorMsg("Lobby is full".into())).unwrap();
        assert_eq!(error, serde_json::json!({"event": "errorMsg", "data": "Lobby is full"}));
    }

    #[test]
    fn test_snapshot_omits_missing_mark() {
        let snapshot = RoomSnapshot {
            board: Board::new(),
            current_mark: Mark::X,
            active: true,
            stats: Statistics::new(),
            lobby_id: "den".into(),
            your_mark: None,
        };
        let json = serde_json::to_value(ServerEvent::RoomState(snapshot)).unwrap();
        assert_eq!(json["event"], "roomState");
        assert_eq!(json["data"]["currentMark"], "X");
        assert_eq!(json["data"]["stats"]["totalGames"], 0);
        assert!(json["data"].get("yourMark").is_none());
    }
}
