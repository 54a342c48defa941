//! Noughts - networked and local tic-tac-toe.
//!
//! # Architecture
//!
//! - **Protocol**: JSON `{event, data}` frames exchanged over WebSocket
//! - **Room**: server-authoritative lobby sessions and mark assignment
//! - **Relay**: axum router bridging sockets to the room manager
//! - **Console**: terminal front end over [`noughts_engine::LocalSession`]
//! - **Duel**: computer-vs-computer series
//!
//! Game rules and computer strategies live in [`noughts_engine`].

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod console;
pub mod duel;
pub mod protocol;
pub mod relay;
pub mod room;

pub use config::{ConfigError, NoughtsConfig};
pub use protocol::{ClientEvent, LobbyId, ParticipantId, ProtocolError, RoomSnapshot, ServerEvent};
pub use relay::{dispatch, router, serve};
pub use room::{LobbySummary, Outbox, RoomManager, RoomSession};
