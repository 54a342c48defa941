//! Server-authoritative lobby sessions.
//!
//! One [`RoomSession`] per lobby id, created on first join. Which lobby a
//! connection belongs to lives in the manager's membership map rather than
//! on the connection. Each room has its own lock, so requests for a lobby
//! are applied in arrival order and a losing concurrent move simply fails
//! the legality check, while other lobbies are unaffected.

use crate::protocol::{LobbyId, ParticipantId, RoomSnapshot, ServerEvent};
use chrono::{DateTime, Utc};
use noughts_engine::{Mark, Table};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Channel the relay drains into a participant's socket.
pub type Outbox = mpsc::UnboundedSender<ServerEvent>;

/// Default wait before an empty lobby is dropped.
pub const DEFAULT_DISPOSAL_GRACE: Duration = Duration::from_secs(60);

/// Message sent to a joiner who gets no playing mark.
pub const LOBBY_FULL: &str = "Lobby is full: you are watching this game";

#[derive(Debug)]
struct Participant {
    mark: Option<Mark>,
    outbox: Outbox,
}

/// State of one lobby.
#[derive(Debug)]
pub struct RoomSession {
    lobby_id: LobbyId,
    table: Table,
    participants: BTreeMap<ParticipantId, Participant>,
    created_at: DateTime<Utc>,
    /// Set while empty; a join clears it and cancels the pending disposal.
    disposal: Option<u64>,
}

impl RoomSession {
    #[instrument]
    fn new(lobby_id: LobbyId) -> Self {
        info!(lobby_id = %lobby_id, "Creating room session");
        Self {
            lobby_id,
            table: Table::new(),
            participants: BTreeMap::new(),
            created_at: Utc::now(),
            disposal: None,
        }
    }

    /// Marks held by participants.
    pub fn participant_marks(&self) -> impl Iterator<Item = (ParticipantId, Mark)> + '_ {
        self.participants
            .iter()
            .filter_map(|(id, p)| p.mark.map(|mark| (*id, mark)))
    }

    fn free_mark(&self, requested: Option<Mark>) -> Option<Mark> {
        let taken = |mark: Mark| self.participants.values().any(|p| p.mark == Some(mark));
        requested
            .into_iter()
            .chain([Mark::X, Mark::O])
            .find(|mark| !taken(*mark))
    }

    fn snapshot_for(&self, your_mark: Option<Mark>) -> RoomSnapshot {
        let game = self.table.game();
        RoomSnapshot {
            board: *game.board(),
            current_mark: game.current_mark(),
            active: game.is_active(),
            stats: *self.table.stats(),
            lobby_id: self.lobby_id.clone(),
            your_mark,
        }
    }

    fn snapshot_of(&self, participant: ParticipantId) -> RoomSnapshot {
        self.snapshot_for(self.participants.get(&participant).and_then(|p| p.mark))
    }

    /// Sends everyone their own view. Delivery failures are ignored.
    fn broadcast_state(&self) {
        for participant in self.participants.values() {
            let _ = participant
                .outbox
                .send(ServerEvent::RoomState(self.snapshot_for(participant.mark)));
        }
    }

    fn notify_others(&self, except: ParticipantId, event: &ServerEvent) {
        for (_, participant) in self.participants.iter().filter(|(id, _)| **id != except) {
            let _ = participant.outbox.send(event.clone());
        }
    }
}

/// Summary of a lobby for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbySummary {
    /// Lobby id.
    pub lobby_id: LobbyId,
    /// Connected participants, spectators included.
    pub participants: usize,
    /// Whether a mover slot is still open.
    pub open_seat: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

type SharedRoom = Arc<Mutex<RoomSession>>;

fn lock_room(room: &SharedRoom) -> MutexGuard<'_, RoomSession> {
    room.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Lobby index and memberships.
///
/// Lock order is always registry first, then a room. Game mutations take
/// only the room lock, so separate lobbies proceed in parallel.
#[derive(Debug, Default)]
struct Registry {
    rooms: HashMap<LobbyId, SharedRoom>,
    memberships: HashMap<ParticipantId, LobbyId>,
    next_generation: u64,
}

impl Registry {
    fn room_of(&self, participant: ParticipantId) -> Option<SharedRoom> {
        let lobby_id = self.memberships.get(&participant)?;
        self.rooms.get(lobby_id).cloned()
    }

    /// Removes the participant. Returns the lobby and generation to dispose
    /// if the lobby became empty.
    fn remove(&mut self, participant: ParticipantId) -> Option<(LobbyId, u64)> {
        let lobby_id = self.memberships.remove(&participant)?;
        let shared = self.rooms.get(&lobby_id)?.clone();
        let mut room = lock_room(&shared);
        room.participants.remove(&participant);
        info!(
            lobby_id = %lobby_id,
            %participant,
            remaining = room.participants.len(),
            "Participant left"
        );
        if !room.participants.is_empty() {
            return None;
        }
        self.next_generation += 1;
        let generation = self.next_generation;
        room.disposal = Some(generation);
        Some((lobby_id, generation))
    }
}

/// Owns every lobby on the server.
#[derive(Debug, Clone)]
pub struct RoomManager {
    registry: Arc<Mutex<Registry>>,
    disposal_grace: Duration,
}

impl RoomManager {
    /// Creates a manager with the default 60 second disposal grace period.
    pub fn new() -> Self {
        Self::with_grace(DEFAULT_DISPOSAL_GRACE)
    }

    /// Creates a manager with a custom disposal grace period.
    #[instrument]
    pub fn with_grace(disposal_grace: Duration) -> Self {
        info!(?disposal_grace, "Creating room manager");
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
            disposal_grace,
        }
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The participant's current room, looked up without holding the
    /// registry lock afterwards.
    fn room_of(&self, participant: ParticipantId) -> Option<SharedRoom> {
        self.registry().room_of(participant)
    }

    /// Creates the lobby if needed and adds the participant.
    ///
    /// Joining is idempotent per participant: a repeat join keeps the mark
    /// already held. A participant in another lobby leaves it first. The
    /// first two participants get X then O (or `requested` if free); later
    /// joiners receive broadcasts but hold no mark and are told so.
    #[instrument(skip(self, outbox))]
    pub fn join_lobby(
        &self,
        lobby_id: &str,
        participant: ParticipantId,
        outbox: Outbox,
        requested: Option<Mark>,
    ) -> RoomSnapshot {
        let mut registry = self.registry();

        let vacated = if registry
            .memberships
            .get(&participant)
            .is_some_and(|current| current != lobby_id)
        {
            registry.remove(participant)
        } else {
            None
        };

        let shared = registry
            .rooms
            .entry(lobby_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(RoomSession::new(lobby_id.to_string()))))
            .clone();
        let mut room = lock_room(&shared);
        if room.disposal.take().is_some() {
            info!(lobby_id, "Rejoin cancelled pending disposal");
        }

        let mark = match room.participants.get_mut(&participant) {
            Some(existing) => {
                debug!(%participant, mark = ?existing.mark, "Repeat join");
                existing.outbox = outbox;
                existing.mark
            }
            None => {
                let mark = room.free_mark(requested);
                match mark {
                    Some(mark) => info!(lobby_id, %participant, %mark, "Assigned mark"),
                    None => {
                        warn!(lobby_id, %participant, "Lobby already has two players; joining without a mark");
                        let _ = outbox.send(ServerEvent::ErrorMsg(LOBBY_FULL.to_string()));
                    }
                }
                room.participants.insert(participant, Participant { mark, outbox });
                room.notify_others(participant, &ServerEvent::PlayerJoined { player_id: participant });
                mark
            }
        };

        room.broadcast_state();
        let snapshot = room.snapshot_for(mark);
        drop(room);
        registry.memberships.insert(participant, lobby_id.to_string());
        drop(registry);

        if let Some((old, generation)) = vacated {
            self.schedule_disposal(old, generation);
        }
        snapshot
    }

    /// Applies a move for the participant's mark.
    ///
    /// Returns `None` (and changes nothing) when the participant is in no
    /// lobby, holds no mark, the index is outside 0-8, the cell is taken,
    /// it is not their turn, or the game is over.
    #[instrument(skip(self))]
    pub fn make_move(&self, participant: ParticipantId, index: i64) -> Option<RoomSnapshot> {
        let Some(shared) = self.room_of(participant) else {
            debug!(%participant, "Move from participant outside any lobby");
            return None;
        };
        let mut room = lock_room(&shared);
        let Some(mark) = room.participants.get(&participant).and_then(|p| p.mark) else {
            debug!(%participant, "Move from participant without a mark");
            return None;
        };
        let Ok(cell) = usize::try_from(index) else {
            debug!(index, "Negative move index");
            return None;
        };
        if let Err(e) = room.table.apply_move(cell, Some(mark)) {
            debug!(lobby_id = %room.lobby_id, %mark, index, error = %e, "Ignoring move");
            return None;
        }

        room.broadcast_state();
        Some(room.snapshot_of(participant))
    }

    /// Resets the board of the participant's lobby, keeping statistics.
    #[instrument(skip(self))]
    pub fn new_game(&self, participant: ParticipantId) -> Option<RoomSnapshot> {
        let shared = self.room_of(participant)?;
        let mut room = lock_room(&shared);
        if !room.participants.contains_key(&participant) {
            return None;
        }
        info!(lobby_id = %room.lobby_id, %participant, "New game requested");
        room.table.new_game();
        room.broadcast_state();
        Some(room.snapshot_of(participant))
    }

    /// Zeroes the statistics of the participant's lobby.
    ///
    /// Any participant may do this, spectators included.
    #[instrument(skip(self))]
    pub fn reset_stats(&self, participant: ParticipantId) -> Option<RoomSnapshot> {
        let shared = self.room_of(participant)?;
        let mut room = lock_room(&shared);
        if !room.participants.contains_key(&participant) {
            return None;
        }
        info!(lobby_id = %room.lobby_id, %participant, "Statistics reset requested");
        room.table.reset_stats();
        room.broadcast_state();
        Some(room.snapshot_of(participant))
    }

    /// Removes the participant from its lobby.
    ///
    /// When the lobby empties, it is dropped after the grace period unless
    /// someone joins in the meantime.
    #[instrument(skip(self))]
    pub fn leave(&self, participant: ParticipantId) {
        let vacated = self.registry().remove(participant);
        if let Some((lobby_id, generation)) = vacated {
            self.schedule_disposal(lobby_id, generation);
        }
    }

    fn schedule_disposal(&self, lobby_id: LobbyId, generation: u64) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                debug!(lobby_id = %lobby_id, grace = ?self.disposal_grace, "Scheduling disposal");
                let manager = self.clone();
                handle.spawn(async move {
                    tokio::time::sleep(manager.disposal_grace).await;
                    manager.dispose_if_idle(&lobby_id, generation);
                });
            }
            Err(_) => {
                warn!(lobby_id = %lobby_id, "No async runtime; disposing immediately");
                self.dispose_if_idle(&lobby_id, generation);
            }
        }
    }

    /// Drops the lobby if it is still empty under the same disposal stamp.
    fn dispose_if_idle(&self, lobby_id: &str, generation: u64) {
        let mut registry = self.registry();
        let idle = registry.rooms.get(lobby_id).is_some_and(|shared| {
            let room = lock_room(shared);
            room.disposal == Some(generation) && room.participants.is_empty()
        });
        if idle && let Some(shared) = registry.rooms.remove(lobby_id) {
            let room = lock_room(&shared);
            let lifetime = Utc::now() - room.created_at;
            info!(
                lobby_id,
                lifetime_secs = lifetime.num_seconds(),
                games = room.table.stats().total_games(),
                "Disposed room session"
            );
        }
    }

    /// Snapshot of a lobby as seen by `viewer` (or by a spectator).
    pub fn snapshot(&self, lobby_id: &str, viewer: Option<ParticipantId>) -> Option<RoomSnapshot> {
        let shared = self.registry().rooms.get(lobby_id).cloned()?;
        let room = lock_room(&shared);
        let snapshot = match viewer {
            Some(id) => room.snapshot_of(id),
            None => room.snapshot_for(None),
        };
        Some(snapshot)
    }

    /// Mark held by a participant.
    pub fn mark_of(&self, participant: ParticipantId) -> Option<Mark> {
        let shared = self.room_of(participant)?;
        let room = lock_room(&shared);
        room.participants.get(&participant).and_then(|p| p.mark)
    }

    /// Number of live lobbies, including ones awaiting disposal.
    pub fn lobby_count(&self) -> usize {
        self.registry().rooms.len()
    }

    /// All lobbies, sorted by id.
    pub fn lobbies(&self) -> Vec<LobbySummary> {
        let registry = self.registry();
        let mut lobbies: Vec<_> = registry
            .rooms
            .values()
            .map(|shared| {
                let room = lock_room(shared);
                LobbySummary {
                    lobby_id: room.lobby_id.clone(),
                    participants: room.participants.len(),
                    open_seat: room.participant_marks().count() < 2,
                    created_at: room.created_at,
                }
            })
            .collect();
        lobbies.sort_by(|a, b| a.lobby_id.cmp(&b.lobby_id));
        lobbies
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new()
    }
}
