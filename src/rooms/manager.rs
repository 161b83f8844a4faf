//! Room manager - creates rooms, tracks which room each player is in,
//! and tears rooms down when their last player leaves

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::Config;
use crate::game::{InputFrame, PlayerId, Room, RoomId};
use crate::ws::protocol::{RoomInfo, ServerMsg};

use super::registry::RoomRegistry;

pub const PLAYER_NAME_MAX_CHARS: usize = 15;
pub const ROOM_NAME_MAX_CHARS: usize = 20;
pub const DEFAULT_PLAYER_NAME: &str = "Knight";

/// Rejections surfaced to the requesting client
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    #[error("Room not found")]
    RoomNotFound,

    #[error("Room is full")]
    RoomFull,
}

/// A connected player's identity and current room
#[derive(Debug, Clone)]
struct Membership {
    name: String,
    room: Option<RoomId>,
}

impl Default for Membership {
    fn default() -> Self {
        Self {
            name: DEFAULT_PLAYER_NAME.to_string(),
            room: None,
        }
    }
}

/// Room manager
pub struct RoomManager {
    registry: Arc<RoomRegistry>,
    /// Membership changes are serialized through this lock
    members: Mutex<HashMap<PlayerId, Membership>>,
    /// Room list pushes for every connected client
    lobby_tx: broadcast::Sender<ServerMsg>,
    max_room_players: usize,
    initial_enemies: usize,
}

impl RoomManager {
    pub fn new(max_room_players: usize, initial_enemies: usize) -> Self {
        let (lobby_tx, _) = broadcast::channel(64);
        Self {
            registry: Arc::new(RoomRegistry::new()),
            members: Mutex::new(HashMap::new()),
            lobby_tx,
            max_room_players,
            initial_enemies,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_room_players, config.initial_enemies)
    }

    pub fn registry(&self) -> &Arc<RoomRegistry> {
        &self.registry
    }

    /// Register a new connection under the default name
    pub fn connect(&self, player_id: PlayerId) {
        self.members.lock().entry(player_id).or_default();
        debug!(player_id = %player_id, "Player registered");
    }

    /// Leave any room and forget the player entirely
    pub fn disconnect(&self, player_id: PlayerId) {
        let mut members = self.members.lock();
        if let Some(mut membership) = members.remove(&player_id) {
            self.vacate(player_id, &mut membership);
        }
        debug!(player_id = %player_id, "Player unregistered");
    }

    pub fn set_player_name(&self, player_id: PlayerId, name: &str) {
        let mut members = self.members.lock();
        let membership = members.entry(player_id).or_default();
        membership.name = truncate_chars(name, PLAYER_NAME_MAX_CHARS);
    }

    pub fn player_name(&self, player_id: &PlayerId) -> Option<String> {
        self.members.lock().get(player_id).map(|m| m.name.clone())
    }

    pub fn current_room_id(&self, player_id: &PlayerId) -> Option<RoomId> {
        self.members.lock().get(player_id).and_then(|m| m.room)
    }

    /// Create and start a room. Returns its id and the stored (truncated) name.
    pub fn create_room(&self, name: &str) -> (RoomId, String) {
        let name = truncate_chars(name, ROOM_NAME_MAX_CHARS);

        let mut id = Uuid::new_v4();
        while self.registry.contains(&id) {
            id = Uuid::new_v4();
        }

        let room = Room::new(id, name.clone(), rand::random::<u64>(), self.initial_enemies);
        self.registry.insert(room.clone());
        room.start();

        info!(room_id = %id, name = %name, "Created new room");
        (id, name)
    }

    pub fn list_rooms(&self) -> Vec<RoomInfo> {
        self.registry.list()
    }

    /// Move a player into a room, leaving their current one first.
    /// A full or unknown room leaves everything untouched.
    pub fn join_room(&self, player_id: PlayerId, room_id: RoomId) -> Result<Arc<Room>, RoomError> {
        let mut members = self.members.lock();
        let membership = members.entry(player_id).or_default();

        let room = self.registry.get(&room_id).ok_or(RoomError::RoomNotFound)?;

        if membership.room == Some(room_id) {
            return Ok(room);
        }

        if room.occupancy() >= self.max_room_players {
            debug!(room_id = %room_id, player_id = %player_id, "Join rejected, room full");
            return Err(RoomError::RoomFull);
        }

        self.vacate(player_id, membership);

        let name = membership.name.clone();
        let occupancy = room.with_state(|state| {
            state.add_player(player_id, name);
            state.occupancy()
        });
        membership.room = Some(room_id);

        info!(
            room_id = %room_id,
            player_id = %player_id,
            player_count = occupancy,
            "Player joined room"
        );

        Ok(room)
    }

    /// Leave the current room; no-op when the player is not in one
    pub fn leave_room(&self, player_id: PlayerId) {
        let mut members = self.members.lock();
        if let Some(membership) = members.get_mut(&player_id) {
            self.vacate(player_id, membership);
        }
    }

    /// Route an input frame to the player's room. Stale input is dropped.
    pub fn handle_input(&self, player_id: PlayerId, input: &InputFrame) {
        let Some(room_id) = self.current_room_id(&player_id) else {
            return;
        };
        if let Some(room) = self.registry.get(&room_id) {
            room.handle_input(&player_id, input);
        }
    }

    pub fn subscribe_lobby(&self) -> broadcast::Receiver<ServerMsg> {
        self.lobby_tx.subscribe()
    }

    /// Push the current room list to every connected client
    pub fn broadcast_rooms(&self) {
        let _ = self.lobby_tx.send(ServerMsg::RoomsList {
            rooms: self.list_rooms(),
        });
    }

    /// Remove the player from their room, deleting the room once empty.
    /// Callers hold the members lock.
    fn vacate(&self, player_id: PlayerId, membership: &mut Membership) {
        let Some(room_id) = membership.room.take() else {
            return;
        };
        let Some(room) = self.registry.get(&room_id) else {
            return;
        };

        let remaining = room.with_state(|state| {
            state.remove_player(&player_id);
            state.occupancy()
        });

        info!(room_id = %room_id, player_id = %player_id, "Player left room");

        if remaining == 0 {
            room.stop();
            self.registry.remove(&room_id);
            info!(room_id = %room_id, "Room empty, removed");
        }
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
