//! Registry of live rooms

use dashmap::DashMap;
use std::sync::Arc;

use crate::game::{Room, RoomId};
use crate::ws::protocol::RoomInfo;

/// Every room that is currently running
pub struct RoomRegistry {
    rooms: DashMap<RoomId, Arc<Room>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    pub fn get(&self, id: &RoomId) -> Option<Arc<Room>> {
        self.rooms.get(id).map(|r| r.value().clone())
    }

    pub fn insert(&self, room: Arc<Room>) {
        self.rooms.insert(room.id, room);
    }

    pub fn remove(&self, id: &RoomId) -> Option<Arc<Room>> {
        self.rooms.remove(id).map(|(_, room)| room)
    }

    pub fn contains(&self, id: &RoomId) -> bool {
        self.rooms.contains_key(id)
    }

    pub fn active_rooms(&self) -> usize {
        self.rooms.len()
    }

    pub fn total_players(&self) -> usize {
        self.rooms.iter().map(|r| r.value().occupancy()).sum()
    }

    /// Lobby view of every room
    pub fn list(&self) -> Vec<RoomInfo> {
        let mut rooms: Vec<RoomInfo> = self
            .rooms
            .iter()
            .map(|entry| {
                let room = entry.value();
                RoomInfo {
                    id: room.id,
                    name: room.name.clone(),
                    players: room.occupancy(),
                }
            })
            .collect();
        rooms.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        rooms
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
