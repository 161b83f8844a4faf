//! WebSocket protocol message definitions
//! These are the wire types for client-server communication

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::arena::Obstacle;

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMsg {
    /// Change the display name used for future room joins
    SetPlayerName { name: String },

    /// Create a new room (the creator is not joined automatically)
    CreateRoom { name: String },

    /// Request the current room list
    GetRooms,

    /// Join an existing room, leaving any current one.
    /// The id stays raw so a malformed one can be answered like an unknown one.
    #[serde(rename_all = "camelCase")]
    JoinRoom { room_id: String },

    /// Leave the current room
    LeaveRoom,

    /// Combined movement/attack input for the current frame
    #[serde(rename_all = "camelCase")]
    PlayerInput {
        /// Identifiers of every key currently held
        #[serde(default)]
        keys: HashSet<String>,
        /// Aim point in world coordinates
        #[serde(default)]
        mouse_x: f32,
        #[serde(default)]
        mouse_y: f32,
    },
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMsg {
    /// Welcome message after connection
    #[serde(rename_all = "camelCase")]
    Welcome { player_id: Uuid },

    #[serde(rename_all = "camelCase")]
    RoomCreated { room_id: Uuid, room_name: String },

    #[serde(rename_all = "camelCase")]
    RoomJoined { room_id: Uuid },

    RoomsList { rooms: Vec<RoomInfo> },

    /// Full room state, sent every tick
    GameState(GameSnapshot),

    /// Cosmetic hit effect at an enemy's center
    EnemyHit { x: f32, y: f32 },

    #[serde(rename_all = "camelCase")]
    PlayerDied { player_id: Uuid, score: u32 },

    /// Rejected request
    Error { message: String },
}

/// Lobby entry for a live room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomInfo {
    pub id: Uuid,
    pub name: String,
    /// Current occupancy
    pub players: usize,
}

/// Everything a client needs to render one room frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub players: HashMap<Uuid, PlayerSnapshot>,
    pub enemies: Vec<EnemySnapshot>,
    pub obstacles: Vec<Obstacle>,
    pub arrows: Vec<ArrowSnapshot>,
}

/// Player state in a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub id: Uuid,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub health: f32,
    pub max_health: f32,
    pub score: u32,
    pub color: String,
    pub attacking: bool,
    pub defending: bool,
    /// Ticks until melee is ready (0 = ready)
    pub attack_cooldown: u32,
    pub bow_cooldown: u32,
    pub defend_cooldown: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemySnapshot {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub health: f32,
    pub max_health: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowSnapshot {
    pub id: u64,
    pub player_id: Uuid,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}
