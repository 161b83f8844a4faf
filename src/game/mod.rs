//! Game simulation modules

pub mod ai;
pub mod arena;
pub mod combat;
pub mod entity;
pub mod physics;
pub mod projectile;
pub mod room;
pub mod snapshot;

pub use room::{Room, RoomMessage, RoomState};

use uuid::Uuid;

pub type PlayerId = Uuid;
pub type RoomId = Uuid;

/// Discrete outcome of a tick or an input frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// An enemy took damage; carries the enemy's center
    EnemyHit { x: f32, y: f32 },
    /// A player's health reached zero
    PlayerDied { player_id: PlayerId, score: u32 },
}

/// Decoded player input for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputFrame {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub melee: bool,
    pub bow: bool,
    pub defend: bool,
    pub aim_x: f32,
    pub aim_y: f32,
}

impl InputFrame {
    /// Build a frame from the identifiers of held keys (case-insensitive)
    pub fn from_keys<I, S>(keys: I, aim_x: f32, aim_y: f32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut frame = Self {
            aim_x,
            aim_y,
            ..Self::default()
        };

        for key in keys {
            match key.as_ref().to_ascii_lowercase().as_str() {
                "w" | "arrowup" => frame.up = true,
                "s" | "arrowdown" => frame.down = true,
                "a" | "arrowleft" => frame.left = true,
                "d" | "arrowright" => frame.right = true,
                " " | "space" => frame.melee = true,
                "e" => frame.bow = true,
                "q" => frame.defend = true,
                _ => {}
            }
        }

        frame
    }

    /// Per-axis step direction, each component in {-1, 0, 1}
    pub fn movement(&self) -> (f32, f32) {
        let axis = |neg: bool, pos: bool| match (neg, pos) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        (axis(self.left, self.right), axis(self.up, self.down))
    }
}
