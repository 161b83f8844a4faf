//! Arena dimensions, entity tuning and the static obstacle layout

use serde::{Deserialize, Serialize};

pub const ARENA_WIDTH: f32 = 3000.0;
pub const ARENA_HEIGHT: f32 = 2500.0;

pub const PLAYER_SIZE: f32 = 35.0;
pub const PLAYER_SPEED: f32 = 5.0;
pub const PLAYER_MAX_HEALTH: f32 = 100.0;

pub const ENEMY_SIZE: f32 = 30.0;
pub const ENEMY_SPEED: f32 = 2.0;
pub const ENEMY_MAX_HEALTH: f32 = 50.0;
/// Health drained per tick while an enemy touches an undefended player
pub const ENEMY_CONTACT_DAMAGE: f32 = 0.08;

/// Score granted for each enemy kill
pub const KILL_REWARD: u32 = 10;

/// Display colors handed out by join order
pub const PLAYER_COLORS: [&str; 8] = [
    "#4169e1", "#228b22", "#dc143c", "#ff8c00", "#9370db", "#20b2aa", "#ff69b4", "#ffd700",
];

/// Margin kept clear of the arena edge when sampling spawn points
pub const SPAWN_MARGIN: f32 = 100.0;
pub const SPAWN_ATTEMPTS: usize = 50;
pub const RESPAWN_BASE: usize = 15;
pub const RESPAWN_PER_PLAYER: usize = 2;
pub const RESPAWN_CHANCE: f64 = 0.02;

const LAYOUT_OFFSET_X: f32 = 500.0;
const LAYOUT_OFFSET_Y: f32 = 250.0;

/// Obstacle material, used by clients to pick a sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    Wood,
    Tower,
}

/// Static collidable rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(rename = "type")]
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub const fn new(x: f32, y: f32, width: f32, height: f32, kind: ObstacleKind) -> Self {
        Self {
            x,
            y,
            width,
            height,
            kind,
        }
    }
}

/// Canonical room layout: four boundary walls around five towers
pub fn default_layout() -> Vec<Obstacle> {
    let ox = LAYOUT_OFFSET_X;
    let oy = LAYOUT_OFFSET_Y;
    vec![
        // Walls
        Obstacle::new(ox - 100.0, oy - 100.0, 2100.0, 60.0, ObstacleKind::Wood),
        Obstacle::new(ox - 100.0, oy - 100.0, 60.0, 1700.0, ObstacleKind::Wood),
        Obstacle::new(ox + 2040.0, oy - 100.0, 60.0, 1700.0, ObstacleKind::Wood),
        Obstacle::new(ox - 100.0, oy + 1540.0, 2100.0, 60.0, ObstacleKind::Wood),
        // Corner towers
        Obstacle::new(ox + 100.0, oy + 100.0, 120.0, 120.0, ObstacleKind::Tower),
        Obstacle::new(ox + 1780.0, oy + 100.0, 120.0, 120.0, ObstacleKind::Tower),
        Obstacle::new(ox + 100.0, oy + 1280.0, 120.0, 120.0, ObstacleKind::Tower),
        Obstacle::new(ox + 1780.0, oy + 1280.0, 120.0, 120.0, ObstacleKind::Tower),
        // Keep
        Obstacle::new(ox + 850.0, oy + 600.0, 300.0, 300.0, ObstacleKind::Tower),
    ]
}

/// Where new players appear
pub fn spawn_point() -> (f32, f32) {
    (ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0)
}
