//! Entities owned by a room: players, enemies and arrows

use super::arena::{
    spawn_point, ENEMY_MAX_HEALTH, ENEMY_SIZE, ENEMY_SPEED, PLAYER_COLORS, PLAYER_MAX_HEALTH,
    PLAYER_SIZE, PLAYER_SPEED,
};
use super::PlayerId;

/// Player state in a room (authoritative)
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: &'static str,

    // Position (top-left corner)
    pub x: f32,
    pub y: f32,

    pub health: f32,
    pub score: u32,

    // Combat state, counted in ticks
    pub attacking: bool,
    pub attack_cooldown: u32,
    pub bow_cooldown: u32,
    pub defending: bool,
    pub defend_duration: u32,
    pub defend_cooldown: u32,
}

impl Player {
    /// Fresh player at the arena center; `join_index` picks the palette color
    pub fn new(id: PlayerId, name: String, join_index: usize) -> Self {
        let (x, y) = spawn_point();
        Self {
            id,
            name,
            color: PLAYER_COLORS[join_index % PLAYER_COLORS.len()],
            x,
            y,
            health: PLAYER_MAX_HEALTH,
            score: 0,
            attacking: false,
            attack_cooldown: 0,
            bow_cooldown: 0,
            defending: false,
            defend_duration: 0,
            defend_cooldown: 0,
        }
    }

    pub const SIZE: f32 = PLAYER_SIZE;
    pub const SPEED: f32 = PLAYER_SPEED;
    pub const MAX_HEALTH: f32 = PLAYER_MAX_HEALTH;

    pub fn center(&self) -> (f32, f32) {
        (self.x + Self::SIZE / 2.0, self.y + Self::SIZE / 2.0)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Count every running timer down by one tick
    pub fn tick_cooldowns(&mut self) {
        self.attack_cooldown = self.attack_cooldown.saturating_sub(1);
        if self.attack_cooldown == 0 {
            self.attacking = false;
        }

        self.bow_cooldown = self.bow_cooldown.saturating_sub(1);
        self.defend_cooldown = self.defend_cooldown.saturating_sub(1);

        if self.defend_duration > 0 {
            self.defend_duration -= 1;
            if self.defend_duration == 0 {
                self.defending = false;
            }
        }
    }
}

/// Hostile mob
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub health: f32,
}

impl Enemy {
    pub const SIZE: f32 = ENEMY_SIZE;
    pub const SPEED: f32 = ENEMY_SPEED;
    pub const MAX_HEALTH: f32 = ENEMY_MAX_HEALTH;

    pub fn new(id: u64, x: f32, y: f32) -> Self {
        Self {
            id,
            x,
            y,
            health: Self::MAX_HEALTH,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + Self::SIZE / 2.0, self.y + Self::SIZE / 2.0)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

/// Projectile fired from a bow
#[derive(Debug, Clone)]
pub struct Arrow {
    pub id: u64,
    /// Shooter, credited with any kill
    pub owner: PlayerId,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Total distance flown so far
    pub distance: f32,
}

impl Arrow {
    /// Move one tick along the velocity
    pub fn advance(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.distance += self.vx.hypot(self.vy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_player_creation() {
        let player = Player::new(Uuid::new_v4(), "Knight".to_string(), 0);
        assert_eq!((player.x, player.y), spawn_point());
        assert_eq!(player.health, 100.0);
        assert_eq!(player.score, 0);
        assert_eq!(player.color, PLAYER_COLORS[0]);
    }

    #[test]
    fn test_player_color_wraps() {
        let player = Player::new(Uuid::new_v4(), "Knight".to_string(), 9);
        assert_eq!(player.color, PLAYER_COLORS[1]);
    }

    #[test]
    fn test_cooldowns_clear_flags() {
        let mut player = Player::new(Uuid::new_v4(), "Knight".to_string(), 0);
        player.attacking = true;
        player.attack_cooldown = 1;
        player.defending = true;
        player.defend_duration = 2;
        player.defend_cooldown = 5;

        player.tick_cooldowns();
        assert!(!player.attacking);
        assert!(player.defending);

        player.tick_cooldowns();
        assert!(!player.defending);
        assert_eq!(player.defend_cooldown, 3);

        player.tick_cooldowns();
        assert_eq!(player.attack_cooldown, 0);
        assert_eq!(player.defend_cooldown, 2);
    }

    #[test]
    fn test_arrow_advance_accumulates_distance() {
        let mut arrow = Arrow {
            id: 1,
            owner: Uuid::nil(),
            x: 0.0,
            y: 0.0,
            vx: 3.0,
            vy: 4.0,
            distance: 0.0,
        };
        arrow.advance();
        arrow.advance();
        assert_eq!((arrow.x, arrow.y), (6.0, 8.0));
        assert!((arrow.distance - 10.0).abs() < 1e-5);
    }
}
