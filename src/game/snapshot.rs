//! Snapshot building for network transmission

use crate::ws::protocol::{ArrowSnapshot, EnemySnapshot, GameSnapshot, PlayerSnapshot};

use super::entity::{Enemy, Player};
use super::RoomState;

/// Builds full-state snapshots; clients render each one without history
pub struct SnapshotBuilder;

impl SnapshotBuilder {
    pub fn build(state: &RoomState) -> GameSnapshot {
        let players = state
            .players
            .values()
            .map(|p| {
                (
                    p.id,
                    PlayerSnapshot {
                        id: p.id,
                        name: p.name.clone(),
                        x: p.x,
                        y: p.y,
                        size: Player::SIZE,
                        health: p.health,
                        max_health: Player::MAX_HEALTH,
                        score: p.score,
                        color: p.color.to_string(),
                        attacking: p.attacking,
                        defending: p.defending,
                        attack_cooldown: p.attack_cooldown,
                        bow_cooldown: p.bow_cooldown,
                        defend_cooldown: p.defend_cooldown,
                    },
                )
            })
            .collect();

        let enemies = state
            .enemies
            .iter()
            .map(|e| EnemySnapshot {
                id: e.id,
                x: e.x,
                y: e.y,
                size: Enemy::SIZE,
                health: e.health,
                max_health: Enemy::MAX_HEALTH,
            })
            .collect();

        let arrows = state
            .arrows
            .iter()
            .map(|a| ArrowSnapshot {
                id: a.id,
                player_id: a.owner,
                x: a.x,
                y: a.y,
                vx: a.vx,
                vy: a.vy,
            })
            .collect();

        GameSnapshot {
            players,
            enemies,
            obstacles: state.obstacles.clone(),
            arrows,
        }
    }
}
