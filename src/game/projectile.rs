//! Arrow flight, range limit and hit detection

use std::collections::HashMap;

use super::arena::{Obstacle, KILL_REWARD};
use super::combat::{CombatSystem, ARROW_DAMAGE, ARROW_SIZE, BOW_RANGE};
use super::entity::{Arrow, Enemy, Player};
use super::physics::{collides_any, distance};
use super::{GameEvent, PlayerId};

/// Advance every arrow by one tick.
///
/// Arrows are visited in list order. An arrow that hits an obstacle or flies
/// past the bow's range is dropped without testing enemies. Otherwise it
/// strikes the first living enemy (in list order) whose center is within half
/// an enemy size, and is consumed by that hit. Dead enemies and spent arrows
/// are compacted out once, after the pass.
pub fn update_arrows(
    arrows: &mut Vec<Arrow>,
    enemies: &mut Vec<Enemy>,
    players: &mut HashMap<PlayerId, Player>,
    obstacles: &[Obstacle],
    events: &mut Vec<GameEvent>,
) {
    arrows.retain_mut(|arrow| {
        arrow.advance();

        if collides_any(arrow.x, arrow.y, ARROW_SIZE, obstacles) || arrow.distance > BOW_RANGE {
            return false;
        }

        let Some(enemy) = enemies.iter_mut().find(|enemy| {
            let (ex, ey) = enemy.center();
            enemy.is_alive() && distance(ex, ey, arrow.x, arrow.y) < Enemy::SIZE / 2.0
        }) else {
            return true;
        };

        let (health, killed) = CombatSystem::apply_damage(enemy.health, ARROW_DAMAGE);
        enemy.health = health;

        let (ex, ey) = enemy.center();
        events.push(GameEvent::EnemyHit { x: ex, y: ey });

        if killed {
            // shooter may have left the room while the arrow was in flight
            if let Some(shooter) = players.get_mut(&arrow.owner) {
                shooter.score += KILL_REWARD;
            }
        }

        false
    });

    enemies.retain(Enemy::is_alive);
}
