//! Enemy pursuit and contact damage

use std::collections::HashMap;

use super::arena::{Obstacle, ENEMY_CONTACT_DAMAGE};
use super::combat::CombatSystem;
use super::entity::{Enemy, Player};
use super::physics::{collides_any, direction, distance};
use super::{GameEvent, PlayerId};

/// Closest living player to the enemy, by center distance.
/// Ties go to the lower player id so the choice does not depend on map order.
pub fn nearest_living_player(enemy: &Enemy, players: &HashMap<PlayerId, Player>) -> Option<PlayerId> {
    let (ex, ey) = enemy.center();
    players
        .values()
        .filter(|p| p.is_alive())
        .map(|p| {
            let (px, py) = p.center();
            (distance(ex, ey, px, py), p.id)
        })
        .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
        .map(|(_, id)| id)
}

/// Run one AI step for every enemy.
///
/// Each enemy walks toward its nearest living player unless the step would
/// clip an obstacle, then drains health from that one player on contact.
pub fn update_enemies(
    enemies: &mut [Enemy],
    players: &mut HashMap<PlayerId, Player>,
    obstacles: &[Obstacle],
    events: &mut Vec<GameEvent>,
) {
    for enemy in enemies.iter_mut() {
        let Some(target_id) = nearest_living_player(enemy, players) else {
            continue;
        };
        let Some(target) = players.get_mut(&target_id) else {
            continue;
        };

        let (ex, ey) = enemy.center();
        let (px, py) = target.center();

        if let Some((dir_x, dir_y)) = direction(ex, ey, px, py) {
            let new_x = enemy.x + dir_x * Enemy::SPEED;
            let new_y = enemy.y + dir_y * Enemy::SPEED;
            if !collides_any(new_x, new_y, Enemy::SIZE, obstacles) {
                enemy.x = new_x;
                enemy.y = new_y;
            }
        }

        let (ex, ey) = enemy.center();
        let touching = distance(ex, ey, px, py) < (Enemy::SIZE + Player::SIZE) / 2.0;
        if !touching || target.defending {
            continue;
        }

        let (health, killed) = CombatSystem::apply_damage(target.health, ENEMY_CONTACT_DAMAGE);
        target.health = health;
        if killed {
            events.push(GameEvent::PlayerDied {
                player_id: target.id,
                score: target.score,
            });
        }
    }
}
