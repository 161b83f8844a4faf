//! Combat system - input-driven movement, melee, bow and defend

use super::arena::{Obstacle, KILL_REWARD};
use super::entity::{Arrow, Enemy, Player};
use super::physics::{clamp_to_arena, collides_any, direction, distance};
use super::{GameEvent, InputFrame};

pub const MELEE_RANGE: f32 = 65.0;
pub const MELEE_DAMAGE: f32 = 35.0;
pub const ATTACK_COOLDOWN_TICKS: u32 = 20;

pub const BOW_RANGE: f32 = 250.0;
pub const BOW_COOLDOWN_TICKS: u32 = 30;
pub const ARROW_SPEED: f32 = 12.0;
pub const ARROW_DAMAGE: f32 = 25.0;
/// Side of the box used for arrow vs obstacle tests
pub const ARROW_SIZE: f32 = 5.0;

pub const DEFEND_DURATION_TICKS: u32 = 30;
pub const DEFEND_COOLDOWN_TICKS: u32 = 60;

/// Combat system for resolving player actions
pub struct CombatSystem;

impl CombatSystem {
    /// Apply damage to health, returns (new_health, is_dead)
    pub fn apply_damage(current_health: f32, damage: f32) -> (f32, bool) {
        let new_health = (current_health - damage).max(0.0);
        (new_health, new_health <= 0.0)
    }

    /// Resolve one input frame for a living player.
    /// Newly fired arrows are appended to `arrows`; `next_id` supplies their ids.
    pub fn resolve_input(
        player: &mut Player,
        input: &InputFrame,
        enemies: &mut Vec<Enemy>,
        arrows: &mut Vec<Arrow>,
        obstacles: &[Obstacle],
        next_id: &mut u64,
        events: &mut Vec<GameEvent>,
    ) {
        if !player.is_alive() {
            return;
        }

        Self::move_player(player, input, obstacles);

        if input.melee {
            Self::melee(player, enemies, events);
        }

        if input.bow {
            if let Some(arrow) = Self::fire_bow(player, input.aim_x, input.aim_y, *next_id) {
                *next_id += 1;
                arrows.push(arrow);
            }
        }

        if input.defend {
            Self::defend(player);
        }
    }

    /// Step the player along the held direction keys.
    /// The whole move is rejected if the destination hits an obstacle.
    pub fn move_player(player: &mut Player, input: &InputFrame, obstacles: &[Obstacle]) -> bool {
        let (dx, dy) = input.movement();
        if dx == 0.0 && dy == 0.0 {
            return false;
        }

        let (new_x, new_y) = clamp_to_arena(
            player.x + dx * Player::SPEED,
            player.y + dy * Player::SPEED,
            Player::SIZE,
        );

        if collides_any(new_x, new_y, Player::SIZE, obstacles) {
            return false;
        }

        player.x = new_x;
        player.y = new_y;
        true
    }

    /// Swing at every enemy in range. Returns false if the swing is still cooling down.
    pub fn melee(player: &mut Player, enemies: &mut Vec<Enemy>, events: &mut Vec<GameEvent>) -> bool {
        if player.attack_cooldown > 0 {
            return false;
        }

        player.attacking = true;
        player.attack_cooldown = ATTACK_COOLDOWN_TICKS;

        let (px, py) = player.center();
        for enemy in enemies.iter_mut() {
            let (ex, ey) = enemy.center();
            if distance(px, py, ex, ey) >= MELEE_RANGE {
                continue;
            }

            let (health, killed) = Self::apply_damage(enemy.health, MELEE_DAMAGE);
            enemy.health = health;
            events.push(GameEvent::EnemyHit { x: ex, y: ey });

            if killed {
                player.score += KILL_REWARD;
            }
        }

        enemies.retain(Enemy::is_alive);
        true
    }

    /// Loose an arrow from the player's center toward the aim point.
    /// The cooldown is spent even when the aim point sits exactly on the center.
    pub fn fire_bow(player: &mut Player, aim_x: f32, aim_y: f32, arrow_id: u64) -> Option<Arrow> {
        if player.bow_cooldown > 0 {
            return None;
        }
        player.bow_cooldown = BOW_COOLDOWN_TICKS;

        let (px, py) = player.center();
        let (dir_x, dir_y) = direction(px, py, aim_x, aim_y)?;

        Some(Arrow {
            id: arrow_id,
            owner: player.id,
            x: px,
            y: py,
            vx: dir_x * ARROW_SPEED,
            vy: dir_y * ARROW_SPEED,
            distance: 0.0,
        })
    }

    /// Raise the shield if it is off cooldown
    pub fn defend(player: &mut Player) -> bool {
        if player.defend_cooldown > 0 || player.defending {
            return false;
        }
        player.defending = true;
        player.defend_duration = DEFEND_DURATION_TICKS;
        player.defend_cooldown = DEFEND_COOLDOWN_TICKS;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::arena::{default_layout, ObstacleKind};
    use uuid::Uuid;

    fn player() -> Player {
        Player::new(Uuid::new_v4(), "Knight".to_string(), 0)
    }

    /// Enemy whose center sits `offset` units right of the player's center
    fn enemy_right_of(player: &Player, id: u64, offset: f32) -> Enemy {
        let (px, py) = player.center();
        Enemy::new(id, px + offset - Enemy::SIZE / 2.0, py - Enemy::SIZE / 2.0)
    }

    fn frame(keys: &[&str]) -> InputFrame {
        InputFrame::from_keys(keys.iter().copied(), 0.0, 0.0)
    }

    #[test]
    fn test_apply_damage_clamps() {
        assert_eq!(CombatSystem::apply_damage(10.0, 4.0), (6.0, false));
        assert_eq!(CombatSystem::apply_damage(10.0, 10.0), (0.0, true));
        assert_eq!(CombatSystem::apply_damage(10.0, 25.0), (0.0, true));
    }

    #[test]
    fn test_move_diagonal() {
        let mut p = player();
        let (x, y) = (p.x, p.y);
        assert!(CombatSystem::move_player(&mut p, &frame(&["w", "d"]), &[]));
        assert_eq!((p.x, p.y), (x + Player::SPEED, y - Player::SPEED));
    }

    #[test]
    fn test_move_blocked_by_obstacle_is_rejected_whole() {
        let mut p = player();
        let wall = Obstacle::new(p.x + Player::SIZE + 2.0, 0.0, 10.0, 3000.0, ObstacleKind::Wood);
        let (x, y) = (p.x, p.y);
        assert!(!CombatSystem::move_player(&mut p, &frame(&["d", "s"]), &[wall]));
        assert_eq!((p.x, p.y), (x, y));
    }

    #[test]
    fn test_move_clamped_to_arena() {
        let mut p = player();
        p.x = 2.0;
        p.y = 2.0;
        CombatSystem::move_player(&mut p, &frame(&["a", "arrowup"]), &[]);
        assert_eq!((p.x, p.y), (0.0, 0.0));
    }

    #[test]
    fn test_melee_damages_enemy_inside_range() {
        let mut p = player();
        let mut enemies = vec![enemy_right_of(&p, 1, MELEE_RANGE - 1.0)];
        let mut events = Vec::new();

        assert!(CombatSystem::melee(&mut p, &mut enemies, &mut events));
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].health, Enemy::MAX_HEALTH - MELEE_DAMAGE);
        assert_eq!(events.len(), 1);
        assert!(p.attacking);
        assert_eq!(p.attack_cooldown, ATTACK_COOLDOWN_TICKS);
        assert_eq!(p.score, 0);
    }

    #[test]
    fn test_melee_ignores_enemy_at_range() {
        let mut p = player();
        let mut enemies = vec![enemy_right_of(&p, 1, MELEE_RANGE + 1.0)];
        let mut events = Vec::new();

        CombatSystem::melee(&mut p, &mut enemies, &mut events);
        assert_eq!(enemies[0].health, Enemy::MAX_HEALTH);
        assert!(events.is_empty());
    }

    #[test]
    fn test_melee_kills_multiple_and_scores_each() {
        let mut p = player();
        let mut first = enemy_right_of(&p, 1, 10.0);
        first.health = MELEE_DAMAGE;
        let mut second = enemy_right_of(&p, 2, -10.0);
        second.health = 1.0;
        let survivor = enemy_right_of(&p, 3, 20.0);
        let mut enemies = vec![first, second, survivor];
        let mut events = Vec::new();

        CombatSystem::melee(&mut p, &mut enemies, &mut events);
        assert_eq!(p.score, 2 * KILL_REWARD);
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].id, 3);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_melee_respects_cooldown() {
        let mut p = player();
        p.attack_cooldown = 3;
        let mut enemies = vec![enemy_right_of(&p, 1, 10.0)];
        let mut events = Vec::new();

        assert!(!CombatSystem::melee(&mut p, &mut enemies, &mut events));
        assert_eq!(enemies[0].health, Enemy::MAX_HEALTH);
        assert_eq!(p.attack_cooldown, 3);
    }

    #[test]
    fn test_fire_bow_to_the_right() {
        let mut p = player();
        let (px, py) = p.center();
        let arrow = CombatSystem::fire_bow(&mut p, px + 100.0, py, 7).unwrap();
        assert_eq!((arrow.vx, arrow.vy), (ARROW_SPEED, 0.0));
        assert_eq!((arrow.x, arrow.y), (px, py));
        assert_eq!(arrow.owner, p.id);
        assert_eq!(p.bow_cooldown, BOW_COOLDOWN_TICKS);

        assert!(CombatSystem::fire_bow(&mut p, px + 100.0, py, 8).is_none());
    }

    #[test]
    fn test_fire_bow_zero_length_aim() {
        let mut p = player();
        let (px, py) = p.center();
        assert!(CombatSystem::fire_bow(&mut p, px, py, 1).is_none());
    }

    #[test]
    fn test_defend_gating() {
        let mut p = player();
        assert!(CombatSystem::defend(&mut p));
        assert!(p.defending);
        assert_eq!(p.defend_duration, DEFEND_DURATION_TICKS);
        assert_eq!(p.defend_cooldown, DEFEND_COOLDOWN_TICKS);
        assert!(!CombatSystem::defend(&mut p));

        for _ in 0..DEFEND_DURATION_TICKS {
            p.tick_cooldowns();
        }
        assert!(!p.defending);
        // shield is down but still on cooldown
        assert!(!CombatSystem::defend(&mut p));

        for _ in DEFEND_DURATION_TICKS..DEFEND_COOLDOWN_TICKS {
            p.tick_cooldowns();
        }
        assert!(CombatSystem::defend(&mut p));
    }

    #[test]
    fn test_dead_player_input_ignored() {
        let mut p = player();
        p.health = 0.0;
        let (x, y) = (p.x, p.y);
        let (px, py) = p.center();
        let mut enemies = vec![enemy_right_of(&p, 1, 10.0)];
        let mut arrows = Vec::new();
        let mut events = Vec::new();
        let mut next_id = 1;

        let input = InputFrame::from_keys(["d", " ", "e", "q"], px + 50.0, py);
        CombatSystem::resolve_input(
            &mut p,
            &input,
            &mut enemies,
            &mut arrows,
            &default_layout(),
            &mut next_id,
            &mut events,
        );

        assert_eq!((p.x, p.y), (x, y));
        assert_eq!(enemies[0].health, Enemy::MAX_HEALTH);
        assert!(arrows.is_empty());
        assert!(!p.defending);
        assert_eq!(next_id, 1);
    }

    #[test]
    fn test_resolve_input_fires_arrow() {
        let mut p = player();
        let (px, py) = p.center();
        let mut enemies = Vec::new();
        let mut arrows = Vec::new();
        let mut events = Vec::new();
        let mut next_id = 40;

        let input = InputFrame::from_keys(["E"], px, py - 10.0);
        CombatSystem::resolve_input(
            &mut p,
            &input,
            &mut enemies,
            &mut arrows,
            &default_layout(),
            &mut next_id,
            &mut events,
        );

        assert_eq!(arrows.len(), 1);
        assert_eq!(arrows[0].id, 40);
        assert_eq!((arrows[0].vx, arrows[0].vy), (0.0, -ARROW_SPEED));
        assert_eq!(next_id, 41);
    }
}
