//! Room state and authoritative tick loop

use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::util::time::tick_duration;
use crate::ws::protocol::ServerMsg;

use super::ai::update_enemies;
use super::arena::{
    default_layout, Obstacle, ARENA_HEIGHT, ARENA_WIDTH, RESPAWN_BASE, RESPAWN_CHANCE,
    RESPAWN_PER_PLAYER, SPAWN_ATTEMPTS, SPAWN_MARGIN,
};
use super::combat::CombatSystem;
use super::entity::{Arrow, Enemy, Player};
use super::physics::collides_any;
use super::projectile::update_arrows;
use super::snapshot::SnapshotBuilder;
use super::{GameEvent, InputFrame, PlayerId, RoomId};

/// Room lifecycle. There is no way back from `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPhase {
    Running,
    Stopped,
}

/// Everything a room simulates (owned behind the room's lock)
pub struct RoomState {
    pub phase: RoomPhase,
    pub tick: u64,
    pub players: HashMap<PlayerId, Player>,
    pub enemies: Vec<Enemy>,
    pub arrows: Vec<Arrow>,
    pub obstacles: Vec<Obstacle>,
    rng: ChaCha8Rng,
    next_entity_id: u64,
}

impl RoomState {
    pub fn new(seed: u64, initial_enemies: usize) -> Self {
        let mut state = Self {
            phase: RoomPhase::Running,
            tick: 0,
            players: HashMap::new(),
            enemies: Vec::new(),
            arrows: Vec::new(),
            obstacles: default_layout(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_entity_id: 1,
        };
        state.spawn_enemies(initial_enemies);
        state
    }

    pub fn occupancy(&self) -> usize {
        self.players.len()
    }

    /// Enemy population the room refills toward
    pub fn respawn_target(&self) -> usize {
        RESPAWN_BASE + RESPAWN_PER_PLAYER * self.players.len()
    }

    /// Sample a spawn point clear of obstacles.
    /// Falls back to the last sample once the attempts run out.
    pub fn random_spawn_position(&mut self) -> (f32, f32) {
        let mut pos = (SPAWN_MARGIN, SPAWN_MARGIN);
        for _ in 0..SPAWN_ATTEMPTS {
            pos = (
                self.rng.gen_range(SPAWN_MARGIN..ARENA_WIDTH - SPAWN_MARGIN),
                self.rng.gen_range(SPAWN_MARGIN..ARENA_HEIGHT - SPAWN_MARGIN),
            );
            if !collides_any(pos.0, pos.1, Enemy::SIZE, &self.obstacles) {
                break;
            }
        }
        pos
    }

    pub fn spawn_enemies(&mut self, count: usize) {
        for _ in 0..count {
            let (x, y) = self.random_spawn_position();
            let id = self.next_id();
            self.enemies.push(Enemy::new(id, x, y));
        }
    }

    /// Insert a fresh player; color follows the current occupancy
    pub fn add_player(&mut self, id: PlayerId, name: String) -> &Player {
        let player = Player::new(id, name, self.players.len());
        self.players.entry(id).or_insert(player)
    }

    pub fn remove_player(&mut self, id: &PlayerId) -> Option<Player> {
        self.players.remove(id)
    }

    /// Apply one input frame. Unknown players and stopped rooms are ignored.
    pub fn apply_input(&mut self, id: &PlayerId, input: &InputFrame) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase != RoomPhase::Running {
            return events;
        }

        if let Some(player) = self.players.get_mut(id) {
            CombatSystem::resolve_input(
                player,
                input,
                &mut self.enemies,
                &mut self.arrows,
                &self.obstacles,
                &mut self.next_entity_id,
                &mut events,
            );
        }

        events
    }

    /// One simulation step: arrows, enemy AI, then cooldowns and respawn
    pub fn run_tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase != RoomPhase::Running {
            return events;
        }
        self.tick += 1;

        update_arrows(
            &mut self.arrows,
            &mut self.enemies,
            &mut self.players,
            &self.obstacles,
            &mut events,
        );

        update_enemies(&mut self.enemies, &mut self.players, &self.obstacles, &mut events);

        for player in self.players.values_mut() {
            player.tick_cooldowns();
        }

        self.respawn_enemies();

        events
    }

    /// Maybe add one enemy while the population is below target
    fn respawn_enemies(&mut self) {
        if self.enemies.len() < self.respawn_target() && self.rng.gen_bool(RESPAWN_CHANCE) {
            self.spawn_enemies(1);
        }
    }

    /// Enter the terminal phase and drop every entity
    pub fn stop(&mut self) {
        self.phase = RoomPhase::Stopped;
        self.players.clear();
        self.enemies.clear();
        self.arrows.clear();
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }
}

/// Outbound room traffic; `target` limits delivery to a single player
#[derive(Debug, Clone)]
pub struct RoomMessage {
    pub target: Option<PlayerId>,
    pub msg: ServerMsg,
}

impl RoomMessage {
    pub fn is_for(&self, player_id: &PlayerId) -> bool {
        self.target.map_or(true, |target| target == *player_id)
    }
}

impl From<GameEvent> for RoomMessage {
    fn from(event: GameEvent) -> Self {
        match event {
            GameEvent::EnemyHit { x, y } => Self {
                target: None,
                msg: ServerMsg::EnemyHit { x, y },
            },
            GameEvent::PlayerDied { player_id, score } => Self {
                target: Some(player_id),
                msg: ServerMsg::PlayerDied { player_id, score },
            },
        }
    }
}

/// A live room: its state, subscribers and tick task
pub struct Room {
    pub id: RoomId,
    pub name: String,
    state: Mutex<RoomState>,
    events_tx: broadcast::Sender<RoomMessage>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Room")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Room {
    pub fn new(id: RoomId, name: String, seed: u64, initial_enemies: usize) -> Arc<Self> {
        let (events_tx, _) = broadcast::channel(64);
        Arc::new(Self {
            id,
            name,
            state: Mutex::new(RoomState::new(seed, initial_enemies)),
            events_tx,
            ticker: Mutex::new(None),
        })
    }

    /// Spawn the periodic tick task (requires a Tokio runtime)
    pub fn start(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        let handle = tokio::spawn(Self::run(weak));
        *self.ticker.lock() = Some(handle);
        info!(room_id = %self.id, name = %self.name, "Room started");
    }

    /// Tick loop. Holds only a weak reference so a dropped room ends the task.
    async fn run(weak: Weak<Room>) {
        let mut tick_interval = interval(tick_duration());
        tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tick_interval.tick().await;

            let Some(room) = weak.upgrade() else {
                break;
            };
            if !room.tick() {
                break;
            }
        }
    }

    /// One update-and-broadcast cycle. Returns false once the room is stopped.
    pub fn tick(&self) -> bool {
        let mut state = self.state.lock();
        if state.phase == RoomPhase::Stopped {
            return false;
        }

        let events = state.run_tick();
        self.publish(events);

        let snapshot = SnapshotBuilder::build(&state);
        let _ = self.events_tx.send(RoomMessage {
            target: None,
            msg: ServerMsg::GameState(snapshot),
        });
        true
    }

    /// Apply player input under the room lock and fan out resulting events
    pub fn handle_input(&self, player_id: &PlayerId, input: &InputFrame) {
        let mut state = self.state.lock();
        let events = state.apply_input(player_id, input);
        self.publish(events);
    }

    /// Stop ticking and tear the state down.
    /// Any tick that acquires the lock afterwards sees `Stopped` and exits.
    pub fn stop(&self) {
        self.state.lock().stop();
        if let Some(handle) = self.ticker.lock().take() {
            handle.abort();
        }
        info!(room_id = %self.id, "Room stopped");
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().phase == RoomPhase::Running
    }

    pub fn occupancy(&self) -> usize {
        self.state.lock().occupancy()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RoomMessage> {
        self.events_tx.subscribe()
    }

    /// Run a closure against the locked state
    pub fn with_state<R>(&self, f: impl FnOnce(&mut RoomState) -> R) -> R {
        let mut state = self.state.lock();
        f(&mut *state)
    }

    fn publish(&self, events: Vec<GameEvent>) {
        for event in events {
            if let GameEvent::PlayerDied { player_id, score } = &event {
                info!(room_id = %self.id, player_id = %player_id, score, "Player died");
            }
            // no subscribers is fine
            if self.events_tx.send(event.into()).is_err() {
                debug!(room_id = %self.id, "Room event dropped, no subscribers");
            }
        }
    }
}
