//! The turn engine.
//!
//! One tick resolves the player's intent, runs every living enemy's
//! behavior, decays effect durations, and recomputes visibility, in that
//! strict order, never interleaved. Ticks are not re-entrant; the
//! autoplay driver calls the same entry point a frontend does.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::action::{Command, Direction};
use crate::combat::{self, AttackOutcome};
use crate::consts::POTION_HEAL;
use crate::consts::{PLAYER_HP, PLAYER_POWER};
use crate::dungeon::{self, Grid, MapKind, Rect};
use crate::entity::Entity;
use crate::items::{Inventory, Item, ItemKind};
use crate::monster::{Role, ai};
use crate::pos::Pos;
use crate::rng::GameRng;
use crate::world::config::{NewGameConfig, SimConfig};
use crate::world::events::{CorpseMarker, DamageEvent, EventQueue};
use crate::world::log::{MessageLog, TurnDigest};
use crate::world::metrics::RunMetrics;

/// Current game phase.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Menu,
    Playing,
    Paused,
    GameOver,
    Victory,
}

/// What a tick asks of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    Continue,
    PlayerDied,
    Victory,
    /// Caller should persist the state (the core does no file I/O mid-tick).
    SaveRequested,
    LoadRequested,
    QuitRequested,
}

/// Which combatant a combat step refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ActorId {
    Player,
    Enemy(usize),
}

/// The full simulation state. Everything a renderer or the autoplay
/// planner may read is public; mutation goes through [`GameLoop`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub turn: u64,
    pub rng: GameRng,
    pub grid: Grid,
    pub player: Entity,
    pub enemies: Vec<Entity>,
    pub items: Vec<Item>,
    pub inventory: Inventory,
    pub exit: Option<Pos>,
    pub metrics: RunMetrics,
    pub log: MessageLog,
    /// Settings this run was started with; restart reuses them.
    pub setup: NewGameConfig,
    /// Config snapshot; swapped only between ticks.
    pub config: SimConfig,
    /// Autoplay engaged. A manual action command switches it off.
    #[serde(skip)]
    pub autoplay: bool,
    #[serde(skip)]
    pub events: EventQueue,
    #[serde(skip)]
    pub(crate) digest: Option<TurnDigest>,
}

impl GameState {
    /// Start a fresh run: generate the map, place the player, enemies,
    /// exit and loot, and open in the `Playing` phase.
    pub fn new_game(setup: NewGameConfig, config: SimConfig) -> Self {
        Self::build(setup, config, MessageLog::default(), false)
    }

    fn build(
        setup: NewGameConfig,
        config: SimConfig,
        mut log: MessageLog,
        is_restart: bool,
    ) -> Self {
        let setup = setup.sanitized();
        let mut rng = GameRng::new(setup.seed);
        let mut grid = dungeon::generate(&mut rng, setup.width, setup.height, setup.map_kind);

        let mut player = Entity::new(Role::Player, PLAYER_HP, PLAYER_POWER);
        player.pos = match (setup.map_kind, grid.rooms.is_empty()) {
            (MapKind::Rooms, false) => {
                let centers: Vec<Pos> = grid.rooms.iter().map(Rect::center).collect();
                rng.choose(&centers)
                    .copied()
                    .unwrap_or(Pos::new(grid.width / 2, grid.height / 2))
            }
            _ => place_on_free_floor(&mut rng, &grid, &[])
                .unwrap_or(Pos::new(grid.width / 2, grid.height / 2)),
        };

        let mut enemies = Vec::new();
        let enemy_count = setup.tier.scale_enemy_count(setup.enemy_count);
        for _ in 0..enemy_count {
            let stats = config.roles.pick_weighted(&mut rng);
            let mut enemy = Entity::new(stats.role, stats.hp, stats.power);
            if stats.role.is_elite() {
                enemy.power += setup.tier.elite_power_bonus();
            }
            let mut occupied: Vec<Pos> = enemies.iter().map(|e: &Entity| e.pos).collect();
            occupied.push(player.pos);
            let Some(pos) = place_on_free_floor(&mut rng, &grid, &occupied) else {
                break;
            };
            enemy.pos = pos;
            enemies.push(enemy);
        }

        let exit = place_exit(&grid, player.pos);
        let items = spawn_loot(&mut rng, &grid, &setup, player.pos, &enemies);

        if is_restart {
            log.push("Restarted.");
        } else {
            log.push(format!("New game. Seed={}", setup.seed));
        }

        let mut state = Self {
            phase: GamePhase::Playing,
            turn: 1,
            rng,
            grid,
            player,
            enemies,
            items,
            inventory: Inventory::default(),
            exit,
            metrics: RunMetrics::default(),
            log,
            setup,
            config,
            autoplay: false,
            events: EventQueue::default(),
            digest: None,
        };
        let origin = state.player.pos;
        state.grid.update_visibility(origin, state.config.fov_radius);
        state
    }

    fn restart(&mut self) {
        let setup = self.setup.clone();
        let config = self.config.clone();
        let log = std::mem::take(&mut self.log);
        *self = Self::build(setup, config, log, true);
    }

    /// Rebuild everything serde skips, so a loaded state is playable.
    pub fn rebuild_transient(&mut self) {
        self.grid.reset_visible();
        self.events.clear();
        self.digest = None;
        let origin = self.player.pos;
        self.grid.update_visibility(origin, self.config.fov_radius);
    }

    /// The living entity on a tile, if any.
    pub fn entity_at(&self, pos: Pos) -> Option<&Entity> {
        if self.player.is_alive() && self.player.pos == pos {
            return Some(&self.player);
        }
        self.enemies.iter().find(|e| e.is_alive() && e.pos == pos)
    }

    pub fn living_enemy_index_at(&self, pos: Pos) -> Option<usize> {
        self.enemies
            .iter()
            .position(|e| e.is_alive() && e.pos == pos)
    }

    pub fn is_occupied(&self, pos: Pos) -> bool {
        self.entity_at(pos).is_some()
    }

    /// Generic movement block: wall, closed door, or a living body.
    pub fn is_blocked(&self, pos: Pos) -> bool {
        if !self.grid.is_walkable(pos) {
            return true;
        }
        if let Some(door) = self.grid.door_at(pos) {
            if !door.is_open() {
                return true;
            }
        }
        self.is_occupied(pos)
    }

    // ---- combat ------------------------------------------------------

    pub(crate) fn role_of(&self, actor: ActorId) -> Role {
        match actor {
            ActorId::Player => Role::Player,
            ActorId::Enemy(i) => self.enemies[i].role,
        }
    }

    /// Resolve one attack, with all the bookkeeping: events, digest,
    /// metrics, corpses and phase transitions.
    pub(crate) fn attack(&mut self, attacker: ActorId, defender: ActorId) -> AttackOutcome {
        let raw = match attacker {
            ActorId::Player => combat::raw_damage(&self.player),
            ActorId::Enemy(i) => combat::raw_damage(&self.enemies[i]),
        };
        let (outcome, defender_pos) = match defender {
            ActorId::Player => {
                let outcome = combat::apply_damage(&mut self.player, raw);
                (outcome, self.player.pos)
            }
            ActorId::Enemy(i) => {
                let outcome = combat::apply_damage(&mut self.enemies[i], raw);
                (outcome, self.enemies[i].pos)
            }
        };
        let attacker_role = self.role_of(attacker);
        let defender_role = self.role_of(defender);

        self.events.push_damage(DamageEvent {
            pos: defender_pos,
            amount: outcome.dealt,
            attacker: attacker_role,
            defender: defender_role,
            turn: self.turn,
        });
        if let Some(digest) = &mut self.digest {
            if outcome.absorbed > 0 {
                digest.record_effect("Shield");
            }
            digest.record_attack(attacker_role, defender_role, outcome.dealt, outcome.killed);
        }

        if attacker_role == Role::Player {
            self.metrics.damage_dealt += outcome.dealt as i64;
        }
        if defender_role == Role::Player {
            self.metrics.damage_taken += outcome.dealt as i64;
        }

        if outcome.killed {
            match defender {
                ActorId::Player => {
                    self.log.push("You died!");
                    self.phase = GamePhase::GameOver;
                }
                ActorId::Enemy(_) => {
                    self.events.push_corpse(CorpseMarker {
                        pos: defender_pos,
                        role: defender_role,
                    });
                    if attacker_role == Role::Player {
                        self.metrics.record_kill(defender_role);
                        if let Some(digest) = &mut self.digest {
                            digest.record_kill(attacker_role, defender_role);
                        }
                    }
                }
            }
        }
        outcome
    }

    // ---- player intents ----------------------------------------------

    /// Returns true if the move consumed the turn. Bumping a wall or a
    /// locked door without a key is rejected without costing time.
    fn do_move(&mut self, dir: Direction) -> bool {
        let (dx, dy) = dir.delta();
        let target = self.player.pos.step(dx, dy);
        if !self.grid.is_walkable(target) {
            return false;
        }

        if let Some(idx) = self.living_enemy_index_at(target) {
            self.attack(ActorId::Player, ActorId::Enemy(idx));
            return true;
        }

        if let Some(door) = self.grid.door_at_mut(target) {
            if !door.is_open() {
                if door.is_locked() && !self.inventory.has_key() {
                    self.log.push("The door is locked. You need a key.");
                    return false;
                }
                // Keys are a permanent credit; opening spends nothing.
                door.open();
                self.log.push("You open the door.");
            }
        }

        self.player.pos = target;
        self.pickup_at(target);
        if self.exit == Some(target) {
            self.log.push("Victory!");
            self.phase = GamePhase::Victory;
        }
        true
    }

    fn pickup_at(&mut self, pos: Pos) {
        let mut potions = 0u32;
        let mut keys = 0u32;
        self.items.retain(|item| {
            if item.pos != pos {
                return true;
            }
            match item.kind {
                ItemKind::Potion => potions += 1,
                ItemKind::Key => keys += 1,
            }
            false
        });
        self.inventory.potions += potions;
        self.inventory.keys += keys;
        if potions > 0 {
            self.log.push(format!("Picked up Potion x{potions}."));
        }
        if keys > 0 {
            self.log.push(format!("Picked up Key x{keys}."));
        }
    }

    /// Drink a potion. No-op (and no turn) without one or at full health.
    fn use_potion(&mut self) -> bool {
        if self.inventory.potions == 0 {
            self.log.push("No potion.");
            return false;
        }
        if !self.player.is_wounded() {
            self.log.push("Already at full health.");
            return false;
        }
        let healed = self.player.heal(POTION_HEAL);
        self.inventory.potions -= 1;
        self.metrics.items_used += 1;
        self.log.push(format!("You drink a potion. +{healed} HP"));
        true
    }

    // ---- the tick ----------------------------------------------------

    fn tick_inner(&mut self, command: Command, manual: bool) -> TickResult {
        match command {
            Command::TogglePause => {
                match self.phase {
                    GamePhase::Playing => {
                        self.phase = GamePhase::Paused;
                        self.log.push("Paused.");
                    }
                    GamePhase::Paused => {
                        self.phase = GamePhase::Playing;
                        self.log.push("Unpaused.");
                    }
                    _ => {}
                }
                TickResult::Continue
            }
            Command::ToggleAutoplay => {
                self.autoplay = !self.autoplay;
                self.log
                    .push(if self.autoplay { "Auto: ON" } else { "Auto: OFF" });
                TickResult::Continue
            }
            Command::Restart => {
                self.restart();
                TickResult::Continue
            }
            Command::Save => TickResult::SaveRequested,
            Command::Load => TickResult::LoadRequested,
            Command::Quit => TickResult::QuitRequested,
            Command::Move(_) | Command::Wait | Command::UseItem => {
                self.action_tick(command, manual)
            }
        }
    }

    fn action_tick(&mut self, command: Command, manual: bool) -> TickResult {
        if self.phase != GamePhase::Playing {
            return self.phase_result();
        }
        if manual && self.autoplay {
            // A manual action deterministically disables autoplay.
            self.autoplay = false;
            self.log.push("Auto: OFF");
        }

        self.digest = Some(TurnDigest::new());
        let consumed = match command {
            Command::Move(dir) => self.do_move(dir),
            Command::Wait => true,
            Command::UseItem => self.use_potion(),
            _ => unreachable!("non-action command in action_tick"),
        };

        if consumed {
            if self.phase == GamePhase::Playing {
                ai::run_enemy_phase(self);
            }
            self.turn += 1;
            self.player.effects.decay();
            for enemy in &mut self.enemies {
                if enemy.is_alive() {
                    enemy.effects.decay();
                }
            }
            if let Some(digest) = self.digest.take() {
                for line in digest.summarize() {
                    self.log.push(line);
                }
            }
        } else {
            self.digest = None;
        }

        let origin = self.player.pos;
        self.grid.update_visibility(origin, self.config.fov_radius);
        self.phase_result()
    }

    fn phase_result(&self) -> TickResult {
        match self.phase {
            GamePhase::GameOver => TickResult::PlayerDied,
            GamePhase::Victory => TickResult::Victory,
            _ => TickResult::Continue,
        }
    }
}

/// Game loop controller.
pub struct GameLoop {
    state: GameState,
}

impl GameLoop {
    pub fn new(state: GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Execute one tick from manual input.
    pub fn tick(&mut self, command: Command) -> TickResult {
        self.state.tick_inner(command, true)
    }

    /// Execute one tick on behalf of the autoplay driver (does not clear
    /// the autoplay flag).
    pub fn autoplay_tick(&mut self, command: Command) -> TickResult {
        self.state.tick_inner(command, false)
    }

    /// Swap in a freshly merged config snapshot. Only legal between
    /// ticks; the simulation never re-reads config mid-turn.
    pub fn apply_config(&mut self, config: SimConfig) {
        self.state.config = config;
    }

    /// Replace the whole state (after a successful load).
    pub fn replace_state(&mut self, state: GameState) {
        self.state = state;
    }
}

// ---- placement helpers ----------------------------------------------

/// A random free interior floor tile, by rejection sampling with a
/// deterministic scan fallback.
fn place_on_free_floor(rng: &mut GameRng, grid: &Grid, occupied: &[Pos]) -> Option<Pos> {
    for _ in 0..1000 {
        let pos = Pos::new(rng.range(1, grid.width - 2), rng.range(1, grid.height - 2));
        if grid.is_walkable(pos) && !occupied.contains(&pos) {
            return Some(pos);
        }
    }
    for y in 0..grid.height {
        for x in 0..grid.width {
            let pos = Pos::new(x, y);
            if grid.is_walkable(pos) && !occupied.contains(&pos) {
                return Some(pos);
            }
        }
    }
    None
}

/// The exit goes as far from the player as the map allows: the farthest
/// room's farthest walkable tile, or (caves) the farthest floor tile.
fn place_exit(grid: &Grid, player: Pos) -> Option<Pos> {
    if grid.kind == MapKind::Rooms && !grid.rooms.is_empty() {
        let farthest = grid
            .rooms
            .iter()
            .max_by_key(|r| r.center().manhattan(player))?;
        let mut candidates: Vec<Pos> = vec![farthest.center()];
        for y in farthest.y1..=farthest.y2 {
            for x in farthest.x1..=farthest.x2 {
                let pos = Pos::new(x, y);
                if grid.is_walkable(pos) {
                    candidates.push(pos);
                }
            }
        }
        candidates.sort_by_key(|p| (-p.manhattan(player), p.y, p.x));
        return candidates.first().copied();
    }

    let mut best: Option<(i32, Pos)> = None;
    for y in 1..grid.height - 1 {
        for x in 1..grid.width - 1 {
            let pos = Pos::new(x, y);
            if !grid.is_walkable(pos) || pos == player {
                continue;
            }
            let d = pos.manhattan(player);
            if best.map_or(true, |(bd, _)| d > bd) {
                best = Some((d, pos));
            }
        }
    }
    best.map(|(_, pos)| pos)
}

/// Seed potions (room-biased) and, when locked doors exist, enough keys
/// to get through them.
fn spawn_loot(
    rng: &mut GameRng,
    grid: &Grid,
    setup: &NewGameConfig,
    player: Pos,
    enemies: &[Entity],
) -> Vec<Item> {
    let mut items = Vec::new();
    let occupied = |items: &[Item], pos: Pos| {
        pos == player
            || enemies.iter().any(|e| e.pos == pos)
            || items.iter().any(|i: &Item| i.pos == pos)
    };

    let want_potions = rng.range(2, 4) as u32 + setup.tier.bonus_potions();
    let mut potions = 0u32;

    if grid.kind == MapKind::Rooms && !grid.rooms.is_empty() {
        let mut rooms = grid.rooms.clone();
        rng.shuffle(&mut rooms);
        for room in rooms {
            if potions >= want_potions {
                break;
            }
            for _ in 0..8 {
                let pos = Pos::new(rng.range(room.x1, room.x2), rng.range(room.y1, room.y2));
                if grid.is_walkable(pos) && !occupied(&items, pos) {
                    items.push(Item { pos, kind: ItemKind::Potion });
                    potions += 1;
                    break;
                }
            }
        }
    }
    let mut tries = 0;
    while potions < want_potions && tries < 2000 {
        tries += 1;
        let pos = Pos::new(rng.range(1, grid.width - 2), rng.range(1, grid.height - 2));
        if grid.is_walkable(pos) && !occupied(&items, pos) {
            items.push(Item { pos, kind: ItemKind::Potion });
            potions += 1;
        }
    }

    let locked_doors = grid.doors.values().filter(|d| d.is_locked()).count();
    if locked_doors > 0 {
        let want_keys = locked_doors.min(2) as u32;
        let mut keys = 0u32;
        if !grid.rooms.is_empty() {
            // Keys favor rooms near the start so runs are not key-gated
            // behind the doors they open.
            let mut rooms = grid.rooms.clone();
            rooms.sort_by_key(|r| r.center().manhattan(player));
            for room in rooms {
                if keys >= want_keys {
                    break;
                }
                for _ in 0..10 {
                    let pos =
                        Pos::new(rng.range(room.x1, room.x2), rng.range(room.y1, room.y2));
                    if grid.is_walkable(pos) && !occupied(&items, pos) {
                        items.push(Item { pos, kind: ItemKind::Key });
                        keys += 1;
                        break;
                    }
                }
            }
        }
        let mut tries = 0;
        while keys < want_keys && tries < 2000 {
            tries += 1;
            let pos = Pos::new(rng.range(1, grid.width - 2), rng.range(1, grid.height - 2));
            if grid.is_walkable(pos) && !occupied(&items, pos) {
                items.push(Item { pos, kind: ItemKind::Key });
                keys += 1;
            }
        }
    }

    items
}
