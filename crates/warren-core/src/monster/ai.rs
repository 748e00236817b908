//! Enemy behavior policies.
//!
//! Every living enemy acts once per enemy phase, in roster order. An
//! enemy adjacent to the player always melee-attacks, pre-empting its
//! role logic. Roles that took no special action fall back to the shared
//! chase/wander movement.

use crate::action::Direction;
use crate::consts::ENEMY_SIGHT_RANGE;
use crate::effects::{Effect, EffectKind};
use crate::gameloop::{ActorId, GameState};
use crate::monster::Role;
use crate::pos::Pos;

/// How long a telegraphed aim lasts: set on the aiming turn, still live
/// on the following one, gone after the shot.
const AIM_DURATION: i32 = 2;
const AIM_MULTIPLIER: f64 = 2.0;
const ARCHER_MIN_RANGE: i32 = 2;
const ARCHER_MAX_RANGE: i32 = 5;

const SHIELD_POOL: i32 = 3;
const SHIELD_TURNS: i32 = 3;
const FRENZY_BONUS: i32 = 1;
const FRENZY_TURNS: i32 = 3;
const HEX_PENALTY: i32 = 1;
const HEX_TURNS: i32 = 3;

const CASTER_RADIUS: i32 = 3;
const WANDER_CHANCE: u32 = 30;

/// Run the whole enemy phase. Enemies that die mid-phase are skipped;
/// the phase stops early if the player falls.
pub(crate) fn run_enemy_phase(state: &mut GameState) {
    for i in 0..state.enemies.len() {
        if !state.enemies[i].is_alive() {
            continue;
        }
        if !state.player.is_alive() {
            break;
        }

        let role = state.enemies[i].role;
        let adjacent = state.enemies[i].pos.manhattan(state.player.pos) == 1;

        let acted = if adjacent {
            state.attack(ActorId::Enemy(i), ActorId::Player);
            true
        } else {
            match role {
                Role::Archer => archer_action(state, i),
                Role::Priest => priest_action(state, i),
                Role::Shaman => shaman_action(state, i),
                _ => false,
            }
        };

        if !acted {
            default_move(state, i);
        }

        if role == Role::Troll && state.enemies[i].is_alive() {
            bruiser_regen(state, i);
        }
    }
}

/// Aim while lined up, shoot on a later turn while still lined up. The
/// shot lands boosted and starts a cooldown; losing the line drops the aim.
fn archer_action(state: &mut GameState, i: usize) -> bool {
    let epos = state.enemies[i].pos;
    let ppos = state.player.pos;
    let lined_up = epos.aligned_with(ppos)
        && state.grid.has_los_within(epos, ppos, ENEMY_SIGHT_RANGE)
        && (ARCHER_MIN_RANGE..=ARCHER_MAX_RANGE).contains(&epos.chebyshev(ppos));

    if state.enemies[i].effects.has(EffectKind::Aim) {
        if lined_up {
            let outcome = state.attack(ActorId::Enemy(i), ActorId::Player);
            state.log.push(format!("Archer shoots (-{})", outcome.dealt));
            state.enemies[i].effects.remove(EffectKind::Aim);
            let cooldown = state.setup.tier.archer_cooldown();
            state.enemies[i].effects.apply(Effect::AimCooldown, cooldown);
            return true;
        }
        state.enemies[i].effects.remove(EffectKind::Aim);
        return false;
    }

    if lined_up && !state.enemies[i].effects.has(EffectKind::AimCooldown) {
        state.enemies[i].effects.apply(
            Effect::Aim {
                multiplier: AIM_MULTIPLIER,
            },
            AIM_DURATION,
        );
        state.log.push("Archer aims");
        return true;
    }
    false
}

/// Shield the most wounded ally (the whole roster, itself included),
/// closest first on ties.
fn priest_action(state: &mut GameState, i: usize) -> bool {
    let epos = state.enemies[i].pos;
    let mut candidates: Vec<(usize, i32, i32)> = state
        .enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_alive() && e.is_wounded())
        .map(|(j, e)| (j, e.max_hp - e.hp, e.pos.manhattan(epos)))
        .collect();
    if candidates.is_empty() {
        return false;
    }
    candidates.sort_by_key(|&(j, missing, dist)| (-missing, dist, j));
    let target = candidates[0].0;

    state.enemies[target]
        .effects
        .apply(Effect::Shield { pool: SHIELD_POOL }, SHIELD_TURNS);
    let name = state.enemies[target].name();
    state
        .log
        .push(format!("Priest shields {name} (+{SHIELD_POOL} temp)"));
    true
}

/// Frenzy a random nearby ally when enough are close, otherwise hex the
/// player. The ally threshold drops at the hardest tier.
fn shaman_action(state: &mut GameState, i: usize) -> bool {
    let epos = state.enemies[i].pos;
    let allies: Vec<usize> = state
        .enemies
        .iter()
        .enumerate()
        .filter(|&(j, e)| j != i && e.is_alive() && e.pos.manhattan(epos) <= CASTER_RADIUS)
        .map(|(j, _)| j)
        .collect();

    if !allies.is_empty() && allies.len() >= state.setup.tier.caster_ally_threshold() {
        let target = *state.rng.choose(&allies).unwrap_or(&allies[0]);
        state.enemies[target].effects.apply(
            Effect::Frenzy {
                bonus: FRENZY_BONUS,
            },
            FRENZY_TURNS,
        );
        let name = state.enemies[target].name();
        state
            .log
            .push(format!("Shaman empowers {name} (+{FRENZY_BONUS} ATK)"));
    } else {
        state.player.effects.apply(
            Effect::Hex {
                penalty: HEX_PENALTY,
            },
            HEX_TURNS,
        );
        state.metrics.times_hexed += 1;
        state
            .log
            .push(format!("Shaman hexes you (-{HEX_PENALTY} ATK)"));
    }
    true
}

/// End-of-turn regeneration for the bruiser, attack or no attack.
fn bruiser_regen(state: &mut GameState, i: usize) {
    let regen = state.setup.tier.bruiser_regen();
    let enemy = &mut state.enemies[i];
    if !enemy.is_wounded() {
        return;
    }
    let healed = enemy.heal(regen);
    if let Some(digest) = &mut state.digest {
        for _ in 0..healed {
            digest.record_effect("Regen");
        }
    }
}

/// Shared movement: chase along the axis of greatest displacement when
/// the player is in sight, otherwise occasionally wander.
fn default_move(state: &mut GameState, i: usize) {
    let epos = state.enemies[i].pos;
    let ppos = state.player.pos;

    if state.grid.has_los_within(epos, ppos, ENEMY_SIGHT_RANGE) {
        let dx = (ppos.x - epos.x).signum();
        let dy = (ppos.y - epos.y).signum();
        let horizontal = Pos::new(epos.x + dx, epos.y);
        let vertical = Pos::new(epos.x, epos.y + dy);
        let (first, second) = if (ppos.x - epos.x).abs() >= (ppos.y - epos.y).abs() {
            (horizontal, vertical)
        } else {
            (vertical, horizontal)
        };
        if !try_step(state, i, first) {
            try_step(state, i, second);
        }
    } else if state.rng.percent(WANDER_CHANCE) {
        let dirs = Direction::ALL;
        if let Some(dir) = state.rng.choose(&dirs).copied() {
            let (dx, dy) = dir.delta();
            try_step(state, i, epos.step(dx, dy));
        }
    }
}

/// Step onto a tile if legal. Enemies swing closed unlocked doors open as
/// they pass; locked doors always stop them.
fn try_step(state: &mut GameState, i: usize, target: Pos) -> bool {
    if !state.grid.is_walkable(target) || state.is_occupied(target) {
        return false;
    }
    if let Some(door) = state.grid.door_at_mut(target) {
        if !door.is_open() {
            if door.is_locked() {
                return false;
            }
            door.open();
        }
    }
    state.enemies[i].pos = target;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Command;
    use crate::dungeon::{Grid, MapKind};
    use crate::entity::Entity;
    use crate::world::config::{NewGameConfig, SimConfig, Tier};
    use crate::{GameLoop, GamePhase, GameState};

    /// Open arena with the player at the given spot and no pre-spawned
    /// enemies or items.
    fn arena(w: i32, h: i32, player_pos: Pos) -> GameState {
        let mut state = GameState::new_game(NewGameConfig::default(), SimConfig::default());
        let mut grid = Grid::new(w, h, MapKind::Caves);
        for x in 1..w - 1 {
            for y in 1..h - 1 {
                grid.carve(Pos::new(x, y));
            }
        }
        state.grid = grid;
        state.enemies.clear();
        state.items.clear();
        state.exit = None;
        state.player.pos = player_pos;
        state.grid.update_visibility(player_pos, state.config.fov_radius);
        state
    }

    fn spawn(state: &mut GameState, role: Role, hp: i32, power: i32, pos: Pos) -> usize {
        let mut enemy = Entity::new(role, hp, power);
        enemy.pos = pos;
        state.enemies.push(enemy);
        state.enemies.len() - 1
    }

    #[test]
    fn test_adjacent_enemy_attacks_over_role_logic() {
        let mut state = arena(12, 10, Pos::new(5, 5));
        spawn(&mut state, Role::Archer, 6, 2, Pos::new(6, 5));
        let mut game = GameLoop::new(state);

        game.tick(Command::Wait);
        // Melee, not an aim: player took the archer's base power.
        assert_eq!(game.state().player.hp, 18);
        assert!(!game.state().enemies[0].effects.has(EffectKind::Aim));
    }

    #[test]
    fn test_chase_reduces_larger_axis_first() {
        let mut state = arena(14, 12, Pos::new(3, 3));
        spawn(&mut state, Role::Goblin, 8, 3, Pos::new(9, 5));
        let mut game = GameLoop::new(state);

        game.tick(Command::Wait);
        // |dx|=6 beats |dy|=2: the goblin steps west.
        assert_eq!(game.state().enemies[0].pos, Pos::new(8, 5));
    }

    #[test]
    fn test_blocked_axis_falls_back_to_other() {
        let mut state = arena(14, 12, Pos::new(3, 6));
        let chaser = spawn(&mut state, Role::Goblin, 8, 3, Pos::new(9, 5));
        // A body on the preferred west step; bodies block steps, not sight.
        spawn(&mut state, Role::Troll, 14, 5, Pos::new(8, 5));
        let mut game = GameLoop::new(state);

        game.tick(Command::Wait);
        assert_eq!(game.state().enemies[chaser].pos, Pos::new(9, 6));
    }

    #[test]
    fn test_archer_aims_then_shoots_double() {
        let mut state = arena(14, 10, Pos::new(4, 5));
        spawn(&mut state, Role::Archer, 6, 2, Pos::new(8, 5));
        let mut game = GameLoop::new(state);

        game.tick(Command::Wait);
        assert!(game.state().enemies[0].effects.has(EffectKind::Aim));
        assert_eq!(game.state().player.hp, 20, "aiming turn must not damage");
        // Archer spends its turn aiming, not closing in.
        assert_eq!(game.state().enemies[0].pos, Pos::new(8, 5));

        game.tick(Command::Wait);
        assert_eq!(game.state().player.hp, 16, "shot is power x2");
        assert!(!game.state().enemies[0].effects.has(EffectKind::Aim));
        assert!(game.state().enemies[0].effects.has(EffectKind::AimCooldown));
    }

    #[test]
    fn test_archer_aim_cancelled_when_line_breaks() {
        let mut state = arena(14, 10, Pos::new(4, 5));
        spawn(&mut state, Role::Archer, 6, 2, Pos::new(8, 5));
        let mut game = GameLoop::new(state);

        game.tick(Command::Wait);
        assert!(game.state().enemies[0].effects.has(EffectKind::Aim));

        // Side-step off the row: the aim fizzles, no shot lands.
        game.tick(Command::Move(crate::action::Direction::North));
        assert_eq!(game.state().player.hp, 20);
        assert!(!game.state().enemies[0].effects.has(EffectKind::Aim));
    }

    #[test]
    fn test_archer_holds_fire_outside_band() {
        let mut state = arena(14, 10, Pos::new(2, 5));
        // Chebyshev 9: too far to aim; it should advance instead.
        spawn(&mut state, Role::Archer, 6, 2, Pos::new(11, 5));
        let mut game = GameLoop::new(state);

        game.tick(Command::Wait);
        assert!(!game.state().enemies[0].effects.has(EffectKind::Aim));
        assert_eq!(game.state().enemies[0].pos, Pos::new(10, 5));
    }

    #[test]
    fn test_priest_shields_most_wounded_ally() {
        let mut state = arena(14, 10, Pos::new(2, 2));
        let scratched = spawn(&mut state, Role::Goblin, 8, 3, Pos::new(10, 7));
        let mauled = spawn(&mut state, Role::Goblin, 8, 3, Pos::new(11, 7));
        spawn(&mut state, Role::Priest, 7, 2, Pos::new(10, 6));
        state.enemies[scratched].hp = 6;
        state.enemies[mauled].hp = 2;
        let mut game = GameLoop::new(state);

        game.tick(Command::Wait);
        assert!(
            game.state().enemies[mauled]
                .effects
                .has(EffectKind::Shield)
        );
        assert!(
            !game.state().enemies[scratched]
                .effects
                .has(EffectKind::Shield)
        );
    }

    #[test]
    fn test_priest_idles_when_roster_is_healthy() {
        let mut state = arena(14, 10, Pos::new(2, 2));
        spawn(&mut state, Role::Goblin, 8, 3, Pos::new(10, 7));
        let priest = spawn(&mut state, Role::Priest, 7, 2, Pos::new(11, 7));
        let mut game = GameLoop::new(state);

        game.tick(Command::Wait);
        for enemy in &game.state().enemies {
            assert!(!enemy.effects.has(EffectKind::Shield));
        }
        // Nothing to shield: the priest moved like anyone else.
        assert_ne!(game.state().enemies[priest].pos, Pos::new(11, 7));
    }

    #[test]
    fn test_shaman_frenzies_with_allies_near() {
        let mut state = arena(14, 10, Pos::new(2, 2));
        let a = spawn(&mut state, Role::Goblin, 8, 3, Pos::new(10, 7));
        let b = spawn(&mut state, Role::Goblin, 8, 3, Pos::new(11, 7));
        spawn(&mut state, Role::Shaman, 9, 3, Pos::new(10, 6));
        let mut game = GameLoop::new(state);

        game.tick(Command::Wait);
        let frenzied = [a, b]
            .iter()
            .filter(|&&j| game.state().enemies[j].effects.has(EffectKind::Frenzy))
            .count();
        assert_eq!(frenzied, 1);
        assert!(!game.state().player.effects.has(EffectKind::Hex));
    }

    #[test]
    fn test_shaman_hexes_player_when_alone() {
        let mut state = arena(14, 10, Pos::new(2, 2));
        spawn(&mut state, Role::Shaman, 9, 3, Pos::new(10, 6));
        let mut game = GameLoop::new(state);

        game.tick(Command::Wait);
        assert!(game.state().player.effects.has(EffectKind::Hex));
        assert_eq!(game.state().metrics.times_hexed, 1);
    }

    #[test]
    fn test_shaman_threshold_drops_at_nightmare() {
        let mut state = arena(14, 10, Pos::new(2, 2));
        state.setup.tier = Tier::Nightmare;
        let a = spawn(&mut state, Role::Goblin, 8, 3, Pos::new(10, 7));
        spawn(&mut state, Role::Shaman, 9, 3, Pos::new(10, 6));
        let mut game = GameLoop::new(state);

        game.tick(Command::Wait);
        assert!(game.state().enemies[a].effects.has(EffectKind::Frenzy));
    }

    #[test]
    fn test_troll_regenerates_even_after_attacking() {
        let mut state = arena(12, 10, Pos::new(5, 5));
        let troll = spawn(&mut state, Role::Troll, 14, 5, Pos::new(6, 5));
        state.enemies[troll].hp = 10;
        let mut game = GameLoop::new(state);

        game.tick(Command::Wait);
        assert_eq!(game.state().player.hp, 15, "troll melee landed");
        assert_eq!(game.state().enemies[troll].hp, 11);
    }

    #[test]
    fn test_enemy_steps_open_unlocked_doors_only() {
        let mut state = arena(14, 10, Pos::new(2, 2));
        let goblin = spawn(&mut state, Role::Goblin, 8, 3, Pos::new(7, 5));

        let door_pos = Pos::new(8, 5);
        state.grid.place_door(door_pos);
        assert!(try_step(&mut state, goblin, door_pos));
        assert_eq!(state.enemies[goblin].pos, door_pos);
        assert!(state.grid.door_at(door_pos).unwrap().is_open());

        let locked_pos = Pos::new(9, 5);
        state.grid.place_door(locked_pos);
        state.grid.door_at_mut(locked_pos).unwrap().lock();
        assert!(!try_step(&mut state, goblin, locked_pos));
        assert_eq!(state.enemies[goblin].pos, door_pos);
        assert!(!state.grid.door_at(locked_pos).unwrap().is_open());
    }

    #[test]
    fn test_phase_stops_when_player_dies() {
        let mut state = arena(12, 10, Pos::new(5, 5));
        state.player.hp = 3;
        spawn(&mut state, Role::Troll, 14, 5, Pos::new(6, 5));
        spawn(&mut state, Role::Goblin, 8, 3, Pos::new(4, 5));
        let mut game = GameLoop::new(state);

        let result = game.tick(Command::Wait);
        assert_eq!(result, crate::TickResult::PlayerDied);
        assert_eq!(game.state().phase, GamePhase::GameOver);
        // Only the troll got to swing.
        assert_eq!(game.state().metrics.damage_taken, 5);
    }
}
