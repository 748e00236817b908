//! Whole-engine properties: determinism over command scripts, visibility
//! bounds during play, damage accounting.

use proptest::prelude::*;

use warren_core::action::{Command, Direction};
use warren_core::{GameLoop, GameState, NewGameConfig, Pos, SimConfig, Tier};

fn command_strategy() -> impl Strategy<Value = Command> {
    prop_oneof![
        4 => prop_oneof![
            Just(Direction::North),
            Just(Direction::South),
            Just(Direction::East),
            Just(Direction::West),
        ].prop_map(Command::Move),
        1 => Just(Command::Wait),
        1 => Just(Command::UseItem),
    ]
}

fn setup(seed: u64) -> NewGameConfig {
    NewGameConfig {
        seed,
        ..Default::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Same seed + same command script => bit-identical simulation state.
    #[test]
    fn runs_are_deterministic(
        seed in any::<u64>(),
        script in proptest::collection::vec(command_strategy(), 1..120),
    ) {
        let mut a = GameLoop::new(GameState::new_game(setup(seed), SimConfig::default()));
        let mut b = GameLoop::new(GameState::new_game(setup(seed), SimConfig::default()));
        for cmd in &script {
            a.tick(*cmd);
            b.tick(*cmd);
        }
        let (sa, sb) = (a.state(), b.state());
        prop_assert_eq!(sa.turn, sb.turn);
        prop_assert_eq!(sa.phase, sb.phase);
        prop_assert_eq!(&sa.player, &sb.player);
        prop_assert_eq!(&sa.enemies, &sb.enemies);
        prop_assert_eq!(&sa.items, &sb.items);
        prop_assert_eq!(sa.inventory, sb.inventory);
        prop_assert_eq!(&sa.metrics, &sb.metrics);
    }

    /// Nothing outside the fov radius is ever marked visible, and hp
    /// stays within [0-damage bound, max_hp] territory for the player.
    #[test]
    fn visibility_and_hp_invariants_hold(
        seed in any::<u64>(),
        script in proptest::collection::vec(command_strategy(), 1..80),
    ) {
        let mut game = GameLoop::new(GameState::new_game(setup(seed), SimConfig::default()));
        for cmd in &script {
            game.tick(*cmd);
            let state = game.state();
            let radius = state.config.fov_radius;
            let origin = state.player.pos;
            for x in 0..state.grid.width {
                for y in 0..state.grid.height {
                    let pos = Pos::new(x, y);
                    if state.grid.is_visible(pos) {
                        prop_assert!(
                            origin.distance_sq(pos) <= radius * radius,
                            "{pos:?} visible beyond radius"
                        );
                        prop_assert!(state.grid.is_explored(pos));
                    }
                }
            }
            prop_assert!(state.player.hp <= state.player.max_hp);
            for enemy in &state.enemies {
                prop_assert!(enemy.hp <= enemy.max_hp);
            }
        }
    }
}

#[test]
fn harder_tiers_spawn_more_enemies() {
    let counts: Vec<usize> = [Tier::Normal, Tier::Hard, Tier::Nightmare]
        .into_iter()
        .map(|tier| {
            let state = GameState::new_game(
                NewGameConfig {
                    seed: 7,
                    tier,
                    ..Default::default()
                },
                SimConfig::default(),
            );
            state.enemies.len()
        })
        .collect();
    assert!(counts[0] < counts[1]);
    assert!(counts[1] < counts[2]);
}

#[test]
fn config_fov_radius_applies_to_play() {
    let overrides = warren_core::Overrides::from_json_str(r#"{"fov_radius": 4}"#).unwrap();
    let config = SimConfig::with_overrides(&overrides);
    let mut game = GameLoop::new(GameState::new_game(setup(11), config));
    game.tick(Command::Wait);

    let state = game.state();
    let origin = state.player.pos;
    for x in 0..state.grid.width {
        for y in 0..state.grid.height {
            let pos = Pos::new(x, y);
            if state.grid.is_visible(pos) {
                assert!(origin.distance_sq(pos) <= 16);
            }
        }
    }
}
