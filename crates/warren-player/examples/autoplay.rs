//! Batch unattended runs, one JSON line per session.
//!
//!     cargo run --example autoplay -- --seed 1337 --runs 20 --tier 2

use anyhow::Result;
use clap::Parser;

use warren_core::dungeon::MapKind;
use warren_core::{NewGameConfig, Tier};
use warren_player::session::{Outcome, SessionConfig, run_session};

#[derive(Parser, Debug)]
#[command(name = "autoplay", about = "Let the bot play warren unattended")]
struct Args {
    /// First seed; consecutive runs use seed, seed+1, ...
    #[arg(long, default_value_t = 1337)]
    seed: u64,

    #[arg(long, default_value_t = 1)]
    runs: u32,

    #[arg(long, default_value_t = 40)]
    width: i32,

    #[arg(long, default_value_t = 20)]
    height: i32,

    #[arg(long, default_value_t = 8)]
    enemies: u32,

    /// Difficulty tier: 1, 2 or 3.
    #[arg(long, default_value_t = 1)]
    tier: u8,

    /// Generate caves instead of rooms-and-corridors.
    #[arg(long)]
    caves: bool,

    #[arg(long, default_value_t = 2000)]
    max_turns: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let tier = match args.tier {
        3 => Tier::Nightmare,
        2 => Tier::Hard,
        _ => Tier::Normal,
    };

    let mut victories = 0u32;
    for i in 0..args.runs {
        let config = SessionConfig {
            setup: NewGameConfig {
                seed: args.seed + u64::from(i),
                width: args.width,
                height: args.height,
                enemy_count: args.enemies,
                tier,
                map_kind: if args.caves { MapKind::Caves } else { MapKind::Rooms },
            },
            max_turns: args.max_turns,
        };
        let result = run_session(&config);
        if result.outcome == Outcome::Victory {
            victories += 1;
        }
        println!("{}", serde_json::to_string(&result)?);
    }
    eprintln!("{victories}/{} runs reached the exit", args.runs);
    Ok(())
}
