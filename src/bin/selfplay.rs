// Engine-vs-engine match runner
//
// Usage:
//   cargo run --release --bin selfplay -- [options]
//
// Options:
//   --random-plies <n>   Random legal plies before the engines take over (default: 0)
//   --seed <n>           Seed for the random opening (default: 0)
//   --max-plies <n>      Stop after this many engine plies (default: 200)
//   --sequential         Force sequential root search
//   --quiet              Only print the result
//   --config <path>      Path to Engine.toml (default: Engine.toml)

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::env;
use std::process;
use std::time::Instant;

use quoridor_engine::bot::Bot;
use quoridor_engine::config::Config;
use quoridor_engine::pathfinding::path_length;
use quoridor_engine::position_gen::random_position;
use quoridor_engine::search::{SearchMode, SearchSession};
use quoridor_engine::types::Side;

fn parse_number(args: &[String], i: usize, name: &str) -> u64 {
    args.get(i + 1)
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or_else(|| {
            eprintln!("Error: {} requires a numeric argument", name);
            process::exit(1);
        })
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut random_plies = 0usize;
    let mut seed = 0u64;
    let mut max_plies = 200usize;
    let mut sequential = false;
    let mut quiet = false;
    let mut config_path = "Engine.toml".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--random-plies" => {
                random_plies = parse_number(&args, i, "--random-plies") as usize;
                i += 1;
            }
            "--seed" => {
                seed = parse_number(&args, i, "--seed");
                i += 1;
            }
            "--max-plies" => {
                max_plies = parse_number(&args, i, "--max-plies") as usize;
                i += 1;
            }
            "--config" => {
                config_path = args.get(i + 1).cloned().unwrap_or_else(|| {
                    eprintln!("Error: --config requires an argument");
                    process::exit(1);
                });
                i += 1;
            }
            "--sequential" => sequential = true,
            "--quiet" => quiet = true,
            other => {
                eprintln!("Error: Unknown option '{}'", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        Config::default_hardcoded()
    });

    let mode = if sequential {
        SearchMode::Sequential
    } else {
        Bot::determine_mode(&config)
    };

    let mut rng = StdRng::seed_from_u64(seed);
    let (mut state, mut to_move) =
        random_position(&mut rng, random_plies, config.game_rules.wall_inventory, 0.3);
    let mut session = SearchSession::new(config.move_ordering.history_capacity);
    let match_start = Instant::now();

    println!("Mode: {:?}, depth: {}, random opening plies: {}", mode, config.search.depth, random_plies);
    if !quiet {
        println!("{}\n", state);
    }

    for ply in 0..max_plies {
        if let Some(winner) = Side::both().into_iter().find(|&s| path_length(&state, s).is_goal()) {
            println!(
                "Side {} wins after {} engine plies ({:.1}s)",
                winner,
                ply,
                match_start.elapsed().as_secs_f64()
            );
            return;
        }

        let decision = session.decide(&state, to_move, &config, mode);
        let action = match decision.action {
            Some(action) => action,
            None => {
                println!("Side {} has no playable action; stopping", to_move);
                process::exit(2);
            }
        };

        state = state.after(to_move, &action);
        if !quiet {
            println!("Ply {}: side {} plays {} (score {})", ply + 1, to_move, action, decision.score);
            println!("{}\n", state);
        }
        to_move = to_move.opponent();
    }

    println!("No winner after {} plies", max_plies);
}
