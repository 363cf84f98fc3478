// Standalone replay tool for analyzing decision logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                  Replay all turns
//   --turns <turn1,turn2>  Replay specific turns (comma-separated)
//   --validate             Check logged actions against expected ones
//   --verbose              Show detailed output for each turn
//   --config <path>        Path to Engine.toml (default: Engine.toml)

use std::env;
use std::process;

use quoridor_engine::config::Config;
use quoridor_engine::replay::{parse_action, ReplayEngine};
use quoridor_engine::types::Action;

fn print_usage() {
    eprintln!("Decision Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay all turns in the log");
    eprintln!("  --turns <T1,T2,...>     Replay specific turns (comma-separated)");
    eprintln!("  --validate <T:A,...>    Validate expected actions (format: turn:action,...)");
    eprintln!("  --verbose               Show detailed output for each turn");
    eprintln!("  --config <path>         Path to Engine.toml (default: Engine.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("ACTIONS:");
    eprintln!("  x-y                     Token move to (x, y)");
    eprintln!("  h2@x-y / v3@x-y         Horizontal / vertical wall of the given length");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  replay engine_debug.jsonl --all");
    eprintln!("  replay engine_debug.jsonl --turns 5,10,15");
    eprintln!("  replay engine_debug.jsonl --validate 0:4-1,3:4-2|h2@3-6");
}

fn parse_turns(s: &str) -> Result<Vec<u32>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<u32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", t, e))
        })
        .collect()
}

fn parse_expected_actions(s: &str) -> Result<Vec<(u32, Vec<Action>)>, String> {
    s.split(',')
        .map(|pair| {
            let parts: Vec<&str> = pair.trim().split(':').collect();
            if parts.len() != 2 {
                return Err(format!("Invalid format '{}'. Expected 'turn:action'", pair));
            }

            let turn = parts[0]
                .parse::<u32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", parts[0], e))?;

            // Support multiple acceptable actions separated by '|'
            let actions: Result<Vec<Action>, String> = parts[1].split('|').map(parse_action).collect();

            Ok((turn, actions?))
        })
        .collect()
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) { 0 } else { 1 });
    }

    let log_file = &args[1];
    let mut config_path = "Engine.toml".to_string();
    let mut verbose = false;
    let mut mode: Option<(&str, Option<String>)> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--all" => {
                mode = Some(("all", None));
            }
            "--turns" | "--validate" | "--config" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: {} requires an argument", args[i]);
                    process::exit(1);
                }
                let value = args[i + 1].clone();
                match args[i].as_str() {
                    "--turns" => mode = Some(("turns", Some(value))),
                    "--validate" => mode = Some(("validate", Some(value))),
                    _ => config_path = value,
                }
                i += 1;
            }
            "--verbose" => {
                verbose = true;
            }
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let (mode, mode_arg) = match mode {
        Some(m) => m,
        None => {
            eprintln!("Error: Must specify --all, --turns, or --validate");
            print_usage();
            process::exit(1);
        }
    };

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Loaded configuration from: {}", config_path);
    println!("Replay log file: {}", log_file);
    println!();

    let engine = ReplayEngine::new(config, verbose);

    let entries = match engine.load_log_file(log_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading log file: {}", e);
            process::exit(1);
        }
    };

    if entries.is_empty() {
        eprintln!("Error: Log file is empty");
        process::exit(1);
    }

    println!("Loaded {} log entries\n", entries.len());

    let mode_arg = mode_arg.unwrap_or_default();
    match mode {
        "all" => {
            println!("Replaying all {} turns...\n", entries.len());
            let results = engine.replay_all(&entries);
            engine.print_report(&results);
        }
        "turns" => {
            let turns = parse_turns(&mode_arg).unwrap_or_else(|e| {
                eprintln!("Error parsing turns: {}", e);
                process::exit(1);
            });

            println!("Replaying {} specific turn(s)...\n", turns.len());
            match engine.replay_turns(&entries, &turns) {
                Ok(results) => engine.print_report(&results),
                Err(e) => {
                    eprintln!("Error during replay: {}", e);
                    process::exit(1);
                }
            }
        }
        "validate" => {
            let expected = parse_expected_actions(&mode_arg).unwrap_or_else(|e| {
                eprintln!("Error parsing expected actions: {}", e);
                process::exit(1);
            });

            println!("Validating {} expected action(s)...\n", expected.len());
            match engine.validate_expected_actions(&entries, &expected) {
                Ok(()) => println!("✓ All expected actions validated successfully!"),
                Err(e) => {
                    eprintln!("✗ Validation failed: {}", e);
                    process::exit(1);
                }
            }
        }
        _ => unreachable!(),
    }
}
