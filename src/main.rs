//! Aeon - Command Line Interface
//!
//! A small demonstration binary: birth a reservoir, feed it a synthetic
//! signal, train the readout, and report the fit. Not part of the engine's
//! public contract -- the library crate is the actual deliverable.
//!
//! # Usage
//!
//! ```bash
//! aeon demo
//! aeon demo --seed 42
//! aeon info <snapshot-path>
//! aeon info <snapshot-path> --json
//! ```

use aeon_core::core::DefaultCore;
use aeon_core::numeric::{from_f32, to_f32, Scalar};
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();
    let config = parse_args(&args);

    match config.mode {
        Mode::Demo { seed } => run_demo(seed),
        Mode::Info { path, json } => run_info(&path, json),
        Mode::Help => print_help(),
        Mode::Version => print_version(),
    }
}

#[derive(Debug)]
enum Mode {
    Demo { seed: u32 },
    Info { path: String, json: bool },
    Help,
    Version,
}

#[derive(Debug)]
struct Config {
    mode: Mode,
}

fn parse_args(args: &[String]) -> Config {
    if args.len() == 1 {
        return Config {
            mode: Mode::Demo { seed: 1 },
        };
    }

    match args[1].as_str() {
        "--help" | "-h" => Config { mode: Mode::Help },
        "--version" | "-v" => Config {
            mode: Mode::Version,
        },
        "demo" => {
            let seed = args
                .iter()
                .position(|a| a == "--seed")
                .and_then(|i| args.get(i + 1))
                .and_then(|s| s.parse().ok())
                .unwrap_or(1);
            Config {
                mode: Mode::Demo { seed },
            }
        }
        "info" => {
            if args.len() < 3 {
                eprintln!("Error: info requires a snapshot path");
                std::process::exit(1);
            }
            let json = args.iter().any(|a| a == "--json");
            Config {
                mode: Mode::Info {
                    path: args[2].clone(),
                    json,
                },
            }
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!("Try 'aeon --help'");
            std::process::exit(1);
        }
    }
}

fn run_demo(seed: u32) {
    println!("Aeon v{} - reservoir demo", aeon_core::VERSION);

    let mut core = DefaultCore::birth(seed);
    println!(
        "birthed core: seed={} certificate={}",
        seed,
        core.certificate().hash_string()
    );

    let samples = 300usize;
    let washout = 50usize;
    let raw: Vec<f32> = (0..=samples).map(|i| (0.1 * i as f32).sin()).collect();
    let inputs: Vec<[Scalar; 1]> = raw[..samples].iter().map(|&v| [from_f32(v)]).collect();
    let targets: Vec<[Scalar; 1]> = raw[1..=samples].iter().map(|&v| [from_f32(v)]).collect();

    match aeon_core::training::train(&mut core, &inputs, &targets, washout) {
        Ok(mse) => println!("trained on {samples} samples (washout {washout}), mse={mse:.6}"),
        Err(err) => {
            eprintln!("training failed: {err}");
            std::process::exit(1);
        }
    }

    core.update(&inputs[inputs.len() - 1]);
    let prediction = core.predict();
    println!("next-step prediction: {:.4}", to_f32(prediction[0]));
    println!(
        "memory usage: {} bytes, samples processed: {}",
        core.memory_usage(),
        core.samples_processed()
    );
}

fn run_info(path: &str, json: bool) {
    match DefaultCore::load(path) {
        Ok(core) => {
            let cert = core.certificate();
            if json {
                match serde_json::to_string_pretty(cert) {
                    Ok(text) => println!("{text}"),
                    Err(err) => {
                        eprintln!("failed to serialize certificate: {err}");
                        std::process::exit(1);
                    }
                }
                return;
            }
            println!("snapshot: {path}");
            println!("  certificate: {}", cert.hash_string());
            println!("  reservoir_seed: {}", cert.reservoir_seed);
            println!("  reservoir_size: {}", cert.reservoir_size);
            println!("  version: {:#06x}", cert.version);
            println!("  is_trained: {}", core.is_trained());
            println!("  learning_sessions: {}", core.learning_sessions());
            println!("  samples_processed: {}", core.samples_processed());
        }
        Err(err) => {
            eprintln!("failed to load {path}: {err}");
            std::process::exit(1);
        }
    }
}

fn print_help() {
    println!("Aeon v{}", aeon_core::VERSION);
    println!();
    println!("USAGE:");
    println!("    aeon [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("    demo [--seed <N>]   Birth, train and predict on a sine wave");
    println!("    info <path> [--json]   Print a snapshot's certificate and state");
    println!("    -h, --help          Print help information");
    println!("    -v, --version       Print version information");
}

fn print_version() {
    println!("aeon {}", aeon_core::VERSION);
}
