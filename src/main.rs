//! CLI entry point for the bucket puzzle solver.
//!
//! Usage:
//!   bucket-solver solve <puzzle.json> [options]
//!   bucket-solver solve --stdin [options]
//!   bucket-solver hardest [--max-capacity <n>]
//!
//! The puzzle document is JSON:
//!   {"capacities": [5, 3], "target": 4}
//!   {"capacities": [10, 7, 4], "initial": [10, 0, 0], "target": 2,
//!    "allowRefills": false}
//!
//! `initial` defaults to all buckets empty. Results are printed as JSON, or
//! as a one-line tuple rendering with `--pretty`. Exit codes: 0 solved,
//! 1 no solution, 2 invalid input.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use bucket_solver::{
    breadth_first_search, hardest_puzzle, render_path, PuzzleConfig, SearchResult, State,
};

#[derive(Parser)]
#[command(name = "bucket-solver")]
#[command(about = "Shortest-path solver for the generalized water bucket puzzle")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a puzzle and print the shortest action sequence
    Solve {
        /// Path to puzzle JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read puzzle from stdin instead of a file
        #[arg(long)]
        stdin: bool,

        /// Print the path as a single tuple line instead of JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Scan two-bucket puzzles for the one with the deepest shortest solution
    Hardest {
        /// Upper bound for capacities and target in the scan
        #[arg(long, default_value = "10")]
        max_capacity: u32,

        /// Print the path as a single tuple line instead of JSON
        #[arg(long)]
        pretty: bool,
    },
}

/// Puzzle document read from file or stdin.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PuzzleInput {
    capacities: Vec<u32>,
    /// Starting levels; all buckets empty when absent.
    #[serde(default)]
    initial: Option<Vec<u32>>,
    target: u32,
    #[serde(default = "default_allow_refills")]
    allow_refills: bool,
}

fn default_allow_refills() -> bool {
    true
}

/// JSON output of the solve subcommand.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<Vec<Vec<u32>>>,
    states_explored: usize,
    time_elapsed_ms: u64,
}

/// JSON output of the hardest subcommand.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HardestOutput {
    capacities: Vec<u32>,
    target: u32,
    moves: usize,
    path: Vec<Vec<u32>>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            file,
            stdin,
            pretty,
        } => match run_solve(file, stdin) {
            Ok(result) => {
                if pretty {
                    println!(
                        "{}",
                        render_path(result.path.as_deref().unwrap_or_default())
                    );
                } else {
                    let output = format_result(&result);
                    println!("{}", serde_json::to_string_pretty(&output).unwrap());
                }
                if result.is_solved() {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::from(1)
                }
            }
            Err(message) => {
                eprintln!("Error: {message}");
                ExitCode::from(2)
            }
        },

        Commands::Hardest {
            max_capacity,
            pretty,
        } => match hardest_puzzle(max_capacity) {
            Some((config, path)) => {
                if pretty {
                    println!(
                        "State({:?}, {}) in {} moves",
                        config.capacities,
                        config.target,
                        path.len() - 1
                    );
                    println!("{}", render_path(&path));
                } else {
                    let output = HardestOutput {
                        capacities: config.capacities.clone(),
                        target: config.target,
                        moves: path.len() - 1,
                        path: path.iter().map(|state| state.levels().to_vec()).collect(),
                    };
                    println!("{}", serde_json::to_string_pretty(&output).unwrap());
                }
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("Error: no solvable puzzle within the scanned range");
                ExitCode::from(2)
            }
        },
    }
}

fn run_solve(file: Option<PathBuf>, stdin: bool) -> Result<SearchResult, String> {
    let json_content = if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("failed to read from stdin: {e}"))?;
        buffer
    } else if let Some(path) = file {
        fs::read_to_string(&path).map_err(|e| format!("failed to read file {path:?}: {e}"))?
    } else {
        return Err("must provide either a file path or --stdin".to_string());
    };

    let input: PuzzleInput =
        serde_json::from_str(&json_content).map_err(|e| format!("invalid puzzle JSON: {e}"))?;

    let config = PuzzleConfig::new(input.capacities, input.target, input.allow_refills)
        .map_err(|e| e.to_string())?;
    let initial = match input.initial {
        Some(levels) => State::new(&levels, &config).map_err(|e| e.to_string())?,
        None => State::empty(&config),
    };

    Ok(breadth_first_search(&config, initial))
}

fn format_result(result: &SearchResult) -> SolveOutput {
    SolveOutput {
        solved: result.is_solved(),
        moves: result.moves(),
        path: result.path.as_ref().map(|path| {
            path.iter()
                .map(|state| state.levels().to_vec())
                .collect()
        }),
        states_explored: result.states_explored,
        time_elapsed_ms: result.time_elapsed_ms,
    }
}
