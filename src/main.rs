//! Protocell CLI - Run evolution from JSON configuration.

use std::fs;
use std::path::PathBuf;

use protocell::{
    engine::{EvolutionEngine, SnapshotWriter},
    schema::SimulationConfig,
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [rounds] [--snapshots <dir>]", args[0]);
        eprintln!();
        eprintln!("Run protocell evolution from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json       Path to simulation configuration file");
        eprintln!("  rounds            Selection rounds (default: from config)");
        eprintln!("  --snapshots <dir> Write per-round cell snapshots as JSON");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let mut positional = Vec::new();
    let mut snapshot_dir: Option<PathBuf> = None;
    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        if arg == "--snapshots" {
            match rest.next() {
                Some(dir) => snapshot_dir = Some(PathBuf::from(dir)),
                None => {
                    eprintln!("--snapshots requires a directory argument");
                    std::process::exit(1);
                }
            }
        } else {
            positional.push(arg.clone());
        }
    }

    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let mut config: SimulationConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    if let Some(rounds) = positional.first().and_then(|s| s.parse().ok()) {
        config.population.rounds = rounds;
    }

    let writer = snapshot_dir.map(|dir| {
        SnapshotWriter::new(&dir).unwrap_or_else(|e| {
            eprintln!("Error creating snapshot directory: {}", e);
            std::process::exit(1);
        })
    });

    println!("Protocell Evolution");
    println!("===================");
    println!("Genome size: {}", config.genome_size);
    println!("Traits: {}", config.traits.len());
    println!(
        "Population: {} initial cells, {} children per parent, cap {}",
        config.population.initial_cells,
        config.population.children_per_parent,
        config.population.retention_cap
    );
    println!("Rounds: {}", config.population.rounds);
    println!();

    let mut engine = EvolutionEngine::new(config).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });

    println!("Ideal sequences:");
    let mut ideals: Vec<(&str, &str)> = engine.ideals().iter().collect();
    ideals.sort();
    for (name, seq) in ideals {
        println!("  {}: {}", name, seq);
    }
    println!();

    let result = engine.run_with_callback(|report| {
        print!("{}", report.render());
        if let Some(writer) = &writer {
            if let Err(e) = writer.write_round(report.round, &report.survivors) {
                eprintln!("Error writing snapshot: {}", e);
                std::process::exit(1);
            }
        }
    });

    println!();
    println!("Final population: {} cells", result.survivors.len());
    println!("Total evaluations: {}", result.stats.total_evaluations);
    if result.stats.best_total_score.is_finite() {
        println!("Best total score: {:.4}", result.stats.best_total_score);
    }
    println!(
        "Time: {:.2}s ({:.1} rounds/s)",
        result.stats.elapsed_seconds,
        result.stats.rounds as f64 / result.stats.elapsed_seconds
    );
}

fn print_example_config() {
    let config = SimulationConfig::default();
    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
}
