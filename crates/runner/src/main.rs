use hearth_runner::{HousingSimulation, RunConfig};

fn print_help() {
    eprintln!(
        r#"Hearth - housing market simulation

USAGE:
    hearth [OPTIONS]

OPTIONS:
    --config <PATH>     Load run configuration from JSON file
    --ticks <N>         Number of years to simulate
    --seed <N>          Random seed for a reproducible run
    --export <PATH>     Write the metrics history to a JSON file
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (default: info)

EXAMPLES:
    # Run with defaults
    hearth

    # Reproducible 100 year run with exported history
    hearth --ticks 100 --seed 42 --export history.json

    # Run with config file
    hearth --config run.json
"#
    );
}

/// Value following a flag, or exit with a usage error
fn flag_value(args: &[String], i: usize, flag: &str) -> String {
    match args.get(i) {
        Some(value) => value.clone(),
        None => {
            eprintln!("Error: {} requires an argument", flag);
            std::process::exit(1);
        }
    }
}

fn parse_number(value: &str, flag: &str) -> u64 {
    match value.parse() {
        Ok(n) => n,
        Err(_) => {
            eprintln!("Error: {} expects a non-negative integer, got '{}'", flag, value);
            std::process::exit(1);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut ticks: Option<u64> = None;
    let mut seed: Option<u64> = None;
    let mut export_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                config_path = Some(flag_value(&args, i, "--config"));
            }
            "--ticks" => {
                i += 1;
                ticks = Some(parse_number(&flag_value(&args, i, "--ticks"), "--ticks"));
            }
            "--seed" => {
                i += 1;
                seed = Some(parse_number(&flag_value(&args, i, "--seed"), "--seed"));
            }
            "--export" => {
                i += 1;
                export_path = Some(flag_value(&args, i, "--export"));
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = match config_path {
        Some(path) => {
            log::info!("Loading configuration from: {}", path);
            RunConfig::from_file(&path)?
        }
        None => {
            log::info!("Using default configuration");
            RunConfig::default()
        }
    };

    // Command line flags override the file
    if let Some(ticks) = ticks {
        config = config.with_ticks(ticks);
    }
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    if let Some(path) = export_path {
        config = config.with_export_path(path);
    }

    let mut simulation = HousingSimulation::new(config)?;
    let results = simulation.run()?;
    let stats = &results.final_statistics;

    println!("Run {} finished after {} years", results.run_id, results.ticks);
    println!(
        "  participants: {} ({} housed, {} entered, {} exited)",
        stats.total_participants, stats.housed, results.total_entries, results.total_exits
    );
    println!(
        "  dwellings:    {} ({:.1}% occupied, mean value {:.0})",
        stats.total_dwellings,
        stats.occupancy_rate * 100.0,
        stats.mean_dwelling_value
    );
    println!(
        "  wealth:       mean {:.0}, gini {:.3}, top decile share {:.3}",
        stats.mean_wealth, stats.gini, stats.top_decile_share
    );
    println!("  sales:        {}", results.total_sales);
    if let Some(path) = &results.export_path {
        println!("  history:      {}", path.display());
    }

    Ok(())
}
