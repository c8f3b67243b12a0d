//! anime-shelf - Plan library paths for downloaded anime episodes
//!
//! Usage:
//!   anime-shelf <command> [options]
//!   anime-shelf --help

use anime_shelf_core::OrganizerConfig;
use tracing_subscriber::EnvFilter;

mod cli;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        cli::print_help();
        return Ok(());
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("anime-shelf v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let (command, options) = match cli::parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            cli::print_help();
            std::process::exit(1);
        }
    };

    let config = match &options.config {
        Some(path) => OrganizerConfig::load_from(path)?,
        None => OrganizerConfig::load(),
    };

    init_logging(&config.log_level);
    tracing::debug!("Using config: {:?}", config);

    cli::run(command, options, &config)
}

fn init_logging(default_level: &str) {
    // Logs go to stderr so stdout stays clean for --json output
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
