use annotation_integrator::cli::{resolve_config, Cli, Commands};
use annotation_integrator::utils::parallel::configure_thread_pool;
use annotation_integrator::IntegratorError;
use clap::Parser;
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    // RUST_LOG wins over ANNOTATION_LOG when both are set
    let log_level = std::env::var("ANNOTATION_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);

        let exit_code = match e.downcast_ref::<IntegratorError>() {
            Some(IntegratorError::Config(_)) => 2,
            Some(IntegratorError::Io(_)) => 3,
            Some(IntegratorError::Parse(_)) => 4,
            Some(IntegratorError::MissingInput(_)) => 5,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let num_threads = configure_thread_pool(cli.threads)
        .map_err(|e| IntegratorError::Other(format!("Failed to initialize thread pool: {}", e)))?;

    if cli.verbose > 0 {
        eprintln!("Using {} threads", num_threads);
    }

    let config = resolve_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Normalize(args) => annotation_integrator::cli::commands::normalize::run(args, &config),
        Commands::Filter(args) => annotation_integrator::cli::commands::filter::run(args, &config),
        Commands::Analyze(args) => annotation_integrator::cli::commands::analyze::run(args, &config),
    }
}
