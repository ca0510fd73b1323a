use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tally::cli::args::{Cli, Commands};
use tally::cli::commands;
use tally::config::{Config, Paths};
use tally::tracker;

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tally=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        print!("{}", commands::completions(shell)?);
        return Ok(());
    }

    let paths = match cli.data_dir {
        Some(dir) => Paths::with_root(dir),
        None => Paths::new()?,
    };
    let config = Config::load_from_path(&paths.config_file)
        .with_context(|| format!("Failed to load {}", paths.config_file.display()))?;
    config.general.color.apply();
    let format = cli.output.unwrap_or(config.general.default_output);

    let mut store = tracker::open(&paths)
        .with_context(|| format!("Failed to open {}", paths.database.display()))?;

    let output = match cli.command {
        Commands::Add { name, start } => commands::add(&mut store, &name, start, format)?,
        Commands::List { search } => commands::list(&store, search.as_deref(), format)?,
        Commands::Start { task } => commands::start(&mut store, &task, format)?,
        Commands::Stop => commands::stop(&mut store, format)?,
        Commands::Toggle { task } => commands::toggle(&mut store, &task, format)?,
        Commands::Status { watch: true } => {
            commands::watch_status(&mut store, config.display.refresh_interval())?;
            String::new()
        },
        Commands::Status { watch: false } => commands::status(&store, format)?,
        Commands::Rename { task, name } => commands::rename(&mut store, &task, &name, format)?,
        Commands::Delete { task, force } => commands::delete(&mut store, &task, force, format)?,
        Commands::History { task, limit } => commands::history(
            &store,
            task.as_deref(),
            limit.unwrap_or(config.display.history_limit),
            format,
        )?,
        Commands::Today => commands::today(&store, format)?,
        Commands::Tui => {
            tally::tui::run(&mut store, &config)?;
            String::new()
        },
        Commands::Completions { shell } => commands::completions(shell)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
