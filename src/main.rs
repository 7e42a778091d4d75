//! Karabiner Combiner CLI
//!
//! Entry point for the `karabiner-combine` command-line tool.

use clap::{Args, Parser, Subcommand};
use karabiner_combiner::{BuildReport, CliOverrides, Combiner, RuleCatalog, Settings};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "karabiner-combine")]
#[command(about = "Assemble karabiner.json from a body and ordered rules", version)]
struct Cli {
    /// Log progress to stderr (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Combine the body and rules, then write every destination
    Build {
        #[command(flatten)]
        settings: SettingsArgs,

        /// Print the merged karabiner.json to stdout instead of writing it
        #[arg(long, conflicts_with = "json")]
        dry_run: bool,

        /// Print a JSON build report
        #[arg(long)]
        json: bool,
    },

    /// Compare the rules directory with the configured rule list
    Check {
        #[command(flatten)]
        settings: SettingsArgs,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved settings
    Config {
        #[command(flatten)]
        settings: SettingsArgs,
    },
}

#[derive(Args)]
struct SettingsArgs {
    /// Path to settings file (default: ./combine.toml if present).
    /// Relative paths inside it resolve against the file's own directory
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Body of karabiner.json
    #[arg(long)]
    base: Option<PathBuf>,

    /// Directory holding rule files
    #[arg(long)]
    rules_dir: Option<PathBuf>,

    /// Rule file name, repeatable; replaces the configured list in the given order
    #[arg(long = "rule", short = 'r')]
    rules: Vec<String>,

    /// Destination path, repeatable; replaces the configured destinations
    #[arg(long = "output", short = 'o')]
    outputs: Vec<PathBuf>,
}

impl SettingsArgs {
    fn resolve(self) -> Settings {
        let cli = CliOverrides {
            base: self.base,
            rules_dir: self.rules_dir,
            rules: (!self.rules.is_empty()).then_some(self.rules),
            destinations: (!self.outputs.is_empty()).then_some(self.outputs),
        };

        match Settings::resolve(self.config.as_deref(), &cli) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Error loading settings: {}", e);
                process::exit(1);
            }
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            settings,
            dry_run,
            json,
        } => run_build(settings.resolve(), dry_run, json),
        Commands::Check { settings, json } => run_check(settings.resolve(), json),
        Commands::Config { settings } => run_config(settings.resolve()),
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "karabiner_combiner=info,karabiner_combine=info"
    } else {
        "karabiner_combiner=warn,karabiner_combine=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_build(settings: Settings, dry_run: bool, json_output: bool) {
    tracing::info!(
        base = %settings.base.display(),
        rules_dir = %settings.rules_dir.display(),
        rules = settings.rules.len(),
        "combining"
    );

    let combiner = match Combiner::new(&settings.base, &settings.rules_dir, &settings.rules) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let report = if dry_run {
        match combiner.to_pretty_json() {
            Ok(text) => print!("{}", text),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
        BuildReport::dry_run(&combiner)
    } else {
        match combiner.save_all(&settings.destinations) {
            Ok(outputs) => BuildReport::new(&combiner, outputs),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
    };

    if json_output {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                process::exit(1);
            }
        }
    } else if !dry_run {
        print!("{}", report.to_human());
    }
}

fn run_check(settings: Settings, json_output: bool) {
    let catalog = match RuleCatalog::scan(&settings.rules_dir, &settings.rules) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if json_output {
        match serde_json::to_string_pretty(&catalog) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        print!("{}", catalog.to_human());
    }

    if !catalog.is_complete() {
        process::exit(1);
    }
}

fn run_config(settings: Settings) {
    match settings.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing settings: {}", e);
            process::exit(1);
        }
    }
}
