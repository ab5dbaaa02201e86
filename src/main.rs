// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Gridreach CLI - bounded greedy expansion over a regional power grid

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use gridreach::commands::{self, DataArgs, Output};
use gridreach::config;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

#[derive(Parser)]
#[command(name = "gridreach")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "GRIDREACH_CONFIG", global = true)]
    config: Option<std::path::PathBuf>,

    /// Disable colored output
    #[arg(
        long,
        env = "NO_COLOR",
        global = true,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    no_color: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand from every city in the selected areas and write the report
    #[command(visible_alias = "analyze")]
    Analyse {
        #[command(flatten)]
        data: DataArgs,

        /// Directory to write the report to
        #[arg(short, long)]
        output_dir: Option<std::path::PathBuf>,

        /// Run expansions one after another
        #[arg(long)]
        sequential: bool,
    },

    /// Grow and trace the network of a single city
    Expand {
        /// Starting city
        city: String,

        #[command(flatten)]
        data: DataArgs,

        /// Also write a Graphviz rendering of the network
        #[arg(long)]
        dot: Option<std::path::PathBuf>,
    },

    /// Show the effective configuration
    Config {
        /// Configuration key (omit to show everything)
        key: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = config::load(cli.config.as_deref())?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 if cli.quiet => tracing::Level::ERROR,
        0 => config.log_level.parse().unwrap_or(tracing::Level::INFO),
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::from_level(log_level).into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let output = Output {
        json: cli.json,
        color: !cli.no_color,
    };

    // Execute command
    match cli.command {
        Commands::Analyse {
            data,
            output_dir,
            sequential,
        } => {
            data.apply(&mut config);
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            if sequential {
                config.parallel = false;
            }
            commands::analyse::run(&config, output)
        }
        Commands::Expand { city, data, dot } => {
            data.apply(&mut config);
            commands::expand::run(&config, &city, dot, output)
        }
        Commands::Config { key } => commands::config::run(&config, key.as_deref()),
        Commands::Completions { shell } => commands::completions::run(shell, &mut Cli::command()),
    }
}
