//! `revcfg`: inspect and check nested INI project configurations.

mod commands;
mod logging;

use clap::{Parser, Subcommand};
use rck_core::convert::Format;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "revcfg", version)]
#[command(about = "Parse, check and convert reV project configuration files")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a project file and report schema and consistency problems
    Check {
        file: PathBuf,

        /// Merge repeated sections instead of rejecting them
        #[arg(long)]
        merge_duplicates: bool,
    },

    /// Print the value or section at a dotted path
    Get {
        file: PathBuf,

        /// e.g. `technologies.pv.financial.fixed_charge_rate`
        path: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the whole file in another format
    Dump {
        file: PathBuf,

        /// ini, json, toml or yaml
        #[arg(long, short, default_value = "ini")]
        format: Format,

        /// Print passwords and tokens instead of masking them
        #[arg(long)]
        show_secrets: bool,
    },

    /// List configuration files in a directory
    Scan { dir: PathBuf },

    /// Write a starter project.ini
    Init {
        /// Directory to write into
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Overwrite an existing project.ini
        #[arg(long)]
        force: bool,

        /// Write only the required sections
        #[arg(long)]
        minimal: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Check {
            file,
            merge_duplicates,
        } => commands::check::run(&file, merge_duplicates).await,
        Commands::Get { file, path, json } => commands::get::run(&file, &path, json),
        Commands::Dump {
            file,
            format,
            show_secrets,
        } => commands::dump::run(&file, format, show_secrets),
        Commands::Scan { dir } => commands::scan::run(&dir),
        Commands::Init {
            dir,
            force,
            minimal,
        } => commands::init::run(dir, force, minimal).await,
    }
}
