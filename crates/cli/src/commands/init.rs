use colored::Colorize;
use rck_core::init::{generate_project, InitOptions};
use std::path::PathBuf;
use std::process::ExitCode;

pub async fn run(dir: PathBuf, force: bool, minimal: bool) -> color_eyre::Result<ExitCode> {
    let options = InitOptions {
        target_dir: dir,
        force,
        minimal,
    };
    let path = generate_project(options).await?;
    println!("{} {}", "created".green().bold(), path.display());
    Ok(ExitCode::SUCCESS)
}
