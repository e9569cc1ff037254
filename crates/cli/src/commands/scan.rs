use colored::Colorize;
use rck_core::config::loader::scan_dir;
use rck_core::config::ScanStatus;
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;

pub fn run(dir: &Path) -> color_eyre::Result<ExitCode> {
    let found = scan_dir(dir)?;
    debug!(dir = %dir.display(), files = found.len(), "scanned directory");
    if found.is_empty() {
        println!("no configuration files in {}", dir.display());
        return Ok(ExitCode::SUCCESS);
    }

    for config in &found {
        let name = config.path.display().to_string();
        match &config.status {
            ScanStatus::Parsed {
                sections,
                entries,
                max_depth,
            } => println!(
                "{} {name}: {sections} sections, {entries} keys, depth {max_depth}",
                "ok".green().bold()
            ),
            ScanStatus::Invalid { reason } => {
                println!("{} {name}: {reason}", "invalid".red().bold())
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
