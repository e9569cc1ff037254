use colored::Colorize;
use rck_core::config::loader::load_project_with;
use rck_core::parser::{DuplicatePolicy, ParseOptions};
use rck_core::validate::{validate_project, Severity};
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;

pub async fn run(file: &Path, merge_duplicates: bool) -> color_eyre::Result<ExitCode> {
    let options = ParseOptions {
        duplicate_sections: if merge_duplicates {
            DuplicatePolicy::Merge
        } else {
            DuplicatePolicy::Reject
        },
    };

    debug!(path = %file.display(), policy = ?options.duplicate_sections, "checking project");
    let project = match load_project_with(file, &options).await {
        Ok(project) => project,
        Err(e) => {
            debug!(path = %e.path().display(), "project failed to load");
            println!("{} {e}", "error".red().bold());
            return Ok(ExitCode::FAILURE);
        }
    };

    let doc = &project.document;
    println!(
        "{} {}: {} sections, {} keys, depth {}",
        "parsed".green().bold(),
        file.display(),
        doc.root.section_count(),
        doc.root.entry_count(),
        doc.max_depth()
    );

    let report = validate_project(&project.config);
    for issue in &report.issues {
        let label = match issue.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
        };
        println!("{label} {}: {}", issue.path.bold(), issue.message);
    }

    if !report.pipeline_order.is_empty() {
        println!("pipeline order: {}", report.pipeline_order.join(" -> "));
    }

    let errors = report.errors().count();
    let warnings = report.warnings().count();
    println!("{errors} error(s), {warnings} warning(s)");

    Ok(if errors > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
