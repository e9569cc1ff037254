use color_eyre::eyre::eyre;
use rck_core::config::loader::load_document;
use rck_core::writer;
use rck_protocol::value_models::Document;
use std::path::Path;
use std::process::ExitCode;

/// Values print in their compact form. Sections print as INI with the
/// section as the new root, or as a JSON object.
pub fn run(file: &Path, path: &str, json: bool) -> color_eyre::Result<ExitCode> {
    let doc = load_document(file)?;

    if let Some(value) = doc.lookup(path) {
        if json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{value}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let section = doc
        .section_at(path)
        .ok_or_else(|| eyre!("no value or section at '{path}' in {}", file.display()))?;
    if json {
        println!("{}", serde_json::to_string_pretty(section)?);
    } else {
        let sub = Document {
            root: section.clone(),
        };
        print!("{}", writer::to_string(&sub)?);
    }
    Ok(ExitCode::SUCCESS)
}
