use rck_core::config::loader::load_document;
use rck_core::convert::{render, Format};
use rck_core::redact::redact;
use std::path::Path;
use std::process::ExitCode;

pub fn run(file: &Path, format: Format, show_secrets: bool) -> color_eyre::Result<ExitCode> {
    let doc = load_document(file)?;
    let doc = if show_secrets { doc } else { redact(&doc) };
    print!("{}", render(&doc, format)?);
    Ok(ExitCode::SUCCESS)
}
