//! Embedded project templates.
//!
//! This module uses `rust-embed` to embed the workspace `templates/`
//! directory into the binary at compile time:
//! - `CARGO_MANIFEST_DIR` = `crates/core`
//! - `../../templates` = workspace root `templates/`
//!
//! With the `debug-embed` feature, debug builds embed the files too, so
//! tests see the same content as release builds.

use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../templates"]
pub struct TemplateAssets;

/// Get template file content by name, e.g. `"project.ini"`.
///
/// # Example
/// ```
/// use rck_core::init::templates::get_template;
///
/// let project = get_template("project.ini").expect("project.ini should exist");
/// assert!(project.contains("[execution_control]"));
/// ```
pub fn get_template(path: &str) -> Option<String> {
    TemplateAssets::get(path).map(|file| String::from_utf8_lossy(file.data.as_ref()).to_string())
}

/// List embedded template names starting with `prefix`, sorted.
pub fn list_templates(prefix: &str) -> Vec<String> {
    let mut names: Vec<String> = TemplateAssets::iter()
        .filter(|path| path.starts_with(prefix))
        .map(|path| path.to_string())
        .collect();
    names.sort();
    names
}
