//! Consistency checks for a typed project configuration.
//!
//! Deserialization already guarantees the shape of each section. The checks
//! here cover rules that span fields or sections, such as matching years to
//! resource files or ordering pipeline tasks by their dependencies.

use rck_protocol::project_models::{ExecutionOption, ProjectConfig, TechnologyConfig};
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// One finding, located by the dotted path of the offending field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
    /// Pipeline tasks in an order that respects `depends_on`. Empty when the
    /// dependencies are broken.
    pub pipeline_order: Vec<String>,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Error, path, message);
    }

    fn warning(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Warning, path, message);
    }

    fn push(&mut self, severity: Severity, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(Issue {
            severity,
            path: path.into(),
            message: message.into(),
        });
    }
}

/// A year must follow a non-digit and end the text or precede a non-digit.
static YEAR_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[^0-9]([1-2][0-9]{3})(?:$|[^0-9])").ok());

/// Extract the last four-digit year (1000-2999) that follows a non-digit
/// and is not followed by one.
///
/// A year at the very start of the text is not recognised.
///
/// ```
/// use rck_core::validate::parse_year;
///
/// assert_eq!(parse_year("/data/nsrdb_ri_2013.h5"), Some(2013));
/// assert_eq!(parse_year("2013.h5"), None);
/// assert_eq!(parse_year("points_12345.csv"), None);
/// ```
pub fn parse_year(name: &str) -> Option<i32> {
    let re = YEAR_PATTERN.as_ref()?;
    let mut year = None;
    let mut start = 0;
    while let Some(caps) = re.captures_at(name, start) {
        let m = caps.get(1)?;
        year = m.as_str().parse().ok();
        start = m.end();
    }
    year
}

/// Run every check against `config`.
pub fn validate_project(config: &ProjectConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    check_project(config, &mut report);
    check_analysis(config, &mut report);
    check_execution(config, &mut report);
    for (name, tech) in &config.technologies {
        check_technology(name, tech, &mut report);
    }
    check_database(config, &mut report);
    report.pipeline_order = check_pipeline(config, &mut report);
    report
}

fn check_project(config: &ProjectConfig, report: &mut ValidationReport) {
    let tech = &config.project.tech;
    if !config.technologies.contains_key(tech) {
        report.error(
            "project.tech",
            format!("no [[{tech}]] section under [technologies]"),
        );
    }
}

fn check_analysis(config: &ProjectConfig, report: &mut ValidationReport) {
    let analysis = &config.analysis;
    if analysis.years.len() != analysis.resource_files.len() {
        report.error(
            "analysis.resource_files",
            format!(
                "{} years but {} resource files",
                analysis.years.len(),
                analysis.resource_files.len()
            ),
        );
    }
    for (i, (year, file)) in analysis
        .years
        .iter()
        .zip(&analysis.resource_files)
        .enumerate()
    {
        if file.contains(&year.to_string()) {
            continue;
        }
        let found = match parse_year(file) {
            Some(other) => format!(" (file is for {other})"),
            None => String::new(),
        };
        report.error(
            format!("analysis.resource_files[{i}]"),
            format!("'{file}' does not match year {year}{found}"),
        );
    }
    if let Some((start, stop)) = analysis.site_range {
        if start >= stop {
            report.error(
                "analysis.site_range",
                format!("start {start} must be below stop {stop}"),
            );
        }
    }
}

fn check_execution(config: &ProjectConfig, report: &mut ValidationReport) {
    let exec = &config.execution_control;
    let option = match exec.execution_option() {
        Ok(option) => option,
        Err(message) => {
            report.error("execution_control.option", message);
            return;
        }
    };
    match option {
        ExecutionOption::Local => {
            if exec.ppn == Some(0) {
                report.error("execution_control.ppn", "local runs need ppn >= 1");
            }
        }
        ExecutionOption::Peregrine | ExecutionOption::Eagle => {
            if exec.nodes.unwrap_or(0) < 1 {
                report.error(
                    "execution_control.nodes",
                    format!("{option} runs need nodes >= 1"),
                );
            }
            if exec.alloc.as_deref().map_or(true, str::is_empty) {
                report.error(
                    "execution_control.alloc",
                    format!("{option} runs need an allocation"),
                );
            }
        }
    }
}

fn check_technology(name: &str, tech: &TechnologyConfig, report: &mut ValidationReport) {
    let base = format!("technologies.{name}");

    if let Some(fin) = &tech.financial {
        if !(fin.fixed_charge_rate > 0.0 && fin.fixed_charge_rate <= 1.0) {
            report.warning(
                format!("{base}.financial.fixed_charge_rate"),
                format!("{} is outside (0, 1]", fin.fixed_charge_rate),
            );
        }
        for (field, cost) in [
            ("capital_cost", fin.capital_cost),
            ("fixed_operating_cost", fin.fixed_operating_cost),
            ("variable_operating_cost", fin.variable_operating_cost),
        ] {
            if cost < 0.0 {
                report.error(
                    format!("{base}.financial.{field}"),
                    format!("cost cannot be negative ({cost})"),
                );
            }
        }
    }

    if let Some(classes) = &tech.resource_classes {
        for (i, (low, high)) in classes.bins.iter().enumerate() {
            if low >= high {
                report.error(
                    format!("{base}.resource_classes.bins[{i}]"),
                    format!("bin ({low}, {high}) must have low < high"),
                );
            }
        }
    }

    if let Some(excl) = &tech.exclusions {
        for (layer_name, layer) in &excl.layers {
            let path = format!("{base}.exclusions.{layer_name}");
            if !layer.has_rule() {
                report.error(
                    path.clone(),
                    "layer needs exclude_values, include_values or include_range",
                );
            }
            if let Some((Some(min), Some(max))) = layer.include_range {
                if min > max {
                    report.error(
                        format!("{path}.include_range"),
                        format!("min {min} is greater than max {max}"),
                    );
                }
            }
        }
    }
}

fn check_database(config: &ProjectConfig, report: &mut ValidationReport) {
    let password = config
        .database
        .as_ref()
        .and_then(|db| db.password.as_deref());
    if password.is_some_and(|p| !p.is_empty()) {
        report.warning(
            "database.password",
            "password is stored in plaintext; prefer an environment variable",
        );
    }
}

/// Check dependency references and return a topological order of tasks.
///
/// Ready tasks are taken in name order so the result is deterministic.
fn check_pipeline(config: &ProjectConfig, report: &mut ValidationReport) -> Vec<String> {
    let tasks = &config.pipeline;
    let mut broken = false;
    let mut pending: BTreeMap<&str, usize> = BTreeMap::new();
    let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

    for (name, task) in tasks {
        let deps: BTreeSet<&str> = task.depends_on.iter().map(String::as_str).collect();
        for dep in &deps {
            if !tasks.contains_key(*dep) {
                report.error(
                    format!("pipeline.{name}.depends_on"),
                    format!("unknown task '{dep}'"),
                );
                broken = true;
            } else if *dep == name.as_str() {
                report.error(
                    format!("pipeline.{name}.depends_on"),
                    "task depends on itself",
                );
                broken = true;
            }
            dependents.entry(*dep).or_default().push(name);
        }
        pending.insert(name, deps.len());
    }
    if broken {
        return Vec::new();
    }

    let mut ready: BTreeSet<&str> = pending
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(name, _)| *name)
        .collect();
    let mut order = Vec::with_capacity(tasks.len());
    while let Some(name) = ready.pop_first() {
        order.push(name.to_string());
        for next in dependents.get(name).into_iter().flatten() {
            if let Some(count) = pending.get_mut(*next) {
                *count -= 1;
                if *count == 0 {
                    ready.insert(*next);
                }
            }
        }
    }

    if order.len() < tasks.len() {
        let stuck: Vec<&str> = pending
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(name, _)| *name)
            .collect();
        report.error(
            "pipeline",
            format!("dependency cycle among: {}", stuck.join(", ")),
        );
        return Vec::new();
    }
    order
}
