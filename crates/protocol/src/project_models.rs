//! Typed schema for reV project configuration files.
//!
//! These structures mirror the sections of a project config such as
//! `templates/project.ini`. They are deserialized from a parsed
//! [`Document`](crate::value_models::Document) through serde.

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Accepts either a single value or a list of values.
///
/// `years = 2012` and `years = 2012, 2013` both deserialize to a `Vec`.
pub fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(items) => items,
        OneOrMany::One(item) => vec![item],
    })
}

fn default_logging_level() -> String {
    "INFO".to_string()
}

/// The complete project configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    pub project: ProjectSection,

    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    pub analysis: AnalysisConfig,

    pub execution_control: ExecutionControl,

    /// Technology name (e.g. `pv`, `csp`) to its parameters.
    #[serde(default)]
    pub technologies: BTreeMap<String, TechnologyConfig>,

    #[serde(default)]
    pub outputs: Option<OutputsConfig>,

    /// Task name to its dependency hints.
    #[serde(default)]
    pub pipeline: BTreeMap<String, PipelineTask>,
}

/// The `[project]` section: naming and directory layout.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProjectSection {
    pub name: String,
    pub directory: String,
    pub output_directory: String,
    pub log_directory: String,

    /// One of `DEBUG`, `INFO`, `WARNING`, `ERROR`, `CRITICAL`.
    #[serde(default = "default_logging_level")]
    pub logging_level: String,

    /// Primary technology analyzed by the run.
    pub tech: String,

    /// Save capacity factor time-series profiles.
    #[serde(default)]
    pub write_profiles: bool,
}

/// The `[database]` section.
///
/// The password is stored in plaintext in the file; callers printing a
/// config should redact it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(default)]
    pub password: Option<String>,
    pub dbname: String,
    #[serde(default)]
    pub schema: Option<String>,
}

/// The `[analysis]` section.
///
/// `resource_files[i]` is the resource file for `years[i]`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    #[serde(deserialize_with = "one_or_many")]
    pub years: Vec<i32>,

    #[serde(deserialize_with = "one_or_many")]
    pub resource_files: Vec<String>,

    /// Path to the project points CSV.
    pub project_points: String,

    /// Optional `(start, stop)` slice of sites to analyze.
    #[serde(default)]
    pub site_range: Option<(u64, u64)>,
}

/// Where and how the compute runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionOption {
    Local,
    /// PBS-scheduled HPC.
    Peregrine,
    /// SLURM-scheduled HPC.
    Eagle,
}

impl ExecutionOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionOption::Local => "local",
            ExecutionOption::Peregrine => "peregrine",
            ExecutionOption::Eagle => "eagle",
        }
    }

    /// Whether the option submits jobs to an HPC scheduler.
    pub fn is_hpc(&self) -> bool {
        !matches!(self, ExecutionOption::Local)
    }
}

impl fmt::Display for ExecutionOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(ExecutionOption::Local),
            "peregrine" => Ok(ExecutionOption::Peregrine),
            "eagle" => Ok(ExecutionOption::Eagle),
            other => Err(format!("execution option not recognized: \"{other}\"")),
        }
    }
}

/// The `[execution_control]` section.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExecutionControl {
    /// Raw option string; see [`ExecutionControl::execution_option`].
    pub option: String,
    #[serde(default)]
    pub nodes: Option<u32>,
    /// Processes per node.
    #[serde(default)]
    pub ppn: Option<u32>,
    #[serde(default)]
    pub sites_per_core: Option<u32>,
    /// HPC allocation account.
    #[serde(default)]
    pub alloc: Option<String>,
    #[serde(default)]
    pub queue: Option<String>,
    /// Node feature request, e.g. `64GB`.
    #[serde(default)]
    pub feature: Option<String>,
    /// Walltime in hours.
    #[serde(default)]
    pub walltime: Option<f64>,
    /// Node memory in GB.
    #[serde(default)]
    pub memory: Option<u32>,
}

impl ExecutionControl {
    /// Parse the option string.
    pub fn execution_option(&self) -> Result<ExecutionOption, String> {
        self.option.parse()
    }
}

/// Parameters for a single technology, e.g. `[technologies] [[pv]]`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TechnologyConfig {
    /// SAM config ID to SAM config file path.
    #[serde(default)]
    pub sam_files: BTreeMap<String, String>,
    #[serde(default)]
    pub capacity_mw: Option<f64>,
    #[serde(default)]
    pub financial: Option<FinancialConfig>,
    #[serde(default)]
    pub resource_classes: Option<ResourceClasses>,
    #[serde(default)]
    pub exclusions: Option<ExclusionConfig>,
}

/// Inputs to the fixed-charge-rate LCOE.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FinancialConfig {
    pub fixed_charge_rate: f64,
    /// Dollars.
    pub capital_cost: f64,
    /// Dollars per year.
    pub fixed_operating_cost: f64,
    /// Dollars per MWh.
    pub variable_operating_cost: f64,
}

/// Resource class binning of a summary variable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResourceClasses {
    /// Variable to bin, e.g. `mean_ghi`.
    pub variable: String,
    /// `(low, high)` bounds of each class, in class order.
    pub bins: Vec<(f64, f64)>,
}

/// Exclusion settings: a file of rasters plus one subsection per layer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExclusionConfig {
    /// Exclusions HDF5 file holding the layers.
    pub excl_file: String,
    /// `queen` or `rook` contiguity for the minimum area filter.
    #[serde(default)]
    pub area_filter_kernel: Option<String>,
    /// Minimum contiguous area in km².
    #[serde(default)]
    pub min_area: Option<f64>,
    /// Layer name to its rule. Every other key of the section is a layer.
    #[serde(flatten)]
    pub layers: BTreeMap<String, ExclusionLayer>,
}

/// Exclusion rule for one raster layer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ExclusionLayer {
    #[serde(default)]
    pub exclude_values: Option<Vec<i64>>,
    #[serde(default)]
    pub include_values: Option<Vec<i64>>,
    /// `(min, max)`; `None` leaves that side unbounded.
    #[serde(default)]
    pub include_range: Option<(Option<f64>, Option<f64>)>,
    /// Fraction of an included pixel that counts as available.
    #[serde(default)]
    pub inclusion_weight: Option<f64>,
}

impl ExclusionLayer {
    /// Whether any masking rule is set.
    pub fn has_rule(&self) -> bool {
        self.exclude_values.is_some()
            || self.include_values.is_some()
            || self.include_range.is_some()
    }
}

/// The `[outputs]` section.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OutputsConfig {
    #[serde(default, deserialize_with = "one_or_many")]
    pub output_request: Vec<String>,
    /// Output variable name to its storage conversion.
    #[serde(default)]
    pub units: BTreeMap<String, UnitConversion>,
}

/// How an output variable is scaled and stored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UnitConversion {
    pub units: String,
    pub scale_factor: f64,
    pub dtype: String,
}

/// One orchestrated task and the tasks it waits for.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PipelineTask {
    /// Module config file for the task.
    #[serde(default)]
    pub config: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub depends_on: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_option_from_str() {
        assert_eq!("local".parse(), Ok(ExecutionOption::Local));
        assert_eq!("Eagle".parse(), Ok(ExecutionOption::Eagle));
        assert!("slurm".parse::<ExecutionOption>().is_err());
        assert!(ExecutionOption::Peregrine.is_hpc());
        assert!(!ExecutionOption::Local.is_hpc());
    }
}
