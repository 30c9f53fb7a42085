// config.rs - Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    // Input/Output
    pub fasta: Option<String>,
    pub dates: Option<String>,
    pub output_dir: Option<String>,
    pub date_pattern: Option<String>,
    pub format: Option<String>,

    // Inference
    pub tree_method: Option<String>,
    pub distance_model: Option<String>,
    pub tie_break: Option<String>,
    pub min_clock_r2: Option<f64>,
    pub non_coalescent_scale: Option<f64>,

    // Stages
    pub run_clock: Option<bool>,
    pub run_skyline: Option<bool>,
    pub run_selection: Option<bool>,

    // Performance
    pub threads: Option<usize>,

    // Flags
    pub dry_run: Option<bool>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        println!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(path, content)
            .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))?;

        println!("📄 Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# phylodyn.toml - Configuration file for phylodyn
# Command line arguments will override these settings

# =============================================================================
# INPUT/OUTPUT
# =============================================================================

# Aligned sequences (FASTA)
fasta = "/path/to/alignment.fasta"

# Optional two-column dates file (id, date); .csv is comma separated, else tab
# dates = "/path/to/dates.tsv"

# Output directory for distances, trees, skyline, selection and summary.json
output_dir = "phylodyn_output"

# Regex extracting the sampling date from FASTA ids (first capture group)
# date_pattern = '\|(\d{4}(?:\.\d+)?|\d{4}-\d{2}-\d{2})$'

# Distance matrix format: tsv, csv, phylip, nexus
format = "tsv"

# =============================================================================
# INFERENCE
# =============================================================================

# Tree method: upgma, nj
tree_method = "upgma"

# Distance model: jc69, p-distance
distance_model = "jc69"

# Tie-break rule for equal minimum distances: first, last
tie_break = "first"

# Minimum root-to-tip r2 required to accept the molecular clock
min_clock_r2 = 0.5

# Ne multiplier for skyline intervals that do not end in a coalescence
non_coalescent_scale = 10.0

# =============================================================================
# STAGES
# =============================================================================

run_clock = true
run_skyline = true
run_selection = true

# =============================================================================
# PERFORMANCE
# =============================================================================

# Number of threads (omit for auto-detection)
# threads = 8

# =============================================================================
# FLAGS
# =============================================================================

# Validate inputs without computation (dry run)
dry_run = false
"#
        .to_string()
    }
}
