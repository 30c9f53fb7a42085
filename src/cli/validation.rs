// validation.rs - Input validation utilities

use std::str::FromStr;
use regex::Regex;
use crate::cli::args::Args;
use crate::core::{DistanceModel, PipelineOptions, SkylineParams, TieBreak, TreeMethod};
use crate::data::loaders::DEFAULT_DATE_PATTERN;

const MATRIX_FORMATS: [&str; 4] = ["tsv", "csv", "phylip", "nexus"];

#[derive(Debug)]
pub struct ValidationResult {
    pub options: PipelineOptions,
    pub date_pattern: Regex,
    pub matrix_format: String,
}

/// Validate all command line arguments
pub fn validate_args(args: &Args) -> Result<ValidationResult, String> {
    if args.fasta.is_none() {
        return Err("--fasta is required (or set `fasta` in the config file)".to_string());
    }

    // Validate enums
    let tree_method = TreeMethod::from_str(&args.tree_method)?;
    let distance_model = DistanceModel::from_str(&args.distance_model)?;
    let tie_break = TieBreak::from_str(&args.tie_break)?;

    let matrix_format = args.format.to_lowercase();
    if !MATRIX_FORMATS.contains(&matrix_format.as_str()) {
        return Err(format!(
            "Unsupported output format: {}. Use: {}",
            args.format,
            MATRIX_FORMATS.join(", ")
        ));
    }

    // Validate thresholds
    if !(0.0..=1.0).contains(&args.min_clock_r2) {
        return Err("Minimum clock r2 must be between 0.0 and 1.0".to_string());
    }
    if !args.non_coalescent_scale.is_finite() || args.non_coalescent_scale <= 0.0 {
        return Err("Non-coalescent scale must be a positive number".to_string());
    }
    if args.threads == Some(0) {
        return Err("Number of threads must be at least 1".to_string());
    }

    // Compile date pattern
    let pattern = args.date_pattern.as_deref().unwrap_or(DEFAULT_DATE_PATTERN);
    let date_pattern = Regex::new(pattern).map_err(|e| format!("Invalid date_pattern regex: {}", e))?;

    let options = PipelineOptions {
        run_clock: !args.no_clock,
        run_skyline: !args.no_skyline,
        run_selection: !args.no_selection,
        min_clock_r2: args.min_clock_r2,
        distance_model,
        tree_method,
        tie_break,
        skyline: SkylineParams { non_coalescent_scale: args.non_coalescent_scale },
    };

    Ok(ValidationResult { options, date_pattern, matrix_format })
}
