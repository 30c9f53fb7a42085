// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        // Input/Output
        if self.fasta.is_none() {
            self.fasta = config.fasta;
        }
        if self.dates.is_none() {
            self.dates = config.dates;
        }
        if self.output_dir.is_none() {
            self.output_dir = config.output_dir;
        }
        if self.date_pattern.is_none() {
            self.date_pattern = config.date_pattern;
        }

        // Settings with defaults (only override defaults, not explicit CLI values)
        if let Some(format) = config.format {
            if self.format == "tsv" {
                self.format = format;
            }
        }
        if let Some(method) = config.tree_method {
            if self.tree_method == "upgma" {
                self.tree_method = method;
            }
        }
        if let Some(model) = config.distance_model {
            if self.distance_model == "jc69" {
                self.distance_model = model;
            }
        }
        if let Some(rule) = config.tie_break {
            if self.tie_break == "first" {
                self.tie_break = rule;
            }
        }
        if let Some(r2) = config.min_clock_r2 {
            if self.min_clock_r2 == 0.5 {
                self.min_clock_r2 = r2;
            }
        }
        if let Some(scale) = config.non_coalescent_scale {
            if self.non_coalescent_scale == 10.0 {
                self.non_coalescent_scale = scale;
            }
        }

        // Stages (config can only turn a stage off)
        if config.run_clock == Some(false) {
            self.no_clock = true;
        }
        if config.run_skyline == Some(false) {
            self.no_skyline = true;
        }
        if config.run_selection == Some(false) {
            self.no_selection = true;
        }

        // Performance
        if self.threads.is_none() {
            self.threads = config.threads;
        }

        // Flags
        if !self.dry_run && config.dry_run.unwrap_or(false) {
            self.dry_run = true;
        }

        self
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<Self, String> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }
}
