// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs, Debug)]
/// phylodyn - Phylodynamic analysis of dated sequence alignments
pub struct Args {
    /// path to aligned sequences in FASTA format
    #[argh(option)]
    pub fasta: Option<String>,

    /// two-column file (id, date) with sampling dates (.tsv or .csv); overrides header dates
    #[argh(option)]
    pub dates: Option<String>,

    /// output directory for all result files
    #[argh(option)]
    pub output_dir: Option<String>,

    /// regex extracting the sampling date from FASTA ids, first capture group (default: trailing |YYYY, |YYYY.ff or |YYYY-MM-DD)
    #[argh(option)]
    pub date_pattern: Option<String>,

    /// tree method: upgma, nj (default: upgma)
    #[argh(option, default = "String::from(\"upgma\")")]
    pub tree_method: String,

    /// distance model: jc69, p-distance (default: jc69)
    #[argh(option, default = "String::from(\"jc69\")")]
    pub distance_model: String,

    /// tie-break rule for equal minimum distances: first, last (default: first)
    #[argh(option, default = "String::from(\"first\")")]
    pub tie_break: String,

    /// distance matrix format: tsv, csv, phylip, nexus (default: tsv)
    #[argh(option, default = "String::from(\"tsv\")")]
    pub format: String,

    /// minimum root-to-tip r2 required to accept the clock (0.0-1.0, default: 0.5)
    #[argh(option, default = "0.5")]
    pub min_clock_r2: f64,

    /// multiplier applied to Ne for skyline intervals without a coalescence (default: 10)
    #[argh(option, default = "10.0")]
    pub non_coalescent_scale: f64,

    /// skip the molecular clock regression (also disables the skyline)
    #[argh(switch)]
    pub no_clock: bool,

    /// skip the skyline estimate
    #[argh(switch)]
    pub no_skyline: bool,

    /// skip the dN/dS selection estimate
    #[argh(switch)]
    pub no_selection: bool,

    /// number of threads (default: auto-detect)
    #[argh(option)]
    pub threads: Option<usize>,

    /// load and validate inputs without running the analysis
    #[argh(switch)]
    pub dry_run: bool,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,
}
