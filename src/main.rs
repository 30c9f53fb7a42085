// main.rs - CLI entry point

use std::path::Path;
use std::time::Instant;
use phylodyn::cli::Config;
use phylodyn::output::write_results;
use phylodyn::prelude::*;

/// Output directory used when neither the CLI nor the config names one
const DEFAULT_OUTPUT_DIR: &str = "phylodyn_output";

fn main() {
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), String> {
    let mut args: Args = argh::from_env();
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");

    // Handle generate config first
    if args.generate_config {
        let sample_config = Config::generate_sample();
        println!("{}", sample_config);
        println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    // Load configuration file if specified
    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
    }

    let validation = validate_args(&args)?;
    let options = &validation.options;
    let fasta = args.fasta.as_deref().ok_or("--fasta is required")?;
    let output_dir = args.output_dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR);

    println!("🚀 phylodyn v{}", env!("CARGO_PKG_VERSION"));
    println!("🌳 Tree: {}", options.tree_method.description());
    println!("📏 Distance: {}", options.distance_model.description());

    // Configure thread pool
    if let Some(n) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
        println!("🧵 Threads: {}", n);
    } else {
        println!("🧵 Threads: {} (auto-detected)", rayon::current_num_threads());
    }

    let total_start = Instant::now();

    // Load sequences and dates
    let mut sequences = SequenceSet::from_fasta(Path::new(fasta), Some(&validation.date_pattern))?;
    if let Some(dates_path) = &args.dates {
        let dates = load_dates(Path::new(dates_path))?;
        let matched = sequences.apply_dates(&dates);
        println!("📅 Applied dates to {}/{} sequences", matched, sequences.len());
        if matched < dates.len() {
            println!("⚠️  Warning: {} dates did not match any sequence id", dates.len() - matched);
        }
    }

    let alignment_length = sequences.validate_alignment()?;
    println!("🧬 Alignment: {} sequences × {} sites", sequences.len(), alignment_length);
    match sequences.date_range() {
        Some((first, last)) => println!("📅 Sampling dates: {} dated, {:.3} to {:.3}", sequences.dated_count(), first, last),
        None => println!("⚠️  Warning: no sampling dates found; the clock and skyline will be skipped"),
    }
    if sequences.dated_count() < 2 && options.run_clock {
        println!("⚠️  Warning: fewer than 2 dated sequences, no clock can be estimated");
    }

    if args.dry_run {
        println!("✅ Dry run completed successfully");
        return Ok(());
    }

    // Analysis
    let matrix = compute_distance_matrix_with_progress(&sequences.sequences, options.distance_model)?;
    println!("🔄 Building tree and running analyses...");
    let result = analyze_with_matrix(&sequences.sequences, &matrix, options)?;
    report(&result, options);

    let written = write_results(output_dir, &validation.matrix_format, &matrix, &result, &command_line)?;

    let total_elapsed = total_start.elapsed();
    println!("\n🎉 === PHYLODYN COMPLETED SUCCESSFULLY ===");
    println!("⏱️  Total execution time: {:.2}s", total_elapsed.as_secs_f64());
    println!("📁 {} files written to: {}", written.len(), output_dir);
    println!("🔧 Command: {}", command_line);
    Ok(())
}

/// Print a short account of each stage
fn report(result: &PhylodynamicsResult, options: &PipelineOptions) {
    let tree = &result.tree;
    println!("🌳 Tree: {} leaves, height {:.6}", tree.leaf_count, tree.height);
    if tree.clamped_branches > 0 {
        println!("⚠️  Warning: {} negative branch lengths clamped to 0", tree.clamped_branches);
    }

    match &result.clock_regression {
        Some(clock) if options.accepts_clock(clock) => {
            println!(
                "⏰ Clock accepted: rate {:.3e} subs/site/year, root age {:.2}, r² {:.3}",
                clock.rate, clock.root_age, clock.r2
            );
        }
        Some(clock) => {
            println!(
                "⏰ Clock rejected: rate {:.3e}, r² {:.3} (need rate > 0 and r² > {})",
                clock.rate, clock.r2, options.min_clock_r2
            );
            if options.tree_method == TreeMethod::Upgma && clock.rate == 0.0 {
                println!("💡 UPGMA trees are ultrametric; try --tree-method nj for root-to-tip regression");
            }
        }
        None => println!("⏭️  Clock: skipped"),
    }

    match &result.skyline {
        Some(skyline) => println!(
            "📈 Skyline: {} intervals over {:.2} years",
            skyline.intervals.len(),
            skyline.time_span
        ),
        None if options.run_skyline => println!("⏭️  Skyline: not computed (no accepted clock)"),
        None => println!("⏭️  Skyline: skipped"),
    }

    match &result.selection {
        Some(selection) => match selection.tree_dnds {
            Some(dnds) => println!(
                "🧪 Selection: tree dN/dS {:.3} over {} leaves",
                dnds,
                selection.branch_dnds.len()
            ),
            None => println!("🧪 Selection: no comparable codons"),
        },
        None => println!("⏭️  Selection: skipped"),
    }
}
