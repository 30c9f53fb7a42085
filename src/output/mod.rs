// mod.rs - Output formatters module

use std::fs::{File, create_dir_all};
use std::io::{BufWriter, Write};
use std::path::Path;
use serde::Serialize;
use crate::core::{
    ClockResidual, DistanceMatrix, PhylodynamicsResult, PhylogeneticTree, SelectionResult, SkylinePlot,
};

/// Ensure parent directory exists before creating file
fn ensure_parent_dir(file_path: &str) -> Result<(), String> {
    if let Some(parent) = Path::new(file_path).parent() {
        create_dir_all(parent)
            .map_err(|e| format!("Failed to create parent directory '{}': {}", parent.display(), e))?;
    }
    Ok(())
}

fn create_writer(file_path: &str) -> Result<BufWriter<File>, String> {
    ensure_parent_dir(file_path)?;
    let file = File::create(file_path)
        .map_err(|e| format!("Failed to create output file '{}': {}", file_path, e))?;
    Ok(BufWriter::new(file))
}

fn generated_at() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn format_distance(d: f64) -> String {
    format!("{:.6}", d)
}

/// Write distance matrix with a header row, using `sep` between fields
fn write_delimited(
    file_path: &str,
    matrix: &DistanceMatrix,
    command_line: &str,
    sep: char,
) -> Result<(), String> {
    let mut writer = create_writer(file_path)?;

    writeln!(writer, "# Command: {}", command_line).map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "# Generated: {}", generated_at()).map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "# phylodyn v{}", env!("CARGO_PKG_VERSION")).map_err(|e| format!("Write error: {}", e))?;

    write!(writer, "Sample").map_err(|e| format!("Write error: {}", e))?;
    for id in &matrix.ids {
        write!(writer, "{}{}", sep, id).map_err(|e| format!("Write error: {}", e))?;
    }
    writeln!(writer).map_err(|e| format!("Write error: {}", e))?;

    for (i, id) in matrix.ids.iter().enumerate() {
        write!(writer, "{}", id).map_err(|e| format!("Write error: {}", e))?;
        for d in &matrix.values[i] {
            write!(writer, "{}{}", sep, format_distance(*d)).map_err(|e| format!("Write error: {}", e))?;
        }
        writeln!(writer).map_err(|e| format!("Write error: {}", e))?;
    }

    writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    println!("✅ Distance matrix written to: {}", file_path);
    Ok(())
}

/// Write distance matrix in TSV format
pub fn write_tsv(file_path: &str, matrix: &DistanceMatrix, command_line: &str) -> Result<(), String> {
    write_delimited(file_path, matrix, command_line, '\t')
}

/// Write distance matrix in CSV format
pub fn write_csv(file_path: &str, matrix: &DistanceMatrix, command_line: &str) -> Result<(), String> {
    write_delimited(file_path, matrix, command_line, ',')
}

/// Write distance matrix in PHYLIP format (lower triangle)
pub fn write_phylip(file_path: &str, matrix: &DistanceMatrix, command_line: &str) -> Result<(), String> {
    let mut writer = create_writer(file_path)?;

    writeln!(writer, "    {}", matrix.len()).map_err(|e| format!("Write error: {}", e))?;
    for (i, id) in matrix.ids.iter().enumerate() {
        write!(writer, "{:<10}", id).map_err(|e| format!("Write error: {}", e))?;
        for d in &matrix.values[i][..=i] {
            write!(writer, "  {}", format_distance(*d)).map_err(|e| format!("Write error: {}", e))?;
        }
        writeln!(writer).map_err(|e| format!("Write error: {}", e))?;
    }

    // Trailing comments; PHYLIP readers stop after the matrix
    writeln!(writer).map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "# Command: {}", command_line).map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "# Generated: {}", generated_at()).map_err(|e| format!("Write error: {}", e))?;

    writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    println!("✅ Distance matrix written to: {} (PHYLIP format)", file_path);
    Ok(())
}

/// Write distance matrix in NEXUS format
pub fn write_nexus(file_path: &str, matrix: &DistanceMatrix, command_line: &str) -> Result<(), String> {
    let mut writer = create_writer(file_path)?;

    writeln!(writer, "#NEXUS").map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "[Command: {}]", command_line).map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "[Generated: {}]", generated_at()).map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "BEGIN DISTANCES;").map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "    DIMENSIONS NTAX={};", matrix.len()).map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "    FORMAT LABELS LOWER DIAGONAL;").map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "    MATRIX").map_err(|e| format!("Write error: {}", e))?;

    for (i, id) in matrix.ids.iter().enumerate() {
        write!(writer, "        {}", id).map_err(|e| format!("Write error: {}", e))?;
        for d in &matrix.values[i][..i] {
            write!(writer, " {}", format_distance(*d)).map_err(|e| format!("Write error: {}", e))?;
        }
        writeln!(writer).map_err(|e| format!("Write error: {}", e))?;
    }

    writeln!(writer, "    ;").map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "END;").map_err(|e| format!("Write error: {}", e))?;

    writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    println!("✅ Distance matrix written to: {} (NEXUS format)", file_path);
    Ok(())
}

/// File extension used for a matrix format
pub fn matrix_extension(format: &str) -> &'static str {
    match format.to_lowercase().as_str() {
        "csv" => "csv",
        "phylip" => "phy",
        "nexus" => "nex",
        _ => "tsv",
    }
}

/// Write distance matrix in the specified format
pub fn write_matrix(
    file_path: &str,
    format: &str,
    matrix: &DistanceMatrix,
    command_line: &str,
) -> Result<(), String> {
    match format.to_lowercase().as_str() {
        "tsv" => write_tsv(file_path, matrix, command_line),
        "csv" => write_csv(file_path, matrix, command_line),
        "phylip" => write_phylip(file_path, matrix, command_line),
        "nexus" => write_nexus(file_path, matrix, command_line),
        _ => Err(format!("Unsupported output format: {}. Use: tsv, csv, phylip, nexus", format)),
    }
}

/// Write a tree as a single Newick line
pub fn write_newick(file_path: &str, tree: &PhylogeneticTree) -> Result<(), String> {
    let mut writer = create_writer(file_path)?;
    writeln!(writer, "{}", tree.to_newick()).map_err(|e| format!("Write error: {}", e))?;
    writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    println!("✅ Tree written to: {}", file_path);
    Ok(())
}

/// Serialize rows with a header line through the csv writer
fn write_rows<T: Serialize>(file_path: &str, rows: &[T]) -> Result<(), String> {
    ensure_parent_dir(file_path)?;
    let mut writer = csv::Writer::from_path(file_path)
        .map_err(|e| format!("Failed to create output file '{}': {}", file_path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| format!("Write error: {}", e))?;
    }
    writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    Ok(())
}

/// Write one row per skyline interval
pub fn write_skyline_csv(file_path: &str, skyline: &SkylinePlot) -> Result<(), String> {
    write_rows(file_path, &skyline.intervals)?;
    println!("✅ Skyline ({} intervals) written to: {}", skyline.intervals.len(), file_path);
    Ok(())
}

/// Write the per-leaf root-to-tip regression residuals
pub fn write_residuals_csv(file_path: &str, residuals: &[ClockResidual]) -> Result<(), String> {
    write_rows(file_path, residuals)?;
    println!("✅ Clock residuals written to: {}", file_path);
    Ok(())
}

/// Write per-leaf dN/dS; an infinite ratio is written as `inf`
pub fn write_selection_csv(file_path: &str, selection: &SelectionResult) -> Result<(), String> {
    write_rows(file_path, &selection.branch_dnds)?;
    println!("✅ Selection estimates written to: {}", file_path);
    Ok(())
}

/// Condensed JSON view of a result. Non-finite numbers become `null`.
pub fn summary_json(result: &PhylodynamicsResult, command_line: &str) -> serde_json::Value {
    let tree_summary = |tree: &PhylogeneticTree| {
        serde_json::json!({
            "leaf_count": tree.leaf_count,
            "height": tree.height,
            "is_clock_calibrated": tree.is_clock_calibrated,
            "substitution_rate": tree.substitution_rate,
            "clock_r2": tree.clock_r2,
            "clamped_branches": tree.clamped_branches,
            "newick": tree.to_newick(),
        })
    };

    serde_json::json!({
        "generated": generated_at(),
        "version": env!("CARGO_PKG_VERSION"),
        "command": command_line,
        "tree": tree_summary(&result.tree),
        "calibrated_tree": result.calibrated_tree.as_ref().map(tree_summary),
        "clock_regression": result.clock_regression,
        "skyline": result.skyline,
        "selection": result.selection,
    })
}

/// Write the JSON summary of a full analysis
pub fn write_summary_json(
    file_path: &str,
    result: &PhylodynamicsResult,
    command_line: &str,
) -> Result<(), String> {
    let mut writer = create_writer(file_path)?;
    serde_json::to_writer_pretty(&mut writer, &summary_json(result, command_line))
        .map_err(|e| format!("Failed to serialize summary: {}", e))?;
    writeln!(writer).map_err(|e| format!("Write error: {}", e))?;
    writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    println!("✅ Summary written to: {}", file_path);
    Ok(())
}

/// Write every available artifact of an analysis into `output_dir`.
/// Returns the paths written.
pub fn write_results(
    output_dir: &str,
    matrix_format: &str,
    matrix: &DistanceMatrix,
    result: &PhylodynamicsResult,
    command_line: &str,
) -> Result<Vec<String>, String> {
    let dir = Path::new(output_dir);
    let path = |name: &str| dir.join(name).to_string_lossy().into_owned();
    let mut written = Vec::new();

    let matrix_path = path(&format!("distances.{}", matrix_extension(matrix_format)));
    write_matrix(&matrix_path, matrix_format, matrix, command_line)?;
    written.push(matrix_path);

    let tree_path = path("tree.nwk");
    write_newick(&tree_path, &result.tree)?;
    written.push(tree_path);

    if let Some(calibrated) = &result.calibrated_tree {
        let calibrated_path = path("tree_calibrated.nwk");
        write_newick(&calibrated_path, calibrated)?;
        written.push(calibrated_path);
    }

    if let Some(regression) = &result.clock_regression {
        if !regression.residuals.is_empty() {
            let residuals_path = path("clock_residuals.csv");
            write_residuals_csv(&residuals_path, &regression.residuals)?;
            written.push(residuals_path);
        }
    }

    if let Some(skyline) = &result.skyline {
        let skyline_path = path("skyline.csv");
        write_skyline_csv(&skyline_path, skyline)?;
        written.push(skyline_path);
    }

    if let Some(selection) = &result.selection {
        let selection_path = path("selection.csv");
        write_selection_csv(&selection_path, selection)?;
        written.push(selection_path);
    }

    let summary_path = path("summary.json");
    write_summary_json(&summary_path, result, command_line)?;
    written.push(summary_path);

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{analyze_phylodynamics, compute_distance_matrix, DistanceModel, PipelineOptions, TreeMethod};
    use crate::data::DatedSequence;

    fn sequences() -> Vec<DatedSequence> {
        vec![
            DatedSequence::new("s2020", "ATGAAAAAA", 2020.0),
            DatedSequence::new("s2021", "ATGAAAAAC", 2021.0),
            DatedSequence::new("s2022", "ATGAAAACC", 2022.0),
            DatedSequence::new("s2023", "ATGAAAACT", 2023.0),
        ]
    }

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("phylodyn-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_unknown_matrix_format() {
        let matrix = compute_distance_matrix(&sequences(), DistanceModel::Jc69).unwrap();
        assert!(write_matrix("unused.out", "xlsx", &matrix, "").is_err());
        assert_eq!(matrix_extension("PHYLIP"), "phy");
        assert_eq!(matrix_extension("tsv"), "tsv");
    }

    #[test]
    fn test_summary_json_nulls_non_finite() {
        let input = vec![
            DatedSequence::new("ref", "ATG", 2019.0),
            DatedSequence::new("mut", "ATA", 2020.0),
        ];
        let result = analyze_phylodynamics(&input, &PipelineOptions::default()).unwrap();
        let summary = summary_json(&result, "phylodyn --test");

        assert_eq!(summary["command"], "phylodyn --test");
        assert_eq!(summary["tree"]["leaf_count"], 2);
        assert!(summary["calibrated_tree"].is_null());
        // Met -> Ile has no synonymous change, so dN/dS is infinite
        assert!(summary["selection"]["branch_dnds"][0]["dnds"].is_null());
    }

    #[test]
    fn test_write_results_creates_files() {
        let dir = scratch_dir("results");
        let options = PipelineOptions { tree_method: TreeMethod::NeighborJoining, ..Default::default() };
        let matrix = compute_distance_matrix(&sequences(), options.distance_model).unwrap();
        let result = crate::core::analyze_with_matrix(&sequences(), &matrix, &options).unwrap();

        let written = write_results(dir.to_str().unwrap(), "tsv", &matrix, &result, "phylodyn").unwrap();
        for file in &written {
            assert!(Path::new(file).exists(), "missing {}", file);
        }
        assert!(written.iter().any(|f| f.ends_with("distances.tsv")));
        assert!(written.iter().any(|f| f.ends_with("summary.json")));

        let tsv = std::fs::read_to_string(dir.join("distances.tsv")).unwrap();
        let header = tsv.lines().find(|l| !l.starts_with('#')).unwrap();
        assert_eq!(header, "Sample\ts2020\ts2021\ts2022\ts2023");

        let newick = std::fs::read_to_string(dir.join("tree.nwk")).unwrap();
        assert!(newick.trim_end().ends_with(';'));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_phylip_lower_triangle() {
        let dir = scratch_dir("phylip");
        let matrix = compute_distance_matrix(&sequences(), DistanceModel::PDistance).unwrap();
        let file = dir.join("m.phy");
        write_phylip(file.to_str().unwrap(), &matrix, "").unwrap();

        let text = std::fs::read_to_string(&file).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0].trim(), "4");
        assert_eq!(lines[1].split_whitespace().count(), 2);
        assert_eq!(lines[4].split_whitespace().count(), 5);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
