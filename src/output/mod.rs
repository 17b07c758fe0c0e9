// mod.rs - Output formatting: PHYLIP-style distance + coverage matrices
// (spec §6 "External interfaces", §7 "Error handling design")

use std::fs::File;
use std::io::{self, BufWriter, Write};

use crate::core::bootstrap::BootstrapReplicate;
use crate::core::driver::{DiagnosticFlags, PairwiseTable};
use crate::core::mutation::{Model, MutationMatrix};

const NAME_WIDTH: usize = 10;

fn format_name(name: &str, truncate_names: bool) -> String {
    if truncate_names && name.len() > NAME_WIDTH {
        format!("{:<width$}", &name[..NAME_WIDTH], width = NAME_WIDTH)
    } else {
        format!("{:<width$}", name, width = NAME_WIDTH)
    }
}

/// Scientific notation is used for a whole matrix iff any finite,
/// non-diagonal entry falls in `(0, 1e-3)` (spec §6).
fn any_scientific(matrix: &[Vec<f64>]) -> bool {
    let n = matrix.len();
    (0..n).any(|i| (0..n).any(|j| i != j && matrix[i][j].is_finite() && matrix[i][j] > 0.0 && matrix[i][j] < 1e-3))
}

fn format_value(d: f64, scientific: bool) -> String {
    if d.is_nan() {
        "NaN".to_string()
    } else if scientific {
        format!("{:1.4e}", d)
    } else {
        format!("{:1.4}", d)
    }
}

/// Symmetric distance and coverage matrices, averaging `M(i,j) + M(j,i)`
/// per pair before applying `model` (spec §4.7 step 3). Runs the
/// degenerate-pair / low-homology diagnostics of §7 as a side effect.
pub fn symmetric_distances(
    table: &PairwiseTable,
    names: &[String],
    model: Model,
    flags: &DiagnosticFlags,
) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let n = table.n;
    let mut dist = vec![vec![0.0; n]; n];
    let mut coverage = vec![vec![1.0; n]; n];

    for i in 0..n {
        for j in (i + 1)..n {
            let avg = table.get(i, j).combined_with(table.get(j, i));
            let d = model.estimate(&avg);
            let cov = avg.coverage();

            diagnose_pair(&avg, table.get(i, j), table.get(j, i), &names[i], &names[j], d, cov, flags);

            dist[i][j] = d;
            dist[j][i] = d;
            coverage[i][j] = cov;
            coverage[j][i] = cov;
        }
    }
    (dist, coverage)
}

/// Raw asymmetric matrix over every ordered pair, no averaging
/// (spec §4.7 "extra-verbose mode").
pub fn asymmetric_distances(table: &PairwiseTable, model: Model) -> Vec<Vec<f64>> {
    let n = table.n;
    let mut dist = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..n {
            if i != j {
                dist[i][j] = model.estimate(table.get(i, j));
            }
        }
    }
    dist
}

fn diagnose_pair(
    avg: &MutationMatrix,
    forward: &MutationMatrix,
    backward: &MutationMatrix,
    name_i: &str,
    name_j: &str,
    d: f64,
    cov: f64,
    flags: &DiagnosticFlags,
) {
    if avg.total() <= 3 || d.is_nan() {
        flags.push_warning(format!(
            "⚠️  degenerate pair ({}, {}): aligned length {} is too small for a reliable estimate",
            name_i,
            name_j,
            avg.total()
        ));
        flags.set_soft_error();
        return;
    }
    if cov < 0.2 {
        flags.push_warning(format!(
            "⚠️  low homology ({}, {}): coverage {:.4} ({} -> {}: {:.4}, {} -> {}: {:.4})",
            name_i,
            name_j,
            cov,
            name_i,
            name_j,
            forward.coverage(),
            name_j,
            name_i,
            backward.coverage()
        ));
        flags.set_soft_error();
    }
}

/// One PHYLIP-style section: the leading `N`, then one row per sequence
/// (spec §6 "Output - distance matrix").
fn write_matrix_section<W: Write>(writer: &mut W, names: &[String], matrix: &[Vec<f64>], truncate_names: bool) -> io::Result<()> {
    let n = names.len();
    let scientific = any_scientific(matrix);
    writeln!(writer, "{}", n)?;
    for (i, name) in names.iter().enumerate() {
        write!(writer, "{}", format_name(name, truncate_names))?;
        for j in 0..n {
            write!(writer, "  {}", format_value(matrix[i][j], scientific))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

fn write_coverage_section<W: Write>(writer: &mut W, names: &[String], coverage: &[Vec<f64>], truncate_names: bool) -> io::Result<()> {
    writeln!(writer, "Coverage:")?;
    let n = names.len();
    for (i, name) in names.iter().enumerate() {
        write!(writer, "{}", format_name(name, truncate_names))?;
        for j in 0..n {
            write!(writer, "  {:1.4e}", coverage[i][j])?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Writes the full report — primary matrix, optional coverage section,
/// bootstrap replicates — to `output_path` or stdout (spec §6).
#[allow(clippy::too_many_arguments)]
pub fn write_report(
    output_path: Option<&str>,
    names: &[String],
    primary: &[Vec<f64>],
    coverage: Option<&[Vec<f64>]>,
    bootstrap: &[BootstrapReplicate],
    model: Model,
    truncate_names: bool,
) -> io::Result<()> {
    let mut sink: Box<dyn Write> = match output_path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    write_matrix_section(&mut sink, names, primary, truncate_names)?;
    if let Some(coverage) = coverage {
        write_coverage_section(&mut sink, names, coverage, truncate_names)?;
    }

    let n = names.len();
    for replicate in bootstrap {
        let mut matrix = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    matrix[i][j] = model.estimate(replicate.get(i, j));
                }
            }
        }
        write_matrix_section(&mut sink, names, &matrix, truncate_names)?;
    }

    sink.flush()?;
    if let Some(path) = output_path {
        println!("✅ distance matrix written to: {}", path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scientific_notation_triggers_on_small_nonzero_entries() {
        let matrix = vec![vec![0.0, 1.0e-4], vec![1.0e-4, 0.0]];
        assert!(any_scientific(&matrix));
        let matrix = vec![vec![0.0, 0.5716], vec![0.5716, 0.0]];
        assert!(!any_scientific(&matrix));
    }

    #[test]
    fn name_formatting_truncates_only_when_requested() {
        let long = "a_very_long_sequence_name";
        assert_eq!(format_name(long, false).trim_end(), long);
        assert_eq!(format_name(long, true).len(), NAME_WIDTH);
    }
}
