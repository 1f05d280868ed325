use super::{LanguageShare, partition_by_threshold};
use crate::Result;
use crate::collect::{Aggregate, PassSummary};
use core::fmt::Write;
use owo_colors::OwoColorize;

const RULE_WIDTH: usize = 60;
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[expect(clippy::cast_precision_loss, reason = "acceptable for display")]
pub fn generate<W: Write>(aggregate: &Aggregate, shares: &[LanguageShare], min_percentage: f64, use_colors: bool, writer: &mut W) -> Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    let heading = "DETAILED STATISTICS";

    writeln!(writer, "{rule}")?;
    if use_colors {
        writeln!(writer, "{}", heading.bold())?;
    } else {
        writeln!(writer, "{heading}")?;
    }
    writeln!(writer, "{rule}")?;

    let total_bytes = aggregate.total_size();
    writeln!(writer, "Total repositories: {}", aggregate.processed())?;
    writeln!(writer, "  private: {}, forks: {}", aggregate.private(), aggregate.forks())?;
    writeln!(writer, "Languages found: {}", aggregate.languages().len())?;
    writeln!(
        writer,
        "Total code size: {} bytes ({:.2} MB)",
        group_thousands(total_bytes),
        total_bytes as f64 / BYTES_PER_MB
    )?;

    if !aggregate.passes().is_empty() {
        writeln!(writer)?;
        for pass in aggregate.passes() {
            write_pass(writer, pass)?;
        }
    }

    writeln!(writer)?;
    if use_colors {
        writeln!(writer, "{}", "All languages (sorted by usage):".bold())?;
    } else {
        writeln!(writer, "All languages (sorted by usage):")?;
    }
    writeln!(writer, "{}", "-".repeat(RULE_WIDTH))?;

    for (index, share) in shares.iter().enumerate() {
        let line = format!(
            "{:2}. {:<15} {:6.2}% ({:8.2} MB, {:2} repos)",
            index + 1,
            share.name,
            share.percentage,
            share.size as f64 / BYTES_PER_MB,
            share.repositories
        );

        if use_colors && share.percentage < min_percentage {
            writeln!(writer, "{}", line.dimmed())?;
        } else {
            writeln!(writer, "{line}")?;
        }
    }

    let (_, hidden) = partition_by_threshold(shares, min_percentage);
    if !hidden.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Languages below {min_percentage}% (not shown in SVG): {}", hidden.len())?;
        for share in hidden {
            writeln!(writer, "    {}: {:.4}%", share.name, share.percentage)?;
        }
    }

    Ok(())
}

fn write_pass<W: Write>(writer: &mut W, pass: &PassSummary) -> Result<()> {
    writeln!(
        writer,
        "{}: {} page(s), {} seen, {} folded, {} duplicate(s) skipped ({})",
        pass.family, pass.pages, pass.nodes, pass.folded, pass.skipped_duplicates, pass.stop
    )?;
    Ok(())
}

/// Format an integer with `,` between groups of three digits.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}
