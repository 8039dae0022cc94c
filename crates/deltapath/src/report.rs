use crate::analysis::Analysis;
use anyhow::{Context, Result};
use deltapath_core::RunStatistics;
use deltapath_gcode::SizeEstimate;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn render(analysis: &Analysis, format: OutputFormat, max_signatures: usize) -> Result<String> {
    match format {
        OutputFormat::Text => {
            render_text(analysis, max_signatures).context("failed to render text report")
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(analysis).context("failed to render JSON report")
        }
    }
}

/// Human-readable report. Only the `max_signatures` most frequent
/// signatures are listed.
pub fn render_text(analysis: &Analysis, max_signatures: usize) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_commands(&mut out, analysis, max_signatures)?;
    writeln!(out)?;
    write_estimate(&mut out, &analysis.estimate)?;
    writeln!(out)?;
    write_segmentation(&mut out, &analysis.run)?;
    Ok(out)
}

fn write_commands(out: &mut String, analysis: &Analysis, max_signatures: usize) -> fmt::Result {
    let commands = &analysis.commands;
    writeln!(out, "Command occurrence:")?;
    let ranked = commands.ranked_signatures();
    for (signature, count) in ranked.iter().take(max_signatures) {
        writeln!(out, "  {signature:<12} {count}")?;
    }
    if ranked.len() > max_signatures {
        writeln!(out, "  ... {} more", ranked.len() - max_signatures)?;
    }
    writeln!(
        out,
        "Total commands: {} ({} parameters, {} lines skipped)",
        commands.command_count, commands.parameter_count, analysis.skipped_lines
    )?;
    writeln!(
        out,
        "Parameter literals: {} integer digits, {} fraction digits, {} significant digits, \
         max value {}",
        commands.max_integer_digits,
        commands.max_fraction_digits,
        commands.max_significant_digits,
        commands.max_digit_value
    )
}

fn write_estimate(out: &mut String, estimate: &SizeEstimate) -> fmt::Result {
    writeln!(out, "Size estimate:")?;
    writeln!(out, "  input            {} bytes", estimate.input_bytes)?;
    writeln!(
        out,
        "  byte commands    {} bytes ({:.2}% smaller)",
        estimate.byte_instruction_bytes, estimate.byte_instruction_savings_percent
    )?;
    writeln!(
        out,
        "  huffman          {} bytes ({:.2}% smaller, codes up to {} bits, {} bits per parameter)",
        estimate.huffman_bytes,
        estimate.huffman_savings_percent,
        estimate.max_code_length,
        estimate.parameter_bits
    )
}

fn write_segmentation(out: &mut String, run: &RunStatistics) -> fmt::Result {
    writeln!(out, "Segmentation:")?;
    writeln!(
        out,
        "  moves            {} analyzed, {} skipped, {} degenerate",
        run.moves_processed, run.moves_skipped, run.degenerate_moves
    )?;
    writeln!(
        out,
        "  waypoints        {} naive, {} adaptive",
        run.total_steps_naive, run.total_steps_adaptive
    )?;
    writeln!(
        out,
        "  worst deviation  {:.6} mm naive, {:.6} mm adaptive",
        run.max_deviation_naive, run.max_deviation_adaptive
    )?;
    writeln!(
        out,
        "  adaptive cost    {} distance calculations, {:+} kinematics calls vs naive",
        run.distance_calculation_count, run.adaptive_calculation_surplus
    )?;
    writeln!(
        out,
        "  recursion        depth {}, {} branches cut at the limit",
        run.max_recursion_depth, run.depth_limit_hits
    )
}
