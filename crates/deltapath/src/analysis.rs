use anyhow::{Context, Result};
use deltapath_core::{MoveProcessor, ProcessorConfig, RunStatistics};
use deltapath_gcode::{CommandStats, Instruction, SizeEstimate, statements, to_command};
use serde::Serialize;

/// Everything learned from one G-code program.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub commands: CommandStats,
    pub estimate: SizeEstimate,
    pub run: RunStatistics,
    /// Lines dropped because they failed to parse or carried bad parameters
    pub skipped_lines: u64,
}

/// Stream `input` through the command statistics and the move processor.
///
/// Malformed lines and unreachable moves are logged and skipped; only a
/// fatal processing error aborts the analysis.
pub fn analyze(input: &str, config: &ProcessorConfig) -> Result<Analysis> {
    let processor = MoveProcessor::new(*config);
    let mut ctx = processor.start_run();
    let mut commands = CommandStats::new(input.len() as u64);
    let mut skipped_lines = 0u64;

    let motion = statements(input).filter_map(|result| {
        let stmt = match result {
            Ok(stmt) => stmt,
            Err(err) => {
                tracing::warn!("skipping line: {err}");
                skipped_lines += 1;
                return None;
            }
        };
        let inst = Instruction::from_statement(&stmt)?;
        commands.record(&inst);
        match to_command(&inst) {
            Ok(Some(cmd)) => Some(cmd),
            Ok(None) => {
                tracing::trace!(line = stmt.line, "ignoring {}", inst.command);
                None
            }
            Err(err) => {
                tracing::warn!("skipping {err}");
                skipped_lines += 1;
                None
            }
        }
    });
    processor
        .run(&mut ctx, motion)
        .context("analysis aborted")?;

    tracing::info!(
        moves = ctx.stats.moves_processed,
        skipped = ctx.stats.moves_skipped,
        "processed {} commands",
        commands.command_count
    );

    let estimate = SizeEstimate::from_stats(&commands);
    Ok(Analysis {
        commands,
        estimate,
        run: ctx.stats,
        skipped_lines,
    })
}
