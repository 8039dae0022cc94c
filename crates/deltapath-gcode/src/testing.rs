use crate::{CommandStats, Instruction, SizeEstimate, statements, to_command};
use deltapath_core::Command;
use std::fmt::{self, Write as _};

/// Render each line of `input` with the motion command it produces, for
/// snapshotting.
pub fn render_program(input: &str) -> String {
    let mut out = String::new();
    match write_program(&mut out, input) {
        Ok(()) => out,
        Err(err) => format!("failed to render program: {err}"),
    }
}

fn write_program(out: &mut String, input: &str) -> fmt::Result {
    for result in statements(input) {
        let stmt = match result {
            Ok(stmt) => stmt,
            Err(err) => {
                writeln!(out, "error: {err}")?;
                continue;
            }
        };

        write!(out, "{}:", stmt.line)?;
        for word in &stmt.words {
            match word.letter {
                Some(letter) => write!(out, " {letter}{}", word.literal)?,
                None => write!(out, " {:?}", word.literal)?,
            }
        }
        if let Some(comment) = &stmt.comment {
            write!(out, " ; {comment}")?;
        }
        if let Some(checksum) = stmt.checksum {
            write!(out, " *{checksum}")?;
        }
        match Instruction::from_statement(&stmt).map(|inst| to_command(&inst)) {
            Some(Ok(Some(cmd))) => {
                write!(out, " =>")?;
                write_command(out, &cmd)?;
            }
            Some(Err(err)) => write!(out, " => error: {err}")?,
            Some(Ok(None)) | None => {}
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_command(out: &mut String, cmd: &Command) -> fmt::Result {
    match cmd {
        Command::Home => write!(out, " home"),
        Command::SetFeedMultiplier(percent) => write!(out, " feed multiplier {percent}%"),
        Command::Move(m) => {
            write!(out, " move")?;
            let axes = [('F', m.feed_rate), ('X', m.x), ('Y', m.y), ('Z', m.z), ('E', m.e)];
            for (letter, value) in axes {
                if let Some(v) = value {
                    write!(out, " {letter}{v}")?;
                }
            }
            Ok(())
        }
    }
}

/// Render the statistics and size estimate of `input`, for snapshotting.
pub fn render_stats(input: &str) -> String {
    let mut stats = CommandStats::new(input.len() as u64);
    for stmt in statements(input).flatten() {
        if let Some(inst) = Instruction::from_statement(&stmt) {
            stats.record(&inst);
        }
    }

    let mut out = String::new();
    match write_stats(&mut out, &stats) {
        Ok(()) => out,
        Err(err) => format!("failed to render stats: {err}"),
    }
}

fn write_stats(out: &mut String, stats: &CommandStats) -> fmt::Result {
    let est = SizeEstimate::from_stats(stats);
    writeln!(
        out,
        "commands {} parameters {}",
        stats.command_count, stats.parameter_count
    )?;
    for (signature, count) in stats.ranked_signatures() {
        writeln!(out, "  {signature}: {count}")?;
    }
    writeln!(
        out,
        "digits: integer {} fraction {} significant {} value {}",
        stats.max_integer_digits,
        stats.max_fraction_digits,
        stats.max_significant_digits,
        stats.max_digit_value
    )?;
    writeln!(
        out,
        "bytes {} byte-instructions {} ({:.2}%) huffman {} ({:.2}%)",
        est.input_bytes,
        est.byte_instruction_bytes,
        est.byte_instruction_savings_percent,
        est.huffman_bytes,
        est.huffman_savings_percent
    )?;
    write!(
        out,
        "command bits {} max code {} parameter bits {}",
        est.command_bits, est.max_code_length, est.parameter_bits
    )
}
