// Statement -> motion command translation

use crate::{Number, Statement, Word};
use deltapath_core::{Command, MoveCommand};
use std::fmt;
use thiserror::Error;

/// The `G`, `M` or `T` word that names what a statement does.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommandWord {
    pub letter: char,
    /// Integer codes are normalized (`G01` -> `1`), others kept as written.
    pub code: String,
}

impl CommandWord {
    pub fn is(&self, letter: char, code: u32) -> bool {
        self.letter == letter && self.code == code.to_string()
    }
}

impl fmt::Display for CommandWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.code)
    }
}

/// A statement split into its command word and parameters. Line numbers
/// (`N` words) are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction<'a> {
    pub line: usize,
    pub command: CommandWord,
    pub parameters: Vec<&'a Word>,
}

impl<'a> Instruction<'a> {
    /// Returns `None` for statements without a command word, such as
    /// comment-only lines.
    pub fn from_statement(stmt: &'a Statement) -> Option<Self> {
        let index = stmt.words.iter().position(|w| {
            matches!(w.letter, Some('G' | 'M' | 'T')) && w.value.is_some()
        })?;
        let word = &stmt.words[index];
        let letter = word.letter?;
        let code = match word.value? {
            Number::Int(code) => code.to_string(),
            Number::Float(_) => word.literal.clone(),
        };

        let parameters = stmt
            .words
            .iter()
            .enumerate()
            .filter(|(i, w)| *i != index && !w.is_line_number())
            .map(|(_, w)| w)
            .collect();

        Some(Self {
            line: stmt.line,
            command: CommandWord { letter, code },
            parameters,
        })
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParameterError {
    #[error("line {line}: {command} does not accept parameter '{letter}'")]
    Unrecognized {
        line: usize,
        command: CommandWord,
        letter: char,
    },

    #[error("line {line}: unexpected text '{text}' after {command}")]
    UnexpectedText {
        line: usize,
        command: CommandWord,
        text: String,
    },

    #[error("line {line}: parameter '{letter}' of {command} has no value")]
    MissingValue {
        line: usize,
        command: CommandWord,
        letter: char,
    },

    #[error("line {line}: {command} requires parameter '{letter}'")]
    MissingParameter {
        line: usize,
        command: CommandWord,
        letter: char,
    },

    #[error("line {line}: parameter '{letter}' of {command} must be positive, got {value}")]
    NotPositive {
        line: usize,
        command: CommandWord,
        letter: char,
        value: f64,
    },

    #[error("line {line}: parameter '{letter}' of {command} is not a finite number")]
    NotFinite {
        line: usize,
        command: CommandWord,
        letter: char,
    },
}

/// Translate an instruction into a motion command.
///
/// Commands the analyzer does not model yield `Ok(None)`. `G0` and `G1` are
/// both treated as linear moves.
pub fn to_command(inst: &Instruction<'_>) -> Result<Option<Command>, ParameterError> {
    let cmd = &inst.command;
    if cmd.is('G', 0) || cmd.is('G', 1) {
        return linear_move(inst).map(|m| Some(Command::Move(m)));
    }
    if cmd.is('G', 28) {
        // axis selectors are accepted; every axis is homed
        return Ok(Some(Command::Home));
    }
    if cmd.is('M', 220) {
        return feed_multiplier(inst).map(|p| p.map(Command::SetFeedMultiplier));
    }
    Ok(None)
}

fn linear_move(inst: &Instruction<'_>) -> Result<MoveCommand, ParameterError> {
    let mut out = MoveCommand::default();
    for word in &inst.parameters {
        let letter = letter_of(inst, word)?;
        let slot = match letter {
            'F' => &mut out.feed_rate,
            'X' => &mut out.x,
            'Y' => &mut out.y,
            'Z' => &mut out.z,
            'E' => &mut out.e,
            _ => {
                return Err(ParameterError::Unrecognized {
                    line: inst.line,
                    command: inst.command.clone(),
                    letter,
                });
            }
        };
        let value = value_of(inst, letter, word)?;
        if letter == 'F' && value <= 0.0 {
            return Err(ParameterError::NotPositive {
                line: inst.line,
                command: inst.command.clone(),
                letter,
                value,
            });
        }
        *slot = Some(value);
    }
    Ok(out)
}

/// `M220 S<percent>` sets the override; `M220` alone only reports it.
fn feed_multiplier(inst: &Instruction<'_>) -> Result<Option<u32>, ParameterError> {
    let mut percent = None;
    for word in &inst.parameters {
        let letter = letter_of(inst, word)?;
        // B and R save and restore the override; they do not change it
        if matches!(letter, 'B' | 'R') {
            continue;
        }
        if letter != 'S' {
            return Err(ParameterError::Unrecognized {
                line: inst.line,
                command: inst.command.clone(),
                letter,
            });
        }
        let value = value_of(inst, letter, word)?;
        if value.round() < 1.0 || value.round() > u32::MAX as f64 {
            return Err(ParameterError::NotPositive {
                line: inst.line,
                command: inst.command.clone(),
                letter,
                value,
            });
        }
        percent = Some(value.round() as u32);
    }
    Ok(percent)
}

fn letter_of(inst: &Instruction<'_>, word: &Word) -> Result<char, ParameterError> {
    word.letter.ok_or_else(|| ParameterError::UnexpectedText {
        line: inst.line,
        command: inst.command.clone(),
        text: word.literal.clone(),
    })
}

fn value_of(inst: &Instruction<'_>, letter: char, word: &Word) -> Result<f64, ParameterError> {
    let value = word
        .value
        .map(Number::as_f64)
        .ok_or_else(|| ParameterError::MissingValue {
            line: inst.line,
            command: inst.command.clone(),
            letter,
        })?;
    if !value.is_finite() {
        return Err(ParameterError::NotFinite {
            line: inst.line,
            command: inst.command.clone(),
            letter,
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_line;

    fn command(line: &str) -> Result<Option<Command>, ParameterError> {
        let stmt = parse_line(1, line).unwrap().unwrap();
        let inst = Instruction::from_statement(&stmt).unwrap();
        to_command(&inst)
    }

    #[test]
    fn instruction_normalizes_code_and_drops_line_numbers() {
        let stmt = parse_line(4, "N10 g01 X1 Y2").unwrap().unwrap();
        let inst = Instruction::from_statement(&stmt).unwrap();
        assert_eq!(inst.command.to_string(), "G1");
        assert_eq!(inst.parameters.len(), 2);

        let stmt = parse_line(1, "G29.1 Z0.5").unwrap().unwrap();
        let inst = Instruction::from_statement(&stmt).unwrap();
        assert_eq!(inst.command.to_string(), "G29.1");

        let stmt = parse_line(1, "; only a comment").unwrap().unwrap();
        assert!(Instruction::from_statement(&stmt).is_none());
    }

    #[test]
    fn moves_take_every_axis() {
        assert_eq!(
            command("G1 F1200 X1.5 Y-2 Z0.3 E0.04"),
            Ok(Some(Command::Move(MoveCommand {
                feed_rate: Some(1200.0),
                x: Some(1.5),
                y: Some(-2.0),
                z: Some(0.3),
                e: Some(0.04),
            })))
        );
        assert_eq!(
            command("G0 Z5"),
            Ok(Some(Command::Move(MoveCommand {
                z: Some(5.0),
                ..MoveCommand::default()
            })))
        );
    }

    #[test]
    fn move_parameter_errors() {
        assert!(matches!(
            command("G1 X1 S3"),
            Err(ParameterError::Unrecognized { letter: 'S', .. })
        ));
        assert!(matches!(
            command("G1 X"),
            Err(ParameterError::MissingValue { letter: 'X', .. })
        ));
        assert!(matches!(
            command("G1 F0 X1"),
            Err(ParameterError::NotPositive { letter: 'F', .. })
        ));
        assert!(matches!(
            command("G1 fast"),
            Err(ParameterError::UnexpectedText { .. })
        ));
    }

    #[test]
    fn overflowing_literals_are_rejected() {
        assert_eq!(
            command("G1 E1e999"),
            Err(ParameterError::NotFinite {
                line: 1,
                command: CommandWord {
                    letter: 'G',
                    code: "1".to_string(),
                },
                letter: 'E',
            })
        );
        assert!(matches!(
            command("G1 X-1e400 Y2"),
            Err(ParameterError::NotFinite { letter: 'X', .. })
        ));
        assert!(matches!(
            command("M220 S1e999"),
            Err(ParameterError::NotFinite { letter: 'S', .. })
        ));
        assert!(command("G1 X1e20").is_ok());
    }

    #[test]
    fn home_and_feed_multiplier() {
        assert_eq!(command("G28 X Y"), Ok(Some(Command::Home)));
        assert_eq!(
            command("M220 S150"),
            Ok(Some(Command::SetFeedMultiplier(150)))
        );
        assert_eq!(command("M220"), Ok(None));
        assert_eq!(command("M220 B"), Ok(None));
        assert!(matches!(
            command("M220 S0"),
            Err(ParameterError::NotPositive { .. })
        ));
    }

    #[test]
    fn unmodeled_commands_are_ignored() {
        assert_eq!(command("M104 S200"), Ok(None));
        assert_eq!(command("G92 E0"), Ok(None));
        assert_eq!(command("M117 Printing"), Ok(None));
    }

    #[test]
    fn error_messages_name_the_line() {
        let stmt = parse_line(12, "G1 Q4").unwrap().unwrap();
        let inst = Instruction::from_statement(&stmt).unwrap();
        assert_eq!(
            to_command(&inst).unwrap_err().to_string(),
            "line 12: G1 does not accept parameter 'Q'"
        );
    }
}
