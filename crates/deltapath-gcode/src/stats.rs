// Command frequency and parameter-width statistics

use crate::command::Instruction;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommandStats {
    pub input_bytes: u64,
    pub command_count: u64,
    pub parameter_count: u64,
    /// Occurrences per signature, e.g. `G1EFXY`
    pub signatures: BTreeMap<String, u64>,
    /// Widest integer part of any parameter, sign excluded
    pub max_integer_digits: u32,
    /// Widest fractional part, trailing zeros included
    pub max_fraction_digits: u32,
    pub max_significant_digits: u32,
    /// Largest value of a parameter read as one digit string with the
    /// decimal point removed and trailing fraction zeros trimmed
    pub max_digit_value: u64,
}

/// Digit widths of one numeric literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteralShape {
    pub integer_digits: u32,
    pub fraction_digits: u32,
    pub digit_value: u64,
}

impl LiteralShape {
    pub fn of(literal: &str) -> Option<Self> {
        let unsigned = literal.trim_start_matches(['+', '-']);
        let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if !integer.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }
        if integer.is_empty() && fraction.is_empty() {
            return None;
        }

        let digits = format!("{integer}{}", fraction.trim_end_matches('0'));
        let digit_value = match digits.trim_start_matches('0') {
            "" => 0,
            significant => significant.parse().unwrap_or(u64::MAX),
        };

        Some(Self {
            integer_digits: integer.len() as u32,
            fraction_digits: fraction.len() as u32,
            digit_value,
        })
    }
}

impl CommandStats {
    pub fn new(input_bytes: u64) -> Self {
        Self {
            input_bytes,
            ..Self::default()
        }
    }

    pub fn record(&mut self, inst: &Instruction<'_>) {
        self.command_count += 1;
        self.parameter_count += inst.parameters.len() as u64;

        let mut letters: Vec<char> = inst.parameters.iter().filter_map(|w| w.letter).collect();
        letters.sort_unstable();
        let signature: String = std::iter::once(inst.command.to_string())
            .chain(letters.into_iter().map(String::from))
            .collect();
        *self.signatures.entry(signature).or_default() += 1;

        for shape in inst.parameters.iter().filter_map(|w| LiteralShape::of(&w.literal)) {
            self.max_integer_digits = self.max_integer_digits.max(shape.integer_digits);
            self.max_fraction_digits = self.max_fraction_digits.max(shape.fraction_digits);
            self.max_significant_digits = self
                .max_significant_digits
                .max(shape.integer_digits + shape.fraction_digits);
            self.max_digit_value = self.max_digit_value.max(shape.digit_value);
        }
    }

    /// Signatures ordered by descending frequency, ties by name.
    pub fn ranked_signatures(&self) -> Vec<(&str, u64)> {
        let mut ranked: Vec<_> = self
            .signatures
            .iter()
            .map(|(sig, count)| (sig.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_line;

    fn record_all(stats: &mut CommandStats, lines: &[&str]) {
        for (i, line) in lines.iter().enumerate() {
            let stmt = parse_line(i + 1, line).unwrap().unwrap();
            if let Some(inst) = Instruction::from_statement(&stmt) {
                stats.record(&inst);
            }
        }
    }

    #[test]
    fn literal_shape() {
        let shape = LiteralShape::of("-12.3400").unwrap();
        assert_eq!(shape.integer_digits, 2);
        assert_eq!(shape.fraction_digits, 4);
        assert_eq!(shape.digit_value, 1234);

        assert_eq!(LiteralShape::of(".5").map(|s| s.digit_value), Some(5));
        assert_eq!(LiteralShape::of("0.000").map(|s| s.digit_value), Some(0));
        assert_eq!(LiteralShape::of("1e3"), None);
        assert_eq!(LiteralShape::of(""), None);
    }

    #[test]
    fn signatures_sort_parameter_letters() {
        let mut stats = CommandStats::new(64);
        record_all(
            &mut stats,
            &[
                "G1 X1 Y2 E0.5",
                "G1 Y2 X1 E0.25",
                "N4 G1 F1500 X3",
                "; comment only",
                "G28",
            ],
        );

        assert_eq!(stats.input_bytes, 64);
        assert_eq!(stats.command_count, 4);
        assert_eq!(stats.parameter_count, 8);
        assert_eq!(stats.signatures.get("G1EXY"), Some(&2));
        assert_eq!(stats.signatures.get("G1FX"), Some(&1));
        assert_eq!(stats.signatures.get("G28"), Some(&1));
        assert_eq!(
            stats.ranked_signatures(),
            vec![("G1EXY", 2), ("G1FX", 1), ("G28", 1)]
        );
    }

    #[test]
    fn widths_track_maxima_across_parameters() {
        let mut stats = CommandStats::default();
        record_all(&mut stats, &["G1 X-120.5 Y3.125", "G1 F1500 E0.10000"]);

        assert_eq!(stats.max_integer_digits, 4);
        assert_eq!(stats.max_fraction_digits, 5);
        assert_eq!(stats.max_significant_digits, 6);
        assert_eq!(stats.max_digit_value, 3125);
    }
}
