// Compressed size estimates derived from command statistics

use crate::{huffman::HuffmanTree, stats::CommandStats};
use serde::Serialize;

/// Bytes per parameter when stored as a plain 32-bit float.
pub const FLOAT_BYTES: u64 = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeEstimate {
    pub input_bytes: u64,
    /// One byte per command plus a 4-byte float per parameter
    pub byte_instruction_bytes: u64,
    pub byte_instruction_savings_percent: f64,
    pub command_bits: u64,
    pub max_code_length: u32,
    /// Width of a parameter stored as sign, decimal position and digits
    pub parameter_bits: u32,
    pub huffman_bytes: u64,
    pub huffman_savings_percent: f64,
}

impl SizeEstimate {
    pub fn from_stats(stats: &CommandStats) -> Self {
        let counts = || stats.signatures.iter().map(|(s, n)| (s.as_str(), *n));
        let tree = HuffmanTree::build(counts());
        let command_bits = tree.encoded_bits(counts());

        let parameter_bits = 1
            + u64::from(stats.max_fraction_digits).saturating_add(1).ilog2()
            + stats.max_digit_value.saturating_add(1).ilog2();

        let byte_instruction_bytes = stats.command_count + stats.parameter_count * FLOAT_BYTES;
        let huffman_bits = command_bits + stats.parameter_count * u64::from(parameter_bits);
        let huffman_bytes = huffman_bits.div_ceil(8);

        Self {
            input_bytes: stats.input_bytes,
            byte_instruction_bytes,
            byte_instruction_savings_percent: savings(byte_instruction_bytes, stats.input_bytes),
            command_bits,
            max_code_length: tree.max_code_length(),
            parameter_bits,
            huffman_bytes,
            huffman_savings_percent: savings(huffman_bytes, stats.input_bytes),
        }
    }
}

fn savings(size: u64, input: u64) -> f64 {
    if input == 0 {
        return 0.0;
    }
    100.0 - size as f64 * 100.0 / input as f64
}
