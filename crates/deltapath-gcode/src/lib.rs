//! G-code tokenizer and parser, plus the command statistics and size
//! estimates built on top of it.

mod command;
mod estimate;
mod huffman;
mod lexer;
mod parser;
mod stats;

pub use command::{CommandWord, Instruction, ParameterError, to_command};
pub use estimate::{FLOAT_BYTES, SizeEstimate};
pub use huffman::HuffmanTree;
pub use lexer::{LexError, Lexer, Number, Token, TokenKind, lex};
pub use parser::{ParseError, Statement, Word, parse, parse_line, statements};
pub use stats::{CommandStats, LiteralShape};

#[cfg(test)]
mod testing;
