use crate::lexer::{LexError, Lexer, Number, TokenKind};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Statement {
    pub line: usize,
    pub raw: String,
    pub words: Vec<Word>,
    pub comment: Option<String>,
    pub checksum: Option<u8>,
}

/// A lettered word such as `X10.5`, or a bare text run when `letter` is
/// `None`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Word {
    pub letter: Option<char>,
    pub value: Option<Number>,
    pub literal: String,
}

impl Word {
    pub fn is_line_number(&self) -> bool {
        self.letter == Some('N')
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
}

/// Parse a whole program, stopping at the first malformed line.
pub fn parse(input: &str) -> Result<Vec<Statement>, ParseError> {
    statements(input).collect()
}

/// Parse a program line by line. A malformed line yields an error and the
/// following lines are still parsed.
pub fn statements(input: &str) -> impl Iterator<Item = Result<Statement, ParseError>> + '_ {
    input
        .lines()
        .enumerate()
        .filter_map(|(index, raw)| parse_line(index + 1, raw).transpose())
}

/// Parse a single line. Blank lines produce `None`.
pub fn parse_line(line: usize, raw: &str) -> Result<Option<Statement>, ParseError> {
    let mut words = Vec::new();
    let mut comments: Vec<String> = Vec::new();
    let mut checksum: Option<u8> = None;

    for token in Lexer::at_line(raw, line) {
        match token?.kind {
            TokenKind::Word {
                letter,
                value,
                literal,
            } => words.push(Word {
                letter: Some(letter),
                value,
                literal,
            }),
            TokenKind::Text(text) => words.push(Word {
                letter: None,
                value: None,
                literal: text,
            }),
            TokenKind::Comment(text) => comments.push(text),
            // a checksum runs to the end of the line, so there is at most one
            TokenKind::Checksum(value) => checksum = Some(value),
            // `lines()` already split on these
            TokenKind::Newline => {}
        }
    }

    if words.is_empty() && comments.is_empty() && checksum.is_none() {
        return Ok(None);
    }

    let comment = (!comments.is_empty()).then(|| comments.join(" "));
    Ok(Some(Statement {
        line,
        raw: raw.trim_end().to_string(),
        words,
        comment,
        checksum,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_line_collects_words_and_comments() {
        let stmt = parse_line(7, "N7 G1 X1.50 (first) ; second *12")
            .unwrap()
            .unwrap();
        assert_eq!(stmt.line, 7);
        assert_eq!(stmt.words.len(), 3);
        assert!(stmt.words[0].is_line_number());
        assert_eq!(stmt.words[2].literal, "1.50");
        assert_eq!(stmt.comment.as_deref(), Some("first second *12"));
        assert_eq!(stmt.checksum, None);
    }

    #[test]
    fn parse_line_blank_is_none() {
        assert_eq!(parse_line(1, "   \t"), Ok(None));
    }

    #[test]
    fn statements_continue_after_bad_line() {
        let results: Vec<_> = statements("G1 X1\nG1 X(\n\nG28\n").collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(ParseError::Lex(LexError::UnterminatedComment { line: 2, .. }))
        ));
        assert_eq!(results[2].as_ref().map(|s| s.line), Ok(4));
    }

    #[test]
    fn parse_stops_at_first_error() {
        assert!(parse("G1 X1\nG1 *1 *2\nG28").is_err());
        assert_eq!(
            parse("G1 X1 *87").map(|s| s[0].checksum),
            Ok(Some(87))
        );
        assert_eq!(parse("G1 X1\n\nG28").map(|s| s.len()), Ok(2));
    }
}
