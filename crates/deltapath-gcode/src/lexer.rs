use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", content = "value")]
pub enum TokenKind {
    /// An address letter, upper-cased, with its optional number. `literal`
    /// keeps the number exactly as written.
    Word {
        letter: char,
        value: Option<Number>,
        literal: String,
    },
    /// Any other run of non-whitespace, such as an `M117` message.
    Text(String),
    Comment(String),
    Checksum(u8),
    Newline,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(tag = "kind", content = "value")]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LexError {
    #[error("invalid number '{raw}' at line {line}, column {column}")]
    InvalidNumber {
        line: usize,
        column: usize,
        raw: String,
    },

    #[error("invalid checksum '{raw}' at line {line}, column {column}")]
    InvalidChecksum {
        line: usize,
        column: usize,
        raw: String,
    },

    #[error("unterminated parenthesized comment starting at line {line}, column {column}")]
    UnterminatedComment { line: usize, column: usize },
}

pub fn lex(input: &str) -> Lexer<'_> {
    Lexer::new(input)
}

pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::at_line(input, 1)
    }

    /// Lex `input` as if it started on the given line.
    pub fn at_line(input: &'a str, line: usize) -> Self {
        Self {
            chars: input.chars().peekable(),
            line,
            column: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// Consume characters up to (not including) the end of the line.
    fn rest_of_line(&mut self) -> String {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.bump();
        }
        text
    }

    fn run_until_terminator(&mut self, mut text: String) -> String {
        while let Some(c) = self.peek() {
            if is_value_terminator(c) {
                break;
            }
            text.push(c);
            self.bump();
        }
        text
    }

    fn number_literal(&mut self) -> String {
        let mut raw = String::new();
        if let Some(sign @ ('+' | '-')) = self.peek() {
            raw.push(sign);
            self.bump();
        }
        while let Some(c) = self.peek() {
            let exponent_sign = matches!(c, '+' | '-') && raw.ends_with(['e', 'E']);
            if !(c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E') || exponent_sign) {
                break;
            }
            raw.push(c);
            self.bump();
        }
        raw
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(ch) = self.peek() {
            let (line, column) = (self.line, self.column);
            let token = |kind| Some(Ok(Token { kind, line, column }));

            if ch.is_ascii_whitespace() {
                self.bump();
                if ch == '\n' {
                    return token(TokenKind::Newline);
                }
                continue;
            }

            if ch == ';' {
                self.bump();
                let text = self.rest_of_line();
                return token(TokenKind::Comment(text.trim().to_string()));
            }

            if ch == '(' {
                self.bump();
                let mut text = String::new();
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                    if c == ')' {
                        return token(TokenKind::Comment(text));
                    }
                    text.push(c);
                }
                return Some(Err(LexError::UnterminatedComment { line, column }));
            }

            if ch == '*' {
                self.bump();
                let raw = self.rest_of_line();
                return match raw.trim().parse::<u8>() {
                    Ok(value) => token(TokenKind::Checksum(value)),
                    Err(_) => Some(Err(LexError::InvalidChecksum {
                        line,
                        column: column + 1,
                        raw,
                    })),
                };
            }

            if ch.is_ascii_alphabetic() {
                self.bump();
                let letter = ch.to_ascii_uppercase();
                match self.peek() {
                    Some(next) if is_number_start(next) => {
                        let start_col = self.column;
                        let literal = self.number_literal();
                        return match parse_number(&literal) {
                            Some(value) => token(TokenKind::Word {
                                letter,
                                value: Some(value),
                                literal,
                            }),
                            None => Some(Err(LexError::InvalidNumber {
                                line,
                                column: start_col,
                                raw: literal,
                            })),
                        };
                    }
                    None => {
                        return token(TokenKind::Word {
                            letter,
                            value: None,
                            literal: String::new(),
                        });
                    }
                    Some(next) if is_value_terminator(next) => {
                        return token(TokenKind::Word {
                            letter,
                            value: None,
                            literal: String::new(),
                        });
                    }
                    Some(_) => {
                        let text = self.run_until_terminator(ch.to_string());
                        return token(TokenKind::Text(text));
                    }
                }
            }

            let text = self.run_until_terminator(String::new());
            if text.is_empty() {
                // terminators are all handled above, so at least one char is consumed
                self.bump();
                return token(TokenKind::Text(ch.to_string()));
            }
            return token(TokenKind::Text(text));
        }

        None
    }
}

fn is_number_start(ch: char) -> bool {
    ch.is_ascii_digit() || matches!(ch, '+' | '-' | '.')
}

fn is_value_terminator(ch: char) -> bool {
    ch.is_ascii_whitespace() || matches!(ch, ';' | '(' | '*')
}

fn parse_number(raw: &str) -> Option<Number> {
    if !raw.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    let is_floaty = raw.contains(['.', 'e', 'E']);
    if !is_floaty {
        if let Ok(int) = raw.parse::<i64>() {
            return Some(Number::Int(int));
        }
    }
    raw.parse::<f64>().ok().map(Number::Float)
}
