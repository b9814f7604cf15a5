use std::path::Path;

use crate::error::LexError;
use crate::token::{Token, TokenKind};

// ── Lexer ─────────────────────────────────────────────────────────────────

pub struct Lexer<'s> {
    src: &'s str,
    pos: usize,
    line: u32,
    col: u32,
}

impl<'s> Lexer<'s> {
    pub fn new(src: &'s str) -> Self {
        Self { src, pos: 0, line: 1, col: 1 }
    }

    /// Tokenize the whole source. The result always starts with
    /// `StartOfFile` and ends with `EndOfFile`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = vec![Token::new(TokenKind::StartOfFile, 0, 0, "")];
        loop {
            self.skip_whitespace_and_comments()?;
            let (line, col) = (self.line, self.col);
            let Some(ch) = self.peek() else {
                tokens.push(Token::new(TokenKind::EndOfFile, line, col, ""));
                break;
            };
            tokens.push(self.next_token(ch, line, col)?);
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        self.src[self.pos..].chars().nth(1)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            while matches!(self.peek(), Some(c) if c.is_whitespace()) {
                self.advance();
            }
            let rest = &self.src[self.pos..];
            if rest.starts_with("//") {
                while !matches!(self.peek(), None | Some('\n')) {
                    self.advance();
                }
            } else if rest.starts_with("/*") {
                let (line, col) = (self.line, self.col);
                self.advance();
                self.advance();
                loop {
                    if self.src[self.pos..].starts_with("*/") {
                        self.advance();
                        self.advance();
                        break;
                    }
                    if self.advance().is_none() {
                        return Err(LexError::new("unterminated comment", line, col));
                    }
                }
            } else {
                return Ok(());
            }
        }
    }

    fn next_token(&mut self, ch: char, line: u32, col: u32) -> Result<Token, LexError> {
        match ch {
            '"' => self.lex_string(line, col),
            '\'' => self.lex_character(line, col),
            c if c.is_ascii_digit() => Ok(self.lex_number(line, col)),
            c if c.is_ascii_alphabetic() => Ok(self.lex_word(line, col)),
            _ => self.lex_operator(line, col),
        }
    }

    fn lex_string(&mut self, line: u32, col: u32) -> Result<Token, LexError> {
        self.advance(); // opening `"`
        let start = self.pos;
        loop {
            match self.advance() {
                None => return Err(LexError::new("unterminated string", line, col)),
                Some('"') => break,
                Some(_) => {}
            }
        }
        let text = &self.src[start..self.pos - 1];
        Ok(Token::new(TokenKind::String, line, col, text))
    }

    fn lex_character(&mut self, line: u32, col: u32) -> Result<Token, LexError> {
        self.advance(); // opening `'`
        let Some(c) = self.advance() else {
            return Err(LexError::new("invalid character", line, col));
        };
        if !self.eat('\'') {
            return Err(LexError::new("invalid character", line, col));
        }
        Ok(Token::new(TokenKind::Character, line, col, c.to_string()))
    }

    fn lex_number(&mut self, line: u32, col: u32) -> Token {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') && matches!(self.peek_next(), Some(c) if c.is_ascii_digit()) {
            self.advance();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }
        Token::new(TokenKind::Float, line, col, &self.src[start..self.pos])
    }

    fn lex_word(&mut self, line: u32, col: u32) -> Token {
        let start = self.pos;
        // `-` is allowed so names like `my-node` stay one identifier
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            self.advance();
        }
        let word = &self.src[start..self.pos];
        let kind = TokenKind::keyword(word).unwrap_or(TokenKind::Identifier);
        Token::new(kind, line, col, word)
    }

    fn lex_operator(&mut self, line: u32, col: u32) -> Result<Token, LexError> {
        use TokenKind::*;

        let start = self.pos;
        let Some(ch) = self.advance() else {
            return Err(LexError::new("unexpected end of input", line, col));
        };
        let kind = match ch {
            '<' => if self.eat('=') { LessThanEquals } else { LessThan },
            '>' => if self.eat('=') { GreaterThanEquals } else { GreaterThan },
            '(' => OpenParen,
            ')' => CloseParen,
            '{' => OpenBrace,
            '}' => CloseBrace,
            '[' => OpenBracket,
            ']' => CloseBracket,
            ',' => Comma,
            ':' => if self.eat(':') { ColonColon } else { Colon },
            '.' => Period,
            '\\' => BackSlash,
            '=' => if self.eat('=') { EqualsEquals } else { Equals },
            ';' => Semicolon,
            '-' => {
                if self.eat('-') { MinusMinus } else if self.eat('=') { MinusEquals } else { Minus }
            }
            '+' => {
                if self.eat('+') { PlusPlus } else if self.eat('=') { PlusEquals } else { Plus }
            }
            '*' => if self.eat('=') { StarEquals } else { Star },
            '/' => if self.eat('=') { SlashEquals } else { Slash },
            '%' => if self.eat('=') { PercentEquals } else { Percent },
            '!' => if self.eat('=') { BangEquals } else { Bang },
            '?' => Question,
            '&' => {
                if !self.eat('&') {
                    return Err(LexError::new("bitwise operators are not defined in YScript", line, col));
                }
                AndAnd
            }
            '|' => {
                if !self.eat('|') {
                    return Err(LexError::new("bitwise operators are not defined in YScript", line, col));
                }
                OrOr
            }
            '#' => Hash,
            '$' => {
                if self.src[self.pos..].starts_with("<>") {
                    self.advance();
                    self.advance();
                    EmptyValue
                } else {
                    Dollar
                }
            }
            '_' => Underscore,
            other => {
                return Err(LexError::new(format!("unexpected character {other:?}"), line, col));
            }
        };
        Ok(Token::new(kind, line, col, &self.src[start..self.pos]))
    }
}

/// Read and tokenize a project or scene file, returning the source text
/// alongside its tokens.
pub fn lex_file(path: impl AsRef<Path>) -> Result<(String, Vec<Token>), LexError> {
    let path = path.as_ref();
    let src = std::fs::read_to_string(path)
        .map_err(|e| LexError::new(format!("failed to read {}: {e}", path.display()), 0, 0))?;
    let tokens = Lexer::new(&src).tokenize()?;
    Ok((src, tokens))
}
