//! Tokenizer for the subset of Java needed to read declarations
//!
//! Comments, string/char literals and text blocks are consumed without producing
//! structural tokens, so braces or semicolons inside them never confuse the scanner.

use std::iter::Peekable;
use std::str::Chars;

/// A Java token, reduced to what declaration scanning needs
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Token {
    Ident(String),
    /// Numeric, string, char or text-block literal
    Literal,
    Dot,
    Semi,
    Comma,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Lt,
    Gt,
    Eq,
    At,
    Other(char),
}

impl Token {
    pub fn is_ident(&self, word: &str) -> bool {
        matches!(self, Token::Ident(ident) if ident == word)
    }
}

/// Lexing failure with the 1-based line it occurred on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub line: usize,
    pub message: String,
}

pub struct Lexer<'a> {
    source: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source: source.chars().peekable(),
            line: 1,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.source.next();
        if ch == Some('\n') {
            self.line += 1;
        }
        ch
    }

    fn error(line: usize, message: &str) -> LexError {
        LexError {
            line,
            message: message.to_string(),
        }
    }

    /// Tokenize the whole input
    pub fn tokenize(self) -> Result<Vec<Token>, LexError> {
        Ok(self
            .tokenize_with_lines()?
            .into_iter()
            .map(|(token, _)| token)
            .collect())
    }

    /// Tokenize the whole input, pairing every token with its 1-based line
    pub fn tokenize_with_lines(mut self) -> Result<Vec<(Token, usize)>, LexError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Option<(Token, usize)>, LexError> {
        loop {
            self.skip_whitespace();
            let Some(&ch) = self.source.peek() else {
                return Ok(None);
            };
            let line = self.line;

            if ch == '/' {
                self.advance();
                match self.source.peek() {
                    Some('/') => {
                        self.skip_line();
                        continue;
                    }
                    Some('*') => {
                        self.advance();
                        self.skip_block_comment()?;
                        continue;
                    }
                    _ => return Ok(Some((Token::Other('/'), line))),
                }
            }

            return Ok(Some((self.token(ch)?, line)));
        }
    }

    fn token(&mut self, ch: char) -> Result<Token, LexError> {
        if is_ident_start(ch) {
            let mut ident = String::new();
            while let Some(&ch) = self.source.peek()
                && is_ident_part(ch)
            {
                ident.push(ch);
                self.advance();
            }
            return Ok(Token::Ident(ident));
        }

        if ch.is_ascii_digit() {
            while let Some(&ch) = self.source.peek()
                && (ch.is_ascii_alphanumeric() || ch == '_' || ch == '.')
            {
                self.advance();
            }
            return Ok(Token::Literal);
        }

        self.advance();
        let token = match ch {
            '"' => {
                self.string_literal()?;
                Token::Literal
            }
            '\'' => {
                self.char_literal()?;
                Token::Literal
            }
            '.' => Token::Dot,
            ';' => Token::Semi,
            ',' => Token::Comma,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            '<' => Token::Lt,
            '>' => Token::Gt,
            '=' => Token::Eq,
            '@' => Token::At,
            other => Token::Other(other),
        };
        Ok(token)
    }

    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.source.peek()
            && ch.is_whitespace()
        {
            self.advance();
        }
    }

    fn skip_line(&mut self) {
        while let Some(ch) = self.advance() {
            if ch == '\n' {
                break;
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start = self.line;
        while let Some(ch) = self.advance() {
            if ch == '*' && self.source.peek() == Some(&'/') {
                self.advance();
                return Ok(());
            }
        }
        Err(Self::error(start, "unterminated block comment"))
    }

    /// Called after the opening quote; handles both `"..."` and `"""..."""`.
    fn string_literal(&mut self) -> Result<(), LexError> {
        let start = self.line;
        if self.source.peek() == Some(&'"') {
            self.advance();
            if self.source.peek() == Some(&'"') {
                self.advance();
                return self.text_block(start);
            }
            // Empty string literal.
            return Ok(());
        }

        while let Some(ch) = self.advance() {
            match ch {
                '\\' => {
                    self.advance();
                }
                '"' => return Ok(()),
                '\n' => break,
                _ => {}
            }
        }
        Err(Self::error(start, "unterminated string literal"))
    }

    fn text_block(&mut self, start: usize) -> Result<(), LexError> {
        let mut quotes = 0;
        while let Some(ch) = self.advance() {
            match ch {
                '\\' => {
                    self.advance();
                    quotes = 0;
                }
                '"' => {
                    quotes += 1;
                    if quotes == 3 {
                        return Ok(());
                    }
                }
                _ => quotes = 0,
            }
        }
        Err(Self::error(start, "unterminated text block"))
    }

    fn char_literal(&mut self) -> Result<(), LexError> {
        let start = self.line;
        while let Some(ch) = self.advance() {
            match ch {
                '\\' => {
                    self.advance();
                }
                '\'' => return Ok(()),
                '\n' => break,
                _ => {}
            }
        }
        Err(Self::error(start, "unterminated char literal"))
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_ident_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

/// Tokenize Java source
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

/// Tokenize Java source, keeping the line of every token
pub fn tokenize_with_lines(source: &str) -> Result<Vec<(Token, usize)>, LexError> {
    Lexer::new(source).tokenize_with_lines()
}
