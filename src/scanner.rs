//! Hand-written scanner for the gcfg syntax.
//!
//! The scanner turns source text into [`Token`]s one call at a time. It never
//! fails: malformed input produces a best-effort token and a [`ScanError`] is
//! recorded, which the parser checks after every call (fail-fast). Keeping
//! errors out of the return type lets tooling such as `gcfg tokens` dump a
//! complete token stream even for broken files.
//!
//! The one piece of state beyond the cursor is *value mode*: after an `=` the
//! next token is always a [`TokenKind::String`] spanning the rest of the value,
//! quoted or not, because values are free text and cannot be split into the
//! usual identifier/operator tokens.

use serde::Serialize;

use crate::token::{File, Pos, Token, TokenKind};

/// A lexical error, recorded while scanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanError {
    pub pos: Pos,
    pub message: String,
}

pub struct Scanner<'a> {
    file: &'a File,
    src: &'a str,

    /// Current character, `None` at end of input.
    ch: Option<char>,
    /// Byte offset of `ch`.
    offset: usize,
    /// Byte offset just past `ch`.
    rd_offset: usize,
    /// The previous token was `=`.
    next_val: bool,

    errors: Vec<ScanError>,
}

impl<'a> Scanner<'a> {
    /// Create a scanner over `src`, which must be the text `file` was built from.
    ///
    /// # Panics
    ///
    /// Panics if the file size does not match the length of `src`.
    pub fn new(file: &'a File, src: &'a str) -> Self {
        assert_eq!(
            file.size(),
            src.len(),
            "gcfg: file size does not match source length"
        );
        let mut s = Self {
            file,
            src,
            ch: None,
            offset: 0,
            rd_offset: 0,
            next_val: false,
            errors: Vec::new(),
        };
        s.next();
        s
    }

    /// Remove and return the errors recorded so far.
    pub fn take_errors(&mut self) -> Vec<ScanError> {
        std::mem::take(&mut self.errors)
    }

    /// Scan the next token. Returns [`TokenKind::EndOfFile`] forever once the
    /// input is exhausted.
    pub fn scan(&mut self) -> Token {
        self.skip_whitespace();
        let offs = self.offset;
        let pos = self.file.pos(offs);

        if self.next_val {
            self.next_val = false;
            let lit = self.scan_value();
            return Token::new(TokenKind::String, lit, pos);
        }

        let Some(ch) = self.ch else {
            return Token::new(TokenKind::EndOfFile, "", pos);
        };
        if is_letter(ch) {
            let lit = self.scan_identifier();
            return Token::new(TokenKind::Identifier, lit, pos);
        }

        self.next();
        match ch {
            '\n' => Token::new(TokenKind::EndOfLine, "\n", pos),
            '"' => {
                let lit = self.scan_string(offs);
                Token::new(TokenKind::String, lit, pos)
            }
            '[' => Token::new(TokenKind::LBracket, "[", pos),
            ']' => Token::new(TokenKind::RBracket, "]", pos),
            ';' | '#' => {
                let lit = self.scan_comment(offs);
                Token::new(TokenKind::Comment, lit, pos)
            }
            '=' => {
                self.next_val = true;
                Token::new(TokenKind::Assign, "=", pos)
            }
            _ => {
                // NUL was already reported by `next`
                if ch != '\0' {
                    self.error(offs, illegal_message(ch));
                }
                Token::new(TokenKind::Illegal, ch.to_string(), pos)
            }
        }
    }

    fn next(&mut self) {
        let Some(c) = self.src[self.rd_offset..].chars().next() else {
            self.offset = self.src.len();
            self.ch = None;
            return;
        };
        self.offset = self.rd_offset;
        self.rd_offset += c.len_utf8();
        self.ch = Some(c);
        if c == '\0' {
            self.error(self.offset, illegal_message(c));
        }
    }

    fn error(&mut self, offset: usize, message: impl Into<String>) {
        self.errors.push(ScanError {
            pos: self.file.pos(offset),
            message: message.into(),
        });
    }

    fn skip_whitespace(&mut self) {
        while self.ch.is_some_and(is_whitespace) {
            self.next();
        }
    }

    fn scan_identifier(&mut self) -> String {
        let offs = self.offset;
        while self
            .ch
            .is_some_and(|c| is_letter(c) || is_digit(c) || c == '-')
        {
            self.next();
        }
        self.src[offs..self.offset].to_string()
    }

    /// Comment text from the initial `;` or `#` through the end of the line,
    /// newline included.
    fn scan_comment(&mut self, offs: usize) -> String {
        while self.ch.is_some_and(|c| c != '\n') {
            self.next();
        }
        if self.ch == Some('\n') {
            self.next();
        }
        self.src[offs..self.offset].to_string()
    }

    /// Called with the character after a backslash as the current character.
    fn scan_escape(&mut self, in_value: bool) {
        let offs = self.offset;
        let ch = self.ch;
        self.next();
        match ch {
            Some('\\' | '"') => {}
            Some('n' | 't') if in_value => {}
            _ => self.error(offs, "unknown escape sequence"),
        }
    }

    /// The cursor is on a newline, or on a CR that starts a CRLF.
    fn at_line_end(&self) -> bool {
        match self.ch {
            Some('\n') => true,
            Some('\r') => self.src[self.rd_offset..].starts_with('\n'),
            _ => false,
        }
    }

    /// Quoted subsection name. The opening quote at `offs` is already consumed.
    fn scan_string(&mut self, offs: usize) -> String {
        loop {
            match self.ch {
                Some('"') => {
                    self.next();
                    break;
                }
                None | Some('\n') => {
                    self.error(offs, "string not terminated");
                    break;
                }
                Some('\\') => {
                    self.next();
                    self.scan_escape(false);
                }
                Some(_) => self.next(),
            }
        }
        strip_cr(&self.src[offs..self.offset])
    }

    /// Variable value: everything up to an unquoted comment or end of line,
    /// minus trailing whitespace. Quotes and escapes are kept for the parser.
    fn scan_value(&mut self) -> String {
        let offs = self.offset;
        let mut end = offs;
        let mut in_quote = false;
        let mut has_cr = false;

        loop {
            let Some(ch) = self.ch else {
                if in_quote {
                    self.error(offs, "string not terminated");
                }
                break;
            };
            if in_quote && ch == '\n' {
                self.error(offs, "string not terminated");
                break;
            }
            if !in_quote && matches!(ch, '\n' | ';' | '#') {
                break;
            }
            self.next();
            match ch {
                '\\' if in_quote => {
                    // A continuation cannot be quoted.
                    if self.at_line_end() {
                        self.error(offs, "string not terminated");
                        break;
                    }
                    self.scan_escape(true);
                }
                '\\' => {
                    if self.ch == Some('\r') {
                        has_cr = true;
                        self.next();
                    }
                    if self.ch == Some('\n') {
                        // line continuation
                        self.next();
                    } else {
                        self.scan_escape(true);
                    }
                }
                '"' => in_quote = !in_quote,
                '\r' => has_cr = true,
                _ => {}
            }
            if in_quote || !is_whitespace(ch) {
                end = self.offset;
            }
        }

        let lit = &self.src[offs..end];
        if has_cr {
            strip_cr(lit)
        } else {
            lit.to_string()
        }
    }
}

/// Scan `src` to the end, returning every token (the final one is
/// [`TokenKind::EndOfFile`]) and every lexical error.
pub fn scan_all(file: &File, src: &str) -> (Vec<Token>, Vec<ScanError>) {
    let mut scanner = Scanner::new(file, src);
    let mut tokens = Vec::new();
    loop {
        let tok = scanner.scan();
        let done = tok.kind == TokenKind::EndOfFile;
        tokens.push(tok);
        if done {
            break;
        }
    }
    (tokens, scanner.take_errors())
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r')
}

/// Letter numbers such as `Ⅻ` are alphabetic but are not letters here.
fn is_letter(ch: char) -> bool {
    ch.is_alphabetic() && !ch.is_numeric()
}

/// Zero of every block of ten decimal digits (category Nd) in the BMP.
const DIGIT_ZEROS: &[u32] = &[
    0x0030, 0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66,
    0x0CE6, 0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946,
    0x19D0, 0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0,
    0xA9F0, 0xAA50, 0xABF0, 0xFF10,
];

/// Decimal digits only: fractions, superscripts and other numerics are not.
fn is_digit(ch: char) -> bool {
    let c = ch as u32;
    DIGIT_ZEROS.iter().any(|&zero| (zero..=zero + 9).contains(&c))
}

fn strip_cr(s: &str) -> String {
    s.chars().filter(|c| *c != '\r').collect()
}

fn illegal_message(ch: char) -> String {
    match ch {
        '\0' => "illegal character NUL".to_string(),
        c if c.is_control() => format!("illegal character U+{:04X}", c as u32),
        c => format!("illegal character U+{:04X} '{c}'", c as u32),
    }
}
