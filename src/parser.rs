//! Structural parser: tokens in, section and assignment events out.
//!
//! [`Parser`] is pull-based. Each call to [`Iterator::next`] scans just enough
//! tokens to complete one section header or one assignment. The first error,
//! lexical or structural, is yielded once and ends the iteration.
//!
//! ```ignore
//! let file = File::new("app.gcfg", 0, src);
//! for event in Parser::new(&file, src) {
//!     match event? {
//!         Event::Section { name, .. } => println!("[{name}]"),
//!         Event::Assignment { name, value, .. } => println!("{name} = {value}"),
//!     }
//! }
//! ```

use serde::Serialize;

use crate::error::GcfgError;
use crate::scanner::Scanner;
use crate::token::{File, Pos, Token, TokenKind};

/// Value of a variable that appears without `= value`.
pub const IMPLICIT_VALUE: &str = "true";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// A section header. Emitted even for sections with no variables.
    Section {
        name: String,
        subsection: Option<String>,
        pos: Pos,
    },
    /// A variable assignment, carrying the enclosing section.
    Assignment {
        section: String,
        subsection: Option<String>,
        name: String,
        /// Unquoted and unescaped value. [`IMPLICIT_VALUE`] if `implicit`.
        value: String,
        implicit: bool,
        pos: Pos,
    },
}

impl Event {
    pub fn pos(&self) -> Pos {
        match self {
            Event::Section { pos, .. } | Event::Assignment { pos, .. } => *pos,
        }
    }
}

pub struct Parser<'a> {
    file: &'a File,
    scanner: Scanner<'a>,
    tok: Token,
    /// Current section name and subsection.
    section: Option<(String, Option<String>)>,
    done: bool,
}

impl<'a> Parser<'a> {
    pub fn new(file: &'a File, src: &'a str) -> Self {
        let mut scanner = Scanner::new(file, src);
        let tok = scanner.scan();
        Self {
            file,
            scanner,
            tok,
            section: None,
            done: false,
        }
    }

    fn advance(&mut self) -> Result<Option<Event>, GcfgError> {
        self.check_lexical()?;
        loop {
            match self.tok.kind {
                TokenKind::EndOfFile => return Ok(None),
                TokenKind::EndOfLine | TokenKind::Comment => self.next_token()?,
                TokenKind::LBracket => return self.section_header().map(Some),
                TokenKind::Identifier => return self.assignment().map(Some),
                _ if self.section.is_none() => return Err(self.syntax("expected section header")),
                _ => return Err(self.syntax("expected section header or variable declaration")),
            }
        }
    }

    fn section_header(&mut self) -> Result<Event, GcfgError> {
        let pos = self.tok.pos;
        self.next_token()?;
        if self.tok.kind != TokenKind::Identifier {
            return Err(self.syntax("expected section name"));
        }
        let name = std::mem::take(&mut self.tok.literal);
        self.next_token()?;

        let mut subsection = None;
        if self.tok.kind == TokenKind::String {
            let sub = unquote(&self.tok.literal).map_err(|m| self.syntax(m))?;
            if sub.is_empty() {
                return Err(self.syntax("empty subsection name"));
            }
            subsection = Some(sub);
            self.next_token()?;
        }
        if self.tok.kind != TokenKind::RBracket {
            return Err(self.syntax(if subsection.is_none() {
                "expected subsection name or right bracket"
            } else {
                "expected right bracket"
            }));
        }
        self.next_token()?;
        self.expect_line_end()?;

        log::debug!("section [{name}{}]", fmt_sub(&subsection));
        self.section = Some((name.clone(), subsection.clone()));
        Ok(Event::Section {
            name,
            subsection,
            pos,
        })
    }

    fn assignment(&mut self) -> Result<Event, GcfgError> {
        let pos = self.tok.pos;
        let Some((section, subsection)) = self.section.clone() else {
            return Err(self.syntax("variable must be defined in a section: expected section header"));
        };
        let name = std::mem::take(&mut self.tok.literal);
        self.next_token()?;

        let (value, implicit) = if self.tok.kind.ends_line() {
            (IMPLICIT_VALUE.to_string(), true)
        } else {
            if self.tok.kind != TokenKind::Assign {
                return Err(self.syntax("expected '='"));
            }
            self.next_token()?;
            if self.tok.kind != TokenKind::String {
                return Err(self.syntax("expected value"));
            }
            let value = unquote(&self.tok.literal).map_err(|m| self.syntax(m))?;
            self.next_token()?;
            self.expect_line_end()?;
            (value, false)
        };

        Ok(Event::Assignment {
            section,
            subsection,
            name,
            value,
            implicit,
            pos,
        })
    }

    fn next_token(&mut self) -> Result<(), GcfgError> {
        self.tok = self.scanner.scan();
        self.check_lexical()
    }

    /// Fail on the first error the scanner recorded.
    fn check_lexical(&mut self) -> Result<(), GcfgError> {
        match self.scanner.take_errors().into_iter().next() {
            Some(e) => Err(GcfgError::Lexical {
                position: self.file.position(e.pos),
                message: e.message,
            }),
            None => Ok(()),
        }
    }

    fn expect_line_end(&self) -> Result<(), GcfgError> {
        if self.tok.kind.ends_line() {
            Ok(())
        } else {
            Err(self.syntax("expected end of line, end of file, or comment"))
        }
    }

    fn syntax(&self, message: &str) -> GcfgError {
        GcfgError::Syntax {
            position: self.file.position(self.tok.pos),
            message: message.to_string(),
        }
    }
}

impl Iterator for Parser<'_> {
    type Item = Result<Event, GcfgError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

fn fmt_sub(sub: &Option<String>) -> String {
    sub.as_ref().map(|s| format!(" {s:?}")).unwrap_or_default()
}

/// Strip quotes and resolve escapes in a string literal as produced by the
/// scanner.
///
/// Text inside and outside quotes is concatenated as is, so `"a" b` unquotes to
/// `a b`. A backslash-newline outside quotes is dropped.
pub fn unquote(lit: &str) -> Result<String, &'static str> {
    let mut out = String::with_capacity(lit.len());
    let mut quoted = false;
    let mut escaped = false;
    for c in lit.chars() {
        if escaped {
            escaped = false;
            match c {
                '\\' | '"' => out.push(c),
                'n' => out.push('\n'),
                't' => out.push('\t'),
                '\n' if !quoted => {}
                _ => return Err("invalid escape sequence"),
            }
            continue;
        }
        match c {
            '"' => quoted = !quoted,
            '\\' => escaped = true,
            _ => out.push(c),
        }
    }
    if quoted {
        return Err("missing end quote");
    }
    if escaped {
        return Err("invalid escape sequence");
    }
    Ok(out)
}
