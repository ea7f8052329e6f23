//! Source positions and the lexical tokens of the gcfg syntax.
//!
//! Positions are tracked the way compilers usually do it: every input buffer is
//! registered in a [`FileSet`] and receives a *base*, so a single [`Pos`] (a
//! plain integer) identifies a byte in any of the buffers read during one
//! operation. Turning a `Pos` into a human-readable [`Position`] (file name,
//! line, column) is done on demand, by binary search over the line table that
//! [`File`] computes when the buffer is registered.

use std::fmt;

use serde::Serialize;

/// A compact source position: the owning file's base plus a byte offset.
///
/// Only meaningful together with the [`FileSet`] (or [`File`]) that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Pos(pub usize);

/// A resolved source position, ready for error messages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Position {
    /// Source name (usually a file path). Empty for anonymous input.
    pub name: String,
    /// Byte offset within the source, starting at 0.
    pub offset: usize,
    /// Line number, starting at 1.
    pub line: usize,
    /// Column number in bytes, starting at 1.
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}:{}", self.line, self.column)
        } else {
            write!(f, "{}:{}:{}", self.name, self.line, self.column)
        }
    }
}

/// One registered input buffer and its line table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    name: String,
    base: usize,
    size: usize,
    /// Byte offset of the first character of every line.
    lines: Vec<usize>,
}

impl File {
    /// Register `src` under `name`, starting at `base`.
    pub fn new(name: &str, base: usize, src: &str) -> Self {
        let mut lines = vec![0];
        lines.extend(
            src.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            name: name.to_string(),
            base,
            size: src.len(),
            lines,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The [`Pos`] of a byte offset within this file.
    pub fn pos(&self, offset: usize) -> Pos {
        Pos(self.base + offset.min(self.size))
    }

    /// The byte offset of `pos` within this file, clamped to the file bounds.
    pub fn offset(&self, pos: Pos) -> usize {
        pos.0.saturating_sub(self.base).min(self.size)
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.0 >= self.base && pos.0 <= self.base + self.size
    }

    /// Resolve `pos` into file name, line and column.
    pub fn position(&self, pos: Pos) -> Position {
        let offset = self.offset(pos);
        let line = match self.lines.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        Position {
            name: self.name.clone(),
            offset,
            line: line + 1,
            column: offset - self.lines[line] + 1,
        }
    }
}

/// All buffers read during one operation.
///
/// Each file's base is one past the end of the previous file, so the
/// end-of-file position of one file never collides with the first byte of the
/// next.
#[derive(Debug, Default)]
pub struct FileSet {
    files: Vec<File>,
    next_base: usize,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new buffer and return its [`File`].
    pub fn add_file(&mut self, name: &str, src: &str) -> &File {
        let file = File::new(name, self.next_base, src);
        self.next_base += src.len() + 1;
        self.files.push(file);
        &self.files[self.files.len() - 1]
    }

    /// The file that contains `pos`, if any.
    pub fn file(&self, pos: Pos) -> Option<&File> {
        self.files.iter().rev().find(|f| f.contains(pos))
    }

    pub fn position(&self, pos: Pos) -> Option<Position> {
        self.file(pos).map(|f| f.position(pos))
    }
}

/// Token classes produced by the [`Scanner`](crate::scanner::Scanner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Section or variable name.
    Identifier,
    /// Quoted subsection name, or a variable value (quoted or not).
    String,
    Assign,
    LBracket,
    RBracket,
    EndOfLine,
    Comment,
    EndOfFile,
    Illegal,
}

impl TokenKind {
    /// Tokens that may end a section header or an assignment.
    pub fn ends_line(self) -> bool {
        matches!(
            self,
            TokenKind::EndOfLine | TokenKind::EndOfFile | TokenKind::Comment
        )
    }
}

/// A classified piece of source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token. Strings keep their quotes and escapes;
    /// unquoting is the parser's job.
    pub literal: String,
    pub pos: Pos,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, pos: Pos) -> Self {
        Self {
            kind,
            literal: literal.into(),
            pos,
        }
    }
}
