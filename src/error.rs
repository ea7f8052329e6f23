//! Error types and the fatal/non-fatal classification.
//!
//! Reading stops at the first *fatal* error: anything lexical, structural, or a
//! value that cannot be coerced into its destination type. The one non-fatal
//! kind is [`GcfgError::ExtraData`], raised when the destination has no field
//! for a section, subsection or variable. Those are collected by a
//! [`Collector`] and reported together at the end of a read (or dropped, in
//! lenient mode), so a single stale key doesn't hide the rest of a file.
//!
//! Errors in the shape of the destination types themselves (schema defects)
//! are not represented here: they are programming errors and panic.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::token::Position;

#[derive(Debug, Error)]
pub enum GcfgError {
    /// Illegal character, bad UTF-8, unterminated string, unknown escape.
    #[error("{position}: {message}")]
    Lexical { position: Position, message: String },

    /// Malformed section header or assignment.
    #[error("{position}: {message}")]
    Syntax { position: Position, message: String },

    /// A value that doesn't parse as its destination type.
    #[error("{position}: invalid value for variable \"{variable}\": {source}")]
    Value {
        position: Position,
        section: String,
        subsection: Option<String>,
        variable: String,
        source: ValueError,
    },

    /// No destination for the data. Non-fatal.
    #[error("{position}: {data}")]
    ExtraData { position: Position, data: ExtraData },

    /// Non-fatal errors collected during a read.
    #[error("{}", join_messages(.0))]
    Warnings(Vec<GcfgError>),

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("App name is required to discover config files; call .app_name() or .file_name() on the builder")]
    AppNameRequired,

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

impl GcfgError {
    /// `false` only for errors caused by data with no matching destination.
    pub fn is_fatal(&self) -> bool {
        match self {
            GcfgError::ExtraData { .. } => false,
            GcfgError::Warnings(list) => list.iter().any(GcfgError::is_fatal),
            _ => true,
        }
    }

    /// Source position of the error, when it is tied to one.
    pub fn position(&self) -> Option<&Position> {
        match self {
            GcfgError::Lexical { position, .. }
            | GcfgError::Syntax { position, .. }
            | GcfgError::Value { position, .. }
            | GcfgError::ExtraData { position, .. } => Some(position),
            _ => None,
        }
    }
}

fn join_messages(errors: &[GcfgError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Discard a non-fatal error, keeping fatal ones.
///
/// ```ignore
/// let mut cfg = Config::default();
/// gcfg::fatal_only(gcfg::read_string_into(&mut cfg, text))?;
/// ```
pub fn fatal_only<T: Default>(result: Result<T, GcfgError>) -> Result<T, GcfgError> {
    match result {
        Err(e) if !e.is_fatal() => Ok(T::default()),
        other => other,
    }
}

/// Which level of the destination lacked a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unknown {
    Section,
    Subsection,
    Variable,
}

impl fmt::Display for Unknown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Unknown::Section => "section",
            Unknown::Subsection => "subsection",
            Unknown::Variable => "variable",
        })
    }
}

/// Data that could not be stored because the destination has no field for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraData {
    pub unknown: Unknown,
    pub section: String,
    pub subsection: Option<String>,
    pub variable: Option<String>,
}

impl fmt::Display for ExtraData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid {}: can't store data at section \"{}\"",
            self.unknown, self.section
        )?;
        if let Some(sub) = &self.subsection {
            write!(f, ", subsection \"{sub}\"")?;
        }
        if let Some(var) = &self.variable {
            write!(f, ", variable \"{var}\"")?;
        }
        Ok(())
    }
}

impl std::error::Error for ExtraData {}

/// Failure to coerce a value string into a destination type.
///
/// Messages quote the raw text and name the kind of value expected.
#[derive(Debug, Error)]
pub enum ValueError {
    #[error("failed to parse {text:?} as {kind}: {reason}")]
    Invalid {
        text: String,
        kind: &'static str,
        reason: String,
    },

    #[error("failed to parse {text:?} as {kind}: extra characters")]
    ExtraCharacters { text: String, kind: &'static str },

    #[error("failed to parse {text:?} as {kind}: value out of range")]
    OutOfRange { text: String, kind: &'static str },

    /// Error from a user-provided parser, reported as is.
    #[error("{0}")]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl ValueError {
    pub fn invalid(text: &str, kind: &'static str, reason: impl fmt::Display) -> Self {
        ValueError::Invalid {
            text: text.to_string(),
            kind,
            reason: reason.to_string(),
        }
    }

    pub fn extra_characters(text: &str, kind: &'static str) -> Self {
        ValueError::ExtraCharacters {
            text: text.to_string(),
            kind,
        }
    }

    pub fn out_of_range(text: &str, kind: &'static str) -> Self {
        ValueError::OutOfRange {
            text: text.to_string(),
            kind,
        }
    }

    pub fn custom(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        ValueError::Custom(err.into())
    }
}

/// Applies the fatal/non-fatal policy over the course of a read.
///
/// Fatal errors pass straight through so the caller can abort. Non-fatal ones
/// are kept (strict) or logged and dropped (lenient).
#[derive(Debug)]
pub struct Collector {
    strict: bool,
    warnings: Vec<GcfgError>,
}

impl Collector {
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            warnings: Vec::new(),
        }
    }

    pub fn collect(&mut self, err: GcfgError) -> Result<(), GcfgError> {
        if err.is_fatal() {
            return Err(err);
        }
        match err {
            GcfgError::Warnings(list) => {
                for e in list {
                    self.collect(e)?;
                }
            }
            e if self.strict => self.warnings.push(e),
            e => log::warn!("ignoring {e}"),
        }
        Ok(())
    }

    pub fn warnings(&self) -> &[GcfgError] {
        &self.warnings
    }

    /// `Err(Warnings)` if anything was collected.
    pub fn finish(self) -> Result<(), GcfgError> {
        if self.warnings.is_empty() {
            Ok(())
        } else {
            Err(GcfgError::Warnings(self.warnings))
        }
    }
}

#[cfg(feature = "rich-errors")]
mod rich {
    use miette::{Diagnostic, NamedSource, SourceSpan};

    use super::GcfgError;

    #[derive(Debug, thiserror::Error, Diagnostic)]
    #[error("{message}")]
    struct SourceDiagnostic {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    }

    impl GcfgError {
        /// Render the error against the text it came from, pointing at the
        /// offending byte. Errors without a position are reported as plain
        /// messages.
        pub fn report(&self, source: &str) -> miette::Report {
            let Some(position) = self.position() else {
                return miette::miette!("{self}");
            };
            let message = match self {
                GcfgError::Lexical { message, .. } | GcfgError::Syntax { message, .. } => {
                    message.clone()
                }
                GcfgError::Value { source, .. } => source.to_string(),
                GcfgError::ExtraData { data, .. } => data.to_string(),
                other => other.to_string(),
            };
            let offset = position.offset.min(source.len());
            miette::Report::new(SourceDiagnostic {
                message,
                src: NamedSource::new(&position.name, source.to_string()),
                span: SourceSpan::from((offset, 0)),
            })
        }
    }
}
