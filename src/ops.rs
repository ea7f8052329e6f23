//! Inspection operations: listing, key lookup, and event and token dumps.
//!
//! Provides the logic behind `gcfg list`, `gcfg get`, `gcfg events` and
//! `gcfg tokens`, and the [`Output`] enum that callers use to display results.

use std::fmt;

use serde_json::{Value as Json, json};

use crate::builder::Source;
use crate::dynamic::Document;
use crate::error::GcfgError;
use crate::parser::Parser;
use crate::read::decode;
use crate::scanner::scan_all;
use crate::token::FileSet;

/// An inspection request, independent of any CLI framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Every assignment, after layering all sources.
    List,
    /// The value of one `section[.subsection].name` key. With `all`, every
    /// value in assignment order instead of the last one.
    Get { key: String, all: bool },
    /// The parse events of each source.
    Events,
    /// The tokens and lexical errors of each source.
    Tokens,
}

/// Result of an operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// `(key, value)` pairs, one per assignment.
    Listing { entries: Vec<(String, String)> },
    /// The values found for one key.
    Values { key: String, values: Vec<String> },
    /// A structured dump, printed as pretty JSON.
    Json(Json),
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Listing { entries } => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key}={value}")?;
                }
                Ok(())
            }
            Output::Values { values, .. } => write!(f, "{}", values.join("\n")),
            Output::Json(value) => {
                let text = serde_json::to_string_pretty(value).map_err(|_| fmt::Error)?;
                write!(f, "{text}")
            }
        }
    }
}

/// Every assignment of `doc` as a flat listing.
pub fn list(doc: &Document) -> Output {
    Output::Listing {
        entries: doc.entries(),
    }
}

/// Look up `key` in `doc`.
pub fn get(doc: &Document, key: &str, all: bool) -> Result<Output, GcfgError> {
    let values: Vec<String> = if all {
        doc.get_all(key).to_vec()
    } else {
        doc.get(key).map(str::to_string).into_iter().collect()
    };
    if values.is_empty() {
        return Err(GcfgError::KeyNotFound(key.to_string()));
    }
    Ok(Output::Values {
        key: key.to_string(),
        values,
    })
}

/// Parse every source and dump its events, each with a resolved position.
/// Stops at the first error.
pub fn events(sources: &[Source]) -> Result<Output, GcfgError> {
    let mut fset = FileSet::new();
    let mut out = Vec::new();
    for (name, bytes) in sources {
        let text = decode(&mut fset, name, bytes)?;
        let file = fset.add_file(name, text);
        let mut events = Vec::new();
        for event in Parser::new(file, text) {
            let event = event?;
            let position = file.position(event.pos());
            let mut value = serde_json::to_value(&event)?;
            if let Some(obj) = value.as_object_mut() {
                obj.remove("pos");
                obj.insert("position".into(), serde_json::to_value(position)?);
            }
            events.push(value);
        }
        out.push(json!({ "file": name, "events": events }));
    }
    Ok(Output::Json(Json::Array(out)))
}

/// Scan every source to the end and dump its tokens and lexical errors.
///
/// Lexical errors are part of the output rather than a failure, so broken
/// files can be inspected. Invalid UTF-8 still fails.
pub fn tokens(sources: &[Source]) -> Result<Output, GcfgError> {
    let mut fset = FileSet::new();
    let mut out = Vec::new();
    for (name, bytes) in sources {
        let text = decode(&mut fset, name, bytes)?;
        let file = fset.add_file(name, text);
        let (tokens, errors) = scan_all(file, text);
        let tokens: Vec<Json> = tokens
            .iter()
            .map(|tok| {
                json!({
                    "kind": tok.kind,
                    "literal": tok.literal,
                    "position": file.position(tok.pos),
                })
            })
            .collect();
        let errors: Vec<Json> = errors
            .iter()
            .map(|err| {
                json!({
                    "message": err.message,
                    "position": file.position(err.pos),
                })
            })
            .collect();
        out.push(json!({ "file": name, "tokens": tokens, "errors": errors }));
    }
    Ok(Output::Json(Json::Array(out)))
}
