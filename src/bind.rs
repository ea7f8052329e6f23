//! Binding textual names to destination fields.
//!
//! A destination is a tree of plain structs. The root implements [`Config`]
//! and each of its fields is a section slot ([`SectionSlot`]). A slot is a
//! single record, an `Option` of one, or a map from subsection name to
//! record. Records implement [`Section`] and expose their fields as
//! [`Value`]s.
//!
//! The [`config!`](crate::config) and [`section!`](crate::section) macros
//! write these impls from a field list. Each field becomes a [`Field`]
//! descriptor in a `const` table, so a malformed descriptor is a compile
//! error:
//!
//! ```ignore
//! #[derive(Default)]
//! struct Remote { url: String, fetch: Vec<String>, prune: bool }
//! gcfg::section!(Remote { url, fetch, prune });
//!
//! #[derive(Default)]
//! struct Core { file_mode: u32, editor: Option<String> }
//! gcfg::section!(Core { file_mode: int("o"), editor });
//!
//! #[derive(Default)]
//! struct Config { core: Core, remote: BTreeMap<String, Remote> }
//! gcfg::config!(Config { core, remote });
//! ```
//!
//! # Name matching
//!
//! Names are compared case-insensitively, with `-` in the text standing for
//! `_` in the field name, so `file-mode` and `FILE_MODE` both reach
//! `file_mode`. A `rename("...")` option replaces the field name and is matched
//! case-insensitively as written. A text name starting with a letter that has
//! no case (as in most CJK scripts) reaches a field named with an `X` prefix.

use std::collections::{BTreeMap, HashMap};

use crate::types::IntMode;
use crate::value::Value;

/// Compile-time description of one field of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub ident: &'static str,
    pub rename: Option<&'static str>,
    pub int_mode: Option<IntMode>,
}

impl Field {
    pub const fn new(ident: &'static str) -> Self {
        Self {
            ident,
            rename: None,
            int_mode: None,
        }
    }

    /// Match `name` instead of the field name.
    pub const fn rename(self, name: &'static str) -> Self {
        if name.is_empty() {
            panic!("gcfg: empty field rename");
        }
        Self {
            rename: Some(name),
            ..self
        }
    }

    /// Integer notations the field accepts, as a tag of `d`, `h` and `o`.
    pub const fn int(self, tag: &'static str) -> Self {
        Self {
            int_mode: Some(IntMode::from_tag(tag)),
            ..self
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self.rename {
            Some(rename) => eq_fold(rename, name),
            None => {
                let ident = self.ident.strip_prefix("r#").unwrap_or(self.ident);
                eq_fold(ident, &fold(name))
            }
        }
    }
}

/// Field-name form of a textual name.
pub fn fold(name: &str) -> String {
    let caseless = name
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() && !c.is_lowercase() && !c.is_uppercase());
    let mut out = String::with_capacity(name.len() + 1);
    if caseless {
        out.push('X');
    }
    out.extend(name.chars().map(|c| if c == '-' { '_' } else { c }));
    out
}

fn eq_fold(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

/// Index of the field matching `name`.
///
/// # Panics
///
/// If more than one field matches. That is a defect in the record type, named
/// by `owner`.
pub fn resolve(fields: &[Field], name: &str, owner: &str) -> Option<usize> {
    let mut found = None;
    for (i, field) in fields.iter().enumerate() {
        if field.matches(name) {
            if let Some(prev) = found {
                let prev: &Field = &fields[prev];
                panic!(
                    "gcfg: fields `{}` and `{}` of {owner} both match {name:?}",
                    prev.ident, field.ident
                );
            }
            found = Some(i);
        }
    }
    found
}

/// A resolved variable: where to store it and how to read integers.
pub struct Binding<'a> {
    pub value: &'a mut dyn Value,
    pub int_mode: Option<IntMode>,
}

/// A record holding the variables of one section.
pub trait Section {
    fn variable(&mut self, name: &str) -> Option<Binding<'_>>;
}

/// A root field that stores one section.
pub trait SectionSlot {
    /// The record for `subsection`, allocating it if needed. `None` if this
    /// slot cannot hold the given subsection.
    fn select(&mut self, subsection: Option<&str>) -> Option<&mut dyn Section>;
}

/// The root of a destination.
pub trait Config {
    fn section(&mut self, name: &str) -> Option<&mut dyn SectionSlot>;
}

/// Allocated on the first assignment into the section. Never has subsections.
impl<S: Section + Default> SectionSlot for Option<S> {
    fn select(&mut self, subsection: Option<&str>) -> Option<&mut dyn Section> {
        if subsection.is_some() {
            return None;
        }
        Some(self.get_or_insert_with(S::default))
    }
}

impl<S: SectionSlot + ?Sized> SectionSlot for Box<S> {
    fn select(&mut self, subsection: Option<&str>) -> Option<&mut dyn Section> {
        (**self).select(subsection)
    }
}

impl<S: Section + ?Sized> Section for Box<S> {
    fn variable(&mut self, name: &str) -> Option<Binding<'_>> {
        (**self).variable(name)
    }
}

/// Keyed by subsection name. A header without a subsection uses `""`.
impl<S: Section + Default> SectionSlot for HashMap<String, S> {
    fn select(&mut self, subsection: Option<&str>) -> Option<&mut dyn Section> {
        let key = subsection.unwrap_or_default().to_string();
        Some(self.entry(key).or_default())
    }
}

/// Keyed by subsection name. A header without a subsection uses `""`.
impl<S: Section + Default> SectionSlot for BTreeMap<String, S> {
    fn select(&mut self, subsection: Option<&str>) -> Option<&mut dyn Section> {
        let key = subsection.unwrap_or_default().to_string();
        Some(self.entry(key).or_default())
    }
}

/// Implement [`Section`] and [`SectionSlot`] for a record.
///
/// Each field may carry options, chained with `.`: `rename("name")` and
/// `int("dho")`.
///
/// ```ignore
/// gcfg::section!(Server { host, port: int("d"), kind: rename("type") });
/// ```
#[macro_export]
macro_rules! section {
    ($ty:ty { $($field:ident $(: $($opt:ident($arg:expr)).+)?),+ $(,)? }) => {
        impl $crate::Section for $ty {
            fn variable(
                &mut self,
                name: &str,
            ) -> ::std::option::Option<$crate::Binding<'_>> {
                const FIELDS: &[$crate::Field] = &[
                    $($crate::Field::new(stringify!($field)) $($(.$opt($arg))+)?),+
                ];
                let index = $crate::bind::resolve(FIELDS, name, stringify!($ty))?;
                let values = [$(&mut self.$field as &mut dyn $crate::Value),+];
                let value = values.into_iter().nth(index)?;
                ::std::option::Option::Some($crate::Binding {
                    value,
                    int_mode: FIELDS[index].int_mode,
                })
            }
        }

        impl $crate::SectionSlot for $ty {
            fn select(
                &mut self,
                subsection: ::std::option::Option<&str>,
            ) -> ::std::option::Option<&mut dyn $crate::Section> {
                match subsection {
                    ::std::option::Option::None => ::std::option::Option::Some(self),
                    ::std::option::Option::Some(_) => ::std::option::Option::None,
                }
            }
        }
    };
}

/// Implement [`Config`] for a root record whose fields are section slots.
///
/// Fields accept the same options as in [`section!`](crate::section).
#[macro_export]
macro_rules! config {
    ($ty:ty { $($field:ident $(: $($opt:ident($arg:expr)).+)?),+ $(,)? }) => {
        impl $crate::Config for $ty {
            fn section(
                &mut self,
                name: &str,
            ) -> ::std::option::Option<&mut dyn $crate::SectionSlot> {
                const FIELDS: &[$crate::Field] = &[
                    $($crate::Field::new(stringify!($field)) $($(.$opt($arg))+)?),+
                ];
                let index = $crate::bind::resolve(FIELDS, name, stringify!($ty))?;
                let slots = [$(&mut self.$field as &mut dyn $crate::SectionSlot),+];
                slots.into_iter().nth(index)
            }
        }
    };
}
