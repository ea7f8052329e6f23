//! Schema-less destinations.
//!
//! [`Variables`] is a section record that accepts every variable name, and
//! [`Document`] is a root that accepts every section. Together they read any
//! well-formed file without declaring its shape first. They are what the
//! `gcfg` command-line tool reads into.
//!
//! A `Variables` field can also sit next to typed fields, to collect the
//! free-form part of an otherwise typed config:
//!
//! ```ignore
//! #[derive(Default)]
//! struct Config { core: Core, alias: Variables }
//! gcfg::config!(Config { core, alias });
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::bind::{Binding, Config, Section, SectionSlot};

/// One variable and every value assigned to it, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Variable {
    /// Spelling of the first assignment.
    pub name: String,
    pub values: Vec<String>,
}

/// Variables of one section, matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Variables {
    vars: Vec<Variable>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.vars.iter().position(|v| eq_fold(&v.name, name))
    }

    /// The last value assigned to `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).last().map(String::as_str)
    }

    /// Every value assigned to `name`, oldest first.
    pub fn get_all(&self, name: &str) -> &[String] {
        match self.position(name) {
            Some(i) => &self.vars[i].values,
            None => &[],
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Variables in order of first assignment.
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.vars.iter()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl Section for Variables {
    fn variable(&mut self, name: &str) -> Option<Binding<'_>> {
        let index = match self.position(name) {
            Some(i) => i,
            None => {
                self.vars.push(Variable {
                    name: name.to_string(),
                    values: Vec::new(),
                });
                self.vars.len() - 1
            }
        };
        Some(Binding {
            value: &mut self.vars[index].values,
            int_mode: None,
        })
    }
}

impl SectionSlot for Variables {
    fn select(&mut self, subsection: Option<&str>) -> Option<&mut dyn Section> {
        match subsection {
            None => Some(self),
            Some(_) => None,
        }
    }
}

/// Every section of a file, by lower-cased section name and then by
/// subsection (`""` when there is none).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Document {
    sections: BTreeMap<String, BTreeMap<String, Variables>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// The variables of `section` and `subsection`.
    pub fn variables(&self, section: &str, subsection: Option<&str>) -> Option<&Variables> {
        self.sections
            .get(&section.to_lowercase())?
            .get(subsection.unwrap_or_default())
    }

    /// The last value for a dotted key: `section.name` or
    /// `section.subsection.name`. The subsection may itself contain dots.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).last().map(String::as_str)
    }

    /// Every value for a dotted key, oldest first.
    pub fn get_all(&self, key: &str) -> &[String] {
        let Some((section, subsection, name)) = split_key(key) else {
            return &[];
        };
        self.variables(section, subsection)
            .map(|vars| vars.get_all(name))
            .unwrap_or_default()
    }

    /// `(key, value)` for every value, sections in name order, variables in
    /// order of first assignment.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for (section, subs) in &self.sections {
            for (sub, vars) in subs {
                let prefix = if sub.is_empty() {
                    section.clone()
                } else {
                    format!("{section}.{sub}")
                };
                for var in vars.iter() {
                    let key = format!("{prefix}.{}", var.name.to_lowercase());
                    out.extend(var.values.iter().map(|v| (key.clone(), v.clone())));
                }
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl Config for Document {
    fn section(&mut self, name: &str) -> Option<&mut dyn SectionSlot> {
        Some(self.sections.entry(name.to_lowercase()).or_default())
    }
}

fn eq_fold(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

/// `section[.subsection].name`
fn split_key(key: &str) -> Option<(&str, Option<&str>, &str)> {
    let (section, rest) = key.split_once('.')?;
    match rest.rsplit_once('.') {
        Some((sub, name)) => Some((section, Some(sub), name)),
        None => Some((section, None, rest)),
    }
}
