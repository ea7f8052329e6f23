//! Storing one assignment into a destination.

use crate::bind::Config;
use crate::error::{ExtraData, Unknown, ValueError};

/// Why [`set`] did not store a value.
#[derive(Debug)]
pub enum SetError {
    /// No field for the section, subsection or variable.
    ExtraData(ExtraData),
    /// The field exists but the text doesn't parse as its type.
    Value(ValueError),
}

/// Store `value` into the variable `name` of `section` (and `subsection`).
///
/// Map-shaped sections get an entry for the subsection on the way, even if the
/// value then fails to parse.
pub fn set<C: Config + ?Sized>(
    config: &mut C,
    section: &str,
    subsection: Option<&str>,
    name: &str,
    value: &str,
) -> Result<(), SetError> {
    let extra = |unknown, variable: Option<&str>| {
        SetError::ExtraData(ExtraData {
            unknown,
            section: section.to_string(),
            subsection: subsection.map(str::to_string),
            variable: variable.map(str::to_string),
        })
    };

    let Some(slot) = config.section(section) else {
        return Err(extra(Unknown::Section, None));
    };
    let Some(record) = slot.select(subsection) else {
        return Err(extra(Unknown::Subsection, None));
    };
    let Some(binding) = record.variable(name) else {
        return Err(extra(Unknown::Variable, Some(name)));
    };
    log::trace!("set {section}.{name} = {value:?}");
    binding
        .value
        .set_text(value, binding.int_mode)
        .map_err(SetError::Value)
}
