//! Text-to-value conversions shared by the [`Value`](crate::Value)
//! implementations: the boolean vocabulary and radix-aware integer parsing.

use std::fmt;
use std::ops::BitOr;

use num_traits::Num;

use crate::error::ValueError;

/// Which integer notations a field accepts.
///
/// - `DEC`: `42`, `-42`, `+42`
/// - `HEX`: `0x2a` (or bare `2a` when hex is the only mode)
/// - `OCT`: `052` (or bare `52` when octal is the only mode)
///
/// A sign is only accepted in decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntMode(u8);

impl IntMode {
    pub const DEC: IntMode = IntMode(1);
    pub const HEX: IntMode = IntMode(2);
    pub const OCT: IntMode = IntMode(4);

    /// Default for the built-in integer types. Never octal, so zero-padded
    /// decimals like `010` keep their decimal meaning.
    pub const BUILTIN: IntMode = IntMode(1 | 2);
    /// Default for integer newtypes declared with [`int_value!`](crate::int_value).
    pub const NAMED: IntMode = IntMode(1 | 2 | 4);

    /// Parse a mode tag such as `"dh"` or `"o"`. Letters are case-insensitive.
    ///
    /// # Panics
    ///
    /// On an empty tag or a letter other than `d`, `h` or `o`. Used in const
    /// context, so a bad tag in a field descriptor fails to compile.
    pub const fn from_tag(tag: &str) -> IntMode {
        let bytes = tag.as_bytes();
        let mut bits = 0u8;
        let mut i = 0;
        while i < bytes.len() {
            bits |= match bytes[i] {
                b'd' | b'D' => 1,
                b'h' | b'H' => 2,
                b'o' | b'O' => 4,
                _ => panic!("gcfg: integer mode tag may only contain 'd', 'h' and 'o'"),
            };
            i += 1;
        }
        if bits == 0 {
            panic!("gcfg: empty integer mode tag");
        }
        IntMode(bits)
    }

    pub const fn contains(self, other: IntMode) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: IntMode) -> IntMode {
        IntMode(self.0 | other.0)
    }
}

impl BitOr for IntMode {
    type Output = IntMode;

    fn bitor(self, rhs: IntMode) -> IntMode {
        self.union(rhs)
    }
}

impl fmt::Display for IntMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (IntMode::DEC, "dec"),
            (IntMode::HEX, "hex"),
            (IntMode::OCT, "oct"),
        ]
        .into_iter()
        .filter(|(m, _)| self.contains(*m))
        .map(|(_, n)| n)
        .collect();
        f.write_str(&names.join("|"))
    }
}

/// Parse a boolean: `true`/`yes`/`on`/`1` or `false`/`no`/`off`/`0`, in any case.
pub fn parse_bool(text: &str) -> Result<bool, ValueError> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ValueError::invalid(
            text,
            "bool",
            "expected one of true, yes, on, 1, false, no, off, 0",
        )),
    }
}

/// Parse an integer in any of the notations `mode` allows.
///
/// When both hex and octal are allowed without decimal, a value must carry
/// its prefix (`0x` or `0`) to be unambiguous. The whole text must be used.
pub fn parse_int<T: Num>(text: &str, mode: IntMode) -> Result<T, ValueError> {
    const KIND: &str = "integer";
    let s = text.trim();
    let hex_prefixed = s.starts_with("0x") || s.starts_with("0X");
    let oct_prefixed = !hex_prefixed && s.starts_with('0');

    let dec = mode.contains(IntMode::DEC);
    let hex = mode.contains(IntMode::HEX);
    let oct = mode.contains(IntMode::OCT);

    let (radix, body) = if hex && hex_prefixed {
        (16, &s[2..])
    } else if oct && oct_prefixed {
        (8, s)
    } else if dec {
        (10, s)
    } else if hex && oct {
        return Err(ValueError::invalid(
            text,
            KIND,
            "ambiguous notation; prefix hex with 0x and octal with 0",
        ));
    } else if hex {
        (16, s)
    } else {
        (8, s)
    };

    let (sign, digits) = match body.as_bytes().first() {
        Some(b'+' | b'-') if radix == 10 => body.split_at(1),
        _ => ("", body),
    };
    let valid = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if valid == 0 {
        return Err(ValueError::invalid(
            text,
            KIND,
            format!("expected {} digits", radix_name(radix)),
        ));
    }
    if valid < digits.len() {
        return Err(ValueError::extra_characters(text, KIND));
    }
    T::from_str_radix(&format!("{sign}{digits}"), radix)
        .map_err(|_| ValueError::out_of_range(text, KIND))
}

fn radix_name(radix: u32) -> &'static str {
    match radix {
        16 => "hexadecimal",
        8 => "octal",
        _ => "decimal",
    }
}
