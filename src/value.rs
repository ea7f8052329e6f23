//! Variable types: how a value string is stored into a destination field.
//!
//! Every field a [`section!`](crate::section) record exposes must implement
//! [`Value`]. The crate covers strings, booleans, all primitive integers, big
//! integers (feature `bigint`), floats, `char`, paths and network addresses,
//! plus three wrappers:
//!
//! - `Vec<T>` is *multi-valued*: each assignment appends one element.
//! - `Option<T>` is filled on the first successful assignment.
//! - `Box<T>` is transparent.
//!
//! The wrappers build new elements through [`Value::from_text`], so types
//! with no `Default` (such as `SocketAddr`) work inside them.
//!
//! Custom types have two shortcuts. [`value_from_str!`](crate::value_from_str)
//! adapts any [`FromStr`](std::str::FromStr) type, reporting its parse errors
//! verbatim. [`int_value!`](crate::int_value) adapts integer newtypes, which
//! (unlike the primitives) accept octal by default:
//!
//! ```ignore
//! struct FileMode(u32);
//! gcfg::int_value!(FileMode(u32));
//! ```

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;

use crate::error::ValueError;
use crate::types::{IntMode, parse_bool, parse_int};

pub trait Value {
    /// Parse `text` and store the result.
    ///
    /// `mode` is the field's integer mode override, if it has one. Types that
    /// aren't integers ignore it.
    fn set_text(&mut self, text: &str, mode: Option<IntMode>) -> Result<(), ValueError>;

    /// Parse `text` into a new value. `Vec<T>` and `Option<T>` build their
    /// elements with this, so `T` needs no `Default`.
    fn from_text(text: &str, mode: Option<IntMode>) -> Result<Self, ValueError>
    where
        Self: Sized;

    /// Whether repeated assignments accumulate rather than overwrite.
    fn is_multi(&self) -> bool {
        false
    }
}

impl Value for String {
    fn set_text(&mut self, text: &str, _mode: Option<IntMode>) -> Result<(), ValueError> {
        self.clear();
        self.push_str(text);
        Ok(())
    }

    fn from_text(text: &str, _mode: Option<IntMode>) -> Result<Self, ValueError> {
        Ok(text.to_string())
    }
}

impl Value for bool {
    fn set_text(&mut self, text: &str, mode: Option<IntMode>) -> Result<(), ValueError> {
        *self = Self::from_text(text, mode)?;
        Ok(())
    }

    fn from_text(text: &str, _mode: Option<IntMode>) -> Result<Self, ValueError> {
        parse_bool(text)
    }
}

macro_rules! builtin_int {
    ($($t:ty),+) => {
        $(
            impl Value for $t {
                fn set_text(&mut self, text: &str, mode: Option<IntMode>) -> Result<(), ValueError> {
                    *self = Self::from_text(text, mode)?;
                    Ok(())
                }

                fn from_text(text: &str, mode: Option<IntMode>) -> Result<Self, ValueError> {
                    parse_int(text, mode.unwrap_or(IntMode::BUILTIN))
                }
            }
        )+
    };
}

builtin_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

#[cfg(feature = "bigint")]
builtin_int!(num_bigint::BigInt, num_bigint::BigUint);

/// Types read through their `FromStr`, with errors reported under a type
/// category.
macro_rules! scanned {
    ($($t:ty => $kind:literal),+ $(,)?) => {
        $(
            impl Value for $t {
                fn set_text(&mut self, text: &str, mode: Option<IntMode>) -> Result<(), ValueError> {
                    *self = Self::from_text(text, mode)?;
                    Ok(())
                }

                fn from_text(text: &str, _mode: Option<IntMode>) -> Result<Self, ValueError> {
                    text.parse::<$t>()
                        .map_err(|e| ValueError::invalid(text, $kind, e))
                }
            }
        )+
    };
}

scanned! {
    f32 => "float",
    f64 => "float",
    char => "character",
    IpAddr => "IP address",
    Ipv4Addr => "IPv4 address",
    Ipv6Addr => "IPv6 address",
    SocketAddr => "socket address",
}

impl Value for PathBuf {
    fn set_text(&mut self, text: &str, _mode: Option<IntMode>) -> Result<(), ValueError> {
        *self = PathBuf::from(text);
        Ok(())
    }

    fn from_text(text: &str, _mode: Option<IntMode>) -> Result<Self, ValueError> {
        Ok(PathBuf::from(text))
    }
}

impl<T: Value> Value for Vec<T> {
    fn set_text(&mut self, text: &str, mode: Option<IntMode>) -> Result<(), ValueError> {
        self.push(T::from_text(text, mode)?);
        Ok(())
    }

    fn from_text(text: &str, mode: Option<IntMode>) -> Result<Self, ValueError> {
        Ok(vec![T::from_text(text, mode)?])
    }

    fn is_multi(&self) -> bool {
        true
    }
}

/// Stored only once parsing succeeds; a failed first assignment leaves `None`.
impl<T: Value> Value for Option<T> {
    fn set_text(&mut self, text: &str, mode: Option<IntMode>) -> Result<(), ValueError> {
        match self {
            Some(value) => value.set_text(text, mode),
            None => {
                *self = Some(T::from_text(text, mode)?);
                Ok(())
            }
        }
    }

    fn from_text(text: &str, mode: Option<IntMode>) -> Result<Self, ValueError> {
        T::from_text(text, mode).map(Some)
    }
}

impl<T: Value> Value for Box<T> {
    fn set_text(&mut self, text: &str, mode: Option<IntMode>) -> Result<(), ValueError> {
        (**self).set_text(text, mode)
    }

    fn from_text(text: &str, mode: Option<IntMode>) -> Result<Self, ValueError> {
        T::from_text(text, mode).map(Box::new)
    }

    fn is_multi(&self) -> bool {
        (**self).is_multi()
    }
}

/// Implement [`Value`] for types with a [`FromStr`](std::str::FromStr) impl.
///
/// The whole value is handed to `from_str`; its error becomes the message.
///
/// ```ignore
/// #[derive(Default)]
/// enum Color { #[default] Red, Blue }
/// impl std::str::FromStr for Color { /* ... */ }
/// gcfg::value_from_str!(Color);
/// ```
#[macro_export]
macro_rules! value_from_str {
    ($($t:ty),+ $(,)?) => {
        $(
            impl $crate::Value for $t {
                fn set_text(
                    &mut self,
                    text: &str,
                    mode: ::std::option::Option<$crate::IntMode>,
                ) -> ::std::result::Result<(), $crate::ValueError> {
                    *self = <Self as $crate::Value>::from_text(text, mode)?;
                    ::std::result::Result::Ok(())
                }

                fn from_text(
                    text: &str,
                    _mode: ::std::option::Option<$crate::IntMode>,
                ) -> ::std::result::Result<Self, $crate::ValueError> {
                    text.parse::<$t>().map_err($crate::ValueError::custom)
                }
            }
        )+
    };
}

/// Implement [`Value`] for single-field integer newtypes.
///
/// Decimal, hex (`0x`) and octal (leading `0`) are all accepted unless the
/// field overrides the mode.
#[macro_export]
macro_rules! int_value {
    ($($t:ident($inner:ty)),+ $(,)?) => {
        $(
            impl $crate::Value for $t {
                fn set_text(
                    &mut self,
                    text: &str,
                    mode: ::std::option::Option<$crate::IntMode>,
                ) -> ::std::result::Result<(), $crate::ValueError> {
                    *self = <Self as $crate::Value>::from_text(text, mode)?;
                    ::std::result::Result::Ok(())
                }

                fn from_text(
                    text: &str,
                    mode: ::std::option::Option<$crate::IntMode>,
                ) -> ::std::result::Result<Self, $crate::ValueError> {
                    ::std::result::Result::Ok($t($crate::parse_int::<$inner>(
                        text,
                        mode.unwrap_or($crate::IntMode::NAMED),
                    )?))
                }
            }
        )+
    };
}
