//! Reading sources into a destination.
//!
//! The free functions here read one source each and are always strict: any
//! unknown section, subsection or variable is reported as a
//! [`GcfgError::Warnings`] after the rest of the source has been applied. Wrap
//! the call in [`fatal_only`](crate::fatal_only) to ignore them, or use the
//! [builder](crate::Gcfg::builder) for lenient, multi-source reads.

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::bind::Config;
use crate::error::{Collector, GcfgError};
use crate::parser::{Event, Parser};
use crate::set::{SetError, set};
use crate::token::FileSet;

/// Read everything from `reader` into `config`.
pub fn read_into<C: Config + ?Sized>(config: &mut C, mut reader: impl Read) -> Result<(), GcfgError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|source| GcfgError::IoError {
            path: PathBuf::from("<reader>"),
            source,
        })?;
    let mut collector = Collector::new(true);
    read_bytes(config, &mut FileSet::new(), "", &bytes, &mut collector)?;
    collector.finish()
}

/// Read `text` into `config`.
pub fn read_string_into<C: Config + ?Sized>(config: &mut C, text: &str) -> Result<(), GcfgError> {
    let mut collector = Collector::new(true);
    read_source(config, &mut FileSet::new(), "", text, &mut collector)?;
    collector.finish()
}

/// Read the file at `path` into `config`. Error positions carry the path.
pub fn read_file_into<C: Config + ?Sized>(
    config: &mut C,
    path: impl AsRef<Path>,
) -> Result<(), GcfgError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| GcfgError::IoError {
        path: path.to_path_buf(),
        source,
    })?;
    let mut collector = Collector::new(true);
    read_bytes(
        config,
        &mut FileSet::new(),
        &path.display().to_string(),
        &bytes,
        &mut collector,
    )?;
    collector.finish()
}

/// Validate `bytes` as UTF-8 and read them as one source.
pub(crate) fn read_bytes<C: Config + ?Sized>(
    config: &mut C,
    fset: &mut FileSet,
    name: &str,
    bytes: &[u8],
    collector: &mut Collector,
) -> Result<(), GcfgError> {
    let text = decode(fset, name, bytes)?;
    read_source(config, fset, name, text, collector)
}

/// `bytes` as text. Invalid UTF-8 is a lexical error at the first bad byte,
/// positioned in a file registered under `name`.
pub(crate) fn decode<'a>(
    fset: &mut FileSet,
    name: &str,
    bytes: &'a [u8],
) -> Result<&'a str, GcfgError> {
    std::str::from_utf8(bytes).map_err(|e| {
        let valid = std::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default();
        let file = fset.add_file(name, valid);
        GcfgError::Lexical {
            position: file.position(file.pos(valid.len())),
            message: "illegal UTF-8 encoding".to_string(),
        }
    })
}

/// Parse `text` and apply every assignment to `config`.
///
/// Fatal errors abort at once. Unknown names go to `collector` and parsing
/// continues.
fn read_source<C: Config + ?Sized>(
    config: &mut C,
    fset: &mut FileSet,
    name: &str,
    text: &str,
    collector: &mut Collector,
) -> Result<(), GcfgError> {
    let file = fset.add_file(name, text);
    log::debug!("reading {}", display_name(name));
    let mut assignments = 0usize;

    for event in Parser::new(file, text) {
        let Event::Assignment {
            section,
            subsection,
            name: variable,
            value,
            pos,
            ..
        } = event?
        else {
            continue;
        };
        match set(config, &section, subsection.as_deref(), &variable, &value) {
            Ok(()) => assignments += 1,
            Err(SetError::ExtraData(data)) => collector.collect(GcfgError::ExtraData {
                position: file.position(pos),
                data,
            })?,
            Err(SetError::Value(source)) => {
                return Err(GcfgError::Value {
                    position: file.position(pos),
                    section,
                    subsection,
                    variable,
                    source,
                });
            }
        }
    }

    log::debug!(
        "finished {}: {assignments} assignment(s) applied",
        display_name(name)
    );
    Ok(())
}

fn display_name(name: &str) -> &str {
    if name.is_empty() { "<input>" } else { name }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fatal_only;
    use crate::fixtures::test::*;
    use rstest::rstest;
    use std::io::Write;
    use std::net::IpAddr;
    use tempfile::NamedTempFile;

    fn read<C: Config + Default>(text: &str) -> Result<C, GcfgError> {
        let mut cfg = C::default();
        read_string_into(&mut cfg, text)?;
        Ok(cfg)
    }

    fn basic(name: &str) -> Basic {
        Basic {
            section: NameSection { name: name.into() },
            ..Basic::default()
        }
    }

    // --- end-to-end scenarios ---

    #[test]
    fn string_value() {
        assert_eq!(read::<Basic>("[section]\nname=value").unwrap(), basic("value"));
    }

    #[test]
    fn bool_value() {
        let cfg: Typed = read("[section]\nswitch=on").unwrap();
        assert!(cfg.section.switch);
    }

    #[test]
    fn subsection_map() {
        let cfg: Subs =
            read("[profile \"A\"]\ncolor=white\n\n[profile \"B\"]\ncolor=black\n").unwrap();
        assert_eq!(cfg.profile.len(), 2);
        assert_eq!(cfg.profile["A"].color, "white");
        assert_eq!(cfg.profile["B"].color, "black");
    }

    #[test]
    fn multi_value() {
        let cfg: Multi = read("[m1]\nmulti=value1\nmulti=value2").unwrap();
        assert_eq!(cfg.m1.multi, ["value1", "value2"]);
    }

    #[test]
    fn assignment_before_header_changes_nothing() {
        let mut cfg = Basic::default();
        let err = read_string_into(&mut cfg, "name=value").unwrap_err();
        assert!(matches!(err, GcfgError::Syntax { .. }), "{err:?}");
        assert_eq!(cfg, Basic::default());
    }

    #[test]
    fn value_error_mentions_raw_text() {
        let err = read::<Typed>("[section]\nint=X").unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, GcfgError::Value { .. }), "{err:?}");
        assert!(msg.contains("X"), "{msg}");
        assert!(msg.contains("integer"), "{msg}");
        for jargon in ["reflect", "::", "i32"] {
            assert!(!msg.contains(jargon), "{msg}");
        }
    }

    // --- table-driven reads ---

    #[rstest]
    #[case::plain("[section]\nname=value", "value")]
    #[case::leading_ws("\n[section]\nname=value", "value")]
    #[case::ws_around("  [ section ]  \n  name  =  value  ", "value")]
    #[case::tabs("\t[\tsection\t]\t\n\tname\t=\tvalue\t", "value")]
    #[case::crlf("[section]\r\nname=value\r\n", "value")]
    #[case::comment_hash("; cmnt\n[section] # cmnt\nname=value ; cmnt", "value")]
    #[case::quoted("[section]\nname=\"value\"", "value")]
    #[case::quoted_ws("[section]\nname=\" value \"", " value ")]
    #[case::quoted_escape("[section]\nname=\"va\\\"lue\"", "va\"lue")]
    #[case::quoted_backslash("[section]\nname=\"va\\\\lue\"", "va\\lue")]
    #[case::quoted_comment_chars("[section]\nname=\"va;l#ue\"", "va;l#ue")]
    #[case::inner_ws("[section]\nname=va lue", "va lue")]
    #[case::partial_quote("[section]\nname=\"val\" \"ue\"", "val ue")]
    #[case::continuation("[section]\nname=value \\\n value", "value  value")]
    #[case::empty("[section]\nname=", "")]
    #[case::empty_quoted("[section]\nname=\"\"", "")]
    #[case::upper_section("[SECTION]\nname=value", "value")]
    #[case::upper_name("[section]\nNAME=value", "value")]
    #[case::implicit("[section]\nname", "true")]
    #[case::last_wins("[section]\nname=first\nname=second", "second")]
    #[case::split_section("[section]\nname=a\n[other]\n[section]\nname=b", "b")]
    fn reads_name(#[case] text: &str, #[case] want: &str) {
        let cfg: Basic = read(text).unwrap_or_else(|e| panic!("{text:?}: {e}"));
        assert_eq!(cfg.section.name, want);
    }

    #[rstest]
    #[case::no_header("name=value")]
    #[case::empty_subsection("[section \"\"]\nname=value")]
    #[case::unclosed_header("[section\nname=value")]
    #[case::garbage_after_header("[section] x\nname=value")]
    #[case::missing_eq("[section]\nname value")]
    #[case::unterminated_quote("[section]\nname=\"value")]
    #[case::continuation_in_quote("[section]\nname=\"val \\\n ue\"")]
    #[case::unknown_escape("[section]\nname=\"val\\ue\"")]
    #[case::illegal_char("[section]\nname=value\n_=x")]
    #[case::nul("[section]\nname=va\0lue")]
    fn rejects(#[case] text: &str) {
        let err = read::<Basic>(text).unwrap_err();
        assert!(err.is_fatal(), "{text:?}: {err}");
        assert!(err.position().is_some(), "{text:?}: {err}");
    }

    #[test]
    fn quoted_continuation_is_an_unterminated_string() {
        match read::<Basic>("[section]\nname=\"val \\\n ue\"") {
            Err(GcfgError::Lexical { position, message }) => {
                assert_eq!(message, "string not terminated");
                assert_eq!((position.line, position.column), (2, 6));
            }
            other => panic!("Expected Lexical error, got: {other:?}"),
        }
    }

    #[rstest]
    #[case::t1("true", true)]
    #[case::t2("yes", true)]
    #[case::t3("ON", true)]
    #[case::t4("1", true)]
    #[case::f1("false", false)]
    #[case::f2("No", false)]
    #[case::f3("off", false)]
    #[case::f4("0", false)]
    fn reads_bool(#[case] text: &str, #[case] want: bool) {
        let mut cfg = Typed::default();
        cfg.section.switch = !want;
        read_string_into(&mut cfg, &format!("[section]\nswitch={text}")).unwrap();
        assert_eq!(cfg.section.switch, want);
    }

    #[rstest]
    #[case("maybe")]
    #[case("t")]
    #[case("2")]
    #[case("-1")]
    #[case("")]
    fn rejects_bool(#[case] text: &str) {
        let err = read::<Typed>(&format!("[section]\nswitch={text}")).unwrap_err();
        assert!(matches!(err, GcfgError::Value { .. }), "{err:?}");
    }

    #[test]
    fn implicit_bool() {
        let cfg: Typed = read("[section]\nswitch").unwrap();
        assert!(cfg.section.switch);
    }

    #[test]
    fn implicit_value_on_integer_is_an_error() {
        assert!(matches!(
            read::<Typed>("[section]\nint"),
            Err(GcfgError::Value { .. })
        ));
    }

    // --- types without a Default ---

    #[test]
    fn address_fields_in_option_and_vec() {
        let cfg: Net =
            read("[net]\nlisten=127.0.0.1:8080\nallow=10.0.0.1\nallow=::1").unwrap();
        assert_eq!(cfg.net.listen, Some("127.0.0.1:8080".parse().unwrap()));
        assert_eq!(
            cfg.net.allow,
            ["10.0.0.1".parse::<IpAddr>().unwrap(), "::1".parse().unwrap()]
        );
    }

    #[test]
    fn bad_address_leaves_option_unset() {
        let mut cfg = Net::default();
        let err = read_string_into(&mut cfg, "[net]\nlisten=localhost").unwrap_err();
        assert!(matches!(err, GcfgError::Value { .. }), "{err:?}");
        assert!(err.to_string().contains("socket address"), "{err}");
        assert_eq!(cfg.net.listen, None);
    }

    // --- integers ---

    #[test]
    fn builtin_ints_read_zero_padded_as_decimal() {
        let cfg: Typed = read("[section]\nint=010\nuint=0x1f").unwrap();
        assert_eq!(cfg.section.int, 10);
        assert_eq!(cfg.section.uint, 31);
    }

    #[test]
    fn named_ints_read_octal() {
        let cfg: Typed = read("[section]\nmode=0777\ndec-mode=0777").unwrap();
        assert_eq!(cfg.section.mode, FileMode(0o777));
        assert_eq!(cfg.section.dec_mode, FileMode(777));
    }

    #[test]
    fn field_int_modes() {
        let cfg: Typed = read("[section]\noct=17\nhex=ff").unwrap();
        assert_eq!(cfg.section.oct, 0o17);
        assert_eq!(cfg.section.hex, 255);
    }

    #[test]
    fn integer_errors() {
        for text in ["[section]\nint=1A", "[section]\nuint=256", "[section]\nint=-0x1"] {
            match read::<Typed>(text) {
                Err(GcfgError::Value { variable, .. }) => assert!(!variable.is_empty()),
                other => panic!("Expected Value error for {text:?}, got: {other:?}"),
            }
        }
    }

    #[test]
    fn multi_valued_ints_and_bools() {
        let cfg: Typed = read("[section]\nints=1\nints=0x2\nints=-3\nflags\nflags=off").unwrap();
        assert_eq!(cfg.section.ints, [1, 2, -3]);
        assert_eq!(cfg.section.flags, [true, false]);
    }

    #[test]
    fn multi_values_keep_order_and_duplicates() {
        let cfg: Multi = read("[m1]\nmulti=b\nmulti=a\nmulti=b\nports=80\nports=443").unwrap();
        assert_eq!(cfg.m1.multi, ["b", "a", "b"]);
        assert_eq!(cfg.m1.ports, [80, 443]);
    }

    #[test]
    fn custom_and_scanned_types() {
        let cfg: Typed = read("[section]\nlevel=HIGH\nratio=0.25").unwrap();
        assert_eq!(cfg.section.level, Level::High);
        assert_eq!(cfg.section.ratio, 0.25);

        let err = read::<Typed>("[section]\nlevel=medium").unwrap_err();
        assert!(err.to_string().contains("unknown level \"medium\""), "{err}");
    }

    // --- names ---

    #[test]
    fn hyphenated_names() {
        let cfg: Basic = read("[hyphen-in-section]\nhyphen-in-name=x").unwrap();
        assert_eq!(cfg.hyphen_in_section.hyphen_in_name, "x");
    }

    #[test]
    fn renamed_section() {
        let cfg: Basic = read("[Renamed-Section]\nname=x").unwrap();
        assert_eq!(cfg.other.name, "x");
        let err = read::<Basic>("[other]\nname=x").unwrap_err();
        assert!(!err.is_fatal());
    }

    // --- optional and boxed destinations ---

    #[test]
    fn header_only_section_allocates_nothing() {
        let cfg: Optional = read("[extra]\n").unwrap();
        assert!(cfg.extra.is_none());
        let cfg: Subs = read("[profile \"A\"]\n").unwrap();
        assert!(cfg.profile.is_empty());
    }

    #[test]
    fn optional_and_boxed_sections() {
        let cfg: Optional = read("[extra]\nname=a\n[boxed]\nname=b").unwrap();
        assert_eq!(cfg.extra.unwrap().name, "a");
        assert_eq!(cfg.boxed.name, "b");
    }

    #[test]
    fn optional_variable_is_set_only_on_success() {
        let mut cfg = Optional::default();
        assert!(read_string_into(&mut cfg, "[vars]\ncount=lots").is_err());
        assert_eq!(cfg.vars.count, None);
        read_string_into(&mut cfg, "[vars]\ncount=3\nlabel").unwrap();
        assert_eq!(cfg.vars.count, Some(3));
        assert_eq!(cfg.vars.label.as_deref(), Some("true"));
    }

    #[test]
    fn failed_value_keeps_subsection_entry() {
        let mut cfg = Subs::default();
        assert!(read_string_into(&mut cfg, "[limits \"x\"]\nmax=lots").is_err());
        assert_eq!(cfg.limits["x"].max, 0);
    }

    // --- unknown names ---

    #[test]
    fn unknown_names_are_collected_and_reading_continues() {
        let mut cfg = Basic::default();
        let text = "[nosuch]\na=1\n[section]\nbogus=1\nname=value\n[section \"sub\"]\nname=x";
        let err = read_string_into(&mut cfg, text).unwrap_err();
        assert!(!err.is_fatal());
        match &err {
            GcfgError::Warnings(list) => assert_eq!(list.len(), 3),
            other => panic!("Expected Warnings, got: {other:?}"),
        }
        assert_eq!(cfg.section.name, "value");
    }

    #[test]
    fn fatal_only_ignores_unknown_names() {
        let mut cfg = Basic::default();
        fatal_only(read_string_into(&mut cfg, "[section]\nbogus=1\nname=v")).unwrap();
        assert_eq!(cfg.section.name, "v");
    }

    #[test]
    fn fatal_error_after_unknown_name_wins() {
        let err = read::<Basic>("[section]\nbogus=1\n[").unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, GcfgError::Syntax { .. }), "{err:?}");
    }

    #[test]
    fn extra_data_is_positioned() {
        let err = read::<Basic>("[section]\n\n  bogus=1").unwrap_err();
        let list = match err {
            GcfgError::Warnings(list) => list,
            other => panic!("Expected Warnings, got: {other:?}"),
        };
        assert_eq!(list[0].position().map(|p| (p.line, p.column)), Some((3, 3)));
    }

    // --- byte input ---

    #[test]
    fn reader_input() {
        let mut cfg = Basic::default();
        read_into(&mut cfg, "[section]\nname=from reader".as_bytes()).unwrap();
        assert_eq!(cfg.section.name, "from reader");
    }

    #[test]
    fn invalid_utf8_is_positioned() {
        let mut cfg = Basic::default();
        let bytes: &[u8] = b"[section]\nname=va\xfflue";
        match read_into(&mut cfg, bytes) {
            Err(GcfgError::Lexical { position, message }) => {
                assert_eq!(message, "illegal UTF-8 encoding");
                assert_eq!((position.line, position.column), (2, 8));
            }
            other => panic!("Expected Lexical error, got: {other:?}"),
        }
        assert_eq!(cfg, Basic::default());
    }

    // --- files ---

    #[test]
    fn file_input_names_the_file_in_errors() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "[section]\nname=ok\n[broken").unwrap();
        let mut cfg = Basic::default();
        let err = read_file_into(&mut cfg, f.path()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with(&f.path().display().to_string()), "{msg}");
        assert!(msg.contains(":3:"), "{msg}");
        assert_eq!(cfg.section.name, "ok");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Basic::default();
        match read_file_into(&mut cfg, dir.path().join("absent.gcfg")) {
            Err(GcfgError::IoError { path, .. }) => assert!(path.ends_with("absent.gcfg")),
            other => panic!("Expected IoError, got: {other:?}"),
        }
    }
}
