#[cfg(test)]
pub mod test {
    use std::collections::{BTreeMap, HashMap};
    use std::net::{IpAddr, SocketAddr};
    use std::str::FromStr;

    use crate::{config, int_value, section, value_from_str};

    // -- Plain sections ---------------------------------------------------------

    #[derive(Debug, Default, PartialEq)]
    pub struct NameSection {
        pub name: String,
    }
    section!(NameSection { name });

    #[derive(Debug, Default, PartialEq)]
    pub struct HyphenSection {
        pub hyphen_in_name: String,
    }
    section!(HyphenSection { hyphen_in_name });

    #[derive(Debug, Default, PartialEq)]
    pub struct Basic {
        pub section: NameSection,
        pub hyphen_in_section: HyphenSection,
        pub other: NameSection,
    }
    config!(Basic {
        section,
        hyphen_in_section,
        other: rename("renamed-section"),
    });

    // -- Multi-valued variables -------------------------------------------------

    #[derive(Debug, Default, PartialEq)]
    pub struct MultiSection {
        pub multi: Vec<String>,
        pub ports: Vec<u16>,
    }
    section!(MultiSection { multi, ports });

    #[derive(Debug, Default, PartialEq)]
    pub struct Multi {
        pub m1: MultiSection,
    }
    config!(Multi { m1 });

    // -- Subsections ------------------------------------------------------------

    #[derive(Debug, Default, PartialEq)]
    pub struct Profile {
        pub color: String,
    }
    section!(Profile { color });

    #[derive(Debug, Default, PartialEq)]
    pub struct Limits {
        pub max: u32,
    }
    section!(Limits { max });

    #[derive(Debug, Default, PartialEq)]
    pub struct Subs {
        pub profile: BTreeMap<String, Profile>,
        pub limits: HashMap<String, Box<Limits>>,
    }
    config!(Subs { profile, limits });

    // -- Optional sections and variables ----------------------------------------

    #[derive(Debug, Default, PartialEq)]
    pub struct OptionalVars {
        pub count: Option<u8>,
        pub label: Option<String>,
    }
    section!(OptionalVars { count, label });

    #[derive(Debug, Default, PartialEq)]
    pub struct Optional {
        pub extra: Option<NameSection>,
        pub boxed: Box<NameSection>,
        pub vars: OptionalVars,
    }
    config!(Optional { extra, boxed, vars });

    // -- Typed variables --------------------------------------------------------

    /// Unix permission bits; octal by default.
    #[derive(Debug, Default, Clone, Copy, PartialEq)]
    pub struct FileMode(pub u32);
    int_value!(FileMode(u32));

    #[derive(Debug, Default, Clone, Copy, PartialEq)]
    pub enum Level {
        #[default]
        Low,
        High,
    }

    impl FromStr for Level {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.to_ascii_lowercase().as_str() {
                "low" => Ok(Level::Low),
                "high" => Ok(Level::High),
                _ => Err(format!("unknown level {s:?}")),
            }
        }
    }
    value_from_str!(Level);

    #[derive(Debug, Default, PartialEq)]
    pub struct TypedSection {
        pub name: String,
        pub switch: bool,
        pub int: i32,
        pub uint: u8,
        pub mode: FileMode,
        pub dec_mode: FileMode,
        pub oct: u32,
        pub hex: i64,
        pub level: Level,
        pub ratio: f64,
        pub ints: Vec<i32>,
        pub flags: Vec<bool>,
    }
    section!(TypedSection {
        name,
        switch,
        int,
        uint,
        mode,
        dec_mode: int("d"),
        oct: int("o"),
        hex: int("h"),
        level,
        ratio,
        ints,
        flags,
    });

    #[derive(Debug, Default, PartialEq)]
    pub struct Typed {
        pub section: TypedSection,
    }
    config!(Typed { section });

    // -- Types without a Default -----------------------------------------------

    #[derive(Debug, Default, PartialEq)]
    pub struct NetSection {
        pub listen: Option<SocketAddr>,
        pub allow: Vec<IpAddr>,
    }
    section!(NetSection { listen, allow });

    #[derive(Debug, Default, PartialEq)]
    pub struct Net {
        pub net: NetSection,
    }
    config!(Net { net });

    #[test]
    fn fixtures_start_empty() {
        let typed = Typed::default();
        assert_eq!(typed.section.mode, FileMode(0));
        assert_eq!(typed.section.level, Level::Low);
        assert!(Subs::default().profile.is_empty());
        assert!(Optional::default().extra.is_none());
    }
}
