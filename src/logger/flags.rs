//! Record metadata flags

use crate::error::DebugLogError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// Selects which metadata fields prefix each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags(u32);

impl Flags {
    /// Local date, `2009/01/23`
    pub const DATE: Flags = Flags(1);
    /// Local time, `01:23:23`
    pub const TIME: Flags = Flags(1 << 1);
    /// Microsecond resolution, `01:23:23.123123`. Implies `TIME`.
    pub const MICROSECONDS: Flags = Flags(1 << 2);
    /// Full file path and line number
    pub const LONG_FILE: Flags = Flags(1 << 3);
    /// Final path element and line number. Overrides `LONG_FILE`.
    pub const SHORT_FILE: Flags = Flags(1 << 4);
    /// Render date and time in UTC
    pub const UTC: Flags = Flags(1 << 5);
    /// Put the tag before the message instead of at line start
    pub const MSG_PREFIX: Flags = Flags(1 << 6);

    /// Used when no flags are configured
    pub const DEFAULT: Flags = Flags(Self::DATE.0 | Self::MICROSECONDS.0 | Self::SHORT_FILE.0);

    const NAMED: [(&'static str, Flags); 7] = [
        ("date", Self::DATE),
        ("time", Self::TIME),
        ("microseconds", Self::MICROSECONDS),
        ("longfile", Self::LONG_FILE),
        ("shortfile", Self::SHORT_FILE),
        ("utc", Self::UTC),
        ("msgprefix", Self::MSG_PREFIX),
    ];

    /// No metadata at all
    pub const fn empty() -> Self {
        Flags(0)
    }

    /// Raw bit value
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Build from raw bits, dropping unknown ones
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Flags(bits & 0x7f)
    }

    /// True when no flag is set
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is set
    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    pub(crate) fn wants_time(self) -> bool {
        self.contains(Self::TIME) || self.contains(Self::MICROSECONDS)
    }

    pub(crate) fn wants_file(self) -> bool {
        self.contains(Self::LONG_FILE) || self.contains(Self::SHORT_FILE)
    }

    /// Look up a single flag by its configuration name
    pub fn from_name(name: &str) -> Option<Flags> {
        let name = name.trim().to_ascii_lowercase();
        Self::NAMED
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, f)| *f)
    }

    /// Configuration names of the set flags, in bit order
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMED
            .into_iter()
            .filter(move |(_, flag)| self.contains(*flag))
            .map(|(name, _)| name)
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl FromIterator<Flags> for Flags {
    fn from_iter<I: IntoIterator<Item = Flags>>(iter: I) -> Self {
        iter.into_iter().fold(Flags::empty(), |acc, f| acc | f)
    }
}

/// Parses `date|microseconds|shortfile` (commas also accepted).
impl FromStr for Flags {
    type Err = DebugLogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(['|', ','])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| Flags::from_name(part).ok_or_else(|| DebugLogError::UnknownFlag(part.to_string())))
            .collect()
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.names().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

/// Serialized as a list of names.
impl Serialize for Flags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

/// Accepts a list of names or a single `date|shortfile` string.
impl<'de> Deserialize<'de> for Flags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Joined(String),
            List(Vec<String>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Joined(s) => s.parse().map_err(de::Error::custom),
            Repr::List(names) => names
                .iter()
                .map(|name| Flags::from_name(name).ok_or_else(|| de::Error::custom(format!("unknown flag: {}", name))))
                .collect(),
        }
    }
}
