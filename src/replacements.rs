//! The replacement table.
//!
//! A [`ReplacementMap`] maps single source characters to single destination
//! characters. Sources are disjoint, but any number of sources may share a
//! destination, which is how byte-level variants of one visual glyph are
//! covered: each variant is its own key.
//!
//! The table is assembled in layers: the built-in defaults, an optional TOML
//! file, then `SRC=DST` entries from the command line. A layer may add keys
//! but never redirect an existing one.
//!
//! The built-in table works on decoded characters. A file that stores
//! mojibake as literal text (`â€“` written out as U+00E2 U+20AC U+2013) is
//! not repaired by it: only the trailing U+2013 is replaced. Such
//! sequences need multi-character rewrites, which this table does not do.

use crate::error::{MapError, codepoint};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Built-in table: en dash, whose UTF-8 bytes render as `â€“` when
/// mis-decoded as cp1252, becomes an ASCII hyphen.
const DEFAULT_REPLACEMENTS: &[(char, char)] = &[('\u{2013}', '-')];

/// Immutable-once-built codepoint-to-codepoint substitution table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementMap {
    table: BTreeMap<char, char>,
}

/// On-disk configuration layout.
///
/// ```toml
/// [replacements]
/// "-" = ["U+2013", "—"]
/// ```
///
/// Keys are destinations, values list the sources that map to them.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapConfig {
    #[serde(default)]
    pub replacements: BTreeMap<String, Vec<String>>,
}

impl ReplacementMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in default table.
    pub fn builtin() -> Self {
        let mut map = Self::new();
        for &(source, dest) in DEFAULT_REPLACEMENTS {
            // Constant table, keys are known to be disjoint.
            map.table.insert(source, dest);
        }
        map
    }

    /// Builds a map from `(source, destination)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = (char, char)>,
    {
        let mut map = Self::new();
        for (source, dest) in pairs {
            map.insert(source, dest)?;
        }
        Ok(map)
    }

    /// Adds `source -> dest`.
    ///
    /// Re-adding an identical pair is a no-op. Fails if `source` already maps
    /// to a different character, or if `source` is a line terminator.
    pub fn insert(&mut self, source: char, dest: char) -> Result<(), MapError> {
        if source == '\n' || source == '\r' {
            return Err(MapError::TerminatorKey { key: source });
        }
        match self.table.get(&source) {
            Some(&existing) if existing != dest => Err(MapError::Conflict {
                key: source,
                existing,
                new: dest,
            }),
            Some(_) => Ok(()),
            None => {
                self.table.insert(source, dest);
                Ok(())
            }
        }
    }

    /// Merges every entry of a parsed configuration file.
    pub fn extend_from_config(&mut self, config: &MapConfig) -> Result<(), MapError> {
        for (dest, sources) in &config.replacements {
            let dest = parse_char(dest)?;
            for source in sources {
                self.insert(parse_char(source)?, dest)?;
            }
        }
        Ok(())
    }

    pub fn get(&self, c: char) -> Option<char> {
        self.table.get(&c).copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Entries in codepoint order.
    pub fn iter(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.table.iter().map(|(&k, &v)| (k, v))
    }

    /// True when no destination is replaced further, so one pass reaches a
    /// fixed point.
    pub fn is_idempotent(&self) -> bool {
        self.chained_keys().is_empty()
    }

    /// Sources whose destination is itself replaced by something else, in
    /// codepoint order. A destination that maps to itself is terminal.
    pub fn chained_keys(&self) -> Vec<char> {
        self.table
            .iter()
            .filter(|&(k, v)| k != v && self.get(*v).is_some_and(|next| next != *v))
            .map(|(&k, _)| k)
            .collect()
    }
}

/// Reads and parses a TOML replacement table.
pub fn load_config(path: &Path) -> Result<MapConfig, MapError> {
    let text = std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| MapError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses one character, written literally or as a codepoint.
///
/// Accepted codepoint forms: `U+2013`, `u+2013`, `0x2013`.
pub fn parse_char(s: &str) -> Result<char, MapError> {
    let invalid = || MapError::InvalidChar(s.to_string());

    let hex = s
        .strip_prefix("U+")
        .or_else(|| s.strip_prefix("u+"))
        .or_else(|| s.strip_prefix("0x"));
    if let Some(hex) = hex {
        if hex.is_empty() || hex.len() > 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        return char::from_u32(value).ok_or_else(invalid);
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(invalid()),
    }
}

/// Parses a command-line entry in `SRC=DST` form.
///
/// The separator is the first `=` after the first character, so `==-`
/// maps `=` to `-`.
pub fn parse_entry(s: &str) -> Result<(char, char), MapError> {
    let split = s
        .char_indices()
        .skip(1)
        .find(|&(_, c)| c == '=')
        .map(|(i, _)| i)
        .ok_or_else(|| MapError::Entry(s.to_string()))?;
    let (source, dest) = (&s[..split], &s[split + 1..]);
    Ok((parse_char(source)?, parse_char(dest)?))
}

/// Human-readable listing, one `U+XXXX 'c' -> U+YYYY 'd'` line per entry.
pub fn describe(map: &ReplacementMap) -> Vec<String> {
    map.iter()
        .map(|(k, v)| format!("{} {:?} -> {} {:?}", codepoint(k), k, codepoint(v), v))
        .collect()
}
