use std::collections::HashMap;
use std::fmt;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Delivery zone tag used for display and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Nitra,
    Bratislava,
    Sered,
    Trnava,
    Other,
}

impl Region {
    pub fn as_str(self) -> &'static str {
        match self {
            Region::Nitra => "Nitra",
            Region::Bratislava => "Bratislava",
            Region::Sered => "Sered",
            Region::Trnava => "Trnava",
            Region::Other => "Other",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trim, lowercase and strip diacritics so that "  Bratislavský" and
/// "bratislavsky" compare equal.
pub fn normalize_label(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Free-text region spellings mapped to their canonical tag. Keys are stored
/// normalized.
#[derive(Debug, Clone)]
pub struct RegionAliasTable {
    aliases: HashMap<String, Region>,
}

impl RegionAliasTable {
    pub fn new<'a>(aliases: impl IntoIterator<Item = (&'a str, Region)>) -> Self {
        Self {
            aliases: aliases
                .into_iter()
                .map(|(alias, region)| (normalize_label(alias), region))
                .collect(),
        }
    }

    /// Never fails: anything unrecognised, including a missing or blank
    /// input, is `Region::Other`.
    pub fn canonicalize(&self, raw: Option<&str>) -> Region {
        let Some(raw) = raw else {
            return Region::Other;
        };
        let key = normalize_label(raw);
        if key.is_empty() {
            return Region::Other;
        }
        self.aliases.get(&key).copied().unwrap_or(Region::Other)
    }
}

impl Default for RegionAliasTable {
    fn default() -> Self {
        Self::new([
            ("nitriansky", Region::Nitra),
            ("nitra", Region::Nitra),
            ("bratislavsky", Region::Bratislava),
            ("bratislava", Region::Bratislava),
            ("sered", Region::Sered),
            ("trnava", Region::Trnava),
        ])
    }
}
