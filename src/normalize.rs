//! Name normalization
//!
//! Patent XML in the wild spells the same attribute several ways
//! (`load-source`, `LOAD_SOURCE`, `Load-Source`) and may or may not carry a
//! namespace prefix on element names. Every name comparison in the crate goes
//! through [`names_match`] so the tolerance rules live in one place.

use std::fmt;

/// Canonical separator used by [`normalize`].
pub const CANONICAL_SEPARATOR: char = '-';

/// A name reduced to its canonical comparison form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if the canonical form contains the canonical form of `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(normalize(needle).as_str())
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for NormalizedKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NormalizedKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Lower-case `name` and replace every `_` with `-`.
///
/// Never fails; the empty string normalizes to the empty string.
pub fn normalize(name: &str) -> NormalizedKey {
    let key = name
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == '_' { CANONICAL_SEPARATOR } else { c })
        .collect();
    NormalizedKey(key)
}

/// Strip a namespace prefix (`ns:name`) or Clark notation (`{uri}name`).
pub fn local_name(qualified: &str) -> &str {
    let after_uri = match qualified.rfind('}') {
        Some(idx) => &qualified[idx + 1..],
        None => qualified,
    };
    match after_uri.rfind(':') {
        Some(idx) => &after_uri[idx + 1..],
        None => after_uri,
    }
}

/// Compare a raw element or attribute name against a canonical name,
/// ignoring namespace prefix, letter case and `-`/`_` spelling.
pub fn names_match(raw: &str, canonical: &str) -> bool {
    normalize(local_name(raw)) == normalize(canonical)
}
