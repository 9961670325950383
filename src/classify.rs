use std::fmt;

use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

/// Document-format priority of a `load-source` value. Lower ranks sort first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    /// International bureau format (`epo`, and the `docdb` alias)
    Epo,
    /// National patent-office format
    PatentOffice,
    /// Missing or unrecognized load-source
    Unknown,
}

impl Priority {
    pub fn rank(self) -> u8 {
        match self {
            Priority::Epo => 0,
            Priority::PatentOffice => 1,
            Priority::Unknown => 99,
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, Priority::Unknown)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::Epo => "epo",
            Priority::PatentOffice => "patent-office",
            Priority::Unknown => "unknown",
        };
        write!(f, "{} ({})", label, self.rank())
    }
}

/// Classify a raw `load-source` attribute value.
///
/// Matching is contains-based after trimming and normalization, so compound
/// values such as `docdb-raw` still classify. An absent value is `Unknown`;
/// reporting it is left to the caller.
pub fn classify(load_source: Option<&str>) -> Priority {
    let Some(raw) = load_source else {
        return Priority::Unknown;
    };

    let value = normalize(raw.trim());
    if value.contains("docdb") || value == "epo" {
        Priority::Epo
    } else if value.contains("patent-office") || value.contains("patentoffice") {
        Priority::PatentOffice
    } else {
        Priority::Unknown
    }
}
