use std::fmt::{self, Display};

use crate::consts::GROUP_KEY_SENTINEL;
use crate::utils::format_grouped;

///
/// Feature struct, one staged genomic interval.
///
/// `begin` and `end` are closed coordinates on `sequence_id`. Once staged they hold the
/// anchor-derived boundaries, never the raw location.
///
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Feature {
    pub source_id: String,
    /// Owning gene for transcript features; `None` disables dedup.
    pub group_key: Option<String>,
    pub project_id: String,
    pub sequence_id: String,
    pub begin: i64,
    pub end: i64,
    pub reversed: bool,
    pub weight: i64,
}

impl Feature {
    ///
    /// Identity used to group matches: `(project_id, source_id)`.
    ///
    pub fn identity(&self) -> (&str, &str) {
        (&self.project_id, &self.source_id)
    }

    /// Id shown for a matched feature: the group key when present, else the source id.
    pub fn display_id(&self) -> &str {
        self.group_key.as_deref().unwrap_or(&self.source_id)
    }

    /// The group key as it is written in tables, `none` when absent.
    pub fn group_key_str(&self) -> &str {
        self.group_key.as_deref().unwrap_or(GROUP_KEY_SENTINEL)
    }

    pub fn strand_symbol(&self) -> char {
        if self.reversed { '-' } else { '+' }
    }

    /// `begin <= end`
    pub fn is_valid(&self) -> bool {
        self.begin <= self.end
    }

    pub fn is_comparable(&self, other: &Feature) -> bool {
        self.sequence_id == other.sequence_id
    }

    ///
    /// Region of the feature, e.g. `100 - 200 (+)`.
    ///
    pub fn region(&self) -> String {
        format!("{} - {} ({})", self.begin, self.end, self.strand_symbol())
    }

    ///
    /// Description of the feature as a match, e.g. `PF3D7_0100100: 1,200 - 2,400 (-)`.
    ///
    pub fn matched_region(&self) -> String {
        format!(
            "{}: {} - {} ({})",
            self.display_id(),
            format_grouped(self.begin),
            format_grouped(self.end),
            self.strand_symbol()
        )
    }
}

impl Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.project_id,
            self.source_id,
            self.group_key_str(),
            self.sequence_id,
            self.begin,
            self.end,
            self.strand_symbol(),
            self.weight
        )
    }
}
