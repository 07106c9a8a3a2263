//! Strand-aware boundary derivation.
//!
//! Each side chooses where its derived begin and end sit: on the feature's start or stop,
//! shifted some distance upstream or downstream. For a reverse-strand feature "start" is the
//! higher coordinate and "upstream" points to higher coordinates, so begin and end swap roles
//! and offsets change sign.
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Start,
    Stop,
}

impl FromStr for Anchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Anchor::Start),
            "stop" => Ok(Anchor::Stop),
            _ => Err(format!("Invalid anchor: {}", s)),
        }
    }
}

impl Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::Start => write!(f, "start"),
            Anchor::Stop => write!(f, "stop"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Upstream,
    Downstream,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "-" | "upstream" => Ok(Direction::Upstream),
            "+" | "downstream" => Ok(Direction::Downstream),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }
}

impl Direction {
    /// Signed shift for an offset in this direction.
    #[inline]
    pub fn apply(self, offset: i64) -> Option<i64> {
        match self {
            Direction::Upstream => offset.checked_neg(),
            Direction::Downstream => Some(offset),
        }
    }
}

///
/// Begin/end anchoring of one side.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnchorSpec {
    pub begin_anchor: Anchor,
    pub begin_direction: Direction,
    pub begin_offset: i64,
    pub end_anchor: Anchor,
    pub end_direction: Direction,
    pub end_offset: i64,
}

impl Default for AnchorSpec {
    /// The feature's own extent: start to stop, no offsets.
    fn default() -> Self {
        AnchorSpec {
            begin_anchor: Anchor::Start,
            begin_direction: Direction::Upstream,
            begin_offset: 0,
            end_anchor: Anchor::Stop,
            end_direction: Direction::Upstream,
            end_offset: 0,
        }
    }
}

impl AnchorSpec {
    ///
    /// Derive the boundaries used for joining from a feature's raw location.
    ///
    /// # Arguments
    /// - begin: raw lower coordinate of the feature
    /// - end: raw upper coordinate of the feature
    /// - reversed: whether the feature is on the reverse strand
    ///
    /// # Returns
    /// - `(derived_begin, derived_end)`, or `None` when a shifted boundary leaves the `i64` range
    pub fn resolve(&self, begin: i64, end: i64, reversed: bool) -> Option<(i64, i64)> {
        let begin_shift = self.begin_direction.apply(self.begin_offset)?;
        let end_shift = self.end_direction.apply(self.end_offset)?;

        if reversed {
            let derived_begin = match self.end_anchor {
                Anchor::Start => end,
                Anchor::Stop => begin,
            }
            .checked_sub(end_shift)?;
            let derived_end = match self.begin_anchor {
                Anchor::Start => end,
                Anchor::Stop => begin,
            }
            .checked_sub(begin_shift)?;
            Some((derived_begin, derived_end))
        } else {
            let derived_begin = match self.begin_anchor {
                Anchor::Start => begin,
                Anchor::Stop => end,
            }
            .checked_add(begin_shift)?;
            let derived_end = match self.end_anchor {
                Anchor::Start => begin,
                Anchor::Stop => end,
            }
            .checked_add(end_shift)?;
            Some((derived_begin, derived_end))
        }
    }
}
