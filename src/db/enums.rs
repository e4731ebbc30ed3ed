use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Which directory a name search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    Venue,
    Artist,
}

impl SearchKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Venue => "venue",
            Self::Artist => "artist",
        }
    }

    /// Path prefix of the detail pages for this kind.
    pub fn base_path(&self) -> &str {
        match self {
            Self::Venue => "/venues",
            Self::Artist => "/artists",
        }
    }
}

/// Position of a show relative to the moment a page is rendered.
///
/// Never stored: a show is past iff its start time is strictly before `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowTiming {
    Past,
    Upcoming,
}

impl ShowTiming {
    pub fn classify(start_time: &DateTime<FixedOffset>, now: &DateTime<Utc>) -> Self {
        if *start_time < *now {
            Self::Past
        } else {
            Self::Upcoming
        }
    }
}
