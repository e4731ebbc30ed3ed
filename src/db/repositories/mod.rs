//! Query/command layer
//!
//! Reads go straight to the connection pool. Every write runs inside its own
//! transaction which is committed at the end of the call and rolled back when
//! dropped early by `?`.

pub mod artists;
pub mod shows;
pub mod venues;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    prelude::DateTimeWithTimeZone,
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    QueryFilter, QuerySelect,
};
use serde::Serialize;

use crate::db::{entities::show, enums::{SearchKind, ShowTiming}};
use crate::error::Result;

pub use artists::{ArtistDetail, ArtistRepository};
pub use shows::{ShowListing, ShowRepository};
pub use venues::{CityGroup, VenueDetail, VenueRepository, VenueSummary};

const LIKE_ESCAPE: char = '\\';

/// Escape LIKE wildcards so the term matches as literal text.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if c == LIKE_ESCAPE || c == '%' || c == '_' {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Case-insensitive "column contains term" condition.
pub(crate) fn contains_ignore_case<C: ColumnTrait>(column: C, term: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
    Expr::expr(Func::lower(Expr::col((column.entity_name(), column))))
        .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

/// Rust-side counterpart of [`contains_ignore_case`], with full Unicode
/// case folding.
pub fn name_contains(name: &str, term: &str) -> bool {
    name.to_lowercase().contains(&term.to_lowercase())
}

/// SQLite's `lower()` only folds ASCII, so names are matched in Rust there.
pub(crate) fn folds_case_in_sql(db: &DatabaseConnection) -> bool {
    db.get_database_backend() != DbBackend::Sqlite
}

/// One show as listed on a venue or artist page. The counterpart is the
/// artist on a venue page and the venue on an artist page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct ShowEntry {
    pub counterpart_id: i32,
    pub counterpart_name: String,
    pub counterpart_image_link: Option<String>,
    pub start_time: DateTimeWithTimeZone,
}

/// Split shows into (past, upcoming), keeping their relative order.
pub fn partition_shows(shows: Vec<ShowEntry>, now: &DateTime<Utc>) -> (Vec<ShowEntry>, Vec<ShowEntry>) {
    shows
        .into_iter()
        .partition(|s| ShowTiming::classify(&s.start_time, now) == ShowTiming::Past)
}

/// Number of upcoming shows per owner id, where `owner` is the venue or
/// artist column of the shows table. Ids without upcoming shows are absent.
pub(crate) async fn upcoming_show_counts(
    db: &DatabaseConnection,
    owner: show::Column,
    ids: Vec<i32>,
    now: &DateTime<Utc>,
) -> Result<HashMap<i32, usize>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i32, DateTimeWithTimeZone)> = show::Entity::find()
        .select_only()
        .column(owner)
        .column(show::Column::StartTime)
        .filter(owner.is_in(ids))
        .into_tuple()
        .all(db)
        .await?;

    let mut counts = HashMap::new();
    for (owner_id, start_time) in rows {
        if ShowTiming::classify(&start_time, now) == ShowTiming::Upcoming {
            *counts.entry(owner_id).or_insert(0) += 1;
        }
    }
    Ok(counts)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<SearchHit>,
}

impl SearchResults {
    fn new(data: Vec<SearchHit>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// Name search over venues or artists.
pub async fn search(db: &DatabaseConnection, kind: SearchKind, term: &str) -> Result<SearchResults> {
    let now = Utc::now();
    let (rows, owner): (Vec<(i32, String)>, show::Column) = match kind {
        SearchKind::Venue => (
            VenueRepository::new(db.clone())
                .search(term)
                .await?
                .into_iter()
                .map(|v| (v.id, v.name))
                .collect(),
            show::Column::VenueId,
        ),
        SearchKind::Artist => (
            ArtistRepository::new(db.clone())
                .search(term)
                .await?
                .into_iter()
                .map(|a| (a.id, a.name))
                .collect(),
            show::Column::ArtistId,
        ),
    };

    let ids = rows.iter().map(|(id, _)| *id).collect();
    let counts = upcoming_show_counts(db, owner, ids, &now).await?;

    let data = rows
        .into_iter()
        .map(|(id, name)| SearchHit {
            id,
            name,
            num_upcoming_shows: counts.get(&id).copied().unwrap_or(0),
        })
        .collect();

    tracing::debug!(kind = kind.as_str(), term, "Search completed");
    Ok(SearchResults::new(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like(""), "");
    }

    #[test]
    fn test_name_contains_folds_unicode() {
        assert!(name_contains("CAFÉ ÉLAN", "café"));
        assert!(name_contains("100% Jazz_Club", "0% jazz_"));
        assert!(!name_contains("1000 Jazz", "0%"));
        assert!(name_contains("Anything", ""));
    }

    fn entry(id: i32, start_time: DateTime<Utc>) -> ShowEntry {
        ShowEntry {
            counterpart_id: id,
            counterpart_name: format!("Artist {}", id),
            counterpart_image_link: None,
            start_time: start_time.fixed_offset(),
        }
    }

    #[test]
    fn test_partition_shows() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let shows = vec![
            entry(1, now - Duration::days(30)),
            entry(2, now - Duration::minutes(1)),
            entry(3, now),
            entry(4, now + Duration::days(7)),
        ];

        let (past, upcoming) = partition_shows(shows, &now);

        let past_ids: Vec<i32> = past.iter().map(|s| s.counterpart_id).collect();
        let upcoming_ids: Vec<i32> = upcoming.iter().map(|s| s.counterpart_id).collect();
        assert_eq!(past_ids, vec![1, 2]);
        assert_eq!(upcoming_ids, vec![3, 4]);
    }
}
