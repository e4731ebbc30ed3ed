use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use serde::Serialize;

use super::{
    contains_ignore_case, folds_case_in_sql, name_contains, partition_shows,
    upcoming_show_counts, ShowEntry,
};
use crate::db::entities::{artist, show, venue};
use crate::error::{AppError, Result};
use crate::forms::VenueInput;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueSummary {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// Venues sharing one (city, state) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityGroup {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueDetail {
    pub venue: venue::Model,
    pub past_shows: Vec<ShowEntry>,
    pub upcoming_shows: Vec<ShowEntry>,
}

impl VenueDetail {
    pub fn past_shows_count(&self) -> usize {
        self.past_shows.len()
    }

    pub fn upcoming_shows_count(&self) -> usize {
        self.upcoming_shows.len()
    }
}

pub struct VenueRepository {
    db: DatabaseConnection,
}

impl VenueRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<venue::Model>> {
        Ok(venue::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn get(&self, id: i32) -> Result<venue::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Venue {} not found", id)))
    }

    /// All venues by name, for pickers.
    pub async fn list(&self) -> Result<Vec<venue::Model>> {
        Ok(venue::Entity::find()
            .order_by_asc(venue::Column::Name)
            .order_by_asc(venue::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// One group per distinct (city, state), ordered by state then city.
    pub async fn list_grouped_by_city(&self) -> Result<Vec<CityGroup>> {
        let venues = venue::Entity::find()
            .order_by_asc(venue::Column::State)
            .order_by_asc(venue::Column::City)
            .order_by_asc(venue::Column::Name)
            .order_by_asc(venue::Column::Id)
            .all(&self.db)
            .await?;

        let ids = venues.iter().map(|v| v.id).collect();
        let counts =
            upcoming_show_counts(&self.db, show::Column::VenueId, ids, &Utc::now()).await?;

        let mut groups: Vec<CityGroup> = Vec::new();
        for venue in venues {
            let summary = VenueSummary {
                id: venue.id,
                num_upcoming_shows: counts.get(&venue.id).copied().unwrap_or(0),
                name: venue.name,
            };
            match groups.last_mut() {
                Some(group) if group.city == venue.city && group.state == venue.state => {
                    group.venues.push(summary);
                }
                _ => groups.push(CityGroup {
                    city: venue.city,
                    state: venue.state,
                    venues: vec![summary],
                }),
            }
        }

        Ok(groups)
    }

    pub async fn search(&self, term: &str) -> Result<Vec<venue::Model>> {
        let query = venue::Entity::find()
            .order_by_asc(venue::Column::Name)
            .order_by_asc(venue::Column::Id);

        if folds_case_in_sql(&self.db) {
            return Ok(query
                .filter(contains_ignore_case(venue::Column::Name, term))
                .all(&self.db)
                .await?);
        }

        let rows = query.all(&self.db).await?;
        Ok(rows.into_iter().filter(|r| name_contains(&r.name, term)).collect())
    }

    /// The venue with its shows split around the current time.
    pub async fn detail(&self, id: i32) -> Result<VenueDetail> {
        let venue = self.get(id).await?;

        let shows = show::Entity::find()
            .select_only()
            .column_as(artist::Column::Id, "counterpart_id")
            .column_as(artist::Column::Name, "counterpart_name")
            .column_as(artist::Column::ImageLink, "counterpart_image_link")
            .column_as(show::Column::StartTime, "start_time")
            .join(JoinType::InnerJoin, show::Relation::Artist.def())
            .filter(show::Column::VenueId.eq(id))
            .order_by_asc(show::Column::StartTime)
            .order_by_asc(show::Column::Id)
            .into_model::<ShowEntry>()
            .all(&self.db)
            .await?;

        let (past_shows, upcoming_shows) = partition_shows(shows, &Utc::now());

        Ok(VenueDetail {
            venue,
            past_shows,
            upcoming_shows,
        })
    }

    pub async fn create(&self, input: &VenueInput) -> Result<venue::Model> {
        let now = Utc::now().fixed_offset();
        let txn = self.db.begin().await?;

        let venue = venue::ActiveModel {
            name: Set(input.name.clone()),
            city: Set(input.city.clone()),
            state: Set(input.state.clone()),
            address: Set(input.address.clone()),
            phone: Set(input.phone.clone()),
            genres: Set(input.genres.clone()),
            image_link: Set(input.image_link.clone()),
            facebook_link: Set(input.facebook_link.clone()),
            website: Set(input.website.clone()),
            seeking_talent: Set(input.seeking_talent),
            seeking_description: Set(input.seeking_description.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        tracing::info!(venue_id = venue.id, name = %venue.name, "Venue created");
        Ok(venue)
    }

    /// Replace the editable subset of a venue's fields. Phone, facebook link
    /// and the seeking fields are only ever set on creation.
    pub async fn update(&self, id: i32, input: &VenueInput) -> Result<venue::Model> {
        let txn = self.db.begin().await?;

        let existing = venue::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Venue {} not found", id)))?;

        let mut active: venue::ActiveModel = existing.into();
        active.name = Set(input.name.clone());
        active.state = Set(input.state.clone());
        active.city = Set(input.city.clone());
        active.genres = Set(input.genres.clone());
        active.image_link = Set(input.image_link.clone());
        active.website = Set(input.website.clone());
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        tracing::info!(venue_id = id, "Venue updated");
        Ok(updated)
    }

    /// Delete a venue and every show booked there, shows first.
    pub async fn delete(&self, id: i32) -> Result<venue::Model> {
        let txn = self.db.begin().await?;

        let venue = venue::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Venue {} not found", id)))?;

        let shows = show::Entity::delete_many()
            .filter(show::Column::VenueId.eq(id))
            .exec(&txn)
            .await?;
        venue::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        tracing::info!(
            venue_id = id,
            shows_removed = shows.rows_affected,
            "Venue deleted"
        );
        Ok(venue)
    }
}
