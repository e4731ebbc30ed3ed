use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use serde::Serialize;

use super::{
    contains_ignore_case, folds_case_in_sql, name_contains, partition_shows, ShowEntry,
};
use crate::db::entities::{artist, show, venue};
use crate::error::{AppError, Result};
use crate::forms::ArtistInput;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistDetail {
    pub artist: artist::Model,
    pub past_shows: Vec<ShowEntry>,
    pub upcoming_shows: Vec<ShowEntry>,
}

impl ArtistDetail {
    pub fn past_shows_count(&self) -> usize {
        self.past_shows.len()
    }

    pub fn upcoming_shows_count(&self) -> usize {
        self.upcoming_shows.len()
    }
}

pub struct ArtistRepository {
    db: DatabaseConnection,
}

impl ArtistRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<artist::Model>> {
        Ok(artist::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn get(&self, id: i32) -> Result<artist::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Artist {} not found", id)))
    }

    pub async fn list(&self) -> Result<Vec<artist::Model>> {
        Ok(artist::Entity::find()
            .order_by_asc(artist::Column::Name)
            .order_by_asc(artist::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn search(&self, term: &str) -> Result<Vec<artist::Model>> {
        let query = artist::Entity::find()
            .order_by_asc(artist::Column::Name)
            .order_by_asc(artist::Column::Id);

        if folds_case_in_sql(&self.db) {
            return Ok(query
                .filter(contains_ignore_case(artist::Column::Name, term))
                .all(&self.db)
                .await?);
        }

        let rows = query.all(&self.db).await?;
        Ok(rows.into_iter().filter(|r| name_contains(&r.name, term)).collect())
    }

    pub async fn detail(&self, id: i32) -> Result<ArtistDetail> {
        let artist = self.get(id).await?;

        let shows = show::Entity::find()
            .select_only()
            .column_as(venue::Column::Id, "counterpart_id")
            .column_as(venue::Column::Name, "counterpart_name")
            .column_as(venue::Column::ImageLink, "counterpart_image_link")
            .column_as(show::Column::StartTime, "start_time")
            .join(JoinType::InnerJoin, show::Relation::Venue.def())
            .filter(show::Column::ArtistId.eq(id))
            .order_by_asc(show::Column::StartTime)
            .order_by_asc(show::Column::Id)
            .into_model::<ShowEntry>()
            .all(&self.db)
            .await?;

        let (past_shows, upcoming_shows) = partition_shows(shows, &Utc::now());

        Ok(ArtistDetail {
            artist,
            past_shows,
            upcoming_shows,
        })
    }

    pub async fn create(&self, input: &ArtistInput) -> Result<artist::Model> {
        let now = Utc::now().fixed_offset();
        let txn = self.db.begin().await?;

        let artist = artist::ActiveModel {
            name: Set(input.name.clone()),
            city: Set(input.city.clone()),
            state: Set(input.state.clone()),
            phone: Set(input.phone.clone()),
            genres: Set(input.genres.clone()),
            image_link: Set(input.image_link.clone()),
            facebook_link: Set(input.facebook_link.clone()),
            website: Set(input.website.clone()),
            seeking_venue: Set(input.seeking_venue),
            seeking_description: Set(input.seeking_description.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        tracing::info!(artist_id = artist.id, name = %artist.name, "Artist created");
        Ok(artist)
    }

    /// Same editable subset as venues: name, state, city, genres, image link
    /// and website.
    pub async fn update(&self, id: i32, input: &ArtistInput) -> Result<artist::Model> {
        let txn = self.db.begin().await?;

        let existing = artist::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Artist {} not found", id)))?;

        let mut active: artist::ActiveModel = existing.into();
        active.name = Set(input.name.clone());
        active.state = Set(input.state.clone());
        active.city = Set(input.city.clone());
        active.genres = Set(input.genres.clone());
        active.image_link = Set(input.image_link.clone());
        active.website = Set(input.website.clone());
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        tracing::info!(artist_id = id, "Artist updated");
        Ok(updated)
    }
}
