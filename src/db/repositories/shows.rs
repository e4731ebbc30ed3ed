use chrono::Utc;
use sea_orm::{
    prelude::DateTimeWithTimeZone, ActiveModelTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, JoinType, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use serde::Serialize;

use crate::db::entities::{artist, show, venue};
use crate::error::{AppError, Result};
use crate::forms::{ShowInput, ValidationErrors};

/// A show joined with the names of its venue and artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct ShowListing {
    pub id: i32,
    pub venue_id: i32,
    pub venue_name: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTimeWithTimeZone,
}

pub struct ShowRepository {
    db: DatabaseConnection,
}

impl ShowRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<ShowListing>> {
        Ok(show::Entity::find()
            .select_only()
            .column_as(show::Column::Id, "id")
            .column_as(show::Column::VenueId, "venue_id")
            .column_as(venue::Column::Name, "venue_name")
            .column_as(show::Column::ArtistId, "artist_id")
            .column_as(artist::Column::Name, "artist_name")
            .column_as(artist::Column::ImageLink, "artist_image_link")
            .column_as(show::Column::StartTime, "start_time")
            .join(JoinType::InnerJoin, show::Relation::Venue.def())
            .join(JoinType::InnerJoin, show::Relation::Artist.def())
            .order_by_asc(show::Column::StartTime)
            .order_by_asc(show::Column::Id)
            .into_model::<ShowListing>()
            .all(&self.db)
            .await?)
    }

    /// Book a show. Both the venue and the artist must already exist.
    pub async fn create(&self, input: &ShowInput) -> Result<show::Model> {
        let txn = self.db.begin().await?;

        let mut errors = ValidationErrors::new();
        if venue::Entity::find_by_id(input.venue_id).one(&txn).await?.is_none() {
            errors.push("venue_id", format!("Venue {} does not exist", input.venue_id));
        }
        if artist::Entity::find_by_id(input.artist_id).one(&txn).await?.is_none() {
            errors.push("artist_id", format!("Artist {} does not exist", input.artist_id));
        }
        if !errors.is_empty() {
            tracing::warn!(
                venue_id = input.venue_id,
                artist_id = input.artist_id,
                "Rejected show for unknown venue or artist"
            );
            return Err(AppError::Validation(errors));
        }

        let show = show::ActiveModel {
            venue_id: Set(input.venue_id),
            artist_id: Set(input.artist_id),
            start_time: Set(input.start_time),
            created_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        tracing::info!(
            show_id = show.id,
            venue_id = show.venue_id,
            artist_id = show.artist_id,
            "Show created"
        );
        Ok(show)
    }
}
