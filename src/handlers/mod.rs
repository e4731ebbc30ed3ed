pub mod artists;
pub mod health;
pub mod pages;
pub mod shows;
pub mod venues;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::{request::Parts, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use maud::Markup;
use serde::Deserialize;
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

use crate::error::AppError;
use crate::state::AppState;
use crate::templates::home_page;

pub fn html_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/health", get(health::health_check))

        // Venues
        .route("/venues", get(venues::list_venues))
        .route("/venues/search", post(venues::search_venues))
        .route(
            "/venues/create",
            get(venues::create_venue_form).post(venues::create_venue_submission),
        )
        .route(
            "/venues/:id",
            get(venues::show_venue).delete(venues::delete_venue),
        )
        .route(
            "/venues/:id/edit",
            get(venues::edit_venue_form).post(venues::edit_venue_submission),
        )
        .route("/venues/:id/delete", post(venues::delete_venue))

        // Artists
        .route("/artists", get(artists::list_artists))
        .route("/artists/search", post(artists::search_artists))
        .route(
            "/artists/create",
            get(artists::create_artist_form).post(artists::create_artist_submission),
        )
        .route("/artists/:id", get(artists::show_artist))
        .route(
            "/artists/:id/edit",
            get(artists::edit_artist_form).post(artists::edit_artist_submission),
        )

        // Shows
        .route("/shows", get(shows::list_shows))
        .route(
            "/shows/create",
            get(shows::create_show_form).post(shows::create_show_submission),
        )

        .fallback(pages::not_found)
}

pub fn router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    html_routes()
        // Stylesheets and images
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Numeric `:id` path segment. Anything else is a missing record, not a
/// malformed request.
pub struct RecordId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound("Missing record id".to_string()))?;

        raw.parse()
            .map(RecordId)
            .map_err(|_| AppError::NotFound(format!("No record with id '{}'", raw)))
    }
}

/// Search box submission, shared by venues and artists.
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

/// `?notice=` left by a redirect after a successful write.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

impl NoticeQuery {
    pub fn message(&self, subject: &str) -> Option<String> {
        match self.notice.as_deref()? {
            "created" => Some(format!("{} was successfully listed!", subject)),
            "updated" => Some(format!("{} was successfully updated!", subject)),
            _ => None,
        }
    }
}

/// The submitted form, re-rendered with its validation messages.
pub(crate) fn form_rejected(markup: Markup) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, Html(markup.into_string())).into_response()
}

/// Fallback for a failed write: the home page with `message`, never the
/// underlying error. Missing records still get the 404 page.
pub(crate) fn write_failed(err: AppError, message: &str) -> Response {
    if err.is_not_found() {
        return err.into_response();
    }
    tracing::error!("Write failed: {}", err);
    let markup = home_page(Some((message, "error")));
    (StatusCode::INTERNAL_SERVER_ERROR, Html(markup.into_string())).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_message() {
        let created = NoticeQuery { notice: Some("created".into()) };
        let unknown = NoticeQuery { notice: Some("exploded".into()) };

        assert_eq!(
            created.message("Venue The Dueling Pianos Bar").as_deref(),
            Some("Venue The Dueling Pianos Bar was successfully listed!")
        );
        assert_eq!(unknown.message("Venue"), None);
        assert_eq!(NoticeQuery::default().message("Venue"), None);
    }
}
