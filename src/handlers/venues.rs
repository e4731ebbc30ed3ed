use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

use super::{form_rejected, write_failed, NoticeQuery, RecordId, SearchForm};
use crate::{
    db::{enums::SearchKind, repositories},
    error::Result,
    forms::{FormFields, VenueInput},
    state::AppState,
    templates::{
        home_page, search_results_page, venue_detail_page, venue_edit_page, venue_form_page,
        venues_page,
    },
};

const NEW_VENUE_TITLE: &str = "List a new venue";

/// Venues grouped by city and state
pub async fn list_venues(State(state): State<AppState>) -> Result<Html<String>> {
    let groups = state.venues().list_grouped_by_city().await?;
    Ok(Html(venues_page(&groups).into_string()))
}

pub async fn search_venues(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Result<Html<String>> {
    let results = repositories::search(&state.db, SearchKind::Venue, &form.search_term).await?;
    Ok(Html(
        search_results_page(SearchKind::Venue, &form.search_term, &results).into_string(),
    ))
}

/// Venue detail page with past and upcoming shows
pub async fn show_venue(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>> {
    let detail = state.venues().detail(id).await?;
    let notice = query.message(&format!("Venue {}", detail.venue.name));
    let flash = notice.as_deref().map(|m| (m, "success"));
    Ok(Html(venue_detail_page(&detail, flash).into_string()))
}

pub async fn create_venue_form() -> Html<String> {
    let markup = venue_form_page(NEW_VENUE_TITLE, "/venues/create", &FormFields::new(), None);
    Html(markup.into_string())
}

pub async fn create_venue_submission(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let fields = FormFields::from(pairs);
    let input = match VenueInput::parse(&fields) {
        Ok(input) => input,
        Err(errors) => {
            tracing::debug!("Rejected venue submission: {}", errors);
            return form_rejected(venue_form_page(
                NEW_VENUE_TITLE,
                "/venues/create",
                &fields,
                Some(&errors),
            ));
        }
    };

    match state.venues().create(&input).await {
        Ok(venue) => Redirect::to(&format!("/venues/{}?notice=created", venue.id)).into_response(),
        Err(err) => write_failed(
            err,
            &format!("An error occurred. Venue {} could not be listed.", input.name),
        ),
    }
}

pub async fn edit_venue_form(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> Result<Html<String>> {
    let venue = state.venues().get(id).await?;
    let fields = FormFields::from(&venue);
    Ok(Html(venue_edit_page(&venue, &fields, None).into_string()))
}

pub async fn edit_venue_submission(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let venue = state.venues().get(id).await?;

    let fields = FormFields::from(pairs);
    let input = match VenueInput::parse(&fields) {
        Ok(input) => input,
        Err(errors) => {
            return Ok(form_rejected(venue_edit_page(&venue, &fields, Some(&errors))));
        }
    };

    Ok(match state.venues().update(id, &input).await {
        Ok(_) => Redirect::to(&format!("/venues/{}?notice=updated", id)).into_response(),
        Err(err) => write_failed(
            err,
            &format!("An error occurred. Venue {} could not be updated.", venue.name),
        ),
    })
}

/// Deletes the venue together with its shows.
pub async fn delete_venue(State(state): State<AppState>, RecordId(id): RecordId) -> Response {
    match state.venues().delete(id).await {
        Ok(venue) => {
            let message = format!("Venue {} was successfully deleted.", venue.name);
            Html(home_page(Some((&message, "success"))).into_string()).into_response()
        }
        Err(err) => write_failed(err, "An error occurred. The venue could not be deleted."),
    }
}
