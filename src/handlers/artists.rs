use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

use super::{form_rejected, write_failed, NoticeQuery, RecordId, SearchForm};
use crate::{
    db::{enums::SearchKind, repositories},
    error::Result,
    forms::{ArtistInput, FormFields},
    state::AppState,
    templates::{
        artist_detail_page, artist_edit_page, artist_form_page, artists_page,
        search_results_page,
    },
};

const NEW_ARTIST_TITLE: &str = "List a new artist";

pub async fn list_artists(State(state): State<AppState>) -> Result<Html<String>> {
    let artists = state.artists().list().await?;
    Ok(Html(artists_page(&artists).into_string()))
}

pub async fn search_artists(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Result<Html<String>> {
    let results = repositories::search(&state.db, SearchKind::Artist, &form.search_term).await?;
    Ok(Html(
        search_results_page(SearchKind::Artist, &form.search_term, &results).into_string(),
    ))
}

pub async fn show_artist(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>> {
    let detail = state.artists().detail(id).await?;
    let notice = query.message(&format!("Artist {}", detail.artist.name));
    let flash = notice.as_deref().map(|m| (m, "success"));
    Ok(Html(artist_detail_page(&detail, flash).into_string()))
}

pub async fn create_artist_form() -> Html<String> {
    let markup = artist_form_page(NEW_ARTIST_TITLE, "/artists/create", &FormFields::new(), None);
    Html(markup.into_string())
}

pub async fn create_artist_submission(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let fields = FormFields::from(pairs);
    let input = match ArtistInput::parse(&fields) {
        Ok(input) => input,
        Err(errors) => {
            tracing::debug!("Rejected artist submission: {}", errors);
            return form_rejected(artist_form_page(
                NEW_ARTIST_TITLE,
                "/artists/create",
                &fields,
                Some(&errors),
            ));
        }
    };

    match state.artists().create(&input).await {
        Ok(artist) => {
            Redirect::to(&format!("/artists/{}?notice=created", artist.id)).into_response()
        }
        Err(err) => write_failed(
            err,
            &format!("An error occurred. Artist {} could not be listed.", input.name),
        ),
    }
}

pub async fn edit_artist_form(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> Result<Html<String>> {
    let artist = state.artists().get(id).await?;
    let fields = FormFields::from(&artist);
    Ok(Html(artist_edit_page(&artist, &fields, None).into_string()))
}

pub async fn edit_artist_submission(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let artist = state.artists().get(id).await?;

    let fields = FormFields::from(pairs);
    let input = match ArtistInput::parse(&fields) {
        Ok(input) => input,
        Err(errors) => {
            return Ok(form_rejected(artist_edit_page(&artist, &fields, Some(&errors))));
        }
    };

    Ok(match state.artists().update(id, &input).await {
        Ok(_) => Redirect::to(&format!("/artists/{}?notice=updated", id)).into_response(),
        Err(err) => write_failed(
            err,
            &format!("An error occurred. Artist {} could not be updated.", artist.name),
        ),
    })
}
