use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use maud::Markup;

use super::{form_rejected, write_failed, NoticeQuery};
use crate::{
    error::{AppError, Result},
    forms::{FormFields, ShowInput, ValidationErrors},
    state::AppState,
    templates::{show_form_page, shows_page},
};

pub async fn list_shows(
    State(state): State<AppState>,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>> {
    let shows = state.shows().list().await?;
    let notice = query.message("Show");
    let flash = notice.as_deref().map(|m| (m, "success"));
    Ok(Html(shows_page(&shows, flash).into_string()))
}

async fn render_show_form(
    state: &AppState,
    fields: &FormFields,
    errors: Option<&ValidationErrors>,
) -> Result<Markup> {
    let venues = state.venues().list().await?;
    let artists = state.artists().list().await?;
    Ok(show_form_page(fields, errors, &venues, &artists))
}

pub async fn create_show_form(State(state): State<AppState>) -> Result<Html<String>> {
    let markup = render_show_form(&state, &FormFields::new(), None).await?;
    Ok(Html(markup.into_string()))
}

pub async fn create_show_submission(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let fields = FormFields::from(pairs);

    let errors = match ShowInput::parse(&fields) {
        Ok(input) => match state.shows().create(&input).await {
            Ok(_) => return Ok(Redirect::to("/shows?notice=created").into_response()),
            Err(AppError::Validation(errors)) => errors,
            Err(err) => {
                return Ok(write_failed(
                    err,
                    "An error occurred during show submission. Show could not be listed.",
                ))
            }
        },
        Err(errors) => errors,
    };

    tracing::debug!("Rejected show submission: {}", errors);
    let markup = render_show_form(&state, &fields, Some(&errors)).await?;
    Ok(form_rejected(markup))
}
