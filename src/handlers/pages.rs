use axum::response::Html;

use crate::error::{AppError, Result};
use crate::templates::home_page;

pub async fn index() -> Html<String> {
    Html(home_page(None).into_string())
}

pub async fn not_found() -> Result<Html<String>> {
    Err(AppError::NotFound("No such page".to_string()))
}
