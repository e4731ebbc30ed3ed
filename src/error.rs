use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::forms::ValidationErrors;
use crate::templates::{bad_request_page, not_found_page, server_error_page};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let markup = match self {
            Self::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                server_error_page()
            }
            Self::NotFound(ref msg) => {
                tracing::debug!("Not found: {}", msg);
                not_found_page()
            }
            Self::Validation(ref errors) => bad_request_page(errors.messages()),
        };

        (status, Html(markup.into_string())).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
