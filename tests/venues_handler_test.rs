//! Integration tests for venue routes
//!
//! Drives the HTML router with urlencoded form submissions:
//! - Grouped listing and search
//! - Detail pages and notices
//! - Create / edit with validation failures
//! - Delete through both verbs

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use pretty_assertions::assert_eq;
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait};
use tower::util::ServiceExt;

use showbook::db::entities::{show, venue};
use showbook::handlers;
use showbook::state::AppState;
use showbook::test_utils::*;

/// Helper to create a test router with the HTML routes
fn create_test_router(state: &AppState) -> Router {
    handlers::html_routes().with_state(state.clone())
}

fn form_body(pairs: &[(&str, &str)]) -> Body {
    let encoded: Vec<String> = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect();
    Body::from(encoded.join("&"))
}

fn post_form(uri: &str, pairs: &[(&str, &str)]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(form_body(pairs))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_text(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

const VALID_VENUE: &[(&str, &str)] = &[
    ("name", "The Musical Hop"),
    ("city", "San Francisco"),
    ("state", "CA"),
    ("address", "1015 Folsom Street"),
    ("phone", "123-123-1234"),
    ("genres", "Jazz"),
    ("genres", "Reggae"),
    ("genres", "Folk"),
    ("website", "https://www.themusicalhop.com"),
    ("seeking_talent", "y"),
    ("seeking_description", "We are on the lookout for a local artist"),
];

#[tokio::test]
async fn test_list_venues_empty() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app.oneshot(get("/venues")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("No venues listed yet."));
}

#[tokio::test]
async fn test_list_venues_grouped_by_city() {
    let state = setup_test_app_state().await;
    create_test_venue(&state.db, "The Musical Hop", "San Francisco", "CA").await;
    create_test_venue(&state.db, "Park Square Live Music & Coffee", "San Francisco", "CA").await;
    create_test_venue(&state.db, "The Dueling Pianos Bar", "New York", "NY").await;

    let app = create_test_router(&state);
    let response = app.oneshot(get("/venues")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert_eq!(body.matches("class=\"city-group").count(), 2);
    assert_eq!(body.matches("class=\"venue\"").count(), 3);
    assert!(body.contains("San Francisco, CA"));
    assert!(body.contains("New York, NY"));
}

#[tokio::test]
async fn test_search_venues() {
    let state = setup_test_app_state().await;
    create_test_venue(&state.db, "The Musical Hop", "San Francisco", "CA").await;
    create_test_venue(&state.db, "Park Square Live Music & Coffee", "San Francisco", "CA").await;
    create_test_venue(&state.db, "The Dueling Pianos Bar", "New York", "NY").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(post_form("/venues/search", &[("search_term", "Hop")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("<span class=\"result-count\">1</span>"));
    assert!(body.contains("href=\"/venues/1\""));
    assert!(!body.contains("The Dueling Pianos Bar"));
}

#[tokio::test]
async fn test_search_venues_without_term_lists_all() {
    let state = setup_test_app_state().await;
    create_test_venue(&state.db, "The Musical Hop", "San Francisco", "CA").await;
    create_test_venue(&state.db, "The Dueling Pianos Bar", "New York", "NY").await;

    let app = create_test_router(&state);
    let response = app.oneshot(post_form("/venues/search", &[])).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("<span class=\"result-count\">2</span>"));
}

#[tokio::test]
async fn test_show_venue_with_shows() {
    let state = setup_test_app_state().await;
    let venue = create_test_venue(&state.db, "The Musical Hop", "San Francisco", "CA").await;
    let artist = create_test_artist(&state.db, "Guns N Petals").await;
    create_test_show(&state.db, venue.id, artist.id, days_from_now(-3)).await;
    create_test_show(&state.db, venue.id, artist.id, days_from_now(3)).await;
    create_test_show(&state.db, venue.id, artist.id, days_from_now(6)).await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(get(&format!("/venues/{}", venue.id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("The Musical Hop"));
    assert!(body.contains("2 Upcoming Shows"));
    assert!(body.contains("1 Past Shows"));
    assert!(body.contains(&format!("href=\"/artists/{}\"", artist.id)));
}

#[tokio::test]
async fn test_show_venue_not_found() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app.oneshot(get("/venues/999")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_show_venue_renders_notice() {
    let state = setup_test_app_state().await;
    let venue = create_test_venue(&state.db, "The Musical Hop", "San Francisco", "CA").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(get(&format!("/venues/{}?notice=updated", venue.id)))
        .await
        .unwrap();

    let body = body_text(response).await;
    assert!(body.contains("Venue The Musical Hop was successfully updated!"));
}

#[tokio::test]
async fn test_create_venue_form() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app.oneshot(get("/venues/create")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("action=\"/venues/create\""));
    assert!(body.contains("name=\"genres\""));
}

#[tokio::test]
async fn test_create_venue_redirects_to_detail() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(post_form("/venues/create", VALID_VENUE))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/venues/1?notice=created");

    let stored = venue::Entity::find_by_id(1)
        .one(&state.db)
        .await
        .unwrap()
        .expect("venue should be stored");
    assert_eq!(stored.name, "The Musical Hop");
    assert_eq!(
        stored.genres.0,
        vec!["Jazz".to_string(), "Reggae".to_string(), "Folk".to_string()]
    );
    assert!(stored.seeking_talent);
}

#[tokio::test]
async fn test_create_venue_validation_error() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(post_form(
            "/venues/create",
            &[
                ("city", "San Francisco"),
                ("state", "ZZ"),
                ("website", "not a url"),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_text(response).await;
    assert!(body.contains("Name is required"));
    assert!(body.contains("is not a valid state"));
    assert!(body.contains("Website must be a valid http(s) URL"));
    assert!(body.contains("Pick at least one genre"));
    // Submitted values are kept
    assert!(body.contains("value=\"San Francisco\""));

    assert_eq!(venue::Entity::find().count(&state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_edit_venue_form_is_prefilled() {
    let state = setup_test_app_state().await;
    let venue = create_test_venue(&state.db, "The Musical Hop", "San Francisco", "CA").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(get(&format!("/venues/{}/edit", venue.id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("value=\"The Musical Hop\""));
    assert!(body.contains(&format!("action=\"/venues/{}/edit\"", venue.id)));
}

#[tokio::test]
async fn test_edit_venue_submission() {
    let state = setup_test_app_state().await;
    let venue = create_test_venue(&state.db, "The Musical Hop", "San Francisco", "CA").await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(post_form(
            &format!("/venues/{}/edit", venue.id),
            &[
                ("name", "The Musical Hop Annex"),
                ("city", "Oakland"),
                ("state", "CA"),
                ("genres", "Blues"),
                ("phone", "555-555-5555"),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        format!("/venues/{}?notice=updated", venue.id)
    );

    let stored = venue::Entity::find_by_id(venue.id)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.name, "The Musical Hop Annex");
    assert_eq!(stored.city, "Oakland");
    assert_eq!(stored.phone, venue.phone);
}

#[tokio::test]
async fn test_edit_missing_venue_is_not_found() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(post_form("/venues/12/edit", VALID_VENUE))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_venue_via_form_post() {
    let state = setup_test_app_state().await;
    let venue = create_test_venue(&state.db, "The Musical Hop", "San Francisco", "CA").await;
    let artist = create_test_artist(&state.db, "Guns N Petals").await;
    create_test_show(&state.db, venue.id, artist.id, days_from_now(2)).await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(post_form(&format!("/venues/{}/delete", venue.id), &[]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Venue The Musical Hop was successfully deleted."));

    assert_eq!(venue::Entity::find().count(&state.db).await.unwrap(), 0);
    assert_eq!(show::Entity::find().count(&state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_venue_via_delete_verb() {
    let state = setup_test_app_state().await;
    let venue = create_test_venue(&state.db, "The Dueling Pianos Bar", "New York", "NY").await;

    let app = create_test_router(&state);
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/venues/{}", venue.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get(&format!("/venues/{}", venue.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_missing_venue_is_not_found() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(post_form("/venues/5/delete", &[]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_venue_id_is_not_found() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app.clone().oneshot(get("/venues/abc")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("404"));

    let response = app
        .oneshot(post_form("/venues/abc/edit", VALID_VENUE))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_venue_storage_failure() {
    let state = setup_test_app_state().await;
    state
        .db
        .execute_unprepared(
            "CREATE TRIGGER reject_venues BEFORE INSERT ON venues \
             BEGIN SELECT RAISE(ABORT, 'venue inserts disabled'); END;",
        )
        .await
        .unwrap();

    let app = create_test_router(&state);
    let response = app
        .oneshot(post_form("/venues/create", VALID_VENUE))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_text(response).await;
    assert!(body.contains("An error occurred. Venue The Musical Hop could not be listed."));
    assert!(!body.contains("venue inserts disabled"));
    assert!(!body.contains("Database error"));

    assert_eq!(venue::Entity::find().count(&state.db).await.unwrap(), 0);
}
