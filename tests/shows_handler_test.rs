//! Integration tests for show routes and the site-wide pages

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use pretty_assertions::assert_eq;
use sea_orm::{EntityTrait, PaginatorTrait};
use tower::util::ServiceExt;

use showbook::db::entities::show;
use showbook::handlers;
use showbook::state::AppState;
use showbook::test_utils::*;

fn create_test_router(state: &AppState) -> Router {
    handlers::html_routes().with_state(state.clone())
}

fn post_form(uri: &str, pairs: &[(&str, &str)]) -> Request<Body> {
    let encoded: Vec<String> = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect();
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(encoded.join("&")))
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

#[tokio::test]
async fn test_home_page() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("action=\"/venues/search\""));
    assert!(body.contains("action=\"/artists/search\""));
}

#[tokio::test]
async fn test_health_check() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app.oneshot(get("/albums")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("404"));
}

#[tokio::test]
async fn test_list_shows() {
    let state = setup_test_app_state().await;
    let venue = create_test_venue(&state.db, "The Musical Hop", "San Francisco", "CA").await;
    let artist = create_test_artist(&state.db, "Guns N Petals").await;
    create_test_show(&state.db, venue.id, artist.id, days_from_now(-2)).await;
    create_test_show(&state.db, venue.id, artist.id, days_from_now(2)).await;

    let app = create_test_router(&state);
    let response = app.oneshot(get("/shows")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert_eq!(body.matches("class=\"show ").count(), 2);
    assert!(body.contains("Guns N Petals"));
    assert!(body.contains("The Musical Hop"));
}

#[tokio::test]
async fn test_create_show_form_offers_venues_and_artists() {
    let state = setup_test_app_state().await;
    let venue = create_test_venue(&state.db, "The Musical Hop", "San Francisco", "CA").await;
    let artist = create_test_artist(&state.db, "Guns N Petals").await;

    let app = create_test_router(&state);
    let response = app.oneshot(get("/shows/create")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains(&format!("option value=\"{}\"", venue.id)));
    assert!(body.contains(&format!("The Musical Hop (#{})", venue.id)));
    assert!(body.contains(&format!("Guns N Petals (#{})", artist.id)));
}

#[tokio::test]
async fn test_create_show_redirects_to_listing() {
    let state = setup_test_app_state().await;
    let venue = create_test_venue(&state.db, "The Musical Hop", "San Francisco", "CA").await;
    let artist = create_test_artist(&state.db, "Guns N Petals").await;

    let venue_id = venue.id.to_string();
    let artist_id = artist.id.to_string();
    let app = create_test_router(&state);
    let response = app
        .clone()
        .oneshot(post_form(
            "/shows/create",
            &[
                ("venue_id", venue_id.as_str()),
                ("artist_id", artist_id.as_str()),
                ("start_time", "2035-05-21T21:30"),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/shows?notice=created"
    );
    assert_eq!(show::Entity::find().count(&state.db).await.unwrap(), 1);

    let response = app.oneshot(get("/shows?notice=created")).await.unwrap();
    let body = body_text(response).await;
    assert!(body.contains("Show was successfully listed!"));
}

#[tokio::test]
async fn test_create_show_unknown_artist() {
    let state = setup_test_app_state().await;
    let venue = create_test_venue(&state.db, "The Musical Hop", "San Francisco", "CA").await;

    let venue_id = venue.id.to_string();
    let app = create_test_router(&state);
    let response = app
        .oneshot(post_form(
            "/shows/create",
            &[
                ("venue_id", venue_id.as_str()),
                ("artist_id", "77"),
                ("start_time", "2035-05-21 21:30:00"),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_text(response).await;
    assert!(body.contains("Artist 77 does not exist"));
    assert_eq!(show::Entity::find().count(&state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_show_bad_input() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(post_form(
            "/shows/create",
            &[
                ("venue_id", "abc"),
                ("artist_id", ""),
                ("start_time", "next tuesday"),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_text(response).await;
    assert!(body.contains("Venue ID must be a positive whole number"));
    assert!(body.contains("Artist ID is required"));
    assert!(body.contains("is not a valid start time"));
}
