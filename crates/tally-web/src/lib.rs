//! HTTP layer for Tally: the axum router and its five route handlers.
//!
//! Handlers are stateless; everything they know lives in the store behind
//! [`AppState`] and in the client's `ratings` cookie. Each request performs
//! at most one row insert and at most one cookie rewrite.

pub mod add_item;
pub mod cookie;
pub mod error;
pub mod items;
pub mod pages;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use tally_core::store::ItemStore;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// `TALLY_*` environment.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:    String,
  #[serde(default = "default_port")]
  pub port:    u16,
  #[serde(default = "default_db_path")]
  pub db_path: PathBuf,
}

fn default_host() -> String {
  "127.0.0.1".to_owned()
}

fn default_port() -> u16 {
  8080
}

fn default_db_path() -> PathBuf {
  PathBuf::from("tally.db")
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: ItemStore> {
  pub store: Arc<S>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the rating application.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ItemStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/", get(items::landing::<S>))
    .route("/item/{id}", get(items::view::<S>))
    .route("/item/{id}/rate", post(items::rate::<S>))
    .route("/add_item", get(add_item::form).post(add_item::submit::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use tally_core::store::ItemStore as _;
  use tally_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  async fn make_state() -> AppState<SqliteStore> {
    AppState {
      store: Arc::new(SqliteStore::open_in_memory().await.unwrap()),
    }
  }

  async fn get_uri(
    state: AppState<SqliteStore>,
    uri: &str,
    cookie: Option<&str>,
  ) -> Response {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
      builder = builder.header(header::COOKIE, cookie);
    }
    let req = builder.body(Body::empty()).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  async fn post_form(
    state: AppState<SqliteStore>,
    uri: &str,
    body: &str,
    cookie: Option<&str>,
  ) -> Response {
    let mut builder = Request::builder()
      .method("POST")
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
      builder = builder.header(header::COOKIE, cookie);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  fn location(resp: &Response) -> &str {
    resp
      .headers()
      .get(header::LOCATION)
      .expect("Location header")
      .to_str()
      .unwrap()
  }

  /// The bare `name=value` pair from a `Set-Cookie` header, ready to replay
  /// in a `Cookie` header.
  fn replayable_cookie(resp: &Response) -> String {
    resp
      .headers()
      .get(header::SET_COOKIE)
      .expect("Set-Cookie header")
      .to_str()
      .unwrap()
      .split(';')
      .next()
      .unwrap()
      .to_string()
  }

  async fn body_text(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  // ── Landing ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn landing_redirects_to_add_item_when_empty() {
    let state = make_state().await;
    let resp = get_uri(state, "/", None).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/add_item");
  }

  #[tokio::test]
  async fn landing_redirects_to_lowest_id_item() {
    let state = make_state().await;
    state.store.add_item("apple").await.unwrap().unwrap();
    state.store.add_item("banana").await.unwrap().unwrap();

    let resp = get_uri(state, "/", None).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/item/1");
  }

  // ── View item ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn view_unknown_item_returns_404() {
    let state = make_state().await;
    let resp = get_uri(state, "/item/42", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_text(resp).await.contains("Item not found"));
  }

  #[tokio::test]
  async fn view_shows_name_and_no_ratings_sentinel() {
    let state = make_state().await;
    state.store.add_item("apple").await.unwrap().unwrap();

    let resp = get_uri(state, "/item/1", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("apple"));
    assert!(html.contains("No ratings yet."));
    assert!(!html.contains("Your last rating"));
  }

  #[tokio::test]
  async fn view_single_item_nav_self_loops() {
    let state = make_state().await;
    state.store.add_item("apple").await.unwrap().unwrap();

    let html = body_text(get_uri(state, "/item/1", None).await).await;
    assert!(html.contains(r#"<a href="/item/1">Previous</a>"#));
    assert!(html.contains(r#"<a href="/item/1">Next</a>"#));
  }

  #[tokio::test]
  async fn view_nav_wraps_across_three_items() {
    let state = make_state().await;
    for name in ["apple", "banana", "cherry"] {
      state.store.add_item(name).await.unwrap().unwrap();
    }

    let first = body_text(get_uri(state.clone(), "/item/1", None).await).await;
    assert!(first.contains(r#"<a href="/item/3">Previous</a>"#));
    assert!(first.contains(r#"<a href="/item/2">Next</a>"#));

    let last = body_text(get_uri(state, "/item/3", None).await).await;
    assert!(last.contains(r#"<a href="/item/2">Previous</a>"#));
    assert!(last.contains(r#"<a href="/item/1">Next</a>"#));
  }

  #[tokio::test]
  async fn view_shows_prior_rating_from_cookie() {
    let state = make_state().await;
    state.store.add_item("apple").await.unwrap().unwrap();

    let resp =
      get_uri(state, "/item/1", Some(r#"ratings={"1":"7"}"#)).await;
    assert!(body_text(resp).await.contains("Your last rating: 7"));
  }

  #[tokio::test]
  async fn view_tolerates_malformed_cookie() {
    let state = make_state().await;
    state.store.add_item("apple").await.unwrap().unwrap();

    let resp = get_uri(state, "/item/1", Some("ratings=not-json")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!body_text(resp).await.contains("Your last rating"));
  }

  // ── Submit rating ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn rate_persists_redirects_and_sets_cookie() {
    let state = make_state().await;
    state.store.add_item("apple").await.unwrap().unwrap();

    let resp = post_form(state.clone(), "/item/1/rate", "rating=5", None).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/item/1");

    let set_cookie = resp
      .headers()
      .get(header::SET_COOKIE)
      .unwrap()
      .to_str()
      .unwrap();
    assert_eq!(set_cookie, r#"ratings={"1":"5"}; HttpOnly; Path=/"#);

    let ratings = state.store.ratings_for_item(1).await.unwrap();
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0].value, 5);
  }

  #[tokio::test]
  async fn rate_preserves_other_cookie_entries() {
    let state = make_state().await;
    state.store.add_item("apple").await.unwrap().unwrap();
    state.store.add_item("banana").await.unwrap().unwrap();

    let resp = post_form(
      state,
      "/item/2/rate",
      "rating=-3",
      Some(r#"ratings={"1":"5"}"#),
    )
    .await;
    assert_eq!(
      replayable_cookie(&resp),
      r#"ratings={"1":"5","2":"-3"}"#
    );
  }

  #[tokio::test]
  async fn rate_unknown_item_returns_404() {
    let state = make_state().await;
    let resp = post_form(state, "/item/42/rate", "rating=5", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn rate_rejects_out_of_range_and_garbage() {
    let state = make_state().await;
    state.store.add_item("apple").await.unwrap().unwrap();

    for body in ["rating=11", "rating=-11", "rating=five", ""] {
      let resp = post_form(state.clone(), "/item/1/rate", body, None).await;
      assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
      assert!(resp.headers().get(header::SET_COOKIE).is_none());
    }

    // Nothing was appended.
    assert!(state.store.ratings_for_item(1).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn rate_accepts_boundary_values() {
    let state = make_state().await;
    state.store.add_item("apple").await.unwrap().unwrap();

    for body in ["rating=-10", "rating=10"] {
      let resp = post_form(state.clone(), "/item/1/rate", body, None).await;
      assert_eq!(resp.status(), StatusCode::FOUND);
    }
    assert_eq!(state.store.ratings_for_item(1).await.unwrap().len(), 2);
  }

  // ── Add item ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn add_item_form_renders() {
    let state = make_state().await;
    let resp = get_uri(state, "/add_item", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("name=\"name\""));
  }

  #[tokio::test]
  async fn add_item_creates_and_redirects() {
    let state = make_state().await;
    let resp = post_form(state.clone(), "/add_item", "name=apple", None).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/item/1");
    assert!(state.store.item_by_name("apple").await.unwrap().is_some());
  }

  #[tokio::test]
  async fn add_item_trims_surrounding_whitespace() {
    let state = make_state().await;
    let resp =
      post_form(state.clone(), "/add_item", "name=+apple+", None).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(state.store.item_by_name("apple").await.unwrap().is_some());
  }

  #[tokio::test]
  async fn add_item_rejects_empty_name() {
    let state = make_state().await;
    let resp = post_form(state.clone(), "/add_item", "name=++", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
      body_text(resp)
        .await
        .contains("Item name cannot be empty.")
    );
    assert!(state.store.first_item().await.unwrap().is_none());
  }

  #[tokio::test]
  async fn add_item_rejects_name_with_whitespace() {
    let state = make_state().await;
    let resp =
      post_form(state.clone(), "/add_item", "name=green+apple", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
      body_text(resp)
        .await
        .contains("Item name must be a single word without spaces.")
    );
    assert!(state.store.first_item().await.unwrap().is_none());
  }

  #[tokio::test]
  async fn add_item_rejects_duplicate_name() {
    let state = make_state().await;
    post_form(state.clone(), "/add_item", "name=apple", None).await;

    let resp = post_form(state.clone(), "/add_item", "name=apple", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Item already exists."));

    // Only the original row exists.
    assert_eq!(
      state.store.first_item().await.unwrap(),
      state.store.last_item().await.unwrap()
    );
  }

  // ── End-to-end scenario ─────────────────────────────────────────────────────

  #[tokio::test]
  async fn full_rating_flow_across_two_items() {
    let state = make_state().await;

    let resp = post_form(state.clone(), "/add_item", "name=apple", None).await;
    assert_eq!(location(&resp), "/item/1");
    let resp = post_form(state.clone(), "/add_item", "name=banana", None).await;
    assert_eq!(location(&resp), "/item/2");

    let resp = post_form(state.clone(), "/item/1/rate", "rating=5", None).await;
    let cookie = replayable_cookie(&resp);
    let resp = post_form(
      state.clone(),
      "/item/1/rate",
      "rating=-3",
      Some(&cookie),
    )
    .await;
    let cookie = replayable_cookie(&resp);
    assert_eq!(cookie, r#"ratings={"1":"-3"}"#);

    let html =
      body_text(get_uri(state, "/item/1", Some(&cookie)).await).await;
    assert!(html.contains("Average rating: 1.00"), "html: {html}");
    assert!(html.contains("Your last rating: -3"), "html: {html}");
    // Two items, so both directions land on the other one.
    assert!(html.contains(r#"<a href="/item/2">Previous</a>"#));
    assert!(html.contains(r#"<a href="/item/2">Next</a>"#));
  }
}
