//! Handlers for browsing and rating items.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/` | 302 to the lowest-id item, or to `/add_item` when empty |
//! | `GET`  | `/item/{id}` | 404 if unknown |
//! | `POST` | `/item/{id}/rate` | Form field `rating`; 302 back to the item |

use axum::{
  Form,
  extract::{Path, State},
  http::{HeaderMap, StatusCode, header},
  response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tally_core::{error::Error as CoreError, item, nav, store::ItemStore};

use crate::{AppState, cookie, error::Error, pages};

/// `GET /` — land on the first item, or on the creation form when the store
/// is still empty.
pub async fn landing<S>(State(state): State<AppState<S>>) -> Result<Response, Error>
where
  S: ItemStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let target = match state
    .store
    .first_item()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
  {
    Some(item) => format!("/item/{}", item.id),
    None => "/add_item".to_owned(),
  };
  Ok(pages::redirect(&target))
}

/// `GET /item/{id}`
pub async fn view<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  headers: HeaderMap,
) -> Result<Html<String>, Error>
where
  S: ItemStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let item = state
    .store
    .get_item(id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or(Error::NotFound(id))?;

  let average = state
    .store
    .average_rating(id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let user_rating = cookie::history_from_headers(&headers).get(id);

  // The item itself exists, so both directions resolve to something; the
  // fallback to `id` is never taken in practice.
  let prev_id = nav::previous(state.store.as_ref(), id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .map_or(id, |item| item.id);
  let next_id = nav::next(state.store.as_ref(), id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .map_or(id, |item| item.id);

  Ok(Html(pages::item_page(
    &item,
    average,
    user_rating,
    prev_id,
    next_id,
  )))
}

// ─── Rating submission ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RateForm {
  pub rating: Option<String>,
}

/// `POST /item/{id}/rate` — append one rating row, fold the value into the
/// browser's `ratings` cookie, and bounce back to the item page.
pub async fn rate<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  headers: HeaderMap,
  Form(form): Form<RateForm>,
) -> Result<Response, Error>
where
  S: ItemStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  state
    .store
    .get_item(id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or(Error::NotFound(id))?;

  let raw = form.rating.as_deref().unwrap_or_default();
  let value = item::parse_rating(raw).map_err(|e| {
    Error::BadRequest(match e {
      CoreError::RatingOutOfRange(_) => "Rating must be between -10 and 10".to_owned(),
      _ => "Invalid rating value".to_owned(),
    })
  })?;

  state
    .store
    .add_rating(id, value)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  tracing::debug!(item_id = id, value, "rating recorded");

  let mut history = cookie::history_from_headers(&headers);
  history.insert(id, value);

  Ok(
    (
      StatusCode::FOUND,
      [
        (header::LOCATION, format!("/item/{id}")),
        (header::SET_COOKIE, cookie::set_cookie_value(&history)),
      ],
    )
      .into_response(),
  )
}
