//! Handlers for the item-creation form.
//!
//! Validation failures (empty name, whitespace, duplicate) re-render the form
//! with a message at 200 rather than erroring: the user fixes their input and
//! resubmits. Only a successful creation writes anything.

use axum::{
  Form,
  extract::State,
  response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tally_core::{error::Error as CoreError, item, store::ItemStore};

use crate::{AppState, error::Error, pages};

/// `GET /add_item` — the blank form.
pub async fn form() -> Html<String> {
  Html(pages::add_item_page(None))
}

#[derive(Debug, Deserialize)]
pub struct AddForm {
  pub name: Option<String>,
}

/// `POST /add_item` — validate, create, redirect to the new item.
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  Form(form): Form<AddForm>,
) -> Result<Response, Error>
where
  S: ItemStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let name = form.name.as_deref().unwrap_or_default().trim().to_owned();

  if let Err(e) = item::validate_name(&name) {
    return Ok(rerender(&e));
  }

  if state
    .store
    .item_by_name(&name)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .is_some()
  {
    return Ok(rerender(&CoreError::DuplicateName));
  }

  match state
    .store
    .add_item(&name)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
  {
    Some(item) => {
      tracing::info!(id = item.id, name = %item.name, "item created");
      Ok(pages::redirect(&format!("/item/{}", item.id)))
    }
    // Lost a race with a concurrent submission of the same name after the
    // pre-check passed. Same outcome as the pre-check catching it.
    None => Ok(rerender(&CoreError::DuplicateName)),
  }
}

fn rerender(err: &CoreError) -> Response {
  Html(pages::add_item_page(Some(&err.to_string()))).into_response()
}
