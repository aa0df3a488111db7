//! Wrap-around navigation over the ascending-id ordering of items.
//!
//! Items are browsed one at a time; "previous" from the first item wraps to
//! the last, and "next" from the last wraps to the first. With a single item
//! both directions resolve to that item itself.

use crate::{item::Item, store::ItemStore};

/// The item shown before `item_id`: the greatest id strictly below it, or
/// the overall last item when `item_id` is the first.
///
/// Returns `None` only when the store holds no items at all; callers that
/// already hold the current item will never see that.
pub async fn previous<S: ItemStore>(
  store: &S,
  item_id: i64,
) -> Result<Option<Item>, S::Error> {
  match store.item_before(item_id).await? {
    Some(item) => Ok(Some(item)),
    None => store.last_item().await,
  }
}

/// The item shown after `item_id`: the smallest id strictly above it, or
/// the overall first item when `item_id` is the last.
pub async fn next<S: ItemStore>(
  store: &S,
  item_id: i64,
) -> Result<Option<Item>, S::Error> {
  match store.item_after(item_id).await? {
    Some(item) => Ok(Some(item)),
    None => store.first_item().await,
  }
}
