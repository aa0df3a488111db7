//! The `ItemStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `tally-store-sqlite`).
//! The web layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::item::{Item, Rating};

/// Abstraction over a Tally storage backend.
///
/// Items are immutable once created and ratings are append-only: no method
/// on this trait updates or deletes an existing row.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ItemStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Items ─────────────────────────────────────────────────────────────

  /// Insert a new item and return it with its assigned id.
  ///
  /// Returns `Ok(None)` when the name is already taken (the storage-level
  /// uniqueness constraint fired), so two concurrent submissions of the
  /// same name both resolve cleanly: one creates, the other sees `None`.
  fn add_item<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Item>, Self::Error>> + Send + 'a;

  /// Point lookup by id. Returns `None` if not found.
  fn get_item(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Item>, Self::Error>> + Send + '_;

  /// Exact-match (case-sensitive) lookup by name.
  fn item_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Item>, Self::Error>> + Send + 'a;

  /// The item with the lowest id, or `None` when no items exist.
  fn first_item(
    &self,
  ) -> impl Future<Output = Result<Option<Item>, Self::Error>> + Send + '_;

  /// The item with the highest id, or `None` when no items exist.
  fn last_item(
    &self,
  ) -> impl Future<Output = Result<Option<Item>, Self::Error>> + Send + '_;

  /// The item with the greatest id strictly below `id`.
  fn item_before(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Item>, Self::Error>> + Send + '_;

  /// The item with the smallest id strictly above `id`.
  fn item_after(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Item>, Self::Error>> + Send + '_;

  // ── Ratings — append-only writes ──────────────────────────────────────

  /// Append one rating row for `item_id`. The caller has already validated
  /// the range; `item_id` must reference an existing item.
  fn add_rating(
    &self,
    item_id: i64,
    value: i64,
  ) -> impl Future<Output = Result<Rating, Self::Error>> + Send + '_;

  /// Full rating history for an item, in submission order.
  fn ratings_for_item(
    &self,
    item_id: i64,
  ) -> impl Future<Output = Result<Vec<Rating>, Self::Error>> + Send + '_;

  /// Arithmetic mean of all rating values for an item, or `None` when the
  /// item has never been rated. "No ratings yet" is a distinct displayed
  /// state from an average of zero.
  fn average_rating(
    &self,
    item_id: i64,
  ) -> impl Future<Output = Result<Option<f64>, Self::Error>> + Send + '_;
}
