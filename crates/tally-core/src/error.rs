//! Error types for `tally-core`.
//!
//! The name-validation variants double as the user-facing messages rendered
//! on the item-creation form, so their `Display` text is full sentences.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("Item name cannot be empty.")]
  EmptyName,

  #[error("Item name must be a single word without spaces.")]
  WhitespaceInName,

  #[error("Item already exists.")]
  DuplicateName,

  #[error("invalid rating value: {0:?}")]
  RatingNotAnInteger(String),

  #[error("rating {0} is outside the range -10..=10")]
  RatingOutOfRange(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
