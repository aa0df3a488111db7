//! `Item` and `Rating` — the two persisted entities.
//!
//! Both are immutable once written: items are never renamed or deleted, and
//! every rating submission appends a fresh row rather than updating an old
//! one, so an item's average always reflects its full history.

use crate::error::{Error, Result};

/// A named, ratable entity. Names are unique (case-sensitive) and contain no
/// whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
  pub id:   i64,
  pub name: String,
}

/// One submitted vote for an item. Append-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rating {
  pub id:      i64,
  pub item_id: i64,
  pub value:   i64,
}

impl Rating {
  /// Inclusive bounds accepted for a rating value.
  pub const MIN: i64 = -10;
  pub const MAX: i64 = 10;
}

/// Validate an already-trimmed item name.
///
/// Rejects the empty string and any name containing whitespace. Uniqueness
/// is the store's business and is checked separately.
pub fn validate_name(name: &str) -> Result<()> {
  if name.is_empty() {
    return Err(Error::EmptyName);
  }
  if name.chars().any(char::is_whitespace) {
    return Err(Error::WhitespaceInName);
  }
  Ok(())
}

/// Parse a submitted rating into an integer within [`Rating::MIN`]..=[`Rating::MAX`].
pub fn parse_rating(raw: &str) -> Result<i64> {
  let value: i64 = raw
    .trim()
    .parse()
    .map_err(|_| Error::RatingNotAnInteger(raw.to_owned()))?;
  if !(Rating::MIN..=Rating::MAX).contains(&value) {
    return Err(Error::RatingOutOfRange(value));
  }
  Ok(value)
}
