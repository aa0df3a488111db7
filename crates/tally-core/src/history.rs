//! The rating-history cookie codec.
//!
//! Each browser carries its own last-submitted rating per item in a single
//! `ratings` cookie: a JSON object mapping item-id strings to rating-value
//! strings, e.g. `{"1":"5","7":"-3"}`. The mapping is advisory only — it is
//! never consulted when computing averages — so decoding is defensive:
//! anything that is not a JSON object comes back as an empty history, and
//! individual entries that do not parse as integers are dropped.

use std::collections::BTreeMap;

use serde_json::Value;

/// A browser's last-submitted rating per item id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingHistory(BTreeMap<i64, i64>);

impl RatingHistory {
  /// Decode a raw cookie value. Never fails; malformed input, or input that
  /// parses but is not a JSON object, yields an empty history.
  ///
  /// Entry values may be JSON strings or numbers — other producers of this
  /// cookie have written both — and are normalised to integers here.
  pub fn decode(raw: &str) -> Self {
    let Ok(Value::Object(map)) = serde_json::from_str(raw) else {
      return Self::default();
    };

    let mut entries = BTreeMap::new();
    for (key, value) in map {
      let Ok(item_id) = key.parse::<i64>() else { continue };
      let rating = match value {
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
      };
      if let Some(rating) = rating {
        entries.insert(item_id, rating);
      }
    }
    Self(entries)
  }

  /// Encode to the wire form: a JSON object with string keys and string
  /// values, sorted by key so the output is deterministic.
  pub fn encode(&self) -> String {
    let map: BTreeMap<String, String> = self
      .0
      .iter()
      .map(|(id, rating)| (id.to_string(), rating.to_string()))
      .collect();
    // A string-to-string map cannot fail to serialise.
    serde_json::to_string(&map).unwrap_or_else(|_| "{}".to_owned())
  }

  /// The last rating this browser submitted for `item_id`, if any.
  pub fn get(&self, item_id: i64) -> Option<i64> {
    self.0.get(&item_id).copied()
  }

  /// Record `rating` as the last submission for `item_id`, replacing any
  /// previous entry while leaving other items untouched.
  pub fn insert(&mut self, item_id: i64, rating: i64) {
    self.0.insert(item_id, rating);
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn round_trip() {
    let mut history = RatingHistory::default();
    history.insert(1, 5);
    history.insert(7, -3);

    let decoded = RatingHistory::decode(&history.encode());
    assert_eq!(decoded, history);
  }

  #[test]
  fn encode_is_deterministic_and_stringly() {
    let mut history = RatingHistory::default();
    history.insert(10, -3);
    history.insert(2, 5);
    assert_eq!(history.encode(), r#"{"10":"-3","2":"5"}"#);
  }

  #[test]
  fn decode_accepts_numeric_values() {
    let history = RatingHistory::decode(r#"{"1":5,"2":"-3"}"#);
    assert_eq!(history.get(1), Some(5));
    assert_eq!(history.get(2), Some(-3));
  }

  #[test]
  fn malformed_input_decodes_to_empty() {
    assert!(RatingHistory::decode("").is_empty());
    assert!(RatingHistory::decode("not json").is_empty());
    assert!(RatingHistory::decode("[1,2,3]").is_empty());
    assert!(RatingHistory::decode("\"a string\"").is_empty());
    assert!(RatingHistory::decode("42").is_empty());
  }

  #[test]
  fn unparseable_entries_are_dropped() {
    let history = RatingHistory::decode(r#"{"1":"5","apple":"3","2":true,"3":"many"}"#);
    assert_eq!(history.get(1), Some(5));
    assert_eq!(history.get(2), None);
    assert_eq!(history.get(3), None);
  }

  #[test]
  fn insert_replaces_only_its_own_entry() {
    let mut history = RatingHistory::decode(r#"{"1":"5","2":"7"}"#);
    history.insert(1, -3);
    assert_eq!(history.get(1), Some(-3));
    assert_eq!(history.get(2), Some(7));
  }
}
