//! Reading and writing the `ratings` cookie.
//!
//! The codec itself lives in [`tally_core::history`]; this module only deals
//! with the HTTP framing — finding our cookie among whatever else the client
//! sends, and producing the `Set-Cookie` value after a submission.

use axum::http::{HeaderMap, header};
use tally_core::history::RatingHistory;

pub const COOKIE_NAME: &str = "ratings";

/// Decode the rating history carried by the request, if any.
///
/// Absent or malformed cookies come back as an empty history — a browser
/// with no cookie and a browser with a mangled one look the same to us.
pub fn history_from_headers(headers: &HeaderMap) -> RatingHistory {
  headers
    .get_all(header::COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .find_map(cookie_value)
    .map(RatingHistory::decode)
    .unwrap_or_default()
}

/// Pull the `ratings` value out of a `Cookie` header line.
fn cookie_value(header: &str) -> Option<&str> {
  header.split(';').map(str::trim).find_map(|pair| {
    pair
      .split_once('=')
      .filter(|(name, _)| *name == COOKIE_NAME)
      .map(|(_, value)| value)
  })
}

/// Build the `Set-Cookie` value for a rewritten history.
///
/// `HttpOnly`, path-wide. The reference configuration leaves `Secure` off;
/// a deployment behind TLS should add it.
pub fn set_cookie_value(history: &RatingHistory) -> String {
  format!("{COOKIE_NAME}={}; HttpOnly; Path=/", history.encode())
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;

  fn headers_with_cookie(line: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_str(line).unwrap());
    headers
  }

  #[test]
  fn finds_our_cookie_among_others() {
    let headers =
      headers_with_cookie(r#"session=abc123; ratings={"1":"5"}; theme=dark"#);
    assert_eq!(history_from_headers(&headers).get(1), Some(5));
  }

  #[test]
  fn similarly_named_cookie_is_not_ours() {
    let headers = headers_with_cookie(r#"ratings2={"1":"5"}"#);
    assert!(history_from_headers(&headers).is_empty());
  }

  #[test]
  fn no_cookie_header_decodes_to_empty() {
    assert!(history_from_headers(&HeaderMap::new()).is_empty());
  }

  #[test]
  fn set_cookie_round_trips_through_header_parsing() {
    let mut history = RatingHistory::default();
    history.insert(3, -7);

    let headers = headers_with_cookie(&set_cookie_value(&history).replace("; HttpOnly; Path=/", ""));
    assert_eq!(history_from_headers(&headers), history);
  }
}
