//! Hand-rendered HTML pages and small response helpers.
//!
//! Three pages exist: the item view, the creation form, and a generic error
//! page. The markup is deliberately plain; only dynamic text is escaped.

use axum::{
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use tally_core::Item;

/// Escape text for interpolation into HTML body or attribute position.
pub fn escape_html(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());
  for c in raw.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      _ => out.push(c),
    }
  }
  out
}

/// A 302 redirect to `location`.
pub fn redirect(location: &str) -> Response {
  (
    StatusCode::FOUND,
    [(header::LOCATION, location.to_owned())],
  )
    .into_response()
}

fn page(title: &str, body: &str) -> String {
  format!(
    "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n{body}\n</body>\n</html>\n"
  )
}

/// The item view: name, running average, the visitor's own last rating (if
/// their cookie has one), the rating form, and wrap-around prev/next links.
pub fn item_page(
  item: &Item,
  average: Option<f64>,
  user_rating: Option<i64>,
  prev_id: i64,
  next_id: i64,
) -> String {
  let name = escape_html(&item.name);
  let average_line = match average {
    Some(avg) => format!("{avg:.2}"),
    None => "No ratings yet.".to_owned(),
  };
  let user_line = match user_rating {
    Some(value) => format!("<p>Your last rating: {value}</p>\n"),
    None => String::new(),
  };

  let body = format!(
    "<h1>{name}</h1>\n\
     <p>Average rating: {average_line}</p>\n\
     {user_line}\
     <form method=\"post\" action=\"/item/{id}/rate\">\n\
       <label for=\"rating\">Rate this item ({min} to {max}):</label>\n\
       <input type=\"number\" id=\"rating\" name=\"rating\" min=\"{min}\" max=\"{max}\" required>\n\
       <button type=\"submit\">Rate</button>\n\
     </form>\n\
     <nav><a href=\"/item/{prev_id}\">Previous</a> | <a href=\"/item/{next_id}\">Next</a></nav>\n\
     <p><a href=\"/add_item\">Add an item</a></p>",
    id = item.id,
    min = tally_core::Rating::MIN,
    max = tally_core::Rating::MAX,
  );
  page(&name, &body)
}

/// The creation form, optionally re-rendered with a validation message.
pub fn add_item_page(error: Option<&str>) -> String {
  let error_line = match error {
    Some(message) => format!("<p class=\"error\">{}</p>\n", escape_html(message)),
    None => String::new(),
  };
  let body = format!(
    "<h1>Add an item</h1>\n\
     {error_line}\
     <form method=\"post\" action=\"/add_item\">\n\
       <label for=\"name\">Name (a single word):</label>\n\
       <input type=\"text\" id=\"name\" name=\"name\">\n\
       <button type=\"submit\">Add</button>\n\
     </form>\n\
     <p><a href=\"/\">Back to items</a></p>"
  );
  page("Add an item", &body)
}

/// Terminal error page for 404/400/500 responses.
pub fn error_page(status: StatusCode, message: &str) -> String {
  let body = format!(
    "<h1>{status}</h1>\n<p>{}</p>\n<p><a href=\"/\">Back to items</a></p>",
    escape_html(message)
  );
  page(&status.to_string(), &body)
}
