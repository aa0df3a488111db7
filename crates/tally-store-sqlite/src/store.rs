//! [`SqliteStore`] — the SQLite implementation of [`ItemStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use tally_core::{
  item::{Item, Rating},
  store::ItemStore,
};

use crate::{Error, Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Tally store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

fn item_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Item> {
  Ok(Item {
    id:   row.get(0)?,
    name: row.get(1)?,
  })
}

fn rating_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Rating> {
  Ok(Rating {
    id:      row.get(0)?,
    item_id: row.get(1)?,
    value:   row.get(2)?,
  })
}

/// True when `err` is SQLite telling us a constraint (here: the UNIQUE index
/// on `items.name`) rejected the write.
fn is_constraint_violation(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a single-item query with no parameters.
  async fn one_item(&self, sql: &'static str) -> Result<Option<Item>> {
    let item = self
      .conn
      .call(move |conn| Ok(conn.query_row(sql, [], item_from_row).optional()?))
      .await?;
    Ok(item)
  }

  /// Run a single-item query keyed on an id parameter.
  async fn one_item_by_id(&self, sql: &'static str, id: i64) -> Result<Option<Item>> {
    let item = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(sql, rusqlite::params![id], item_from_row)
            .optional()?,
        )
      })
      .await?;
    Ok(item)
  }
}

// ─── ItemStore impl ──────────────────────────────────────────────────────────

impl ItemStore for SqliteStore {
  type Error = Error;

  // ── Items ─────────────────────────────────────────────────────────────────

  async fn add_item(&self, name: &str) -> Result<Option<Item>> {
    let name = name.to_owned();
    let insert_name = name.clone();

    let inserted = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO items (name) VALUES (?1)",
          rusqlite::params![insert_name],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await;

    match inserted {
      Ok(id) => Ok(Some(Item { id, name })),
      Err(e) if is_constraint_violation(&e) => Ok(None),
      Err(e) => Err(Error::Database(e)),
    }
  }

  async fn get_item(&self, id: i64) -> Result<Option<Item>> {
    self
      .one_item_by_id("SELECT id, name FROM items WHERE id = ?1", id)
      .await
  }

  async fn item_by_name(&self, name: &str) -> Result<Option<Item>> {
    let name = name.to_owned();
    let item = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name FROM items WHERE name = ?1",
              rusqlite::params![name],
              item_from_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(item)
  }

  async fn first_item(&self) -> Result<Option<Item>> {
    self
      .one_item("SELECT id, name FROM items ORDER BY id ASC LIMIT 1")
      .await
  }

  async fn last_item(&self) -> Result<Option<Item>> {
    self
      .one_item("SELECT id, name FROM items ORDER BY id DESC LIMIT 1")
      .await
  }

  async fn item_before(&self, id: i64) -> Result<Option<Item>> {
    self
      .one_item_by_id(
        "SELECT id, name FROM items WHERE id < ?1 ORDER BY id DESC LIMIT 1",
        id,
      )
      .await
  }

  async fn item_after(&self, id: i64) -> Result<Option<Item>> {
    self
      .one_item_by_id(
        "SELECT id, name FROM items WHERE id > ?1 ORDER BY id ASC LIMIT 1",
        id,
      )
      .await
  }

  // ── Ratings — append-only writes ──────────────────────────────────────────

  async fn add_rating(&self, item_id: i64, value: i64) -> Result<Rating> {
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO ratings (item_id, value) VALUES (?1, ?2)",
          rusqlite::params![item_id, value],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Rating { id, item_id, value })
  }

  async fn ratings_for_item(&self, item_id: i64) -> Result<Vec<Rating>> {
    let ratings = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, item_id, value FROM ratings WHERE item_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![item_id], rating_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(ratings)
  }

  async fn average_rating(&self, item_id: i64) -> Result<Option<f64>> {
    // AVG over zero rows is SQL NULL, which is exactly the "no ratings yet"
    // sentinel the caller needs.
    let avg = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT AVG(value) FROM ratings WHERE item_id = ?1",
          rusqlite::params![item_id],
          |row| row.get::<_, Option<f64>>(0),
        )?)
      })
      .await?;
    Ok(avg)
  }
}
