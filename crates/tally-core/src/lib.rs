//! Core types and trait definitions for the Tally item-rating store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod history;
pub mod item;
pub mod nav;
pub mod store;

pub use error::{Error, Result};
pub use item::{Item, Rating};
