//! Data models for store items.

pub mod item;

pub use item::{Item, ItemField, NOTES_FIELD_ID};
