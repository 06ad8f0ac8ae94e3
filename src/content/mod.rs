// src/content/mod.rs
pub mod providers;
pub mod types;

pub use types::{ContentItem, ContentProvider, ProviderId};
