//! # Doc Loader
//!
//! This crate discovers Markdown files under a docs root and prepares them
//! for embedding: the raw file content is kept for display, and a plain-text
//! rendering (Markdown structure stripped) is derived as embedding input.

pub mod error;
pub mod loader;
pub mod markdown;

pub use error::{LoaderError, Result};
pub use loader::{DocLoader, LoadedDoc};
pub use markdown::extract_plain_text;
