//! # Deckify Common Library
//!
//! Shared code for the Deckify workspace:
//! - Error types
//! - Configuration loading (TOML + environment)
//! - Release date parsing

pub mod config;
pub mod error;
pub mod release_date;

pub use error::{Error, Result};
pub use release_date::{DatePrecision, ReleaseDate};
