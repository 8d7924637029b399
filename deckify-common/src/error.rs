//! Common error types for Deckify

use thiserror::Error;

/// Common result type for Deckify operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the Deckify crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input (e.g. an unrecognized listing URL)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The track listing could not be fetched
    #[error("Listing error: {0}")]
    Listing(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
