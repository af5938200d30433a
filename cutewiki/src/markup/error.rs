//! Error types for rendering pages

use crate::store::StoreError;
use thiserror::Error;

/// Errors that stop a render
///
/// Markup problems never do; they fall back to plain text.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Writing to the output sink failed
    #[error("Failed to write page output: {0}")]
    Io(#[from] std::io::Error),

    /// The page store could not be read
    #[error("Page store error: {0}")]
    Store(#[from] StoreError),

    /// Neither the wiki nor the built-in pages know this page
    #[error("Unknown page: {0}")]
    UnknownPage(String),
}
