//! Error types for loading and saving pages

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing the pages directory
#[derive(Error, Debug)]
pub enum StoreError {
    /// The pages directory does not exist
    #[error("Pages directory not found: {path}", path = .0.display())]
    MissingDirectory(PathBuf),

    /// IO error while reading or writing a page file
    #[error("IO error on {path}: {source}", path = .0.display(), source = .1)]
    Io(PathBuf, #[source] std::io::Error),

    /// A page name that is not a WikiWord
    #[error("Invalid page name: {0}")]
    InvalidPageName(String),
}
