//! Flat-file page store
//!
//! Every page lives in a `<Name>.wik` text file with a `<Name>.met`
//! metadata file beside it. The whole pages directory is loaded into a
//! [`Wiki`] once and queried through the [`PageStore`] trait.

use crate::markup::wikiword::is_wikiword;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// Submodules
mod error;
mod loader;
mod meta;
mod page;
mod query;
pub mod special;
mod wildcard;

// Re-export public types
pub use error::StoreError;
pub use loader::save_page;
pub use page::{Page, PageType, UNKNOWN_OWNER_NAME};
pub use query::PageStore;

/// In-memory collection of all pages of a wiki
#[derive(Debug, Default)]
pub struct Wiki {
    /// Directory the pages were loaded from
    pub pages_dir: PathBuf,

    pages: BTreeMap<String, Page>,
}

impl Wiki {
    /// Load every page of a pages directory
    ///
    /// # Parameters
    /// * `pages_dir` - Directory holding the `.wik` and `.met` files
    ///
    /// # Returns
    /// * `Ok(Wiki)` - The loaded wiki
    /// * `Err(StoreError)` - The directory is missing or unreadable
    pub fn load(pages_dir: &Path) -> Result<Self, StoreError> {
        let pages = loader::load_pages(pages_dir)?;
        let mut wiki = Self::from_pages(pages);
        wiki.pages_dir = pages_dir.to_path_buf();

        log::info!("Loaded {} pages from {}", wiki.pages.len(), pages_dir.display());
        Ok(wiki)
    }

    /// Build a wiki from pages already in memory
    pub fn from_pages(pages: impl IntoIterator<Item = Page>) -> Self {
        Self {
            pages_dir: PathBuf::new(),
            pages: pages
                .into_iter()
                .map(|page| (page.name.clone(), page))
                .collect(),
        }
    }

    /// Add a page, replacing one of the same name
    pub fn insert(&mut self, page: Page) {
        self.pages.insert(page.name.clone(), page);
    }
}

impl PageStore for Wiki {
    fn find_page(&self, name: &str) -> Option<&Page> {
        if !is_wikiword(name) {
            return None;
        }
        self.pages.get(name)
    }

    fn pages(&self) -> Box<dyn Iterator<Item = &Page> + '_> {
        Box::new(self.pages.values())
    }

    fn disk_usage(&self) -> u64 {
        self.pages.values().map(|page| page.disk_size).sum()
    }
}
