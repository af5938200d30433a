//! The page store interface and its list queries

use super::page::{Page, PageType, UNKNOWN_OWNER_NAME};
use super::wildcard::Wildcard;
use crate::markup::wikiword::is_wikiword;
use std::cmp::Ordering;

/// Read access to the pages of a wiki
///
/// Implementors provide lookup and iteration; every list query is
/// derived from those. List queries return an empty `Vec` when
/// nothing matches.
pub trait PageStore: Sync {
    /// Look up a page by name. Names that are not WikiWords are never found.
    fn find_page(&self, name: &str) -> Option<&Page>;

    /// All pages in unspecified order
    fn pages(&self) -> Box<dyn Iterator<Item = &Page> + '_>;

    /// Bytes used by all page texts on disk
    fn disk_usage(&self) -> u64;

    fn count(&self) -> usize {
        self.pages().count()
    }

    /// All pages sorted case-insensitively by title
    fn alpha_sorted(&self) -> Vec<&Page> {
        let mut pages: Vec<&Page> = self.pages().collect();
        pages.sort_by(|a, b| by_title(a, b));
        pages
    }

    /// All pages, newest first
    fn time_sorted(&self) -> Vec<&Page> {
        let mut pages: Vec<&Page> = self.pages().collect();
        pages.sort_by(|a, b| b.time.cmp(&a.time).then_with(|| a.name.cmp(&b.name)));
        pages
    }

    fn users(&self) -> Vec<&Page> {
        of_type(self.alpha_sorted(), PageType::User)
    }

    fn groups(&self) -> Vec<&Page> {
        of_type(self.alpha_sorted(), PageType::Group)
    }

    fn categories(&self) -> Vec<&Page> {
        of_type(self.alpha_sorted(), PageType::Category)
    }

    /// Pages linking to `name`
    fn reverse_links(&self, name: &str) -> Vec<&Page> {
        self.alpha_sorted()
            .into_iter()
            .filter(|page| page.links_to(name))
            .collect()
    }

    /// Pages linking to every category of a `A+B+C` list
    fn in_category(&self, categories: &str) -> Vec<&Page> {
        let names = category_names(categories);
        if names.is_empty() {
            return Vec::new();
        }

        self.alpha_sorted()
            .into_iter()
            .filter(|page| names.iter().all(|name| page.links_to(name)))
            .collect()
    }

    fn search_topic(&self, pattern: &str) -> Vec<&Page> {
        let Some(wildcard) = compile(pattern) else {
            return Vec::new();
        };

        self.alpha_sorted()
            .into_iter()
            .filter(|page| page.topic.as_deref().is_some_and(|topic| wildcard.matches(topic)))
            .collect()
    }

    fn search_title(&self, pattern: &str, category_filter: Option<&str>) -> Vec<&Page> {
        let Some(wildcard) = compile(pattern) else {
            return Vec::new();
        };

        self.filtered(category_filter)
            .into_iter()
            .filter(|page| wildcard.matches(&page.title))
            .collect()
    }

    fn search_full(&self, pattern: &str, category_filter: Option<&str>) -> Vec<&Page> {
        let Some(wildcard) = compile(pattern) else {
            return Vec::new();
        };

        self.filtered(category_filter)
            .into_iter()
            .filter(|page| wildcard.matches(&page.text))
            .collect()
    }

    /// All pages, or only those in the given categories
    fn filtered(&self, category_filter: Option<&str>) -> Vec<&Page> {
        match category_filter {
            Some(filter) if !filter.is_empty() => self.in_category(filter),
            _ => self.alpha_sorted(),
        }
    }

    /// Whether a user listed on the page's group page
    fn is_member(&self, page: &Page, user: &str) -> bool {
        page.group
            .as_deref()
            .and_then(|group| self.find_page(group))
            .is_some_and(|group| group.links_to(user))
    }

    fn is_visible(&self, page: &Page, user: &str) -> bool {
        !page.hidden || page.owner == user || self.is_member(page, user)
    }

    fn is_writable(&self, page: &Page, user: &str) -> bool {
        !page.private || page.owner == user || self.is_member(page, user)
    }

    /// Display name of a page owner
    fn owner_name(&self, page: &Page) -> String {
        self.find_page(&page.owner)
            .map(|owner| owner.title.clone())
            .unwrap_or_else(|| UNKNOWN_OWNER_NAME.to_string())
    }

    /// Title of a page, or the name itself when the page is missing
    fn title_of(&self, name: &str) -> String {
        self.find_page(name)
            .map(|page| page.title.clone())
            .unwrap_or_else(|| name.to_string())
    }

    /// Rough in-memory footprint of the loaded pages
    fn memory_usage_kb(&self) -> u64 {
        let bytes: usize = self
            .pages()
            .map(|page| {
                std::mem::size_of::<Page>()
                    + page.name.len()
                    + page.title.len()
                    + page.owner.len()
                    + page.text.len()
                    + page.links.iter().map(|link| link.len()).sum::<usize>()
            })
            .sum();
        bytes as u64 / 1024
    }

    fn disk_usage_kb(&self) -> u64 {
        self.disk_usage() / 1024
    }
}

fn by_title(a: &Page, b: &Page) -> Ordering {
    a.title
        .to_lowercase()
        .cmp(&b.title.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

fn of_type(pages: Vec<&Page>, page_type: PageType) -> Vec<&Page> {
    pages
        .into_iter()
        .filter(|page| page.page_type == page_type)
        .collect()
}

/// Split `A + B+C` into category names, stopping at the first malformed one
fn category_names(categories: &str) -> Vec<&str> {
    categories
        .split('+')
        .map(str::trim)
        .take_while(|name| is_wikiword(name))
        .collect()
}

fn compile(pattern: &str) -> Option<Wildcard> {
    match Wildcard::new(pattern) {
        Ok(wildcard) => Some(wildcard),
        Err(e) => {
            log::warn!("Unusable search pattern '{}': {}", pattern, e);
            None
        }
    }
}
