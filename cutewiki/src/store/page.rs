//! A single wiki page with its metadata

use crate::markup::scan::Cursor;
use crate::markup::wikiword::{is_wikiword, spaced_title};

/// Login name used when a page has no owner recorded
pub const UNKNOWN_OWNER: &str = "UnknownAuthor";

/// Display name used when the owner has no homepage
pub const UNKNOWN_OWNER_NAME: &str = "Unknown Author";

/// Seconds an edit lock stays valid
pub const EDIT_LOCK_SECONDS: i64 = 600;

/// Kind of page, decides the icon and link title in the HTML output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageType {
    #[default]
    Normal,
    /// A user's homepage
    User,
    /// A group page; pages linked from it are group members
    Group,
    /// A category page; pages linking to it belong to the category
    Category,
}

impl PageType {
    /// Parse the `pagetype` meta value
    pub fn from_meta(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "homepage" => PageType::User,
            "grouppage" => PageType::Group,
            "category" => PageType::Category,
            _ => PageType::Normal,
        }
    }

    /// The `pagetype` meta value, `None` for normal pages
    pub fn meta_value(self) -> Option<&'static str> {
        match self {
            PageType::Normal => None,
            PageType::User => Some("homepage"),
            PageType::Group => Some("grouppage"),
            PageType::Category => Some("category"),
        }
    }
}

/// A wiki page loaded from `<Name>.wik` and `<Name>.met`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// WikiWord naming the page and its files
    pub name: String,

    /// Display title
    pub title: String,

    /// Login name of the owner
    pub owner: String,

    /// Last change as seconds since the epoch
    pub time: i64,

    pub page_type: PageType,

    /// Name of the topic page, if any
    pub topic: Option<String>,

    /// Name of the group page granting access, if any
    pub group: Option<String>,

    /// Only writable by the owner and group members
    pub private: bool,

    /// Only visible to the owner and group members
    pub hidden: bool,

    pub password: Option<String>,

    /// User currently holding the edit lock
    pub editor: Option<String>,

    /// When the edit lock was taken
    pub edited: Option<i64>,

    /// Raw markup text
    pub text: String,

    /// WikiWords referenced from the text, in order of first appearance
    pub links: Vec<String>,

    /// Size of the text file in bytes
    pub disk_size: u64,
}

impl Page {
    /// Create a page owned by nobody, with the default title and scanned links
    ///
    /// # Parameters
    /// * `name` - WikiWord naming the page
    /// * `text` - Raw markup text
    ///
    /// # Returns
    /// * `Page` - The new page
    pub fn new(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            title: spaced_title(name),
            owner: UNKNOWN_OWNER.to_string(),
            time: 0,
            page_type: PageType::Normal,
            topic: None,
            group: None,
            private: false,
            hidden: false,
            password: None,
            editor: None,
            edited: None,
            text: text.to_string(),
            links: scan_links(text),
            disk_size: text.len() as u64,
        }
    }

    /// Replace the text and rescan its links
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.links = scan_links(text);
        self.disk_size = text.len() as u64;
    }

    pub fn with_owner(mut self, owner: &str) -> Self {
        self.owner = owner.to_string();
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_type(mut self, page_type: PageType) -> Self {
        self.page_type = page_type;
        self
    }

    pub fn with_time(mut self, time: i64) -> Self {
        self.time = time;
        self
    }

    /// Whether somebody holds a lock younger than [`EDIT_LOCK_SECONDS`]
    pub fn is_edited(&self, now: i64) -> bool {
        match (&self.editor, self.edited) {
            (Some(_), Some(edited)) => now - edited < EDIT_LOCK_SECONDS,
            _ => false,
        }
    }

    /// The editor name if the lock is still valid
    pub fn active_editor(&self, now: i64) -> Option<&str> {
        if self.is_edited(now) {
            self.editor.as_deref()
        } else {
            None
        }
    }

    pub fn links_to(&self, name: &str) -> bool {
        self.links.iter().any(|link| link == name)
    }
}

/// Collect every WikiWord of a text, skipping bracketed fields
///
/// # Parameters
/// * `text` - Raw markup text
///
/// # Returns
/// * `Vec<String>` - Distinct WikiWords in order of first appearance
pub fn scan_links(text: &str) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    let mut cursor = Cursor::new(text);

    while let Some(ch) = cursor.peek() {
        if ch.is_alphabetic() {
            let word = cursor.alnum();
            if is_wikiword(word) && !links.iter().any(|link| link == word) {
                links.push(word.to_string());
            }
        } else if ch == '[' {
            cursor.take_while(|c| c != ']' && c != '\n');
            cursor.bump();
        } else {
            cursor.bump();
        }
    }

    links
}
