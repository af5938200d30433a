//! Renderer interface and the four output formats
//!
//! The markup walker drives an [`Output`] with structural and inline
//! events. Each renderer turns those events into one format and writes
//! them to the sink it was created with. Renderer state (footnotes,
//! list counters, table flags) lives in the renderer value, which is
//! created fresh for every page.

use crate::store::PageType;
use std::io::{self, Write};
use std::time::Instant;

// Submodules
pub mod escape;
mod html;
mod menu;
mod print;
mod rss;
mod rtf;

#[cfg(test)]
pub mod record;

// Re-export public types
pub use html::HtmlOutput;
pub use print::PrintOutput;
pub use rss::RssOutput;
pub use rtf::RtfOutput;

/// Footnotes recorded per page beyond this count are dropped
pub const MAX_FOOTNOTES: usize = 100;

/// How a page is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Normal,
    /// HTML with the edit form chrome
    Edit,
    /// HTML showing the page source
    Source,
    Print,
    Rtf,
    Rss,
}

/// Everything page header and footer show about a page
#[derive(Debug, Clone)]
pub struct PageView {
    pub name: String,
    pub title: String,
    pub page_type: PageType,
    /// Display name of the owner
    pub owner_name: String,
    /// Last change, formatted
    pub timestring: String,
    pub topic: Option<TopicLink>,
    /// User holding a valid edit lock
    pub editor: Option<String>,
    pub mode: RenderMode,
    /// Page the edit and source footers talk about
    pub target: Option<String>,
    /// When rendering started, for the elapsed time in the footer
    pub started: Instant,
    pub menu: MenuView,
}

/// Topic page shown next to the title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicLink {
    pub name: String,
    pub title: String,
}

/// State the HTML menu bar depends on
#[derive(Debug, Clone, Default)]
pub struct MenuView {
    /// Current user may edit the page
    pub writable: bool,
    /// Revision history is available
    pub history: bool,
    /// Active category filter
    pub category: Option<String>,
    /// Last search string
    pub search: Option<String>,
    pub user: String,
    pub user_title: String,
}

/// Footnotes collected while rendering one page
#[derive(Debug, Default)]
pub struct Footnotes {
    notes: Vec<String>,
}

impl Footnotes {
    /// Record a note and return its 1-based number
    pub fn push(&mut self, note: &str) -> Option<usize> {
        if self.notes.len() >= MAX_FOOTNOTES {
            log::warn!("More than {} footnotes, dropping '{}'", MAX_FOOTNOTES, note);
            return None;
        }
        self.notes.push(note.to_string());
        Some(self.notes.len())
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Notes with their numbers
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &str)> {
        self.notes
            .iter()
            .enumerate()
            .map(|(index, note)| (index + 1, note.as_str()))
    }
}

/// The operations every output format implements
///
/// Text passed to [`Output::putc`] and [`Output::puts`] is escaped for
/// the format; [`Output::raw`] bypasses escaping and is only honoured
/// by the HTML based formats.
pub trait Output {
    fn putc(&mut self, ch: char) -> io::Result<()>;

    fn puts(&mut self, text: &str) -> io::Result<()> {
        for ch in text.chars() {
            self.putc(ch)?;
        }
        Ok(())
    }

    /// Write pre-formatted markup, ignored by formats that cannot embed HTML
    fn raw(&mut self, _markup: &str) -> io::Result<()> {
        Ok(())
    }

    fn page_header(&mut self, page: &PageView) -> io::Result<()>;
    fn page_footer(&mut self, page: &PageView) -> io::Result<()>;

    fn para_begin(&mut self) -> io::Result<()>;
    fn para_end(&mut self) -> io::Result<()>;
    fn pre_begin(&mut self) -> io::Result<()>;
    fn pre_end(&mut self) -> io::Result<()>;
    fn blockquote_begin(&mut self) -> io::Result<()>;
    fn blockquote_end(&mut self) -> io::Result<()>;
    fn ruler_begin(&mut self) -> io::Result<()>;
    fn ruler_end(&mut self) -> io::Result<()>;

    fn list_begin(&mut self) -> io::Result<()>;
    fn list_end(&mut self) -> io::Result<()>;
    fn num_list_begin(&mut self) -> io::Result<()>;
    fn num_list_end(&mut self) -> io::Result<()>;
    fn list_item_begin(&mut self) -> io::Result<()>;
    fn list_item_end(&mut self) -> io::Result<()>;

    fn line_begin(&mut self) -> io::Result<()>;
    fn line_end(&mut self) -> io::Result<()>;

    fn heading_begin(&mut self, level: u8) -> io::Result<()>;
    fn heading_end(&mut self, level: u8) -> io::Result<()>;

    fn footnote(&mut self, note: &str) -> io::Result<()>;

    fn bold_begin(&mut self) -> io::Result<()>;
    fn bold_end(&mut self) -> io::Result<()>;
    fn italic_begin(&mut self) -> io::Result<()>;
    fn italic_end(&mut self) -> io::Result<()>;

    /// Link to an existing page the reader may see
    fn internal_link(&mut self, name: &str, title: &str, page_type: PageType) -> io::Result<()>;
    /// Link inviting to create a missing page
    fn broken_link(&mut self, name: &str) -> io::Result<()>;

    fn table_begin(&mut self, cells: usize) -> io::Result<()>;
    fn table_end(&mut self) -> io::Result<()>;
    fn table_head_begin(&mut self) -> io::Result<()>;
    fn table_head_end(&mut self) -> io::Result<()>;
    fn table_row_begin(&mut self) -> io::Result<()>;
    fn table_row_end(&mut self) -> io::Result<()>;
    fn table_cell_begin(&mut self) -> io::Result<()>;
    fn table_cell_end(&mut self) -> io::Result<()>;
    fn table_number_begin(&mut self) -> io::Result<()>;
    fn table_number_end(&mut self) -> io::Result<()>;

    /// Inline image from the image directory
    fn image(&mut self, name: &str) -> io::Result<()>;
    /// A bare URL in the text
    fn url(&mut self, url: &str) -> io::Result<()>;
    /// A bracketed URL without text, shown as an icon
    fn image_url(&mut self, url: &str) -> io::Result<()>;
    /// A bracketed URL with link text
    fn external_link(&mut self, url: &str, text: &str) -> io::Result<()>;

    /// Whether [`Output::raw`] markup reaches the sink
    fn accepts_html(&self) -> bool {
        false
    }

    /// Whether interactive forms can be embedded
    fn accepts_forms(&self) -> bool {
        false
    }
}

/// Create the renderer for a mode, writing to `sink`
pub fn for_mode<'w>(mode: RenderMode, sink: &'w mut dyn Write) -> Box<dyn Output + 'w> {
    match mode {
        RenderMode::Normal | RenderMode::Edit | RenderMode::Source => Box::new(HtmlOutput::new(sink)),
        RenderMode::Print => Box::new(PrintOutput::new(sink)),
        RenderMode::Rtf => Box::new(RtfOutput::new(sink)),
        RenderMode::Rss => Box::new(RssOutput::new(sink)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footnotes_are_numbered_and_capped() {
        let mut notes = Footnotes::default();

        assert_eq!(notes.push("first"), Some(1));
        for index in 2..=MAX_FOOTNOTES {
            assert_eq!(notes.push("more"), Some(index));
        }
        assert_eq!(notes.push("one too many"), None);
        assert_eq!(notes.numbered().next(), Some((1, "first")));
        assert_eq!(notes.numbered().count(), MAX_FOOTNOTES);
    }

    #[test]
    fn test_for_mode_selects_renderer() {
        let mut buffer: Vec<u8> = Vec::new();
        {
            let out = for_mode(RenderMode::Edit, &mut buffer);
            assert!(out.accepts_forms());
        }
        {
            let out = for_mode(RenderMode::Print, &mut buffer);
            assert!(out.accepts_html());
            assert!(!out.accepts_forms());
        }
        {
            let out = for_mode(RenderMode::Rtf, &mut buffer);
            assert!(!out.accepts_html());
        }
    }
}
