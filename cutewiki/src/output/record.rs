//! An [`Output`] that records events, for testing the parser without a format

use super::{MenuView, Output, PageView, RenderMode};
use crate::store::PageType;
use std::io;
use std::time::Instant;

/// Records every call as a short token; consecutive text is merged
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<String>,
    /// Also accept raw markup and forms like the HTML renderer
    pub html: bool,
}

impl Recorder {
    pub fn html() -> Self {
        Self {
            events: Vec::new(),
            html: true,
        }
    }

    fn event(&mut self, name: impl Into<String>) -> io::Result<()> {
        self.events.push(name.into());
        Ok(())
    }

    /// All recorded text joined together
    pub fn text(&self) -> String {
        self.events
            .iter()
            .filter_map(|event| event.strip_prefix("text:"))
            .collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.events.iter().filter(|event| *event == name).count()
    }
}

/// A page view with neutral values
pub fn sample_view(name: &str, mode: RenderMode) -> PageView {
    PageView {
        name: name.to_string(),
        title: crate::markup::wikiword::spaced_title(name),
        page_type: PageType::Normal,
        owner_name: "Wiki Admin".to_string(),
        timestring: "Friday,  01. Mar. 2024,  12:00".to_string(),
        topic: None,
        editor: None,
        mode,
        target: None,
        started: Instant::now(),
        menu: MenuView {
            writable: true,
            user: "Guest".to_string(),
            user_title: "Guest".to_string(),
            ..Default::default()
        },
    }
}

impl Output for Recorder {
    fn putc(&mut self, ch: char) -> io::Result<()> {
        match self.events.last_mut() {
            Some(last) if last.starts_with("text:") => last.push(ch),
            _ => self.events.push(format!("text:{}", ch)),
        }
        Ok(())
    }

    fn raw(&mut self, markup: &str) -> io::Result<()> {
        if self.html {
            self.event(format!("raw:{}", markup))?;
        }
        Ok(())
    }

    fn page_header(&mut self, page: &PageView) -> io::Result<()> {
        self.event(format!("header:{}", page.name))
    }

    fn page_footer(&mut self, page: &PageView) -> io::Result<()> {
        self.event(format!("footer:{}", page.name))
    }

    fn para_begin(&mut self) -> io::Result<()> {
        self.event("para_begin")
    }

    fn para_end(&mut self) -> io::Result<()> {
        self.event("para_end")
    }

    fn pre_begin(&mut self) -> io::Result<()> {
        self.event("pre_begin")
    }

    fn pre_end(&mut self) -> io::Result<()> {
        self.event("pre_end")
    }

    fn blockquote_begin(&mut self) -> io::Result<()> {
        self.event("quote_begin")
    }

    fn blockquote_end(&mut self) -> io::Result<()> {
        self.event("quote_end")
    }

    fn ruler_begin(&mut self) -> io::Result<()> {
        self.event("ruler_begin")
    }

    fn ruler_end(&mut self) -> io::Result<()> {
        self.event("ruler_end")
    }

    fn list_begin(&mut self) -> io::Result<()> {
        self.event("list_begin")
    }

    fn list_end(&mut self) -> io::Result<()> {
        self.event("list_end")
    }

    fn num_list_begin(&mut self) -> io::Result<()> {
        self.event("num_list_begin")
    }

    fn num_list_end(&mut self) -> io::Result<()> {
        self.event("num_list_end")
    }

    fn list_item_begin(&mut self) -> io::Result<()> {
        self.event("item_begin")
    }

    fn list_item_end(&mut self) -> io::Result<()> {
        self.event("item_end")
    }

    fn line_begin(&mut self) -> io::Result<()> {
        self.event("line_begin")
    }

    fn line_end(&mut self) -> io::Result<()> {
        self.event("line_end")
    }

    fn heading_begin(&mut self, level: u8) -> io::Result<()> {
        self.event(format!("heading_begin:{}", level))
    }

    fn heading_end(&mut self, level: u8) -> io::Result<()> {
        self.event(format!("heading_end:{}", level))
    }

    fn footnote(&mut self, note: &str) -> io::Result<()> {
        self.event(format!("footnote:{}", note))
    }

    fn bold_begin(&mut self) -> io::Result<()> {
        self.event("bold_begin")
    }

    fn bold_end(&mut self) -> io::Result<()> {
        self.event("bold_end")
    }

    fn italic_begin(&mut self) -> io::Result<()> {
        self.event("italic_begin")
    }

    fn italic_end(&mut self) -> io::Result<()> {
        self.event("italic_end")
    }

    fn internal_link(&mut self, name: &str, title: &str, _page_type: PageType) -> io::Result<()> {
        self.event(format!("link:{}|{}", name, title))
    }

    fn broken_link(&mut self, name: &str) -> io::Result<()> {
        self.event(format!("broken:{}", name))
    }

    fn table_begin(&mut self, cells: usize) -> io::Result<()> {
        self.event(format!("table_begin:{}", cells))
    }

    fn table_end(&mut self) -> io::Result<()> {
        self.event("table_end")
    }

    fn table_head_begin(&mut self) -> io::Result<()> {
        self.event("head_begin")
    }

    fn table_head_end(&mut self) -> io::Result<()> {
        self.event("head_end")
    }

    fn table_row_begin(&mut self) -> io::Result<()> {
        self.event("row_begin")
    }

    fn table_row_end(&mut self) -> io::Result<()> {
        self.event("row_end")
    }

    fn table_cell_begin(&mut self) -> io::Result<()> {
        self.event("cell_begin")
    }

    fn table_cell_end(&mut self) -> io::Result<()> {
        self.event("cell_end")
    }

    fn table_number_begin(&mut self) -> io::Result<()> {
        self.event("number_begin")
    }

    fn table_number_end(&mut self) -> io::Result<()> {
        self.event("number_end")
    }

    fn image(&mut self, name: &str) -> io::Result<()> {
        self.event(format!("image:{}", name))
    }

    fn url(&mut self, url: &str) -> io::Result<()> {
        self.event(format!("url:{}", url))
    }

    fn image_url(&mut self, url: &str) -> io::Result<()> {
        self.event(format!("image_url:{}", url))
    }

    fn external_link(&mut self, url: &str, text: &str) -> io::Result<()> {
        self.event(format!("external:{}|{}", url, text))
    }

    fn accepts_html(&self) -> bool {
        self.html
    }

    fn accepts_forms(&self) -> bool {
        self.html
    }
}
