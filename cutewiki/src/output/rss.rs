//! Feed item descriptions: the first paragraph or heading of a page
//!
//! Output stops for good once the headline is complete, that is after the
//! first paragraph, preformatted block or list, at the second heading, at
//! an empty line after some text, or when a ruler, numbered list or table
//! shows up.

use super::escape::escape_rss;
use super::{Output, PageView};
use crate::store::PageType;
use std::io::{self, Write};

pub struct RssOutput<'w> {
    sink: &'w mut dyn Write,
    /// Set once the headline is written; suppresses everything after
    ready: bool,
    first_heading: bool,
    /// Nothing written since the last line began
    line_is_blank: bool,
    written: bool,
}

impl<'w> RssOutput<'w> {
    pub fn new(sink: &'w mut dyn Write) -> Self {
        Self {
            sink,
            ready: false,
            first_heading: true,
            line_is_blank: false,
            written: false,
        }
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        if self.ready || text.is_empty() {
            return Ok(());
        }
        self.line_is_blank = false;
        self.written = true;
        self.sink.write_all(text.as_bytes())
    }

    fn stop(&mut self) -> io::Result<()> {
        self.ready = true;
        Ok(())
    }
}

impl Output for RssOutput<'_> {
    fn putc(&mut self, ch: char) -> io::Result<()> {
        let mut buf = [0u8; 4];
        self.puts(ch.encode_utf8(&mut buf))
    }

    fn puts(&mut self, text: &str) -> io::Result<()> {
        self.write(&escape_rss(text))
    }

    fn page_header(&mut self, _page: &PageView) -> io::Result<()> {
        self.ready = false;
        self.first_heading = true;
        self.line_is_blank = false;
        self.written = false;
        Ok(())
    }

    fn page_footer(&mut self, _page: &PageView) -> io::Result<()> {
        self.stop()
    }

    fn para_begin(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn para_end(&mut self) -> io::Result<()> {
        self.stop()
    }

    fn pre_begin(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn pre_end(&mut self) -> io::Result<()> {
        self.stop()
    }

    fn blockquote_begin(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn blockquote_end(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn ruler_begin(&mut self) -> io::Result<()> {
        self.stop()
    }

    fn ruler_end(&mut self) -> io::Result<()> {
        self.stop()
    }

    fn list_begin(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn list_end(&mut self) -> io::Result<()> {
        self.stop()
    }

    fn num_list_begin(&mut self) -> io::Result<()> {
        self.stop()
    }

    fn num_list_end(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn list_item_begin(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn list_item_end(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn line_begin(&mut self) -> io::Result<()> {
        self.line_is_blank = true;
        Ok(())
    }

    fn line_end(&mut self) -> io::Result<()> {
        if self.ready {
            return Ok(());
        }
        if self.line_is_blank && self.written {
            return self.stop();
        }
        self.sink.write_all(b"\n")
    }

    fn heading_begin(&mut self, _level: u8) -> io::Result<()> {
        if !self.first_heading {
            self.ready = true;
        }
        Ok(())
    }

    fn heading_end(&mut self, _level: u8) -> io::Result<()> {
        self.first_heading = false;
        self.stop()
    }

    fn footnote(&mut self, _note: &str) -> io::Result<()> {
        Ok(())
    }

    fn bold_begin(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn bold_end(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn italic_begin(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn italic_end(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn internal_link(&mut self, _name: &str, title: &str, _page_type: PageType) -> io::Result<()> {
        self.puts(title)
    }

    fn broken_link(&mut self, name: &str) -> io::Result<()> {
        self.puts(name)
    }

    fn table_begin(&mut self, _cells: usize) -> io::Result<()> {
        self.stop()
    }

    fn table_end(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn table_head_begin(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn table_head_end(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn table_row_begin(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn table_row_end(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn table_cell_begin(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn table_cell_end(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn table_number_begin(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn table_number_end(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn image(&mut self, _name: &str) -> io::Result<()> {
        Ok(())
    }

    fn url(&mut self, url: &str) -> io::Result<()> {
        self.puts(url)
    }

    fn image_url(&mut self, _url: &str) -> io::Result<()> {
        Ok(())
    }

    fn external_link(&mut self, _url: &str, text: &str) -> io::Result<()> {
        self.puts(text)
    }
}
