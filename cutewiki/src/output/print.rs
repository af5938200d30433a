//! Printable HTML without menu bar; external links become endnotes

use super::escape::escape_xml;
use super::html::{
    url_icon, write_footnote_list, write_footnote_ref, write_head, write_header_start, write_image,
    write_topic, write_url,
};
use super::{Footnotes, Output, PageView};
use crate::store::PageType;
use std::io::{self, Write};

pub struct PrintOutput<'w> {
    sink: &'w mut dyn Write,
    footnotes: Footnotes,
    table_header: bool,
}

impl<'w> PrintOutput<'w> {
    pub fn new(sink: &'w mut dyn Write) -> Self {
        Self {
            sink,
            footnotes: Footnotes::default(),
            table_header: false,
        }
    }

    fn write(&mut self, markup: &str) -> io::Result<()> {
        self.sink.write_all(markup.as_bytes())
    }
}

impl Output for PrintOutput<'_> {
    fn putc(&mut self, ch: char) -> io::Result<()> {
        let mut buf = [0u8; 4];
        self.write(&escape_xml(ch.encode_utf8(&mut buf)))
    }

    fn puts(&mut self, text: &str) -> io::Result<()> {
        self.write(&escape_xml(text))
    }

    fn raw(&mut self, markup: &str) -> io::Result<()> {
        self.write(markup)
    }

    fn page_header(&mut self, page: &PageView) -> io::Result<()> {
        self.footnotes = Footnotes::default();
        self.table_header = false;

        write_head(self.sink, "cwprint", &page.title)?;
        self.write("<body>\n<div class=\"text\">\n<div class=\"header\">\n")?;
        write_header_start(self.sink, page)?;
        writeln!(self.sink, "{}", escape_xml(&page.title))?;
        write_topic(self.sink, page, "Print")?;
        self.write("</div>\n\n<div class=\"middle\">\n")
    }

    fn page_footer(&mut self, page: &PageView) -> io::Result<()> {
        write_footnote_list(self.sink, &self.footnotes)?;

        self.write("</div>\n<div class=\"footer\">\n")?;
        writeln!(
            self.sink,
            "<i>{}, {}</i>",
            escape_xml(&page.owner_name),
            page.timestring
        )?;
        self.write("</div></div>\n</body></html>\n")
    }

    fn para_begin(&mut self) -> io::Result<()> {
        self.write("<p>\n")
    }

    fn para_end(&mut self) -> io::Result<()> {
        self.write("</p>\n")
    }

    fn pre_begin(&mut self) -> io::Result<()> {
        self.write("<pre>\n")
    }

    fn pre_end(&mut self) -> io::Result<()> {
        self.write("</pre>\n")
    }

    fn blockquote_begin(&mut self) -> io::Result<()> {
        self.write("<blockquote>\n")
    }

    fn blockquote_end(&mut self) -> io::Result<()> {
        self.write("</blockquote>\n")
    }

    fn ruler_begin(&mut self) -> io::Result<()> {
        self.write("<hr noshade size=\"1\" color=\"#8CACBB\">\n")
    }

    fn ruler_end(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn list_begin(&mut self) -> io::Result<()> {
        self.write("<ul>\n")
    }

    fn list_end(&mut self) -> io::Result<()> {
        self.write("</ul>\n")
    }

    fn num_list_begin(&mut self) -> io::Result<()> {
        self.write("<ol>\n")
    }

    fn num_list_end(&mut self) -> io::Result<()> {
        self.write("</ol>\n")
    }

    fn list_item_begin(&mut self) -> io::Result<()> {
        self.write("<li><span class=\"list_item\">")
    }

    fn list_item_end(&mut self) -> io::Result<()> {
        self.write("</span></li>\n")
    }

    fn line_begin(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn line_end(&mut self) -> io::Result<()> {
        self.write("\n")
    }

    fn heading_begin(&mut self, level: u8) -> io::Result<()> {
        write!(self.sink, "<h{}>", level)
    }

    fn heading_end(&mut self, level: u8) -> io::Result<()> {
        write!(self.sink, "</h{}>", level)
    }

    fn footnote(&mut self, note: &str) -> io::Result<()> {
        write_footnote_ref(self.sink, &mut self.footnotes, note)
    }

    fn bold_begin(&mut self) -> io::Result<()> {
        self.write("<b>")
    }

    fn bold_end(&mut self) -> io::Result<()> {
        self.write("</b>")
    }

    fn italic_begin(&mut self) -> io::Result<()> {
        self.write("<i>")
    }

    fn italic_end(&mut self) -> io::Result<()> {
        self.write("</i>")
    }

    fn internal_link(&mut self, name: &str, title: &str, _page_type: PageType) -> io::Result<()> {
        write!(
            self.sink,
            "<a class=\"gotopage\" href=\"/Print/{}\">{}</a>",
            escape_xml(name),
            escape_xml(title)
        )
    }

    fn broken_link(&mut self, name: &str) -> io::Result<()> {
        self.puts(name)
    }

    fn table_begin(&mut self, _cells: usize) -> io::Result<()> {
        self.write("<table><tbody>\n")
    }

    fn table_end(&mut self) -> io::Result<()> {
        self.write("</tbody></table>\n")
    }

    fn table_head_begin(&mut self) -> io::Result<()> {
        self.table_header = true;
        self.write("<tr>")
    }

    fn table_head_end(&mut self) -> io::Result<()> {
        self.table_header = false;
        self.write("</tr>")
    }

    fn table_row_begin(&mut self) -> io::Result<()> {
        self.write("<tr>")
    }

    fn table_row_end(&mut self) -> io::Result<()> {
        self.write("</tr>")
    }

    fn table_cell_begin(&mut self) -> io::Result<()> {
        self.write(if self.table_header { "<th>" } else { "<td>" })
    }

    fn table_cell_end(&mut self) -> io::Result<()> {
        self.write(if self.table_header { "</th>" } else { "</td>" })
    }

    fn table_number_begin(&mut self) -> io::Result<()> {
        self.write("<td class=\"number\">")
    }

    fn table_number_end(&mut self) -> io::Result<()> {
        self.write("</td>")
    }

    fn image(&mut self, name: &str) -> io::Result<()> {
        write_image(self.sink, name)
    }

    fn url(&mut self, url: &str) -> io::Result<()> {
        write_url(self.sink, url)
    }

    fn image_url(&mut self, url: &str) -> io::Result<()> {
        write!(self.sink, "<a href=\"{}\">{}</a>", escape_xml(url), url_icon(url))?;
        self.footnote(url)
    }

    fn external_link(&mut self, url: &str, text: &str) -> io::Result<()> {
        write!(
            self.sink,
            "<a href=\"{}\" class=\"gotopage\">{}</a>",
            escape_xml(url),
            escape_xml(text)
        )?;
        self.footnote(url)
    }

    fn accepts_html(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::record::sample_view;
    use crate::output::RenderMode;

    #[test]
    fn test_print_page() {
        let view = sample_view("StartPage", RenderMode::Print);
        let mut buffer = Vec::new();
        {
            let mut out = PrintOutput::new(&mut buffer);
            out.page_header(&view).unwrap();
            out.external_link("http://example.org", "Example").unwrap();
            out.broken_link("NewPage").unwrap();
            out.page_footer(&view).unwrap();
        }
        let html = String::from_utf8(buffer).unwrap();

        assert!(html.contains("href=\"/Files/cwprint.css\""));
        assert!(html.contains("</head>\n\n<body>\n<div class=\"text\">\n<div class=\"header\">\n<script"));
        assert!(html.contains("</script>\nStart Page\n</div>\n\n<div class=\"middle\">\n"));
        assert!(!html.contains("<form"));
        assert!(html.contains(
            "<a href=\"http://example.org\" class=\"gotopage\">Example</a><sup><a class=\"footnote\" title=\"http://example.org\" href=\"#1\">[1]</a></sup>NewPage"
        ));
        assert!(html.contains("<a name=\"1\">[1]</a> http://example.org<br>\n"));
        assert!(html.ends_with("<i>Wiki Admin, Friday,  01. Mar. 2024,  12:00</i>\n</div></div>\n</body></html>\n"));
    }

    #[test]
    fn test_print_table_rows_stay_inline() {
        let mut buffer = Vec::new();
        {
            let mut out = PrintOutput::new(&mut buffer);
            out.table_head_begin().unwrap();
            out.table_cell_begin().unwrap();
            out.table_cell_end().unwrap();
            out.table_head_end().unwrap();
            out.table_row_begin().unwrap();
            out.table_cell_begin().unwrap();
            out.table_cell_end().unwrap();
            out.table_row_end().unwrap();
        }

        assert_eq!(String::from_utf8(buffer).unwrap(), "<tr><th></th></tr><tr><td></td></tr>");
    }
}
