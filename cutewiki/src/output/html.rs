//! Interactive HTML output with menu bar, forms and footnotes

use super::escape::escape_xml;
use super::menu::write_menu_bar;
use super::{Footnotes, Output, PageView, RenderMode};
use crate::store::PageType;
use std::io::{self, Write};

const RULER: &str = "<hr noshade size=\"1\" color=\"#8CACBB\">\n";

/// Renders pages as HTML 4.01 for the browser
pub struct HtmlOutput<'w> {
    sink: &'w mut dyn Write,
    footnotes: Footnotes,
    table_header: bool,
    depth: usize,
}

impl<'w> HtmlOutput<'w> {
    pub fn new(sink: &'w mut dyn Write) -> Self {
        Self {
            sink,
            footnotes: Footnotes::default(),
            table_header: false,
            depth: 0,
        }
    }

    fn write(&mut self, markup: &str) -> io::Result<()> {
        self.sink.write_all(markup.as_bytes())
    }

    fn write_footer_line(&mut self, page: &PageView) -> io::Result<()> {
        let target = escape_xml(page.target.as_deref().unwrap_or(&page.name));
        match page.mode {
            RenderMode::Edit => write!(self.sink, "<b>You change the wiki page '{}'</b>", target),
            RenderMode::Source => write!(self.sink, "<b>The source of the wiki page '{}'</b>", target),
            _ => {
                write!(
                    self.sink,
                    "{}, {}, {} ms",
                    escape_xml(&page.owner_name),
                    page.timestring,
                    page.started.elapsed().as_millis()
                )?;
                match &page.editor {
                    Some(editor) => write!(self.sink, ", <b>is edited by {}</b>", escape_xml(editor)),
                    None => Ok(()),
                }
            }
        }
    }
}

/// Document head shared by the HTML and print renderers
pub(super) fn write_head(sink: &mut dyn Write, stylesheet: &str, title: &str) -> io::Result<()> {
    sink.write_all(b"<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01 Transitional//EN\">\n")?;
    sink.write_all(b"<html>\n\n<head>\n")?;
    writeln!(
        sink,
        "  <link rel=\"stylesheet\" type=\"text/css\" href=\"/Files/{}.css\">",
        stylesheet
    )?;
    sink.write_all(b"  <!--[if gte IE 5]>\n")?;
    writeln!(
        sink,
        "  <link rel=\"stylesheet\" type=\"text/css\" href=\"/Files/{}_ie.css\">",
        stylesheet
    )?;
    sink.write_all(b"  <![endif]-->\n")?;
    sink.write_all(b"  <link rel=\"icon\" href=\"/Files/cutewiki.ico\" type=\"image/ico\">\n")?;
    sink.write_all(b"  <link rel=\"shortcut icon\" href=\"/Files/cutewiki.ico\">\n")?;
    sink.write_all(b"  <meta http-equiv=\"content-type\" content=\"text/html;charset=UTF-8\">\n")?;
    sink.write_all(b"  <meta http-equiv=\"cache-control\" content=\"no-store\" >\n")?;
    sink.write_all(b"  <meta http-equiv=\"pragma\" content=\"no-cache\" >\n")?;
    sink.write_all(b"  <meta http-equiv=\"expires\" content=\"0\" >\n")?;
    sink.write_all(b"  <meta http-equiv=\"content-language\" content=\"en\">\n")?;
    sink.write_all(b"  <meta name=\"robots\" content=\"noindex\">\n")?;
    sink.write_all(b"  <meta name=\"generator\" content=\"CuteWiki\">\n")?;
    writeln!(sink, "  <title>{}</title>", escape_xml(title))?;
    sink.write_all(b"</head>\n\n")
}

/// Status line script and page type icon
pub(super) fn write_header_start(sink: &mut dyn Write, page: &PageView) -> io::Result<()> {
    write!(
        sink,
        "<script type=\"text/javascript\">\n<!--\nwindow.status = \"{}\"\n//-->\n</script>\n",
        escape_xml(&page.title)
    )?;

    match page.page_type {
        PageType::User => {
            sink.write_all(b"<img title=\"Homepage\" alt=\"Homepage\" src=\"/Images/person.png\">\n")
        }
        PageType::Group => {
            sink.write_all(b"<img title=\"Grouppage\" alt=\"Grouppage\" src=\"/Images/people.png\">\n")
        }
        PageType::Category => {
            sink.write_all(b"<img title=\"Category\" alt=\"Category\" src=\"/Images/category.png\">\n")
        }
        PageType::Normal => Ok(()),
    }
}

/// Topic link after the title, pointing below `prefix`
pub(super) fn write_topic(sink: &mut dyn Write, page: &PageView, prefix: &str) -> io::Result<()> {
    match &page.topic {
        Some(topic) if !topic.title.is_empty() => write!(
            sink,
            "<span class=\"topic\">  /  <a href=\"/{}/{}\" title=\"Topic\">{}</a></span>",
            prefix,
            escape_xml(&topic.name),
            escape_xml(&topic.title)
        ),
        _ => Ok(()),
    }
}

/// Superscript reference to a recorded footnote
pub(super) fn write_footnote_ref(
    sink: &mut dyn Write,
    footnotes: &mut Footnotes,
    note: &str,
) -> io::Result<()> {
    match footnotes.push(note) {
        Some(number) => write!(
            sink,
            "<sup><a class=\"footnote\" title=\"{}\" href=\"#{}\">[{}]</a></sup>",
            escape_xml(note),
            number,
            number
        ),
        None => Ok(()),
    }
}

/// Collected footnotes under a ruler
pub(super) fn write_footnote_list(sink: &mut dyn Write, footnotes: &Footnotes) -> io::Result<()> {
    if footnotes.is_empty() {
        return Ok(());
    }

    sink.write_all(RULER.as_bytes())?;
    sink.write_all(b"<div class=\"footnotes\">\n")?;
    for (number, note) in footnotes.numbered() {
        write!(sink, "<a name=\"{}\">[{}]</a> {}<br>\n", number, number, escape_xml(note))?;
    }
    sink.write_all(b"</div>\n")
}

/// Icon for a bracketed URL, chosen by scheme
pub(super) fn url_icon(url: &str) -> &'static str {
    if url.starts_with("mailto:") {
        "<img src=\"/Images/mail.png\" alt=\"mail\" >"
    } else if url.starts_with("news:") {
        "<img src=\"/Images/news.png\" alt=\"news\" >"
    } else if url.starts_with("http:") {
        "<img src=\"/Images/net.png\" alt=\"net\" >"
    } else {
        "<img src=\"/Images/clip.png\" alt=\"clip\" >"
    }
}

/// A bare URL; mail addresses are shown without their scheme
pub(super) fn write_url(sink: &mut dyn Write, url: &str) -> io::Result<()> {
    let shown = url.strip_prefix("mailto:").unwrap_or(url);
    write!(sink, "<a href=\"{}\">{}</a>", escape_xml(url), escape_xml(shown))
}

pub(super) fn write_image(sink: &mut dyn Write, name: &str) -> io::Result<()> {
    let name = escape_xml(name);
    write!(sink, "<img src=\"/Images/{}.png\" title=\"[{}]\" alt=\"{}\" >", name, name, name)
}

impl Output for HtmlOutput<'_> {
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
        self.depth = 0;

        write_head(self.sink, "cwhtml", &page.title)?;
        self.write("\n")?;

        match page.mode {
            RenderMode::Edit => self.write("<body style=\"background-color:#eeeeee;\">\n\n")?,
            RenderMode::Source => write!(
                self.sink,
                "<body style=\"background-color:#eeeeee;\" ondblclick=\"document.location.href='/Edit/{}'; \">\n\n",
                escape_xml(&page.name)
            )?,
            _ => write!(
                self.sink,
                "<body ondblclick=\"document.location.href='/Edit/{}'; \">\n\n",
                escape_xml(&page.name)
            )?,
        }

        write_menu_bar(self.sink, page)?;

        self.write("<div class=\"text\">\n<div class=\"header\">\n")?;
        write_header_start(self.sink, page)?;
        let title = escape_xml(&page.title);
        writeln!(
            self.sink,
            "<a href=\"/Reverse/{}\" title=\"Reverse Lookup of {}\">{}</a>",
            escape_xml(&page.name),
            title,
            title
        )?;
        write_topic(self.sink, page, "Wiki")?;
        self.write("</div>\n\n<div class=\"middle\">\n")
    }

    fn page_footer(&mut self, page: &PageView) -> io::Result<()> {
        write_footnote_list(self.sink, &self.footnotes)?;

        self.write("</div>\n<div class=\"footer\">\n<i>")?;
        self.write_footer_line(page)?;
        self.write("</i>\n</div>\n</div>\n</body></html>\n")
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
        self.write(RULER)
    }

    fn ruler_end(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn list_begin(&mut self) -> io::Result<()> {
        let markup = if self.depth == 0 { "<ul class=\"level0\">\n" } else { "<ul>\n" };
        self.depth += 1;
        self.write(markup)
    }

    fn list_end(&mut self) -> io::Result<()> {
        self.depth = self.depth.saturating_sub(1);
        self.write("</ul>\n")
    }

    fn num_list_begin(&mut self) -> io::Result<()> {
        let markup = if self.depth == 0 { "<ol class=\"level0\">\n" } else { "<ol>\n" };
        self.depth += 1;
        self.write(markup)
    }

    fn num_list_end(&mut self) -> io::Result<()> {
        self.depth = self.depth.saturating_sub(1);
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

    fn internal_link(&mut self, name: &str, title: &str, page_type: PageType) -> io::Result<()> {
        let hint = match page_type {
            PageType::User => "Homepage",
            PageType::Group => "Group",
            PageType::Category => "Category - Add To Filter!",
            PageType::Normal => "Internal Link",
        };
        write!(
            self.sink,
            "<a class=\"gotopage\" title=\"{}\" href=\"/Wiki/{}\">{}</a>",
            hint,
            escape_xml(name),
            escape_xml(title)
        )
    }

    fn broken_link(&mut self, name: &str) -> io::Result<()> {
        let name = escape_xml(name);
        write!(
            self.sink,
            "<a class=\"createpage\" title=\"Create new Page...\" href=\"/Wiki/{}\">{}</a>",
            name, name
        )
    }

    fn table_begin(&mut self, _cells: usize) -> io::Result<()> {
        self.write("<table><tbody>\n")
    }

    fn table_end(&mut self) -> io::Result<()> {
        self.write("</tbody></table>\n")
    }

    fn table_head_begin(&mut self) -> io::Result<()> {
        self.table_header = true;
        self.write("<tr>\n")
    }

    fn table_head_end(&mut self) -> io::Result<()> {
        self.table_header = false;
        self.write("</tr>\n")
    }

    fn table_row_begin(&mut self) -> io::Result<()> {
        self.write("<tr>\n")
    }

    fn table_row_end(&mut self) -> io::Result<()> {
        self.write("</tr>\n")
    }

    fn table_cell_begin(&mut self) -> io::Result<()> {
        self.write(if self.table_header { "<th>" } else { "<td>" })
    }

    fn table_cell_end(&mut self) -> io::Result<()> {
        self.write(if self.table_header { "</th>\n" } else { "</td>\n" })
    }

    fn table_number_begin(&mut self) -> io::Result<()> {
        self.write("<td class=\"number\">")
    }

    fn table_number_end(&mut self) -> io::Result<()> {
        self.write("</td>\n")
    }

    fn image(&mut self, name: &str) -> io::Result<()> {
        write_image(self.sink, name)
    }

    fn url(&mut self, url: &str) -> io::Result<()> {
        write_url(self.sink, url)
    }

    fn image_url(&mut self, url: &str) -> io::Result<()> {
        let url_attr = escape_xml(url);
        write!(
            self.sink,
            "<a title=\"{}\" href=\"{}\">{}</a>",
            url_attr,
            url_attr,
            url_icon(url)
        )
    }

    fn external_link(&mut self, url: &str, text: &str) -> io::Result<()> {
        let url_attr = escape_xml(url);
        write!(
            self.sink,
            "<a href=\"{}\" title=\"{}\" class=\"gotopage\">{}</a>",
            url_attr,
            url_attr,
            escape_xml(text)
        )?;
        if url.starts_with("http") {
            write!(
                self.sink,
                "<a href=\"{}\" target=\"_blank\"><img title=\"Open in new Browser...\" alt=\"extern\" src=\"/Files/extern.png\"></a>",
                url_attr
            )?;
        }
        Ok(())
    }

    fn accepts_html(&self) -> bool {
        true
    }

    fn accepts_forms(&self) -> bool {
        true
    }
}
