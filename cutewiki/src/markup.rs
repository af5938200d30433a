//! The wiki markup parser
//!
//! A page is walked line by line. Every line is classified, the block
//! context is moved to what the line needs, and the line text goes
//! through the inline scanner. All output happens through an
//! [`Output`] renderer.

use crate::output::{self, MenuView, Output, PageView, RenderMode, TopicLink};
use crate::store::Page;
use std::io::Write;

// Submodules
pub mod block;
pub mod context;
pub mod directive;
pub mod error;
pub mod inline;
pub mod scan;
pub mod wikiword;

// Re-export public types
pub use block::BlankLines;
pub use context::{RenderContext, SystemFacts};
pub use error::RenderError;

use block::{classify, transition, BlockEvent, BlockState, LineClass, ListKind, TableRow};
use inline::InlineWriter;

/// Request variable holding the active category filter
pub const CATEGORY_VAR: &str = "cutewiki-category";

/// Request variable holding the last search string
pub const SEARCH_VAR: &str = "cutewiki-search";

/// Split text into lines at `\r\n`, `\r` or `\n`
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        match rest.find(['\r', '\n']) {
            Some(end) => {
                lines.push(&rest[..end]);
                let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + terminator..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }

    lines
}

/// Walks the lines of a page and drives a renderer
pub struct PageWalker<'c, 'a> {
    inline: InlineWriter<'c, 'a>,
    blank_lines: BlankLines,
    state: BlockState,
}

impl<'c, 'a> PageWalker<'c, 'a> {
    pub fn new(ctx: &'c RenderContext<'a>) -> Self {
        Self {
            inline: InlineWriter::new(ctx),
            blank_lines: ctx.blank_lines,
            state: BlockState::default(),
        }
    }

    /// Walk a whole text and close every block it left open
    pub fn walk(&mut self, text: &str, out: &mut dyn Output) -> Result<(), RenderError> {
        for line in split_lines(text) {
            self.walk_line(line, out)?;
        }
        self.finish(out)
    }

    /// Render one line
    pub fn walk_line(&mut self, line: &str, out: &mut dyn Output) -> Result<(), RenderError> {
        let classified = classify(line, &self.state);
        if classified.class == LineClass::Comment {
            return Ok(());
        }

        let target = BlockState::for_line(&classified.class, &self.state, self.blank_lines);
        let (events, next) = transition(&self.state, &target);
        emit(&events, out)?;
        self.state = next;

        if self.state.ruler {
            return Ok(());
        }
        if classified.class == LineClass::Blank
            && self.blank_lines == BlankLines::Preserve
            && (self.state.in_list() || self.state.in_table())
        {
            return Ok(());
        }

        self.line_start(out)?;
        self.inline.write_line(classified.text, &self.state, out)?;
        self.line_end(out)?;
        Ok(())
    }

    /// Close every open block
    pub fn finish(&mut self, out: &mut dyn Output) -> Result<(), RenderError> {
        let (events, next) = transition(&self.state, &BlockState::default());
        emit(&events, out)?;
        self.state = next;
        Ok(())
    }

    fn line_start(&self, out: &mut dyn Output) -> std::io::Result<()> {
        if self.state.in_list() {
            out.list_item_begin()
        } else {
            match self.state.table {
                TableRow::Head => out.table_head_begin(),
                TableRow::Body => out.table_row_begin(),
                TableRow::None => out.line_begin(),
            }
        }
    }

    fn line_end(&mut self, out: &mut dyn Output) -> std::io::Result<()> {
        if !self.state.in_table() && !self.state.in_list() {
            out.line_end()?;
        }

        match self.state.table {
            TableRow::Head => {
                out.table_head_end()?;
                self.state.table = TableRow::Body;
            }
            TableRow::Body => out.table_row_end()?,
            TableRow::None if self.state.in_list() => out.list_item_end()?,
            TableRow::None => {}
        }
        Ok(())
    }
}

fn emit(events: &[BlockEvent], out: &mut dyn Output) -> std::io::Result<()> {
    for event in events {
        match *event {
            BlockEvent::RulerEnd => out.ruler_end()?,
            BlockEvent::TableEnd => out.table_end()?,
            BlockEvent::HeadingEnd(level) => out.heading_end(level)?,
            BlockEvent::QuoteEnd => out.blockquote_end()?,
            BlockEvent::PreEnd => out.pre_end()?,
            BlockEvent::ParaEnd => out.para_end()?,
            BlockEvent::ListEnd(ListKind::Unordered) => out.list_end()?,
            BlockEvent::ListEnd(ListKind::Ordered) => out.num_list_end()?,
            BlockEvent::ListBegin(ListKind::Unordered) => out.list_begin()?,
            BlockEvent::ListBegin(ListKind::Ordered) => out.num_list_begin()?,
            BlockEvent::ParaBegin => out.para_begin()?,
            BlockEvent::PreBegin => out.pre_begin()?,
            BlockEvent::QuoteBegin => out.blockquote_begin()?,
            BlockEvent::HeadingBegin(level) => out.heading_begin(level)?,
            BlockEvent::TableBegin(cells) => out.table_begin(cells)?,
            BlockEvent::RulerBegin => out.ruler_begin()?,
        }
    }
    Ok(())
}

/// What the page header and footer show about a page
///
/// # Parameters
/// * `page` - The page being rendered
/// * `mode` - Requested render mode
/// * `ctx` - Store, user and request variables
pub fn page_view(page: &Page, mode: RenderMode, ctx: &RenderContext) -> PageView {
    let store = ctx.store;

    PageView {
        name: page.name.clone(),
        title: page.title.clone(),
        page_type: page.page_type,
        owner_name: store.owner_name(page),
        timestring: ctx.facts.timestring(page.time),
        topic: page.topic.as_ref().map(|topic| TopicLink {
            name: topic.clone(),
            title: store.title_of(topic),
        }),
        editor: page.active_editor(ctx.now()).map(str::to_string),
        mode,
        target: ctx.var("page").map(str::to_string),
        started: ctx.started,
        menu: MenuView {
            writable: store.is_writable(page, &ctx.user),
            history: ctx.history.available(),
            category: ctx.var(CATEGORY_VAR).map(str::to_string),
            search: ctx.var(SEARCH_VAR).map(str::to_string),
            user: ctx.user.clone(),
            user_title: store.title_of(&ctx.user),
        },
    }
}

/// Render a page through the renderer `mode` selects
///
/// Writes the header, every line of the page text and the footer. Only
/// failures of the sink end a render early.
///
/// # Parameters
/// * `page` - The page to render
/// * `mode` - Selects the renderer and the page chrome
/// * `ctx` - Store, user and request variables
/// * `sink` - Where the output goes
pub fn render_page(
    page: &Page,
    mode: RenderMode,
    ctx: &RenderContext,
    sink: &mut dyn Write,
) -> Result<(), RenderError> {
    let mut out = output::for_mode(mode, &mut *sink);
    render_with(page, mode, ctx, out.as_mut())?;
    drop(out);
    sink.flush()?;

    log::debug!(
        "Rendered {} as {:?} in {} ms",
        page.name,
        mode,
        ctx.started.elapsed().as_millis()
    );
    Ok(())
}

/// Render a page through a given renderer
pub fn render_with(
    page: &Page,
    mode: RenderMode,
    ctx: &RenderContext,
    out: &mut dyn Output,
) -> Result<(), RenderError> {
    let view = page_view(page, mode, ctx);

    out.page_header(&view)?;
    PageWalker::new(ctx).walk(&page.text, out)?;
    out.page_footer(&view)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::NoHistory;
    use crate::markup::context::testing::context;
    use crate::output::record::Recorder;
    use crate::store::{PageStore, Wiki};

    fn walk_with(text: &str, blank_lines: BlankLines) -> Vec<String> {
        let wiki = Wiki::from_pages([Page::new("StartPage", "Welcome")]);
        let history = NoHistory;
        let mut ctx = context(&wiki, &history);
        ctx.blank_lines = blank_lines;
        let mut out = Recorder::default();

        PageWalker::new(&ctx).walk(text, &mut out).unwrap();
        out.events
    }

    fn walk(text: &str) -> Vec<String> {
        walk_with(text, BlankLines::Preserve)
    }

    fn count(events: &[String], name: &str) -> usize {
        events.iter().filter(|event| *event == name).count()
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines("a\r\nb\rc\nd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\n\nb\n"), vec!["a", "", "b"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_paragraph() {
        assert_eq!(
            walk("Hello there"),
            vec!["para_begin", "line_begin", "text:Hello there", "line_end", "para_end"]
        );
    }

    #[test]
    fn test_unordered_list() {
        let events = walk(" * ItemOne\n * ItemTwo\n");

        assert_eq!(
            events,
            vec![
                "list_begin",
                "item_begin",
                "broken:ItemOne",
                "item_end",
                "item_begin",
                "broken:ItemTwo",
                "item_end",
                "list_end",
            ]
        );
    }

    #[test]
    fn test_list_kind_switch() {
        let events = walk(" * one\n 1. two");
        let switch: Vec<&str> = events
            .iter()
            .skip_while(|event| *event != "item_end")
            .skip(1)
            .take(2)
            .map(String::as_str)
            .collect();

        assert_eq!(switch, vec!["list_end", "num_list_begin"]);
        assert_eq!(events.last().map(String::as_str), Some("num_list_end"));
    }

    #[test]
    fn test_blank_line_policies() {
        let preserved = walk_with("a\n\nb", BlankLines::Preserve);
        let reset = walk_with("a\n\nb", BlankLines::Reset);

        assert_eq!(count(&preserved, "para_begin"), 1);
        assert_eq!(count(&preserved, "line_begin"), 3);
        assert_eq!(count(&reset, "para_begin"), 2);
    }

    #[test]
    fn test_blank_line_inside_list_renders_nothing() {
        let events = walk(" * a\n\n * b");

        assert_eq!(count(&events, "list_begin"), 1);
        assert_eq!(count(&events, "line_begin"), 0);
        assert_eq!(count(&events, "item_begin"), 2);
    }

    #[test]
    fn test_headings_last_one_line() {
        let events = walk("=A\n=B");

        assert_eq!(
            events,
            vec![
                "heading_begin:3",
                "line_begin",
                "text:A",
                "line_end",
                "heading_end:3",
                "heading_begin:3",
                "line_begin",
                "text:B",
                "line_end",
                "heading_end:3",
            ]
        );
    }

    #[test]
    fn test_heading_levels_are_distinct() {
        let level = |text: &str| {
            walk(text)
                .into_iter()
                .find(|event| event.starts_with("heading_begin:"))
        };

        assert_eq!(level("= One").as_deref(), Some("heading_begin:3"));
        assert_eq!(level("==Big==").as_deref(), Some("heading_begin:2"));
        assert_eq!(level("=== Three").as_deref(), Some("heading_begin:1"));
    }

    #[test]
    fn test_table_rows() {
        let events = walk("|| Name | Count |\n| a | 1 |\n| b | 2 |\nafter");

        assert_eq!(events[0], "table_begin:2");
        assert_eq!(events[1], "head_begin");
        assert_eq!(count(&events, "head_begin"), 1);
        assert_eq!(count(&events, "row_begin"), 2);
        assert_eq!(count(&events, "number_begin"), 2);
        assert_eq!(count(&events, "table_end"), 1);
        assert_eq!(count(&events, "line_begin"), 1);
    }

    #[test]
    fn test_ruler_lines_have_no_text() {
        let events = walk("----\n----");
        assert_eq!(events, vec!["ruler_begin", "ruler_end", "ruler_begin", "ruler_end"]);
    }

    #[test]
    fn test_comments_are_dropped() {
        assert_eq!(walk("# hidden\n# more"), Vec::<String>::new());
    }

    #[test]
    fn test_quote_lines() {
        let events = walk("> said");
        assert_eq!(
            events,
            vec![
                "quote_begin",
                "line_begin",
                "italic_begin",
                "text:said",
                "italic_end",
                "line_end",
                "quote_end",
            ]
        );
    }

    #[test]
    fn test_preformatted_keeps_indentation() {
        let events = walk("  code  here\n   more");

        assert_eq!(events[0], "pre_begin");
        assert_eq!(events[2], "text: code  here");
        assert_eq!(events[5], "text:  more");
        assert_eq!(events.last().map(String::as_str), Some("pre_end"));
    }

    #[test]
    fn test_balanced_events() {
        let text = " * a\n  * b\n   1. c\n> q\n>> qq\n|| h |\n| 1 |\n= H\n----\ntext\n  pre";
        let events = walk(text);

        for (begin, end) in [
            ("list_begin", "list_end"),
            ("num_list_begin", "num_list_end"),
            ("quote_begin", "quote_end"),
            ("table_begin:1", "table_end"),
            ("para_begin", "para_end"),
            ("pre_begin", "pre_end"),
        ] {
            assert_eq!(count(&events, begin), count(&events, end), "{} vs {}", begin, end);
        }
    }

    #[test]
    fn test_render_page_html() {
        let wiki = Wiki::from_pages([Page::new("StartPage", "This is '''bold''' and ''italic''.")]);
        let history = NoHistory;
        let ctx = context(&wiki, &history);
        let page = wiki.find_page("StartPage").unwrap();
        let mut buffer = Vec::new();

        render_page(page, RenderMode::Normal, &ctx, &mut buffer).unwrap();
        let html = String::from_utf8(buffer).unwrap();

        assert!(html.contains("This is <b>bold</b> and <i>italic</i>."));
        assert!(html.starts_with("<!DOCTYPE"));
        assert!(html.ends_with("</body></html>\n"));
    }

    #[test]
    fn test_render_page_count() {
        let pages = (0..42).map(|index| Page::new(&format!("Page{}", index), "[PageCount]"));
        let wiki = Wiki::from_pages(pages);
        let history = NoHistory;
        let ctx = context(&wiki, &history);
        let mut out = Recorder::default();

        let page = wiki.find_page("Page7").unwrap();
        render_with(page, RenderMode::Normal, &ctx, &mut out).unwrap();

        assert!(out.events.contains(&"text:42".to_string()));
        assert!(!out.text().contains('['));
    }

    #[test]
    fn test_render_is_deterministic() {
        let wiki = Wiki::from_pages([Page::new("StartPage", "Plain words, StartPage and '''more'''.")]);
        let history = NoHistory;
        let ctx = context(&wiki, &history);
        let page = wiki.find_page("StartPage").unwrap();

        let render = |mode| {
            let mut buffer = Vec::new();
            render_page(page, mode, &ctx, &mut buffer).unwrap();
            buffer
        };

        assert_eq!(render(RenderMode::Rtf), render(RenderMode::Rtf));
        assert_eq!(render(RenderMode::Print), render(RenderMode::Print));
    }

    #[test]
    fn test_page_view() {
        let wiki = Wiki::from_pages([
            Page::new("StartPage", "text").with_owner("JohnDoe"),
            Page::new("JohnDoe", "me"),
        ]);
        let history = NoHistory;
        let mut ctx = context(&wiki, &history);
        ctx.set_var(CATEGORY_VAR, "ToolsCategory");
        let page = wiki.find_page("StartPage").unwrap();

        let view = page_view(page, RenderMode::Print, &ctx);

        assert_eq!(view.owner_name, "John Doe");
        assert_eq!(view.menu.user_title, "John Doe");
        assert!(view.menu.writable);
        assert!(!view.menu.history);
        assert_eq!(view.menu.category.as_deref(), Some("ToolsCategory"));
        assert_eq!(view.timestring, "Thursday,  01. Jan. 1970,   1:00");
    }
}
