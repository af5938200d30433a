//! Bracketed directives that expand to generated content
//!
//! `[PageIndex]`, `[RecentChanges]` and the other uppercase keywords map
//! to a [`Directive`]; `[pages=..]`, `[topic=..]` and `[category=..]`
//! map to a [`DynamicList`]. Both query the page store and write their
//! result through the active renderer.

use super::context::RenderContext;
use super::SEARCH_VAR;
use crate::output::escape::escape_xml;
use crate::output::Output;
use crate::store::{special, Page, PageType};
use itertools::Itertools;
use std::borrow::Cow;
use std::io;

/// Days shown by `[RecentChanges]`
const CHANGE_DAYS: usize = 20;

/// A named directive, matched case-sensitively
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    RecentChanges,
    EditForm,
    PageIndex,
    PageList,
    UserList,
    GroupList,
    PageHistory,
    PageDiffs,
    ReverseList,
    SearchList,
    CategoryList,
    SearchText,
    PageSource,
    PasswordReset,
    MainMemory,
    DiskUsage,
    PageCount,
    PageName,
    WikiName,
    OperatingSystem,
    MachineName,
    UserName,
    ActualDate,
    ActualTime,
    ShortDate,
    TarBackup,
    ErrorMessage,
    ErrorDescription,
    PageCalls,
    DailyCalls,
    WikiStart,
}

impl Directive {
    /// Match a keyword exactly
    pub fn parse(keyword: &str) -> Option<Self> {
        let directive = match keyword {
            "RecentChanges" => Self::RecentChanges,
            "EditForm" => Self::EditForm,
            "PageIndex" => Self::PageIndex,
            "PageList" => Self::PageList,
            "UserList" => Self::UserList,
            "GroupList" => Self::GroupList,
            "PageHistory" => Self::PageHistory,
            "PageDiffs" => Self::PageDiffs,
            "ReverseList" => Self::ReverseList,
            "SearchList" => Self::SearchList,
            "CategoryList" => Self::CategoryList,
            "SearchText" => Self::SearchText,
            "PageSource" => Self::PageSource,
            "PasswordReset" => Self::PasswordReset,
            "MainMemory" => Self::MainMemory,
            "DiskUsage" => Self::DiskUsage,
            "PageCount" => Self::PageCount,
            "PageName" => Self::PageName,
            "WikiName" => Self::WikiName,
            "OperatingSystem" => Self::OperatingSystem,
            "MachineName" => Self::MachineName,
            "UserName" => Self::UserName,
            "ActualDate" => Self::ActualDate,
            "ActualTime" => Self::ActualTime,
            "ShortDate" => Self::ShortDate,
            "TarBackup" => Self::TarBackup,
            "ErrorMessage" => Self::ErrorMessage,
            "ErrorDescription" => Self::ErrorDescription,
            "PageCalls" => Self::PageCalls,
            "DailyCalls" => Self::DailyCalls,
            "WikiStart" => Self::WikiStart,
            _ => return None,
        };
        Some(directive)
    }
}

/// A `[word=argument]` page list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamicList {
    /// Title search
    Pages,
    /// Topic search
    Topic,
    /// Pages in all given categories
    Category,
}

impl DynamicList {
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "pages" => Some(Self::Pages),
            "topic" => Some(Self::Topic),
            "category" => Some(Self::Category),
            _ => None,
        }
    }
}

/// What follows the link in a page list item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListInfo {
    Date,
    DateAndOwner,
}

/// Expand a directive
///
/// # Parameters
/// * `directive` - The matched keyword
/// * `ctx` - Store, user and request variables
/// * `out` - The active renderer
pub fn dispatch(directive: Directive, ctx: &RenderContext, out: &mut dyn Output) -> io::Result<()> {
    let store = ctx.store;
    let facts = &ctx.facts;

    match directive {
        Directive::RecentChanges => write_changes(ctx, out),
        Directive::EditForm => write_edit_form(ctx, out),
        Directive::PageIndex => write_index(ctx, out),
        Directive::PageList => write_list(store.time_sorted(), ListInfo::DateAndOwner, ctx, out),
        Directive::UserList => write_list(store.users(), ListInfo::Date, ctx, out),
        Directive::GroupList => write_list(store.groups(), ListInfo::DateAndOwner, ctx, out),
        Directive::CategoryList => write_list(store.categories(), ListInfo::DateAndOwner, ctx, out),
        Directive::PageHistory => write_history(ctx, out),
        Directive::PageDiffs => write_diffs(ctx, out),
        Directive::ReverseList => match ctx.var("page") {
            Some(name) => write_list(store.reverse_links(name), ListInfo::DateAndOwner, ctx, out),
            None => out.puts("[ReverseList]"),
        },
        Directive::SearchList => write_search(ctx, out),
        Directive::SearchText => var_or(ctx, out, SEARCH_VAR, "[SearchText]"),
        Directive::PageSource => write_source_form(ctx, out),
        Directive::PasswordReset => write_password_reset(ctx, out),
        Directive::MainMemory => out.puts(&format!("{} Kb", store.memory_usage_kb())),
        Directive::DiskUsage => out.puts(&format!("{} Kb", store.disk_usage_kb())),
        Directive::PageCount => out.puts(&store.count().to_string()),
        Directive::PageName => match ctx.var("page") {
            Some(name) => link_page(name, ctx, out),
            None => out.puts("[PageName]"),
        },
        Directive::WikiName => out.puts(&facts.wiki_name),
        Directive::OperatingSystem => {
            out.puts(&format!("{} {}", facts.os_name, facts.os_release))
        }
        Directive::MachineName => out.puts(&facts.machine),
        Directive::UserName => link_page(&ctx.user, ctx, out),
        Directive::ActualDate => out.puts(&facts.actual_date()),
        Directive::ActualTime => out.puts(&facts.actual_time()),
        Directive::ShortDate => out.puts(&facts.short_date()),
        Directive::TarBackup => {
            let url = format!("{}/Backup/pages-{}.tar", facts.base_url(), facts.short_date());
            out.external_link(&url, "Backup")
        }
        Directive::ErrorMessage => var_or(ctx, out, "errormsg", "[ErrorMessage]"),
        Directive::ErrorDescription => var_or(ctx, out, "errordsc", "[ErrorDescription]"),
        Directive::PageCalls => out.puts(&facts.calls.to_string()),
        Directive::DailyCalls => out.puts(&facts.daily_calls().to_string()),
        Directive::WikiStart => out.puts(&facts.wiki_start()),
    }
}

/// Expand a `[pages=..]`, `[topic=..]` or `[category=..]` list
pub fn dynamic_list(
    list: DynamicList,
    argument: &str,
    ctx: &RenderContext,
    out: &mut dyn Output,
) -> io::Result<()> {
    let pages = match list {
        DynamicList::Pages => ctx.store.search_title(argument, None),
        DynamicList::Topic => ctx.store.search_topic(argument),
        DynamicList::Category => ctx.store.in_category(argument),
    };
    write_list(pages, ListInfo::DateAndOwner, ctx, out)
}

/// Link a page by name the way WikiWords in the text are linked
///
/// Pages the user may not see show their title only; missing pages get
/// an invitation to create them.
pub fn link_page(name: &str, ctx: &RenderContext, out: &mut dyn Output) -> io::Result<()> {
    match ctx.store.find_page(name) {
        Some(page) if ctx.store.is_visible(page, &ctx.user) => {
            out.internal_link(&page.name, &page.title, page.page_type)
        }
        Some(page) => out.puts(&page.title),
        None => out.broken_link(name),
    }
}

fn var_or(ctx: &RenderContext, out: &mut dyn Output, name: &str, placeholder: &str) -> io::Result<()> {
    out.puts(ctx.var(name).unwrap_or(placeholder))
}

fn write_list(
    pages: Vec<&Page>,
    info: ListInfo,
    ctx: &RenderContext,
    out: &mut dyn Output,
) -> io::Result<()> {
    let visible: Vec<&Page> = pages
        .into_iter()
        .filter(|page| ctx.store.is_visible(page, &ctx.user))
        .collect();
    if visible.is_empty() {
        return out.puts("No Result!");
    }

    out.list_begin()?;
    for page in visible {
        out.list_item_begin()?;
        out.internal_link(&page.name, &page.title, page.page_type)?;
        out.puts("   -   ")?;
        out.puts(&ctx.facts.timestring(page.time))?;
        if info == ListInfo::DateAndOwner {
            out.puts(", ")?;
            out.puts(&ctx.store.owner_name(page))?;
        }
        out.list_item_end()?;
    }
    out.list_end()
}

/// A heading paragraph followed by the opening of a list paragraph
fn begin_section(heading: &str, out: &mut dyn Output) -> io::Result<()> {
    out.para_begin()?;
    out.heading_begin(1)?;
    out.puts(heading)?;
    out.heading_end(1)?;
    out.para_end()?;
    out.para_begin()?;
    out.list_begin()
}

fn end_section(out: &mut dyn Output) -> io::Result<()> {
    out.list_end()?;
    out.para_end()
}

fn section_item(page: &Page, suffix: &str, out: &mut dyn Output) -> io::Result<()> {
    out.list_item_begin()?;
    out.line_begin()?;
    out.internal_link(&page.name, &page.title, page.page_type)?;
    out.puts(suffix)?;
    out.line_end()?;
    out.list_item_end()
}

/// Visible pages grouped by the first letter of their title
fn write_index(ctx: &RenderContext, out: &mut dyn Output) -> io::Result<()> {
    let visible = ctx
        .store
        .alpha_sorted()
        .into_iter()
        .filter(|page| ctx.store.is_visible(page, &ctx.user));
    let sections = visible.chunk_by(|page| initial(&page.title));

    for (letter, pages) in &sections {
        begin_section(&letter.to_string(), out)?;
        for page in pages {
            let suffix = format!(
                "   -   {}, {}",
                ctx.facts.timestring(page.time),
                ctx.store.owner_name(page)
            );
            section_item(page, &suffix, out)?;
        }
        end_section(out)?;
    }
    Ok(())
}

fn initial(title: &str) -> char {
    title
        .chars()
        .next()
        .and_then(|first| first.to_uppercase().next())
        .unwrap_or(' ')
}

/// Changed pages grouped by day, newest first
fn write_changes(ctx: &RenderContext, out: &mut dyn Output) -> io::Result<()> {
    let shown = ctx
        .store
        .time_sorted()
        .into_iter()
        .filter(|page| !page.hidden || page.owner == ctx.user);
    let days = shown.chunk_by(|page| ctx.facts.datestring(page.time));

    for (date, pages) in (&days).into_iter().take(CHANGE_DAYS) {
        begin_section(&date, out)?;
        for page in pages {
            section_item(page, &format!("   -   {}", page.owner), out)?;
        }
        end_section(out)?;
    }
    Ok(())
}

fn write_search(ctx: &RenderContext, out: &mut dyn Output) -> io::Result<()> {
    let Some(criterion) = ctx.var(SEARCH_VAR) else {
        return out.puts("No search criteria given!");
    };
    let filter = ctx.var("category");

    let pages = if ctx.var("fullsearch").is_some() {
        ctx.store.search_full(criterion, filter)
    } else {
        ctx.store.search_title(criterion, filter)
    };
    write_list(pages, ListInfo::DateAndOwner, ctx, out)
}

/// A stored page or, failing that, a built-in one
fn lookup<'s>(ctx: &RenderContext<'s>, name: &str) -> Option<Cow<'s, Page>> {
    match ctx.store.find_page(name) {
        Some(page) => Some(Cow::Borrowed(page)),
        None => special::find(name).map(|special| Cow::Owned(special.build(ctx.now()))),
    }
}

fn write_edit_form(ctx: &RenderContext, out: &mut dyn Output) -> io::Result<()> {
    let Some(name) = ctx.var("page") else {
        return out.puts("[EditPage]");
    };

    match lookup(ctx, name) {
        Some(page) => {
            if !ctx.store.is_writable(&page, &ctx.user) {
                return out.puts("You are not allowed to change this page!");
            }
            if let Some(editor) = page.active_editor(ctx.now()) {
                if editor != ctx.user {
                    return out.puts(&format!(
                        "Hello, {}! In this moment the page gets edited by {}, please wait a moment and try it later...",
                        ctx.user, editor
                    ));
                }
            }
            edit_form(&page, ctx, out)
        }
        None if super::wikiword::is_wikiword(name) => edit_form(&Page::new(name, ""), ctx, out),
        None => out.puts("This page name is not allowed!"),
    }
}

fn edit_form(page: &Page, ctx: &RenderContext, out: &mut dyn Output) -> io::Result<()> {
    if !out.accepts_forms() {
        return out.puts("[ Edit Form ]");
    }

    let mut form = String::from("<form method=\"post\" accept-charset=\"UTF-8\" action=\"/Save/Result\">\n");
    form.push_str(&format!(
        "  <b>Title:</b> <input type=\"text\" size=\"30\" name=\"title\" value=\"{}\">\n",
        escape_xml(&page.title)
    ));
    form.push_str(&format!(
        "  <b>Topic:</b> <input type=\"text\" size=\"30\" name=\"topic\" value=\"{}\">\n",
        escape_xml(page.topic.as_deref().unwrap_or_default())
    ));
    if page.name == ctx.user {
        form.push_str("<b>Password:</b> <input type=\"password\" size=\"15\" name=\"password\" value=\"\">\n");
    }
    if page.page_type == PageType::Normal {
        form.push_str("<span class=\"right\"><b>Pagetype:</b> <select name=\"pagetype\" size=\"1\">\n");
        form.push_str("<option selected>Normal</option>\n<option>Homepage</option>\n");
        form.push_str("<option>Grouppage</option>\n<option>Category</option>\n</select>\n</span>");
    }
    form.push_str("<br><br><textarea class=\"wikisource\" name=\"text\" cols=\"116\" rows=\"21\" >\n");
    form.push_str(&escape_xml(&page.text));
    form.push_str("</textarea><br><br>\n");
    if page.page_type != PageType::User {
        form.push_str(&format!(
            "<b>Group:</b> <input type=\"text\" size=\"30\" name=\"group\" value=\"{}\">\n",
            escape_xml(page.group.as_deref().unwrap_or_default())
        ));
    }
    form.push_str("   \n");
    form.push_str(&format!(
        "<input type=\"checkbox\" name=\"private\" value=\"yes\" {}> <b>Read Only</b>\n",
        checked(page.private)
    ));
    form.push_str(&format!(
        "<input type=\"checkbox\" name=\"hidden\" value=\"yes\" {}> <b>Hidden</b>\n",
        checked(page.hidden)
    ));
    form.push_str("<span class=\"right\"><input class=\"content\" type=\"submit\" value=\" Save \">\n");
    form.push_str("<input class=\"content\" type=\"reset\" value=\" Reset \"><br>\n</span>");
    form.push_str(&format!(
        "<input type=\"hidden\" name=\"page\" value=\"{}\">\n",
        escape_xml(&page.name)
    ));
    form.push_str("</form>\n");

    out.raw(&form)
}

fn checked(on: bool) -> &'static str {
    if on {
        "checked"
    } else {
        ""
    }
}

fn write_source_form(ctx: &RenderContext, out: &mut dyn Output) -> io::Result<()> {
    let Some(name) = ctx.var("page") else {
        return out.puts("[EditPage]");
    };
    let Some(page) = lookup(ctx, name) else {
        return Ok(());
    };
    if !out.accepts_forms() {
        return out.puts("[ Page Source ]");
    }

    out.raw("<form method=\"post\" accept-charset=\"UTF-8\" action=\"/Save/Result\">\n")?;
    out.raw("<textarea class=\"wikisource\" name=\"text\" cols=\"116\" rows=\"21\" readonly>\n")?;
    out.raw(&escape_xml(&page.text))?;
    out.raw("</textarea><br><br>\n</form>\n")
}

fn write_password_reset(ctx: &RenderContext, out: &mut dyn Output) -> io::Result<()> {
    if !ctx.is_admin() {
        return out.puts("Just allowed for wiki admins!");
    }
    if !out.accepts_forms() {
        return out.puts("[ Password Reset Form ]");
    }

    out.raw("<form method=\"post\" accept-charset=\"UTF-8\" action=\"/Password/Result\">\n")?;
    out.raw("  <input type=\"text\" size=\"50\" name=\"pwreset\" value=\"\">\n")?;
    out.raw("  <input class=\"content\" type=\"submit\" value=\" Password Reset \">\n")?;
    out.raw("</form>\n")
}

fn text_cell(text: &str, out: &mut dyn Output) -> io::Result<()> {
    out.table_cell_begin()?;
    out.puts(text)?;
    out.table_cell_end()
}

fn number_cell(text: &str, out: &mut dyn Output) -> io::Result<()> {
    out.table_number_begin()?;
    out.puts(text)?;
    out.table_number_end()
}

/// A table row per change between two adjacent revisions
fn write_history(ctx: &RenderContext, out: &mut dyn Output) -> io::Result<()> {
    let Some(name) = ctx.var("page") else {
        return out.puts("[PageHistory]");
    };

    out.table_begin(3)?;
    out.table_head_begin()?;
    for title in ["From", "To", "Date", "Changed by", "Diffs"] {
        text_cell(title, out)?;
    }
    out.table_head_end()?;

    let revisions = ctx.history.log(name).unwrap_or_else(|e| {
        log::warn!("No history for {}: {}", name, e);
        Vec::new()
    });

    for pair in revisions.windows(2) {
        let (newer, older) = (&pair[0], &pair[1]);

        out.table_row_begin()?;
        number_cell(&older.revision, out)?;
        number_cell(&newer.revision, out)?;
        text_cell(&newer.date, out)?;

        out.table_cell_begin()?;
        link_page(&newer.user, ctx, out)?;
        out.table_cell_end()?;

        out.table_cell_begin()?;
        if out.accepts_html() {
            out.raw(&format!(
                "<a class=\"gotopage\" href=\"/Diff/{}?rev1={}&amp;rev2={}\" title=\"{} - {}\">diff</a>\n",
                escape_xml(name),
                escape_xml(&older.revision),
                escape_xml(&newer.revision),
                escape_xml(&older.revision),
                escape_xml(&newer.revision)
            ))?;
        } else {
            out.puts("diff")?;
        }
        out.table_cell_end()?;
        out.table_row_end()?;
    }

    out.table_end()
}

/// Section of `rcsdiff -c` output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiffBlock {
    Header,
    Begin,
    Before,
    After,
}

/// Kind of a changed line inside a section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiffLine {
    Normal,
    Added,
    Deleted,
    Changed,
}

impl DiffLine {
    fn of(line: &str) -> Self {
        if line.starts_with("+ ") {
            Self::Added
        } else if line.starts_with("- ") {
            Self::Deleted
        } else if line.starts_with("! ") {
            Self::Changed
        } else {
            Self::Normal
        }
    }

    fn class(self) -> Option<&'static str> {
        match self {
            Self::Normal => None,
            Self::Added => Some("added"),
            Self::Deleted => Some("deleted"),
            Self::Changed => Some("changed"),
        }
    }
}

fn write_diffs(ctx: &RenderContext, out: &mut dyn Output) -> io::Result<()> {
    let (Some(name), Some(rev1), Some(rev2)) = (ctx.var("page"), ctx.var("rev1"), ctx.var("rev2"))
    else {
        return out.puts("[PageDiffs]");
    };

    let lines = ctx.history.diff(name, rev1, rev2).unwrap_or_else(|e| {
        log::warn!("No differences for {}: {}", name, e);
        Vec::new()
    });

    if !out.accepts_html() {
        for line in &lines {
            out.puts(line)?;
            out.line_end()?;
        }
        return Ok(());
    }

    out.raw("<div class=\"diff\">\n<div class=\"head\">\n")?;
    let mut block = DiffBlock::Header;
    let mut previous_block = DiffBlock::Header;
    let mut previous_line = DiffLine::Normal;

    for line in &lines {
        if line.starts_with("****") {
            block = DiffBlock::Begin;
        } else if block != DiffBlock::Header && line.starts_with("*** ") {
            block = DiffBlock::Before;
            continue;
        } else if block != DiffBlock::Header && line.starts_with("--- ") {
            block = DiffBlock::After;
            continue;
        }
        let kind = DiffLine::of(line);

        if block != previous_block {
            if previous_line != DiffLine::Normal {
                out.raw("</div>\n")?;
                previous_line = DiffLine::Normal;
            }
            out.raw("</div>\n")?;
            if block != DiffBlock::Begin {
                out.ruler_begin()?;
                out.ruler_end()?;
            }
            out.raw(match block {
                DiffBlock::Before => "<div class=\"old\">\n",
                DiffBlock::After => "<div class=\"new\">\n",
                _ => "<div class=\"head\">\n",
            })?;
        }

        if kind != previous_line {
            if previous_line != DiffLine::Normal {
                out.raw("</div>\n")?;
            }
            if let Some(class) = kind.class() {
                out.raw(&format!("<div class=\"{}\">\n", class))?;
            }
        }

        let text = match block {
            DiffBlock::Header => line.get(4..),
            DiffBlock::Begin => None,
            DiffBlock::Before | DiffBlock::After => line.get(2..),
        };
        if let Some(text) = text {
            out.puts(text)?;
            out.raw("<br>\n")?;
        }

        previous_block = block;
        previous_line = kind;
    }

    if previous_line != DiffLine::Normal {
        out.raw("</div>\n")?;
    }
    out.raw("</div>\n</div>")
}
