//! Navigation bar on top of every HTML page

use super::escape::escape_xml;
use super::{PageView, RenderMode};
use std::io::{self, Write};

const TAB: &str = "<img src=\"/Files/tab.png\" alt=\"|\">";

/// Write the menu form with buttons, category filter, search and user link
pub fn write_menu_bar(sink: &mut dyn Write, page: &PageView) -> io::Result<()> {
    let name = &page.name;
    let menu = &page.menu;

    sink.write_all(b"<form method=\"post\" accept-charset=\"UTF-8\" action=\"/Search/Result\">\n")?;
    sink.write_all(b"<div class=\"bar\">\n")?;
    sink.write_all(
        b"<a href=\"/Wiki/StartPage\" title=\"Wiki Home\" ><img src=\"/Files/home.png\" alt=\"Wiki Home\"></a>\n",
    )?;
    sink.write_all(TAB.as_bytes())?;

    if page.mode != RenderMode::Edit && menu.writable {
        writeln!(
            sink,
            "<a href=\"/Edit/{}\"  title=\"Edit\"><img src=\"/Files/edit.png\" alt=\"Edit\"></a>",
            name
        )?;
    }
    if page.mode != RenderMode::Source {
        writeln!(
            sink,
            "<a href=\"/Text/{}\" title=\"Wiki-Source\" type=\"text/plain\"><img src=\"/Files/txt-file.png\" alt=\"Text\"></a>",
            name
        )?;
    }
    if menu.history {
        writeln!(
            sink,
            "<a href=\"/History/{}\" title=\"Page-History\"><img src=\"/Files/version.png\" alt=\"History\"></a>",
            name
        )?;
    }
    sink.write_all(TAB.as_bytes())?;

    sink.write_all(
        b"<a href=\"/Wiki/IndexPage\" title=\"Index\"><img src=\"/Files/index.png\" alt=\"Index\"></a>\n",
    )?;
    sink.write_all(
        b"<a href=\"/Wiki/ChangesPage\" title=\"Changes\"><img src=\"/Files/changes.png\" alt=\"Changes\"></a>\n",
    )?;
    sink.write_all(TAB.as_bytes())?;
    sink.write_all(
        b"<a href=\"/Wiki/InfoPage\" title=\"Wiki-Status\"><img src=\"/Files/info.png\" alt=\"Info\"></a>\n",
    )?;
    sink.write_all(
        b"<a href=\"/Wiki/HelpPage\" title=\"Help\" target=\"_blank\"><img src=\"/Files/help.png\" alt=\"Help\"></a>\n",
    )?;

    if page.mode != RenderMode::Edit {
        sink.write_all(TAB.as_bytes())?;
        writeln!(
            sink,
            "<a href=\"/Print/{}\" title=\"Print\" type=\"text/html\" target=\"_blank\"><img src=\"/Files/print.png\" alt=\"Print\"></a>",
            name
        )?;
        writeln!(
            sink,
            "<a href=\"/Richtext/{}.rtf\" title=\"Richtext\" type=\"text/rtf\" target=\"_blank\"><img src=\"/Files/rtf-file.png\" alt=\"Richtext\"></a>",
            name
        )?;
    }
    sink.write_all(TAB.as_bytes())?;

    write_category(sink, page)?;
    write_search(sink, page)?;
    sink.write_all(TAB.as_bytes())?;
    write_user(sink, page)?;

    sink.write_all(b"</div>\n</form>\n")
}

fn write_category(sink: &mut dyn Write, page: &PageView) -> io::Result<()> {
    let category = page.menu.category.as_deref();

    writeln!(
        sink,
        "<input type=\"hidden\" name=\"category\" value=\"{}\">",
        escape_xml(category.unwrap_or_default())
    )?;

    match category {
        Some(category) => {
            writeln!(
                sink,
                "<a href=\"/Wiki/CategoryPage\" title=\"{}\"><img src=\"/Files/filter_add.png\" alt=\"Filter\"></a>",
                escape_xml(category)
            )?;
            writeln!(
                sink,
                "<a href=\"/FilterOff/{}\" title=\"Filter off\"><img src=\"/Files/filter_off.png\" alt=\"Filter off\"></a>",
                page.name
            )
        }
        None => sink.write_all(
            b"<a href=\"/Wiki/CategoryPage\" title=\"No filter active!\"><img src=\"/Files/filter_on.png\" alt=\"Filter\"></a>\n",
        ),
    }
}

fn write_search(sink: &mut dyn Write, page: &PageView) -> io::Result<()> {
    writeln!(
        sink,
        "<input type=\"text\" size=\"30\" name=\"cutewiki-search\" value=\"{}\" alt=\"Insert your search string here!\">",
        escape_xml(page.menu.search.as_deref().unwrap_or_default())
    )?;
    sink.write_all(
        b"<input class=\"bar\" title=\"Title Search\" type=\"submit\" name=\"titlesearch\" value=\" Title \" >\n",
    )?;
    sink.write_all(
        b"<input class=\"bar\" title=\"Fulltext Search\" type=\"submit\" name=\"fullsearch\" value=\" Full \" >\n",
    )
}

fn write_user(sink: &mut dyn Write, page: &PageView) -> io::Result<()> {
    let title = escape_xml(&page.menu.user_title);

    write!(
        sink,
        "<a href=\"/Wiki/{}\" title=\"Homepage of {}\">{}</a>",
        escape_xml(&page.menu.user),
        title,
        title
    )?;
    sink.write_all(TAB.as_bytes())?;
    sink.write_all(
        b"<a href=\"/Wiki/StartPage?logoff=yes\" title=\"Logoff\" ><img src=\"/Files/logoff.png\" alt=\"Logoff\"></a>\n",
    )
}
