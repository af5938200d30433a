//! RSS 2.0 channel of recently changed pages

use crate::markup::{render_with, RenderContext, RenderError};
use crate::output::escape::escape_rss;
use crate::output::{RenderMode, RssOutput};
use crate::store::Page;
use std::io::Write;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Channel settings from the wiki configuration
#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub description: String,
    /// Pages changed within this many hours become items
    pub hours: u32,
}

/// Pages worth an item: not hidden and changed recently, newest first
pub fn recent_pages<'s>(ctx: &RenderContext<'s>, hours: u32) -> Vec<&'s Page> {
    let since = ctx.now() - i64::from(hours) * 3600;

    ctx.store
        .time_sorted()
        .into_iter()
        .filter(|page| page.time > since && !page.hidden)
        .collect()
}

/// The headline of a page as plain, escaped text
fn describe(page: &Page, ctx: &RenderContext) -> Result<String, RenderError> {
    let mut buffer = Vec::new();
    {
        let mut out = RssOutput::new(&mut buffer);
        render_with(page, RenderMode::Rss, ctx, &mut out)?;
    }
    Ok(String::from_utf8_lossy(&buffer).trim_end().to_string())
}

/// Write the whole channel
///
/// # Parameters
/// * `ctx` - Store and system facts; the user should be a guest
/// * `settings` - Description and time window
/// * `sink` - Where the XML goes
pub fn write_channel(
    ctx: &RenderContext,
    settings: &FeedSettings,
    sink: &mut dyn Write,
) -> Result<(), RenderError> {
    let url = ctx.facts.base_url();
    let pages = recent_pages(ctx, settings.hours);

    #[cfg(feature = "parallel")]
    let descriptions: Result<Vec<String>, RenderError> =
        pages.par_iter().map(|page| describe(page, ctx)).collect();

    #[cfg(not(feature = "parallel"))]
    let descriptions: Result<Vec<String>, RenderError> =
        pages.iter().map(|page| describe(page, ctx)).collect();

    let descriptions = descriptions?;

    sink.write_all(b"<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<rss version=\"2.0\">\n")?;
    sink.write_all(b"  <channel>\n")?;
    writeln!(sink, "    <title>{}</title>", escape_rss(&ctx.facts.wiki_name))?;
    writeln!(sink, "    <link>{}</link>", url)?;
    writeln!(sink, "    <description>{}</description>", escape_rss(&settings.description))?;
    sink.write_all(b"    <generator>CuteWiki</generator>\n")?;
    sink.write_all(b"    <language>en</language>\n")?;

    for (page, description) in pages.iter().zip(&descriptions) {
        sink.write_all(b"    <item>\n")?;
        writeln!(sink, "      <title>{}</title>", escape_rss(&page.title))?;
        writeln!(sink, "      <link>{}/Wiki/{}.htm</link>", url, page.name)?;
        writeln!(sink, "      <description>{}</description>", description)?;
        writeln!(sink, "      <author>{}</author>", escape_rss(&page.owner))?;
        writeln!(sink, "      <guid>{}/Wiki/{}.htm</guid>", url, page.name)?;
        if let Some(topic) = &page.topic {
            writeln!(sink, "      <category>{}</category>", escape_rss(topic))?;
        }
        sink.write_all(b"    </item>\n")?;
    }

    sink.write_all(b"  </channel>\n</rss>\n")?;
    sink.flush()?;

    log::info!("Feed written with {} items", pages.len());
    Ok(())
}
