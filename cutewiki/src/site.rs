//! Resolving a requested page name to the page that gets rendered

use crate::markup::{render_page, RenderContext, RenderError, CATEGORY_VAR};
use crate::output::RenderMode;
use crate::store::{special, Page, PageStore, PageType};
use std::borrow::Cow;
use std::io::Write;

const NOT_ALLOWED: &str = "You are not allowed to view this page!";

const NOT_ALLOWED_DESCRIPTION: &str = "It may be the case, that somebody did change the \
permissions, and you just tried to access the page afterwards.\n\nAlso it may be, that you \
are one of these bad guys that want to see things that you better should not see. If you \
just would have heard on your mom...";

/// Render whatever a request for `name` should show
///
/// Visible pages render as they are. Hidden pages show the error page,
/// missing built-in pages their default text, and any other missing
/// page the edit form to create it.
///
/// # Parameters
/// * `name` - Requested page name
/// * `mode` - Requested render mode
/// * `ctx` - Render context; request variables are added to it
/// * `sink` - Where the output goes
pub fn render_named(
    name: &str,
    mode: RenderMode,
    ctx: &mut RenderContext,
    sink: &mut dyn Write,
) -> Result<(), RenderError> {
    let store = ctx.store;

    match store.find_page(name) {
        Some(page) if store.is_visible(page, &ctx.user) => {
            if page.page_type == PageType::Category {
                add_category(ctx, &page.name);
            }
            render_page(page, mode, ctx, sink)
        }
        Some(page) => {
            log::info!("{} may not view {}", ctx.user, page.name);
            ctx.set_var("errormsg", NOT_ALLOWED);
            ctx.set_var("errordsc", NOT_ALLOWED_DESCRIPTION);
            let error_page = stored_or_builtin(store, "ErrorPage", ctx.now())?;
            render_page(&error_page, mode, ctx, sink)
        }
        None => match special::find(name) {
            Some(builtin) => render_page(&builtin.build(ctx.now()), mode, ctx, sink),
            None => {
                ctx.set_var("page", name);
                let edit_page = stored_or_builtin(store, "EditPage", ctx.now())?;
                render_page(&edit_page, RenderMode::Edit, ctx, sink)
            }
        },
    }
}

/// A page from the store, or the built-in page of that name
fn stored_or_builtin<'s>(store: &'s dyn PageStore, name: &str, now: i64) -> Result<Cow<'s, Page>, RenderError> {
    if let Some(page) = store.find_page(name) {
        return Ok(Cow::Borrowed(page));
    }
    special::find(name)
        .map(|builtin| Cow::Owned(builtin.build(now)))
        .ok_or_else(|| RenderError::UnknownPage(name.to_string()))
}

/// Extend the `A+B` category filter by one category
fn add_category(ctx: &mut RenderContext, category: &str) {
    let filter = match ctx.var(CATEGORY_VAR) {
        Some(current) if current.split('+').any(|name| name.trim() == category) => return,
        Some(current) if !current.is_empty() => format!("{}+{}", current, category),
        _ => category.to_string(),
    };
    ctx.set_var(CATEGORY_VAR, &filter);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::NoHistory;
    use crate::markup::context::testing::context;
    use crate::store::Wiki;

    fn sample_wiki() -> Wiki {
        let mut secret = Page::new("SecretPage", "hush").with_owner("JaneRoe");
        secret.hidden = true;

        Wiki::from_pages([
            Page::new("StartPage", "Hello ToolsCategory"),
            Page::new("ToolsCategory", "All tools").with_type(PageType::Category),
            Page::new("MetalCategory", "Metal").with_type(PageType::Category),
            secret,
        ])
    }

    fn render(name: &str, mode: RenderMode, configure: impl FnOnce(&mut RenderContext)) -> String {
        let wiki = sample_wiki();
        let history = NoHistory;
        let mut ctx = context(&wiki, &history);
        configure(&mut ctx);
        let mut buffer = Vec::new();

        render_named(name, mode, &mut ctx, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_visible_page() {
        let html = render("StartPage", RenderMode::Normal, |_| {});
        assert!(html.contains("Hello "));
        assert!(html.contains("/Wiki/ToolsCategory"));
    }

    #[test]
    fn test_hidden_page_shows_error() {
        let html = render("SecretPage", RenderMode::Normal, |_| {});

        assert!(html.contains("<b>You are not allowed to view this page!</b>"));
        assert!(html.contains("you better should not see"));
        assert!(!html.contains("hush"));
    }

    #[test]
    fn test_missing_builtin_page() {
        let html = render("InfoPage", RenderMode::Normal, |_| {});
        assert!(html.contains("This is the Status of the Wiki"));
    }

    #[test]
    fn test_missing_page_opens_edit_form() {
        let html = render("BrandNew", RenderMode::Normal, |_| {});

        assert!(html.contains("action=\"/Save/Result\""));
        assert!(html.contains("<input type=\"hidden\" name=\"page\" value=\"BrandNew\">"));
        assert!(html.contains("You change the wiki page 'BrandNew'"));
    }

    #[test]
    fn test_category_filter_grows_once() {
        let wiki = sample_wiki();
        let history = NoHistory;
        let mut ctx = context(&wiki, &history);
        let mut sink = Vec::new();

        render_named("ToolsCategory", RenderMode::Print, &mut ctx, &mut sink).unwrap();
        render_named("MetalCategory", RenderMode::Print, &mut ctx, &mut sink).unwrap();
        render_named("ToolsCategory", RenderMode::Print, &mut ctx, &mut sink).unwrap();

        assert_eq!(ctx.var(CATEGORY_VAR), Some("ToolsCategory+MetalCategory"));
    }

    #[test]
    fn test_builtin_lookup_fails_for_unknown_names() {
        let wiki = sample_wiki();
        assert!(matches!(
            stored_or_builtin(&wiki, "NoSuchPage", 0),
            Err(RenderError::UnknownPage(name)) if name == "NoSuchPage"
        ));
        assert!(matches!(stored_or_builtin(&wiki, "ErrorPage", 0), Ok(Cow::Owned(_))));
    }
}
