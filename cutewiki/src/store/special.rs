//! Built-in pages the wiki cannot run without

use super::page::{Page, PageType};

/// Owner of every built-in page
pub const SPECIAL_OWNER: &str = "WikiAdmin";

/// Password given to the administrator's homepage on creation
pub const ADMIN_PASSWORD: &str = "wikiadmin";

/// A page that is created on demand when missing
#[derive(Debug, Clone, Copy)]
pub struct SpecialPage {
    pub name: &'static str,
    pub title: Option<&'static str>,
    pub text: &'static str,
    pub page_type: PageType,
}

pub const SPECIAL_PAGES: &[SpecialPage] = &[
    SpecialPage {
        name: "EditPage",
        title: None,
        text: "This is the text of '''[PageName]''':\n\n[EditForm]",
        page_type: PageType::Normal,
    },
    SpecialPage {
        name: "SourcePage",
        title: None,
        text: "This is the text of '''[PageName]''':\n\n[PageSource]",
        page_type: PageType::Normal,
    },
    SpecialPage {
        name: "SearchPage",
        title: None,
        text: "This is our search for '''[SearchText]''':\n\n[SearchList]",
        page_type: PageType::Normal,
    },
    SpecialPage {
        name: "ReversePage",
        title: Some("ReverseLookup"),
        text: "These pages do point to '''[PageName]''':\n\n[ReverseList]",
        page_type: PageType::Normal,
    },
    SpecialPage {
        name: "ErrorPage",
        title: None,
        text: "'''[ErrorMessage]'''\n\n[ErrorDescription]",
        page_type: PageType::Normal,
    },
    SpecialPage {
        name: "StartPage",
        title: None,
        text: "This is just an example startpage. If you like to change the title or \
               have to show it up in another language, just edit this page and change it.",
        page_type: PageType::Normal,
    },
    SpecialPage {
        name: "IndexPage",
        title: None,
        text: "This is the index of all pages: \n\n[PageIndex]",
        page_type: PageType::Normal,
    },
    SpecialPage {
        name: "ChangesPage",
        title: None,
        text: "This is the history of the latest changes in our wiki: \n\n[RecentChanges]",
        page_type: PageType::Normal,
    },
    SpecialPage {
        name: "InfoPage",
        title: None,
        text: "This is the Status of the Wiki: \n\n\
               || Parameter  | actual Value |\n\
               | Page count  | [PageCount]  |\n\
               | Memory consumption | [MainMemory] |\n\
               | Disk usage  | [DiskUsage]  |",
        page_type: PageType::Normal,
    },
    SpecialPage {
        name: "DeletePage",
        title: None,
        text: "You deleted the page '''[PageName]'''! \n\nGo on at the StartPage...\n",
        page_type: PageType::Normal,
    },
    SpecialPage {
        name: "CategoryPage",
        title: None,
        text: "This is a list of all categories you did define in this Wiki:\n\n-----\n[CategoryList]",
        page_type: PageType::Normal,
    },
    SpecialPage {
        name: "HelpPage",
        title: None,
        text: "This is an initial HelpPage.\n\
               -----\n\
               The little icons in the menu bar have the following meaning:\n\n \
               1. The HomePage - go here to get an overview of this wiki.\n \
               2. The Editor - if visible, click here to edit the actual page.\n \
               3. The index - see all pages you are allowed to see.\n \
               4. The latest changes - see, what pages have been changed lately.\n \
               5. The info - get some infos about the state of this wiki.\n \
               6. This help - well, you already see it here.\n \
               7. Print view - you get a new window with the page in a printable form.\n \
               8. Ascii view - get the page in pure ASCII form.\n \
               9. Richtext view - click here to get your page in Richtext format.\n \
               10. Search form - insert some text and search it in the page titles or fulltext.\n \
               11. Personal page - click on your name to get to your own page.\n\
               -----\n\
               There is much more to tell, especially about the formatting options of this wiki.",
        page_type: PageType::Normal,
    },
    SpecialPage {
        name: "HistoryPage",
        title: None,
        text: "This is the history of '''[PageName]''':\n\n[PageHistory]",
        page_type: PageType::Normal,
    },
    SpecialPage {
        name: "DiffPage",
        title: None,
        text: "These are the changes for page '''[PageName]''':\n\n[PageDiffs]",
        page_type: PageType::Normal,
    },
    SpecialPage {
        name: "WikiAdmin",
        title: None,
        text: "You are the Wiki's administrator. Congratulations!\n\n\
               -----\n\
               This is the user password reset. Just type in the user name and press enter:\n\
               [PasswordReset]",
        page_type: PageType::User,
    },
];

/// Look up a built-in page by name
pub fn find(name: &str) -> Option<&'static SpecialPage> {
    SPECIAL_PAGES.iter().find(|special| special.name == name)
}

impl SpecialPage {
    /// Build the page as it is stored on first use
    ///
    /// # Parameters
    /// * `now` - Creation time in seconds since the epoch
    pub fn build(&self, now: i64) -> Page {
        let mut page = Page::new(self.name, self.text)
            .with_owner(SPECIAL_OWNER)
            .with_type(self.page_type)
            .with_time(now);
        if let Some(title) = self.title {
            page.title = title.to_string();
        }
        if self.page_type == PageType::User {
            page.password = Some(ADMIN_PASSWORD.to_string());
        }
        page.private = true;
        page
    }
}
