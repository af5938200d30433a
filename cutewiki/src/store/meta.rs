//! Reading and writing `.met` metadata files

use super::page::{Page, PageType};
use std::fmt::Write as _;

/// Apply the `key: value` lines of a `.met` file to a page
///
/// Returns whether a `time` entry was present.
pub fn apply_meta(page: &mut Page, content: &str) -> bool {
    let mut has_time = false;

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            log::warn!("{}.met line {}: missing ':'", page.name, index + 1);
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            "title" => {
                if !value.is_empty() {
                    page.title = value.to_string();
                }
            }
            "owner" => page.owner = value.to_string(),
            "time" => match value.parse::<i64>() {
                Ok(time) => {
                    page.time = time;
                    has_time = true;
                }
                Err(_) => log::warn!("{}.met: invalid time '{}'", page.name, value),
            },
            "topic" => page.topic = non_empty(value),
            "group" => page.group = non_empty(value),
            "password" => {
                page.password = Some(value.to_string());
                page.page_type = PageType::User;
            }
            "pagetype" => {
                if page.password.is_none() {
                    page.page_type = PageType::from_meta(value);
                }
            }
            "private" => page.private = is_yes(value),
            "hidden" => page.hidden = is_yes(value),
            "editor" => page.editor = non_empty(value),
            "edited" => page.edited = value.parse().ok(),
            other => log::warn!("{}.met: unknown key '{}'", page.name, other),
        }
    }

    has_time
}

/// Serialize the persistent metadata of a page
pub fn format_meta(page: &Page) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "title: {}", page.title);
    if let Some(page_type) = page.page_type.meta_value() {
        let _ = writeln!(out, "pagetype: {}", page_type);
    }
    let _ = writeln!(out, "owner: {}", page.owner);
    if let Some(password) = &page.password {
        let _ = writeln!(out, "password: {}", password);
    }
    if let Some(group) = &page.group {
        let _ = writeln!(out, "group: {}", group);
    }
    if let Some(topic) = &page.topic {
        let _ = writeln!(out, "topic: {}", topic);
    }
    if page.private {
        out.push_str("private: yes\n");
    }
    if page.hidden {
        out.push_str("hidden: yes\n");
    }
    let _ = writeln!(out, "time: {}", page.time);

    out
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn is_yes(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "yes" | "true" | "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_meta() {
        let mut page = Page::new("JohnDoe", "");
        let has_time = apply_meta(
            &mut page,
            "title: John Doe\nowner: JohnDoe\npassword: secret\ntime: 1700000000\nhidden: yes\n",
        );

        assert!(has_time);
        assert_eq!(page.title, "John Doe");
        assert_eq!(page.owner, "JohnDoe");
        assert_eq!(page.page_type, PageType::User);
        assert_eq!(page.time, 1_700_000_000);
        assert!(page.hidden);
        assert!(!page.private);
    }

    #[test]
    fn test_apply_meta_skips_bad_lines() {
        let mut page = Page::new("StartPage", "");
        let has_time = apply_meta(&mut page, "garbage line\ncolour: blue\ntime: soon\n");

        assert!(!has_time);
        assert_eq!(page.title, "Start Page");
    }

    #[test]
    fn test_password_wins_over_pagetype() {
        let mut page = Page::new("JohnDoe", "");
        apply_meta(&mut page, "password: x\npagetype: category\n");
        assert_eq!(page.page_type, PageType::User);
    }

    #[test]
    fn test_format_meta_key_order() {
        let mut page = Page::new("ToolsCategory", "")
            .with_owner("WikiAdmin")
            .with_type(PageType::Category)
            .with_time(42);
        page.topic = Some("StartPage".to_string());
        page.private = true;

        assert_eq!(
            format_meta(&page),
            "title: Tools Category\npagetype: category\nowner: WikiAdmin\ntopic: StartPage\nprivate: yes\ntime: 42\n"
        );
    }
}
