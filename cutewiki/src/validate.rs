//! Consistency checks over all pages of a wiki

use crate::store::{special, PageStore};
use regex::Regex;
use std::fmt;
use std::path::Path;

/// Something a page refers to that does not exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// A WikiWord without a page or built-in page behind it
    BrokenLink { page: String, target: String },
    /// An `[image]` field without a PNG file
    MissingImage { page: String, image: String },
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::BrokenLink { page, target } => write!(f, "{}: broken link to {}", page, target),
            Problem::MissingImage { page, image } => write!(f, "{}: missing image {}.png", page, image),
        }
    }
}

/// WikiWords that neither a stored nor a built-in page answers
pub fn broken_links(store: &dyn PageStore) -> Vec<Problem> {
    store
        .alpha_sorted()
        .into_iter()
        .flat_map(|page| {
            page.links
                .iter()
                .filter(move |target| store.find_page(target).is_none() && special::find(target).is_none())
                .map(move |target| Problem::BrokenLink {
                    page: page.name.clone(),
                    target: target.clone(),
                })
        })
        .collect()
}

/// `[image]` fields whose `<image_dir>/<image>.png` is missing
pub fn missing_images(store: &dyn PageStore, image_dir: &Path) -> Result<Vec<Problem>, regex::Error> {
    let field = Regex::new(r"\[([a-z][A-Za-z0-9_]*)\]")?;
    let mut problems = Vec::new();

    for page in store.alpha_sorted() {
        for capture in field.captures_iter(&page.text) {
            let image = &capture[1];
            if !image_dir.join(format!("{}.png", image)).is_file() {
                problems.push(Problem::MissingImage {
                    page: page.name.clone(),
                    image: image.to_string(),
                });
            }
        }
    }

    Ok(problems)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Page, Wiki};

    #[test]
    fn test_broken_links() {
        // Arrange
        let wiki = Wiki::from_pages([
            Page::new("StartPage", "See OtherPage, MissingPage and HelpPage"),
            Page::new("OtherPage", "Back to StartPage"),
        ]);

        // Act
        let problems = broken_links(&wiki);

        // Assert
        assert_eq!(
            problems,
            vec![Problem::BrokenLink {
                page: "StartPage".to_string(),
                target: "MissingPage".to_string(),
            }]
        );
        assert_eq!(problems[0].to_string(), "StartPage: broken link to MissingPage");
    }

    #[test]
    fn test_missing_images() {
        let wiki = Wiki::from_pages([Page::new(
            "StartPage",
            "[logo] and [http://example.org x] and [pages=Start*] and [Upper]",
        )]);
        let dir = std::env::temp_dir().join(format!("cutewiki-images-{}", std::process::id()));

        let problems = missing_images(&wiki, &dir).unwrap();

        assert_eq!(
            problems,
            vec![Problem::MissingImage {
                page: "StartPage".to_string(),
                image: "logo".to_string(),
            }]
        );
    }
}
