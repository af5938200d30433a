//! Loading the pages directory into memory and writing pages back

use super::error::StoreError;
use super::meta::{apply_meta, format_meta};
use super::page::Page;
use crate::markup::wikiword::is_wikiword;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use walkdir::WalkDir;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Text file extension
pub const TEXT_EXTENSION: &str = "wik";

/// Metadata file extension
pub const META_EXTENSION: &str = "met";

/// Read every `<WikiWord>.wik` file of a directory with its `.met` file
///
/// # Parameters
/// * `dir` - The pages directory
///
/// # Returns
/// * `Ok(Vec<Page>)` - All pages found, sorted by name
/// * `Err(StoreError)` - The directory is missing or a file could not be read
pub fn load_pages(dir: &Path) -> Result<Vec<Page>, StoreError> {
    if !dir.is_dir() {
        return Err(StoreError::MissingDirectory(dir.to_path_buf()));
    }

    let text_files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some(TEXT_EXTENSION))
        .filter(|path| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(is_wikiword)
        })
        .collect();

    #[cfg(feature = "parallel")]
    let pages: Result<Vec<_>, _> = text_files.par_iter().map(|path| load_page(path)).collect();

    #[cfg(not(feature = "parallel"))]
    let pages: Result<Vec<_>, _> = text_files.iter().map(|path| load_page(path)).collect();

    pages
}

/// Load one page from its text file and the metadata file beside it
fn load_page(text_path: &Path) -> Result<Page, StoreError> {
    let name = text_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| StoreError::InvalidPageName(text_path.display().to_string()))?;

    let text = fs::read(text_path)
        .map(decode_text)
        .map_err(|e| StoreError::Io(text_path.to_path_buf(), e))?;
    let file_meta =
        fs::metadata(text_path).map_err(|e| StoreError::Io(text_path.to_path_buf(), e))?;

    let mut page = Page::new(name, &text);
    page.disk_size = file_meta.len();

    let meta_path = text_path.with_extension(META_EXTENSION);
    let has_time = match fs::read(&meta_path) {
        Ok(content) => apply_meta(&mut page, &decode_text(content)),
        Err(e) => {
            log::debug!("No metadata for {}: {}", name, e);
            false
        }
    };

    if !has_time {
        page.time = file_meta
            .modified()
            .ok()
            .and_then(|modified| modified.duration_since(UNIX_EPOCH).ok())
            .map(|age| age.as_secs() as i64)
            .unwrap_or(0);
    }

    log::debug!("Loaded page {} ({} bytes)", page.name, page.disk_size);
    Ok(page)
}

/// Page files are UTF-8 or, as older wikis wrote them, Latin-1
fn decode_text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|e| e.into_bytes().into_iter().map(char::from).collect())
}

/// Write the text and metadata files of a page
///
/// # Parameters
/// * `dir` - The pages directory
/// * `page` - The page to store
///
/// # Returns
/// * `Ok(())` - Both files were written
/// * `Err(StoreError)` - The name is not a WikiWord or a write failed
pub fn save_page(dir: &Path, page: &Page) -> Result<(), StoreError> {
    if !is_wikiword(&page.name) {
        return Err(StoreError::InvalidPageName(page.name.clone()));
    }

    let text_path = dir.join(format!("{}.{}", page.name, TEXT_EXTENSION));
    fs::write(&text_path, &page.text).map_err(|e| StoreError::Io(text_path.clone(), e))?;

    let meta_path = dir.join(format!("{}.{}", page.name, META_EXTENSION));
    fs::write(&meta_path, format_meta(page)).map_err(|e| StoreError::Io(meta_path.clone(), e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PageType;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cutewiki-loader-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_latin1_page() {
        // Arrange
        let dir = temp_dir("latin1");
        fs::write(dir.join("StartPage.wik"), "Hello").unwrap();
        fs::write(dir.join("GermanPage.wik"), b"Gr\xfc\xdfe aus M\xfcnchen").unwrap();
        fs::write(dir.join("GermanPage.met"), b"title: M\xfcnchen\ntime: 5\n").unwrap();

        // Act
        let pages = load_pages(&dir).unwrap();

        // Assert
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].name, "GermanPage");
        assert_eq!(pages[0].text, "Grüße aus München");
        assert_eq!(pages[0].title, "München");
        assert_eq!(pages[0].time, 5);
        assert_eq!(pages[1].text, "Hello");
    }

    #[test]
    fn test_missing_directory() {
        let result = load_pages(Path::new("/nonexistent/cutewiki/pages"));
        assert!(matches!(result, Err(StoreError::MissingDirectory(_))));
    }

    #[test]
    fn test_save_and_load() {
        // Arrange
        let dir = temp_dir("roundtrip");
        let page = Page::new("HelpPage", "Ask WikiAdmin")
            .with_owner("WikiAdmin")
            .with_type(PageType::Category)
            .with_time(1234);
        save_page(&dir, &page).unwrap();
        fs::write(dir.join("notes.wik"), "ignored").unwrap();
        fs::write(dir.join("README.txt"), "ignored").unwrap();

        // Act
        let pages = load_pages(&dir).unwrap();

        // Assert
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].name, "HelpPage");
        assert_eq!(pages[0].owner, "WikiAdmin");
        assert_eq!(pages[0].page_type, PageType::Category);
        assert_eq!(pages[0].time, 1234);
        assert_eq!(pages[0].links, vec!["WikiAdmin".to_string()]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_rejects_bad_name() {
        let dir = temp_dir("badname");
        let page = Page::new("lowercase", "");

        assert!(matches!(save_page(&dir, &page), Err(StoreError::InvalidPageName(_))));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_time_uses_mtime() {
        let dir = temp_dir("mtime");
        fs::write(dir.join("StartPage.wik"), "Hello").unwrap();

        let pages = load_pages(&dir).unwrap();
        assert!(pages[0].time > 0);

        let _ = fs::remove_dir_all(&dir);
    }
}
