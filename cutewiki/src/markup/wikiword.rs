//! The WikiWord rule that turns words into page links

/// Check whether a word names a page
///
/// A WikiWord starts with an uppercase letter followed by one or more
/// lowercase letters, then an uppercase letter or digit, then any run
/// of letters and digits. At least three characters long.
///
/// # Examples
/// `StartPage` and `Ab2Cd` qualify, `start`, `ABC` and `Start_Page` do not.
pub fn is_wikiword(word: &str) -> bool {
    if word.chars().count() < 3 {
        return false;
    }

    let mut chars = word.chars().peekable();

    if !chars.next().is_some_and(char::is_uppercase) {
        return false;
    }
    if !chars.next().is_some_and(char::is_lowercase) {
        return false;
    }
    while chars.next_if(|c| c.is_lowercase()).is_some() {}

    if !chars
        .next()
        .is_some_and(|c| c.is_uppercase() || c.is_ascii_digit())
    {
        return false;
    }

    chars.all(|c| c.is_uppercase() || c.is_lowercase() || c.is_ascii_digit())
}

/// Default title of a page: a space before every inner uppercase letter
pub fn spaced_title(name: &str) -> String {
    let mut title = String::with_capacity(name.len() + 4);
    for (index, ch) in name.chars().enumerate() {
        if index > 0 && ch.is_uppercase() {
            title.push(' ');
        }
        title.push(ch);
    }
    title
}
