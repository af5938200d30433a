//! Case-insensitive `*`/`?` search patterns

use regex::Regex;

/// A compiled search pattern
///
/// `?` matches one character and `*` any run of characters, both
/// within a single line. The pattern may match anywhere in the text.
#[derive(Debug, Clone)]
pub struct Wildcard {
    regex: Regex,
}

impl Wildcard {
    /// Compile a wildcard pattern
    ///
    /// # Parameters
    /// * `pattern` - The user supplied pattern
    ///
    /// # Returns
    /// * `Ok(Wildcard)` - The compiled pattern
    /// * `Err(regex::Error)` - The pattern exceeds the regex size limits
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let mut source = String::from("(?i)");
        for ch in pattern.chars() {
            match ch {
                '*' => source.push_str("[^\n]*"),
                '?' => source.push_str("[^\n]"),
                other => source.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
            }
        }

        Ok(Self {
            regex: Regex::new(&source)?,
        })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_case_insensitive() {
        let pattern = Wildcard::new("start").unwrap();
        assert!(pattern.matches("The StartPage"));
        assert!(!pattern.matches("Stop"));
    }

    #[test]
    fn test_question_mark() {
        let pattern = Wildcard::new("h?lp").unwrap();
        assert!(pattern.matches("HelpPage"));
        assert!(!pattern.matches("hlp"));
    }

    #[test]
    fn test_star_stays_on_one_line() {
        let pattern = Wildcard::new("foo*bar").unwrap();
        assert!(pattern.matches("foo and bar"));
        assert!(!pattern.matches("foo\nbar"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let pattern = Wildcard::new("a.b").unwrap();
        assert!(pattern.matches("xa.by"));
        assert!(!pattern.matches("axb"));
    }
}
