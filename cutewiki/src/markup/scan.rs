//! Character-class scanners over a single line of markup

/// URL schemes recognised in `scheme:` words and bracketed links
pub const URL_SCHEMES: &[&str] = &[
    "http", "mailto", "ftp", "file", "news", "https", "gopher", "telnet", "mms",
];

/// A read position inside a piece of text
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Byte offset of the next character
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move back to an offset previously returned by [`Cursor::pos`]
    pub fn reset(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Consume characters while `pred` holds and return them
    pub fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        &self.text[start..self.pos]
    }

    /// Skip blanks and tabs
    pub fn skip_space(&mut self) {
        self.take_while(|c| c == ' ' || c == '\t');
    }

    /// A word of letters, digits and underscores
    pub fn alnum(&mut self) -> &'a str {
        self.take_while(|c| c.is_alphanumeric() || c == '_')
    }

    pub fn url(&mut self) -> &'a str {
        self.take_while(is_url_char)
    }

    /// Everything up to the closing `]`, which stays unconsumed
    pub fn square(&mut self) -> &'a str {
        self.take_while(|c| c != ']')
    }

    /// Everything up to the next `|`, which stays unconsumed
    pub fn cell(&mut self) -> &'a str {
        self.take_while(|c| c != '|')
    }
}

pub fn is_url_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "+-_:/.,#%?&=@();~".contains(c)
}

pub fn is_url_scheme(word: &str) -> bool {
    URL_SCHEMES.contains(&word)
}

/// Whether a cell separator is followed by another one later on the line
pub fn has_cell(rest: &str) -> bool {
    rest.contains('|')
}

/// A cell holding only a number: optional `-`, then digits, `,` and `.`
pub fn is_number_cell(cell: &str) -> bool {
    let trimmed = cell.trim_matches(|c| c == ' ' || c == '\t');
    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);

    digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_words() {
        let mut cursor = Cursor::new("Hello_World2 rest");

        assert_eq!(cursor.alnum(), "Hello_World2");
        cursor.skip_space();
        assert_eq!(cursor.rest(), "rest");
    }

    #[test]
    fn test_cursor_reset() {
        let mut cursor = Cursor::new("http://example.org/x] tail");
        let start = cursor.pos();

        assert_eq!(cursor.alnum(), "http");
        cursor.reset(start);
        assert_eq!(cursor.url(), "http://example.org/x");
        assert_eq!(cursor.peek(), Some(']'));
    }

    #[test]
    fn test_cursor_square_and_cell() {
        let mut cursor = Cursor::new("note text] after");
        assert_eq!(cursor.square(), "note text");

        let mut cursor = Cursor::new(" 12 | next |");
        assert_eq!(cursor.cell(), " 12 ");
    }

    #[test]
    fn test_cursor_multibyte() {
        let mut cursor = Cursor::new("Grüße!");
        assert_eq!(cursor.alnum(), "Grüße");
        assert_eq!(cursor.bump(), Some('!'));
        assert_eq!(cursor.bump(), None);
    }

    #[test]
    fn test_url_schemes() {
        assert!(is_url_scheme("mailto"));
        assert!(is_url_scheme("mms"));
        assert!(!is_url_scheme("HTTP"));
        assert!(!is_url_scheme("javascript"));
    }

    #[test]
    fn test_number_cells() {
        assert!(is_number_cell(" 42 "));
        assert!(is_number_cell("-1.234,50"));
        assert!(!is_number_cell(" 12 apples "));
        assert!(!is_number_cell(" - "));
        assert!(!is_number_cell(""));
    }
}
