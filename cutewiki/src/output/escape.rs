//! Character escaping for HTML, RSS and RTF

/// Entity for a character that must not appear raw in HTML
fn xml_entity(ch: char) -> Option<&'static str> {
    match ch {
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '%' => Some("&#x25;"),
        _ => None,
    }
}

/// Escape text for HTML content and attribute values; carriage returns are dropped
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match (ch, xml_entity(ch)) {
            ('\r', _) => {}
            (_, Some(entity)) => out.push_str(entity),
            (ch, None) => out.push(ch),
        }
    }
    out
}

/// Escape text for RSS; like [`escape_xml`] but also encodes apostrophes
pub fn escape_rss(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match (ch, xml_entity(ch)) {
            ('\r', _) => {}
            ('\'', _) => out.push_str("&apos;"),
            (_, Some(entity)) => out.push_str(entity),
            (ch, None) => out.push(ch),
        }
    }
    out
}

/// Escape text for RTF
///
/// Tabs become blanks, line breaks are dropped and the control
/// characters `\`, `{` and `}` are quoted. Characters outside ASCII are
/// written as `\uN?` with N the signed UTF-16 code unit.
pub fn escape_rtf(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\t' => out.push(' '),
            '\r' | '\n' => {}
            '\\' | '{' | '}' => {
                out.push('\\');
                out.push(ch);
            }
            ch if ch.is_ascii() => out.push(ch),
            ch => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{}?", *unit as i16));
                }
            }
        }
    }
    out
}
