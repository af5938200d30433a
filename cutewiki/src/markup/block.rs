//! Line classification and block context transitions
//!
//! Each source line is classified on its own ([`classify`]), turned into
//! the block context it needs ([`BlockState::for_line`]) and then
//! reached from the current context by [`transition`], which returns the
//! close and open events in the order the renderers expect:
//! ruler, table, heading, quotes, preformatted, paragraph, lists are
//! closed; lists, paragraph, preformatted, quotes, heading, table, ruler
//! are opened.

use serde::{Deserialize, Serialize};

/// What an empty source line does to open blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlankLines {
    /// Close headings and rulers only; keep paragraphs, lists, quotes and tables open
    #[default]
    Preserve,
    /// Close every open block
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    Ordered,
}

/// Kind of the table row being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableRow {
    #[default]
    None,
    Body,
    Head,
}

/// The open block context between two lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockState {
    /// Open lists, outermost first
    pub lists: Vec<ListKind>,
    pub quote: usize,
    pub pre: bool,
    pub para: bool,
    /// Heading level, 0 outside headings
    pub heading: u8,
    pub table: TableRow,
    /// Cells counted on the row that opened the table
    pub cells: usize,
    pub ruler: bool,
}

/// Structural class of one source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    Comment,
    Blank,
    Paragraph,
    Preformatted,
    List { depth: usize, kind: ListKind },
    Heading(u8),
    Table { head: bool, cells: usize },
    Quote(usize),
    Ruler,
}

/// A classified line and the text left for the inline scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified<'a> {
    pub class: LineClass,
    pub text: &'a str,
}

/// Lists are recognised up to this many leading spaces
const MAX_LIST_DEPTH: usize = 3;

/// Classify one line
///
/// # Parameters
/// * `line` - The line without its terminator
/// * `previous` - Context left by the previous line, used to keep
///   indented lines inside a preformatted block
///
/// # Returns
/// * `Classified` - The class and the remaining text of the line
pub fn classify<'a>(line: &'a str, previous: &BlockState) -> Classified<'a> {
    let classified = |class, text| Classified { class, text };

    match line.chars().next() {
        None => classified(LineClass::Blank, ""),
        Some('#') => classified(LineClass::Comment, ""),
        Some(' ') => {
            let spaces = line.len() - line.trim_start_matches(' ').len();
            let rest = &line[spaces..];

            if spaces <= MAX_LIST_DEPTH && !previous.pre {
                if let Some(text) = rest.strip_prefix("* ") {
                    return classified(
                        LineClass::List {
                            depth: spaces,
                            kind: ListKind::Unordered,
                        },
                        text,
                    );
                }
                if let Some(text) = ordered_marker(rest) {
                    return classified(
                        LineClass::List {
                            depth: spaces,
                            kind: ListKind::Ordered,
                        },
                        text,
                    );
                }
            }

            classified(LineClass::Preformatted, &line[1..])
        }
        Some('=') => {
            let run = line.len() - line.trim_start_matches('=').len();
            let text = line[run..].trim_start_matches([' ', '\t']);
            let level = match run {
                1 => 3,
                2 => 2,
                _ => 1,
            };
            classified(LineClass::Heading(level), text)
        }
        Some('|') => {
            let head = line[1..].starts_with('|');
            let text = if head { &line[1..] } else { line };
            let cells = text[1..].matches('|').count();
            classified(LineClass::Table { head, cells }, text)
        }
        Some('>') => {
            let mut depth = 0;
            let mut rest = line;
            while let Some(after) = rest.strip_prefix('>') {
                depth += 1;
                rest = after.trim_start_matches([' ', '\t']);
            }
            classified(LineClass::Quote(depth), rest)
        }
        Some('-') if line.len() >= 4 && line.chars().all(|c| c == '-') => {
            classified(LineClass::Ruler, "")
        }
        Some(_) => classified(LineClass::Paragraph, line),
    }
}

/// Text after a `<digits>. ` marker
fn ordered_marker(rest: &str) -> Option<&str> {
    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    rest[digits..].strip_prefix(". ")
}

impl BlockState {
    /// The context a line of the given class needs
    ///
    /// # Parameters
    /// * `class` - Class of the next line
    /// * `current` - The context left by the previous line
    /// * `blank_lines` - What empty lines do to open blocks
    pub fn for_line(class: &LineClass, current: &BlockState, blank_lines: BlankLines) -> BlockState {
        match class {
            LineClass::Comment => current.clone(),
            LineClass::Blank => match blank_lines {
                BlankLines::Preserve => BlockState {
                    heading: 0,
                    ruler: false,
                    ..current.clone()
                },
                BlankLines::Reset => BlockState::default(),
            },
            LineClass::Paragraph => BlockState {
                para: true,
                ..Default::default()
            },
            LineClass::Preformatted => BlockState {
                pre: true,
                ..Default::default()
            },
            LineClass::List { depth, kind } => {
                let depth = (*depth).max(1);
                let mut lists: Vec<ListKind> =
                    current.lists.iter().copied().take(depth - 1).collect();
                lists.resize(depth - 1, *kind);
                lists.push(*kind);
                BlockState {
                    lists,
                    ..Default::default()
                }
            }
            LineClass::Heading(level) => BlockState {
                heading: *level,
                ..Default::default()
            },
            LineClass::Table { head, cells } => BlockState {
                table: if *head { TableRow::Head } else { TableRow::Body },
                cells: *cells,
                ..Default::default()
            },
            LineClass::Quote(depth) => BlockState {
                quote: *depth,
                ..Default::default()
            },
            LineClass::Ruler => BlockState {
                ruler: true,
                ..Default::default()
            },
        }
    }

    pub fn in_list(&self) -> bool {
        !self.lists.is_empty()
    }

    pub fn in_table(&self) -> bool {
        self.table != TableRow::None
    }

    /// Heading and preformatted lines bypass inline markup
    pub fn is_raw(&self) -> bool {
        self.heading > 0 || self.pre
    }
}

/// One begin or end call produced by a context change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockEvent {
    RulerEnd,
    TableEnd,
    HeadingEnd(u8),
    QuoteEnd,
    PreEnd,
    ParaEnd,
    ListEnd(ListKind),
    ListBegin(ListKind),
    ParaBegin,
    PreBegin,
    QuoteBegin,
    HeadingBegin(u8),
    TableBegin(usize),
    RulerBegin,
}

/// Move from one block context to another
///
/// Headings and rulers cover a single line, so an open heading or ruler
/// is always closed. An open table keeps its row kind; only the row
/// that opens a table can be a header row.
///
/// # Parameters
/// * `old` - The context of the previous line
/// * `target` - The context the next line needs
///
/// # Returns
/// * `(Vec<BlockEvent>, BlockState)` - Events to emit and the new context
pub fn transition(old: &BlockState, target: &BlockState) -> (Vec<BlockEvent>, BlockState) {
    let mut events = Vec::new();

    // Lists are kept while their kinds agree
    let common = old
        .lists
        .iter()
        .zip(&target.lists)
        .take_while(|(a, b)| a == b)
        .count();

    // Close
    if old.ruler {
        events.push(BlockEvent::RulerEnd);
    }
    let keep_table = old.in_table() && target.in_table();
    if old.in_table() && !keep_table {
        events.push(BlockEvent::TableEnd);
    }
    if old.heading > 0 {
        events.push(BlockEvent::HeadingEnd(old.heading));
    }
    for _ in target.quote..old.quote {
        events.push(BlockEvent::QuoteEnd);
    }
    if old.pre && !target.pre {
        events.push(BlockEvent::PreEnd);
    }
    if old.para && !target.para {
        events.push(BlockEvent::ParaEnd);
    }
    for kind in old.lists[common..].iter().rev() {
        events.push(BlockEvent::ListEnd(*kind));
    }

    // Open
    for kind in &target.lists[common..] {
        events.push(BlockEvent::ListBegin(*kind));
    }
    if target.para && !old.para {
        events.push(BlockEvent::ParaBegin);
    }
    if target.pre && !old.pre {
        events.push(BlockEvent::PreBegin);
    }
    for _ in old.quote..target.quote {
        events.push(BlockEvent::QuoteBegin);
    }
    if target.heading > 0 {
        events.push(BlockEvent::HeadingBegin(target.heading));
    }
    if target.in_table() && !keep_table {
        events.push(BlockEvent::TableBegin(target.cells));
    }
    if target.ruler {
        events.push(BlockEvent::RulerBegin);
    }

    let mut next = target.clone();
    if keep_table {
        next.table = old.table;
        next.cells = old.cells;
    }

    (events, next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ListKind::{Ordered, Unordered};

    fn walk(lines: &[&str], blank_lines: BlankLines) -> Vec<BlockEvent> {
        let mut state = BlockState::default();
        let mut events = Vec::new();
        for line in lines {
            let classified = classify(line, &state);
            if classified.class == LineClass::Comment {
                continue;
            }
            let target = BlockState::for_line(&classified.class, &state, blank_lines);
            let (mut step, next) = transition(&state, &target);
            events.append(&mut step);
            state = next;
            if state.table == TableRow::Head {
                state.table = TableRow::Body;
            }
        }
        let (mut step, _) = transition(&state, &BlockState::default());
        events.append(&mut step);
        events
    }

    #[test]
    fn test_classify_lists() {
        let state = BlockState::default();

        assert_eq!(
            classify(" * item", &state),
            Classified {
                class: LineClass::List { depth: 1, kind: Unordered },
                text: "item"
            }
        );
        assert_eq!(
            classify("  12. item", &state).class,
            LineClass::List { depth: 2, kind: Ordered }
        );
        assert_eq!(classify("    * code", &state).class, LineClass::Preformatted);
    }

    #[test]
    fn test_classify_list_marker_inside_pre_is_code() {
        let state = BlockState {
            pre: true,
            ..Default::default()
        };
        let classified = classify("  * not a list", &state);

        assert_eq!(classified.class, LineClass::Preformatted);
        assert_eq!(classified.text, " * not a list");
    }

    #[test]
    fn test_classify_heading_levels() {
        let state = BlockState::default();

        assert_eq!(classify("= Small", &state), Classified { class: LineClass::Heading(3), text: "Small" });
        assert_eq!(classify("==Big==", &state).class, LineClass::Heading(2));
        assert_eq!(classify("=== Huge", &state).class, LineClass::Heading(1));
        assert_eq!(classify("===== Huge", &state).class, LineClass::Heading(1));
    }

    #[test]
    fn test_classify_tables() {
        let state = BlockState::default();

        assert_eq!(
            classify("|| Name | Value |", &state),
            Classified {
                class: LineClass::Table { head: true, cells: 2 },
                text: "| Name | Value |"
            }
        );
        assert_eq!(
            classify("| a | b | c |", &state).class,
            LineClass::Table { head: false, cells: 3 }
        );
    }

    #[test]
    fn test_classify_quotes_rulers_and_rest() {
        let state = BlockState::default();

        assert_eq!(classify("> > deep", &state), Classified { class: LineClass::Quote(2), text: "deep" });
        assert_eq!(classify("------", &state).class, LineClass::Ruler);
        assert_eq!(classify("---", &state).class, LineClass::Paragraph);
        assert_eq!(classify("-- dash", &state).class, LineClass::Paragraph);
        assert_eq!(classify("# note", &state).class, LineClass::Comment);
        assert_eq!(classify("", &state).class, LineClass::Blank);
    }

    #[test]
    fn test_transition_to_same_state_is_silent() {
        let state = BlockState {
            lists: vec![Unordered],
            quote: 1,
            ..Default::default()
        };
        let (events, next) = transition(&state, &state);

        assert!(events.is_empty());
        assert_eq!(next, state);
    }

    #[test]
    fn test_close_and_open_order() {
        let old = BlockState {
            lists: vec![Unordered],
            quote: 1,
            heading: 0,
            ..Default::default()
        };
        let target = BlockState {
            table: TableRow::Body,
            cells: 2,
            ..Default::default()
        };
        let (events, _) = transition(&old, &target);

        assert_eq!(
            events,
            vec![
                BlockEvent::QuoteEnd,
                BlockEvent::ListEnd(Unordered),
                BlockEvent::TableBegin(2)
            ]
        );
    }

    #[test]
    fn test_paragraph_survives_blank_line_when_preserving() {
        let events = walk(&["a", "", "b"], BlankLines::Preserve);
        assert_eq!(events, vec![BlockEvent::ParaBegin, BlockEvent::ParaEnd]);
    }

    #[test]
    fn test_blank_line_splits_paragraphs_when_resetting() {
        let events = walk(&["a", "", "b"], BlankLines::Reset);
        assert_eq!(
            events,
            vec![
                BlockEvent::ParaBegin,
                BlockEvent::ParaEnd,
                BlockEvent::ParaBegin,
                BlockEvent::ParaEnd
            ]
        );
    }

    #[test]
    fn test_consecutive_headings_reopen() {
        let events = walk(&["=A", "=B"], BlankLines::Preserve);
        assert_eq!(
            events,
            vec![
                BlockEvent::HeadingBegin(3),
                BlockEvent::HeadingEnd(3),
                BlockEvent::HeadingBegin(3),
                BlockEvent::HeadingEnd(3)
            ]
        );
    }

    #[test]
    fn test_list_kind_switch_reopens() {
        let events = walk(&[" * a", " 1. b"], BlankLines::Preserve);
        assert_eq!(
            events,
            vec![
                BlockEvent::ListBegin(Unordered),
                BlockEvent::ListEnd(Unordered),
                BlockEvent::ListBegin(Ordered),
                BlockEvent::ListEnd(Ordered)
            ]
        );
    }

    #[test]
    fn test_nested_lists_keep_outer_kind() {
        let events = walk(&[" 1. a", "  * b", " 2. c"], BlankLines::Preserve);
        assert_eq!(
            events,
            vec![
                BlockEvent::ListBegin(Ordered),
                BlockEvent::ListBegin(Unordered),
                BlockEvent::ListEnd(Unordered),
                BlockEvent::ListEnd(Ordered)
            ]
        );
    }

    #[test]
    fn test_header_row_only_opens_table() {
        let mut state = BlockState::default();
        let first = classify("|| H |", &state);
        let target = BlockState::for_line(&first.class, &state, BlankLines::Preserve);
        let (_, next) = transition(&state, &target);
        assert_eq!(next.table, TableRow::Head);

        state = BlockState {
            table: TableRow::Body,
            ..next
        };
        let second = classify("|| again |", &state);
        let target = BlockState::for_line(&second.class, &state, BlankLines::Preserve);
        let (events, next) = transition(&state, &target);

        assert!(events.is_empty());
        assert_eq!(next.table, TableRow::Body);
    }

    #[test]
    fn test_comment_changes_nothing() {
        let events = walk(&["=A", "# hidden"], BlankLines::Preserve);
        assert_eq!(events, vec![BlockEvent::HeadingBegin(3), BlockEvent::HeadingEnd(3)]);
    }

    #[test]
    fn test_balanced_events() {
        let lines = [" * a", "  1. b", "> q", ">> qq", "|| h |", "| 1 |", "    code", "----", "text"];
        let events = walk(&lines, BlankLines::Preserve);

        let count = |wanted: fn(&BlockEvent) -> bool| events.iter().filter(|e| wanted(e)).count();
        assert_eq!(
            count(|e| matches!(e, BlockEvent::ListBegin(_))),
            count(|e| matches!(e, BlockEvent::ListEnd(_)))
        );
        assert_eq!(
            count(|e| matches!(e, BlockEvent::QuoteBegin)),
            count(|e| matches!(e, BlockEvent::QuoteEnd))
        );
        assert_eq!(
            count(|e| matches!(e, BlockEvent::TableBegin(_))),
            count(|e| matches!(e, BlockEvent::TableEnd))
        );
        assert_eq!(
            count(|e| matches!(e, BlockEvent::PreBegin)),
            count(|e| matches!(e, BlockEvent::PreEnd))
        );
    }
}
