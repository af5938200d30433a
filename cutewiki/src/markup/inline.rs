//! Inline markup inside one line: emphasis, links, footnotes, cells and
//! bracketed directives

use super::block::BlockState;
use super::context::RenderContext;
use super::directive::{self, Directive, DynamicList};
use super::scan::{has_cell, is_number_cell, is_url_scheme, Cursor};
use super::wikiword::is_wikiword;
use crate::output::Output;
use std::io;

/// Bold and italic switched on within the current line
#[derive(Debug, Default)]
struct Emphasis {
    bold: bool,
    italic: bool,
}

impl Emphasis {
    fn toggle_italic(&mut self, out: &mut dyn Output) -> io::Result<()> {
        if self.italic {
            out.italic_end()?;
        } else {
            out.italic_begin()?;
        }
        self.italic = !self.italic;
        Ok(())
    }

    fn toggle_bold(&mut self, out: &mut dyn Output) -> io::Result<()> {
        if self.bold {
            out.bold_end()?;
        } else {
            out.bold_begin()?;
        }
        self.bold = !self.bold;
        Ok(())
    }

    /// Emphasis never carries over to the next line
    fn close(&mut self, out: &mut dyn Output) -> io::Result<()> {
        if self.bold {
            out.bold_end()?;
        }
        if self.italic {
            out.italic_end()?;
        }
        *self = Self::default();
        Ok(())
    }
}

/// Writes the text of lines through a renderer
pub struct InlineWriter<'c, 'a> {
    ctx: &'c RenderContext<'a>,
}

impl<'c, 'a> InlineWriter<'c, 'a> {
    pub fn new(ctx: &'c RenderContext<'a>) -> Self {
        Self { ctx }
    }

    /// Write the text of one line in the given block context
    ///
    /// Lines inside an odd number of quote levels start italic. Heading
    /// and preformatted lines are written as they are.
    ///
    /// # Parameters
    /// * `text` - Line text left by the classifier
    /// * `state` - Block context of the line
    /// * `out` - The active renderer
    pub fn write_line(&self, text: &str, state: &BlockState, out: &mut dyn Output) -> io::Result<()> {
        self.write_text(text, state, out)
    }

    /// Cells come back through here; they hold no `|`, so this nests once
    fn write_text(&self, text: &str, state: &BlockState, out: &mut dyn Output) -> io::Result<()> {
        let mut emphasis = Emphasis::default();
        if state.quote % 2 == 1 {
            emphasis.toggle_italic(out)?;
        }

        if state.is_raw() {
            out.puts(text)?;
        } else {
            let mut cursor = Cursor::new(text);
            while let Some(ch) = cursor.peek() {
                match ch {
                    '\'' => self.quotes(&mut cursor, &mut emphasis, out)?,
                    '[' => self.square(&mut cursor, out)?,
                    '|' => self.pipe(&mut cursor, state, out)?,
                    c if c.is_alphabetic() => self.word(&mut cursor, out)?,
                    c => {
                        out.putc(c)?;
                        cursor.bump();
                    }
                }
            }
        }

        emphasis.close(out)
    }

    /// One `'` is an apostrophe; two switch italic, three bold, more both
    fn quotes(&self, cursor: &mut Cursor, emphasis: &mut Emphasis, out: &mut dyn Output) -> io::Result<()> {
        let run = cursor.take_while(|c| c == '\'').len();

        if run == 1 {
            return out.putc('\'');
        }
        if run != 3 {
            emphasis.toggle_italic(out)?;
        }
        if run != 2 {
            emphasis.toggle_bold(out)?;
        }
        Ok(())
    }

    /// A WikiWord, a bare URL or a plain word
    fn word(&self, cursor: &mut Cursor, out: &mut dyn Output) -> io::Result<()> {
        let start = cursor.pos();
        let word = cursor.alnum();

        if is_wikiword(word) {
            directive::link_page(word, self.ctx, out)
        } else if cursor.peek() == Some(':') && is_url_scheme(word) {
            cursor.reset(start);
            out.url(cursor.url())
        } else {
            out.puts(word)
        }
    }

    /// A cell separator inside tables, a plain `|` elsewhere
    fn pipe(&self, cursor: &mut Cursor, state: &BlockState, out: &mut dyn Output) -> io::Result<()> {
        cursor.bump();
        if !state.in_table() {
            return out.putc('|');
        }

        cursor.skip_space();
        if has_cell(cursor.rest()) {
            let cell = cursor.cell();
            let number = is_number_cell(cell);
            if number {
                out.table_number_begin()?;
            } else {
                out.table_cell_begin()?;
            }

            self.write_text(cell, state, out)?;

            if number {
                out.table_number_end()?;
            } else {
                out.table_cell_end()?;
            }
        }
        cursor.skip_space();
        Ok(())
    }

    /// A bracketed field; unknown ones are written as plain text
    fn square(&self, cursor: &mut Cursor, out: &mut dyn Output) -> io::Result<()> {
        let start = cursor.pos();
        cursor.bump();

        let done = match cursor.peek() {
            Some(c) if c.is_ascii_digit() => {
                cursor.take_while(|c| c.is_ascii_digit());
                cursor.skip_space();
                out.footnote(cursor.square())?;
                true
            }
            Some(c) if c.is_lowercase() => self.lower_field(cursor, out)?,
            Some(c) if c.is_uppercase() => match Directive::parse(cursor.square()) {
                Some(found) => {
                    directive::dispatch(found, self.ctx, out)?;
                    true
                }
                None => false,
            },
            _ => false,
        };

        if done {
            if cursor.peek() == Some(']') {
                cursor.bump();
            }
        } else {
            cursor.reset(start);
            cursor.bump();
            out.putc('[')?;
        }
        Ok(())
    }

    /// `[scheme:url text]`, `[word=argument]` or `[image]`
    fn lower_field(&self, cursor: &mut Cursor, out: &mut dyn Output) -> io::Result<bool> {
        let start = cursor.pos();
        let word = cursor.alnum();

        match cursor.peek() {
            Some(':') if is_url_scheme(word) => {
                cursor.reset(start);
                let url = cursor.url();
                cursor.skip_space();
                if cursor.peek() == Some(']') {
                    out.image_url(url)?;
                } else {
                    out.external_link(url, cursor.square())?;
                }
                Ok(true)
            }
            Some('=') => match DynamicList::parse(word) {
                Some(list) => {
                    cursor.bump();
                    directive::dynamic_list(list, cursor.square(), self.ctx, out)?;
                    Ok(true)
                }
                None => Ok(false),
            },
            Some(':') => Ok(false),
            _ if self.ctx.image_exists(word) => {
                out.image(word)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
