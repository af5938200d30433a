//! Rich text output, readable by word processors

use super::escape::escape_rtf;
use super::{Output, PageView};
use crate::store::PageType;
use std::io::{self, Write};

const RESET_PARAGRAPH: &str = "\\pard\\plain \\nowidctlpar\\adjustright \\fs20\\lang1031\\cgrid ";

const FONT_TABLE: &str = "{\\fonttbl{\\f0\\fswiss Arial;}{\\f1\\froman Times New Roman;}{\\f2\\fmodern Courier New;}{\\f3\\fnil\\fcharset2 Symbol;}}\n";

const COLOR_TABLE: &str = "{\\colortbl;\\red0\\green0\\blue0;\\red0\\green0\\blue255;\\red0\\green255\\blue255;\\red0\\green255\\blue0;\\red255\\green0\\blue255;\\red255\\green0\\blue0;\\red255\\green255\\blue0;\\red255\\green255\\blue255;\\red0\\green0\\blue128;\\red0\\green128\\blue128;\\red0\\green128\\blue0;\\red128\\green0\\blue128;\\red128\\green0\\blue0;\\red128\\green128\\blue0;\\red128\\green128\\blue128;\\red192\\green192\\blue192;\\red66\\green105\\blue115;\\red222\\green231\\blue239;}\n";

const STYLE_SHEET: &[&str] = &[
    "{\\stylesheet{\\widctlpar\\adjustright \\fs20\\lang1031\\cgrid \\snext0 Normal;}\n",
    "{\\s1\\sb240\\sa60\\keepn\\widctlpar\\brdrb\\brdrs\\brdrw10\\brsp20\\outlinelevel0\\shading1000\\cbpat8\\b\\f0\\fs32\\lang1031\\kerning32\\sbasedon0 \\snext0 heading 1;}",
    "{\\s2\\sb240\\sa60\\keepn\\widctlpar\\brdrb\\brdrs\\brdrw10\\brsp20\\outlinelevel0\\b\\f0\\fs28\\lang1031\\sbasedon0 \\snext0 heading 2;}",
    "{\\s3\\sb240\\sa60\\keepn\\widctlpar\\brdrb\\brdrs\\brdrw10\\brsp20\\outlinelevel0\\b\\f0\\fs24\\lang1031\\sbasedon0 \\snext0 heading 3;}",
    "{\\s4\\sb240\\sa60\\keepn\\widctlpar\\brdrb\\brdrs\\brdrw10\\brsp20\\outlinelevel0\\b\\f0\\fs20\\lang1031\\sbasedon0 \\snext0 heading 4;}",
    "{\\*\\cs10 \\additive Default Paragraph Font;}{\\*\\cs15 \\additive \\ul\\cf2 \\sbasedon10 Hyperlink;}",
    "{\\s16\\widctlpar\\adjustright \\fs20\\lang1031\\cgrid \\sbasedon0 \\snext16 footnote text;}",
    "{\\*\\cs17 \\additive \\super \\sbasedon10 footnote reference;}",
    "{\\s21\\widctlpar\\box\\brdrs\\brdrw10 \\adjustright \\shading500\\cbpat8\\f0\\fs20\\lang1031\\cgrid \\sbasedon0 \\snext21 Fixed;}}\n",
];

const ROW_BORDERS: &str = "\\trowd \\trgaph50\n\\trbrdrt\\brdrs\\brdrw10\n\\trbrdrl\\brdrs\\brdrw10\n\\trbrdrb\\brdrs\\brdrw10\n\\trbrdrr\\brdrs\\brdrw10\n\\trbrdrh\\brdrs\\brdrw10\n\\trbrdrv\\brdrs\\brdrw10\n";

const CELL_BORDERS: &str = "\\clvertalt\n\\clbrdrt\\brdrs\\brdrw10\n\\clbrdrl\\brdrs\\brdrw10\n\\clbrdrb\\brdrs\\brdrw10\n\\clbrdrr\\brdrs\\brdrw10\n";

/// Table width in twips
const TABLE_WIDTH: usize = 10110;

/// What the current paragraph is, for line ends and list restores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextMode {
    Normal,
    Paragraph,
    Preformatted,
    Quote,
    List,
    NumList,
}

pub struct RtfOutput<'w> {
    sink: &'w mut dyn Write,
    mode: TextMode,
    quote_depth: usize,
    /// Mode to restore when the list at each depth closes
    saved_modes: Vec<TextMode>,
    /// Item counter per list depth, index 0 unused
    numbers: Vec<u32>,
    table_header: bool,
    cells: usize,
}

impl<'w> RtfOutput<'w> {
    pub fn new(sink: &'w mut dyn Write) -> Self {
        Self {
            sink,
            mode: TextMode::Normal,
            quote_depth: 0,
            saved_modes: Vec::new(),
            numbers: vec![0],
            table_header: false,
            cells: 1,
        }
    }

    fn write(&mut self, markup: &str) -> io::Result<()> {
        self.sink.write_all(markup.as_bytes())
    }

    fn reset_paragraph(&mut self) -> io::Result<()> {
        self.write(RESET_PARAGRAPH)
    }

    fn depth(&self) -> usize {
        self.saved_modes.len()
    }

    fn number(&self, depth: usize) -> u32 {
        self.numbers.get(depth).copied().unwrap_or_default()
    }

    fn bullet_numbering(&mut self) -> io::Result<()> {
        writeln!(
            self.sink,
            "{{\\*\\pn\\pnlvlblt\\pnf3\\pnindent{}{{\\pntxtb\\'B7}}}}",
            self.depth() - 1
        )
    }

    fn decimal_numbering(&mut self) -> io::Result<()> {
        let depth = self.depth();
        writeln!(
            self.sink,
            "{{\\*\\pn\\pnlvl{}\\pnf1\\pnindent{}\\pnstart1\\pnqr\\pndec{{\\pntxta . }}}}",
            depth,
            depth - 1
        )
    }

    fn open_list(&mut self, mode: TextMode) -> io::Result<()> {
        self.saved_modes.push(self.mode);
        self.mode = mode;
        let depth = self.depth();
        if self.numbers.len() <= depth {
            self.numbers.resize(depth + 1, 0);
        }
        write!(self.sink, "\\pard\\fi-320\\li{}", depth * 320)?;
        match mode {
            TextMode::NumList => self.decimal_numbering(),
            _ => self.bullet_numbering(),
        }
    }

    fn close_list(&mut self) -> io::Result<()> {
        self.mode = self.saved_modes.pop().unwrap_or(TextMode::Normal);
        let depth = self.depth();
        write!(self.sink, "\\pard\\fi-320\\li{}", depth * 320)?;
        if depth == 0 {
            self.reset_paragraph()?;
            return self.write("\\par\n");
        }
        match self.mode {
            TextMode::List => self.bullet_numbering(),
            _ => self.decimal_numbering(),
        }
    }

    fn row_definition(&mut self, shading: &str) -> io::Result<()> {
        self.write(ROW_BORDERS)?;
        let cells = self.cells.max(1);
        for cell in 1..=cells {
            write!(
                self.sink,
                "{}{}\\cltxlrtb \\cellx{}",
                CELL_BORDERS,
                shading,
                TABLE_WIDTH * cell / cells
            )?;
        }
        Ok(())
    }

    fn hyperlink(&mut self, url: &str) -> io::Result<()> {
        write!(
            self.sink,
            "{{\\field\\fldedit{{\\*\\fldinst {{\\f0\\cgrid0 HYPERLINK \"{}\" \\\\*\\f0\\cgrid0 MERGEFORMAT }}}}}}",
            escape_rtf(url)
        )
    }
}

impl Output for RtfOutput<'_> {
    fn putc(&mut self, ch: char) -> io::Result<()> {
        let mut buf = [0u8; 4];
        self.write(&escape_rtf(ch.encode_utf8(&mut buf)))
    }

    fn puts(&mut self, text: &str) -> io::Result<()> {
        self.write(&escape_rtf(text))
    }

    fn page_header(&mut self, page: &PageView) -> io::Result<()> {
        self.mode = TextMode::Normal;
        self.quote_depth = 0;
        self.saved_modes.clear();
        self.numbers = vec![0];
        self.table_header = false;

        let title = escape_rtf(&page.title);
        self.write("{\\rtf\\ansi\\deff0\n")?;
        self.write(FONT_TABLE)?;
        write!(
            self.sink,
            "{{\\info{{\\title {title}}}{{\\subject {title}}}{{\\author {}}}{{\\keywords {title}}}{{\\operator CuteWiki}}{{\\version1}}}}\n",
            escape_rtf(&page.owner_name),
            title = title
        )?;
        self.write(COLOR_TABLE)?;
        for style in STYLE_SHEET {
            self.write(style)?;
        }
        self.write("\\margl900\\margr900\\margt1100\\margb1100\n\\paperw11906\\paperh16838\n")?;
        self.write("\\sectd\\pard\\plain\\fs20\n")?;
        write!(
            self.sink,
            "{{\\header \\pard\\plain \\qr\\sl240\\slmult0\\nowidctlpar\\adjustright \\f1\\fs20\\lang1031\\cgrid{{\\cgrid0 {}, }}{{\\field{{\\*\\fldinst{{\\cgrid0  DATE \\\\@ \"dd.MM.yy\" }}}}{{\\fldrslt }}}}{{\\cgrid0 \\par }}}}\n",
            title
        )?;
        self.write("{\\footer\\f0\\fs20\\qc Page\n{\\field{\\*\\fldinst { PAGE }}{\\fldrslt 1}}/\n")?;
        self.write("{\\field{\\*\\fldinst { NUMPAGES }}{\\fldrslt 1}}\n{\\par }\n}\n")?;

        self.heading_begin(0)?;
        writeln!(self.sink, "{}", title)?;
        self.heading_end(0)
    }

    fn page_footer(&mut self, _page: &PageView) -> io::Result<()> {
        self.write("}\n")
    }

    fn para_begin(&mut self) -> io::Result<()> {
        self.reset_paragraph()?;
        self.mode = TextMode::Paragraph;
        Ok(())
    }

    fn para_end(&mut self) -> io::Result<()> {
        self.mode = TextMode::Normal;
        self.write("\\par\n\\par\n")
    }

    fn pre_begin(&mut self) -> io::Result<()> {
        self.reset_paragraph()?;
        self.write("\\s21\\widctlpar\\box\\brdrs\\brdrw10 \\adjustright\n")?;
        self.write("\\shading500\\cbpat8 \\f2\\fs20\\lang1031\\cgrid ")?;
        self.mode = TextMode::Preformatted;
        Ok(())
    }

    fn pre_end(&mut self) -> io::Result<()> {
        self.reset_paragraph()?;
        self.mode = TextMode::Normal;
        self.write("\\par\n")
    }

    fn blockquote_begin(&mut self) -> io::Result<()> {
        self.quote_depth += 1;
        self.reset_paragraph()?;
        write!(self.sink, "\\fi{} \\i ", self.quote_depth * 100)?;
        self.mode = TextMode::Quote;
        Ok(())
    }

    fn blockquote_end(&mut self) -> io::Result<()> {
        self.quote_depth = self.quote_depth.saturating_sub(1);
        self.mode = TextMode::Normal;
        self.write("\\par\n")
    }

    fn ruler_begin(&mut self) -> io::Result<()> {
        self.reset_paragraph()
    }

    fn ruler_end(&mut self) -> io::Result<()> {
        self.write("\\nowidctlpar\\brdrt\\brdrs\\brdrw10\\brsp20 \\adjustright\n\\par\n")?;
        self.reset_paragraph()
    }

    fn list_begin(&mut self) -> io::Result<()> {
        self.open_list(TextMode::List)
    }

    fn list_end(&mut self) -> io::Result<()> {
        self.close_list()
    }

    fn num_list_begin(&mut self) -> io::Result<()> {
        self.open_list(TextMode::NumList)
    }

    fn num_list_end(&mut self) -> io::Result<()> {
        let depth = self.depth();
        if let Some(number) = self.numbers.get_mut(depth) {
            *number = 0;
        }
        self.close_list()
    }

    fn list_item_begin(&mut self) -> io::Result<()> {
        if self.mode == TextMode::List {
            return self.write("{\\pntext\\f3\\bullet\\tab}");
        }
        let depth = self.depth();
        if let Some(number) = self.numbers.get_mut(depth) {
            *number += 1;
        }
        write!(self.sink, "{{\\pntext\\f1 {}. \\tab}}", self.number(depth))
    }

    fn list_item_end(&mut self) -> io::Result<()> {
        self.write("\\par\n")
    }

    fn line_begin(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn line_end(&mut self) -> io::Result<()> {
        match self.mode {
            TextMode::Paragraph | TextMode::Quote => self.write(" "),
            TextMode::Preformatted => self.write("\\par\n"),
            TextMode::Normal | TextMode::List | TextMode::NumList => Ok(()),
        }
    }

    fn heading_begin(&mut self, level: u8) -> io::Result<()> {
        self.reset_paragraph()?;
        self.write("\\pard\\keepn\\sb240\\sa60\\f0")?;
        self.write("\\brdrb\\brdrs\\brdrw10\\brsp20\\outlinelevel0")?;
        self.write(match level {
            0 => "\\shading1000\\cbpat8\\s1\\fs32\\kerning32\\b ",
            1 => "\\s2\\fs28\\b ",
            2 => "\\s3\\fs24\\b ",
            _ => "\\s4\\fs20\\b ",
        })
    }

    fn heading_end(&mut self, _level: u8) -> io::Result<()> {
        self.write("\\par\n")?;
        self.reset_paragraph()
    }

    fn footnote(&mut self, note: &str) -> io::Result<()> {
        self.write("{\\cs17\\f1\\super\\cgrid0 \\chftn ")?;
        self.write("{\\footnote \\pard\\plain \\s16\\widctlpar\\adjustright ")?;
        write!(
            self.sink,
            "\\fs20\\lang1031\\cgrid {{\\cs17\\super \\chftn }}{{ {}}}}}}}",
            escape_rtf(note)
        )
    }

    fn bold_begin(&mut self) -> io::Result<()> {
        self.write("{\\b ")
    }

    fn bold_end(&mut self) -> io::Result<()> {
        self.write("}")
    }

    fn italic_begin(&mut self) -> io::Result<()> {
        self.write("{\\i ")
    }

    fn italic_end(&mut self) -> io::Result<()> {
        self.write("}")
    }

    fn internal_link(&mut self, _name: &str, title: &str, _page_type: PageType) -> io::Result<()> {
        self.puts(title)
    }

    fn broken_link(&mut self, name: &str) -> io::Result<()> {
        self.puts(name)
    }

    fn table_begin(&mut self, cells: usize) -> io::Result<()> {
        self.cells = cells.max(1);
        self.reset_paragraph()
    }

    fn table_end(&mut self) -> io::Result<()> {
        self.write("\\pard \\widctlpar\\adjustright\n\\par\n")
    }

    fn table_head_begin(&mut self) -> io::Result<()> {
        self.row_definition("\\clcbpat16")?;
        self.table_header = true;
        self.write("\n\\pard \\widctlpar\\intbl\\adjustright{\n")
    }

    fn table_head_end(&mut self) -> io::Result<()> {
        self.table_header = false;
        self.write("\n}\\pard \\widctlpar\\intbl\\adjustright\\row\n")
    }

    fn table_row_begin(&mut self) -> io::Result<()> {
        self.row_definition("")?;
        self.write("\n\\pard \\widctlpar\\intbl\\adjustright {\n")
    }

    fn table_row_end(&mut self) -> io::Result<()> {
        self.write("\n}\\pard \\widctlpar\\intbl\\adjustright \\row\n")
    }

    fn table_cell_begin(&mut self) -> io::Result<()> {
        self.write("\\pard \\widctlpar\\intbl\\adjustright{")?;
        if self.table_header {
            self.write("\\b ")?;
        }
        Ok(())
    }

    fn table_cell_end(&mut self) -> io::Result<()> {
        self.write("\\cell }")
    }

    fn table_number_begin(&mut self) -> io::Result<()> {
        self.write("\\pard \\qr\\widctlpar\\intbl\\adjustright{\\cf2 ")
    }

    fn table_number_end(&mut self) -> io::Result<()> {
        self.write("\\cell }")
    }

    fn image(&mut self, _name: &str) -> io::Result<()> {
        Ok(())
    }

    fn url(&mut self, url: &str) -> io::Result<()> {
        match url.strip_prefix("mailto:") {
            Some(address) => self.external_link(url, address),
            None => self.hyperlink(url),
        }
    }

    fn image_url(&mut self, url: &str) -> io::Result<()> {
        self.hyperlink(url)
    }

    fn external_link(&mut self, url: &str, text: &str) -> io::Result<()> {
        write!(
            self.sink,
            "{{\\field\\fldedit{{\\*\\fldinst {{\\f0\\cgrid0 HYPERLINK \"{}\"}}}}{{\\fldrslt {{\\ul\\cf2 {}}}}}}}",
            escape_rtf(url),
            escape_rtf(text)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::record::sample_view;
    use crate::output::RenderMode;

    fn render(body: impl FnOnce(&mut RtfOutput) -> io::Result<()>) -> String {
        let mut buffer = Vec::new();
        {
            let mut out = RtfOutput::new(&mut buffer);
            body(&mut out).unwrap();
        }
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_document_frame() {
        let view = sample_view("StartPage", RenderMode::Rtf);
        let rtf = render(|out| {
            out.page_header(&view)?;
            out.page_footer(&view)
        });

        assert!(rtf.starts_with("{\\rtf\\ansi\\deff0\n{\\fonttbl"));
        assert!(rtf.contains("{\\info{\\title Start Page}{\\subject Start Page}{\\author Wiki Admin}"));
        assert!(rtf.contains("\\shading1000\\cbpat8\\s1\\fs32\\kerning32\\b Start Page\n\\par\n"));
        assert!(rtf.ends_with("}\n"));
    }

    #[test]
    fn test_text_is_escaped() {
        let rtf = render(|out| out.puts("a\\b {c}\tdé"));

        assert_eq!(rtf, "a\\\\b \\{c\\} d\\u233?");
    }

    #[test]
    fn test_numbered_items_count_per_level() {
        let rtf = render(|out| {
            out.num_list_begin()?;
            for _ in 0..3 {
                out.list_item_begin()?;
                out.list_item_end()?;
            }
            out.list_begin()?;
            out.list_item_begin()?;
            out.list_item_end()?;
            out.list_end()?;
            out.list_item_begin()?;
            out.num_list_end()
        });

        assert!(rtf.contains("{\\pntext\\f1 1. \\tab}"));
        assert!(rtf.contains("{\\pntext\\f1 2. \\tab}"));
        assert!(rtf.contains("{\\pntext\\f1 3. \\tab}"));
        assert!(rtf.contains("{\\pntext\\f3\\bullet\\tab}"));
        assert!(rtf.contains("{\\pntext\\f1 4. \\tab}"));
        assert!(rtf.ends_with(&format!("\\pard\\fi-320\\li0{}\\par\n", RESET_PARAGRAPH)));
    }

    #[test]
    fn test_numbering_restarts_after_list_end() {
        let rtf = render(|out| {
            out.num_list_begin()?;
            out.list_item_begin()?;
            out.num_list_end()?;
            out.num_list_begin()?;
            out.list_item_begin()?;
            out.num_list_end()
        });

        assert_eq!(rtf.matches("{\\pntext\\f1 1. \\tab}").count(), 2);
    }

    #[test]
    fn test_table_cells_and_header() {
        let rtf = render(|out| {
            out.table_begin(2)?;
            out.table_head_begin()?;
            out.table_cell_begin()?;
            out.puts("Name")?;
            out.table_cell_end()?;
            out.table_head_end()?;
            out.table_end()
        });

        assert!(rtf.contains("\\clcbpat16\\cltxlrtb \\cellx5055"));
        assert!(rtf.contains("\\cellx10110"));
        assert!(rtf.contains("\\pard \\widctlpar\\intbl\\adjustright{\\b Name\\cell }"));
    }

    #[test]
    fn test_links() {
        let rtf = render(|out| {
            out.url("mailto:me@example.org")?;
            out.internal_link("StartPage", "Start Page", PageType::Normal)
        });

        assert!(rtf.contains("HYPERLINK \"mailto:me@example.org\"}}{\\fldrslt {\\ul\\cf2 me@example.org}}}"));
        assert!(rtf.ends_with("Start Page"));
    }
}
