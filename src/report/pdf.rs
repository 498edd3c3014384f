use crate::errors::{AppError, AppResult};
use crate::report::document::{Document, DocumentElement};
use crate::report::layout::{
    CELL_PADDING, FONT_SIZE, LEADING, PageGeometry, ROW_PADDING, RenderedTable,
};
use crate::report::metrics::text_width;
use crate::report::wrap::wrap_cell;
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};

/// Rendering switches that do not affect the layout plan.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Repeat the first row at the top of every continuation page.
    pub repeat_header: bool,
}

/// Finished PDF bytes.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

/// Render a document into PDF bytes.
pub fn render(doc: &Document, geometry: &PageGeometry, opts: &RenderOptions) -> AppResult<RenderedPdf> {
    if geometry.usable_width() <= 0.0 || geometry.usable_height() <= 0.0 {
        return Err(AppError::Render(format!(
            "margins leave no room on a {}x{} page",
            geometry.width, geometry.height
        )));
    }

    let mut pdf = PdfManager::new(*geometry);
    for element in doc.elements() {
        match element {
            DocumentElement::Table(table) => pdf.write_table(table, opts.repeat_header),
            DocumentElement::PageBreak => pdf.page_break(),
        }
    }

    Ok(pdf.finish())
}

/// A row after wrapping: lines per cell and the resulting height.
struct LaidOutRow {
    cells: Vec<Vec<String>>,
    height: f32,
}

fn lay_out_row(row: &[String], widths: &[f32]) -> LaidOutRow {
    let cells: Vec<Vec<String>> = row
        .iter()
        .zip(widths)
        .map(|(text, w)| wrap_cell(text, (w - CELL_PADDING).max(1.0), FONT_SIZE))
        .collect();

    LaidOutRow::new(cells)
}

impl LaidOutRow {
    fn new(cells: Vec<Vec<String>>) -> Self {
        let lines = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);
        Self {
            cells,
            height: lines as f32 * LEADING + 2.0 * ROW_PADDING,
        }
    }

    /// Keep the first `lines` lines of every cell, return the remainder.
    fn split_off(&mut self, lines: usize) -> LaidOutRow {
        let rest = self
            .cells
            .iter_mut()
            .map(|c| if c.len() > lines { c.split_off(lines) } else { Vec::new() })
            .collect();
        *self = LaidOutRow::new(std::mem::take(&mut self.cells));
        LaidOutRow::new(rest)
    }
}

struct PdfManager {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    page_refs: Vec<Ref>,
    geometry: PageGeometry,

    next_id: i32,
    font_id: Ref,

    // page being drawn: content stream, its object id, and the top of free space
    current: Option<(Content, Ref)>,
    cursor: f32,
}

impl PdfManager {
    fn new(geometry: PageGeometry) -> Self {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_id = Ref::new(3);

        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        Self {
            pdf,
            catalog_id,
            pages_id,
            page_refs: Vec::new(),
            geometry,
            next_id: 4,
            font_id,
            current: None,
            cursor: 0.0,
        }
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    fn top(&self) -> f32 {
        self.geometry.height - self.geometry.margin_top
    }

    fn open_page(&mut self) {
        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();

        self.page_refs.push(page_id);

        let mut page = self.pdf.page(page_id);
        page.parent(self.pages_id)
            .media_box(Rect::new(0.0, 0.0, self.geometry.width, self.geometry.height))
            .contents(content_id);
        page.resources().fonts().pair(Name(b"F1"), self.font_id);
        drop(page);

        self.current = Some((Content::new(), content_id));
        self.cursor = self.top();
    }

    fn close_page(&mut self) {
        if let Some((content, id)) = self.current.take() {
            self.pdf.stream(id, &content.finish());
        }
    }

    /// Next table starts on a fresh page.
    fn page_break(&mut self) {
        self.close_page();
    }

    fn write_table(&mut self, table: &RenderedTable, repeat_header: bool) {
        if self.current.is_none() {
            self.open_page();
        }

        let widths = table.widths.widths();
        let x_start =
            self.geometry.margin_left + (self.geometry.usable_width() - table.widths.total()) / 2.0;

        let header = match (repeat_header, table.grid.first()) {
            (true, Some(first)) if table.grid.len() > 1 => Some(lay_out_row(first, widths))
                .filter(|h| h.height < self.geometry.usable_height() / 2.0),
            _ => None,
        };

        for (i, row) in table.grid.iter().enumerate() {
            let mut pending = Some(lay_out_row(row, widths));

            while let Some(mut laid) = pending.take() {
                let page_has_rows = self.cursor < self.top();
                if page_has_rows && self.cursor - laid.height < self.geometry.margin_bottom {
                    self.close_page();
                    self.open_page();
                    if let Some(h) = header.as_ref().filter(|_| i > 0) {
                        self.draw_row(h, widths, x_start);
                    }
                }

                // a row taller than the page continues on the next one
                let room = self.cursor - self.geometry.margin_bottom;
                if laid.height > room {
                    let fit = ((room - 2.0 * ROW_PADDING) / LEADING).floor().max(1.0) as usize;
                    pending = Some(laid.split_off(fit));
                    self.draw_row(&laid, widths, x_start);
                    self.cursor = self.geometry.margin_bottom;
                } else {
                    self.draw_row(&laid, widths, x_start);
                }
            }
        }
    }

    fn draw_row(&mut self, row: &LaidOutRow, widths: &[f32], x_start: f32) {
        let y_top = self.cursor;
        let y_bottom = y_top - row.height;
        let Some((content, _)) = self.current.as_mut() else {
            return;
        };

        let mut x = x_start;
        for (lines, w) in row.cells.iter().zip(widths) {
            draw_cell_borders(content, x, y_bottom, *w, row.height);

            // vertical centering of the text block inside the row
            let block = lines.len() as f32 * LEADING;
            let mut line_top = y_top - (row.height - block) / 2.0;
            for line in lines {
                let baseline = line_top - (LEADING + 0.72 * FONT_SIZE) / 2.0;
                let tx = x + (w - text_width(line, FONT_SIZE)) / 2.0;
                draw_text(content, tx, baseline, FONT_SIZE, line);
                line_top -= LEADING;
            }

            x += w;
        }

        self.cursor = y_bottom;
    }

    fn finish(mut self) -> RenderedPdf {
        self.close_page();

        // a document always has at least one page
        if self.page_refs.is_empty() {
            self.open_page();
            self.close_page();
        }

        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        let pages = self.page_refs.len();
        self.pdf
            .pages(self.pages_id)
            .count(pages as i32)
            .kids(self.page_refs.iter().copied());

        RenderedPdf {
            bytes: self.pdf.finish(),
            pages,
        }
    }
}

fn draw_text(content: &mut Content, x: f32, y: f32, size: f32, text: &str) {
    let encoded = win_ansi(text);
    content.begin_text();
    content.set_font(Name(b"F1"), size);
    content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
    content.show(Str(&encoded));
    content.end_text();
}

fn draw_cell_borders(content: &mut Content, x: f32, y: f32, w: f32, h: f32) {
    content.save_state();
    content.set_line_width(1.0);
    content.set_stroke_gray(0.0);
    content.rect(x, y, w, h);
    content.stroke();
    content.restore_state();
}

/// Encode text for the WinAnsi Helvetica font; unmappable characters
/// become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            c if (' '..='~').contains(&c) => c as u8,
            c if ('\u{A0}'..='\u{FF}').contains(&c) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}
