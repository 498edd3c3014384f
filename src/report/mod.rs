//! Spreadsheet → printable PDF.

pub mod document;
pub mod grid;
pub mod layout;
mod metrics;
pub mod pdf;
mod wrap;

pub use document::{Document, DocumentElement, assemble};
pub use layout::{ColumnWidthPlan, PageGeometry, RenderedTable, build_table};
pub use metrics::text_width;
pub use pdf::{RenderOptions, RenderedPdf, render};
pub use wrap::wrap_cell;

use crate::core::boundary::SpreadsheetDecoder;
use crate::core::message::AttachmentPayload;
use crate::errors::AppResult;
use log::info;

/// Decode, lay out, assemble and render a list of attachments.
/// A decode failure on any attachment aborts the whole build.
pub fn build_pdf(
    payloads: &[AttachmentPayload],
    decoder: &dyn SpreadsheetDecoder,
    geometry: &PageGeometry,
    opts: &RenderOptions,
) -> AppResult<RenderedPdf> {
    let mut tables = Vec::with_capacity(payloads.len());
    for payload in payloads {
        let grid = decoder.decode(payload)?;
        info!(
            "'{}': {} row(s) x {} column(s)",
            payload.filename,
            grid.len(),
            grid.first().map(Vec::len).unwrap_or(0)
        );
        tables.push(build_table(payload.filename.clone(), grid, geometry));
    }

    let doc = assemble(tables)?;
    render(&doc, geometry, opts)
}
