use crate::core::boundary::SpreadsheetDecoder;
use crate::core::message::AttachmentPayload;
use crate::errors::{AppError, AppResult};
use calamine::{Data, Range, Reader, Xlsx};
use std::io::Cursor;

/// One cell after normalization; absent values are `""`.
pub type Cell = String;

/// Rows of columns.
pub type Grid = Vec<Vec<Cell>>;

/// Reads the first worksheet of an `.xlsx` workbook.
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxDecoder;

impl SpreadsheetDecoder for XlsxDecoder {
    fn decode(&self, payload: &AttachmentPayload) -> AppResult<Grid> {
        let fail = |reason: String| AppError::Spreadsheet {
            filename: payload.filename.clone(),
            reason,
        };

        let mut workbook: Xlsx<_> =
            Xlsx::new(Cursor::new(payload.bytes.as_slice())).map_err(|e| fail(e.to_string()))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| fail("workbook has no worksheets".to_string()))?
            .map_err(|e| fail(e.to_string()))?;

        Ok(grid_from_range(&range))
    }
}

/// Grid spanning `A1` to the last used cell, so leading blank rows and
/// columns survive and every row has the same length.
pub fn grid_from_range(range: &Range<Data>) -> Grid {
    let Some((last_row, last_col)) = range.end() else {
        return Vec::new();
    };

    (0..=last_row)
        .map(|r| {
            (0..=last_col)
                .map(|c| range.get_value((r, c)).map(cell_text).unwrap_or_default())
                .collect()
        })
        .collect()
}

/// Textual form of a cell value.
pub fn cell_text(value: &Data) -> String {
    match value {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => float_text(*f),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            match dt.as_datetime() {
                // time-of-day only
                Some(t) if (0.0..1.0).contains(&serial) => t.format("%H:%M:%S").to_string(),
                Some(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
                None => float_text(serial),
            }
        }
        Data::Error(e) => e.to_string(),
    }
}

/// Integral values print without a decimal point.
fn float_text(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{f}")
    }
}

/// Pad ragged rows with empty cells up to the widest row.
pub fn make_rectangular(mut grid: Grid) -> Grid {
    let columns = grid.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut grid {
        row.resize(columns, String::new());
    }
    grid
}
