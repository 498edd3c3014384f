//! Table layout: page geometry and column width planning.

use crate::report::grid::{Grid, make_rectangular};
use crate::report::metrics::text_width;

/// Body text size, in points.
pub const FONT_SIZE: f32 = 10.0;
/// Horizontal padding added to a column's natural width.
pub const CELL_PADDING: f32 = 10.0;
/// Distance between two wrapped lines inside a cell.
pub const LEADING: f32 = 12.0;
/// Space above and below the text block of a row.
pub const ROW_PADDING: f32 = 3.0;

/// Page size and margins, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
}

impl PageGeometry {
    /// US Letter, landscape.
    pub const LETTER_LANDSCAPE: PageGeometry = PageGeometry {
        width: 792.0,
        height: 612.0,
        margin_left: 30.0,
        margin_right: 30.0,
        margin_top: 30.0,
        margin_bottom: 18.0,
    };

    pub fn usable_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    pub fn usable_height(&self) -> f32 {
        self.height - self.margin_top - self.margin_bottom
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::LETTER_LANDSCAPE
    }
}

/// One width per column, in points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnWidthPlan {
    widths: Vec<f32>,
}

impl ColumnWidthPlan {
    pub fn widths(&self) -> &[f32] {
        &self.widths
    }

    pub fn total(&self) -> f32 {
        self.widths.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }
}

/// A grid ready for page emission.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTable {
    /// Name of the attachment the grid came from.
    pub source: String,
    pub grid: Grid,
    pub widths: ColumnWidthPlan,
}

impl RenderedTable {
    pub fn column_count(&self) -> usize {
        self.widths.len()
    }
}

/// Widest rendered value of each column plus padding.
pub fn natural_widths(grid: &Grid) -> Vec<f32> {
    // ragged rows count as padded with empty cells
    let columns = grid.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0.0_f32; columns];

    for row in grid {
        for (i, cell) in row.iter().enumerate() {
            let w = text_width(cell, FONT_SIZE);
            if w > widths[i] {
                widths[i] = w;
            }
        }
    }

    widths.iter().map(|w| w + CELL_PADDING).collect()
}

/// Fit the natural widths into `usable` points.
///
/// When the natural total overflows, every column is capped at an equal
/// share of the usable width; narrower columns keep their natural width.
/// The share is rounded down to 1/100 pt so the sum stays within bounds.
pub fn plan_column_widths(grid: &Grid, usable: f32) -> ColumnWidthPlan {
    let natural = natural_widths(grid);
    if natural.is_empty() {
        return ColumnWidthPlan::default();
    }

    let total: f32 = natural.iter().sum();
    if total <= usable {
        return ColumnWidthPlan { widths: natural };
    }

    let share = (usable * 100.0 / natural.len() as f32).floor() / 100.0;
    let widths = natural.iter().map(|w| w.min(share)).collect();
    ColumnWidthPlan { widths }
}

/// Normalize a decoded grid and plan its columns for `geometry`.
pub fn build_table(source: impl Into<String>, grid: Grid, geometry: &PageGeometry) -> RenderedTable {
    let grid = make_rectangular(grid);
    let widths = plan_column_widths(&grid, geometry.usable_width());

    RenderedTable {
        source: source.into(),
        grid,
        widths,
    }
}
