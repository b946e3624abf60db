//! Grid layout calculation
//!
//! This module handles the subdivision of a page into image slots, including
//! margins, gutters and the tightened grid used for a partial final page.

use crate::types::{ConvertError, LayoutPreset, Result};
use crate::units::in_to_pt;

use super::{GridPosition, Rect, Size};

/// Gutter between slots when the page has no margin
pub const FALLBACK_GUTTER_PT: f32 = 12.0;

/// Resolved page grid, in points
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGrid {
    /// Number of columns
    pub columns: usize,
    /// Number of rows
    pub rows: usize,
    /// Number of slots, always `columns * rows`
    pub capacity: usize,
    pub margin_x: f32,
    pub margin_y: f32,
    /// Space between columns (0 when there is a single column)
    pub gutter_x: f32,
    /// Space between rows (0 when there is a single row)
    pub gutter_y: f32,
}

// =============================================================================
// Grid Creation
// =============================================================================

/// Create the full grid for a layout preset.
///
/// # Arguments
/// * `preset` - The page layout (one, two, four)
/// * `margin_in` - Page margin in inches; negative values are clamped to zero
pub fn resolve_grid(preset: LayoutPreset, margin_in: f32) -> Result<ResolvedGrid> {
    if !margin_in.is_finite() {
        return Err(ConvertError::Config(format!(
            "Margin must be a finite number, got {}",
            margin_in
        )));
    }

    let margin_pt = in_to_pt(margin_in.max(0.0));
    let gutter_pt = if margin_pt > 0.0 {
        margin_pt / 2.0
    } else {
        FALLBACK_GUTTER_PT
    };

    let (columns, rows) = preset.grid_dimensions();

    Ok(ResolvedGrid {
        columns,
        rows,
        capacity: columns * rows,
        margin_x: margin_pt,
        margin_y: margin_pt,
        gutter_x: if columns > 1 { gutter_pt } else { 0.0 },
        gutter_y: if rows > 1 { gutter_pt } else { 0.0 },
    })
}

/// Shrink a grid to fit `item_count` images on a partial final page.
///
/// - Single column: one image per row
/// - No more images than columns: a single row of `item_count` columns
/// - Otherwise: same columns, just enough rows
///
/// The result keeps the margins and gutter spacing, so the remaining slots
/// grow to fill the page instead of leaving empty cells.
pub fn tighten_grid(grid: &ResolvedGrid, item_count: usize) -> ResolvedGrid {
    if item_count == 0 || item_count >= grid.capacity {
        return grid.clone();
    }

    let (columns, rows) = if grid.columns == 1 {
        (1, item_count)
    } else if item_count <= grid.columns {
        (item_count, 1)
    } else {
        (grid.columns, item_count.div_ceil(grid.columns))
    };

    let gutter = grid.gutter_x.max(grid.gutter_y);

    ResolvedGrid {
        columns,
        rows,
        capacity: item_count,
        margin_x: grid.margin_x,
        margin_y: grid.margin_y,
        gutter_x: if columns > 1 { gutter } else { 0.0 },
        gutter_y: if rows > 1 { gutter } else { 0.0 },
    }
}

// =============================================================================
// Slot Calculations
// =============================================================================

impl ResolvedGrid {
    /// Size of one slot on a page of `page` size. Degenerate pages (margins
    /// larger than the page) produce zero-sized slots.
    pub fn slot_size(&self, page: Size) -> Size {
        let usable_width = (page.width
            - self.margin_x * 2.0
            - self.gutter_x * (self.columns as f32 - 1.0))
            .max(0.0);
        let usable_height = (page.height
            - self.margin_y * 2.0
            - self.gutter_y * (self.rows as f32 - 1.0))
            .max(0.0);

        Size::new(
            usable_width / self.columns as f32,
            usable_height / self.rows as f32,
        )
    }

    /// Grid position of the `index`th image; slots fill rows left to right,
    /// top to bottom
    pub fn position(&self, index: usize) -> GridPosition {
        GridPosition::new(index / self.columns, index % self.columns)
    }

    /// Bounds of the slot at `pos`
    pub fn slot_bounds(&self, pos: GridPosition, page: Size) -> Rect {
        let slot = self.slot_size(page);

        // Row 0 is at the top, so the y calculation is inverted
        let x = self.margin_x + pos.col as f32 * (slot.width + self.gutter_x);
        let y = page.height
            - self.margin_y
            - (pos.row + 1) as f32 * slot.height
            - pos.row as f32 * self.gutter_y;

        Rect::new(x, y, slot.width, slot.height)
    }
}

// =============================================================================
// Tests
// =============================================================================
