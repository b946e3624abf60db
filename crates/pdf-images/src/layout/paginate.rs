//! Grouping images into pages and building the page plan

use crate::options::ConversionOptions;
use crate::types::{LayoutPreset, PageSizePreset, Result, SourceImage};

use super::{Page, PlacedImage, ResolvedGrid, fit_image, page_size_for, resolve_grid, tighten_grid};

/// Split `items` into pages of at most `capacity`, keeping input order.
pub fn paginate<T>(items: &[T], capacity: usize) -> Vec<&[T]> {
    items.chunks(capacity.max(1)).collect()
}

/// Lay out every image on pages.
///
/// Each page takes its size from the first image it carries (this only
/// matters for "Original" pages, which carry a single image). Partial final
/// pages use a tightened grid.
pub fn plan_pages(images: &[SourceImage], options: &ConversionOptions) -> Result<Vec<Page>> {
    let full_grid = resolve_grid(options.page_layout, options.margin_in)?;
    let original_grid = resolve_grid(LayoutPreset::One, options.margin_in)?;
    let capacity = options.page_capacity();

    let mut pages = Vec::new();
    let mut first_index = 0;

    for group in paginate(images, capacity) {
        let grid = grid_for_group(options, &full_grid, &original_grid, group.len());
        let page_size = page_size_for(options, &group[0])?;

        log::debug!(
            "Page {}: {:.1}x{:.1}pt, {} image(s) on a {}x{} grid",
            pages.len() + 1,
            page_size.width,
            page_size.height,
            group.len(),
            grid.columns,
            grid.rows
        );

        let placements = group
            .iter()
            .enumerate()
            .map(|(slot_index, image)| {
                let slot = grid.slot_bounds(grid.position(slot_index), page_size);
                let fit = fit_image(&slot, image.width, image.height, options.scaling);
                PlacedImage {
                    image: first_index + slot_index,
                    rect: fit.rect,
                    scale: fit.scale,
                }
            })
            .collect();

        pages.push(Page {
            size: page_size,
            images: placements,
        });
        first_index += group.len();
    }

    Ok(pages)
}

fn grid_for_group(
    options: &ConversionOptions,
    full_grid: &ResolvedGrid,
    original_grid: &ResolvedGrid,
    group_len: usize,
) -> ResolvedGrid {
    if options.page_size == PageSizePreset::Original {
        original_grid.clone()
    } else if group_len < full_grid.capacity {
        tighten_grid(full_grid, group_len)
    } else {
        full_grid.clone()
    }
}
