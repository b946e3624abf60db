//! Layout calculation modules for image placement
//!
//! This module handles all the geometric calculations for putting images on
//! pages:
//! - Page size (presets, custom sizes, image-derived sizes)
//! - Grid layout (slot dimensions, margins, gutters, partial-page tightening)
//! - Image fitting (scaling and centering inside a slot)
//! - Pagination (grouping images into pages)

mod fit;
mod grid;
mod page_size;
mod paginate;
mod types;

pub use fit::*;
pub use grid::*;
pub use page_size::*;
pub use paginate::*;
pub use types::*;
