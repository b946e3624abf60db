pub mod convert;
pub mod layout;
mod options;
mod resample;
mod stats;
mod types;
pub mod units;

pub use convert::{
    CancellationToken, ConversionController, ImageFileInfo, ProgressSender, ProgressUpdate,
    convert, inspect_files, is_supported,
};
pub use layout::{
    ImageFit, Page, PlacedImage, Rect, ResolvedGrid, Size, fit_image, paginate, plan_pages,
    resolve_grid, resolve_page_size, tighten_grid,
};
pub use options::*;
pub use resample::{ResamplePlan, plan_resample};
pub use stats::calculate_statistics;
pub use types::*;
