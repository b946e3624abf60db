//! Layout data types
//!
//! These types represent the intermediate layout calculations between the
//! options and PDF rendering. All lengths are in points with the origin at
//! the bottom-left corner of the page.

/// Width and height in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Position within the grid (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    /// Row index (0 = top row)
    pub row: usize,
    /// Column index (0 = leftmost column)
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }
}

/// Final placement of one image on a page
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedImage {
    /// Index of the image in the input sequence
    pub image: usize,
    /// Drawn rectangle
    pub rect: Rect,
    /// Uniform scale from pixels to points
    pub scale: f32,
}

/// One output page
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub size: Size,
    /// Placements in input order
    pub images: Vec<PlacedImage>,
}
