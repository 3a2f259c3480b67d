//! Drawing backend seam for the renderer.
use bowpad_config::Rgb;

/// Integer pixel rectangle, right/bottom exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a rect from its top-left corner and size.
    pub fn from_origin_size(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn mid_x(&self) -> i32 {
        self.left + self.width() / 2
    }

    pub fn mid_y(&self) -> i32 {
        self.top + self.height() / 2
    }

    /// Grows the rect by `dx`/`dy` on each side; negative values shrink it.
    pub fn inflate(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.left - dx, self.top - dy, self.right + dx, self.bottom + dy)
    }

    /// True when the rect has no area.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// How the vertical thumb is outlined and filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbStroke {
    pub corner_radius: f32,
    pub outline_width: f32,
    /// Alpha of the fill; the outline is opaque.
    pub fill_alpha: u8,
}

/// Primitive operations the overview needs from a graphics backend.
///
/// Errors abort the item being painted; the renderer logs and swallows
/// them.
pub trait OverviewCanvas {
    fn fill_rect(&mut self, rect: PixelRect, color: Rgb) -> anyhow::Result<()>;

    fn fill_triangle(&mut self, points: [PixelPoint; 3], color: Rgb) -> anyhow::Result<()>;

    fn draw_thumb(&mut self, rect: PixelRect, color: Rgb, stroke: ThumbStroke) -> anyhow::Result<()>;
}
