//! Scrollbar custom drawing: arrows, thumbs and the document overview.
//!
//! The host forwards every custom-draw notification of its scrollbars to
//! [`ScrollOverviewRenderer::handle_custom_draw`] together with a canvas
//! for the item. The vertical bar's page region is replaced by a
//! compressed view of the whole document: one column per annotation
//! category plus a full-width marker for the caret line.
use bowpad_config::Rgb;
use serde::{Deserialize, Serialize};

use crate::annotations::{Category, LineAnnotationIndex};
use crate::canvas::{OverviewCanvas, PixelPoint, PixelRect, ThumbStroke};
use crate::hot_zone::{HitZone, HotZones};
use crate::palette::ScrollPalette;
use crate::projection::LineMapper;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverviewSettings {
    /// Length of a hot/cold transition in seconds.
    pub transition_secs: f32,
    /// When false, zone colors jump straight to their target.
    pub animations_available: bool,
    /// Height of annotation lines and the caret marker, in pixels.
    pub marker_height: i32,
    /// Inset of arrow triangles from their item rect, in pixels.
    pub arrow_margin: i32,
    /// Inset of the vertical thumb outline, in pixels.
    pub thumb_inset: i32,
    pub thumb_corner_radius: f32,
    pub thumb_outline_width: f32,
    pub thumb_fill_alpha: u8,
}

impl Default for OverviewSettings {
    fn default() -> Self {
        Self {
            transition_secs: 0.3,
            animations_available: true,
            marker_height: 2,
            arrow_margin: 2,
            thumb_inset: 2,
            thumb_corner_radius: 2.0,
            thumb_outline_width: 2.0,
            thumb_fill_alpha: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStage {
    PrePaint,
    ItemPrePaint,
    PostPaint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBarKind {
    Horizontal,
    Vertical,
    /// Corner square between the two bars.
    Gripper,
    /// Extra buttons the host inserts into a bar; drawn by the host.
    InsertedButtons,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollItem {
    /// Left arrow of the horizontal bar, up arrow of the vertical bar.
    LineLeftUp,
    /// Right arrow of the horizontal bar, down arrow of the vertical bar.
    LineRightDown,
    Thumb,
    /// The track area; the overview strip on the vertical bar.
    PageRegion,
    Other,
}

/// One custom-draw notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomDrawRequest {
    pub stage: DrawStage,
    pub bar: ScrollBarKind,
    pub item: ScrollItem,
    pub rect: PixelRect,
    /// Pointer is over the item or it is pressed.
    pub hot: bool,
}

/// What the host should do after the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomDrawReply {
    /// Let the host draw the item itself.
    DoDefault,
    /// The item has been drawn; the host must not draw it.
    SkipDefault,
}

/// Per-view scrollbar renderer. Owns the annotation index it visualizes.
#[derive(Debug, Clone)]
pub struct ScrollOverviewRenderer {
    settings: OverviewSettings,
    palette: ScrollPalette,
    zones: HotZones,
    annotations: LineAnnotationIndex,
    current_line: usize,
    current_color: Rgb,
}

impl Default for ScrollOverviewRenderer {
    fn default() -> Self {
        Self::new(OverviewSettings::default(), ScrollPalette::default())
    }
}

impl ScrollOverviewRenderer {
    /// Creates a renderer with an empty annotation index.
    pub fn new(settings: OverviewSettings, palette: ScrollPalette) -> Self {
        let zones = HotZones::new(settings.transition_secs, settings.animations_available);
        Self {
            settings,
            palette,
            zones,
            annotations: LineAnnotationIndex::new(),
            current_line: 0,
            current_color: Rgb::BLACK,
        }
    }

    pub fn settings(&self) -> &OverviewSettings {
        &self.settings
    }

    pub fn palette(&self) -> &ScrollPalette {
        &self.palette
    }

    /// Switches colors, e.g. after a theme change.
    pub fn set_palette(&mut self, palette: ScrollPalette) {
        self.palette = palette;
    }

    pub fn annotations(&self) -> &LineAnnotationIndex {
        &self.annotations
    }

    /// Mutable index; changes take effect on the next paint.
    pub fn annotations_mut(&mut self) -> &mut LineAnnotationIndex {
        &mut self.annotations
    }

    /// Hover state of the scrollbar zones.
    pub fn zones(&self) -> &HotZones {
        &self.zones
    }

    /// Caret position marker, as a visible line.
    pub fn set_current_position(&mut self, visible_line: usize, color: Rgb) {
        self.current_line = visible_line;
        self.current_color = color;
    }

    /// Advances zone animations; returns whether another frame is needed.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.zones.tick(dt)
    }

    /// Paints one scrollbar part and tells the caller whether to draw its
    /// default.
    pub fn handle_custom_draw(
        &mut self,
        request: &CustomDrawRequest,
        mapper: &impl LineMapper,
        canvas: &mut impl OverviewCanvas,
    ) -> CustomDrawReply {
        if request.bar == ScrollBarKind::InsertedButtons {
            return CustomDrawReply::DoDefault;
        }
        if request.stage == DrawStage::PrePaint {
            return CustomDrawReply::SkipDefault;
        }

        let result = match (request.bar, request.stage) {
            (ScrollBarKind::Gripper, _) => canvas.fill_rect(request.rect, self.palette.gripper),
            (ScrollBarKind::Horizontal, DrawStage::ItemPrePaint) => {
                self.paint_horizontal(request, canvas)
            }
            (ScrollBarKind::Vertical, DrawStage::ItemPrePaint) => {
                self.paint_vertical(request, mapper, canvas)
            }
            _ => Ok(()),
        };
        if let Err(e) = result {
            tracing::debug!("Scrollbar paint aborted for {:?}/{:?}: {e:#}", request.bar, request.item);
        }
        CustomDrawReply::SkipDefault
    }

    fn zone_color(&mut self, zone: HitZone, hot: bool) -> Rgb {
        self.zones.set_hot(zone, hot);
        self.palette.thumb_color(self.zones.fraction(zone))
    }

    fn paint_horizontal(
        &mut self,
        request: &CustomDrawRequest,
        canvas: &mut impl OverviewCanvas,
    ) -> anyhow::Result<()> {
        let r = request.rect;
        let m = self.settings.arrow_margin;
        match request.item {
            ScrollItem::LineLeftUp => {
                let color = self.zone_color(HitZone::HorizontalLeft, request.hot);
                canvas.fill_rect(r, self.palette.track)?;
                canvas.fill_triangle(
                    [
                        PixelPoint::new(r.left + m, r.mid_y()),
                        PixelPoint::new(r.right - m, r.top + m),
                        PixelPoint::new(r.right - m, r.bottom - m),
                    ],
                    color,
                )
            }
            ScrollItem::LineRightDown => {
                let color = self.zone_color(HitZone::HorizontalRight, request.hot);
                canvas.fill_rect(r, self.palette.track)?;
                canvas.fill_triangle(
                    [
                        PixelPoint::new(r.right - m, r.mid_y()),
                        PixelPoint::new(r.left + m, r.top + m),
                        PixelPoint::new(r.left + m, r.bottom - m),
                    ],
                    color,
                )
            }
            ScrollItem::Thumb => {
                let color = self.zone_color(HitZone::HorizontalThumb, request.hot);
                canvas.fill_rect(r, color)
            }
            ScrollItem::PageRegion | ScrollItem::Other => canvas.fill_rect(r, self.palette.track),
        }
    }

    fn paint_vertical(
        &mut self,
        request: &CustomDrawRequest,
        mapper: &impl LineMapper,
        canvas: &mut impl OverviewCanvas,
    ) -> anyhow::Result<()> {
        let r = request.rect;
        let m = self.settings.arrow_margin;
        match request.item {
            ScrollItem::LineRightDown => {
                let color = self.zone_color(HitZone::VerticalDown, request.hot);
                canvas.fill_rect(r, self.palette.track)?;
                canvas.fill_triangle(
                    [
                        PixelPoint::new(r.mid_x(), r.bottom - m),
                        PixelPoint::new(r.left + m, r.top + m),
                        PixelPoint::new(r.right - m, r.top + m),
                    ],
                    color,
                )
            }
            ScrollItem::LineLeftUp => {
                let color = self.zone_color(HitZone::VerticalUp, request.hot);
                canvas.fill_rect(r, self.palette.track)?;
                canvas.fill_triangle(
                    [
                        PixelPoint::new(r.mid_x(), r.top + m),
                        PixelPoint::new(r.left + m, r.bottom - m),
                        PixelPoint::new(r.right - m, r.bottom - m),
                    ],
                    color,
                )
            }
            ScrollItem::Thumb => {
                let color = self.zone_color(HitZone::VerticalThumb, request.hot);
                let inset = self.settings.thumb_inset;
                canvas.draw_thumb(
                    r.inflate(-inset, -inset),
                    color,
                    ThumbStroke {
                        corner_radius: self.settings.thumb_corner_radius,
                        outline_width: self.settings.thumb_outline_width,
                        fill_alpha: self.settings.thumb_fill_alpha,
                    },
                )
            }
            ScrollItem::PageRegion => self.paint_overview(r, mapper, canvas),
            ScrollItem::Other => Ok(()),
        }
    }

    fn paint_overview(
        &mut self,
        r: PixelRect,
        mapper: &impl LineMapper,
        canvas: &mut impl OverviewCanvas,
    ) -> anyhow::Result<()> {
        canvas.fill_rect(r, self.palette.track)?;
        self.annotations.recalculate(mapper);

        let total = self.annotations.visible_lines();
        let height = self.settings.marker_height;
        let col_width = r.width() / Category::COUNT as i32;
        for category in Category::ALL {
            let x = r.left + category.column() as i32 * col_width;
            let mut last_pos: Option<i32> = None;
            let mut last_color: Option<Rgb> = None;
            for (line, color) in self.annotations.visible_entries(category) {
                let pos = line_offset(r, line, total);
                let advanced = last_pos.is_none_or(|last| pos > last + 1);
                if advanced || last_color != Some(color) {
                    canvas.fill_rect(PixelRect::from_origin_size(x, pos, col_width, height), color)?;
                    last_pos = Some(pos);
                    last_color = Some(color);
                }
            }
        }

        let pos = line_offset(r, self.current_line, total);
        canvas.fill_rect(
            PixelRect::from_origin_size(r.left, pos, r.width(), height),
            self.current_color,
        )
    }
}

/// Vertical pixel offset of a visible line within the strip.
fn line_offset(r: PixelRect, line: usize, total: usize) -> i32 {
    if total == 0 {
        return r.top;
    }
    let offset = r.height() as i64 * line as i64 / total as i64;
    r.top + offset as i32
}
