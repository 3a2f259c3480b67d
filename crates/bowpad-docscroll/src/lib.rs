pub mod annotations;
pub mod canvas;
pub mod egui_canvas;
pub mod hot_zone;
pub mod palette;
pub mod projection;
pub mod renderer;

pub use annotations::{Category, LineAnnotationIndex};
pub use canvas::{OverviewCanvas, PixelPoint, PixelRect, ThumbStroke};
pub use egui_canvas::EguiCanvas;
pub use hot_zone::{HitZone, HotZones, ZonePhase};
pub use palette::ScrollPalette;
pub use projection::{IdentityLines, LineMapper, VisibleLineMap};
pub use renderer::{
    CustomDrawReply, CustomDrawRequest, DrawStage, OverviewSettings, ScrollBarKind, ScrollItem,
    ScrollOverviewRenderer,
};
