//! Colors used by the scroll overview.
use bowpad_config::Rgb;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollPalette {
    /// Background of arrows, the horizontal track and the overview strip.
    pub track: Rgb,
    /// Corner gripper between the two bars.
    pub gripper: Rgb,
    /// Thumb and arrow color while the zone is cold.
    pub thumb_cold: Rgb,
    /// Thumb and arrow color while the zone is hot.
    pub thumb_hot: Rgb,
}

impl Default for ScrollPalette {
    fn default() -> Self {
        Self::dark()
    }
}

impl ScrollPalette {
    /// Colors for a dark editor theme.
    pub fn dark() -> Self {
        Self {
            track: Rgb::new(35, 35, 35),
            gripper: Rgb::new(35, 35, 35),
            thumb_cold: Rgb::new(80, 80, 80),
            thumb_hot: Rgb::new(140, 140, 140),
        }
    }

    /// Colors for a light editor theme.
    pub fn light() -> Self {
        Self {
            track: Rgb::new(235, 235, 235),
            gripper: Rgb::new(235, 235, 235),
            thumb_cold: Rgb::new(150, 150, 200),
            thumb_hot: Rgb::new(105, 105, 105),
        }
    }

    /// Picks the preset matching the OS theme, dark when it can't be told.
    pub fn system() -> Self {
        match dark_light::detect() {
            Ok(dark_light::Mode::Light) => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Blend between the cold and hot thumb colors.
    pub fn thumb_color(&self, hot_fraction: f32) -> Rgb {
        self.thumb_cold.interpolate(self.thumb_hot, hot_fraction)
    }
}
