use super::Color;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HorizontalOrigin {
    Left,
    Center,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VerticalOrigin {
    Top,
    Bottom,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LabelStyle {
    pub font_size_px: f32,
    pub fill: Color,
    /// `None` draws the text without a background box.
    pub background: Option<Color>,
    pub pixel_offset: [f64; 2],
    pub horizontal_origin: HorizontalOrigin,
    pub vertical_origin: VerticalOrigin,
    /// Draw on top of terrain and volumes regardless of depth.
    pub always_on_top: bool,
}

impl LabelStyle {
    /// Small monospace readout anchored at its lower-left corner.
    pub fn readout() -> Self {
        Self {
            font_size_px: 14.0,
            fill: Color::WHITE,
            background: Some(Color::BLACK.with_alpha(0.8)),
            pixel_offset: [0.0, 0.0],
            horizontal_origin: HorizontalOrigin::Left,
            vertical_origin: VerticalOrigin::Bottom,
            always_on_top: true,
        }
    }

    /// White-on-red banner centered above its anchor.
    pub fn error_banner() -> Self {
        Self {
            font_size_px: 16.0,
            fill: Color::WHITE,
            background: Some(Color::RED.with_alpha(0.8)),
            pixel_offset: [0.0, -50.0],
            horizontal_origin: HorizontalOrigin::Center,
            vertical_origin: VerticalOrigin::Top,
            always_on_top: true,
        }
    }
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self::readout()
    }
}
