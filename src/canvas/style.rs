use crate::canvas::model::{Color, StrokeStyle, Tool};
use crate::canvas::settings::{
    CanvasSettings, MAX_ERASER_MULTIPLIER, MAX_PEN_WIDTH, MIN_ERASER_MULTIPLIER, MIN_PEN_WIDTH,
};

/// Tool, color and width chosen by the user. Read when a stroke begins and
/// frozen into it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleState {
    tool: Tool,
    pen_color: Color,
    pen_width: f32,
    eraser_multiplier: f32,
    background: Color,
}

impl StyleState {
    pub fn new(
        pen_color: Color,
        pen_width: f32,
        eraser_multiplier: f32,
        background: Color,
    ) -> Self {
        Self {
            tool: Tool::Pen,
            pen_color,
            pen_width: clamp_width(pen_width),
            eraser_multiplier: eraser_multiplier
                .clamp(MIN_ERASER_MULTIPLIER, MAX_ERASER_MULTIPLIER),
            background,
        }
    }

    pub fn from_settings(settings: &CanvasSettings) -> Self {
        Self::new(
            settings.pen_color,
            settings.pen_width,
            settings.eraser_multiplier,
            settings.background,
        )
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn pen_color(&self) -> Color {
        self.pen_color
    }

    pub fn pen_width(&self) -> f32 {
        self.pen_width
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn set_color(&mut self, color: Color) {
        self.pen_color = color;
    }

    pub fn set_width(&mut self, width: f32) {
        self.pen_width = clamp_width(width);
    }

    /// Style applied to the next stroke. The eraser paints background color at
    /// a multiple of the pen width, leaving the pen settings untouched.
    pub fn effective_style(&self) -> StrokeStyle {
        match self.tool {
            Tool::Eraser => StrokeStyle {
                color: self.background,
                width: self.pen_width * self.eraser_multiplier,
            },
            Tool::Pen | Tool::Select | Tool::Shape(_) => StrokeStyle {
                color: self.pen_color,
                width: self.pen_width,
            },
        }
    }
}

impl Default for StyleState {
    fn default() -> Self {
        Self::from_settings(&CanvasSettings::default())
    }
}

fn clamp_width(width: f32) -> f32 {
    if width.is_finite() {
        width.clamp(MIN_PEN_WIDTH, MAX_PEN_WIDTH)
    } else {
        MIN_PEN_WIDTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eraser_uses_background_and_multiplied_width() {
        let mut style = StyleState::new(Color::rgb(255, 0, 0), 4.0, 3.0, Color::WHITE);
        style.set_tool(Tool::Eraser);
        let effective = style.effective_style();
        assert_eq!(effective.color, Color::WHITE);
        assert_eq!(effective.width, 12.0);
        assert_eq!(style.pen_color(), Color::rgb(255, 0, 0));
    }

    #[test]
    fn eraser_toggle_round_trips_pen_style() {
        let mut style = StyleState::new(Color::rgb(0, 0, 255), 7.0, 5.0, Color::WHITE);
        let before = style.effective_style();
        style.set_tool(Tool::Eraser);
        style.set_tool(Tool::Pen);
        assert_eq!(style.effective_style(), before);
    }

    #[test]
    fn width_is_clamped_to_pen_range() {
        let mut style = StyleState::default();
        style.set_width(0.2);
        assert_eq!(style.pen_width(), MIN_PEN_WIDTH);
        style.set_width(45.0);
        assert_eq!(style.pen_width(), MAX_PEN_WIDTH);
    }
}
