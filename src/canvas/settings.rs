use serde::{Deserialize, Serialize};

use crate::canvas::model::Color;

pub const MIN_PEN_WIDTH: f32 = 1.0;
pub const MAX_PEN_WIDTH: f32 = 20.0;
pub const MIN_ERASER_MULTIPLIER: f32 = 3.0;
pub const MAX_ERASER_MULTIPLIER: f32 = 10.0;
const MAX_CANVAS_DIMENSION: u32 = 8192;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanvasSettings {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_background")]
    pub background: Color,
    #[serde(default = "default_pen_color")]
    pub pen_color: Color,
    #[serde(default = "default_pen_width")]
    pub pen_width: f32,
    #[serde(default = "default_eraser_multiplier")]
    pub eraser_multiplier: f32,
    /// Maximum undo depth. `None` keeps every checkpoint.
    #[serde(default)]
    pub history_limit: Option<usize>,
    #[serde(default = "default_palette")]
    pub palette: Vec<Color>,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
    #[serde(default)]
    pub notify_on_clear: bool,
    #[serde(default)]
    pub debug_logging: bool,
}

impl CanvasSettings {
    /// Clamps out-of-range values loaded from disk. Returns `true` when anything changed.
    pub fn sanitize(&mut self) -> bool {
        let before = self.clone();

        self.width = self.width.min(MAX_CANVAS_DIMENSION);
        self.height = self.height.min(MAX_CANVAS_DIMENSION);
        self.pen_width = clamp_or(
            self.pen_width,
            MIN_PEN_WIDTH,
            MAX_PEN_WIDTH,
            default_pen_width(),
        );
        self.eraser_multiplier = clamp_or(
            self.eraser_multiplier,
            MIN_ERASER_MULTIPLIER,
            MAX_ERASER_MULTIPLIER,
            default_eraser_multiplier(),
        );
        self.history_limit = self.history_limit.map(|limit| limit.max(1));
        self.request_timeout_seconds = self.request_timeout_seconds.max(1);
        if self.palette.is_empty() {
            self.palette = default_palette();
        }
        let trimmed = self.api_base_url.trim().trim_end_matches('/').to_owned();
        self.api_base_url = trimmed;

        *self != before
    }
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_background() -> Color {
    Color::WHITE
}

fn default_pen_color() -> Color {
    Color::BLACK
}

fn default_pen_width() -> f32 {
    2.0
}

fn default_eraser_multiplier() -> f32 {
    5.0
}

fn default_api_base_url() -> String {
    "http://localhost:8080".to_owned()
}

fn default_request_timeout_seconds() -> u64 {
    15
}

fn default_palette() -> Vec<Color> {
    vec![
        Color::rgb(0, 0, 0),
        Color::rgb(255, 0, 0),
        Color::rgb(0, 0, 255),
        Color::rgb(0, 128, 0),
        Color::rgb(255, 165, 0),
        Color::rgb(128, 0, 128),
        Color::rgb(255, 0, 255),
    ]
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            background: default_background(),
            pen_color: default_pen_color(),
            pen_width: default_pen_width(),
            eraser_multiplier: default_eraser_multiplier(),
            history_limit: None,
            palette: default_palette(),
            api_base_url: default_api_base_url(),
            request_timeout_seconds: default_request_timeout_seconds(),
            notify_on_clear: false,
            debug_logging: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: CanvasSettings =
            serde_json::from_value(serde_json::json!({ "width": 320 })).expect("deserialize");
        assert_eq!(settings.width, 320);
        assert_eq!(settings.height, default_height());
        assert_eq!(settings.palette.len(), 7);
        assert_eq!(settings.history_limit, None);
    }

    #[test]
    fn sanitize_clamps_widths_and_reports_change() {
        let mut settings = CanvasSettings {
            pen_width: 64.0,
            eraser_multiplier: 1.0,
            history_limit: Some(0),
            api_base_url: "https://api.example.com/ ".to_owned(),
            ..CanvasSettings::default()
        };

        assert!(settings.sanitize());
        assert_eq!(settings.pen_width, MAX_PEN_WIDTH);
        assert_eq!(settings.eraser_multiplier, MIN_ERASER_MULTIPLIER);
        assert_eq!(settings.history_limit, Some(1));
        assert_eq!(settings.api_base_url, "https://api.example.com");
    }

    #[test]
    fn sanitize_is_a_noop_for_defaults() {
        let mut settings = CanvasSettings::default();
        assert!(!settings.sanitize());
    }

    #[test]
    fn non_finite_width_uses_default() {
        let mut settings = CanvasSettings {
            pen_width: f32::NAN,
            ..CanvasSettings::default()
        };
        settings.sanitize();
        assert_eq!(settings.pen_width, default_pen_width());
    }
}
