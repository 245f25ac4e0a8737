//! Fill/stroke styles and text paint carried through evaluation untouched.

use serde::{Deserialize, Serialize};

/// RGBA color: 8-bit channels plus a 0..1 alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub value: (u8, u8, u8, f32),
}

impl Color {
    pub fn new(red: u8, green: u8, blue: u8, alpha: f32) -> Color {
        Color {
            value: (red, green, blue, alpha),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::new(0, 0, 0, 1.0)
    }
}

fn default_stroke_width() -> f32 {
    10.0
}

fn default_font_name() -> String {
    "Helvetica-Bold".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillStyle {
    #[serde(default)]
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    #[serde(default)]
    pub color: Color,
    #[serde(default = "default_stroke_width")]
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeAndFillStyle {
    pub stroke: StrokeStyle,
    pub fill: FillStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PaintStyle {
    Fill(FillStyle),
    Stroke(StrokeStyle),
    StrokeAndFill(StrokeAndFillStyle),
}

impl PaintStyle {
    pub fn fill(color: Color) -> Self {
        PaintStyle::Fill(FillStyle { color })
    }

    pub fn stroke(color: Color, width: f32) -> Self {
        PaintStyle::Stroke(StrokeStyle { color, width })
    }

    /// Stroke width when the style strokes at all.
    pub fn stroke_width(&self) -> Option<f32> {
        match self {
            PaintStyle::Fill(_) => None,
            PaintStyle::Stroke(s) => Some(s.width),
            PaintStyle::StrokeAndFill(s) => Some(s.stroke.width),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    pub style: PaintStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPaint {
    pub style: PaintStyle,
    pub align: TextAlign,
    #[serde(default = "default_font_name")]
    pub font_name: String,
    pub size: f32,
}
