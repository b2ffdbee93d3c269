//! 视觉属性：颜色、线型、描边/填充样式、名称标签样式

use crate::math::Vector2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 颜色解析错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColorParseError {
    #[error("Color must start with '#': {0}")]
    MissingHash(String),

    #[error("Invalid color length: {0}")]
    InvalidLength(String),

    #[error("Invalid hex digit in color: {0}")]
    InvalidDigit(String),
}

/// RGB 颜色，序列化为 `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// 解析 `#rgb` 或 `#rrggbb`（不区分大小写）
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;
        if !digits.is_ascii() {
            return Err(ColorParseError::InvalidDigit(s.to_string()));
        }

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(ColorParseError::InvalidLength(s.to_string())),
        };

        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i..i + 2], 16)
                .map_err(|_| ColorParseError::InvalidDigit(s.to_string()))
        };

        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// 小写 `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// 线型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StrokePattern {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

/// 描边与填充样式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub stroke: Color,
    pub stroke_opacity: f64,
    /// 无填充时为 None
    pub fill: Option<Color>,
    pub fill_opacity: f64,
    /// 线宽（像素）
    pub stroke_width: f64,
    pub pattern: StrokePattern,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke: Color::BLACK,
            stroke_opacity: 1.0,
            fill: None,
            fill_opacity: 1.0,
            stroke_width: 1.0,
            pattern: StrokePattern::Solid,
        }
    }
}

impl Style {
    pub fn with_stroke(mut self, color: Color) -> Self {
        self.stroke = color;
        self
    }

    pub fn with_fill(mut self, color: Color, opacity: f64) -> Self {
        self.fill = Some(color);
        self.fill_opacity = opacity;
        self
    }

    pub fn with_pattern(mut self, pattern: StrokePattern) -> Self {
        self.pattern = pattern;
        self
    }
}

/// 名称标签样式覆盖
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    pub visible: bool,
    /// 相对锚点的偏移（像素）；None 时使用按类型的默认位置
    pub offset: Option<Vector2>,
    /// 字号（像素）
    pub font_size: Option<f64>,
    pub color: Option<Color>,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            visible: true,
            offset: None,
            font_size: None,
            color: None,
        }
    }
}

/// 文本字体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSpec {
    /// 字号（像素）
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            size: 16.0,
            bold: false,
            italic: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::from_hex("#FF8800").unwrap(), Color::rgb(255, 136, 0));
        assert_eq!(Color::from_hex("#f80").unwrap(), Color::rgb(255, 136, 0));
        assert_eq!(Color::rgb(255, 136, 0).to_hex(), "#ff8800");
        assert!(matches!(Color::from_hex("ff8800"), Err(ColorParseError::MissingHash(_))));
        assert!(matches!(Color::from_hex("#ff88"), Err(ColorParseError::InvalidLength(_))));
        assert!(matches!(Color::from_hex("#gg8800"), Err(ColorParseError::InvalidDigit(_))));
    }

    #[test]
    fn test_style_defaults_merge() {
        let style: Style = serde_json::from_str(r##"{"stroke": "#0000ff"}"##).unwrap();
        assert_eq!(style.stroke, Color::BLUE);
        assert_eq!(style.stroke_width, 1.0);
        assert_eq!(style.fill, None);
    }
}
