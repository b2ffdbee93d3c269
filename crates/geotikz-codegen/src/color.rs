//! 颜色名称解析
//!
//! 调色板中的颜色直接使用 xcolor 名称；其他颜色按首次出现的顺序注册为
//! `customcolorN`，每个值只定义一次。

use geotikz_core::properties::Color;

/// xcolor 基础颜色
const PALETTE: [(Color, &str); 12] = [
    (Color::rgb(0, 0, 0), "black"),
    (Color::rgb(255, 255, 255), "white"),
    (Color::rgb(255, 0, 0), "red"),
    (Color::rgb(0, 255, 0), "green"),
    (Color::rgb(0, 0, 255), "blue"),
    (Color::rgb(0, 255, 255), "cyan"),
    (Color::rgb(255, 0, 255), "magenta"),
    (Color::rgb(255, 255, 0), "yellow"),
    (Color::rgb(128, 128, 128), "gray"),
    (Color::rgb(255, 128, 0), "orange"),
    (Color::rgb(191, 0, 64), "purple"),
    (Color::rgb(191, 128, 64), "brown"),
];

pub fn palette_name(color: Color) -> Option<&'static str> {
    PALETTE.iter().find(|(c, _)| *c == color).map(|(_, name)| *name)
}

/// 自定义颜色注册表
#[derive(Debug, Default)]
pub struct ColorRegistry {
    custom: Vec<(Color, String)>,
}

impl ColorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 颜色在输出中的名称，必要时注册自定义颜色
    pub fn name(&mut self, color: Color) -> String {
        if let Some(name) = palette_name(color) {
            return name.to_string();
        }
        if let Some((_, name)) = self.custom.iter().find(|(c, _)| *c == color) {
            return name.clone();
        }
        let name = format!("customcolor{}", self.custom.len() + 1);
        self.custom.push((color, name.clone()));
        name
    }

    pub fn is_empty(&self) -> bool {
        self.custom.is_empty()
    }

    /// `\definecolor` 语句，按注册顺序
    pub fn definitions(&self) -> Vec<String> {
        self.custom
            .iter()
            .map(|(color, name)| {
                format!(
                    "\\definecolor{{{}}}{{HTML}}{{{:02X}{:02X}{:02X}}}",
                    name, color.r, color.g, color.b
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_colors_are_not_registered() {
        let mut registry = ColorRegistry::new();
        for (color, name) in [
            (Color::BLACK, "black"),
            (Color::WHITE, "white"),
            (Color::RED, "red"),
            (Color::GREEN, "green"),
            (Color::BLUE, "blue"),
        ] {
            assert_eq!(registry.name(color), name);
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_custom_colors_deduplicated_in_first_use_order() {
        let mut registry = ColorRegistry::new();
        let teal = Color::rgb(0, 128, 128);
        let olive = Color::rgb(128, 128, 0);
        assert_eq!(registry.name(teal), "customcolor1");
        assert_eq!(registry.name(olive), "customcolor2");
        assert_eq!(registry.name(teal), "customcolor1");
        assert_eq!(
            registry.definitions(),
            vec![
                "\\definecolor{customcolor1}{HTML}{008080}".to_string(),
                "\\definecolor{customcolor2}{HTML}{808000}".to_string(),
            ]
        );
    }
}
