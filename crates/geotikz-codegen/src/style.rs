//! 样式映射：线宽、线型、箭头、字号、不透明度

use crate::color::ColorRegistry;
use crate::format::num;
use geotikz_core::object::ArrowStyle;
use geotikz_core::properties::{StrokePattern, Style};

/// 像素字号 → LaTeX 字号命令
pub fn font_size_class(size: f64) -> &'static str {
    match size {
        s if s < 8.0 => "\\tiny",
        s if s < 10.0 => "\\scriptsize",
        s if s < 12.0 => "\\footnotesize",
        s if s < 14.0 => "\\small",
        s if s < 17.0 => "\\normalsize",
        s if s < 20.0 => "\\large",
        s if s < 24.0 => "\\Large",
        s if s < 29.0 => "\\LARGE",
        s if s < 34.0 => "\\huge",
        _ => "\\Huge",
    }
}

/// 像素线宽 → TikZ 线宽关键字；默认线宽返回 None
pub fn line_width(width: f64) -> Option<&'static str> {
    match width {
        w if w < 1.0 => Some("very thin"),
        w if w < 2.0 => None,
        w if w < 3.0 => Some("thick"),
        w if w < 4.0 => Some("very thick"),
        _ => Some("ultra thick"),
    }
}

pub fn pattern(pattern: StrokePattern) -> Option<&'static str> {
    match pattern {
        StrokePattern::Solid => None,
        StrokePattern::Dashed => Some("dashed"),
        StrokePattern::Dotted => Some("dotted"),
        StrokePattern::DashDot => Some("dash dot"),
    }
}

fn arrow_tip(style: ArrowStyle, at_start: bool) -> &'static str {
    match style {
        ArrowStyle::None => "",
        ArrowStyle::Arrow if at_start => "<",
        ArrowStyle::Arrow => ">",
        ArrowStyle::Stealth => "Stealth",
        ArrowStyle::Latex => "Latex",
        ArrowStyle::Bar => "Bar",
    }
}

/// 箭头规格（如 `<->`、`-Stealth`）；两端都没有箭头时返回 None
pub fn arrows(start: ArrowStyle, end: ArrowStyle) -> Option<String> {
    if start == ArrowStyle::None && end == ArrowStyle::None {
        return None;
    }
    Some(format!("{}-{}", arrow_tip(start, true), arrow_tip(end, false)))
}

fn opacity(value: f64) -> Option<String> {
    (value.is_finite() && value < 1.0).then(|| num(value.max(0.0)))
}

/// 选项列表构建器
#[derive(Debug, Default)]
pub struct DrawOptions {
    items: Vec<String>,
}

impl DrawOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: impl Into<String>) -> &mut Self {
        self.items.push(item.into());
        self
    }

    pub fn push_opt(&mut self, item: Option<impl Into<String>>) -> &mut Self {
        if let Some(item) = item {
            self.items.push(item.into());
        }
        self
    }

    /// 描边：颜色、不透明度、线宽、线型
    pub fn stroke(&mut self, style: &Style, colors: &mut ColorRegistry) -> &mut Self {
        self.items.push(colors.name(style.stroke));
        if let Some(o) = opacity(style.stroke_opacity) {
            self.items.push(format!("draw opacity={o}"));
        }
        self.push_opt(line_width(style.stroke_width));
        self.push_opt(pattern(style.pattern));
        self
    }

    /// 填充（无填充时不输出）
    pub fn fill(&mut self, style: &Style, colors: &mut ColorRegistry) -> &mut Self {
        if let Some(fill) = style.fill {
            self.items.push(format!("fill={}", colors.name(fill)));
            if let Some(o) = opacity(style.fill_opacity) {
                self.items.push(format!("fill opacity={o}"));
            }
        }
        self
    }

    /// 实心点/文字颜色：整体不透明度
    pub fn solid(&mut self, style: &Style, colors: &mut ColorRegistry) -> &mut Self {
        self.items.push(colors.name(style.stroke));
        if let Some(o) = opacity(style.stroke_opacity) {
            self.items.push(format!("opacity={o}"));
        }
        self
    }

    /// `[a, b]`；为空时返回空字符串
    pub fn render(&self) -> String {
        if self.items.is_empty() {
            String::new()
        } else {
            format!("[{}]", self.items.join(", "))
        }
    }
}
