//! 生成选项与坐标变换

use geotikz_core::math::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// 每个输出单位对应的像素数
pub const PIXELS_PER_UNIT: f64 = 50.0;

/// 像素坐标 → 输出单位坐标
///
/// 原点固定，不随对象集合变化，因此无关的编辑不会改变已有对象的输出坐标。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinateTransform {
    /// 作为输出原点的像素坐标
    pub origin: Point2,
    pub pixels_per_unit: f64,
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self {
            origin: Point2::origin(),
            pixels_per_unit: PIXELS_PER_UNIT,
        }
    }
}

impl CoordinateTransform {
    fn scale(&self) -> f64 {
        if self.pixels_per_unit.is_finite() && self.pixels_per_unit > 0.0 {
            self.pixels_per_unit
        } else {
            PIXELS_PER_UNIT
        }
    }

    /// 点变换（Y 轴翻转）
    pub fn point(&self, p: Point2) -> Point2 {
        let s = self.scale();
        Point2::new((p.x - self.origin.x) / s, -(p.y - self.origin.y) / s)
    }

    /// 向量变换（不含平移）
    pub fn vector(&self, v: Vector2) -> Vector2 {
        let s = self.scale();
        Vector2::new(v.x / s, -v.y / s)
    }

    /// 长度变换
    pub fn length(&self, len: f64) -> f64 {
        len / self.scale()
    }
}

/// 生成选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// 输出完整的 standalone 文档
    pub standalone: bool,
    /// 网格、坐标轴与刻度
    pub coordinate_system: bool,
    /// 每个对象前的 `% <类型> <名称>` 注释
    pub name_comments: bool,
    /// 对象名称标签
    pub name_labels: bool,
    /// 视图范围是否包含名称标签
    pub labels_in_bounds: bool,
    pub transform: CoordinateTransform,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            standalone: true,
            coordinate_system: true,
            name_comments: true,
            name_labels: true,
            labels_in_bounds: true,
            transform: CoordinateTransform::default(),
        }
    }
}
