//! 数学基础类型
//!
//! 基于 nalgebra 的二维点/向量别名，以及轴对齐包围盒。
//! 所有画布坐标都是像素单位，Y 轴向下。

use serde::{Deserialize, Serialize};

pub type Point2 = nalgebra::Point2<f64>;
pub type Vector2 = nalgebra::Vector2<f64>;

/// 浮点比较容差
pub const EPSILON: f64 = 1e-10;

/// 轴对齐包围盒
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2 {
    pub min: Point2,
    pub max: Point2,
}

impl BoundingBox2 {
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    /// 由两个任意顺序的角点构造（每个轴独立取最小/最大值）
    pub fn from_corners(a: Point2, b: Point2) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// 空包围盒：min 为正无穷，max 为负无穷，扩展任何点后都有效
    pub fn empty() -> Self {
        Self {
            min: Point2::new(f64::INFINITY, f64::INFINITY),
            max: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Point2>) -> Self {
        let mut bbox = Self::empty();
        for p in points {
            bbox.expand_to_include(&p);
        }
        bbox
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn expand_to_include(&mut self, point: &Point2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// 合并另一个包围盒
    pub fn union(&mut self, other: &BoundingBox2) {
        if other.is_empty() {
            return;
        }
        self.expand_to_include(&other.min);
        self.expand_to_include(&other.max);
    }

    /// 包含测试（边界包含在内）
    pub fn contains(&self, point: &Point2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point2 {
        Point2::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_is_order_insensitive() {
        let a = BoundingBox2::from_corners(Point2::new(100.0, 0.0), Point2::new(0.0, 100.0));
        let b = BoundingBox2::from_corners(Point2::new(0.0, 100.0), Point2::new(100.0, 0.0));
        assert_eq!(a, b);
        assert_eq!(a.min, Point2::new(0.0, 0.0));
        assert_eq!(a.max, Point2::new(100.0, 100.0));
    }

    #[test]
    fn test_empty_union() {
        let mut bbox = BoundingBox2::empty();
        assert!(bbox.is_empty());
        bbox.union(&BoundingBox2::empty());
        assert!(bbox.is_empty());
        bbox.expand_to_include(&Point2::new(1.0, 2.0));
        assert!(!bbox.is_empty());
        assert_eq!(bbox.width(), 0.0);
        assert!(bbox.contains(&Point2::new(1.0, 2.0)));
    }
}
