//! 视图范围拟合
//!
//! 1. 计算所有可见对象的精确包络（输出单位），可选包含名称标签
//! 2. 按跨度加边距：`max(0.5, 10%)`
//! 3. 每个轴独立按"整齐"步长向外取整
//! 4. 跨度小于最小值时以内容中心为中心扩展到最小值

use crate::label::{self, DEFAULT_LABEL_FONT_SIZE};
use crate::options::CoordinateTransform;
use geotikz_core::math::{BoundingBox2, Point2};
use geotikz_core::object::{estimate_text_size, DrawingObject, Shape};

/// 最小边距（单位）
pub const MIN_PADDING: f64 = 0.5;
/// 边距占跨度的比例
pub const PADDING_RATIO: f64 = 0.1;
/// 最小可视跨度（单位）
pub const MIN_RANGE: f64 = 4.0;
/// 空场景的半宽
pub const EMPTY_HALF_RANGE: f64 = 5.0;

/// 输出单位下的视图范围
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl ViewBounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn contains_origin_x(&self) -> bool {
        self.min_x <= 0.0 && self.max_x >= 0.0
    }

    pub fn contains_origin_y(&self) -> bool {
        self.min_y <= 0.0 && self.max_y >= 0.0
    }
}

impl Default for ViewBounds {
    fn default() -> Self {
        Self {
            min_x: -EMPTY_HALF_RANGE,
            max_x: EMPTY_HALF_RANGE,
            min_y: -EMPTY_HALF_RANGE,
            max_y: EMPTY_HALF_RANGE,
        }
    }
}

/// 按跨度选择取整步长
pub fn nice_step(range: f64) -> f64 {
    match range {
        r if r < 2.0 => 0.5,
        r if r < 10.0 => 1.0,
        r if r < 40.0 => 2.0,
        r if r < 100.0 => 5.0,
        _ => 10.0,
    }
}

/// 单个对象的包络（输出单位）
pub fn object_envelope(
    object: &DrawingObject,
    transform: &CoordinateTransform,
) -> Option<BoundingBox2> {
    match &object.shape {
        // 函数图像的定义域已经是输出单位，值域未知时只取 x 轴
        Shape::Function { domain, .. } => Some(BoundingBox2::from_corners(
            Point2::new(domain.0, 0.0),
            Point2::new(domain.1, 0.0),
        )),
        shape => {
            let bbox = shape.bounding_box()?;
            Some(BoundingBox2::from_corners(transform.point(bbox.min), transform.point(bbox.max)))
        }
    }
}

/// 名称标签的估算占位（输出单位）
pub fn label_envelope(
    object: &DrawingObject,
    transform: &CoordinateTransform,
) -> Option<BoundingBox2> {
    let placed = label::placement(object)?;
    let font = object.label.font_size.unwrap_or(DEFAULT_LABEL_FONT_SIZE);
    let (w, h) = estimate_text_size(&object.name, font);
    let center = transform.point(placed.position);
    // 标签可能位于锚点任意一侧，取两侧的保守包络
    let half_w = transform.length(w);
    let half_h = transform.length(h);
    Some(BoundingBox2::new(
        Point2::new(center.x - half_w, center.y - half_h),
        Point2::new(center.x + half_w, center.y + half_h),
    ))
}

/// 全部可见对象的内容包络
pub fn content_envelope(
    objects: &[DrawingObject],
    transform: &CoordinateTransform,
    include_labels: bool,
) -> Option<BoundingBox2> {
    let mut bbox = BoundingBox2::empty();
    for object in objects.iter().filter(|o| o.visible) {
        if let Some(env) = object_envelope(object, transform) {
            bbox.union(&env);
        }
        if include_labels {
            if let Some(env) = label_envelope(object, transform) {
                bbox.union(&env);
            }
        }
    }
    (!bbox.is_empty() && bbox.min.x.is_finite() && bbox.max.y.is_finite()).then_some(bbox)
}

/// 单轴：加边距、取整、保证最小跨度
fn fit_axis(min: f64, max: f64) -> (f64, f64) {
    let range = max - min;
    let padding = MIN_PADDING.max(range * PADDING_RATIO);
    let (padded_min, padded_max) = (min - padding, max + padding);

    let step = nice_step(padded_max - padded_min);
    let lo = (padded_min / step).floor() * step;
    let hi = (padded_max / step).ceil() * step;

    if hi - lo < MIN_RANGE {
        let center = (min + max) / 2.0;
        (center - MIN_RANGE / 2.0, center + MIN_RANGE / 2.0)
    } else {
        (lo, hi)
    }
}

/// 拟合视图范围；空场景返回 `[-5, 5]²`
pub fn fit_view_bounds(
    objects: &[DrawingObject],
    transform: &CoordinateTransform,
    include_labels: bool,
) -> ViewBounds {
    let Some(content) = content_envelope(objects, transform, include_labels) else {
        return ViewBounds::default();
    };

    let (min_x, max_x) = fit_axis(content.min.x, content.max.x);
    let (min_y, max_y) = fit_axis(content.min.y, content.max.y);
    ViewBounds { min_x, max_x, min_y, max_y }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_steps() {
        assert_eq!(nice_step(1.0), 0.5);
        assert_eq!(nice_step(5.0), 1.0);
        assert_eq!(nice_step(20.0), 2.0);
        assert_eq!(nice_step(60.0), 5.0);
        assert_eq!(nice_step(500.0), 10.0);
    }

    #[test]
    fn test_single_point_axis_is_symmetric() {
        let (lo, hi) = fit_axis(1.0, 1.0);
        assert_eq!(hi - lo, MIN_RANGE);
        assert_eq!((lo + hi) / 2.0, 1.0);
    }

    #[test]
    fn test_large_axis_rounds_outward() {
        let (lo, hi) = fit_axis(0.0, 30.0);
        // 边距 3，步长 2
        assert_eq!((lo, hi), (-4.0, 34.0));
    }

    #[test]
    fn test_empty_scene_default_window() {
        let bounds = fit_view_bounds(&[], &CoordinateTransform::default(), true);
        assert_eq!(bounds, ViewBounds::default());
        assert_eq!(bounds.width(), 10.0);
    }
}
