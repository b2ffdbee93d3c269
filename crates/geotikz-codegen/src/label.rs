//! 名称标签定位

use geotikz_core::math::Point2;
use geotikz_core::object::{DrawingObject, Shape};

/// 未指定字号时用于估算标签尺寸的像素字号
pub const DEFAULT_LABEL_FONT_SIZE: f64 = 14.0;

/// 标签位置（像素坐标）和 TikZ 节点方位
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    pub position: Point2,
    /// 使用用户偏移时为 None（节点居中于偏移点）
    pub anchor: Option<&'static str>,
}

/// 计算名称标签位置；文本和函数图像没有名称标签
pub fn placement(object: &DrawingObject) -> Option<LabelPlacement> {
    if object.name.is_empty() || !object.label.visible {
        return None;
    }
    if matches!(object.shape, Shape::Text { .. } | Shape::Function { .. }) {
        return None;
    }

    if let Some(offset) = object.label.offset {
        return Some(LabelPlacement {
            position: object.anchor() + offset,
            anchor: None,
        });
    }

    let (position, anchor) = match &object.shape {
        Shape::Point { position } | Shape::Midpoint { position, .. } => (*position, "above right"),
        // 画布 Y 轴向下，圆的顶部是 center.y - radius
        Shape::Circle { center, radius } => (Point2::new(center.x, center.y - radius), "above"),
        Shape::Rectangle { position, width, height } => {
            (Point2::new(position.x + width, position.y + height / 2.0), "right")
        }
        Shape::Image { position, width, .. } => {
            (Point2::new(position.x + width / 2.0, position.y), "above")
        }
        Shape::Angle { points, .. } => (points[1], "below left"),
        Shape::Polygon { points } => (points.first().copied()?, "above left"),
        shape => match shape.vertices()? {
            [a, b, ..] => (Point2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0), "above"),
            [a] => (*a, "above"),
            [] => return None,
        },
    };
    Some(LabelPlacement { position, anchor: Some(anchor) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotikz_core::math::Vector2;
    use geotikz_core::object::ObjectDraft;
    use geotikz_core::properties::LabelStyle;
    use geotikz_core::store::ObjectStore;

    fn build(draft: ObjectDraft) -> DrawingObject {
        let mut store = ObjectStore::new();
        let id = store.add_object(draft);
        store.get(id).cloned().unwrap()
    }

    #[test]
    fn test_default_positions() {
        let circle = build(ObjectDraft::circle("c", Point2::new(0.0, 0.0), 10.0));
        let placed = placement(&circle).unwrap();
        assert_eq!(placed.position, Point2::new(0.0, -10.0));
        assert_eq!(placed.anchor, Some("above"));

        let rect = build(ObjectDraft::rectangle("r", Point2::new(0.0, 0.0), 20.0, 10.0));
        let placed = placement(&rect).unwrap();
        assert_eq!(placed.position, Point2::new(20.0, 5.0));
        assert_eq!(placed.anchor, Some("right"));

        let line = build(ObjectDraft::line("l", Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)));
        assert_eq!(placement(&line).unwrap().position, Point2::new(5.0, 0.0));
    }

    #[test]
    fn test_user_offset_and_hidden_label() {
        let label = LabelStyle { offset: Some(Vector2::new(5.0, 5.0)), ..LabelStyle::default() };
        let point = build(ObjectDraft::point("A", 1.0, 1.0).with_label(label));
        let placed = placement(&point).unwrap();
        assert_eq!(placed.position, Point2::new(6.0, 6.0));
        assert_eq!(placed.anchor, None);

        let hidden = LabelStyle { visible: false, ..LabelStyle::default() };
        let point = build(ObjectDraft::point("A", 1.0, 1.0).with_label(hidden));
        assert!(placement(&point).is_none());
    }
}
