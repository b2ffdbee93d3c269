//! 几何构造
//!
//! 基于已有对象生成派生对象（垂线、平行线、中点、角度标记、距离、中垂线），
//! 以及点到曲线的投影。输入不满足条件时返回 None，调用方什么也不添加。

use crate::geometry;
use crate::math::Point2;
use crate::object::{DrawingObject, ObjectDraft, ObjectId, Shape};

/// 角度标记的默认弧半径（像素）
pub const DEFAULT_ANGLE_RADIUS: f64 = 30.0;

/// 取直线类基线的前两个点；基线缺失、类型不符或点数不足时返回 None
fn base_segment(base: Option<&DrawingObject>) -> Option<(ObjectId, Point2, Point2)> {
    let base = base?;
    if !base.shape.is_line_like() {
        return None;
    }
    match base.shape.vertices()? {
        [p1, p2, ..] => Some((base.id, *p1, *p2)),
        _ => None,
    }
}

/// 过点 P 作基线的垂线
pub fn perpendicular_line(
    name: impl Into<String>,
    base: Option<&DrawingObject>,
    through: Point2,
) -> Option<ObjectDraft> {
    let (base_line_id, p1, p2) = base_segment(base)?;
    let [a, b] = geometry::perpendicular_through(p1, p2, through)?;
    Some(ObjectDraft::new(
        name,
        Shape::Perpendicular { points: vec![a, b], base_line_id },
    ))
}

/// 过点 P 作基线的平行线
pub fn parallel_line(
    name: impl Into<String>,
    base: Option<&DrawingObject>,
    through: Point2,
) -> Option<ObjectDraft> {
    let (base_line_id, p1, p2) = base_segment(base)?;
    let [a, b] = geometry::parallel_through(p1, p2, through)?;
    Some(ObjectDraft::new(
        name,
        Shape::Parallel { points: vec![a, b], base_line_id },
    ))
}

/// 两个对象锚点的中点
pub fn midpoint(name: impl Into<String>, a: &DrawingObject, b: &DrawingObject) -> ObjectDraft {
    ObjectDraft::new(
        name,
        Shape::Midpoint {
            position: geometry::midpoint(a.anchor(), b.anchor()),
            point_ids: [Some(a.id), Some(b.id)],
        },
    )
}

/// 两个对象锚点之间的距离标注
pub fn distance(name: impl Into<String>, a: &DrawingObject, b: &DrawingObject) -> ObjectDraft {
    ObjectDraft::new(
        name,
        Shape::Distance {
            points: [a.anchor(), b.anchor()],
            point_ids: [Some(a.id), Some(b.id)],
        },
    )
}

/// 两个对象锚点连线的中垂线；锚点重合时返回 None
pub fn perpendicular_bisector(
    name: impl Into<String>,
    a: &DrawingObject,
    b: &DrawingObject,
) -> Option<ObjectDraft> {
    let [p, q] = geometry::perpendicular_bisector(a.anchor(), b.anchor())?;
    Some(ObjectDraft::new(
        name,
        Shape::PerpendicularBisector {
            points: vec![p, q],
            point_ids: [Some(a.id), Some(b.id)],
        },
    ))
}

/// 角度标记（A, 顶点, C）
pub fn angle_marker(name: impl Into<String>, a: Point2, vertex: Point2, c: Point2) -> ObjectDraft {
    ObjectDraft::new(
        name,
        Shape::Angle {
            points: [a, vertex, c],
            radius: DEFAULT_ANGLE_RADIUS,
        },
    )
}

/// 点到对象曲线上的投影
///
/// - 直线类：投影到前两个点确定的线段上（参数钳制到 [0, 1]）
/// - 圆：沿径向投影到圆周，与圆心重合时返回圆心
/// - 其他类型：None
pub fn project_onto(object: &DrawingObject, point: Point2) -> Option<Point2> {
    match &object.shape {
        Shape::Circle { center, radius } => {
            Some(geometry::project_onto_circle(*center, *radius, point))
        }
        shape if shape.is_line_like() => match shape.vertices()? {
            [start, end, ..] => Some(geometry::project_onto_segment(*start, *end, point)),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(id: u64, draft: ObjectDraft) -> DrawingObject {
        draft.into_object(ObjectId(id), id as i64)
    }

    #[test]
    fn test_perpendicular_requires_line_base() {
        let circle = object(1, ObjectDraft::circle("c", Point2::origin(), 3.0));
        assert!(perpendicular_line("p", Some(&circle), Point2::origin()).is_none());
        assert!(perpendicular_line("p", None, Point2::origin()).is_none());

        let short = object(
            2,
            ObjectDraft::new(
                "l",
                Shape::Line {
                    points: vec![Point2::origin()],
                    start_arrow: Default::default(),
                    end_arrow: Default::default(),
                },
            ),
        );
        assert!(perpendicular_line("p", Some(&short), Point2::origin()).is_none());
    }

    #[test]
    fn test_perpendicular_carries_base_reference() {
        let base = object(3, ObjectDraft::line("l", Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)));
        let draft = perpendicular_line("p", Some(&base), Point2::new(5.0, 5.0)).unwrap();
        match draft.shape {
            Shape::Perpendicular { points, base_line_id } => {
                assert_eq!(base_line_id, ObjectId(3));
                let d = points[1] - points[0];
                assert!(d.x.abs() < 1e-9);
            }
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn test_project_onto_line_and_circle() {
        let line = object(1, ObjectDraft::line("l", Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)));
        assert_eq!(project_onto(&line, Point2::new(20.0, 3.0)), Some(Point2::new(10.0, 0.0)));

        let circle = object(2, ObjectDraft::circle("c", Point2::origin(), 5.0));
        let p = project_onto(&circle, Point2::new(0.0, 12.0)).unwrap();
        assert!((p - Point2::new(0.0, 5.0)).norm() < 1e-9);

        let point = object(3, ObjectDraft::point("A", 1.0, 1.0));
        assert!(project_onto(&point, Point2::origin()).is_none());
    }

    #[test]
    fn test_midpoint_references_inputs() {
        let a = object(1, ObjectDraft::point("A", 0.0, 0.0));
        let b = object(2, ObjectDraft::point("B", 4.0, 0.0));
        let draft = midpoint("M", &a, &b);
        assert_eq!(draft.shape.anchor(), Point2::new(2.0, 0.0));
        assert!(matches!(
            draft.shape,
            Shape::Midpoint { point_ids: [Some(ObjectId(1)), Some(ObjectId(2))], .. }
        ));
    }
}
