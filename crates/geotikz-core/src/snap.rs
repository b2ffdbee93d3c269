//! 点捕捉
//!
//! 在捕捉半径内寻找离光标最近的已有点：
//! - 单锚点对象（点、圆心、矩形/图片左上角、文本中心）捕捉锚点
//! - 多点对象捕捉每个顶点，并区分起点/终点/中间顶点
//! - 网格点捕捉
//!
//! 距离相同时保留先遍历到的候选（先对象、后顶点）。

use crate::math::Point2;
use crate::object::{DrawingObject, ObjectId, Shape};
use serde::{Deserialize, Serialize};

/// 捕捉类型，只用于调用方决定标记样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapKind {
    /// 普通点（单锚点对象）
    Point,
    /// 线段起点
    LineStart,
    /// 线段终点
    LineEnd,
    /// 中间顶点 / 多边形顶点
    Vertex,
    /// 网格点
    Grid,
}

impl SnapKind {
    pub fn name(&self) -> &'static str {
        match self {
            SnapKind::Point => "point",
            SnapKind::LineStart => "line start",
            SnapKind::LineEnd => "line end",
            SnapKind::Vertex => "vertex",
            SnapKind::Grid => "grid",
        }
    }
}

/// 捕捉结果
#[derive(Debug, Clone, PartialEq)]
pub struct SnapTarget {
    pub point: Point2,
    pub kind: SnapKind,
    /// 关联的对象（网格捕捉时为 None）
    pub object_id: Option<ObjectId>,
    /// 到光标的距离
    pub distance: f64,
}

impl SnapTarget {
    pub fn new(point: Point2, kind: SnapKind, object_id: Option<ObjectId>, distance: f64) -> Self {
        Self {
            point,
            kind,
            object_id,
            distance,
        }
    }
}

/// 捕捉引擎
#[derive(Debug, Clone, Default)]
pub struct SnapEngine {
    /// 缓存的候选捕捉点
    candidates: Vec<SnapTarget>,
}

impl SnapEngine {
    pub fn new() -> Self {
        Self {
            candidates: Vec::with_capacity(64),
        }
    }

    /// 寻找半径内最近的捕捉点
    pub fn find_nearest(
        &mut self,
        objects: &[DrawingObject],
        cursor: Point2,
        radius: f64,
    ) -> Option<SnapTarget> {
        self.find_nearest_excluding(objects, cursor, radius, None)
    }

    /// 同 `find_nearest`，但跳过指定对象（拖拽对象时不捕捉自身）
    pub fn find_nearest_excluding(
        &mut self,
        objects: &[DrawingObject],
        cursor: Point2,
        radius: f64,
        exclude: Option<ObjectId>,
    ) -> Option<SnapTarget> {
        self.candidates.clear();

        for object in objects.iter().filter(|o| o.visible && Some(o.id) != exclude) {
            self.collect_object_points(object, cursor, radius);
        }

        // 严格小于：距离相同时保留先遍历到的候选
        let mut best: Option<&SnapTarget> = None;
        for candidate in &self.candidates {
            if best.map_or(true, |b| candidate.distance < b.distance) {
                best = Some(candidate);
            }
        }
        best.cloned()
    }

    /// 收集单个对象的候选点
    fn collect_object_points(&mut self, object: &DrawingObject, cursor: Point2, radius: f64) {
        match &object.shape {
            Shape::Function { .. } => {}
            Shape::Polygon { points } => {
                for &p in points {
                    self.push_candidate(p, SnapKind::Vertex, object.id, cursor, radius);
                }
            }
            Shape::Angle { points, .. } => {
                for &p in points {
                    self.push_candidate(p, SnapKind::Vertex, object.id, cursor, radius);
                }
            }
            shape => match shape.vertices() {
                Some(points) => {
                    let last = points.len().saturating_sub(1);
                    for (i, &p) in points.iter().enumerate() {
                        let kind = if i == 0 {
                            SnapKind::LineStart
                        } else if i == last {
                            SnapKind::LineEnd
                        } else {
                            SnapKind::Vertex
                        };
                        self.push_candidate(p, kind, object.id, cursor, radius);
                    }
                }
                None => {
                    self.push_candidate(shape.anchor(), SnapKind::Point, object.id, cursor, radius);
                }
            },
        }
    }

    fn push_candidate(
        &mut self,
        point: Point2,
        kind: SnapKind,
        id: ObjectId,
        cursor: Point2,
        radius: f64,
    ) {
        let dist = (point - cursor).norm();
        if dist <= radius {
            self.candidates.push(SnapTarget::new(point, kind, Some(id), dist));
        }
    }
}

/// 网格捕捉：取最近的网格交点，超出容差时返回 None
pub fn snap_to_grid(cursor: Point2, spacing: f64, tolerance: f64) -> Option<SnapTarget> {
    if spacing <= 0.0 {
        return None;
    }
    let grid_point = Point2::new(
        (cursor.x / spacing).round() * spacing,
        (cursor.y / spacing).round() * spacing,
    );
    let dist = (grid_point - cursor).norm();
    (dist <= tolerance).then(|| SnapTarget::new(grid_point, SnapKind::Grid, None, dist))
}
