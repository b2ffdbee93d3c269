//! 绘制/构造进行中的状态
//!
//! 交互层把指针点击转换成 `push_point` / `push_ref`，收集到足够的输入后
//! 由 `build` 生成待添加的对象载荷。

use crate::construct;
use crate::geometry;
use crate::math::Point2;
use crate::object::{DrawingObject, ObjectDraft, ObjectId, Shape};

/// 当前绘图工具
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Select,
    Point,
    Line,
    Rectangle,
    Circle,
    Polygon,
    Angle,
    Perpendicular,
    Parallel,
    Midpoint,
    Distance,
    PerpendicularBisector,
}

impl Tool {
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Point => "Point",
            Tool::Line => "Line",
            Tool::Rectangle => "Rectangle",
            Tool::Circle => "Circle",
            Tool::Polygon => "Polygon",
            Tool::Angle => "Angle",
            Tool::Perpendicular => "Perpendicular",
            Tool::Parallel => "Parallel",
            Tool::Midpoint => "Midpoint",
            Tool::Distance => "Distance",
            Tool::PerpendicularBisector => "Perpendicular Bisector",
        }
    }

    /// 自动完成所需的（点数, 对象引用数）；多边形需显式完成，返回 None
    pub fn required_inputs(&self) -> Option<(usize, usize)> {
        match self {
            Tool::Select | Tool::Polygon => None,
            Tool::Point => Some((1, 0)),
            Tool::Line | Tool::Rectangle | Tool::Circle => Some((2, 0)),
            Tool::Angle => Some((3, 0)),
            Tool::Perpendicular | Tool::Parallel => Some((1, 1)),
            Tool::Midpoint | Tool::Distance | Tool::PerpendicularBisector => Some((0, 2)),
        }
    }
}

/// 进行中的绘制
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftState {
    pub tool: Tool,
    pub points: Vec<Point2>,
    pub refs: Vec<ObjectId>,
}

impl DraftState {
    pub fn new(tool: Tool) -> Self {
        Self {
            tool,
            points: Vec::new(),
            refs: Vec::new(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.points.is_empty() && self.refs.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.refs.clear();
    }

    /// 是否已收集到自动完成所需的输入
    pub fn is_complete(&self) -> bool {
        match self.tool.required_inputs() {
            Some((points, refs)) => self.points.len() >= points && self.refs.len() >= refs,
            None => false,
        }
    }

    /// 根据已收集的输入生成对象载荷；输入不足或引用失效时返回 None
    pub fn build(&self, objects: &[DrawingObject], name: String) -> Option<ObjectDraft> {
        let find = |i: usize| find_ref(objects, &self.refs, i);

        match self.tool {
            Tool::Select => None,
            Tool::Point => {
                let p = *self.points.first()?;
                Some(ObjectDraft::point(name, p.x, p.y))
            }
            Tool::Line => match self.points.as_slice() {
                [a, b, ..] => Some(ObjectDraft::line(name, *a, *b)),
                _ => None,
            },
            Tool::Rectangle => match self.points.as_slice() {
                [a, b, ..] => {
                    let top_left = Point2::new(a.x.min(b.x), a.y.min(b.y));
                    let (width, height) = ((b.x - a.x).abs(), (b.y - a.y).abs());
                    Some(ObjectDraft::rectangle(name, top_left, width, height))
                }
                _ => None,
            },
            Tool::Circle => match self.points.as_slice() {
                [center, rim, ..] => {
                    Some(ObjectDraft::circle(name, *center, geometry::distance(*center, *rim)))
                }
                _ => None,
            },
            Tool::Polygon => {
                if self.points.len() < 3 {
                    return None;
                }
                Some(ObjectDraft::new(name, Shape::Polygon { points: self.points.clone() }))
            }
            Tool::Angle => match self.points.as_slice() {
                [a, vertex, c, ..] => Some(construct::angle_marker(name, *a, *vertex, *c)),
                _ => None,
            },
            Tool::Perpendicular => {
                construct::perpendicular_line(name, Some(find(0)?), *self.points.first()?)
            }
            Tool::Parallel => construct::parallel_line(name, Some(find(0)?), *self.points.first()?),
            Tool::Midpoint => Some(construct::midpoint(name, find(0)?, find(1)?)),
            Tool::Distance => Some(construct::distance(name, find(0)?, find(1)?)),
            Tool::PerpendicularBisector => {
                construct::perpendicular_bisector(name, find(0)?, find(1)?)
            }
        }
    }
}

fn find_ref<'a>(
    objects: &'a [DrawingObject],
    refs: &[ObjectId],
    i: usize,
) -> Option<&'a DrawingObject> {
    let id = *refs.get(i)?;
    objects.iter().find(|o| o.id == id)
}
