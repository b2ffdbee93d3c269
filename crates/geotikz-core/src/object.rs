//! 图形对象
//!
//! `DrawingObject` 由公共属性（标识、名称、可见性、样式、标签、约束）
//! 和按类型区分的 `Shape` 组成。每种类型只携带自己需要的字段。
//!
//! 坐标均为画布像素坐标（Y 轴向下）。

use crate::constraint::Constraint;
use crate::math::{BoundingBox2, Point2, Vector2};
use crate::properties::{FontSpec, LabelStyle, Style};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 对象ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl ObjectId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 线段端点箭头样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ArrowStyle {
    #[default]
    None,
    Arrow,
    Stealth,
    Latex,
    Bar,
}

/// 图片变换
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageTransform {
    /// 旋转角度（度，画布坐标系下顺时针为正）
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            flip_x: false,
            flip_y: false,
        }
    }
}

/// 按类型区分的几何数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Shape {
    Point {
        position: Point2,
    },
    Line {
        points: Vec<Point2>,
        #[serde(default)]
        start_arrow: ArrowStyle,
        #[serde(default)]
        end_arrow: ArrowStyle,
    },
    Rectangle {
        /// 左上角
        position: Point2,
        width: f64,
        height: f64,
    },
    Circle {
        center: Point2,
        radius: f64,
    },
    Text {
        /// 文本中心
        position: Point2,
        content: String,
        #[serde(default)]
        font: FontSpec,
    },
    Polygon {
        points: Vec<Point2>,
    },
    /// 角度标记：[A, 顶点, C]
    Angle {
        points: [Point2; 3],
        /// 弧半径（像素）
        radius: f64,
    },
    Perpendicular {
        points: Vec<Point2>,
        base_line_id: ObjectId,
    },
    Parallel {
        points: Vec<Point2>,
        base_line_id: ObjectId,
    },
    Midpoint {
        position: Point2,
        #[serde(default)]
        point_ids: [Option<ObjectId>; 2],
    },
    Distance {
        points: [Point2; 2],
        #[serde(default)]
        point_ids: [Option<ObjectId>; 2],
    },
    PerpendicularBisector {
        points: Vec<Point2>,
        #[serde(default)]
        point_ids: [Option<ObjectId>; 2],
    },
    /// 函数图像，表达式与定义域使用输出坐标单位（TikZ 的 `\x`）
    Function {
        expression: String,
        domain: (f64, f64),
        #[serde(default = "default_samples")]
        samples: u32,
    },
    Image {
        /// 左上角
        position: Point2,
        width: f64,
        height: f64,
        /// 已解码的图片数据（data URL）
        data: String,
        /// 导出时引用的文件名
        #[serde(default)]
        source: Option<String>,
        #[serde(default)]
        transform: ImageTransform,
    },
}

fn default_samples() -> u32 {
    100
}

/// 文本宽度估算系数：拉丁字符约为字号的 0.6 倍
const CHAR_WIDTH_FACTOR: f64 = 0.6;

/// 估算文本尺寸（宽, 高）
pub fn estimate_text_size(content: &str, font_size: f64) -> (f64, f64) {
    let lines: Vec<&str> = content.lines().collect();
    let line_count = lines.len().max(1);
    let widest = lines
        .iter()
        .map(|line| {
            line.chars()
                .map(|c| if is_cjk(c) { font_size } else { font_size * CHAR_WIDTH_FACTOR })
                .sum::<f64>()
        })
        .fold(0.0, f64::max);
    (widest, font_size * line_count as f64)
}

fn is_cjk(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}')
}

impl Shape {
    /// 类型标签（与序列化的 `type` 字段一致）
    pub fn type_name(&self) -> &'static str {
        match self {
            Shape::Point { .. } => "point",
            Shape::Line { .. } => "line",
            Shape::Rectangle { .. } => "rectangle",
            Shape::Circle { .. } => "circle",
            Shape::Text { .. } => "text",
            Shape::Polygon { .. } => "polygon",
            Shape::Angle { .. } => "angle",
            Shape::Perpendicular { .. } => "perpendicular",
            Shape::Parallel { .. } => "parallel",
            Shape::Midpoint { .. } => "midpoint",
            Shape::Distance { .. } => "distance",
            Shape::PerpendicularBisector { .. } => "perpendicular-bisector",
            Shape::Function { .. } => "function",
            Shape::Image { .. } => "image",
        }
    }

    /// 锚点：矩形/图片为左上角，圆/文本为中心，多点图形为第一个顶点
    pub fn anchor(&self) -> Point2 {
        match self {
            Shape::Point { position }
            | Shape::Rectangle { position, .. }
            | Shape::Text { position, .. }
            | Shape::Midpoint { position, .. }
            | Shape::Image { position, .. } => *position,
            Shape::Circle { center, .. } => *center,
            Shape::Line { points, .. }
            | Shape::Polygon { points }
            | Shape::Perpendicular { points, .. }
            | Shape::Parallel { points, .. }
            | Shape::PerpendicularBisector { points, .. } => {
                points.first().copied().unwrap_or_else(Point2::origin)
            }
            Shape::Angle { points, .. } => points[0],
            Shape::Distance { points, .. } => points[0],
            Shape::Function { domain, .. } => Point2::new(domain.0, 0.0),
        }
    }

    /// 多点图形的全部顶点；单锚点图形返回 None
    pub fn vertices(&self) -> Option<&[Point2]> {
        match self {
            Shape::Line { points, .. }
            | Shape::Polygon { points }
            | Shape::Perpendicular { points, .. }
            | Shape::Parallel { points, .. }
            | Shape::PerpendicularBisector { points, .. } => Some(points.as_slice()),
            Shape::Angle { points, .. } => Some(&points[..]),
            Shape::Distance { points, .. } => Some(&points[..]),
            _ => None,
        }
    }

    /// 直线类图形的可变顶点（用于端点约束）
    pub fn line_points_mut(&mut self) -> Option<&mut Vec<Point2>> {
        match self {
            Shape::Line { points, .. }
            | Shape::Perpendicular { points, .. }
            | Shape::Parallel { points, .. }
            | Shape::PerpendicularBisector { points, .. } => Some(points),
            _ => None,
        }
    }

    /// 是否为直线类图形（几何构造的基线）
    pub fn is_line_like(&self) -> bool {
        matches!(
            self,
            Shape::Line { .. }
                | Shape::Perpendicular { .. }
                | Shape::Parallel { .. }
                | Shape::PerpendicularBisector { .. }
        )
    }

    /// 平移
    pub fn translate(&mut self, delta: Vector2) {
        match self {
            Shape::Point { position }
            | Shape::Rectangle { position, .. }
            | Shape::Text { position, .. }
            | Shape::Midpoint { position, .. }
            | Shape::Image { position, .. } => *position += delta,
            Shape::Circle { center, .. } => *center += delta,
            Shape::Line { points, .. }
            | Shape::Polygon { points }
            | Shape::Perpendicular { points, .. }
            | Shape::Parallel { points, .. }
            | Shape::PerpendicularBisector { points, .. } => {
                points.iter_mut().for_each(|p| *p += delta);
            }
            Shape::Angle { points, .. } => points.iter_mut().for_each(|p| *p += delta),
            Shape::Distance { points, .. } => points.iter_mut().for_each(|p| *p += delta),
            // 函数图像位于输出坐标系，不随画布拖拽移动
            Shape::Function { .. } => {}
        }
    }

    /// 像素坐标下的几何包围盒；函数图像不在画布坐标系中，返回 None
    pub fn bounding_box(&self) -> Option<BoundingBox2> {
        let bbox = match self {
            Shape::Point { position } | Shape::Midpoint { position, .. } => {
                BoundingBox2::new(*position, *position)
            }
            Shape::Rectangle { position, width, height } => BoundingBox2::from_corners(
                *position,
                Point2::new(position.x + width, position.y + height),
            ),
            Shape::Circle { center, radius } => BoundingBox2::new(
                Point2::new(center.x - radius, center.y - radius),
                Point2::new(center.x + radius, center.y + radius),
            ),
            Shape::Text { position, content, font } => {
                let (w, h) = estimate_text_size(content, font.size);
                BoundingBox2::new(
                    Point2::new(position.x - w / 2.0, position.y - h / 2.0),
                    Point2::new(position.x + w / 2.0, position.y + h / 2.0),
                )
            }
            Shape::Angle { points, .. } => BoundingBox2::from_points(points.iter().copied()),
            Shape::Distance { points, .. } => BoundingBox2::from_points(points.iter().copied()),
            Shape::Line { points, .. }
            | Shape::Polygon { points }
            | Shape::Perpendicular { points, .. }
            | Shape::Parallel { points, .. }
            | Shape::PerpendicularBisector { points, .. } => {
                BoundingBox2::from_points(points.iter().copied())
            }
            Shape::Image { position, width, height, transform, .. } => {
                rotated_rect_envelope(*position, *width, *height, transform)
            }
            Shape::Function { .. } => return None,
        };
        (!bbox.is_empty()).then_some(bbox)
    }
}

/// 旋转（并缩放）后的图片矩形包络
fn rotated_rect_envelope(
    position: Point2,
    width: f64,
    height: f64,
    transform: &ImageTransform,
) -> BoundingBox2 {
    let center = Point2::new(position.x + width / 2.0, position.y + height / 2.0);
    let half_w = (width * transform.scale_x).abs() / 2.0;
    let half_h = (height * transform.scale_y).abs() / 2.0;
    let (sin_r, cos_r) = transform.rotation.to_radians().sin_cos();

    BoundingBox2::from_points([(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)].map(
        |(sx, sy)| {
            let dx = sx * half_w;
            let dy = sy * half_h;
            Point2::new(
                center.x + dx * cos_r - dy * sin_r,
                center.y + dx * sin_r + dy * cos_r,
            )
        },
    ))
}

/// 场景中的图形对象
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingObject {
    pub id: ObjectId,
    pub name: String,
    /// 创建时间戳（毫秒），只用于稳定的绘制/序列化顺序
    pub created_at: i64,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub label: LabelStyle,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
    #[serde(flatten)]
    pub shape: Shape,
}

fn default_true() -> bool {
    true
}

impl DrawingObject {
    pub fn anchor(&self) -> Point2 {
        self.shape.anchor()
    }

    pub fn type_name(&self) -> &'static str {
        self.shape.type_name()
    }

    /// 是否有约束指向目标对象
    pub fn depends_on(&self, target: ObjectId) -> bool {
        self.constraints.iter().any(|c| c.target_id == target)
    }
}

/// 新建对象的载荷：除 ID 和时间戳外的全部字段
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDraft {
    pub name: String,
    pub visible: bool,
    pub style: Style,
    pub label: LabelStyle,
    pub constraints: Vec<Constraint>,
    pub shape: Shape,
}

impl ObjectDraft {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            visible: true,
            style: Style::default(),
            label: LabelStyle::default(),
            constraints: Vec::new(),
            shape,
        }
    }

    pub fn point(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self::new(name, Shape::Point { position: Point2::new(x, y) })
    }

    pub fn line(name: impl Into<String>, start: Point2, end: Point2) -> Self {
        Self::new(
            name,
            Shape::Line {
                points: vec![start, end],
                start_arrow: ArrowStyle::None,
                end_arrow: ArrowStyle::None,
            },
        )
    }

    pub fn circle(name: impl Into<String>, center: Point2, radius: f64) -> Self {
        Self::new(name, Shape::Circle { center, radius })
    }

    pub fn rectangle(name: impl Into<String>, top_left: Point2, width: f64, height: f64) -> Self {
        Self::new(name, Shape::Rectangle { position: top_left, width, height })
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_label(mut self, label: LabelStyle) -> Self {
        self.label = label;
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub(crate) fn into_object(self, id: ObjectId, created_at: i64) -> DrawingObject {
        DrawingObject {
            id,
            name: self.name,
            created_at,
            visible: self.visible,
            selected: false,
            style: self.style,
            label: self.label,
            constraints: self.constraints,
            shape: self.shape,
        }
    }
}

/// 部分字段更新
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectPatch {
    pub name: Option<String>,
    pub visible: Option<bool>,
    pub style: Option<Style>,
    pub label: Option<LabelStyle>,
    pub constraints: Option<Vec<Constraint>>,
    pub shape: Option<Shape>,
}

impl ObjectPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Default::default() }
    }

    pub fn visible(visible: bool) -> Self {
        Self { visible: Some(visible), ..Default::default() }
    }

    pub fn style(style: Style) -> Self {
        Self { style: Some(style), ..Default::default() }
    }

    pub fn shape(shape: Shape) -> Self {
        Self { shape: Some(shape), ..Default::default() }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// 合并到对象上
    pub fn apply_to(self, object: &mut DrawingObject) {
        if let Some(name) = self.name {
            object.name = name;
        }
        if let Some(visible) = self.visible {
            object.visible = visible;
        }
        if let Some(style) = self.style {
            object.style = style;
        }
        if let Some(label) = self.label {
            object.label = label;
        }
        if let Some(constraints) = self.constraints {
            object.constraints = constraints;
        }
        if let Some(shape) = self.shape {
            object.shape = shape;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_semantics() {
        let rect = Shape::Rectangle { position: Point2::new(10.0, 20.0), width: 5.0, height: 5.0 };
        assert_eq!(rect.anchor(), Point2::new(10.0, 20.0));

        let circle = Shape::Circle { center: Point2::new(3.0, 4.0), radius: 2.0 };
        assert_eq!(circle.anchor(), Point2::new(3.0, 4.0));

        let polygon = Shape::Polygon {
            points: vec![Point2::new(1.0, 1.0), Point2::new(2.0, 1.0), Point2::new(2.0, 2.0)],
        };
        assert_eq!(polygon.anchor(), Point2::new(1.0, 1.0));
    }

    #[test]
    fn test_rotated_image_envelope() {
        let image = Shape::Image {
            position: Point2::new(0.0, 0.0),
            width: 20.0,
            height: 10.0,
            data: String::new(),
            source: None,
            transform: ImageTransform { rotation: 90.0, ..Default::default() },
        };
        let bbox = image.bounding_box().unwrap();
        assert!((bbox.width() - 10.0).abs() < 1e-9);
        assert!((bbox.height() - 20.0).abs() < 1e-9);
        assert!((bbox.center().x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_serialized_type_tag() {
        let draft = ObjectDraft::new(
            "b",
            Shape::PerpendicularBisector {
                points: vec![Point2::new(0.0, 0.0), Point2::new(0.0, 1.0)],
                point_ids: [None, None],
            },
        );
        let object = draft.into_object(ObjectId(7), 1);
        let json = serde_json::to_value(&object).unwrap();
        assert_eq!(json["type"], "perpendicular-bisector");
        assert_eq!(json["id"], 7);

        let back: DrawingObject = serde_json::from_value(json).unwrap();
        assert_eq!(back, object);
    }

    #[test]
    fn test_patch_merges_only_present_fields() {
        let mut object = ObjectDraft::point("A", 1.0, 2.0).into_object(ObjectId(1), 1);
        ObjectPatch::name("B").apply_to(&mut object);
        assert_eq!(object.name, "B");
        assert_eq!(object.anchor(), Point2::new(1.0, 2.0));
        assert!(object.visible);
    }
}
