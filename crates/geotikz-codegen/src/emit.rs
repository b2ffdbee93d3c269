//! 单个对象的 TikZ 语句

use crate::color::ColorRegistry;
use crate::format::{coord, escape_latex, num};
use crate::label;
use crate::options::{CoordinateTransform, GeneratorOptions};
use crate::style::{self, DrawOptions};
use crate::writer::TikzWriter;
use geotikz_core::geometry;
use geotikz_core::math::{Point2, Vector2};
use geotikz_core::object::{DrawingObject, ImageTransform, Shape};
use geotikz_core::properties::FontSpec;

/// 点的半径
const POINT_RADIUS: &str = "2pt";
/// 角度数值标签到顶点的距离（相对弧半径）
const ANGLE_LABEL_DISTANCE: f64 = 1.5;

/// 注释中使用的类型名称
pub fn display_name(shape: &Shape) -> &'static str {
    match shape {
        Shape::Point { .. } => "Point",
        Shape::Line { .. } => "Line",
        Shape::Rectangle { .. } => "Rectangle",
        Shape::Circle { .. } => "Circle",
        Shape::Text { .. } => "Text",
        Shape::Polygon { .. } => "Polygon",
        Shape::Angle { .. } => "Angle",
        Shape::Perpendicular { .. } => "Perpendicular",
        Shape::Parallel { .. } => "Parallel",
        Shape::Midpoint { .. } => "Midpoint",
        Shape::Distance { .. } => "Distance",
        Shape::PerpendicularBisector { .. } => "Perpendicular Bisector",
        Shape::Function { .. } => "Function",
        Shape::Image { .. } => "Image",
    }
}

pub struct Emitter<'a> {
    pub transform: &'a CoordinateTransform,
    pub colors: &'a mut ColorRegistry,
}

impl Emitter<'_> {
    fn p(&self, point: Point2) -> String {
        coord(self.transform.point(point))
    }

    fn path(&self, points: &[Point2]) -> String {
        points.iter().map(|p| self.p(*p)).collect::<Vec<_>>().join(" -- ")
    }

    /// 写出对象（名称注释、图形语句、名称标签）
    pub fn write_object(
        &mut self,
        writer: &mut TikzWriter,
        object: &DrawingObject,
        options: &GeneratorOptions,
    ) {
        if options.name_comments {
            writer.comment(&format!("{} {}", display_name(&object.shape), object.name));
        }
        self.write_shape(writer, object);
        if options.name_labels {
            self.write_name_label(writer, object);
        }
    }

    fn write_shape(&mut self, writer: &mut TikzWriter, object: &DrawingObject) {
        let style = &object.style;
        match &object.shape {
            Shape::Point { position } | Shape::Midpoint { position, .. } => {
                let mut opts = DrawOptions::new();
                opts.solid(style, self.colors);
                writer.line(format!(
                    "\\fill{} {} circle ({POINT_RADIUS});",
                    opts.render(),
                    self.p(*position)
                ));
            }
            Shape::Line { points, start_arrow, end_arrow } => {
                if points.len() < 2 {
                    return;
                }
                let mut opts = DrawOptions::new();
                opts.push_opt(style::arrows(*start_arrow, *end_arrow));
                opts.stroke(style, self.colors);
                writer.line(format!("\\draw{} {};", opts.render(), self.path(points)));
            }
            Shape::Perpendicular { points, .. }
            | Shape::Parallel { points, .. }
            | Shape::PerpendicularBisector { points, .. } => {
                if points.len() < 2 {
                    return;
                }
                let mut opts = DrawOptions::new();
                opts.stroke(style, self.colors);
                writer.line(format!("\\draw{} {};", opts.render(), self.path(points)));
            }
            Shape::Polygon { points } => {
                if points.len() < 2 {
                    return;
                }
                let mut opts = DrawOptions::new();
                opts.stroke(style, self.colors).fill(style, self.colors);
                writer.line(format!("\\draw{} {} -- cycle;", opts.render(), self.path(points)));
            }
            Shape::Rectangle { position, width, height } => {
                // 画布左上角 → 输出坐标系的左下角与右上角
                let a = self.transform.point(*position);
                let b = self.transform.point(Point2::new(position.x + width, position.y + height));
                let bottom_left = Point2::new(a.x.min(b.x), a.y.min(b.y));
                let top_right = Point2::new(a.x.max(b.x), a.y.max(b.y));
                let mut opts = DrawOptions::new();
                opts.stroke(style, self.colors).fill(style, self.colors);
                writer.line(format!(
                    "\\draw{} {} rectangle {};",
                    opts.render(),
                    coord(bottom_left),
                    coord(top_right)
                ));
            }
            Shape::Circle { center, radius } => {
                let mut opts = DrawOptions::new();
                opts.stroke(style, self.colors).fill(style, self.colors);
                writer.line(format!(
                    "\\draw{} {} circle ({});",
                    opts.render(),
                    self.p(*center),
                    num(self.transform.length(radius.abs()))
                ));
            }
            Shape::Text { position, content, font } => {
                let mut opts = DrawOptions::new();
                opts.solid(style, self.colors);
                opts.push(format!("font={}", font_command(font)));
                if content.contains('\n') {
                    opts.push("align=center");
                }
                writer.line(format!(
                    "\\node{} at {} {{{}}};",
                    opts.render(),
                    self.p(*position),
                    escape_latex(content)
                ));
            }
            Shape::Angle { points, radius } => self.write_angle(writer, object, points, *radius),
            Shape::Distance { points, .. } => {
                let [a, b] = *points;
                let mut opts = DrawOptions::new();
                opts.stroke(style, self.colors);
                let length = self.transform.length(geometry::distance(a, b));
                writer.line(format!(
                    "\\draw{} {} -- {} node[midway, above, sloped, font=\\footnotesize] {{{}}};",
                    opts.render(),
                    self.p(a),
                    self.p(b),
                    num(length)
                ));
            }
            Shape::Function { expression, domain, samples } => {
                let mut opts = DrawOptions::new();
                opts.stroke(style, self.colors);
                let (lo, hi) = if domain.0 <= domain.1 { *domain } else { (domain.1, domain.0) };
                opts.push(format!("domain={}:{}", num(lo), num(hi)))
                    .push(format!("samples={}", (*samples).max(2)))
                    .push("smooth")
                    .push("variable=\\x");
                let expression = expression.replace(['\n', '\r'], " ");
                writer.line(format!(
                    "\\draw{} plot (\\x, {{{}}});",
                    opts.render(),
                    expression.trim()
                ));
            }
            Shape::Image { position, width, height, source, transform, .. } => {
                let center = Point2::new(position.x + width / 2.0, position.y + height / 2.0);
                let file = source
                    .clone()
                    .unwrap_or_else(|| format!("image-{}.png", object.id));
                let mut opts = DrawOptions::new();
                opts.push("inner sep=0pt");
                image_transform_options(&mut opts, transform);
                writer.line(format!(
                    "\\node{} at {} {{\\includegraphics[width={}cm, height={}cm]{{{}}}}};",
                    opts.render(),
                    self.p(center),
                    num(self.transform.length(width.abs())),
                    num(self.transform.length(height.abs())),
                    file
                ));
            }
        }
    }

    /// 角度标记：最小角的圆弧加数值标签
    fn write_angle(
        &mut self,
        writer: &mut TikzWriter,
        object: &DrawingObject,
        points: &[Point2; 3],
        radius: f64,
    ) {
        let [a, vertex, c] = *points;
        let to_a = self.transform.vector(a - vertex);
        let to_c = self.transform.vector(c - vertex);
        if to_a.norm() < f64::EPSILON || to_c.norm() < f64::EPSILON {
            return;
        }

        let start = direction_degrees(to_a);
        let mut sweep = direction_degrees(to_c) - start;
        // 归一化到 (-180, 180]
        while sweep > 180.0 {
            sweep -= 360.0;
        }
        while sweep <= -180.0 {
            sweep += 360.0;
        }

        let r = self.transform.length(radius.abs());
        let v = self.transform.point(vertex);
        let mut opts = DrawOptions::new();
        opts.stroke(&object.style, self.colors);
        writer.line(format!(
            "\\draw{} {} ++({}:{}) arc[start angle={}, end angle={}, radius={}];",
            opts.render(),
            coord(v),
            num(start),
            num(r),
            num(start),
            num(start + sweep),
            num(r)
        ));

        let mid = (start + sweep / 2.0).to_radians();
        let label_at = v + Vector2::new(mid.cos(), mid.sin()) * (r * ANGLE_LABEL_DISTANCE);
        let value = geometry::angle_degrees(a, vertex, c);
        writer.line(format!(
            "\\node[font=\\footnotesize] at {} {{${}^\\circ$}};",
            coord(label_at),
            num(value)
        ));
    }

    fn write_name_label(&mut self, writer: &mut TikzWriter, object: &DrawingObject) {
        let Some(placed) = label::placement(object) else {
            return;
        };
        let mut opts = DrawOptions::new();
        opts.push_opt(placed.anchor);
        opts.push(self.colors.name(object.label.color.unwrap_or(object.style.stroke)));
        if let Some(size) = object.label.font_size {
            opts.push(format!("font={}", style::font_size_class(size)));
        }
        writer.line(format!(
            "\\node{} at {} {{{}}};",
            opts.render(),
            self.p(placed.position),
            escape_latex(&object.name)
        ));
    }
}

/// 输出坐标系（Y 轴向上）中的方向角（度）
fn direction_degrees(v: Vector2) -> f64 {
    v.y.atan2(v.x).to_degrees()
}

fn font_command(font: &FontSpec) -> String {
    let mut command = style::font_size_class(font.size).to_string();
    if font.bold {
        command.push_str("\\bfseries");
    }
    if font.italic {
        command.push_str("\\itshape");
    }
    command
}

/// 画布旋转为顺时针，输出坐标系为逆时针，因此旋转角取反；翻转用负缩放表示
fn image_transform_options(opts: &mut DrawOptions, transform: &ImageTransform) {
    if transform.rotation != 0.0 {
        opts.push(format!("rotate={}", num(-transform.rotation)));
    }
    let sx = if transform.flip_x { -transform.scale_x } else { transform.scale_x };
    let sy = if transform.flip_y { -transform.scale_y } else { transform.scale_y };
    if sx != 1.0 {
        opts.push(format!("xscale={}", num(sx)));
    }
    if sy != 1.0 {
        opts.push(format!("yscale={}", num(sy)));
    }
}
