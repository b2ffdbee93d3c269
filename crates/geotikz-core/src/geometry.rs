//! 几何计算
//!
//! 无状态的纯数值函数，只处理坐标：
//! - 中点、距离、夹角
//! - 垂线/平行线方向
//! - 点到线段、圆周的投影

use crate::math::{Point2, Vector2, EPSILON};

/// 构造线（垂线、平行线、中垂线）在参考点两侧各延伸的长度
pub const CONSTRUCTION_HALF_LENGTH: f64 = 100.0;

/// 两点中点（逐轴算术平均）
pub fn midpoint(a: Point2, b: Point2) -> Point2 {
    Point2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

pub fn distance(a: Point2, b: Point2) -> f64 {
    (b - a).norm()
}

/// 向量 (A - 顶点) 与 (C - 顶点) 的夹角，单位为度，范围 [0, 180]
///
/// 余弦值在反余弦之前先钳制到 [-1, 1]。任一向量退化为零时返回 0。
pub fn angle_degrees(a: Point2, vertex: Point2, c: Point2) -> f64 {
    let v1 = a - vertex;
    let v2 = c - vertex;
    let len = v1.norm() * v2.norm();
    if len < EPSILON {
        return 0.0;
    }
    let cos = (v1.dot(&v2) / len).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// 逆时针旋转 90°（交换分量并取反其一）
pub fn rotate_90(v: Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}

/// 单位方向；零向量返回 None
pub fn unit_direction(from: Point2, to: Point2) -> Option<Vector2> {
    let d = to - from;
    let len = d.norm();
    (len >= EPSILON).then(|| d / len)
}

/// 以 `center` 为中点、沿 `direction`（单位向量）两侧各延伸 `half_length` 的线段
pub fn segment_through(center: Point2, direction: Vector2, half_length: f64) -> [Point2; 2] {
    [center - direction * half_length, center + direction * half_length]
}

/// 过 P 的垂线端点，基线为 (p1, p2)；基线退化时返回 None
pub fn perpendicular_through(p1: Point2, p2: Point2, p: Point2) -> Option<[Point2; 2]> {
    let dir = unit_direction(p1, p2)?;
    Some(segment_through(p, rotate_90(dir), CONSTRUCTION_HALF_LENGTH))
}

/// 过 P 的平行线端点，基线为 (p1, p2)；基线退化时返回 None
pub fn parallel_through(p1: Point2, p2: Point2, p: Point2) -> Option<[Point2; 2]> {
    let dir = unit_direction(p1, p2)?;
    Some(segment_through(p, dir, CONSTRUCTION_HALF_LENGTH))
}

/// 线段 AB 的中垂线端点；A、B 重合时返回 None
pub fn perpendicular_bisector(a: Point2, b: Point2) -> Option<[Point2; 2]> {
    let dir = unit_direction(a, b)?;
    Some(segment_through(midpoint(a, b), rotate_90(dir), CONSTRUCTION_HALF_LENGTH))
}

/// 点在线段上的投影：参数 t 钳制到 [0, 1]
pub fn project_onto_segment(start: Point2, end: Point2, point: Point2) -> Point2 {
    let v = end - start;
    let len_sq = v.dot(&v);
    if len_sq < EPSILON {
        return start;
    }
    let t = ((point - start).dot(&v) / len_sq).clamp(0.0, 1.0);
    start + v * t
}

/// 点沿径向投影到圆周；与圆心重合时返回圆心
pub fn project_onto_circle(center: Point2, radius: f64, point: Point2) -> Point2 {
    let v = point - center;
    let d = v.norm();
    if d < EPSILON {
        return center;
    }
    center + v * (radius / d)
}
