//! 对象间约束
//!
//! 约束是有方向的：目标对象移动后，依赖对象按约束类型跟随。
//! - `Center`：圆心跟随目标锚点
//! - `StartPoint` / `EndPoint`：直线类对象的首/尾端点跟随目标锚点
//!
//! 约束携带的偏移量叠加在目标锚点上。目标不存在时约束不生效。

use crate::math::{Point2, Vector2};
use crate::object::{DrawingObject, ObjectId, Shape};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// 约束类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    Center,
    StartPoint,
    EndPoint,
}

/// 约束定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub target_id: ObjectId,
    #[serde(default = "zero_offset")]
    pub offset: Vector2,
}

fn zero_offset() -> Vector2 {
    Vector2::zeros()
}

impl Constraint {
    pub fn new(kind: ConstraintKind, target_id: ObjectId) -> Self {
        Self {
            kind,
            target_id,
            offset: Vector2::zeros(),
        }
    }

    pub fn with_offset(mut self, offset: Vector2) -> Self {
        self.offset = offset;
        self
    }

    /// 把约束作用到依赖对象上，返回几何是否变化
    fn apply(&self, shape: &mut Shape, target_anchor: Point2) -> bool {
        let goal = target_anchor + self.offset;
        let slot = match (self.kind, shape) {
            (ConstraintKind::Center, Shape::Circle { center, .. }) => Some(center),
            (ConstraintKind::StartPoint, shape) => {
                shape.line_points_mut().and_then(|points| points.first_mut())
            }
            (ConstraintKind::EndPoint, shape) => {
                shape.line_points_mut().and_then(|points| points.last_mut())
            }
            _ => None,
        };

        match slot {
            Some(point) if *point != goal => {
                *point = goal;
                true
            }
            _ => false,
        }
    }
}

fn anchor_of(objects: &[DrawingObject], id: ObjectId) -> Option<Point2> {
    objects.iter().find(|o| o.id == id).map(DrawingObject::anchor)
}

/// 用指定目标集合中对象的当前锚点重新计算一个依赖对象
fn recompute(objects: &mut [DrawingObject], index: usize, sources: &BTreeSet<ObjectId>) -> bool {
    let anchors: Vec<(usize, Point2)> = objects[index]
        .constraints
        .iter()
        .enumerate()
        .filter(|(_, c)| sources.contains(&c.target_id) && c.target_id != objects[index].id)
        .filter_map(|(i, c)| anchor_of(objects, c.target_id).map(|a| (i, a)))
        .collect();

    let object = &mut objects[index];
    let mut changed = false;
    for (i, anchor) in anchors {
        let constraint = object.constraints[i].clone();
        changed |= constraint.apply(&mut object.shape, anchor);
    }
    changed
}

/// 单跳传播：只更新直接依赖目标的对象，不继续传递
///
/// 返回几何发生变化的对象ID（按集合顺序）。
pub fn apply_single_hop(objects: &mut [DrawingObject], target: ObjectId) -> Vec<ObjectId> {
    if anchor_of(objects, target).is_none() {
        return Vec::new();
    }

    let sources = BTreeSet::from([target]);
    let mut changed = Vec::new();
    for index in 0..objects.len() {
        if objects[index].id != target
            && objects[index].depends_on(target)
            && recompute(objects, index, &sources)
        {
            changed.push(objects[index].id);
        }
    }
    changed
}

/// 传递传播：沿依赖图按拓扑顺序更新所有下游对象
///
/// 每个对象最多被重新计算一次。环上的对象在拓扑排序结束后按ID顺序各计算一次，
/// 目标对象本身永远不会被修改，因此传播总会终止。
pub fn propagate(objects: &mut [DrawingObject], target: ObjectId) -> Vec<ObjectId> {
    if anchor_of(objects, target).is_none() {
        return Vec::new();
    }

    // 1. 收集可达的下游对象
    let mut reachable = BTreeSet::from([target]);
    let mut queue = VecDeque::from([target]);
    while let Some(current) = queue.pop_front() {
        for object in objects.iter() {
            if object.depends_on(current) && reachable.insert(object.id) {
                queue.push_back(object.id);
            }
        }
    }

    // 2. 子图内的入度
    let mut in_degree: BTreeMap<ObjectId, usize> = BTreeMap::new();
    for object in objects.iter().filter(|o| reachable.contains(&o.id) && o.id != target) {
        let predecessors: BTreeSet<ObjectId> = object
            .constraints
            .iter()
            .map(|c| c.target_id)
            .filter(|id| reachable.contains(id) && *id != object.id)
            .collect();
        in_degree.insert(object.id, predecessors.len());
    }

    // 3. Kahn 拓扑排序
    let mut order = Vec::with_capacity(in_degree.len());
    let mut done = BTreeSet::from([target]);
    let mut ready = VecDeque::from([target]);
    while let Some(current) = ready.pop_front() {
        for object in objects.iter() {
            if object.id == current || !object.depends_on(current) {
                continue;
            }
            if let Some(degree) = in_degree.get_mut(&object.id) {
                // 同一前驱的多条约束只计一次入度
                if *degree > 0 && !done.contains(&object.id) {
                    *degree -= 1;
                    if *degree == 0 {
                        done.insert(object.id);
                        order.push(object.id);
                        ready.push_back(object.id);
                    }
                }
            }
        }
    }

    // 环上剩余的对象
    let cyclic: Vec<ObjectId> = in_degree.keys().filter(|id| !done.contains(id)).copied().collect();
    if !cyclic.is_empty() {
        tracing::warn!("Constraint cycle detected among {} objects", cyclic.len());
    }
    order.extend(cyclic);

    let mut changed = Vec::new();
    for id in order {
        if let Some(index) = objects.iter().position(|o| o.id == id) {
            if recompute(objects, index, &reachable) {
                changed.push(id);
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectDraft;

    fn point(id: u64, x: f64, y: f64) -> DrawingObject {
        ObjectDraft::point(format!("P{id}"), x, y).into_object(ObjectId(id), id as i64)
    }

    #[test]
    fn test_center_constraint_with_offset() {
        let mut objects = vec![
            point(1, 10.0, 10.0),
            ObjectDraft::circle("c", Point2::origin(), 5.0)
                .with_constraint(
                    Constraint::new(ConstraintKind::Center, ObjectId(1))
                        .with_offset(Vector2::new(1.0, -1.0)),
                )
                .into_object(ObjectId(2), 2),
        ];

        let changed = apply_single_hop(&mut objects, ObjectId(1));
        assert_eq!(changed, vec![ObjectId(2)]);
        assert_eq!(objects[1].anchor(), Point2::new(11.0, 9.0));

        // 再次应用不再变化
        assert!(apply_single_hop(&mut objects, ObjectId(1)).is_empty());
    }

    #[test]
    fn test_dangling_target_is_noop() {
        let mut objects = vec![ObjectDraft::circle("c", Point2::origin(), 5.0)
            .with_constraint(Constraint::new(ConstraintKind::Center, ObjectId(99)))
            .into_object(ObjectId(2), 2)];
        assert!(apply_single_hop(&mut objects, ObjectId(99)).is_empty());
        assert!(propagate(&mut objects, ObjectId(99)).is_empty());
        assert_eq!(objects[0].anchor(), Point2::origin());
    }

    #[test]
    fn test_kind_mismatch_is_noop() {
        let mut objects = vec![
            point(1, 10.0, 10.0),
            point(2, 0.0, 0.0),
        ];
        objects[1].constraints.push(Constraint::new(ConstraintKind::Center, ObjectId(1)));
        assert!(apply_single_hop(&mut objects, ObjectId(1)).is_empty());
    }
}
