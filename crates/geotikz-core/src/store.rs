//! 对象存储
//!
//! 场景的唯一数据源：对象集合、选择集、进行中的绘制、画布设置和撤销/重做历史。
//! 所有状态都是私有的，只能通过这里定义的操作修改。
//!
//! 操作遵循宽松输入策略：ID 不存在时什么也不做，返回值表示是否发生了变化。

use crate::constraint;
use crate::construct;
use crate::history::{History, DEFAULT_HISTORY_CAPACITY};
use crate::interaction::{DraftState, Tool};
use crate::math::{BoundingBox2, Point2, Vector2};
use crate::object::{DrawingObject, ObjectDraft, ObjectId, ObjectPatch, Shape};
use crate::settings::CanvasSettings;
use crate::snap::{self, SnapEngine, SnapTarget};
use std::collections::HashSet;

#[derive(Debug)]
pub struct ObjectStore {
    objects: Vec<DrawingObject>,
    selection: Vec<ObjectId>,
    history: History,
    settings: CanvasSettings,
    draft: DraftState,
    snap_engine: SnapEngine,
    next_id: u64,
    last_timestamp: i64,
}

impl Default for ObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::with_history_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_history_capacity(capacity: usize) -> Self {
        Self {
            objects: Vec::new(),
            selection: Vec::new(),
            history: History::new(&[], capacity),
            settings: CanvasSettings::default(),
            draft: DraftState::default(),
            snap_engine: SnapEngine::new(),
            next_id: 1,
            last_timestamp: 0,
        }
    }

    /// 显式加载持久化状态（由宿主程序在启动时调用一次）
    ///
    /// 历史被重置为只包含加载结果的单个快照。重复的 ID 会被重新分配。
    pub fn load(&mut self, objects: Vec<DrawingObject>, settings: CanvasSettings) {
        let mut seen = HashSet::new();
        let mut max_id = objects.iter().map(|o| o.id.raw()).max().unwrap_or(0);
        let mut loaded = Vec::with_capacity(objects.len());

        for mut object in objects {
            if !seen.insert(object.id) {
                max_id += 1;
                tracing::warn!("Duplicate object id {} reassigned to {}", object.id, max_id);
                object.id = ObjectId(max_id);
                seen.insert(object.id);
            }
            object.selected = false;
            loaded.push(object);
        }

        self.last_timestamp = loaded.iter().map(|o| o.created_at).max().unwrap_or(0);
        self.next_id = max_id + 1;
        self.history = History::new(&loaded, self.history.capacity());
        self.objects = loaded;
        self.selection.clear();
        self.draft = DraftState::default();
        self.settings = settings.normalized();

        tracing::info!("Loaded {} objects into store", self.objects.len());
    }

    // ========== 查询 ==========

    pub fn objects(&self) -> &[DrawingObject] {
        &self.objects
    }

    pub fn get(&self, id: ObjectId) -> Option<&DrawingObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn selection(&self) -> &[ObjectId] {
        &self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    /// 视图操作直接修改设置（缩放钳制由 `CanvasSettings` 负责）
    pub fn settings_mut(&mut self) -> &mut CanvasSettings {
        &mut self.settings
    }

    /// 修改设置后统一修正越界值
    pub fn update_settings(&mut self, f: impl FnOnce(&mut CanvasSettings)) {
        f(&mut self.settings);
        self.settings = std::mem::take(&mut self.settings).normalized();
    }

    pub fn draft(&self) -> &DraftState {
        &self.draft
    }

    // ========== 增删改 ==========

    /// 添加对象：分配 ID 和时间戳，设为唯一选中对象，提交历史
    pub fn add_object(&mut self, draft: ObjectDraft) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        let created_at = self.next_timestamp();

        let object = draft.into_object(id, created_at);
        tracing::debug!("Add {} {} ({})", object.type_name(), id, object.name);
        self.objects.push(object);

        self.selection = vec![id];
        self.sync_selection_flags();
        self.commit();
        id
    }

    /// 合并部分字段；ID 不存在时返回 false
    ///
    /// 不会自动传播约束，需要时调用 `apply_constraints`。
    pub fn update_object(&mut self, id: ObjectId, patch: ObjectPatch) -> bool {
        let Some(object) = self.objects.iter_mut().find(|o| o.id == id) else {
            return false;
        };
        patch.apply_to(object);
        tracing::debug!("Update {}", id);
        self.commit();
        true
    }

    pub fn delete_object(&mut self, id: ObjectId) -> bool {
        let Some(index) = self.objects.iter().position(|o| o.id == id) else {
            return false;
        };
        self.objects.remove(index);
        self.selection.retain(|s| *s != id);
        tracing::debug!("Delete {}", id);
        self.commit();
        true
    }

    /// 删除全部选中对象，每个对象各提交一次历史；返回删除数量
    pub fn delete_selected(&mut self) -> usize {
        let ids = self.selection.clone();
        ids.into_iter().filter(|id| self.delete_object(*id)).count()
    }

    /// 平移单个对象并沿约束传播
    pub fn translate_object(&mut self, id: ObjectId, delta: Vector2) -> bool {
        self.translate_ids(&[id], delta) > 0
    }

    /// 拖拽：平移全部选中对象，提交一次历史，再沿约束传播
    pub fn translate_selected(&mut self, delta: Vector2) -> usize {
        let ids = self.selection.clone();
        self.translate_ids(&ids, delta)
    }

    // ========== 选择 ==========

    /// 单选：替换选择集
    pub fn select(&mut self, id: ObjectId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.selection = vec![id];
        self.sync_selection_flags();
        true
    }

    /// 多选：切换成员关系
    pub fn toggle_selection(&mut self, id: ObjectId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        if let Some(pos) = self.selection.iter().position(|s| *s == id) {
            self.selection.remove(pos);
        } else {
            self.selection.push(id);
        }
        self.sync_selection_flags();
        true
    }

    pub fn select_all(&mut self) {
        self.selection = self.objects.iter().map(|o| o.id).collect();
        self.sync_selection_flags();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.sync_selection_flags();
    }

    /// 框选：选中几何落在矩形内（含边界）的可见对象
    ///
    /// 单锚点对象检测锚点，多点对象只要任一顶点在矩形内即命中。
    pub fn commit_selection_box(&mut self, corner_a: Point2, corner_b: Point2) -> &[ObjectId] {
        let bbox = BoundingBox2::from_corners(corner_a, corner_b);
        self.selection = self
            .objects
            .iter()
            .filter(|o| o.visible && hits_box(o, &bbox))
            .map(|o| o.id)
            .collect();
        self.sync_selection_flags();
        &self.selection
    }

    fn sync_selection_flags(&mut self) {
        for object in &mut self.objects {
            object.selected = self.selection.contains(&object.id);
        }
    }

    // ========== 历史 ==========

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, snapshot: Vec<DrawingObject>) {
        self.objects = snapshot;
        self.selection.clear();
        self.sync_selection_flags();
    }

    fn commit(&mut self) {
        self.history.commit(&self.objects);
    }

    /// 时间戳（毫秒）严格递增，即使系统时钟回拨
    fn next_timestamp(&mut self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        self.last_timestamp = now.max(self.last_timestamp + 1);
        self.last_timestamp
    }

    // ========== 约束 ==========

    /// 单跳约束传播：只更新直接依赖目标的对象；返回更新数量
    ///
    /// 结果并入当前历史快照，编辑和它的约束传播构成同一个撤销步骤。
    pub fn apply_constraints(&mut self, target: ObjectId) -> usize {
        let changed = constraint::apply_single_hop(&mut self.objects, target);
        if !changed.is_empty() {
            self.history.amend(&self.objects);
        }
        changed.len()
    }

    /// 传递约束传播：按拓扑顺序更新所有下游对象，环不会导致死循环
    pub fn propagate_constraints(&mut self, target: ObjectId) -> usize {
        let changed = constraint::propagate(&mut self.objects, target);
        if !changed.is_empty() {
            self.history.amend(&self.objects);
        }
        changed.len()
    }

    // ========== 几何构造 ==========

    pub fn construct_perpendicular(&mut self, base: ObjectId, through: Point2) -> Option<ObjectId> {
        let name = self.next_name("perpendicular");
        let draft = construct::perpendicular_line(name, self.get(base), through)?;
        Some(self.add_object(draft))
    }

    pub fn construct_parallel(&mut self, base: ObjectId, through: Point2) -> Option<ObjectId> {
        let name = self.next_name("parallel");
        let draft = construct::parallel_line(name, self.get(base), through)?;
        Some(self.add_object(draft))
    }

    pub fn construct_midpoint(&mut self, a: ObjectId, b: ObjectId) -> Option<ObjectId> {
        let name = self.next_name("midpoint");
        let draft = construct::midpoint(name, self.get(a)?, self.get(b)?);
        Some(self.add_object(draft))
    }

    pub fn construct_distance(&mut self, a: ObjectId, b: ObjectId) -> Option<ObjectId> {
        let name = self.next_name("distance");
        let draft = construct::distance(name, self.get(a)?, self.get(b)?);
        Some(self.add_object(draft))
    }

    pub fn construct_perpendicular_bisector(
        &mut self,
        a: ObjectId,
        b: ObjectId,
    ) -> Option<ObjectId> {
        let name = self.next_name("perpendicular-bisector");
        let draft = construct::perpendicular_bisector(name, self.get(a)?, self.get(b)?)?;
        Some(self.add_object(draft))
    }

    /// 以三个对象的锚点构造角度标记（A, 顶点, C）
    pub fn construct_angle(
        &mut self,
        a: ObjectId,
        vertex: ObjectId,
        c: ObjectId,
    ) -> Option<ObjectId> {
        let points = [self.get(a)?.anchor(), self.get(vertex)?.anchor(), self.get(c)?.anchor()];
        let name = self.next_name("angle");
        Some(self.add_object(construct::angle_marker(name, points[0], points[1], points[2])))
    }

    /// 点到对象曲线上的投影
    pub fn project_point(&self, id: ObjectId, point: Point2) -> Option<Point2> {
        construct::project_onto(self.get(id)?, point)
    }

    // ========== 进行中的绘制 ==========

    pub fn set_tool(&mut self, tool: Tool) {
        tracing::debug!("Tool: {}", tool.name());
        self.draft = DraftState::new(tool);
    }

    pub fn cancel_drawing(&mut self) {
        self.draft.clear();
    }

    /// 追加一个点；输入足够时自动完成并返回新对象ID
    pub fn push_draft_point(&mut self, point: Point2) -> Option<ObjectId> {
        if self.draft.tool == Tool::Select {
            return None;
        }
        self.draft.points.push(point);
        self.complete_if_ready()
    }

    /// 追加一个对象引用（构造工具）；引用不存在时忽略
    pub fn push_draft_ref(&mut self, id: ObjectId) -> Option<ObjectId> {
        if self.draft.tool == Tool::Select || self.get(id).is_none() {
            return None;
        }
        self.draft.refs.push(id);
        self.complete_if_ready()
    }

    fn complete_if_ready(&mut self) -> Option<ObjectId> {
        if self.draft.is_complete() {
            self.finish_drawing()
        } else {
            None
        }
    }

    /// 用已收集的输入生成对象；无论成功与否都会清空进行中的输入
    pub fn finish_drawing(&mut self) -> Option<ObjectId> {
        let tool = self.draft.tool;
        let state = std::mem::replace(&mut self.draft, DraftState::new(tool));
        let name = self.next_name(tool_kind(state.tool));
        let object = state.build(&self.objects, name)?;
        Some(self.add_object(object))
    }

    // ========== 捕捉 ==========

    /// 按画布设置捕捉：先捕捉已有点，再捕捉网格
    ///
    /// 捕捉半径是屏幕像素，按缩放换算为画布距离。
    pub fn snap_point(&mut self, cursor: Point2) -> Option<SnapTarget> {
        let radius = self.settings.snap_radius / self.settings.zoom();
        if self.settings.snap_to_point {
            if let Some(hit) = self.snap_engine.find_nearest(&self.objects, cursor, radius) {
                tracing::debug!(
                    "Snapped to {} at ({:.1}, {:.1})",
                    hit.kind.name(),
                    hit.point.x,
                    hit.point.y
                );
                return Some(hit);
            }
        }
        if self.settings.snap_to_grid {
            let spacing = self.settings.grid_spacing;
            return snap::snap_to_grid(cursor, spacing, spacing);
        }
        None
    }

    // ========== 内部 ==========

    /// 平移给定对象：一次提交，传播结果并入同一快照
    fn translate_ids(&mut self, ids: &[ObjectId], delta: Vector2) -> usize {
        let mut moved = Vec::new();
        for object in self.objects.iter_mut().filter(|o| ids.contains(&o.id)) {
            object.shape.translate(delta);
            moved.push(object.id);
        }
        if moved.is_empty() {
            return 0;
        }
        self.commit();
        for id in &moved {
            constraint::propagate(&mut self.objects, *id);
        }
        self.history.amend(&self.objects);
        moved.len()
    }

    /// 自动命名：点类对象用字母 A..Z, A1..，其他对象用类型前缀加序号
    fn next_name(&self, kind: &str) -> String {
        let count = self.objects.iter().filter(|o| o.type_name() == kind).count();
        match kind {
            "point" | "midpoint" => {
                let used = self
                    .objects
                    .iter()
                    .filter(|o| matches!(o.shape, Shape::Point { .. } | Shape::Midpoint { .. }))
                    .count();
                let letter = char::from(b'A' + (used % 26) as u8);
                match used / 26 {
                    0 => letter.to_string(),
                    round => format!("{letter}{round}"),
                }
            }
            _ => format!("{}{}", name_prefix(kind), count + 1),
        }
    }
}

fn name_prefix(kind: &str) -> &'static str {
    match kind {
        "line" => "l",
        "rectangle" => "rect",
        "circle" => "c",
        "polygon" => "poly",
        "angle" => "ang",
        "perpendicular" => "perp",
        "parallel" => "par",
        "distance" => "d",
        "perpendicular-bisector" => "bis",
        "text" => "t",
        "function" => "f",
        "image" => "img",
        _ => "obj",
    }
}

fn tool_kind(tool: Tool) -> &'static str {
    match tool {
        Tool::Select => "object",
        Tool::Point => "point",
        Tool::Line => "line",
        Tool::Rectangle => "rectangle",
        Tool::Circle => "circle",
        Tool::Polygon => "polygon",
        Tool::Angle => "angle",
        Tool::Perpendicular => "perpendicular",
        Tool::Parallel => "parallel",
        Tool::Midpoint => "midpoint",
        Tool::Distance => "distance",
        Tool::PerpendicularBisector => "perpendicular-bisector",
    }
}

/// 框选命中测试
fn hits_box(object: &DrawingObject, bbox: &BoundingBox2) -> bool {
    match &object.shape {
        // 函数图像不在画布坐标系中
        Shape::Function { .. } => false,
        shape => match shape.vertices() {
            Some(points) => points.iter().any(|p| bbox.contains(p)),
            None => bbox.contains(&shape.anchor()),
        },
    }
}
