//! 快照式撤销/重做历史
//!
//! 每次提交保存整个对象集合的深拷贝。游标 `index` 指向与当前对象集合一致的快照，
//! 始终满足 `0 <= index < len`。在游标之后提交会丢弃重做分支。
//! 超过容量时淘汰最早的快照，游标随之前移。

use crate::object::DrawingObject;

/// 默认最大快照数
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

pub type Snapshot = Vec<DrawingObject>;

#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Snapshot>,
    index: usize,
    capacity: usize,
}

/// 快照不记录选择状态
fn snapshot_of(objects: &[DrawingObject]) -> Snapshot {
    objects
        .iter()
        .cloned()
        .map(|mut o| {
            o.selected = false;
            o
        })
        .collect()
}

impl History {
    /// 以给定集合作为唯一初始快照
    pub fn new(initial: &[DrawingObject], capacity: usize) -> Self {
        Self {
            snapshots: vec![snapshot_of(initial)],
            index: 0,
            capacity: capacity.max(1),
        }
    }

    /// 提交新快照：截断重做分支、追加、按容量淘汰
    pub fn commit(&mut self, objects: &[DrawingObject]) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push(snapshot_of(objects));
        self.index = self.snapshots.len() - 1;

        if self.snapshots.len() > self.capacity {
            let overflow = self.snapshots.len() - self.capacity;
            self.snapshots.drain(..overflow);
            self.index -= overflow;
        }
    }

    /// 用当前集合替换游标处的快照（不产生新的撤销步骤）
    pub fn amend(&mut self, objects: &[DrawingObject]) {
        self.snapshots[self.index] = snapshot_of(objects);
    }

    /// 游标后退一步，返回该快照的深拷贝；已在最早位置时返回 None
    pub fn undo(&mut self) -> Option<Snapshot> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.snapshots[self.index].clone())
    }

    /// 游标前进一步，返回该快照的深拷贝；已在末尾时返回 None
    pub fn redo(&mut self) -> Option<Snapshot> {
        if self.index + 1 >= self.snapshots.len() {
            return None;
        }
        self.index += 1;
        Some(self.snapshots[self.index].clone())
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 游标处的快照
    pub fn current(&self) -> &Snapshot {
        &self.snapshots[self.index]
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(&[], DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{ObjectDraft, ObjectId};

    fn scene(n: u64) -> Vec<DrawingObject> {
        (1..=n)
            .map(|i| {
                ObjectDraft::point(format!("P{i}"), i as f64, 0.0)
                    .into_object(ObjectId(i), i as i64)
            })
            .collect()
    }

    #[test]
    fn test_commit_after_undo_discards_redo_tail() {
        let mut history = History::default();
        history.commit(&scene(1));
        history.commit(&scene(2));
        assert_eq!(history.undo().map(|s| s.len()), Some(1));
        assert!(history.can_redo());

        history.commit(&scene(3));
        assert!(!history.can_redo());
        assert_eq!(history.len(), 3);
        assert_eq!(history.current().len(), 3);
    }

    #[test]
    fn test_eviction_keeps_cursor_consistent() {
        let mut history = History::new(&[], 3);
        for n in 1..=5 {
            history.commit(&scene(n));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), 2);
        assert_eq!(history.current().len(), 5);

        assert_eq!(history.undo().map(|s| s.len()), Some(4));
        assert_eq!(history.undo().map(|s| s.len()), Some(3));
        assert!(history.undo().is_none());
        assert_eq!(history.index(), 0);
    }

    #[test]
    fn test_bounds() {
        let mut history = History::default();
        assert!(!history.can_undo());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert_eq!(history.index(), 0);
    }

    #[test]
    fn test_snapshot_is_independent_of_live_collection() {
        let mut history = History::default();
        let mut live = scene(1);
        live[0].selected = true;
        history.commit(&live);
        live[0].name = "changed".to_string();

        assert_eq!(history.current()[0].name, "P1");
        assert!(!history.current()[0].selected);
    }
}
