//! GeoTikZ 核心
//!
//! 二维几何场景模型：图形对象、约束、几何构造、点捕捉和撤销/重做历史。
//!
//! # 架构设计
//!
//! - `ObjectStore`: 场景的唯一数据源，所有修改都经过它的操作
//! - `DrawingObject`: 公共属性 + 按类型区分的 `Shape`
//! - `History`: 快照式历史，每次提交保存整个对象集合
//!
//! 坐标为画布像素坐标，Y 轴向下。
//!
//! # 示例
//!
//! ```rust
//! use geotikz_core::prelude::*;
//!
//! let mut store = ObjectStore::new();
//! let a = store.add_object(ObjectDraft::point("A", 0.0, 0.0));
//! let b = store.add_object(ObjectDraft::point("B", 100.0, 0.0));
//! let m = store.construct_midpoint(a, b).unwrap();
//! assert_eq!(store.get(m).unwrap().anchor(), Point2::new(50.0, 0.0));
//!
//! store.undo();
//! assert!(store.get(m).is_none());
//! ```

pub mod constraint;
pub mod construct;
pub mod geometry;
pub mod history;
pub mod interaction;
pub mod math;
pub mod object;
pub mod properties;
pub mod settings;
pub mod snap;
pub mod store;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::constraint::{Constraint, ConstraintKind};
    pub use crate::history::History;
    pub use crate::interaction::{DraftState, Tool};
    pub use crate::math::{BoundingBox2, Point2, Vector2};
    pub use crate::object::{
        ArrowStyle, DrawingObject, ImageTransform, ObjectDraft, ObjectId, ObjectPatch, Shape,
    };
    pub use crate::properties::{Color, FontSpec, LabelStyle, StrokePattern, Style};
    pub use crate::settings::{CanvasSettings, GridType};
    pub use crate::snap::{SnapEngine, SnapKind, SnapTarget};
    pub use crate::store::ObjectStore;
}
