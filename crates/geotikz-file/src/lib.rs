//! GeoTikZ 文件处理
//!
//! 支持：
//! - 工作区目录（`objects.json` + `settings.json`）
//! - `.gtz` 压缩场景归档
//! - TikZ 文本导出

pub mod archive;
pub mod error;
pub mod export;
pub mod workspace;

pub use archive::Scene;
pub use error::FileError;
pub use export::{export_tikz, write_tikz};
pub use workspace::Workspace;
