//! 工作区目录持久化
//!
//! 对象集合和画布设置分别保存为目录下的两个 JSON 文档：
//! - `objects.json`：`DrawingObject` 数组
//! - `settings.json`：`CanvasSettings`
//!
//! 加载时缺失或损坏的文档被替换为默认值并记录警告，不会中断启动。

use crate::error::FileError;
use geotikz_core::object::DrawingObject;
use geotikz_core::settings::CanvasSettings;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const OBJECTS_FILE: &str = "objects.json";
pub const SETTINGS_FILE: &str = "settings.json";

/// 加载结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workspace {
    pub objects: Vec<DrawingObject>,
    pub settings: CanvasSettings,
}

pub fn objects_path(dir: &Path) -> PathBuf {
    dir.join(OBJECTS_FILE)
}

pub fn settings_path(dir: &Path) -> PathBuf {
    dir.join(SETTINGS_FILE)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), FileError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, FileError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

pub fn save_objects(dir: &Path, objects: &[DrawingObject]) -> Result<(), FileError> {
    let path = objects_path(dir);
    write_json(&path, objects)?;
    tracing::info!("Saved {} objects to {}", objects.len(), path.display());
    Ok(())
}

pub fn save_settings(dir: &Path, settings: &CanvasSettings) -> Result<(), FileError> {
    let path = settings_path(dir);
    write_json(&path, settings)?;
    tracing::info!("Saved settings to {}", path.display());
    Ok(())
}

/// 严格加载对象集合，错误原样返回
pub fn load_objects(dir: &Path) -> Result<Vec<DrawingObject>, FileError> {
    read_json(&objects_path(dir))
}

/// 严格加载画布设置，缺失字段取默认值
pub fn load_settings(dir: &Path) -> Result<CanvasSettings, FileError> {
    read_json::<CanvasSettings>(&settings_path(dir)).map(CanvasSettings::normalized)
}

/// 宽松加载整个工作区：任何一个文档不可用时使用默认值
pub fn load(dir: &Path) -> Workspace {
    let objects = match load_objects(dir) {
        Ok(objects) => objects,
        Err(FileError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => {
            tracing::warn!("Failed to load objects from {}: {}", dir.display(), e);
            Vec::new()
        }
    };
    let settings = match load_settings(dir) {
        Ok(settings) => settings,
        Err(FileError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            CanvasSettings::default()
        }
        Err(e) => {
            tracing::warn!("Failed to load settings from {}: {}", dir.display(), e);
            CanvasSettings::default()
        }
    };

    tracing::info!("Loaded workspace {} ({} objects)", dir.display(), objects.len());
    Workspace { objects, settings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotikz_core::prelude::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("geotikz_ws_{}_{}", std::process::id(), name));
        fs::remove_dir_all(&dir).ok();
        dir
    }

    #[test]
    fn test_save_and_load_workspace() {
        let dir = temp_dir("roundtrip");
        let mut store = ObjectStore::new();
        store.add_object(ObjectDraft::point("A", 1.0, 2.0));
        store.add_object(ObjectDraft::line("l", Point2::new(0.0, 0.0), Point2::new(3.0, 4.0)));
        let mut settings = CanvasSettings::default();
        settings.grid_type = GridType::Dots;

        save_objects(&dir, store.objects()).expect("Failed to save objects");
        save_settings(&dir, &settings).expect("Failed to save settings");

        let loaded = load(&dir);
        assert_eq!(loaded.objects, store.objects());
        assert_eq!(loaded.settings, settings);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_workspace_uses_defaults() {
        let dir = temp_dir("missing");
        assert_eq!(load(&dir), Workspace::default());
    }

    #[test]
    fn test_malformed_documents_fall_back() {
        let dir = temp_dir("malformed");
        fs::create_dir_all(&dir).expect("Failed to create dir");
        fs::write(objects_path(&dir), "not json").expect("Failed to write");
        fs::write(settings_path(&dir), r#"{"snap_radius": 25.0}"#).expect("Failed to write");

        assert!(matches!(load_objects(&dir), Err(FileError::Json(_))));
        let loaded = load(&dir);
        assert!(loaded.objects.is_empty());
        assert_eq!(loaded.settings.snap_radius, 25.0);
        assert!(loaded.settings.grid_visible);

        fs::remove_dir_all(&dir).ok();
    }
}
