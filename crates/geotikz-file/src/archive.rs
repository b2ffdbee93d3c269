//! 场景归档（.gtz）
//!
//! 基于 MessagePack + Zstd 的紧凑二进制格式，对象集合和画布设置保存在同一个文件里。
//! 结构体按字段名编码，对象的类型标签因此可以正常展开。

use crate::error::FileError;
use chrono::{DateTime, Utc};
use geotikz_core::object::DrawingObject;
use geotikz_core::settings::CanvasSettings;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// 文件魔数 "GTZ1"
const MAGIC: &[u8; 4] = b"GTZ1";

/// 当前文件格式版本
const FORMAT_VERSION: u32 = 1;

/// Zstd 压缩级别
const COMPRESSION_LEVEL: i32 = 3;

/// 文件头长度：魔数、版本、保留字（必须为 0）、压缩数据长度，各 4 字节小端
const HEADER_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ArchiveHeader {
    version: u32,
    payload_len: u32,
}

impl ArchiveHeader {
    fn to_bytes(self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(MAGIC);
        bytes[4..8].copy_from_slice(&self.version.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.payload_len.to_le_bytes());
        bytes
    }

    fn parse(bytes: &[u8; HEADER_LEN]) -> Result<Self, FileError> {
        let word = |i: usize| {
            u32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]])
        };

        if &bytes[0..4] != MAGIC {
            return Err(FileError::InvalidFormat(
                "Invalid magic number, not a GeoTikZ archive".to_string(),
            ));
        }
        let version = word(4);
        if version > FORMAT_VERSION {
            return Err(FileError::UnsupportedVersion(format!(
                "Archive version {} is newer than supported version {}",
                version, FORMAT_VERSION
            )));
        }
        let reserved = word(8);
        if reserved != 0 {
            return Err(FileError::InvalidFormat(format!(
                "Reserved header field must be zero, found {reserved:#x}"
            )));
        }
        Ok(Self { version, payload_len: word(12) })
    }
}

/// 归档元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveMetadata {
    pub saved_at: DateTime<Utc>,
    /// 写入归档的程序版本
    pub generator: String,
}

impl Default for ArchiveMetadata {
    fn default() -> Self {
        Self {
            saved_at: Utc::now(),
            generator: format!("geotikz {}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// 归档内容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub metadata: ArchiveMetadata,
    pub objects: Vec<DrawingObject>,
    pub settings: CanvasSettings,
}

impl Scene {
    pub fn new(objects: Vec<DrawingObject>, settings: CanvasSettings) -> Self {
        Self {
            metadata: ArchiveMetadata::default(),
            objects,
            settings,
        }
    }
}

/// 保存场景到归档
pub fn save(scene: &Scene, path: &Path) -> Result<(), FileError> {
    let msgpack_data = rmp_serde::to_vec_named(scene)?;
    let compressed_data = zstd::encode_all(msgpack_data.as_slice(), COMPRESSION_LEVEL)?;
    let payload_len = u32::try_from(compressed_data.len())
        .map_err(|_| FileError::InvalidFormat("Scene too large for archive".to_string()))?;
    let header = ArchiveHeader { version: FORMAT_VERSION, payload_len };

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&header.to_bytes())?;
    writer.write_all(&compressed_data)?;
    writer.flush()?;

    tracing::info!(
        "Saved {} objects to {} ({} bytes compressed)",
        scene.objects.len(),
        path.display(),
        compressed_data.len()
    );
    Ok(())
}

/// 从归档加载场景
pub fn load(path: &Path) -> Result<Scene, FileError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let mut header_bytes = [0u8; HEADER_LEN];
    reader.read_exact(&mut header_bytes)?;
    let header = ArchiveHeader::parse(&header_bytes)?;

    let mut compressed_data = vec![0u8; header.payload_len as usize];
    reader.read_exact(&mut compressed_data)?;
    let msgpack_data = zstd::decode_all(compressed_data.as_slice())?;
    let mut scene: Scene = rmp_serde::from_slice(&msgpack_data)?;
    scene.settings = scene.settings.normalized();

    tracing::info!(
        "Loaded {} objects from {} (saved {})",
        scene.objects.len(),
        path.display(),
        scene.metadata.saved_at.to_rfc3339()
    );
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotikz_core::prelude::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("geotikz_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_save_load_roundtrip() {
        let path = temp_path("roundtrip.gtz");

        let mut store = ObjectStore::new();
        let a = store.add_object(ObjectDraft::point("A", 0.0, 0.0));
        let b = store.add_object(ObjectDraft::point("B", 100.0, 40.0));
        store.construct_midpoint(a, b).expect("midpoint");
        store.add_object(
            ObjectDraft::circle("c", Point2::new(10.0, 10.0), 5.0)
                .with_constraint(Constraint::new(ConstraintKind::Center, a))
                .with_style(Style::default().with_fill(Color::rgb(1, 2, 3), 0.5)),
        );
        let mut settings = CanvasSettings::default();
        settings.set_zoom(2.0);

        let scene = Scene::new(store.objects().to_vec(), settings);
        save(&scene, &path).expect("Failed to save");

        let bytes = std::fs::read(&path).expect("Failed to read");
        assert_eq!(&bytes[0..4], MAGIC);
        let header_bytes: [u8; HEADER_LEN] = bytes[..HEADER_LEN].try_into().unwrap();
        let header = ArchiveHeader::parse(&header_bytes).expect("Failed to parse header");
        assert_eq!(header.version, FORMAT_VERSION);
        assert_eq!(header.payload_len as usize, bytes.len() - HEADER_LEN);

        let loaded = load(&path).expect("Failed to load");
        assert_eq!(loaded, scene);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_invalid_magic() {
        let path = temp_path("invalid.gtz");
        let mut file = File::create(&path).expect("Failed to create");
        file.write_all(b"XXXX").expect("Failed to write");
        file.write_all(&[0u8; 12]).expect("Failed to write padding");

        assert!(matches!(load(&path), Err(FileError::InvalidFormat(_))));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_newer_version_rejected() {
        let path = temp_path("newer.gtz");
        let mut file = File::create(&path).expect("Failed to create");
        file.write_all(MAGIC).expect("Failed to write");
        file.write_all(&(FORMAT_VERSION + 1).to_le_bytes()).expect("Failed to write");
        file.write_all(&[0u8; 8]).expect("Failed to write padding");

        assert!(matches!(load(&path), Err(FileError::UnsupportedVersion(_))));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_nonzero_reserved_field_rejected() {
        let header = ArchiveHeader { version: FORMAT_VERSION, payload_len: 0 };
        let mut bytes = header.to_bytes();
        assert_eq!(ArchiveHeader::parse(&bytes).unwrap(), header);

        bytes[8] = 1;
        assert!(matches!(ArchiveHeader::parse(&bytes), Err(FileError::InvalidFormat(_))));

        let path = temp_path("reserved.gtz");
        std::fs::write(&path, bytes).expect("Failed to write");
        assert!(matches!(load(&path), Err(FileError::InvalidFormat(_))));
        std::fs::remove_file(&path).ok();
    }
}
