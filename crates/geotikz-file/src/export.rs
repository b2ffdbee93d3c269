//! TikZ 导出

use crate::error::FileError;
use geotikz_codegen::{generate, GeneratorOptions};
use geotikz_core::object::DrawingObject;
use std::fs;
use std::path::Path;

/// 把生成的文本写入文件
pub fn write_tikz(path: &Path, text: &str) -> Result<(), FileError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)?;
    tracing::info!("Exported TikZ to {} ({} bytes)", path.display(), text.len());
    Ok(())
}

/// 生成并写入；返回生成的文本
pub fn export_tikz(
    path: &Path,
    objects: &[DrawingObject],
    options: &GeneratorOptions,
) -> Result<String, FileError> {
    let text = generate(objects, options);
    write_tikz(path, &text)?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotikz_core::prelude::*;

    #[test]
    fn test_export_writes_generated_text() {
        let path = std::env::temp_dir()
            .join(format!("geotikz_export_{}", std::process::id()))
            .join("scene.tex");

        let mut store = ObjectStore::new();
        store.add_object(ObjectDraft::point("A", 50.0, 50.0));
        let text = export_tikz(&path, store.objects(), &GeneratorOptions::default())
            .expect("Failed to export");

        let written = fs::read_to_string(&path).expect("Failed to read");
        assert_eq!(written, text);
        assert!(written.contains("\\fill[black] (1,-1) circle (2pt);"));

        if let Some(parent) = path.parent() {
            fs::remove_dir_all(parent).ok();
        }
    }
}
