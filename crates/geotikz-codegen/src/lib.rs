//! GeoTikZ 代码生成
//!
//! 把对象集合转换为 TikZ 文本。生成是纯函数：同样的输入总是得到
//! 逐字节相同的输出，可以反复调用并做差异比较。
//!
//! # 示例
//!
//! ```rust
//! use geotikz_codegen::{generate, GeneratorOptions};
//! use geotikz_core::prelude::*;
//!
//! let mut store = ObjectStore::new();
//! store.add_object(ObjectDraft::point("A", 50.0, -50.0));
//! let tikz = generate(store.objects(), &GeneratorOptions::default());
//! assert!(tikz.contains("\\fill[black] (1,1) circle (2pt);"));
//! ```

pub mod bounds;
pub mod color;
pub mod emit;
pub mod format;
pub mod grid;
pub mod label;
pub mod options;
pub mod style;
pub mod writer;

pub use bounds::{fit_view_bounds, ViewBounds};
pub use options::{CoordinateTransform, GeneratorOptions};

use color::ColorRegistry;
use emit::Emitter;
use geotikz_core::object::DrawingObject;
use writer::TikzWriter;

/// 生成 TikZ 代码
///
/// 对象按 `(created_at, id)` 排序输出，不可见对象被跳过。
/// 空集合仍然输出完整的文档结构，正文为 `% No objects to draw`。
pub fn generate(objects: &[DrawingObject], options: &GeneratorOptions) -> String {
    let mut visible: Vec<&DrawingObject> = objects.iter().filter(|o| o.visible).collect();
    visible.sort_by_key(|o| (o.created_at, o.id));

    // 先生成正文，颜色定义必须在使用之前输出
    let mut colors = ColorRegistry::new();
    let mut body = TikzWriter::new();
    {
        let mut emitter = Emitter {
            transform: &options.transform,
            colors: &mut colors,
        };
        for object in &visible {
            emitter.write_object(&mut body, object, options);
        }
    }
    if visible.is_empty() {
        body.comment("No objects to draw");
    }

    let include_labels = options.name_labels && options.labels_in_bounds;
    let bounds = fit_view_bounds(objects, &options.transform, include_labels);

    let mut out = TikzWriter::new();
    if options.standalone {
        out.line("\\documentclass[tikz,border=5pt]{standalone}");
        out.line("\\usepackage{graphicx}");
        out.line("\\usetikzlibrary{arrows.meta}");
        out.begin("document");
    }

    for definition in colors.definitions() {
        out.line(definition);
    }

    out.begin("tikzpicture");
    if options.coordinate_system {
        grid::write_coordinate_system(&mut out, &bounds);
        out.blank();
    }
    out.append(body);
    out.end("tikzpicture");

    if options.standalone {
        out.end("document");
    }

    tracing::debug!(
        "Generated TikZ for {} objects, {} custom colors",
        visible.len(),
        colors.definitions().len()
    );
    out.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scene_is_complete() {
        let text = generate(&[], &GeneratorOptions::default());
        assert!(text.starts_with("\\documentclass"));
        assert!(text.contains("% No objects to draw"));
        assert!(text.contains("\\end{tikzpicture}"));
        assert!(text.trim_end().ends_with("\\end{document}"));
    }

    #[test]
    fn test_fragment_without_wrapper() {
        let options = GeneratorOptions {
            standalone: false,
            coordinate_system: false,
            ..Default::default()
        };
        let text = generate(&[], &options);
        assert_eq!(
            text,
            "\\begin{tikzpicture}\n  % No objects to draw\n\\end{tikzpicture}\n"
        );
    }
}
