//! 生成器集成测试

use geotikz_codegen::{fit_view_bounds, generate, CoordinateTransform, GeneratorOptions};
use geotikz_core::prelude::*;

fn scene() -> ObjectStore {
    let mut store = ObjectStore::new();
    store.add_object(ObjectDraft::point("A", 0.0, 0.0));
    store.add_object(ObjectDraft::point("B", 100.0, 0.0));
    store.add_object(
        ObjectDraft::circle("c1", Point2::new(50.0, -50.0), 25.0)
            .with_style(Style::default().with_stroke(Color::rgb(0, 128, 128))),
    );
    store.add_object(
        ObjectDraft::line("l1", Point2::new(0.0, 0.0), Point2::new(100.0, 0.0))
            .with_style(Style::default().with_stroke(Color::rgb(0, 128, 128))),
    );
    store
}

#[test]
fn test_generation_is_deterministic() {
    let store = scene();
    let options = GeneratorOptions::default();
    assert_eq!(generate(store.objects(), &options), generate(store.objects(), &options));
}

#[test]
fn test_custom_color_defined_once_before_use() {
    let store = scene();
    let text = generate(store.objects(), &GeneratorOptions::default());
    assert_eq!(text.matches("\\definecolor").count(), 1);
    assert!(text.contains("\\definecolor{customcolor1}{HTML}{008080}"));

    let definition = text.find("\\definecolor").unwrap();
    let first_use = text.find("[customcolor1").unwrap();
    assert!(definition < first_use);
}

#[test]
fn test_objects_in_creation_order_and_hidden_skipped() {
    let mut store = scene();
    let hidden = store.add_object(ObjectDraft::point("H", 10.0, 10.0).hidden());
    assert!(store.get(hidden).is_some());

    let text = generate(store.objects(), &GeneratorOptions::default());
    let a = text.find("% Point A").unwrap();
    let b = text.find("% Point B").unwrap();
    let c = text.find("% Circle c1").unwrap();
    assert!(a < b && b < c);
    assert!(!text.contains("% Point H"));
}

#[test]
fn test_sections_toggle_independently() {
    let store = scene();
    let options = GeneratorOptions {
        standalone: false,
        coordinate_system: false,
        name_comments: false,
        name_labels: false,
        ..Default::default()
    };
    let text = generate(store.objects(), &options);
    assert!(!text.contains("\\documentclass"));
    assert!(!text.contains("grid"));
    assert!(!text.contains("% Point"));
    assert!(!text.contains("{A}"));
    assert!(text.contains("\\fill[black] (0,0) circle (2pt);"));
}

#[test]
fn test_name_labels() {
    let store = scene();
    let text = generate(store.objects(), &GeneratorOptions::default());
    assert!(text.contains("\\node[above right, black] at (0,0) {A};"));
    // 圆的标签在顶部
    assert!(text.contains("\\node[above, customcolor1] at (1,1.5) {c1};"));
}

#[test]
fn test_single_point_window_is_minimal_and_symmetric() {
    let mut store = ObjectStore::new();
    store.add_object(ObjectDraft::point("A", 150.0, -100.0));
    let bounds = fit_view_bounds(store.objects(), &CoordinateTransform::default(), false);

    assert!(bounds.width() >= 4.0 && bounds.height() >= 4.0);
    assert!(((bounds.min_x + bounds.max_x) / 2.0 - 3.0).abs() < 1e-9);
    assert!(((bounds.min_y + bounds.max_y) / 2.0 - 2.0).abs() < 1e-9);
}

#[test]
fn test_bounds_never_degenerate() {
    let mut store = ObjectStore::new();
    store.add_object(ObjectDraft::line("l", Point2::new(0.0, 0.0), Point2::new(1000.0, 0.0)));
    let bounds = fit_view_bounds(store.objects(), &CoordinateTransform::default(), true);
    assert!(bounds.width() > 20.0);
    assert!(bounds.height() >= 4.0);
}

#[test]
fn test_opacity_is_a_modifier() {
    let mut store = ObjectStore::new();
    store.add_object(
        ObjectDraft::circle("c", Point2::origin(), 50.0)
            .with_style(Style::default().with_fill(Color::RED, 0.3)),
    );
    let text = generate(store.objects(), &GeneratorOptions::default());
    assert!(text.contains("\\draw[black, fill=red, fill opacity=0.3] (0,0) circle (1);"));
    assert!(!text.contains("\\definecolor"));
}

#[test]
fn test_wide_scene_keeps_tick_count_small() {
    let mut store = ObjectStore::new();
    store.add_object(ObjectDraft::point("A", 0.0, 0.0));
    store.add_object(ObjectDraft::point("B", 1e9, 0.0));
    let text = generate(store.objects(), &GeneratorOptions::default());

    let limit = 2 * geotikz_codegen::grid::TARGET_LINES as usize + 1;
    let x_ticks = text.matches("node[below] {\\tiny").count();
    let y_ticks = text.matches("node[left] {\\tiny").count();
    assert!(x_ticks > 0 && x_ticks <= limit, "{x_ticks} x ticks");
    assert!(y_ticks <= limit, "{y_ticks} y ticks");
    assert!(text.lines().count() < 100);
}
