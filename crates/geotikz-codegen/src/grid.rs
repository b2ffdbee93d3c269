//! 坐标系：网格、坐标轴、刻度

use crate::bounds::ViewBounds;
use crate::format::num;
use crate::writer::TikzWriter;

/// 网格/刻度步长的尾数，实际步长为 `尾数 × 10^k`
pub const STEP_MANTISSAS: [f64; 4] = [1.0, 2.0, 2.5, 5.0];

/// 最小网格步长
pub const MIN_STEP: f64 = 0.1;

/// 每个轴期望的网格线数量
pub const TARGET_LINES: f64 = 10.0;

/// 坐标轴两端向内收缩的比例（相对网格步长）
pub const AXIS_MARGIN_RATIO: f64 = 0.3;

const TICK_HALF_LENGTH: f64 = 0.1;

/// 单轴刻度数量上限
pub const MAX_TICKS_PER_AXIS: i64 = 4 * TARGET_LINES as i64;

/// `尾数 × 10^k` 中最接近 `range / 10` 的步长（相同时取较小者），不小于 0.1
pub fn choose_step(range: f64) -> f64 {
    let ideal = range / TARGET_LINES;
    if !ideal.is_finite() || ideal <= MIN_STEP {
        return MIN_STEP;
    }

    let exponent = ideal.log10().floor() as i32;
    let mut best = MIN_STEP;
    for power in [exponent, exponent + 1] {
        let scale = 10f64.powi(power);
        for mantissa in STEP_MANTISSAS {
            let step = mantissa * scale;
            if (step - ideal).abs() < (best - ideal).abs() {
                best = step;
            }
        }
    }
    best
}

/// 区间内的整数倍下标范围；超过上限时为空
fn index_range(min: f64, max: f64, step: f64) -> std::ops::RangeInclusive<i64> {
    let first = (min / step - 1e-9).ceil();
    let last = (max / step + 1e-9).floor();
    let bounded =
        first.is_finite() && last.is_finite() && last - first <= MAX_TICKS_PER_AXIS as f64;
    let (first, last) = if bounded { (first as i64, last as i64) } else { (1, 0) };
    first..=last
}

/// 写出网格、坐标轴、刻度和原点标记
pub fn write_coordinate_system(writer: &mut TikzWriter, bounds: &ViewBounds) {
    let step_x = choose_step(bounds.width());
    let step_y = choose_step(bounds.height());
    let grid_step = step_x.max(step_y);

    writer.comment("Coordinate system");
    writer.line(format!(
        "\\draw[step={}, gray!20, very thin] ({},{}) grid ({},{});",
        num(grid_step),
        num(bounds.min_x),
        num(bounds.min_y),
        num(bounds.max_x),
        num(bounds.max_y),
    ));

    // 两轴跨度悬殊时，收缩量不超过该轴跨度的四分之一
    let margin = AXIS_MARGIN_RATIO * grid_step;
    let margin_x = margin.min(bounds.width() / 4.0);
    let margin_y = margin.min(bounds.height() / 4.0);
    let has_x_axis = bounds.contains_origin_y();
    let has_y_axis = bounds.contains_origin_x();

    if has_x_axis {
        let (start, end) = (bounds.min_x + margin_x, bounds.max_x - margin_x);
        writer.line(format!(
            "\\draw[->, gray] ({},0) -- ({},0) node[right] {{$x$}};",
            num(start),
            num(end)
        ));
        for i in index_range(start, end, step_x) {
            if i == 0 {
                continue;
            }
            let x = i as f64 * step_x;
            writer.line(format!(
                "\\draw[gray] ({x},{t}) -- ({x},-{t}) node[below] {{\\tiny {x}}};",
                x = num(x),
                t = num(TICK_HALF_LENGTH)
            ));
        }
    }

    if has_y_axis {
        let (start, end) = (bounds.min_y + margin_y, bounds.max_y - margin_y);
        writer.line(format!(
            "\\draw[->, gray] (0,{}) -- (0,{}) node[above] {{$y$}};",
            num(start),
            num(end)
        ));
        for i in index_range(start, end, step_y) {
            if i == 0 {
                continue;
            }
            let y = i as f64 * step_y;
            writer.line(format!(
                "\\draw[gray] ({t},{y}) -- (-{t},{y}) node[left] {{\\tiny {y}}};",
                y = num(y),
                t = num(TICK_HALF_LENGTH)
            ));
        }
    }

    if has_x_axis && has_y_axis {
        writer.line("\\node[below left, gray] at (0,0) {\\tiny O};");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choose_step_targets_ten_lines() {
        assert_eq!(choose_step(10.0), 1.0);
        assert_eq!(choose_step(4.0), 0.5);
        assert_eq!(choose_step(24.0), 2.5);
        assert_eq!(choose_step(2000.0), 200.0);
        assert_eq!(choose_step(0.0), 0.1);
        assert_eq!(choose_step(f64::INFINITY), 0.1);
    }

    #[test]
    fn test_choose_step_scales_with_range() {
        assert_eq!(choose_step(1e9), 1e8);
        assert_eq!(choose_step(3e6), 2.5e5);
        for range in [7.0, 130.0, 4.2e4, 9.9e7, 1e12] {
            let lines = range / choose_step(range);
            assert!(lines <= 2.0 * TARGET_LINES, "range {range}: {lines} lines");
        }
    }

    #[test]
    fn test_index_range_bounded() {
        assert_eq!(index_range(-1.0, 1.0, 0.5), -2..=2);
        assert!(index_range(0.0, 1e6, 0.1).is_empty());
        assert!(index_range(f64::NEG_INFINITY, 0.0, 1.0).is_empty());
    }

    #[test]
    fn test_axes_only_when_zero_inside() {
        let mut writer = TikzWriter::new();
        let bounds = ViewBounds { min_x: 1.0, max_x: 5.0, min_y: -2.0, max_y: 2.0 };
        write_coordinate_system(&mut writer, &bounds);
        let text = writer.finish();
        // y 范围包含 0：有 x 轴；x 范围不含 0：没有 y 轴
        assert!(text.contains("node[right] {$x$}"));
        assert!(!text.contains("{$y$}"));
        assert!(!text.contains("{\\tiny O}"));
    }

    #[test]
    fn test_ticks_skip_zero() {
        let mut writer = TikzWriter::new();
        write_coordinate_system(&mut writer, &ViewBounds::default());
        let text = writer.finish();
        assert!(text.contains("node[below] {\\tiny 1}"));
        assert!(text.contains("node[below] {\\tiny -4}"));
        assert!(!text.contains("node[below] {\\tiny 0}"));
        assert!(text.contains("{\\tiny O}"));
        // 轴线两端收缩 0.3 个网格步长
        assert!(text.contains("(-4.7,0) -- (4.7,0)"));
    }
}
