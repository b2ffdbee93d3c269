//! 画布设置
//!
//! 反序列化时缺失的字段取默认值，因此旧版本保存的设置可以直接合并到新字段上。

use crate::math::Vector2;
use crate::properties::Color;
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;

/// 网格样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GridType {
    #[default]
    Lines,
    Dots,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    pub grid_visible: bool,
    /// 网格间距（像素）
    pub grid_spacing: f64,
    pub grid_type: GridType,
    pub snap_to_grid: bool,
    pub snap_to_point: bool,
    /// 捕捉半径（像素）
    pub snap_radius: f64,
    pub background: Color,
    zoom: f64,
    pub pan: Vector2,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            grid_visible: true,
            grid_spacing: 50.0,
            grid_type: GridType::Lines,
            snap_to_grid: false,
            snap_to_point: true,
            snap_radius: 10.0,
            background: Color::WHITE,
            zoom: 1.0,
            pan: Vector2::zeros(),
        }
    }
}

impl CanvasSettings {
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// 设置缩放，钳制到 [0.1, 5.0]；NaN 被忽略
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_nan() {
            return;
        }
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_by(&mut self, factor: f64) {
        self.set_zoom(self.zoom * factor);
    }

    pub fn pan_by(&mut self, delta: Vector2) {
        self.pan += delta;
    }

    /// 恢复默认缩放和平移
    pub fn reset_view(&mut self) {
        self.zoom = 1.0;
        self.pan = Vector2::zeros();
    }

    /// 加载后修正越界值
    pub fn normalized(mut self) -> Self {
        let zoom = if self.zoom.is_finite() { self.zoom } else { 1.0 };
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        if !(self.grid_spacing.is_finite() && self.grid_spacing > 0.0) {
            self.grid_spacing = Self::default().grid_spacing;
        }
        if !(self.snap_radius.is_finite() && self.snap_radius >= 0.0) {
            self.snap_radius = Self::default().snap_radius;
        }
        self
    }
}
