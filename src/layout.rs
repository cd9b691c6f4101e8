//! Scene layout computed from the plot settings.

use glam::Vec3;

use crate::config::{PlotSettings, Projection};
use crate::error::ConfigError;

/// Fully transparent background colour.
pub const TRANSPARENT: &str = "rgba(0,0,0,0)";

/// Ticks drawn along each axis.
pub const AXIS_TICKS: u32 = 4;

/// One axis of the scene box.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLayout {
    pub range: [f64; 2],
    pub nticks: u32,
    pub show_grid: bool,
    pub show_line: bool,
    pub zero_line: bool,
}

impl AxisLayout {
    fn new(range: [f64; 2], show_grid: bool) -> Self {
        Self {
            range,
            nticks: AXIS_TICKS,
            show_grid,
            show_line: show_grid,
            zero_line: show_grid,
        }
    }

    pub fn span(&self) -> f64 {
        self.range[1] - self.range[0]
    }

    /// Evenly spaced tick positions, both ends included.
    pub fn ticks(&self) -> Vec<f64> {
        let steps = self.nticks.max(2) - 1;
        (0..=steps)
            .map(|i| self.range[0] + self.span() * i as f64 / steps as f64)
            .collect()
    }
}

/// Initial camera, in scene-box units.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraLayout {
    pub eye: [f64; 3],
    pub center: [f64; 3],
    pub up: [f64; 3],
    pub projection: Projection,
}

/// Legend styling.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendLayout {
    /// Legend symbols keep a constant size regardless of trace size.
    pub constant_item_sizing: bool,
    pub item_width: f64,
    pub font_size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margin {
    pub l: f64,
    pub r: f64,
    pub b: f64,
    pub t: f64,
}

/// Everything the viewer needs to frame a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLayout {
    pub x: AxisLayout,
    pub y: AxisLayout,
    pub z: AxisLayout,
    /// Each axis span divided by the largest span.
    pub aspect: [f64; 3],
    pub camera: CameraLayout,
    /// Theme name, `None` for a transparent scene.
    pub template: Option<String>,
    pub width: u32,
    pub height: u32,
    pub autosize: bool,
    pub paper_bgcolor: String,
    pub plot_bgcolor: String,
    pub margin: Margin,
    pub legend: LegendLayout,
}

impl SceneLayout {
    pub fn from_settings(settings: &PlotSettings) -> Result<Self, ConfigError> {
        let x = AxisLayout::new(settings.xlim, settings.show_grid);
        let y = AxisLayout::new(settings.ylim, settings.show_grid);
        let z = AxisLayout::new(settings.zlim, settings.show_grid);

        for (name, axis) in [("x", &x), ("y", &y), ("z", &z)] {
            let span = axis.span();
            if !(span > 0.0) || !span.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "{}lim {:?} must be an increasing finite range",
                    name, axis.range
                )));
            }
        }
        let norm = x.span().max(y.span()).max(z.span());
        let aspect = [x.span() / norm, y.span() / norm, z.span() / norm];

        let template = if settings.transparent {
            None
        } else {
            Some(settings.plotly_template.clone())
        };

        Ok(Self {
            x,
            y,
            z,
            aspect,
            camera: CameraLayout {
                eye: [0.0, 1.0, 0.0],
                center: [0.0, 0.0, 0.0],
                up: [0.0, 1.0, 0.0],
                projection: settings.projection,
            },
            template,
            width: settings.width,
            height: settings.height,
            autosize: false,
            paper_bgcolor: TRANSPARENT.to_string(),
            plot_bgcolor: TRANSPARENT.to_string(),
            margin: Margin::default(),
            legend: LegendLayout {
                constant_item_sizing: true,
                item_width: settings.itemwidth,
                font_size: settings.legend_font_size,
            },
        })
    }

    /// Map a point in data coordinates into the scene box.
    ///
    /// The box is centred on the origin and spans `aspect[i]` along axis `i`.
    pub fn to_scene(&self, point: [f64; 3]) -> Vec3 {
        let axes = [&self.x, &self.y, &self.z];
        let mut out = [0.0f32; 3];
        for i in 0..3 {
            let axis = axes[i];
            let t = (point[i] - axis.range[0]) / axis.span() - 0.5;
            out[i] = (t * self.aspect[i]) as f32;
        }
        Vec3::from_array(out)
    }

    /// Half extents of the scene box.
    pub fn half_extents(&self) -> Vec3 {
        Vec3::new(
            self.aspect[0] as f32,
            self.aspect[1] as f32,
            self.aspect[2] as f32,
        ) * 0.5
    }
}
