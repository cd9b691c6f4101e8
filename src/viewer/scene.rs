//! GPU-ready geometry built from an event's traces.

use bytemuck::{Pod, Zeroable};

use crate::config::MarkerSymbol;
use crate::layout::SceneLayout;
use crate::pdg::FALLBACK_COLOR;
use crate::tracks::Trace;

/// Narrowest line drawn, in pixels.
pub const MIN_LINE_WIDTH: f32 = 1.0;

const AXIS_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 1.0];
const GRID_COLOR: [f32; 4] = [0.3, 0.3, 0.3, 1.0];

/// One marker billboard.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MarkerInstance {
    /// Position in scene-box coordinates.
    pub position: [f32; 3],
    /// Diameter in pixels.
    pub size: f32,
    /// Linear RGB plus opacity.
    pub color: [f32; 4],
    /// [`MarkerSymbol::shape_id`].
    pub shape: u32,
    pub _pad: [u32; 3],
}

/// One thick line segment.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineInstance {
    pub start: [f32; 3],
    /// Width in pixels.
    pub width: f32,
    pub end: [f32; 3],
    pub _pad: f32,
    pub color: [f32; 4],
}

/// Legend row for one trace.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    /// sRGB colour.
    pub color: [u8; 3],
    /// Marker symbol, `None` for a track.
    pub symbol: Option<MarkerSymbol>,
}

/// Parse `#rrggbb` (or `rrggbb`) into sRGB bytes.
pub fn parse_hex_color(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

fn srgb_to_linear(c: u8) -> f32 {
    let c = c as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB bytes for a configured colour, gray when it cannot be parsed.
fn srgb_or_fallback(hex: &str) -> [u8; 3] {
    parse_hex_color(hex).unwrap_or_else(|| {
        log::warn!("Unrecognized colour '{}', using {}", hex, FALLBACK_COLOR);
        parse_hex_color(FALLBACK_COLOR).unwrap_or([153, 153, 153])
    })
}

/// Linear RGBA for a configured colour.
pub fn linear_rgba(srgb: [u8; 3], alpha: f32) -> [f32; 4] {
    [
        srgb_to_linear(srgb[0]),
        srgb_to_linear(srgb[1]),
        srgb_to_linear(srgb[2]),
        alpha,
    ]
}

/// Instance data for one event.
#[derive(Debug, Clone, Default)]
pub struct SceneGeometry {
    pub markers: Vec<MarkerInstance>,
    pub lines: Vec<LineInstance>,
    pub legend: Vec<LegendEntry>,
}

impl SceneGeometry {
    /// Convert traces into instances. Missing traces are skipped.
    pub fn build(traces: &[Option<Trace>], layout: &SceneLayout) -> Self {
        let mut geometry = SceneGeometry::default();
        geometry.push_axes(layout);

        for trace in traces.iter().flatten() {
            let srgb = srgb_or_fallback(trace.color());
            match trace {
                Trace::Markers(m) => {
                    let color = linear_rgba(srgb, m.opacity);
                    let n = m.x.len().min(m.y.len()).min(m.z.len());
                    geometry.markers.extend((0..n).map(|i| MarkerInstance {
                        position: layout.to_scene([m.x[i], m.y[i], m.z[i]]).to_array(),
                        size: m.size,
                        color,
                        shape: m.symbol.shape_id(),
                        _pad: [0; 3],
                    }));
                    geometry.legend.push(LegendEntry {
                        label: m.name.clone(),
                        color: srgb,
                        symbol: Some(m.symbol),
                    });
                }
                Trace::Track(t) => {
                    geometry.lines.push(LineInstance {
                        start: layout.to_scene(t.start).to_array(),
                        width: (t.width as f32).max(MIN_LINE_WIDTH),
                        end: layout.to_scene(t.end).to_array(),
                        _pad: 0.0,
                        color: linear_rgba(srgb, 1.0),
                    });
                    geometry.legend.push(LegendEntry {
                        label: t.label.clone(),
                        color: srgb,
                        symbol: None,
                    });
                }
            }
        }

        geometry
    }

    /// Box edges when axis lines are shown, and a tick grid on the far
    /// (minimum y) face when grids are shown.
    fn push_axes(&mut self, layout: &SceneLayout) {
        let h = layout.half_extents().to_array();
        let line = |start: [f32; 3], end: [f32; 3], color: [f32; 4]| LineInstance {
            start,
            width: MIN_LINE_WIDTH,
            end,
            _pad: 0.0,
            color,
        };

        if layout.x.show_line {
            let corner = |sx: f32, sy: f32, sz: f32| [sx * h[0], sy * h[1], sz * h[2]];
            for &a in &[-1.0, 1.0] {
                for &b in &[-1.0, 1.0] {
                    self.lines.push(line(corner(-1.0, a, b), corner(1.0, a, b), AXIS_COLOR));
                    self.lines.push(line(corner(a, -1.0, b), corner(a, 1.0, b), AXIS_COLOR));
                    self.lines.push(line(corner(a, b, -1.0), corner(a, b, 1.0), AXIS_COLOR));
                }
            }
        }

        if layout.x.show_grid {
            let floor = -h[1];
            for x in layout.x.ticks() {
                let sx = layout.to_scene([x, layout.y.range[0], layout.z.range[0]]).x;
                self.lines.push(line([sx, floor, -h[2]], [sx, floor, h[2]], GRID_COLOR));
            }
            for z in layout.z.ticks() {
                let sz = layout.to_scene([layout.x.range[0], layout.y.range[0], z]).z;
                self.lines.push(line([-h[0], floor, sz], [h[0], floor, sz], GRID_COLOR));
            }
        }
    }

    /// Distinct marker symbols in use, in shape-id order.
    pub fn symbols(&self) -> Vec<MarkerSymbol> {
        MarkerSymbol::ALL
            .into_iter()
            .filter(|s| self.markers.iter().any(|m| m.shape == s.shape_id()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty() && self.lines.is_empty()
    }
}
