//! Plot descriptors for MC tracks and detector hits.
//!
//! [`plot_mc_tracks`] turns an MC particle table into styled line segments;
//! [`HitMarkers::from_collection`] turns a hit table into one styled marker
//! set. Both are plain data handed to the viewer.

use crate::collection::Collection;
use crate::config::{McSettings, MarkerSymbol, SortKey, SubdetectorConfig};
use crate::pdg::PdgVisMap;
use crate::records::{MCCollection, MCParticle};

/// One MC particle drawn as a segment from vertex to endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackLine {
    pub start: [f64; 3],
    pub end: [f64; 3],
    /// Hex colour (`#rrggbb`).
    pub color: String,
    pub width: f64,
    /// Legend and hover text.
    pub label: String,
    pub pdg: i32,
    pub energy: f64,
}

/// All hits of one branch drawn as markers.
#[derive(Debug, Clone, PartialEq)]
pub struct HitMarkers {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    /// Per-hit hover text (the deposited energy).
    pub text: Vec<String>,
    pub size: f32,
    pub symbol: MarkerSymbol,
    pub color: String,
    pub opacity: f32,
    /// Branch name.
    pub name: String,
}

impl HitMarkers {
    /// Markers for a hit table, styled by its branch settings.
    ///
    /// Returns `None` for an MC particle table, which is drawn as tracks.
    pub fn from_collection(collection: &Collection, sub: &SubdetectorConfig) -> Option<Self> {
        let cols = collection.hit_columns()?;
        Some(Self {
            x: cols.x.to_vec(),
            y: cols.y.to_vec(),
            z: cols.z.to_vec(),
            text: cols.e.iter().map(|e| e.to_string()).collect(),
            size: sub.size,
            symbol: sub.shape,
            color: sub.color.clone(),
            opacity: 1.0,
            name: sub.branch.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// One drawable item of an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Trace {
    Markers(HitMarkers),
    Track(TrackLine),
}

impl Trace {
    pub fn name(&self) -> &str {
        match self {
            Trace::Markers(m) => &m.name,
            Trace::Track(t) => &t.label,
        }
    }

    pub fn color(&self) -> &str {
        match self {
            Trace::Markers(m) => &m.color,
            Trace::Track(t) => &t.color,
        }
    }
}

fn passes_cuts(p: &MCParticle, settings: &McSettings) -> bool {
    let above_energy = p.energy > settings.e_cutoff_gev;
    let above_length = p.pathlength > settings.pathlength_mm;
    let shown = !settings.limit_pdg || settings.pdg_show.contains(&p.pdg);
    above_energy && above_length && shown
}

fn track_label(p: &MCParticle, pdg_map: &PdgVisMap) -> String {
    let meters = p.pathlength / 1000.0;
    match pdg_map.name(p.pdg) {
        Some(name) => format!("{:<6} ({:.6} GeV, {:.3} m)", name, p.energy, meters),
        None => format!("Unknown ({:.6} GeV, {:.3} m)", p.energy, meters),
    }
}

fn track_width(p: &MCParticle, settings: &McSettings) -> f64 {
    if settings.line_width_by_energy {
        p.energy.ln() + settings.mc_e_cutoff_gev.ln().abs()
    } else {
        settings.def_line_width
    }
}

/// Select, order and style the MC particles of one event.
///
/// Particles are stably sorted (time ascending or energy descending), then
/// kept only if they pass the energy, length and species cuts. The output
/// keeps the sorted order.
pub fn plot_mc_tracks(
    collection: &MCCollection,
    settings: &McSettings,
    pdg_map: &PdgVisMap,
) -> Vec<TrackLine> {
    let mut sorted: Vec<&MCParticle> = collection.iter().collect();
    match settings.sort_by {
        SortKey::Time => sorted.sort_by(|a, b| a.time.total_cmp(&b.time)),
        SortKey::Energy => sorted.sort_by(|a, b| b.energy.total_cmp(&a.energy)),
    }

    sorted
        .into_iter()
        .filter(|p| passes_cuts(p, settings))
        .map(|p| TrackLine {
            start: [p.vx, p.vy, p.vz],
            end: [p.endx, p.endy, p.endz],
            color: pdg_map.color(p.pdg).to_string(),
            width: track_width(p, settings),
            label: track_label(p, pdg_map),
            pdg: p.pdg,
            energy: p.energy,
        })
        .collect()
}
