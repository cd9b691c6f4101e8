//! # caloview - Event display for calorimeter simulations
//!
//! Loads EDM4hep events, turns Monte Carlo particles into colour-coded
//! track segments and detector hits into marker clouds, and draws them in
//! a 3D scene with wgpu.
//!
//! ## Quick Start
//!
//! ```ignore
//! use caloview::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pdg = PdgVisMap::from_file("data/PDG_IDs.txt")?;
//!     let config = DisplayConfig::load("display.json")?;
//!     let source = Edm4hepJsonFile::new("events.edm4hep.json");
//!
//!     let mut plot = DetPlot::from_config(source, &config, pdg)?;
//!     plot.load_hits_for_event(0)?;
//!     plot.print_sizes_for_event(0);
//!
//!     let layout = SceneLayout::from_settings(&config.plot_settings)?;
//!     caloview::viewer::run(plot, layout, 0, ViewerOptions::default())?;
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Records and tables
//!
//! Each EDM4hep collection type has a flat record ([`MCParticle`],
//! [`SimTrackerHit`], [`SimCalorimeterHit`]) built from the raw JSON
//! record. `#[derive(Record)]` generates the matching table type with one
//! column per field, so the renderer can take `x`, `y`, `z`, `e` columns
//! directly:
//!
//! ```ignore
//! #[derive(Record, Debug, Clone)]
//! #[record(table = "CellTable", rows = "cells")]
//! struct Cell {
//!     cell_id: u64,
//!     #[record(unit = "GeV")]
//!     e: f64,
//! }
//! ```
//!
//! ### Subdetectors
//!
//! A [`SubdetectorConfig`] names a branch, its collection kind and its
//! marker style. [`DetPlot`] loads every configured branch of an event into
//! its cache and turns them into [`Trace`]s:
//!
//! - `MCParticle` branches become one [`TrackLine`] per selected particle
//! - hit branches become one [`HitMarkers`] set each
//!
//! ### Track selection
//!
//! [`plot_mc_tracks`] keeps particles above the energy cut and path length
//! cut (optionally limited to a PDG whitelist), orders them by time or
//! energy, and colours them through the [`PdgVisMap`].
//!
//! ## Feature Overview
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `egui` | Legend and collection-size panel in the viewer window |

extern crate self as caloview;

pub mod collection;
pub mod config;
pub mod display;
pub mod edm4hep;
pub mod error;
pub mod layout;
pub mod pdg;
pub mod records;
pub mod store;
pub mod tracks;
pub mod viewer;

pub use caloview_derive::Record;
pub use collection::{Collection, CollectionKind, HitColumns};
pub use config::{
    DisplayConfig, MarkerSymbol, McSettings, PlotSettings, Projection, SortKey, SubdetectorConfig,
};
pub use display::DetPlot;
pub use error::{ConfigError, DisplayError, EventStoreError, GpuError, PdgMapError, ViewerError};
pub use glam::{Mat4, Vec3};
pub use layout::SceneLayout;
pub use pdg::PdgVisMap;
pub use records::{
    MCCollection, MCParticle, SimCalorimeterHit, SimCalorimeterHitCollection, SimTrackerHit,
    SimTrackerHitCollection,
};
pub use store::{Edm4hepJson, Edm4hepJsonFile, EventReader, EventSource};
pub use tracks::{plot_mc_tracks, HitMarkers, Trace, TrackLine};
pub use viewer::ViewerOptions;

/// Trait automatically implemented by `#[derive(Record)]`.
///
/// Ties a flat record struct to its generated columnar table.
///
/// # Do Not Implement Manually
///
/// The derive macro keeps the table columns in step with the struct
/// fields. Implementing this by hand gives up that guarantee.
pub trait Record: Clone {
    /// Columnar table generated for this record.
    type Table: Table<Row = Self>;

    /// Field names in declaration order.
    const FIELD_NAMES: &'static [&'static str];

    /// Field names paired with formatted values, for display.
    ///
    /// Floats are printed with four decimals; fields declared with
    /// `#[record(unit = "...")]` carry their unit.
    fn inspect_fields(&self) -> Vec<(&'static str, String)>;
}

/// Table of records, implemented by `#[derive(Record)]`.
pub trait Table: Sized {
    type Row: Record<Table = Self>;

    /// Build the table from rows, keeping their order.
    fn from_rows(rows: Vec<Self::Row>) -> Self;

    /// The rows in their original order.
    fn rows(&self) -> &[Self::Row];
}

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use caloview::prelude::*;
/// ```
pub mod prelude {
    pub use crate::collection::{Collection, CollectionKind};
    pub use crate::config::{
        DisplayConfig, MarkerSymbol, McSettings, PlotSettings, Projection, SortKey,
        SubdetectorConfig,
    };
    pub use crate::display::DetPlot;
    pub use crate::layout::SceneLayout;
    pub use crate::pdg::PdgVisMap;
    pub use crate::records::{
        MCCollection, MCParticle, SimCalorimeterHit, SimCalorimeterHitCollection, SimTrackerHit,
        SimTrackerHitCollection,
    };
    pub use crate::store::{Edm4hepJson, Edm4hepJsonFile, EventReader, EventSource};
    pub use crate::tracks::{plot_mc_tracks, HitMarkers, Trace, TrackLine};
    pub use crate::viewer::{OrbitCamera, SceneGeometry, ViewerOptions};
    pub use crate::{Record, Table};
    pub use glam::Vec3;
}
