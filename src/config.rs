//! Display configuration.
//!
//! One JSON document configures a display session:
//!
//! ```json
//! {
//!   "max_mc": -1,
//!   "subdetectors": [
//!     {"branch": "MCParticles", "type": "MCParticle"},
//!     {"branch": "ToyCaloHits", "type": "SimCalorimeterHit",
//!      "size": 2.0, "shape": "square", "color": "#2a9d8f"}
//!   ],
//!   "mc_settings": {"sortBy": "energy", "Ecutoff_GeV": 0.1, "pathlength_mm": 1.0,
//!                   "limitPDG": false, "PDG_show": [], "lineWidthByEnergy": true,
//!                   "MC_Ecutoff_GeV": 0.1, "defLineWidth": 2.0},
//!   "plot_settings": {"xlim": [-1500, 1500], "ylim": [-1500, 1500], "zlim": [-1500, 1500],
//!                     "showGrid": false, "transparent": true,
//!                     "plotly_template": "plotly_dark", "width": 1200, "height": 900,
//!                     "projection": "perspective", "itemwidth": 30,
//!                     "legend_font_size": 12}
//! }
//! ```
//!
//! Every section and key has a default, so `{}` is a valid configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::collection::CollectionKind;
use crate::error::ConfigError;
use crate::pdg::FALLBACK_COLOR;

/// Marker symbols understood by the viewer (the plotly 3D scatter set).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerSymbol {
    #[default]
    Circle,
    CircleOpen,
    Cross,
    Diamond,
    DiamondOpen,
    Square,
    SquareOpen,
    X,
}

impl MarkerSymbol {
    pub const ALL: [MarkerSymbol; 8] = [
        MarkerSymbol::Circle,
        MarkerSymbol::CircleOpen,
        MarkerSymbol::Cross,
        MarkerSymbol::Diamond,
        MarkerSymbol::DiamondOpen,
        MarkerSymbol::Square,
        MarkerSymbol::SquareOpen,
        MarkerSymbol::X,
    ];

    /// Shape index passed to the marker shader.
    pub fn shape_id(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            MarkerSymbol::Circle => "circle",
            MarkerSymbol::CircleOpen => "circle-open",
            MarkerSymbol::Cross => "cross",
            MarkerSymbol::Diamond => "diamond",
            MarkerSymbol::DiamondOpen => "diamond-open",
            MarkerSymbol::Square => "square",
            MarkerSymbol::SquareOpen => "square-open",
            MarkerSymbol::X => "x",
        }
    }
}

fn default_marker_size() -> f32 {
    2.0
}

fn default_marker_color() -> String {
    FALLBACK_COLOR.to_string()
}

/// Display settings for one branch of the event store.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SubdetectorConfig {
    pub branch: String,
    #[serde(rename = "type")]
    pub kind: CollectionKind,
    #[serde(default = "default_marker_size")]
    pub size: f32,
    #[serde(default)]
    pub shape: MarkerSymbol,
    #[serde(default = "default_marker_color")]
    pub color: String,
}

impl SubdetectorConfig {
    pub fn new(branch: impl Into<String>, kind: CollectionKind) -> Self {
        Self {
            branch: branch.into(),
            kind,
            size: default_marker_size(),
            shape: MarkerSymbol::default(),
            color: default_marker_color(),
        }
    }

    pub fn with_marker(mut self, size: f32, shape: MarkerSymbol, color: impl Into<String>) -> Self {
        self.size = size;
        self.shape = shape;
        self.color = color.into();
        self
    }
}

/// Key MC particles are ordered by before drawing.
///
/// `"time"` selects [`SortKey::Time`]; any other value selects
/// [`SortKey::Energy`].
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum SortKey {
    /// Ascending production time.
    Time,
    /// Descending energy.
    #[default]
    Energy,
}

impl From<String> for SortKey {
    fn from(value: String) -> Self {
        if value == "time" {
            SortKey::Time
        } else {
            SortKey::Energy
        }
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Time => "time".to_string(),
            SortKey::Energy => "energy".to_string(),
        }
    }
}

/// Selection and styling of MC tracks.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct McSettings {
    #[serde(rename = "sortBy")]
    pub sort_by: SortKey,
    /// Tracks at or below this energy are hidden.
    #[serde(rename = "Ecutoff_GeV")]
    pub e_cutoff_gev: f64,
    /// Tracks at or below this length are hidden.
    #[serde(rename = "pathlength_mm")]
    pub pathlength_mm: f64,
    #[serde(rename = "limitPDG")]
    pub limit_pdg: bool,
    /// Allowed PDG codes when `limit_pdg` is set.
    #[serde(rename = "PDG_show")]
    pub pdg_show: Vec<i32>,
    #[serde(rename = "lineWidthByEnergy")]
    pub line_width_by_energy: bool,
    /// Reference energy for energy-scaled line widths.
    #[serde(rename = "MC_Ecutoff_GeV")]
    pub mc_e_cutoff_gev: f64,
    #[serde(rename = "defLineWidth")]
    pub def_line_width: f64,
}

impl Default for McSettings {
    fn default() -> Self {
        Self {
            sort_by: SortKey::Energy,
            e_cutoff_gev: 0.1,
            pathlength_mm: 1.0,
            limit_pdg: false,
            pdg_show: Vec::new(),
            line_width_by_energy: true,
            mc_e_cutoff_gev: 0.1,
            def_line_width: 2.0,
        }
    }
}

/// Camera projection.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

impl Projection {
    pub fn toggled(self) -> Self {
        match self {
            Projection::Perspective => Projection::Orthographic,
            Projection::Orthographic => Projection::Perspective,
        }
    }
}

/// Scene layout settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlotSettings {
    pub xlim: [f64; 2],
    pub ylim: [f64; 2],
    pub zlim: [f64; 2],
    #[serde(rename = "showGrid")]
    pub show_grid: bool,
    pub transparent: bool,
    pub plotly_template: String,
    pub width: u32,
    pub height: u32,
    pub projection: Projection,
    pub itemwidth: f64,
    pub legend_font_size: f64,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            xlim: [-1500.0, 1500.0],
            ylim: [-1500.0, 1500.0],
            zlim: [-1500.0, 1500.0],
            show_grid: false,
            transparent: true,
            plotly_template: "plotly_dark".to_string(),
            width: 1200,
            height: 900,
            projection: Projection::Perspective,
            itemwidth: 30.0,
            legend_font_size: 12.0,
        }
    }
}

fn default_max_mc() -> i64 {
    -1
}

fn default_subdetectors() -> Vec<SubdetectorConfig> {
    vec![SubdetectorConfig::new("MCParticles", CollectionKind::MCParticle)]
}

/// Complete configuration of a display session.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    /// Maximum MC particles read per event, `-1` for all of them.
    #[serde(default = "default_max_mc")]
    pub max_mc: i64,
    /// Branches to display, in drawing order.
    #[serde(default = "default_subdetectors")]
    pub subdetectors: Vec<SubdetectorConfig>,
    #[serde(default)]
    pub mc_settings: McSettings,
    #[serde(default)]
    pub plot_settings: PlotSettings,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_mc: default_max_mc(),
            subdetectors: default_subdetectors(),
            mc_settings: McSettings::default(),
            plot_settings: PlotSettings::default(),
        }
    }
}

impl DisplayConfig {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config: DisplayConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// MC particle limit: `None` for `-1`, `Some(n)` for `n >= 0`.
    pub fn max_mc_limit(&self) -> Result<Option<usize>, ConfigError> {
        match self.max_mc {
            -1 => Ok(None),
            n if n >= 0 => Ok(Some(n as usize)),
            n => Err(ConfigError::Invalid(format!(
                "max_mc must be -1 or a non-negative count, got {}",
                n
            ))),
        }
    }

    /// Check values that deserialize fine but cannot be displayed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.max_mc_limit()?;

        for (i, sub) in self.subdetectors.iter().enumerate() {
            if self.subdetectors[..i].iter().any(|s| s.branch == sub.branch) {
                return Err(ConfigError::Invalid(format!(
                    "branch '{}' is configured twice",
                    sub.branch
                )));
            }
            if !(sub.size > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "marker size of '{}' must be positive",
                    sub.branch
                )));
            }
        }

        let mc = &self.mc_settings;
        if mc.line_width_by_energy && !(mc.mc_e_cutoff_gev > 0.0) {
            return Err(ConfigError::Invalid(
                "MC_Ecutoff_GeV must be positive when lineWidthByEnergy is set".to_string(),
            ));
        }

        let plot = &self.plot_settings;
        if plot.width == 0 || plot.height == 0 {
            return Err(ConfigError::Invalid(
                "plot width and height must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
