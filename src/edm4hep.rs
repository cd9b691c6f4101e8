//! Raw EDM4hep records as they appear in the event store.
//!
//! Field names follow the EDM4hep data model so that `edm4hep2json` dumps
//! deserialize directly. These types are read-only inputs; the display works
//! on the flattened records in [`records`](crate::records).

use serde::Deserialize;

/// Double-precision 3-vector (`edm4hep::Vector3d`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Vector3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Single-precision 3-vector (`edm4hep::Vector3f`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Vector3f {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Integer pair (`edm4hep::Vector2i`), used for the colour-flow tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Vector2i {
    pub a: i32,
    pub b: i32,
}

/// `edm4hep::MCParticle`.
///
/// `spin` and `colorFlow` were dropped from later EDM4hep versions, so they
/// default to zero when absent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMCParticle {
    #[serde(rename = "PDG")]
    pub pdg: i32,
    pub generator_status: i32,
    pub simulator_status: i32,
    pub charge: f32,
    pub time: f32,
    pub mass: f64,
    pub vertex: Vector3d,
    pub endpoint: Vector3d,
    pub momentum: Vector3d,
    pub momentum_at_endpoint: Vector3d,
    #[serde(default)]
    pub spin: Vector3f,
    #[serde(default)]
    pub color_flow: Vector2i,
}

/// `edm4hep::SimTrackerHit`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSimTrackerHit {
    #[serde(rename = "cellID")]
    pub cell_id: u64,
    #[serde(rename = "eDep", alias = "EDep")]
    pub e_dep: f32,
    pub time: f32,
    pub path_length: f32,
    pub quality: i32,
    pub position: Vector3d,
    pub momentum: Vector3f,
}

/// `edm4hep::SimCalorimeterHit`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawSimCalorimeterHit {
    #[serde(rename = "cellID")]
    pub cell_id: u64,
    pub energy: f32,
    pub position: Vector3f,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mc_particle_field_names() {
        let json = r#"{
            "PDG": 11, "generatorStatus": 1, "simulatorStatus": 0,
            "charge": -1.0, "time": 0.0, "mass": 0.000511,
            "vertex": {"x": 0.0, "y": 0.0, "z": 0.0},
            "endpoint": {"x": 10.0, "y": 0.0, "z": 0.0},
            "momentum": {"x": 1.0, "y": 0.0, "z": 0.0},
            "momentumAtEndpoint": {"x": 0.5, "y": 0.0, "z": 0.0},
            "spin": {"x": 0.0, "y": 0.0, "z": 0.5},
            "colorFlow": {"a": 1, "b": 2},
            "parents": [], "daughters": []
        }"#;
        let raw: RawMCParticle = serde_json::from_str(json).unwrap();

        assert_eq!(raw.pdg, 11);
        assert_eq!(raw.endpoint.x, 10.0);
        assert_eq!(raw.momentum_at_endpoint.x, 0.5);
        assert_eq!(raw.color_flow, Vector2i { a: 1, b: 2 });
    }

    #[test]
    fn test_mc_particle_without_spin_and_color_flow() {
        let json = r#"{
            "PDG": 22, "generatorStatus": 1, "simulatorStatus": 0,
            "charge": 0.0, "time": 1.5, "mass": 0.0,
            "vertex": {"x": 0.0, "y": 0.0, "z": 0.0},
            "endpoint": {"x": 0.0, "y": 0.0, "z": 0.0},
            "momentum": {"x": 0.0, "y": 0.0, "z": 1.0},
            "momentumAtEndpoint": {"x": 0.0, "y": 0.0, "z": 1.0}
        }"#;
        let raw: RawMCParticle = serde_json::from_str(json).unwrap();
        assert_eq!(raw.spin, Vector3f::default());
        assert_eq!(raw.color_flow, Vector2i::default());
    }

    #[test]
    fn test_tracker_hit_accepts_both_edep_spellings() {
        let old = r#"{"cellID": 7, "EDep": 0.25, "time": 1.0, "pathLength": 0.3,
            "quality": 0, "position": {"x": 1.0, "y": 2.0, "z": 3.0},
            "momentum": {"x": 0.0, "y": 0.0, "z": 0.0}}"#;
        let new = old.replace("EDep", "eDep");

        let a: RawSimTrackerHit = serde_json::from_str(old).unwrap();
        let b: RawSimTrackerHit = serde_json::from_str(&new).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.e_dep, 0.25);
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let json = r#"{"cellID": 7, "position": {"x": 1.0, "y": 2.0, "z": 3.0}}"#;
        assert!(serde_json::from_str::<RawSimCalorimeterHit>(json).is_err());
    }
}
