//! Collection kinds and their conversion from the event store.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::edm4hep::{RawMCParticle, RawSimCalorimeterHit, RawSimTrackerHit};
use crate::error::EventStoreError;
use crate::records::{
    MCCollection, MCParticle, SimCalorimeterHit, SimCalorimeterHitCollection, SimTrackerHit,
    SimTrackerHitCollection,
};
use crate::store::EventReader;

/// Declared type of a configured branch.
///
/// Unrecognized type names deserialize to [`CollectionKind::Unknown`] and the
/// branch is skipped when loading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    MCParticle,
    SimTrackerHit,
    SimCalorimeterHit,
    #[serde(untagged)]
    Unknown(String),
}

impl CollectionKind {
    /// Read `branch` of `entry` and build its table.
    ///
    /// `limit` only applies to MC particles. Returns `Ok(None)` for
    /// [`CollectionKind::Unknown`].
    pub fn load<R: EventReader>(
        &self,
        reader: &R,
        entry: usize,
        branch: &str,
        limit: Option<usize>,
    ) -> Result<Option<Collection>, EventStoreError> {
        let collection = match self {
            CollectionKind::MCParticle => {
                let raw: Vec<RawMCParticle> = reader.read(entry, branch, limit)?;
                Collection::MCParticles(raw.iter().map(MCParticle::from_raw).collect())
            }
            CollectionKind::SimTrackerHit => {
                let raw: Vec<RawSimTrackerHit> = reader.read(entry, branch, None)?;
                Collection::TrackerHits(raw.iter().map(SimTrackerHit::from_raw).collect())
            }
            CollectionKind::SimCalorimeterHit => {
                let raw: Vec<RawSimCalorimeterHit> = reader.read(entry, branch, None)?;
                Collection::CalorimeterHits(raw.iter().map(SimCalorimeterHit::from_raw).collect())
            }
            CollectionKind::Unknown(_) => return Ok(None),
        };
        Ok(Some(collection))
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionKind::MCParticle => write!(f, "MCParticle"),
            CollectionKind::SimTrackerHit => write!(f, "SimTrackerHit"),
            CollectionKind::SimCalorimeterHit => write!(f, "SimCalorimeterHit"),
            CollectionKind::Unknown(name) => write!(f, "{}", name),
        }
    }
}

/// A loaded table of one of the supported kinds.
#[derive(Debug, Clone)]
pub enum Collection {
    MCParticles(MCCollection),
    TrackerHits(SimTrackerHitCollection),
    CalorimeterHits(SimCalorimeterHitCollection),
}

/// Hit positions and energies, borrowed from a hit table.
#[derive(Debug, Clone, Copy)]
pub struct HitColumns<'a> {
    pub x: &'a [f64],
    pub y: &'a [f64],
    pub z: &'a [f64],
    pub e: &'a [f64],
}

impl Collection {
    /// Number of records.
    pub fn len(&self) -> usize {
        match self {
            Collection::MCParticles(c) => c.len(),
            Collection::TrackerHits(c) => c.len(),
            Collection::CalorimeterHits(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> CollectionKind {
        match self {
            Collection::MCParticles(_) => CollectionKind::MCParticle,
            Collection::TrackerHits(_) => CollectionKind::SimTrackerHit,
            Collection::CalorimeterHits(_) => CollectionKind::SimCalorimeterHit,
        }
    }

    pub fn as_mc(&self) -> Option<&MCCollection> {
        match self {
            Collection::MCParticles(c) => Some(c),
            _ => None,
        }
    }

    /// Position and energy columns of a hit table. `None` for MC particles.
    pub fn hit_columns(&self) -> Option<HitColumns<'_>> {
        match self {
            Collection::TrackerHits(c) => Some(HitColumns {
                x: &c.x,
                y: &c.y,
                z: &c.z,
                e: &c.e,
            }),
            Collection::CalorimeterHits(c) => Some(HitColumns {
                x: &c.x,
                y: &c.y,
                z: &c.z,
                e: &c.e,
            }),
            Collection::MCParticles(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Edm4hepJson, EventSource};
    use serde_json::json;

    #[test]
    fn test_kind_names() {
        let kinds: Vec<CollectionKind> =
            serde_json::from_str(r#"["MCParticle", "SimTrackerHit", "SimCalorimeterHit", "TrackerHitPlane"]"#)
                .unwrap();
        assert_eq!(
            kinds,
            vec![
                CollectionKind::MCParticle,
                CollectionKind::SimTrackerHit,
                CollectionKind::SimCalorimeterHit,
                CollectionKind::Unknown("TrackerHitPlane".to_string()),
            ]
        );
        assert_eq!(kinds[3].to_string(), "TrackerHitPlane");
        assert_eq!(serde_json::to_string(&kinds[0]).unwrap(), "\"MCParticle\"");
    }

    #[test]
    fn test_unknown_kind_loads_nothing() {
        let source = Edm4hepJson::from_value(json!({"Event 0": {"Planes": {"collection": [{}]}}}));
        let reader = source.open().unwrap();
        let kind = CollectionKind::Unknown("TrackerHitPlane".to_string());
        assert!(kind.load(&reader, 0, "Planes", None).unwrap().is_none());
    }

    #[test]
    fn test_hit_columns() {
        let source = Edm4hepJson::from_value(json!({"Event 0": {"Calo": {"collection": [
            {"cellID": 1, "energy": 0.5, "position": {"x": 1.0, "y": 2.0, "z": 3.0}}
        ]}}}));
        let reader = source.open().unwrap();
        let coll = CollectionKind::SimCalorimeterHit
            .load(&reader, 0, "Calo", None)
            .unwrap()
            .unwrap();

        assert_eq!(coll.kind(), CollectionKind::SimCalorimeterHit);
        assert_eq!(coll.len(), 1);
        let cols = coll.hit_columns().unwrap();
        assert_eq!((cols.x[0], cols.y[0], cols.z[0], cols.e[0]), (1.0, 2.0, 3.0, 0.5));
        assert!(coll.as_mc().is_none());
    }
}
