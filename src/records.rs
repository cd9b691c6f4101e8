//! Flat display records and their columnar tables.
//!
//! Each record is converted from one raw EDM4hep record with all derived
//! quantities computed up front. The tables (`MCCollection`,
//! `SimTrackerHitCollection`, `SimCalorimeterHitCollection`) are generated by
//! `#[derive(Record)]` and expose one column per field.

use crate::edm4hep::{RawMCParticle, RawSimCalorimeterHit, RawSimTrackerHit};
use crate::Record;

/// One simulated (Monte Carlo truth) particle.
#[derive(Record, Debug, Clone, PartialEq)]
#[record(table = "MCCollection", rows = "particles")]
pub struct MCParticle {
    pub pdg: i32,
    pub generator_status: i32,
    pub simulator_status: i32,
    pub charge: f64,
    #[record(unit = "ns")]
    pub time: f64,
    #[record(unit = "GeV")]
    pub mass: f64,
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
    pub endx: f64,
    pub endy: f64,
    pub endz: f64,
    pub px: f64,
    pub py: f64,
    pub pz: f64,
    pub endpx: f64,
    pub endpy: f64,
    pub endpz: f64,
    pub spin: [f32; 3],
    pub color_flow: [i32; 2],
    /// `sqrt(p² + m²)`.
    #[record(unit = "GeV")]
    pub energy: f64,
    /// Straight-line distance from vertex to endpoint.
    #[record(unit = "mm")]
    pub pathlength: f64,
}

impl MCParticle {
    pub fn from_raw(raw: &RawMCParticle) -> Self {
        let (vx, vy, vz) = (raw.vertex.x, raw.vertex.y, raw.vertex.z);
        let (endx, endy, endz) = (raw.endpoint.x, raw.endpoint.y, raw.endpoint.z);
        let (px, py, pz) = (raw.momentum.x, raw.momentum.y, raw.momentum.z);
        let mass = raw.mass;

        let energy = (px * px + py * py + pz * pz + mass * mass).sqrt();
        let pathlength =
            ((vx - endx) * (vx - endx) + (vy - endy) * (vy - endy) + (vz - endz) * (vz - endz))
                .sqrt();

        Self {
            pdg: raw.pdg,
            generator_status: raw.generator_status,
            simulator_status: raw.simulator_status,
            charge: raw.charge as f64,
            time: raw.time as f64,
            mass,
            vx,
            vy,
            vz,
            endx,
            endy,
            endz,
            px,
            py,
            pz,
            endpx: raw.momentum_at_endpoint.x,
            endpy: raw.momentum_at_endpoint.y,
            endpz: raw.momentum_at_endpoint.z,
            spin: [raw.spin.x, raw.spin.y, raw.spin.z],
            color_flow: [raw.color_flow.a, raw.color_flow.b],
            energy,
            pathlength,
        }
    }
}

/// Spherical coordinates of a hit position: `(r, theta, phi)`.
///
/// `theta` is zero at the origin rather than undefined.
fn spherical(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let r = (x * x + y * y + z * z).sqrt();
    let theta = if r != 0.0 {
        (z / r).clamp(-1.0, 1.0).acos()
    } else {
        0.0
    };
    let phi = y.atan2(x);
    (r, theta, phi)
}

/// One tracker hit.
#[derive(Record, Debug, Clone, PartialEq)]
#[record(table = "SimTrackerHitCollection", rows = "hits")]
pub struct SimTrackerHit {
    pub cell_id: u64,
    /// Deposited energy.
    #[record(unit = "GeV")]
    pub e: f64,
    #[record(unit = "ns")]
    pub time: f64,
    #[record(unit = "mm")]
    pub pathlength: f64,
    pub quality: i32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub px: f64,
    pub py: f64,
    pub pz: f64,
    #[record(unit = "mm")]
    pub r: f64,
    #[record(unit = "rad")]
    pub theta: f64,
    #[record(unit = "rad")]
    pub phi: f64,
}

impl SimTrackerHit {
    pub fn from_raw(raw: &RawSimTrackerHit) -> Self {
        let (x, y, z) = (raw.position.x, raw.position.y, raw.position.z);
        let (r, theta, phi) = spherical(x, y, z);

        Self {
            cell_id: raw.cell_id,
            e: raw.e_dep as f64,
            time: raw.time as f64,
            pathlength: raw.path_length as f64,
            quality: raw.quality,
            x,
            y,
            z,
            px: raw.momentum.x as f64,
            py: raw.momentum.y as f64,
            pz: raw.momentum.z as f64,
            r,
            theta,
            phi,
        }
    }
}

/// One calorimeter hit.
#[derive(Record, Debug, Clone, PartialEq)]
#[record(table = "SimCalorimeterHitCollection", rows = "hits")]
pub struct SimCalorimeterHit {
    pub cell_id: u64,
    #[record(unit = "GeV")]
    pub e: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[record(unit = "mm")]
    pub r: f64,
    #[record(unit = "rad")]
    pub theta: f64,
    #[record(unit = "rad")]
    pub phi: f64,
}

impl SimCalorimeterHit {
    pub fn from_raw(raw: &RawSimCalorimeterHit) -> Self {
        let (x, y, z) = (
            raw.position.x as f64,
            raw.position.y as f64,
            raw.position.z as f64,
        );
        let (r, theta, phi) = spherical(x, y, z);

        Self {
            cell_id: raw.cell_id,
            e: raw.energy as f64,
            x,
            y,
            z,
            r,
            theta,
            phi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edm4hep::{Vector2i, Vector3d, Vector3f};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn v(x: f64, y: f64, z: f64) -> Vector3d {
        Vector3d { x, y, z }
    }

    fn raw_particle(momentum: Vector3d, mass: f64) -> RawMCParticle {
        RawMCParticle {
            pdg: 11,
            generator_status: 1,
            simulator_status: 0,
            charge: -1.0,
            time: 0.5,
            mass,
            vertex: v(1.0, 2.0, 3.0),
            endpoint: v(4.0, 6.0, 3.0),
            momentum,
            momentum_at_endpoint: v(0.0, 0.0, 0.0),
            spin: Vector3f::default(),
            color_flow: Vector2i { a: 3, b: 4 },
        }
    }

    fn cal_hit(x: f32, y: f32, z: f32) -> SimCalorimeterHit {
        SimCalorimeterHit::from_raw(&RawSimCalorimeterHit {
            cell_id: 1,
            energy: 0.1,
            position: Vector3f { x, y, z },
        })
    }

    #[test]
    fn test_particle_energy_and_pathlength() {
        let p = MCParticle::from_raw(&raw_particle(v(3.0, 0.0, 0.0), 4.0));

        assert!((p.energy - 5.0).abs() < 1e-12);
        assert!((p.pathlength - 5.0).abs() < 1e-12);
        assert_eq!(p.color_flow, [3, 4]);
        assert_eq!((p.vx, p.endy), (1.0, 6.0));
    }

    #[test]
    fn test_energy_never_below_mass() {
        for (p, m) in [(0.0, 0.938), (1e-9, 0.105), (250.0, 0.0), (0.3, 0.000511)] {
            let particle = MCParticle::from_raw(&raw_particle(v(p, -p, p), m));
            assert!(particle.energy >= particle.mass);
        }
    }

    #[test]
    fn test_hit_at_origin_has_zero_theta() {
        let hit = cal_hit(0.0, 0.0, 0.0);
        assert_eq!(hit.r, 0.0);
        assert_eq!(hit.theta, 0.0);
    }

    #[test]
    fn test_hit_angles() {
        let up = cal_hit(0.0, 0.0, 5.0);
        assert_eq!(up.theta, 0.0);

        let down = cal_hit(0.0, 0.0, -5.0);
        assert!((down.theta - PI).abs() < 1e-12);

        let side = cal_hit(0.0, 2.0, 0.0);
        assert!((side.theta - FRAC_PI_2).abs() < 1e-12);
        assert!((side.phi - FRAC_PI_2).abs() < 1e-12);
        assert!((side.r - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_theta_stays_in_range() {
        for &(x, y, z) in &[
            (1e-30f32, 0.0, 1.0),
            (0.0, 1e-20, -3.0),
            (123.4, -56.7, 8.9),
            (-1.0, -1.0, -1.0),
        ] {
            let hit = cal_hit(x, y, z);
            assert!(hit.theta >= 0.0 && hit.theta <= PI, "theta {} out of range", hit.theta);
            assert!(hit.r > 0.0);
            assert!(hit.theta != 0.0 || z > 0.0);
        }
    }

    #[test]
    fn test_tracker_hit_conversion() {
        let hit = SimTrackerHit::from_raw(&RawSimTrackerHit {
            cell_id: 99,
            e_dep: 0.5,
            time: 2.0,
            path_length: 0.25,
            quality: 1,
            position: v(3.0, 4.0, 0.0),
            momentum: Vector3f { x: 1.0, y: 2.0, z: 3.0 },
        });

        assert_eq!(hit.cell_id, 99);
        assert_eq!(hit.e, 0.5);
        assert!((hit.r - 5.0).abs() < 1e-12);
        assert!((hit.theta - FRAC_PI_2).abs() < 1e-12);
        assert_eq!(hit.pz, 3.0);
    }

    #[test]
    fn test_collection_columns_follow_rows() {
        let particles: Vec<MCParticle> = [1.0, 2.0, 3.0]
            .iter()
            .map(|&p| MCParticle::from_raw(&raw_particle(v(p, 0.0, 0.0), 0.0)))
            .collect();
        let coll = MCCollection::new(particles.clone());

        assert_eq!(coll.len(), 3);
        assert_eq!(coll.px, vec![1.0, 2.0, 3.0]);
        assert_eq!(coll.energy, vec![1.0, 2.0, 3.0]);
        assert_eq!(coll.particles(), particles.as_slice());
        assert_eq!(coll.iter().count(), 3);
    }

    #[test]
    fn test_empty_collection() {
        let coll = SimCalorimeterHitCollection::new(Vec::new());
        assert_eq!(coll.len(), 0);
        assert!(coll.is_empty());
        assert!(coll.x.is_empty() && coll.y.is_empty() && coll.z.is_empty());
        assert!(coll.e.is_empty() && coll.theta.is_empty() && coll.cell_id.is_empty());
    }

    #[test]
    fn test_inspect_fields_uses_units() {
        let hit = cal_hit(1.0, 0.0, 0.0);
        let fields = hit.inspect_fields();

        assert_eq!(fields.len(), SimCalorimeterHit::FIELD_NAMES.len());
        assert_eq!(fields[0], ("cell_id", "1".to_string()));
        assert_eq!(fields[5], ("r", "1.0000 mm".to_string()));
    }
}
