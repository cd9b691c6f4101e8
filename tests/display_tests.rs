//! End-to-end tests: configuration, event loading, trace assembly and scene
//! geometry over an in-memory EDM4hep document.

use caloview::prelude::*;
use caloview::{DisplayError, EventStoreError};
use serde_json::{json, Value};

const PDG_TABLE: &str = "\
CATEGORY LEPTONS
e- 11
mu- 13
CATEGORY GAUGE AND HIGGS BOSONS
gamma 22
";

const CONFIG: &str = r##"{
    "max_mc": -1,
    "subdetectors": [
        {"branch": "MCParticles", "type": "MCParticle"},
        {"branch": "VertexBarrel", "type": "SimTrackerHit", "shape": "diamond-open", "color": "#e76f51"},
        {"branch": "ToyCaloHits", "type": "SimCalorimeterHit", "size": 3.5, "shape": "square", "color": "#2a9d8f"}
    ],
    "mc_settings": {
        "sortBy": "time",
        "Ecutoff_GeV": 0.5,
        "pathlength_mm": 5.0,
        "lineWidthByEnergy": false,
        "defLineWidth": 3.0
    },
    "plot_settings": {
        "xlim": [-1000, 1000],
        "ylim": [-1000, 1000],
        "zlim": [-2000, 2000],
        "showGrid": true,
        "transparent": false
    }
}"##;

fn particle(pdg: i32, time: f64, pz: f64, length: f64) -> Value {
    json!({
        "PDG": pdg, "generatorStatus": 1, "simulatorStatus": 0,
        "charge": -1.0, "time": time, "mass": 0.0,
        "vertex": {"x": 0.0, "y": 0.0, "z": 0.0},
        "endpoint": {"x": 0.0, "y": 0.0, "z": length},
        "momentum": {"x": 0.0, "y": 0.0, "z": pz},
        "momentumAtEndpoint": {"x": 0.0, "y": 0.0, "z": 0.0},
        "parents": [], "daughters": []
    })
}

fn tracker_hit(cell: u64, x: f64, e: f64) -> Value {
    json!({
        "cellID": cell, "EDep": e, "time": 0.1, "pathLength": 0.3, "quality": 0,
        "position": {"x": x, "y": 0.0, "z": 0.0},
        "momentum": {"x": 0.0, "y": 0.0, "z": 1.0}
    })
}

fn calo_hit(cell: u64, z: f64, e: f64) -> Value {
    json!({"cellID": cell, "energy": e, "position": {"x": 0.0, "y": 0.0, "z": z}})
}

fn document() -> Value {
    json!({
        "Event 0": {
            "MCParticles": {"collID": 1, "collType": "edm4hep::MCParticleCollection", "collection": [
                particle(11, 2.0, 10.0, 900.0),
                particle(22, 0.5, 20.0, 1500.0),
                particle(13, 1.0, 0.2, 700.0),
                particle(-11, 3.0, 1.0, 2.0),
                particle(211, 4.0, 1.0, 100.0)
            ]},
            "VertexBarrel": {"collID": 2, "collType": "edm4hep::SimTrackerHitCollection", "collection": [
                tracker_hit(1, 10.0, 0.001),
                tracker_hit(2, 20.0, 0.002)
            ]},
            "ToyCaloHits": {"collID": 3, "collType": "edm4hep::SimCalorimeterHitCollection", "collection": [
                calo_hit(100, 1000.0, 0.5),
                calo_hit(101, 1010.0, 0.25),
                calo_hit(102, 1020.0, 0.125)
            ]},
            "EventHeader": {"collID": 4, "collType": "edm4hep::EventHeaderCollection", "collection": [{}]}
        },
        "Event 1": {
            "MCParticles": {"collection": [particle(22, 0.0, 3.0, 50.0)]},
            "ToyCaloHits": {"collection": [calo_hit(5, 0.0, 1.0)]}
        }
    })
}

fn plot() -> DetPlot<Edm4hepJson> {
    let config: DisplayConfig = serde_json::from_str(CONFIG).unwrap();
    let pdg = PdgVisMap::parse(PDG_TABLE.as_bytes()).unwrap();
    DetPlot::from_config(Edm4hepJson::from_value(document()), &config, pdg).unwrap()
}

#[test]
fn test_config_defaults_fill_missing_keys() {
    let config: DisplayConfig = serde_json::from_str(CONFIG).unwrap();

    assert_eq!(config.mc_settings.sort_by, SortKey::Time);
    assert!(!config.mc_settings.limit_pdg);
    assert_eq!(config.mc_settings.mc_e_cutoff_gev, 0.1);
    assert_eq!(config.subdetectors[1].size, 2.0);
    assert_eq!(config.subdetectors[1].shape, MarkerSymbol::DiamondOpen);
    assert_eq!(config.plot_settings.width, 1200);
    assert_eq!(config.max_mc_limit().unwrap(), None);
}

#[test]
fn test_num_events() {
    assert_eq!(plot().num_events().unwrap(), 2);
}

#[test]
fn test_load_every_configured_branch() {
    let mut plot = plot();
    plot.load_hits_for_event(0).unwrap();

    assert_eq!(plot.get_hits_for_event(0, "MCParticles").unwrap().len(), 5);
    assert_eq!(plot.get_hits_for_event(0, "VertexBarrel").unwrap().len(), 2);
    assert_eq!(plot.get_hits_for_event(0, "ToyCaloHits").unwrap().len(), 3);
    assert!(matches!(
        plot.get_hits_for_event(0, "EventHeader"),
        Err(DisplayError::NotLoaded { .. })
    ));
    assert!(matches!(
        plot.get_hits_for_event(1, "ToyCaloHits"),
        Err(DisplayError::NotLoaded { .. })
    ));
}

#[test]
fn test_loaded_columns() {
    let mut plot = plot();
    plot.load_hits_for_event(0).unwrap();

    let calo = plot.get_hits_for_event(0, "ToyCaloHits").unwrap();
    let cols = calo.hit_columns().unwrap();
    assert_eq!(cols.z, &[1000.0, 1010.0, 1020.0]);
    assert_eq!(cols.e, &[0.5, 0.25, 0.125]);

    let mc = plot.get_hits_for_event(0, "MCParticles").unwrap().as_mc().unwrap();
    assert_eq!(mc.pdg, vec![11, 22, 13, -11, 211]);
    assert_eq!(mc.energy[1], 20.0);
    assert_eq!(mc.pathlength[0], 900.0);
}

#[test]
fn test_tracks_then_markers() {
    let mut plot = plot();
    plot.load_hits_for_event(0).unwrap();
    let traces = plot.hitmarkers_for_event(0);

    // the photon and the electron pass the cuts, the muon is too soft, the
    // positron too short, the pion has no PDG entry but passes
    let tracks: Vec<&TrackLine> = traces
        .iter()
        .filter_map(|t| match t {
            Some(Trace::Track(track)) => Some(track),
            _ => None,
        })
        .collect();
    let pdgs: Vec<i32> = tracks.iter().map(|t| t.pdg).collect();
    assert_eq!(pdgs, vec![22, 11, 211]);

    assert_eq!(tracks[0].label, "gamma  (20.000000 GeV, 1.500 m)");
    assert_eq!(tracks[1].label, "e-     (10.000000 GeV, 0.900 m)");
    assert_eq!(tracks[2].label, "Unknown (1.000000 GeV, 0.100 m)");
    assert_eq!(tracks[0].color, "#ffba08");
    assert_eq!(tracks[1].color, "#e63946");
    assert_eq!(tracks[2].color, "#999999");
    assert!(tracks.iter().all(|t| t.width == 3.0));
    assert_eq!(tracks[0].start, [0.0, 0.0, 0.0]);
    assert_eq!(tracks[0].end, [0.0, 0.0, 1500.0]);

    assert_eq!(traces.len(), 5);
    match (&traces[3], &traces[4]) {
        (Some(Trace::Markers(tracker)), Some(Trace::Markers(calo))) => {
            assert_eq!(tracker.name, "VertexBarrel");
            assert_eq!(tracker.symbol, MarkerSymbol::DiamondOpen);
            assert_eq!(tracker.x, vec![10.0, 20.0]);
            assert_eq!(calo.name, "ToyCaloHits");
            assert_eq!(calo.size, 3.5);
            assert_eq!(calo.color, "#2a9d8f");
            assert_eq!(calo.text, vec!["0.5", "0.25", "0.125"]);
        }
        other => panic!("expected two marker sets, got {:?}", other),
    }
}

#[test]
fn test_size_summary() {
    let mut plot = plot();
    plot.load_hits_for_event(0).unwrap();

    let summary = plot.size_summary(0);
    let lines: Vec<&str> = summary.lines().collect();
    assert!(lines[0].starts_with("Subdetector Collection"));
    assert_eq!(lines[1], "-".repeat(50));
    assert_eq!(lines.len(), 5);
    assert!(lines[2].starts_with("MCParticles"));
    assert!(lines[3].starts_with("ToyCaloHits"));
    assert!(lines[4].starts_with("VertexBarrel"));
    assert_eq!(lines[3].split_whitespace().last(), Some("3"));
}

#[test]
fn test_switching_events() {
    let mut plot = plot().with_cache_limit(1);
    plot.load_hits_for_event(0).unwrap();
    plot.load_hits_for_event(1).unwrap();

    assert_eq!(plot.loaded_events(), vec![1]);
    assert!(!plot.is_loaded(0));

    let traces = plot.hitmarkers_for_event(1);
    assert!(matches!(traces[0], Some(Trace::Track(ref t)) if t.pdg == 22));
    assert!(traces[1].is_none());
}

#[test]
fn test_missing_event() {
    let mut plot = plot();
    assert!(matches!(
        plot.load_hits_for_event(7),
        Err(DisplayError::Store(EventStoreError::EntryOutOfRange { entry: 7, entries: 2, .. }))
    ));
}

#[test]
fn test_scene_geometry_for_event() {
    let config: DisplayConfig = serde_json::from_str(CONFIG).unwrap();
    let layout = SceneLayout::from_settings(&config.plot_settings).unwrap();
    assert_eq!(layout.template.as_deref(), Some("plotly_dark"));
    assert_eq!(layout.aspect, [0.5, 0.5, 1.0]);

    let mut plot = plot();
    plot.load_hits_for_event(0).unwrap();
    let geometry = SceneGeometry::build(&plot.hitmarkers_for_event(0), &layout);

    assert_eq!(geometry.markers.len(), 5);
    assert_eq!(
        geometry.symbols(),
        vec![MarkerSymbol::DiamondOpen, MarkerSymbol::Square]
    );
    // three tracks and two marker sets in the legend
    assert_eq!(geometry.legend.len(), 5);

    // the photon ends on the far z face of the box
    let photon_end = layout.to_scene([0.0, 0.0, 1500.0]);
    assert!((photon_end.z - 0.375).abs() < 1e-6);

    for m in &geometry.markers {
        let p = Vec3::from_array(m.position);
        assert!(p.abs().cmple(layout.half_extents()).all());
    }
}
