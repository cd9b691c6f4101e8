//! Benchmarks for MC track selection and scene building.
//!
//! Run with: `cargo bench --bench track_selection`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;

use caloview::viewer::SceneGeometry;
use caloview::{
    plot_mc_tracks, MCCollection, MCParticle, McSettings, PdgVisMap, PlotSettings, SceneLayout,
    SortKey, Trace,
};

const PDG_CODES: [i32; 8] = [11, -11, 13, 22, 211, -211, 2112, 2212];

fn random_particles(count: usize) -> MCCollection {
    let mut rng = rand::thread_rng();

    (0..count)
        .map(|_| {
            let (vx, vy, vz): (f64, f64, f64) = (
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
            );
            let (endx, endy, endz) = (
                vx + rng.gen_range(-1000.0..1000.0),
                vy + rng.gen_range(-1000.0..1000.0),
                vz + rng.gen_range(-1000.0..1000.0),
            );
            let (px, py, pz): (f64, f64, f64) = (
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
            );
            let energy = (px * px + py * py + pz * pz).sqrt();
            let pathlength =
                ((endx - vx).powi(2) + (endy - vy).powi(2) + (endz - vz).powi(2)).sqrt();

            MCParticle {
                pdg: PDG_CODES[rng.gen_range(0..PDG_CODES.len())],
                generator_status: 1,
                simulator_status: 0,
                charge: 0.0,
                time: rng.gen_range(0.0..20.0),
                mass: 0.0,
                vx,
                vy,
                vz,
                endx,
                endy,
                endz,
                px,
                py,
                pz,
                endpx: 0.0,
                endpy: 0.0,
                endpz: 0.0,
                spin: [0.0; 3],
                color_flow: [0; 2],
                energy,
                pathlength,
            }
        })
        .collect()
}

fn pdg_map() -> PdgVisMap {
    PdgVisMap::parse(
        "CATEGORY LEPTONS\ne- 11\nmu- 13\nCATEGORY GAUGE AND HIGGS BOSONS\ngamma 22\n\
         CATEGORY LIGHT I=1 MESONS\npi+ 211\n"
            .as_bytes(),
    )
    .unwrap()
}

fn bench_plot_mc_tracks(c: &mut Criterion) {
    let mut group = c.benchmark_group("plot_mc_tracks");
    let map = pdg_map();

    for count in [1_000, 10_000, 100_000] {
        let particles = random_particles(count);

        group.bench_with_input(BenchmarkId::new("by_energy", count), &particles, |b, p| {
            let settings = McSettings::default();
            b.iter(|| black_box(plot_mc_tracks(p, &settings, &map)))
        });

        group.bench_with_input(BenchmarkId::new("by_time", count), &particles, |b, p| {
            let settings = McSettings {
                sort_by: SortKey::Time,
                ..McSettings::default()
            };
            b.iter(|| black_box(plot_mc_tracks(p, &settings, &map)))
        });
    }

    group.finish();
}

fn bench_scene_geometry(c: &mut Criterion) {
    let map = pdg_map();
    let layout = SceneLayout::from_settings(&PlotSettings::default()).unwrap();
    let particles = random_particles(10_000);
    let traces: Vec<Option<Trace>> = plot_mc_tracks(&particles, &McSettings::default(), &map)
        .into_iter()
        .map(|t| Some(Trace::Track(t)))
        .collect();

    c.bench_function("scene_geometry_10k", |b| {
        b.iter(|| black_box(SceneGeometry::build(&traces, &layout)))
    });
}

criterion_group!(benches, bench_plot_mc_tracks, bench_scene_geometry);
criterion_main!(benches);
