use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use tui_globe::geo::{surface_point, to_cartesian, to_orientation, GeoPosition, Orientation};
use tui_globe::globe::{
    BlockSpec, CameraRig, Globe, GlobeBackend, GlobeTextures, Marker, MarkerAnimator,
};
use tui_globe::hash::RandStream;
use tui_globe::term::TerminalBackend;

fn random_specs(n: usize) -> Vec<BlockSpec> {
    let mut rng = RandStream::new(7);
    (0..n)
        .map(|_| {
            let lat = rng.latitude();
            let lon = rng.range(-180.0, 180.0);
            BlockSpec::new(lat, lon, rng.range(1.5, 6.0), "#50fa7b")
        })
        .collect()
}

fn bench_projection(c: &mut Criterion) {
    let geo = black_box(GeoPosition::new(52.37, 4.89));
    c.bench_function("to_orientation", |b| b.iter(|| black_box(to_orientation(geo))));

    let o = black_box(Orientation::new(1.2, 0.4));
    c.bench_function("to_cartesian", |b| b.iter(|| black_box(to_cartesian(o, 201.5))));

    c.bench_function("surface_point", |b| b.iter(|| black_box(surface_point(geo, 200.0))));
}

fn bench_rig_tick(c: &mut Criterion) {
    let mut rig = CameraRig::default();
    let mut flip = false;
    c.bench_function("rig_tick", |b| {
        b.iter(|| {
            flip = !flip;
            rig.set_target_zoom(if flip { 300.0 } else { 900.0 });
            rig.tick();
            black_box(rig.camera_position())
        })
    });
}

fn bench_animator_tick(c: &mut Criterion) {
    let specs = random_specs(1000);
    c.bench_function("animator_tick_1000", |b| {
        b.iter_batched(
            || {
                let mut backend = TerminalBackend::new(80, 40, false);
                let mut animator = MarkerAnimator::new();
                let markers: Vec<Marker> = specs
                    .iter()
                    .map(|spec| {
                        let mesh = backend.create_block(&spec.color);
                        let mut marker = Marker::resting(mesh, spec);
                        animator.begin_levitation(&mut marker);
                        marker
                    })
                    .collect();
                (backend, animator, markers)
            },
            |(mut backend, mut animator, mut markers)| {
                animator.tick(&mut markers, &mut backend);
                black_box(animator.len())
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_terminal_frame(c: &mut Criterion) {
    let backend = TerminalBackend::new(160, 50, false);
    let Ok(mut globe) = Globe::new(backend, GlobeTextures::new("builtin")) else {
        return;
    };
    if globe.init().is_err() {
        return;
    }
    for spec in random_specs(300) {
        globe.add_block(&spec);
    }

    c.bench_function("terminal_frame_160x50", |b| {
        b.iter(|| {
            globe.drag_start(0.0, 0.0).drag_move(3.0, 0.0).drag_end();
            globe.tick();
            black_box(globe.backend().frame().visible_blocks)
        })
    });
}

criterion_group!(
    benches,
    bench_projection,
    bench_rig_tick,
    bench_animator_tick,
    bench_terminal_frame
);
criterion_main!(benches);
