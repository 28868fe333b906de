use criterion::{black_box, criterion_group, criterion_main, Criterion};
use robot_parallax::core::ScrollCommand;
use robot_parallax::driver::Stage;
use robot_parallax::figure;
use robot_parallax::mesh::{Mesh, PackedMeshes};

fn bench_build(c: &mut Criterion) {
    c.bench_function("figure_build", |b| b.iter(|| black_box(figure::build())));
}

fn bench_tessellate(c: &mut Criterion) {
    let figure = figure::build();
    c.bench_function("figure_tessellate", |b| {
        b.iter(|| {
            let meshes: Vec<Mesh> = figure
                .segments()
                .iter()
                .map(|s| Mesh::from_shape(s.shape()))
                .collect();
            black_box(PackedMeshes::pack(&meshes))
        })
    });
}

fn bench_tick(c: &mut Criterion) {
    let mut stage = Stage::new(1280, 800, 5.0, 100.0);
    stage.apply_scroll(ScrollCommand::PageDown);
    let mut t = 0.0_f64;

    c.bench_function("stage_tick", |b| {
        b.iter(|| {
            t += 1.0 / 60.0;
            black_box(stage.tick(black_box(t)))
        })
    });

    c.bench_function("stage_tick_world_transforms", |b| {
        b.iter(|| {
            t += 1.0 / 60.0;
            stage.tick(t);
            let mut last = glam::Mat4::IDENTITY;
            stage.figure().for_each_world(|world, _| last = world);
            black_box(last)
        })
    });
}

criterion_group!(benches, bench_build, bench_tessellate, bench_tick);
criterion_main!(benches);
