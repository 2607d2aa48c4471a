use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use codices::{build_view, CategoryId, CategoryWorkspace, ViewMode, ViewScope};

fn chain(size: usize) -> (CategoryWorkspace, CategoryId) {
    let mut workspace = CategoryWorkspace::in_memory();
    let category = workspace.create_category("Chain", "").unwrap();
    let mut previous = None;
    for i in 0..size {
        let object = workspace.create_object(&format!("X{i}"), category, "").unwrap();
        if let Some(source) = previous {
            workspace
                .create_morphism(&format!("f{i}"), source, object, category, "")
                .unwrap();
        }
        previous = Some(object);
    }
    (workspace, category)
}

fn benchmark_transaction_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("transaction_commit");

    for size in [10, 100, 1_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut workspace = CategoryWorkspace::in_memory();
                workspace.begin().unwrap();
                let category = workspace.create_category("Bench", "").unwrap();
                for i in 0..size {
                    workspace.create_object(&format!("X{i}"), category, "").unwrap();
                }
                black_box(workspace.commit().unwrap())
            });
        });
    }

    group.finish();
}

fn benchmark_projection_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection_build");

    for size in [10, 100, 1_000].iter() {
        let (workspace, category) = chain(*size);
        for mode in [ViewMode::Standard, ViewMode::Meta] {
            group.bench_with_input(BenchmarkId::new(mode.as_str(), size), size, |b, _| {
                b.iter(|| {
                    black_box(build_view(
                        &workspace.snapshot(),
                        ViewScope::Category(category),
                        mode,
                        None,
                    ))
                });
            });
        }
    }

    group.finish();
}

fn benchmark_cached_projection(c: &mut Criterion) {
    let (mut workspace, category) = chain(1_000);
    let scope = ViewScope::Category(category);

    c.bench_function("cached_projection_hit", |b| {
        b.iter(|| black_box(workspace.get_visualization_data(scope, ViewMode::Standard)))
    });

    let mut objects = 0;
    c.bench_function("projection_after_write", |b| {
        b.iter(|| {
            objects += 1;
            workspace
                .create_object(&format!("Y{objects}"), category, "")
                .unwrap();
            black_box(workspace.get_visualization_data(scope, ViewMode::Standard))
        })
    });
}

criterion_group!(
    benches,
    benchmark_transaction_commit,
    benchmark_projection_build,
    benchmark_cached_projection
);
criterion_main!(benches);
