use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use storecms_catalog::{item_combinations, Variant};
use storecms_core::CategoryId;

fn make_variants(axes: usize, options_per_axis: usize) -> Vec<Variant> {
    (0..axes)
        .map(|i| {
            let options = (0..options_per_axis)
                .map(|j| (format!("v{i}-{j}"), String::new(), j as i32))
                .collect();
            Variant::new(CategoryId::new(), format!("axis-{i}"), "", i as i32, options).unwrap()
        })
        .collect()
}

fn bench_item_combinations(c: &mut Criterion) {
    let mut group = c.benchmark_group("item_combinations");

    for &(axes, options) in &[(1usize, 5usize), (2, 5), (3, 5), (4, 4)] {
        let variants = make_variants(axes, options);
        let combos = (options as u64).pow(axes as u32);
        group.throughput(Throughput::Elements(combos));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{axes}x{options}")),
            &variants,
            |b, variants| b.iter(|| item_combinations(black_box(variants))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_item_combinations);
criterion_main!(benches);
