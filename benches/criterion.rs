use criterion::{black_box, criterion_group, criterion_main, Criterion};
use items_api::core::item::item_entity::Item;

fn item_new_benchmark(c: &mut Criterion) {
    c.bench_function("item_new", |b| {
        b.iter(|| Item::new(black_box("widget"), black_box(9.99), black_box("a widget")))
    });
}

criterion_group!(benches, item_new_benchmark);
criterion_main!(benches);
