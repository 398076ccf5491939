use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kdtree::kdtree::{ItemId, KdTree};
use kdtree::shapes::{Rectangle, Shape, ShapeEnum, Vec2};
use rand::prelude::*;

const ITEM_COUNT: usize = 1000;

fn populated_tree(rng: &mut StdRng) -> (KdTree, Vec<ItemId>) {
    let area = Rectangle::new(0.0, 0.0, 1000.0, 1000.0);
    let mut tree = KdTree::new();
    tree.init().unwrap();
    let mut items = Vec::with_capacity(ITEM_COUNT);
    for owner in 0..ITEM_COUNT as u32 {
        let shape = ShapeEnum::Circle(area.random_circle_inside(rng.gen_range(1.0..5.0), rng));
        let item = tree.create_item(shape, owner).unwrap();
        tree.add(item).unwrap();
        items.push(item);
    }
    (tree, items)
}

fn add_remove_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let (mut tree, items) = populated_tree(&mut rng);

    c.bench_function("kdtree_remove_add", |b| {
        b.iter(|| {
            let item = items[rng.gen_range(0..items.len())];
            tree.remove(black_box(item)).unwrap();
            tree.add(black_box(item)).unwrap();
        })
    });
}

fn update_in_place_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);
    let (mut tree, items) = populated_tree(&mut rng);

    c.bench_function("kdtree_update_small_moves", |b| {
        b.iter(|| {
            let item = items[rng.gen_range(0..items.len())];
            let anchor = tree.shape(item).unwrap().anchor();
            let jitter = Vec2::new(rng.gen_range(-0.5..0.5), rng.gen_range(-0.5..0.5));
            tree.update_item(black_box(item), anchor + jitter).unwrap();
        })
    });
}

fn relocate_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let (mut tree, items) = populated_tree(&mut rng);
    let area = Rectangle::new(0.0, 0.0, 1000.0, 1000.0);

    c.bench_function("kdtree_relocate_batch", |b| {
        b.iter(|| {
            let requests: Vec<(ItemId, Vec2)> = items
                .iter()
                .map(|item| {
                    let target: Vec2 = area.get_random_circle_coords_inside(5.0, &mut rng).into();
                    (*item, target)
                })
                .collect();
            tree.relocate_batch(black_box(&requests)).unwrap();
        })
    });
}

fn collisions_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(4);
    let (tree, _) = populated_tree(&mut rng);
    let query_shape = ShapeEnum::circle(500.0, 500.0, 40.0);
    let sweep = ShapeEnum::capsule(Vec2::new(100.0, 100.0), Vec2::new(900.0, 900.0), 3.0);

    c.bench_function("kdtree_collisions", |b| {
        b.iter(|| {
            let mut collisions: Vec<ItemId> = Vec::new();
            tree.collisions(black_box(&query_shape), &mut collisions)
                .unwrap();
        })
    });
    c.bench_function("kdtree_check_collision_capsule", |b| {
        b.iter(|| tree.check_collision(black_box(&sweep)).unwrap())
    });
}

criterion_group!(
    kdtree_benchmarks,
    add_remove_benchmark,
    update_in_place_benchmark,
    relocate_benchmark,
    collisions_benchmark
);
criterion_main!(kdtree_benchmarks);
