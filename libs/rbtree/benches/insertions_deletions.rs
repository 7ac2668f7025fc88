use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::prelude::SliceRandom;
use rbtree::RbTree;

fn rbtree(inserts: &[usize], deletes: &[usize], unique: bool) {
    let mut tree: RbTree<usize, usize> = RbTree::new(unique);

    for i in inserts {
        tree.insert(*i, *i);
    }

    for i in deletes {
        tree.remove(i);
    }
}

fn bench_insert_remove(c: &mut Criterion) {
    let mut rng = rand::rng();

    let mut nums = (0..700).collect::<Vec<_>>();
    nums.shuffle(&mut rng);
    let inserts = nums.clone();
    nums.shuffle(&mut rng);
    let deletes = nums;

    let mut group = c.benchmark_group("Insertions & Deletions");
    for unique in [true, false] {
        group.bench_with_input(BenchmarkId::new("unique", unique), &unique, |b, unique| {
            b.iter(|| rbtree(&inserts, &deletes, *unique));
        });
    }
    group.finish();
}

fn bench_traversal(c: &mut Criterion) {
    let mut rng = rand::rng();

    let mut nums = (0..10_000).collect::<Vec<_>>();
    nums.shuffle(&mut rng);
    let tree: RbTree<usize, usize> = nums.iter().map(|i| (*i, *i)).collect();

    c.bench_function("In-order traversal", |b| {
        b.iter(|| tree.values().sum::<usize>());
    });

    c.bench_function("Search", |b| {
        b.iter(|| nums.iter().filter(|i| tree.contains_key(i)).count());
    });
}

criterion_group!(benches, bench_insert_remove, bench_traversal);
criterion_main!(benches);
