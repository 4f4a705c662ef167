use criterion::{black_box, criterion_group, criterion_main, Criterion};
use splay_collections::arena::{Handle, TypedArena};

const CHUNK_SIZE: usize = 1024;
const NUM_OF_ALLOCATIONS: usize = 100;

struct Link {
    next: Option<Handle>,
}

fn bench_arena_allocate(c: &mut Criterion) {
    c.bench_function("bench arena allocate", |b| {
        b.iter(|| {
            let mut arena = TypedArena::new(CHUNK_SIZE);
            let mut curr = arena.allocate(Link { next: None });
            for _ in 0..NUM_OF_ALLOCATIONS {
                curr = arena.allocate(Link { next: Some(curr) });
            }
            black_box(curr);
        })
    });
}

fn bench_arena_recycle(c: &mut Criterion) {
    c.bench_function("bench arena recycle", |b| {
        let mut arena = TypedArena::new(CHUNK_SIZE);
        b.iter(|| {
            let mut curr = Some(arena.allocate(Link { next: None }));
            for _ in 0..NUM_OF_ALLOCATIONS {
                curr = Some(arena.allocate(Link { next: curr }));
            }
            while let Some(handle) = curr {
                curr = arena.free(handle).next;
            }
        })
    });
}

criterion_group!(benches, bench_arena_allocate, bench_arena_recycle);
criterion_main!(benches);
