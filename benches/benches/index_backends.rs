// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use canopy_index::{Aabb2D, Backend, Index, IndexGeneric};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// A parcel map: an `n` by `n` block of touching lots.
fn gen_parcels(n: usize, lot: f64) -> Vec<Aabb2D<f64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            out.push(Aabb2D::from_xywh(x as f64 * lot, y as f64 * lot, lot, lot));
        }
    }
    out
}

/// Building footprints clustered around a few town centers.
fn gen_towns(n_towns: usize, per_town: usize, spread: f64) -> Vec<Aabb2D<f64>> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut out = Vec::with_capacity(n_towns * per_town);
    for _ in 0..n_towns {
        let (cx, cy) = (rng.next_f64() * 5000.0, rng.next_f64() * 5000.0);
        for _ in 0..per_town {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            out.push(Aabb2D::from_xywh(cx + dx, cy + dy, 15.0, 12.0));
        }
    }
    out
}

/// Square click regions of `radius` around random points of `world`.
fn gen_clicks(count: usize, world: Aabb2D<f64>, radius: f64) -> Vec<Aabb2D<f64>> {
    let mut rng = Rng::new(0x81FD_BEE7_94F0_AF1A);
    (0..count)
        .map(|_| {
            let x = rng.next_f64() * (world.max_x - world.min_x) + world.min_x;
            let y = rng.next_f64() * (world.max_y - world.min_y) + world.min_y;
            Aabb2D::around(x, y, radius)
        })
        .collect()
}

fn bench_insert(c: &mut Criterion, group_name: &str, make: impl Fn(usize) -> Vec<Aabb2D<f64>>) {
    fn bench<F, B>(b: &mut criterion::Bencher<'_>, rects: &[Aabb2D<f64>], make_index: F)
    where
        F: Fn() -> IndexGeneric<f64, u32, B> + Clone + 'static,
        B: Backend<f64> + 'static,
    {
        b.iter_batched(
            make_index,
            |mut idx| {
                for (i, r) in rects.iter().copied().enumerate() {
                    idx.insert(r, i as u32);
                }
                idx
            },
            BatchSize::SmallInput,
        );
    }

    let mut group = c.benchmark_group(group_name);
    for &n in &[32usize, 64, 128] {
        let rects = make(n);
        group.throughput(Throughput::Elements(rects.len() as u64));
        group.bench_function(BenchmarkId::new("FlatVec", n), |b| {
            bench(b, &rects, Index::<f64, u32>::new);
        });
        group.bench_function(BenchmarkId::new("Grid(25.)", n), |b| {
            bench(b, &rects, || Index::<f64, u32>::with_grid(25.0));
        });
    }
    group.finish();
}

fn bench_click_queries(
    c: &mut Criterion,
    group_name: &str,
    make: impl Fn(usize) -> (Vec<Aabb2D<f64>>, Vec<Aabb2D<f64>>),
) {
    fn bench<F, B>(
        b: &mut criterion::Bencher<'_>,
        rects: &[Aabb2D<f64>],
        clicks: &[Aabb2D<f64>],
        make_index: F,
    ) where
        F: Fn() -> IndexGeneric<f64, u32, B>,
        B: Backend<f64>,
    {
        let mut idx = make_index();
        for (i, r) in rects.iter().copied().enumerate() {
            idx.insert(r, i as u32);
        }
        b.iter(|| {
            let mut total = 0usize;
            for click in clicks {
                idx.visit_rect(*click, |_, _| total += 1);
            }
            black_box(total)
        });
    }

    let mut group = c.benchmark_group(group_name);
    for &n in &[32usize, 64, 128] {
        let (rects, clicks) = make(n);
        group.throughput(Throughput::Elements(clicks.len() as u64));
        group.bench_function(BenchmarkId::new("FlatVec", n), |b| {
            bench(b, &rects, &clicks, Index::<f64, u32>::new);
        });
        group.bench_function(BenchmarkId::new("Grid(25.)", n), |b| {
            bench(b, &rects, &clicks, || Index::<f64, u32>::with_grid(25.0));
        });
    }
    group.finish();
}

fn insert_parcels(c: &mut Criterion) {
    bench_insert(c, "insert_parcels", |n| gen_parcels(n, 20.0));
}

fn insert_towns(c: &mut Criterion) {
    bench_insert(c, "insert_towns", |n| gen_towns(8, n * n / 8, 600.0));
}

fn click_parcels(c: &mut Criterion) {
    bench_click_queries(c, "click_parcels", |n| {
        let extent = n as f64 * 20.0;
        let world = Aabb2D::from_xywh(0.0, 0.0, extent, extent);
        (gen_parcels(n, 20.0), gen_clicks(256, world, 2.0))
    });
}

fn click_towns(c: &mut Criterion) {
    bench_click_queries(c, "click_towns", |n| {
        let world = Aabb2D::from_xywh(0.0, 0.0, 5000.0, 5000.0);
        (gen_towns(8, n * n / 8, 600.0), gen_clicks(256, world, 2.0))
    });
}

criterion_group!(
    benches,
    insert_parcels,
    insert_towns,
    click_parcels,
    click_towns
);
criterion_main!(benches);
