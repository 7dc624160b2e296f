// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for the auto-fit font search over code-shaped box trees.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Rect;
use tracezoom_box_tree::{BoxId, BoxTree, Direction, FitOptions, fit_box, fit_text};
use tracezoom_measure::FixedWidthMeasurer;

/// Line-number and code columns with `rows` rows of three runs each.
fn code_tree(rows: usize) -> (BoxTree, BoxId) {
    let mut tree = BoxTree::new();
    let mut numbers = Vec::with_capacity(rows);
    let mut code = Vec::with_capacity(rows);
    for row in 0..rows {
        numbers.push(tree.text((row + 1).to_string()));
        let runs = [
            tree.text("    let value = "),
            tree.text(format!("step({row})")),
            tree.text(format!("  step({row}) → {}", row * 2)),
        ];
        code.push(
            tree.container_with(Direction::Horizontal, runs)
                .unwrap(),
        );
    }
    let numbers = tree.container_with(Direction::Vertical, numbers).unwrap();
    let code = tree.container_with(Direction::Vertical, code).unwrap();
    let root = tree
        .container_with(Direction::Horizontal, [numbers, code])
        .unwrap();
    (tree, root)
}

fn bench_fit(c: &mut Criterion) {
    let options = FitOptions::default();
    let target = Rect::new(0.0, 0.0, 1920.0, 1080.0);

    let mut group = c.benchmark_group("fit_box");
    for rows in [8_usize, 64, 512] {
        let (tree, root) = code_tree(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, _| {
            let mut measurer = FixedWidthMeasurer::new(0.6);
            b.iter(|| {
                let fit = fit_box(&tree, root, target, &options, &mut measurer).unwrap();
                black_box(fit.font.size);
            });
        });
    }
    group.finish();

    c.bench_function("fit_text/label", |b| {
        let mut measurer = FixedWidthMeasurer::new(0.6);
        let target = Rect::new(0.0, 0.0, 144.0, 48.0);
        b.iter(|| {
            let fitted = fit_text(black_box("fib(n - 1)"), target, &options, &mut measurer).unwrap();
            black_box(fitted.fit.font.size);
        });
    });
}

criterion_group!(benches, bench_fit);
criterion_main!(benches);
