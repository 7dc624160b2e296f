// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for rendering navigator frames.
//!
//! `fib` replays the recorded `fib(2)` run at the overview and at the root.
//! `loop` synthesizes a single scope with many steps to stress grouping and
//! code-box construction; every step is a row, so the largest size stays
//! within what fits the canvas at a one-pixel font.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Size;
use serde_json::json;
use tracezoom_measure::FixedWidthMeasurer;
use tracezoom_navigator::{FrameInput, Navigator, NavigatorConfig, ScopeChain};
use tracezoom_trace::{HistoryEntry, Program, parse_trace};
use tracezoom_view2d::Viewport;

const CANVAS: Size = Size::new(1920.0, 1080.0);

fn fib() -> (Program, Vec<HistoryEntry>) {
    let program =
        Program::from_json(include_str!("../../tracezoom_trace/tests/data/fib.program.json"))
            .unwrap();
    let trace =
        parse_trace(include_str!("../../tracezoom_trace/tests/data/fib.trace.json")).unwrap();
    (program, trace)
}

/// `main` counting to `iterations` in a while loop, one entry per executed line.
fn counting_loop(iterations: usize) -> (Program, Vec<HistoryEntry>) {
    let program = Program::from_json(
        &json!({
            "source": "def main() {\n    let i = 0\n    while (i < n) {\n        i = i + 1\n    }\n}",
            "functions": [{
                "name": "main",
                "params": [],
                "span": { "start": { "line": 1, "column": 0 }, "end": { "line": 6, "column": 1 } },
                "calls": [],
                "statements": [
                    { "kind": { "type": "declare", "name": "i" }, "span": { "start": { "line": 2, "column": 4 }, "end": { "line": 2, "column": 13 } } },
                    { "kind": { "type": "assign", "name": "i" }, "span": { "start": { "line": 4, "column": 8 }, "end": { "line": 4, "column": 17 } } }
                ]
            }]
        })
        .to_string(),
    )
    .unwrap();

    let frame = |i: usize| json!([{ "funName": "main", "parameters": {}, "variables": { "i": i } }]);
    let mut entries = vec![json!({ "line": 2, "stack": [{ "funName": "main" }] })];
    for i in 0..iterations {
        entries.push(json!({ "line": 3, "stack": frame(i) }));
        entries.push(json!({ "line": 4, "stack": frame(i) }));
    }
    let trace = parse_trace(&serde_json::Value::Array(entries).to_string()).unwrap();
    (program, trace)
}

fn bench_render_frame(c: &mut Criterion) {
    let navigator = Navigator::new(NavigatorConfig::default());

    let (program, trace) = fib();
    let chain = ScopeChain::root(trace.len(), CANVAS);
    let mut group = c.benchmark_group("render_frame/fib");
    for (name, viewport) in [
        ("overview", Viewport::overview(CANVAS)),
        ("root", Viewport::new(0.0, 0.0, 1.0)),
    ] {
        let input = FrameInput {
            trace: &trace,
            syntax: &program,
            viewport,
            canvas: CANVAS,
        };
        group.bench_function(name, |b| {
            let mut measurer = FixedWidthMeasurer::new(0.6);
            b.iter(|| {
                let outcome = navigator
                    .render_frame(&chain, &input, &mut measurer)
                    .unwrap();
                black_box(outcome.frame.commands.len());
            });
        });
    }
    group.finish();

    let mut group = c.benchmark_group("render_frame/loop");
    for iterations in [16_usize, 128, 384] {
        let (program, trace) = counting_loop(iterations);
        let chain = ScopeChain::root(trace.len(), CANVAS);
        let input = FrameInput {
            trace: &trace,
            syntax: &program,
            viewport: Viewport::new(0.0, 0.0, 1.0),
            canvas: CANVAS,
        };
        group.bench_with_input(
            BenchmarkId::from_parameter(iterations),
            &iterations,
            |b, _| {
                let mut measurer = FixedWidthMeasurer::new(0.6);
                b.iter(|| {
                    let outcome = navigator
                        .render_frame(&chain, &input, &mut measurer)
                        .unwrap();
                    black_box(outcome.frame.commands.len());
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_render_frame);
criterion_main!(benches);
