// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rendering frames of a recorded `fib(2)` run and moving the scope chain.

use kurbo::{Point, Rect, Size};
use tracezoom_box_tree::FitError;
use tracezoom_measure::FixedWidthMeasurer;
use tracezoom_navigator::{
    FrameInput, FrameOutcome, LabelStyle, Navigator, NavigatorConfig, NavigatorError, Scope,
    ScopeChain,
};
use tracezoom_trace::{HistoryEntry, Program, parse_trace};
use tracezoom_view2d::Viewport;

const CANVAS: Size = Size::new(1200.0, 1200.0);

fn fixtures() -> (Program, Vec<HistoryEntry>) {
    let program =
        Program::from_json(include_str!("../../tracezoom_trace/tests/data/fib.program.json"))
            .unwrap();
    let trace =
        parse_trace(include_str!("../../tracezoom_trace/tests/data/fib.trace.json")).unwrap();
    (program, trace)
}

fn render(
    navigator: &Navigator,
    chain: &ScopeChain,
    program: &Program,
    trace: &[HistoryEntry],
    viewport: Viewport,
    canvas: Size,
) -> Result<FrameOutcome, NavigatorError> {
    let input = FrameInput {
        trace,
        syntax: program,
        viewport,
        canvas,
    };
    navigator.render_frame(chain, &input, &mut FixedWidthMeasurer::new(0.6))
}

/// A viewport centered on `world`, zoomed so that it covers the canvas with room to spare.
fn zoom_onto(world: Rect, canvas: Size) -> Viewport {
    let zoom = (canvas.width / world.width()).max(canvas.height / world.height()) * 1.5;
    let center = world.center();
    Viewport::new(
        center.y - canvas.height / 2.0 / zoom,
        center.x - canvas.width / 2.0 / zoom,
        zoom,
    )
}

#[test]
fn overview_collapses_the_root_to_its_invocation() {
    let (program, trace) = fixtures();
    let chain = ScopeChain::root(trace.len(), CANVAS);
    let navigator = Navigator::default();

    let outcome = render(
        &navigator,
        &chain,
        &program,
        &trace,
        Viewport::overview(CANVAS),
        CANVAS,
    )
    .unwrap();

    assert_eq!(outcome.frame.texts().collect::<Vec<_>>(), vec!["main()"]);
    assert_eq!(outcome.frame.scopes.len(), 1);
    assert!(!outcome.frame.scopes[0].expanded);
    assert_eq!(outcome.chain, chain);
    assert!(!outcome.changed);
}

#[test]
fn identity_view_expands_the_root_and_collapses_its_call() {
    let (program, trace) = fixtures();
    let chain = ScopeChain::root(trace.len(), CANVAS);
    let navigator = Navigator::default();

    let outcome = render(
        &navigator,
        &chain,
        &program,
        &trace,
        Viewport::new(0.0, 0.0, 1.0),
        CANVAS,
    )
    .unwrap();

    let texts: Vec<&str> = outcome.frame.texts().collect();
    assert!(texts.contains(&"def main() {"));
    assert!(texts.contains(&"  fib(2) → 1"));
    assert!(texts.contains(&"  result = 1"));
    // Once as the call site, once as the collapsed callee.
    assert_eq!(texts.iter().filter(|t| **t == "fib(2)").count(), 2);

    let scopes = &outcome.frame.scopes;
    assert_eq!(scopes.len(), 2);
    assert!(scopes[0].expanded);
    assert_eq!(scopes[1].scope.entries, 1..12);
    assert_eq!(scopes[1].scope.call_label.as_deref(), Some("fib(2)"));
    assert!(!scopes[1].expanded);

    assert_eq!(outcome.chain.len(), 1);
    assert!(!outcome.changed);
}

#[test]
fn zooming_onto_a_call_descends_one_level() {
    let (program, trace) = fixtures();
    let navigator = Navigator::default();
    let mut chain = ScopeChain::root(trace.len(), CANVAS);
    let mut viewport = Viewport::new(0.0, 0.0, 1.0);

    // The root re-fits at each zoom, so the call box moves slightly; follow it.
    for _ in 0..3 {
        let outcome = render(&navigator, &chain, &program, &trace, viewport, CANVAS).unwrap();
        assert!(outcome.chain.len() <= chain.len() + 1);
        chain = outcome.chain;
        if chain.len() == 2 {
            assert!(outcome.frame.texts().any(|t| t == "def fib(n) {"));
            break;
        }
        let call = outcome
            .frame
            .scopes
            .iter()
            .find(|visited| visited.scope.entries == (1..12))
            .expect("the call to fib is visible");
        viewport = zoom_onto(call.scope.world_bounds, CANVAS);
    }

    assert_eq!(chain.len(), 2);
    assert_eq!(chain.innermost().entries, 1..12);
    assert_eq!(chain.innermost().call_label.as_deref(), Some("fib(2)"));
    assert_eq!(chain.outermost().entries, 0..13);
}

#[test]
fn off_screen_innermost_scope_is_dropped() {
    let (program, trace) = fixtures();
    let root = Scope::root(trace.len(), CANVAS.to_rect());
    let middle = Scope {
        world_bounds: Rect::new(500.0, 500.0, 700.0, 700.0),
        entries: 1..12,
        call_label: Some("fib(2)".into()),
    };
    let inner = Scope {
        world_bounds: Rect::new(5000.0, 5000.0, 5010.0, 5010.0),
        entries: 3..6,
        call_label: Some("fib(n - 1)".into()),
    };
    let chain = ScopeChain::new(vec![inner, middle.clone(), root.clone()]).unwrap();

    let outcome = render(
        &Navigator::default(),
        &chain,
        &program,
        &trace,
        Viewport::new(0.0, 0.0, 1.0),
        CANVAS,
    )
    .unwrap();

    assert!(outcome.frame.commands.is_empty());
    assert_eq!(outcome.chain.as_slice(), &[middle, root]);
    assert!(outcome.changed);
}

#[test]
fn lone_root_off_screen_is_kept() {
    let (program, trace) = fixtures();
    let chain = ScopeChain::root(trace.len(), CANVAS);

    let outcome = render(
        &Navigator::default(),
        &chain,
        &program,
        &trace,
        Viewport::new(1.0e6, 1.0e6, 1.0),
        CANVAS,
    )
    .unwrap();

    assert!(outcome.frame.commands.is_empty());
    assert_eq!(outcome.chain, chain);
    assert!(!outcome.changed);
}

#[test]
fn chain_moves_at_most_one_level_per_frame() {
    let (program, trace) = fixtures();
    let navigator = Navigator::default();
    let root = Scope::root(trace.len(), CANVAS.to_rect());
    let mut chain = ScopeChain::root(trace.len(), CANVAS);
    let mut viewport = Viewport::overview(CANVAS);
    let center = Point::new(CANVAS.width / 2.0, CANVAS.height / 2.0);
    let mut deepest = 1;

    let zoom_in = core::iter::repeat_n(-50.0, 30);
    let zoom_out = core::iter::repeat_n(50.0, 30);
    for delta in zoom_in.chain(zoom_out) {
        viewport.wheel(center, delta);
        let outcome = render(&navigator, &chain, &program, &trace, viewport, CANVAS).unwrap();
        let (old, new) = (chain.len(), outcome.chain.len());
        assert!(new + 1 >= old && new <= old + 1, "chain moved from {old} to {new}");
        assert_eq!(outcome.changed, outcome.chain != chain);
        assert_eq!(outcome.chain.outermost(), &root);
        deepest = deepest.max(new);
        chain = outcome.chain;
    }

    assert!(deepest >= 2, "zooming onto the call never descended");
}

#[test]
fn call_site_labels_use_the_call_expression() {
    let (program, trace) = fixtures();
    let navigator = Navigator::new(NavigatorConfig {
        label_style: LabelStyle::CallSite,
        ..NavigatorConfig::default()
    });
    let inner = Scope {
        world_bounds: Rect::new(0.0, 0.0, 100.0, 20.0),
        entries: 3..6,
        call_label: Some("fib(n - 1)".into()),
    };
    let chain = ScopeChain::new(vec![inner, Scope::root(trace.len(), CANVAS.to_rect())]).unwrap();

    let outcome = render(
        &navigator,
        &chain,
        &program,
        &trace,
        Viewport::new(0.0, 0.0, 1.0),
        CANVAS,
    )
    .unwrap();

    assert_eq!(outcome.frame.texts().collect::<Vec<_>>(), vec!["fib(n - 1)"]);
    // Not covering the canvas: the inner scope is dropped.
    assert_eq!(outcome.chain.len(), 1);
}

#[test]
fn unfittable_start_scope_is_an_error() {
    let (program, trace) = fixtures();
    let canvas = Size::new(1.0, 1.0);
    let chain = ScopeChain::root(trace.len(), canvas);

    let result = render(
        &Navigator::default(),
        &chain,
        &program,
        &trace,
        Viewport::new(0.0, 0.0, 1.0),
        canvas,
    );

    assert!(matches!(
        result,
        Err(NavigatorError::Fit(FitError::CannotFit { .. }))
    ));
}

#[test]
fn invalid_start_scopes_are_rejected() {
    let (program, trace) = fixtures();
    let navigator = Navigator::default();
    let viewport = Viewport::new(0.0, 0.0, 1.0);

    let past_end = ScopeChain::new(vec![Scope {
        world_bounds: CANVAS.to_rect(),
        entries: 10..20,
        call_label: None,
    }])
    .unwrap();
    assert!(matches!(
        render(&navigator, &past_end, &program, &trace, viewport, CANVAS),
        Err(NavigatorError::ScopeOutOfRange {
            start: 10,
            end: 20,
            len: 13
        })
    ));

    let empty = ScopeChain::new(vec![Scope {
        world_bounds: CANVAS.to_rect(),
        entries: 4..4,
        call_label: None,
    }])
    .unwrap();
    assert!(matches!(
        render(&navigator, &empty, &program, &trace, viewport, CANVAS),
        Err(NavigatorError::EmptyScope)
    ));
}
