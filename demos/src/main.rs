// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless trace zoom replay.
//!
//! Loads a program and its trace, applies a sequence of recorded gestures to
//! the camera, and renders frames until the scope chain settles after each
//! gesture. Prints the chain after every gesture, and optionally the display
//! list of the last frame.
//!
//! Run:
//! - `cargo run -p tracezoom_demos -- --program fib.program.json --trace fib.trace.json --gesture wheel:600,600,-400 --dump`
//!
//! Set `RUST_LOG=tracezoom_navigator=debug` to follow chain moves.

mod gesture;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use kurbo::Size;
use tracezoom_measure::{CachedMeasurer, FixedWidthMeasurer, SkrifaAdvance, TextMeasurer};
use tracezoom_navigator::{
    DrawCommand, Frame, FrameInput, Navigator, NavigatorConfig, ScopeChain,
};
use tracezoom_trace::{Program, load_trace};
use tracezoom_view2d::Viewport;

use crate::gesture::Gesture;

#[derive(Debug, Parser)]
#[command(about = "Replay zoom and pan gestures over a recorded trace")]
struct Args {
    /// Program JSON: source text and function syntax.
    #[arg(long)]
    program: PathBuf,
    /// Trace JSON: array of history entries.
    #[arg(long)]
    trace: PathBuf,
    /// Navigator configuration JSON; every field is optional.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Canvas width in pixels.
    #[arg(long, default_value_t = 1200.0)]
    width: f64,
    /// Canvas height in pixels.
    #[arg(long, default_value_t = 1200.0)]
    height: f64,
    /// Width-to-size ratio of the fixed-width measurer.
    #[arg(long, default_value_t = 0.6)]
    char_width: f64,
    /// Font file to measure with instead of the fixed-width approximation.
    #[arg(long)]
    font: Option<PathBuf>,
    /// Gesture to apply, repeatable: `wheel:x,y,dy` or `drag:x0,y0,x1,y1`.
    #[arg(long = "gesture")]
    gestures: Vec<Gesture>,
    /// Frames rendered per gesture at most while the chain keeps moving.
    #[arg(long, default_value_t = 16)]
    max_frames: u32,
    /// Print the display list of the last frame.
    #[arg(long)]
    dump: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let program = Program::load(&args.program)
        .with_context(|| format!("loading program {}", args.program.display()))?;
    let trace = load_trace(&args.trace)
        .with_context(|| format!("loading trace {}", args.trace.display()))?;
    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<NavigatorConfig>(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => NavigatorConfig::default(),
    };
    let mut measurer = measurer(&args, &config)?;

    let canvas = Size::new(args.width, args.height);
    let navigator = Navigator::new(config);
    let mut viewport = Viewport::overview(canvas);
    let mut chain = ScopeChain::root(trace.len(), canvas);
    tracing::info!(entries = trace.len(), width = canvas.width, height = canvas.height, "loaded trace");

    let mut frame = settle(
        &navigator,
        &mut chain,
        FrameInput {
            trace: &trace,
            syntax: &program,
            viewport,
            canvas,
        },
        measurer.as_mut(),
        args.max_frames,
    )?;
    report("start", &viewport, &chain);

    for (index, gesture) in args.gestures.iter().enumerate() {
        gesture.apply(&mut viewport);
        frame = settle(
            &navigator,
            &mut chain,
            FrameInput {
                trace: &trace,
                syntax: &program,
                viewport,
                canvas,
            },
            measurer.as_mut(),
            args.max_frames,
        )?;
        report(&format!("gesture {index}"), &viewport, &chain);
    }

    if args.dump {
        dump(&frame);
    }
    Ok(())
}

fn measurer(args: &Args, config: &NavigatorConfig) -> anyhow::Result<Box<dyn TextMeasurer>> {
    let Some(path) = &args.font else {
        return Ok(Box::new(FixedWidthMeasurer::new(args.char_width)));
    };
    let bytes =
        std::fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
    let mut advance = SkrifaAdvance::new(args.char_width);
    advance.register(config.font_family.clone(), bytes)?;
    Ok(Box::new(CachedMeasurer::new(advance)))
}

/// Renders until the chain stops moving, returning the last frame.
fn settle(
    navigator: &Navigator,
    chain: &mut ScopeChain,
    input: FrameInput<'_, Program>,
    measurer: &mut dyn TextMeasurer,
    max_frames: u32,
) -> anyhow::Result<Frame> {
    let mut frame = Frame::default();
    for _ in 0..max_frames.max(1) {
        let outcome = navigator.render_frame(chain, &input, measurer)?;
        *chain = outcome.chain;
        frame = outcome.frame;
        if !outcome.changed {
            return Ok(frame);
        }
    }
    tracing::warn!(max_frames, "scope chain still moving");
    Ok(frame)
}

fn report(label: &str, viewport: &Viewport, chain: &ScopeChain) {
    let scopes: Vec<&str> = chain
        .as_slice()
        .iter()
        .rev()
        .map(|scope| scope.call_label.as_deref().unwrap_or("<root>"))
        .collect();
    println!(
        "{label}: zoom {:.3}, chain {}",
        viewport.zoom(),
        scopes.join(" > ")
    );
}

fn dump(frame: &Frame) {
    for command in &frame.commands {
        match command {
            DrawCommand::Clear(rect) => println!("clear  {rect:?}"),
            DrawCommand::Stroke(rect) => println!("stroke {rect:?}"),
            DrawCommand::Text {
                text,
                screen_rect,
                font,
                ..
            } => println!("text   {:?} {font} {text:?}", screen_rect.origin()),
        }
    }
}
