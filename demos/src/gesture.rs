// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::str::FromStr;

use anyhow::{Context, bail};
use kurbo::Point;
use tracezoom_view2d::{DragPan, Viewport};

/// One recorded pointer gesture, in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Gesture {
    /// `wheel:x,y,dy`
    Wheel { at: Point, delta_y: f64 },
    /// `drag:x0,y0,x1,y1`
    Drag { from: Point, to: Point },
}

impl Gesture {
    pub(crate) fn apply(self, viewport: &mut Viewport) {
        match self {
            Self::Wheel { at, delta_y } => viewport.wheel(at, delta_y),
            Self::Drag { from, to } => {
                let mut drag = DragPan::default();
                drag.start(from);
                if let Some(delta) = drag.update(to, viewport) {
                    viewport.pan_by_world(delta);
                }
                drag.end();
            }
        }
    }
}

impl FromStr for Gesture {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, args) = s
            .split_once(':')
            .with_context(|| format!("gesture {s:?} is missing a `kind:` prefix"))?;
        let numbers = args
            .split(',')
            .map(|n| {
                n.trim()
                    .parse::<f64>()
                    .with_context(|| format!("{n:?} is not a number"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        match (kind, numbers.as_slice()) {
            ("wheel", &[x, y, delta_y]) => Ok(Self::Wheel {
                at: Point::new(x, y),
                delta_y,
            }),
            ("drag", &[x0, y0, x1, y1]) => Ok(Self::Drag {
                from: Point::new(x0, y0),
                to: Point::new(x1, y1),
            }),
            ("wheel" | "drag", _) => bail!("wrong number of values in gesture {s:?}"),
            _ => bail!("unknown gesture kind {kind:?}, expected `wheel` or `drag`"),
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size};
    use tracezoom_view2d::Viewport;

    use super::Gesture;

    #[test]
    fn parses_wheel_and_drag() {
        assert_eq!(
            "wheel:600,600,-50".parse::<Gesture>().unwrap(),
            Gesture::Wheel {
                at: Point::new(600.0, 600.0),
                delta_y: -50.0
            }
        );
        assert_eq!(
            "drag: 0, 0, 10, 20".parse::<Gesture>().unwrap(),
            Gesture::Drag {
                from: Point::ZERO,
                to: Point::new(10.0, 20.0)
            }
        );
        assert!("wheel:1,2".parse::<Gesture>().is_err());
        assert!("pinch:1,2,3".parse::<Gesture>().is_err());
        assert!("wheel 1,2,3".parse::<Gesture>().is_err());
    }

    #[test]
    fn drag_moves_content_with_the_pointer() {
        let mut viewport = Viewport::overview(Size::new(100.0, 100.0));
        let before = viewport.world_to_screen_point(Point::ZERO);
        Gesture::Drag {
            from: Point::new(10.0, 10.0),
            to: Point::new(30.0, 15.0),
        }
        .apply(&mut viewport);
        let after = viewport.world_to_screen_point(Point::ZERO);
        assert!((after.x - before.x - 20.0).abs() < 1e-9);
        assert!((after.y - before.y - 5.0).abs() < 1e-9);
    }
}
