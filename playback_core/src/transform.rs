//! World → viewport mapping with a uniform (aspect-preserving) scale.
//!
//! The fit only depends on its inputs, so callers may cache it for as long as
//! the point set (usually the track centerline) does not change.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Scale + offset taking world coordinates to viewport pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl ViewTransform {
    pub fn to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.scale + self.offset_x, y * self.scale + self.offset_y)
    }

    /// Inverse of [`to_screen`](Self::to_screen). `None` for a zero scale.
    pub fn to_world(&self, sx: f64, sy: f64) -> Option<(f64, f64)> {
        if self.scale == 0.0 {
            return None;
        }
        Some((
            (sx - self.offset_x) / self.scale,
            (sy - self.offset_y) / self.scale,
        ))
    }
}

/// Fit `points` into a `width × height` viewport leaving `padding` on every
/// side, centred, with one scale for both axes.
///
/// An empty set is treated as the unit box; a zero extent on an axis counts as
/// 1 when choosing the scale, so the scale stays finite for a single point.
pub fn fit(points: &[[f64; 2]], width: f64, height: f64, padding: f64) -> ViewTransform {
    let (min, max) = bounds(points);

    let extent_x = max.x - min.x;
    let extent_y = max.y - min.y;

    let scale_x = (width - 2.0 * padding) / nonzero(extent_x);
    let scale_y = (height - 2.0 * padding) / nonzero(extent_y);
    let scale = scale_x.min(scale_y);

    // Centre the actual extent: a degenerate axis lands mid-viewport.
    ViewTransform {
        scale,
        offset_x: (width - extent_x * scale) / 2.0 - min.x * scale,
        offset_y: (height - extent_y * scale) / 2.0 - min.y * scale,
    }
}

/// Axis-aligned bounding box; the unit box when `points` is empty.
fn bounds(points: &[[f64; 2]]) -> (Point2<f64>, Point2<f64>) {
    let mut iter = points.iter().map(|p| Point2::new(p[0], p[1]));
    match iter.next() {
        None => (Point2::origin(), Point2::new(1.0, 1.0)),
        Some(first) => iter.fold((first, first), |(lo, hi), p| (lo.inf(&p), hi.sup(&p))),
    }
}

fn nonzero(extent: f64) -> f64 {
    if extent == 0.0 || extent.is_nan() {
        1.0
    } else {
        extent
    }
}
