//! Track definitions.
//!
//! Each track is a closed centerline sampled as a polyline. Layouts are
//! deterministic; the oval is built from two straights and two semicircles,
//! the figure-eight from a lemniscate.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Full track width (meters), centerline ± half of it.
pub const TRACK_WIDTH: f64 = 8.0;

/// Which pre-defined track to race on.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
pub enum TrackKind {
    /// 50 m straights joined by 10 m radius turns
    Oval,
    /// Lemniscate spanning roughly 80 × 40 m
    Figure8,
}

impl TrackKind {
    pub fn name(self) -> &'static str {
        match self {
            TrackKind::Oval => "oval",
            TrackKind::Figure8 => "figure8",
        }
    }
}

/// A closed track centerline.
#[derive(Clone, Debug)]
pub struct Track {
    pub kind: TrackKind,
    pub centerline: Vec<Point2<f64>>,
    pub width: f64,
}

/// Closest centerline point to a query position.
#[derive(Clone, Copy, Debug)]
pub struct ClosestPoint {
    pub index: usize,
    pub distance: f64,
}

impl Track {
    /// Build the named track.
    pub fn build(kind: TrackKind) -> Self {
        let centerline = match kind {
            TrackKind::Oval => oval(),
            TrackKind::Figure8 => figure8(),
        };
        Self {
            kind,
            centerline,
            width: TRACK_WIDTH,
        }
    }

    pub fn len(&self) -> usize {
        self.centerline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centerline.is_empty()
    }

    /// Point `index` wrapped around the loop.
    pub fn point(&self, index: usize) -> Point2<f64> {
        self.centerline[index % self.centerline.len()]
    }

    /// Closest centerline sample (linear scan).
    pub fn closest(&self, pos: &Point2<f64>) -> ClosestPoint {
        let (index, dist_sq) = self
            .centerline
            .iter()
            .map(|p| (p - pos).norm_squared())
            .enumerate()
            .fold((0, f64::INFINITY), |best, (i, d)| {
                if d < best.1 {
                    (i, d)
                } else {
                    best
                }
            });
        ClosestPoint {
            index,
            distance: dist_sq.sqrt(),
        }
    }

    /// Unit direction of travel at `index`.
    pub fn tangent(&self, index: usize) -> Vector2<f64> {
        let d = self.point(index + 1) - self.point(index);
        d / (d.norm() + 1e-6)
    }

    pub fn is_off_track(&self, distance: f64) -> bool {
        distance > self.width / 2.0
    }

    /// Centerline as plain `[x, y]` pairs (the log layout).
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.centerline.iter().map(|p| [p.x, p.y]).collect()
    }

    /// Start pose: first point, facing the second.
    pub fn start_pose(&self) -> (Point2<f64>, f64) {
        let start = self.point(0);
        let d = self.point(1) - start;
        (start, d.y.atan2(d.x))
    }
}

// ---------------------------------------------------------------------------
// Layouts
// ---------------------------------------------------------------------------

fn oval() -> Vec<Point2<f64>> {
    let mut pts = Vec::new();
    // Bottom straight, left to right
    pts.extend(linspace(0.0, 50.0, 50).map(|x| Point2::new(x, 0.0)));
    // Right turn around (50, 10)
    pts.extend(
        linspace(-FRAC_PI_2, FRAC_PI_2, 30)
            .skip(1)
            .map(|a| Point2::new(50.0 + 10.0 * a.cos(), 10.0 + 10.0 * a.sin())),
    );
    // Top straight, right to left
    pts.extend(linspace(50.0, 0.0, 50).skip(1).map(|x| Point2::new(x, 20.0)));
    // Left turn around (0, 10)
    pts.extend(
        linspace(FRAC_PI_2, 3.0 * FRAC_PI_2, 30)
            .skip(1)
            .map(|a| Point2::new(10.0 * a.cos(), 10.0 + 10.0 * a.sin())),
    );
    pts
}

fn figure8() -> Vec<Point2<f64>> {
    const SCALE: f64 = 40.0;
    linspace(0.0, TAU, 200)
        .map(|t| {
            let denom = 1.0 + t.sin().powi(2);
            Point2::new(
                SCALE * t.cos() / denom + 50.0,
                SCALE * t.sin() * t.cos() / denom + 30.0,
            )
        })
        .collect()
}

/// `n` evenly spaced values from `a` to `b` inclusive.
fn linspace(a: f64, b: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = if n > 1 { (b - a) / (n - 1) as f64 } else { 0.0 };
    (0..n).map(move |i| a + step * i as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn oval_layout() {
        let track = Track::build(TrackKind::Oval);
        assert_eq!(track.len(), 50 + 29 + 49 + 29);
        assert_abs_diff_eq!(track.point(0).x, 0.0);
        // The loop closes back onto the start.
        let last = track.centerline[track.len() - 1];
        assert_abs_diff_eq!(last.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(last.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn figure8_layout() {
        let track = Track::build(TrackKind::Figure8);
        assert_eq!(track.len(), 200);
        for p in &track.centerline {
            assert!(p.x > 5.0 && p.x < 95.0);
            assert!(p.y > 5.0 && p.y < 55.0);
        }
    }

    #[test]
    fn closest_point_on_straight() {
        let track = Track::build(TrackKind::Oval);
        let c = track.closest(&Point2::new(25.0, 1.0));
        assert!(c.distance < 1.2);
        assert!(!track.is_off_track(c.distance));
        let far = track.closest(&Point2::new(25.0, 10.0));
        assert!(track.is_off_track(far.distance));
    }

    #[test]
    fn start_faces_along_track() {
        let track = Track::build(TrackKind::Oval);
        let (start, heading) = track.start_pose();
        assert_abs_diff_eq!(start.x, 0.0);
        assert_abs_diff_eq!(heading, 0.0);
        let t = track.tangent(0);
        assert_abs_diff_eq!(t.x, 1.0, epsilon = 1e-5);
    }
}
