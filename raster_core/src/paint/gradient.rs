// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
//! Module: gradient stop tables and the linear/radial samplers
//! Mirrors: rlottie_core/src/types.rs's LinearGradient/RadialGradient
//! stop-table shape.

use crate::geometry::Point;
use crate::pixmap::Color;

/// A color stop in a gradient's stop table, ordered ascending by `pos`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub pos: f32,
    pub color: Color,
}

/// A linear gradient between `start` and `end`, sampled by projecting
/// the query point onto that axis.
#[derive(Debug, Clone)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    /// Ascending by `pos`.
    pub stops: Vec<GradientStop>,
}

impl LinearGradient {
    /// `t = dot(p - start, end - start) / |end - start|^2`, clamped at
    /// the endpoints by [`sample_stops`].
    pub fn eval(&self, p: Point) -> Color {
        let axis = self.end - self.start;
        let len_sq = axis.length_sq();
        let t = if len_sq == 0.0 {
            0.0
        } else {
            (p - self.start).dot(axis) / len_sq
        };
        sample_stops(&self.stops, t)
    }
}

/// A radial (conical, focal-offset) gradient: a circle of radius `fr`
/// centered at `focal` blends into a circle of radius `radius`
/// centered at `center` as `t` goes from 0 to 1.
#[derive(Debug, Clone)]
pub struct RadialGradient {
    pub center: Point,
    pub radius: f32,
    pub focal: Point,
    pub focal_radius: f32,
    /// Ascending by `pos`.
    pub stops: Vec<GradientStop>,
}

impl RadialGradient {
    /// Solve for the positive root `t` of
    /// `‖f + (c-f)*t - p‖ = fr + (r-fr)*t` and sample the
    /// stop table there. Degenerate cases (`A == B == 0`, or a
    /// negative discriminant) resolve to transparent-black rather than
    /// propagating an error.
    pub fn eval(&self, p: Point) -> Color {
        match self.solve_t(p) {
            Some(t) => sample_stops(&self.stops, t),
            None => Color::TRANSPARENT,
        }
    }

    fn solve_t(&self, p: Point) -> Option<f32> {
        let cf = self.center - self.focal;
        let fp = self.focal - p;
        let dr = self.radius - self.focal_radius;

        let a = cf.length_sq() - dr * dr;
        let b = cf.dot(fp) - self.focal_radius * dr;
        let c = fp.length_sq() - self.focal_radius * self.focal_radius;

        if a == 0.0 {
            if b == 0.0 {
                return None;
            }
            return Some(-c / (2.0 * b));
        }

        let d = b * b - a * c;
        if d < 0.0 {
            return None;
        }
        let sqrt_d = d.sqrt();
        let t = if self.focal_radius > self.radius {
            (-b + sqrt_d) / a
        } else {
            (-b - sqrt_d) / a
        };
        Some(t)
    }
}

/// Binary search the ascending stop table for `t`, clamping to the
/// endpoint colors outside `[first.pos, last.pos]` and linearly
/// interpolating between the bracketing pair otherwise.
pub fn sample_stops(stops: &[GradientStop], t: f32) -> Color {
    if stops.is_empty() {
        super::EMPTY_GRADIENT_COUNT.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        return Color::TRANSPARENT;
    }
    if t <= stops[0].pos {
        return stops[0].color;
    }
    let last = stops.len() - 1;
    if t >= stops[last].pos {
        return stops[last].color;
    }

    // Binary search for the first stop with pos > t; the bracketing
    // pair is (lo-1, lo).
    let mut lo = 0usize;
    let mut hi = stops.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if stops[mid].pos <= t {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    let s0 = stops[lo - 1];
    let s1 = stops[lo];
    let span = s1.pos - s0.pos;
    let local = if span == 0.0 { 0.0 } else { (t - s0.pos) / span };
    lerp_color(s0.color, s1.color, local)
}

fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    Color::new(
        a.r + (b.r - a.r) * t,
        a.g + (b.g - a.g) * t,
        a.b + (b.b - a.b) * t,
        a.a + (b.a - a.a) * t,
    )
}
