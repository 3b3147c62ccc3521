// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
//! Module: vector path representation and flattening
//! Mirrors: rlottie_core/src/geometry/path.rs and geometry/tess.rs
//! (de Casteljau subdivision with a chord-flatness error metric).

use super::Point;

/// Recursion depth cap for curve subdivision. Bounds pathological
/// inputs (NaN control points, zero-length chords) from recursing
/// forever; the tolerance test alone is enough for any well-formed
/// curve to terminate long before this.
const MAX_SUBDIVISION_DEPTH: u32 = 24;

/// Path drawing commands, building up a [`Path`] before flattening.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSeg {
    /// Move to an absolute position, starting a new subpath.
    MoveTo(Point),
    /// Line to an absolute position.
    LineTo(Point),
    /// Cubic Bézier curve with two control points and an end point.
    CubicTo(Point, Point, Point),
    /// Quadratic Bézier curve with one control point and an end point.
    QuadTo(Point, Point),
    /// Elliptic arc using the SVG endpoint parameterization: radii,
    /// x-axis rotation in radians, large-arc flag, sweep flag, end
    /// point.
    ArcTo {
        radii: Point,
        x_rotation: f32,
        large_arc: bool,
        sweep: bool,
        end: Point,
    },
    /// Close the current subpath (draw back to its start).
    Close,
}

/// An ordered sequence of [`PathSeg`] items forming a vector path.
#[derive(Debug, Default, Clone)]
pub struct Path {
    /// Ordered list of path segments.
    pub segments: Vec<PathSeg>,
}

/// A flattened subpath: straight-line vertices plus whether `Close`
/// was explicitly issued.
///
/// Fills always treat a subpath as closed (a segment from the last
/// point to the first is synthesized downstream regardless of
/// `closed`); strokes distinguish the two.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Subpath {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Path {
    /// Create a new empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a move command, starting a new subpath.
    pub fn move_to(&mut self, p: Point) {
        self.segments.push(PathSeg::MoveTo(p));
    }

    /// Append a line command.
    pub fn line_to(&mut self, p: Point) {
        self.segments.push(PathSeg::LineTo(p));
    }

    /// Append a cubic Bézier curve command.
    pub fn cubic_to(&mut self, c1: Point, c2: Point, p: Point) {
        self.segments.push(PathSeg::CubicTo(c1, c2, p));
    }

    /// Append a quadratic Bézier curve command.
    pub fn quad_to(&mut self, c: Point, p: Point) {
        self.segments.push(PathSeg::QuadTo(c, p));
    }

    /// Append an elliptic arc command (SVG endpoint parameterization).
    pub fn arc_to(
        &mut self,
        radii: Point,
        x_rotation: f32,
        large_arc: bool,
        sweep: bool,
        end: Point,
    ) {
        self.segments.push(PathSeg::ArcTo {
            radii,
            x_rotation,
            large_arc,
            sweep,
            end,
        });
    }

    /// Close the current subpath.
    pub fn close(&mut self) {
        self.segments.push(PathSeg::Close);
    }

    /// The current point: the last point of the last subpath, or its
    /// first point if that subpath was closed; `(0,0)` if the path is
    /// empty.
    pub fn current_point(&self) -> Point {
        let mut current = Point::default();
        let mut start = Point::default();
        for seg in &self.segments {
            match *seg {
                PathSeg::MoveTo(p) => {
                    current = p;
                    start = p;
                }
                PathSeg::LineTo(p) | PathSeg::QuadTo(_, p) | PathSeg::CubicTo(_, _, p) => {
                    current = p;
                }
                PathSeg::ArcTo { end, .. } => current = end,
                PathSeg::Close => current = start,
            }
        }
        current
    }

    /// Flatten every subpath into straight-line vertices under the
    /// given tolerance. Curves are expected to already be in the space
    /// the caller wants error estimated in (device space, once the
    /// scene-assembly step has applied the current transform to
    /// control points).
    pub fn flatten(&self, tolerance: f32) -> Vec<Subpath> {
        let mut out = Vec::new();
        let mut current = Point::default();
        let mut start = Point::default();
        let mut points: Vec<Point> = Vec::new();
        let mut has_subpath = false;

        for seg in &self.segments {
            match *seg {
                PathSeg::MoveTo(p) => {
                    if has_subpath {
                        out.push(Subpath {
                            points: std::mem::take(&mut points),
                            closed: false,
                        });
                    }
                    points.clear();
                    points.push(p);
                    current = p;
                    start = p;
                    has_subpath = true;
                }
                PathSeg::LineTo(p) => {
                    points.push(p);
                    current = p;
                }
                PathSeg::QuadTo(c, p) => {
                    let c1 = current + (c - current) * (2.0 / 3.0);
                    let c2 = p + (c - p) * (2.0 / 3.0);
                    flatten_cubic(current, c1, c2, p, tolerance, 0, &mut points);
                    current = p;
                }
                PathSeg::CubicTo(c1, c2, p) => {
                    flatten_cubic(current, c1, c2, p, tolerance, 0, &mut points);
                    current = p;
                }
                PathSeg::ArcTo {
                    radii,
                    x_rotation,
                    large_arc,
                    sweep,
                    end,
                } => {
                    flatten_arc(
                        current,
                        radii,
                        x_rotation,
                        large_arc,
                        sweep,
                        end,
                        tolerance,
                        &mut points,
                    );
                    current = end;
                }
                PathSeg::Close => {
                    if has_subpath {
                        out.push(Subpath {
                            points: std::mem::take(&mut points),
                            closed: true,
                        });
                    }
                    current = start;
                    has_subpath = false;
                }
            }
        }
        if has_subpath && !points.is_empty() {
            out.push(Subpath {
                points,
                closed: false,
            });
        }
        out
    }
}

/// Squared flatness error of a cubic: project the
/// control-point offsets onto the chord and measure the rejection
/// (perpendicular component), scaled by the chord's squared length.
fn cubic_error_sq(p0: Point, c1: Point, c2: Point, p3: Point) -> f32 {
    let d = p3 - p0;
    let d_len_sq = d.length_sq();
    if d_len_sq == 0.0 {
        // Degenerate chord: fall back to raw offset magnitude from p0.
        let e1 = c1 - p0;
        let e2 = c2 - p0;
        return e1.length_sq().max(e2.length_sq());
    }
    let reject_sq = |p: Point| -> f32 {
        let e = p - p0;
        let proj = e.dot(d) / d_len_sq;
        let rejection = e - d * proj;
        rejection.length_sq()
    };
    reject_sq(c1).max(reject_sq(c2)) * d_len_sq
}

fn flatten_cubic(
    p0: Point,
    c1: Point,
    c2: Point,
    p3: Point,
    tolerance: f32,
    depth: u32,
    out: &mut Vec<Point>,
) {
    if depth >= MAX_SUBDIVISION_DEPTH || cubic_error_sq(p0, c1, c2, p3) <= tolerance * tolerance {
        out.push(p3);
        return;
    }
    let (a, b) = split_cubic(p0, c1, c2, p3);
    flatten_cubic(a.0, a.1, a.2, a.3, tolerance, depth + 1, out);
    flatten_cubic(b.0, b.1, b.2, b.3, tolerance, depth + 1, out);
}

type CubicPoints = (Point, Point, Point, Point);

/// De Casteljau subdivision at `t = 1/2`.
fn split_cubic(p0: Point, c1: Point, c2: Point, p3: Point) -> (CubicPoints, CubicPoints) {
    let m1 = mid(p0, c1);
    let m2 = mid(c1, c2);
    let m3 = mid(c2, p3);
    let m4 = mid(m1, m2);
    let m5 = mid(m2, m3);
    let m6 = mid(m4, m5);
    ((p0, m1, m4, m6), (m6, m5, m3, p3))
}

fn mid(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

/// Flatten an elliptic arc via the SVG endpoint-to-center
/// parameterization, emitting `<=90°` cubic Bézier slices
/// (`h = 4/3 * tan(delta/4)`) and subdividing each like any other
/// cubic.
#[allow(clippy::too_many_arguments)]
fn flatten_arc(
    start: Point,
    radii: Point,
    x_rotation: f32,
    large_arc: bool,
    sweep: bool,
    end: Point,
    tolerance: f32,
    out: &mut Vec<Point>,
) {
    if start == end {
        return;
    }
    let mut rx = radii.x.abs();
    let mut ry = radii.y.abs();
    if rx == 0.0 || ry == 0.0 {
        out.push(end);
        return;
    }

    let (sin_phi, cos_phi) = x_rotation.sin_cos();
    let dx2 = (start.x - end.x) / 2.0;
    let dy2 = (start.y - end.y) / 2.0;
    let x1p = cos_phi * dx2 + sin_phi * dy2;
    let y1p = -sin_phi * dx2 + cos_phi * dy2;

    // Correct out-of-range radii (F.6.6).
    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let scale = lambda.sqrt();
        rx *= scale;
        ry *= scale;
    }

    let rx_sq = rx * rx;
    let ry_sq = ry * ry;
    let x1p_sq = x1p * x1p;
    let y1p_sq = y1p * y1p;
    let num = rx_sq * ry_sq - rx_sq * y1p_sq - ry_sq * x1p_sq;
    let den = rx_sq * y1p_sq + ry_sq * x1p_sq;
    let mut co = if den == 0.0 { 0.0 } else { (num / den).max(0.0).sqrt() };
    if large_arc == sweep {
        co = -co;
    }
    let cxp = co * (rx * y1p / ry);
    let cyp = co * (-ry * x1p / rx);

    let cx = cos_phi * cxp - sin_phi * cyp + (start.x + end.x) / 2.0;
    let cy = sin_phi * cxp + cos_phi * cyp + (start.y + end.y) / 2.0;

    let angle = |ux: f32, uy: f32, vx: f32, vy: f32| -> f32 {
        let dot = ux * vx + uy * vy;
        let len = (ux * ux + uy * uy).sqrt() * (vx * vx + vy * vy).sqrt();
        let mut a = (dot / len).clamp(-1.0, 1.0).acos();
        if ux * vy - uy * vx < 0.0 {
            a = -a;
        }
        a
    };

    let theta1 = angle(1.0, 0.0, (x1p - cxp) / rx, (y1p - cyp) / ry);
    let mut delta = angle(
        (x1p - cxp) / rx,
        (y1p - cyp) / ry,
        (-x1p - cxp) / rx,
        (-y1p - cyp) / ry,
    );
    if !sweep && delta > 0.0 {
        delta -= std::f32::consts::TAU;
    } else if sweep && delta < 0.0 {
        delta += std::f32::consts::TAU;
    }

    let segments = (delta.abs() / (std::f32::consts::FRAC_PI_2)).ceil().max(1.0) as usize;
    let step = delta / segments as f32;
    let mut theta = theta1;
    let mut prev = start;
    for i in 0..segments {
        let next_theta = if i == segments - 1 { theta1 + delta } else { theta + step };
        let p_theta = |t: f32| -> Point {
            let x = cx + rx * t.cos() * cos_phi - ry * t.sin() * sin_phi;
            let y = cy + rx * t.cos() * sin_phi + ry * t.sin() * cos_phi;
            Point::new(x, y)
        };
        let d_theta = |t: f32| -> Point {
            let x = -rx * t.sin() * cos_phi - ry * t.cos() * sin_phi;
            let y = -rx * t.sin() * sin_phi + ry * t.cos() * cos_phi;
            Point::new(x, y)
        };
        let p0 = prev;
        let p3 = if i == segments - 1 { end } else { p_theta(next_theta) };
        let t_handle = (4.0 / 3.0) * ((next_theta - theta) / 4.0).tan();
        let c1 = p0 + d_theta(theta) * t_handle;
        let c2 = p3 - d_theta(next_theta) * t_handle;
        flatten_cubic(p0, c1, c2, p3, tolerance, 0, out);
        prev = p3;
        theta = next_theta;
    }
}

/// Produce a stroked outline of `width_px` around a flattened subpath:
/// offset the forward side by half the stroke width along
/// its left normal; closed subpaths get a second, reversed offset
/// subpath forming an annulus; open subpaths get a single closed loop
/// (butt ends). Degenerate zero-length edges are skipped and no
/// miter/round join geometry is synthesized — consecutive offset
/// endpoints are simply connected.
pub fn stroke_outline(subpath: &Subpath, width_px: f32) -> Vec<Subpath> {
    let half = width_px * 0.5;
    let forward = offset_polyline(&subpath.points, half, subpath.closed);
    if forward.is_empty() {
        return Vec::new();
    }
    if subpath.closed {
        let reverse = offset_polyline(&subpath.points, -half, true);
        let mut reverse_points = reverse;
        reverse_points.reverse();
        vec![
            Subpath {
                points: forward,
                closed: true,
            },
            Subpath {
                points: reverse_points,
                closed: true,
            },
        ]
    } else {
        let mut reverse = offset_polyline(&subpath.points, -half, false);
        reverse.reverse();
        let mut loop_points = forward;
        loop_points.extend(reverse);
        vec![Subpath {
            points: loop_points,
            closed: true,
        }]
    }
}

/// Offset every edge of a polyline by `offset` along its left normal,
/// dropping zero-length edges and joining consecutive offset edges at
/// their raw intersection point (a plain vertex, not a miter).
fn offset_polyline(points: &[Point], offset: f32, closed: bool) -> Vec<Point> {
    let mut edges: Vec<(Point, Point)> = Vec::new();
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }
    let edge_count = if closed { n } else { n - 1 };
    for i in 0..edge_count {
        let a = points[i];
        let b = points[(i + 1) % n];
        let d = b - a;
        if d.length_sq() == 0.0 {
            continue;
        }
        let len = d.length();
        let nx = -d.y / len * offset;
        let ny = d.x / len * offset;
        let nrm = Point::new(nx, ny);
        edges.push((a + nrm, b + nrm));
    }
    if edges.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(edges.len() + 1);
    out.push(edges[0].0);
    for w in edges.windows(2) {
        out.push(w[0].1);
        out.push(w[1].0);
    }
    out.push(edges.last().unwrap().1);
    out
}
