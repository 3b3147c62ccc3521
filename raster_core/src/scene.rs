// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
//! Module: scene assembly
//! Mirrors: rlottie_core/src/types.rs's Layer/Composition builder pattern.

use crate::geometry::{stroke_outline, Line, Path, PathSeg, Point, Segment, Subpath, Transform};
use crate::paint::{Paint, PaintServer};

/// A single drawable: a soup of non-horizontal edges plus the paint
/// evaluated at every pixel they cover.
///
/// Edges are stored with their winding `direction` as a plain tuple
/// rather than a dedicated directed-edge type; the shape-index
/// back-reference is the edge's position in [`Scene::shapes`], supplied
/// by the rasterizer when it walks the scene rather than duplicated
/// onto every edge.
#[derive(Debug, Clone)]
pub struct Shape {
    pub edges: Vec<(Segment, i8)>,
    pub paint: Paint,
}

/// A scene: shapes in paint (compositing bottom-up) order, plus the
/// canvas size.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub shapes: Vec<Shape>,
    pub width: u32,
    pub height: u32,
}

impl Scene {
    pub fn new(width: u32, height: u32) -> Scene {
        Scene {
            shapes: Vec::new(),
            width,
            height,
        }
    }
}

/// Style flags for [`Document::draw`]: which of fill/stroke to apply
/// and at what opacity.
#[derive(Debug, Clone)]
pub struct Style {
    pub fill: Option<PaintServer>,
    pub fill_opacity: f32,
    pub stroke: Option<PaintServer>,
    pub stroke_opacity: f32,
    pub stroke_width: f32,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            fill: None,
            fill_opacity: 1.0,
            stroke: None,
            stroke_opacity: 1.0,
            stroke_width: 1.0,
        }
    }
}

/// A stateful builder that accumulates [`Shape`]s into a [`Scene`] in
/// the order they are drawn.
#[derive(Debug, Clone)]
pub struct Document {
    scene: Scene,
    tolerance: f32,
}

/// Default flattening tolerance: ~1/256 user-space unit.
pub const DEFAULT_TOLERANCE: f32 = 1.0 / 256.0;

impl Document {
    pub fn new(width: u32, height: u32) -> Document {
        Document {
            scene: Scene::new(width, height),
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_tolerance(width: u32, height: u32, tolerance: f32) -> Document {
        Document {
            scene: Scene::new(width, height),
            tolerance,
        }
    }

    /// Finish building and return the assembled [`Scene`].
    pub fn into_scene(self) -> Scene {
        self.scene
    }

    /// Fill `path` (already in device space) with `paint`, pushing one
    /// new [`Shape`].
    pub fn fill(&mut self, path: &Path, paint: Paint) {
        let subpaths = path.flatten(self.tolerance);
        let edges = fill_edges(&subpaths);
        if !edges.is_empty() {
            self.scene.shapes.push(Shape { edges, paint });
        }
    }

    /// Stroke `path` (already in device space) at `width_px` with
    /// `paint`, pushing one new [`Shape`] per stroked subpath ink
    /// outline.
    pub fn stroke(&mut self, path: &Path, paint: Paint, width_px: f32) {
        if width_px <= 0.0 {
            return;
        }
        let subpaths = path.flatten(self.tolerance);
        let mut outline_subpaths = Vec::new();
        for sp in &subpaths {
            outline_subpaths.extend(stroke_outline(sp, width_px));
        }
        let edges = fill_edges(&outline_subpaths);
        if !edges.is_empty() {
            self.scene.shapes.push(Shape { edges, paint });
        }
    }

    /// Apply `transform` to `path`'s control points, then fill and/or
    /// stroke it per `style`. Opacity is folded into each
    /// paint server's resolved [`Paint`] via
    /// [`PaintServer::resolve`]; gradient paint servers bake the
    /// inverse of `transform` so they evaluate in the path's original
    /// user space.
    pub fn draw(&mut self, path: &Path, style: &Style, transform: &Transform) {
        let device_path = transform_path(path, transform);
        if let Some(server) = &style.fill {
            if style.fill_opacity > 0.0 {
                let paint = server.resolve(transform, style.fill_opacity);
                self.fill(&device_path, paint);
            }
        }
        if let Some(server) = &style.stroke {
            if style.stroke_width > 0.0 && style.stroke_opacity > 0.0 {
                let paint = server.resolve(transform, style.stroke_opacity);
                self.stroke(&device_path, paint, style.stroke_width);
            }
        }
    }
}

/// Apply an affine transform to every control point of a path. Affine
/// maps commute with Bézier evaluation, so transforming control
/// points before flattening is equivalent to flattening then
/// transforming the resulting polyline.
fn transform_path(path: &Path, t: &Transform) -> Path {
    let map = |p: Point| t.apply(p);
    let segments = path
        .segments
        .iter()
        .map(|seg| match *seg {
            PathSeg::MoveTo(p) => PathSeg::MoveTo(map(p)),
            PathSeg::LineTo(p) => PathSeg::LineTo(map(p)),
            PathSeg::CubicTo(c1, c2, p) => PathSeg::CubicTo(map(c1), map(c2), map(p)),
            PathSeg::QuadTo(c, p) => PathSeg::QuadTo(map(c), map(p)),
            PathSeg::ArcTo {
                radii,
                x_rotation,
                large_arc,
                sweep,
                end,
            } => PathSeg::ArcTo {
                radii,
                x_rotation,
                large_arc,
                sweep,
                end: map(end),
            },
            PathSeg::Close => PathSeg::Close,
        })
        .collect();
    Path { segments }
}

/// Build the edge soup for a set of flattened subpaths, synthesizing
/// the closing edge for every subpath regardless of its explicit
/// `closed` flag (a fill region is always implicitly closed) and
/// dropping horizontal/degenerate edges.
fn fill_edges(subpaths: &[Subpath]) -> Vec<(Segment, i8)> {
    let mut out = Vec::new();
    for sp in subpaths {
        let n = sp.points.len();
        if n < 2 {
            continue;
        }
        for i in 0..n {
            let a = sp.points[i];
            let b = sp.points[(i + 1) % n];
            if let Some(segment) = Segment::new(a, b) {
                let direction = if a.y < b.y { 1 } else { -1 };
                out.push((segment, direction));
            }
        }
    }
    out
}

/// Build a [`Line`] through two endpoints without registering it as a
/// full edge — exposed for callers (e.g. stroke-join debugging) that
/// want the raw parametric line of an already-validated segment.
pub fn line_through(a: Point, b: Point) -> Option<Line> {
    if a.y == b.y {
        None
    } else {
        Some(Line::from_points(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixmap::Color;

    fn square_path() -> Path {
        let mut p = Path::new();
        p.move_to(Point::new(0.0, 0.0));
        p.line_to(Point::new(4.0, 0.0));
        p.line_to(Point::new(4.0, 4.0));
        p.line_to(Point::new(0.0, 4.0));
        p.close();
        p
    }

    #[test]
    fn fill_pushes_one_shape_with_four_edges() {
        let mut doc = Document::new(10, 10);
        doc.fill(&square_path(), Paint::Solid(Color::new(1.0, 0.0, 0.0, 1.0)));
        let scene = doc.into_scene();
        assert_eq!(scene.shapes.len(), 1);
        assert_eq!(scene.shapes[0].edges.len(), 4);
    }

    #[test]
    fn fill_open_subpath_still_synthesizes_closing_edge() {
        let mut p = Path::new();
        p.move_to(Point::new(0.0, 0.0));
        p.line_to(Point::new(4.0, 0.0));
        p.line_to(Point::new(4.0, 4.0));
        // no close() call
        let mut doc = Document::new(10, 10);
        doc.fill(&p, Paint::Solid(Color::new(1.0, 1.0, 1.0, 1.0)));
        let scene = doc.into_scene();
        assert_eq!(scene.shapes[0].edges.len(), 3);
    }

    #[test]
    fn stroke_with_zero_width_is_skipped() {
        let mut doc = Document::new(10, 10);
        doc.stroke(&square_path(), Paint::Solid(Color::new(1.0, 1.0, 1.0, 1.0)), 0.0);
        assert!(doc.into_scene().shapes.is_empty());
    }

    #[test]
    fn draw_respects_style_flags() {
        let mut doc = Document::new(10, 10);
        let style = Style {
            fill: Some(PaintServer::Solid(Color::new(1.0, 0.0, 0.0, 1.0))),
            fill_opacity: 1.0,
            stroke: None,
            stroke_opacity: 1.0,
            stroke_width: 1.0,
        };
        doc.draw(&square_path(), &style, &Transform::identity());
        assert_eq!(doc.into_scene().shapes.len(), 1);
    }

    #[test]
    fn draw_skips_zero_opacity_fill() {
        let mut doc = Document::new(10, 10);
        let style = Style {
            fill: Some(PaintServer::Solid(Color::new(1.0, 0.0, 0.0, 1.0))),
            fill_opacity: 0.0,
            ..Style::default()
        };
        doc.draw(&square_path(), &style, &Transform::identity());
        assert!(doc.into_scene().shapes.is_empty());
    }
}
