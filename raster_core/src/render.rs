// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
//! Module: top-level render entry points
//! Mirrors: rlottie_core/src/renderer/mod.rs's top-level entry point
//! shape (a thin function gluing the scene type to the pixel buffer).

use crate::paint::diagnostic_counts;
use crate::pixmap::Pixmap;
use crate::raster;
use crate::scene::{Scene, Shape};

/// Counts of soft-fail fallbacks taken during a render: paints that
/// fell back to transparent-black rather than aborting. Exposed for
/// callers (loaders, test harnesses) that want to notice a scene is
/// silently producing blank paint without treating it as a hard error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub singular_transforms: u32,
    pub empty_gradients: u32,
}

/// Render `scene` to a premultiplied-alpha [`Pixmap`].
///
/// A scene with zero width or height is degenerate: rather than
/// propagating an error, this returns an empty pixmap of that (zero)
/// size. Otherwise, shapes whose bounding box never touches the canvas
/// are culled before their edges reach the sweep.
pub fn render(scene: &Scene) -> Pixmap {
    if scene.width == 0 || scene.height == 0 {
        return Pixmap::new(scene.width as usize, scene.height as usize);
    }
    let culled = cull_offscreen_shapes(scene);
    raster::rasterize(&culled)
}

/// Drop shapes whose bounding box doesn't intersect `[0, width] x
/// [0, height]`. Each edge is linear in `y`, so its bounding box is
/// just its two endpoints; no flattening or intersection math is
/// needed beyond that.
fn cull_offscreen_shapes(scene: &Scene) -> Scene {
    let shapes: Vec<Shape> = scene
        .shapes
        .iter()
        .filter(|shape| shape_touches_canvas(shape, scene.width, scene.height))
        .cloned()
        .collect();
    Scene {
        shapes,
        width: scene.width,
        height: scene.height,
    }
}

fn shape_touches_canvas(shape: &Shape, width: u32, height: u32) -> bool {
    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for (segment, _) in &shape.edges {
        let x_lo = segment.line.x_at(segment.y_lo);
        let x_hi = segment.line.x_at(segment.y_hi);
        min_x = min_x.min(x_lo).min(x_hi);
        max_x = max_x.max(x_lo).max(x_hi);
        min_y = min_y.min(segment.y_lo);
        max_y = max_y.max(segment.y_hi);
    }
    if !min_x.is_finite() {
        return false;
    }
    max_x >= 0.0 && min_x <= width as f32 && max_y >= 0.0 && min_y <= height as f32
}

/// As [`render`], but also returns a [`Diagnostics`] tally of soft-fail
/// fallbacks encountered while resolving this scene's paints.
///
/// The counters are process-wide (rendering is single-threaded and
/// synchronous), so this reads them before and after the render and
/// reports the delta — safe as long as no other render runs
/// concurrently on the same process, which the crate never does
/// internally.
pub fn render_with_diagnostics(scene: &Scene) -> (Pixmap, Diagnostics) {
    let (st0, eg0) = diagnostic_counts();
    let pixmap = render(scene);
    let (st1, eg1) = diagnostic_counts();
    let diagnostics = Diagnostics {
        singular_transforms: st1.saturating_sub(st0),
        empty_gradients: eg1.saturating_sub(eg0),
    };
    (pixmap, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::paint::{Paint, PaintServer};
    use crate::pixmap::Color;
    use crate::scene::{Document, Style};

    #[test]
    fn zero_size_scene_yields_empty_pixmap() {
        let scene = Scene::new(0, 0);
        let pixmap = render(&scene);
        assert_eq!(pixmap.width(), 0);
        assert_eq!(pixmap.height(), 0);
    }

    #[test]
    fn diagnostics_count_singular_transform_fallback() {
        let mut doc = Document::new(4, 4);
        let mut p = crate::geometry::Path::new();
        p.move_to(Point::new(0.0, 0.0));
        p.line_to(Point::new(4.0, 0.0));
        p.line_to(Point::new(4.0, 4.0));
        p.line_to(Point::new(0.0, 4.0));
        p.close();
        let style = Style {
            fill: Some(PaintServer::Linear(crate::paint::LinearGradient {
                start: Point::new(0.0, 0.0),
                end: Point::new(1.0, 0.0),
                stops: vec![
                    crate::paint::GradientStop { pos: 0.0, color: Color::new(1.0, 0.0, 0.0, 1.0) },
                    crate::paint::GradientStop { pos: 1.0, color: Color::new(0.0, 0.0, 1.0, 1.0) },
                ],
            })),
            ..Style::default()
        };
        // A zero-determinant transform makes the gradient's user-space
        // inverse singular.
        doc.draw(&p, &style, &crate::geometry::Transform::scale(0.0, 1.0));
        let (_, diagnostics) = render_with_diagnostics(&doc.into_scene());
        assert_eq!(diagnostics.singular_transforms, 1);
    }

    #[test]
    fn offscreen_shape_is_culled_without_affecting_onscreen_result() {
        let mut with_offscreen = Document::new(4, 4);
        with_offscreen.fill(
            &{
                let mut p = crate::geometry::Path::new();
                p.move_to(Point::new(0.0, 0.0));
                p.line_to(Point::new(4.0, 0.0));
                p.line_to(Point::new(4.0, 4.0));
                p.line_to(Point::new(0.0, 4.0));
                p.close();
                p
            },
            Paint::Solid(Color::new(1.0, 0.0, 0.0, 1.0)),
        );
        with_offscreen.fill(
            &{
                let mut p = crate::geometry::Path::new();
                p.move_to(Point::new(100.0, 100.0));
                p.line_to(Point::new(110.0, 100.0));
                p.line_to(Point::new(110.0, 110.0));
                p.line_to(Point::new(100.0, 110.0));
                p.close();
                p
            },
            Paint::Solid(Color::new(0.0, 1.0, 0.0, 1.0)),
        );
        let culled = cull_offscreen_shapes(&with_offscreen.into_scene());
        assert_eq!(culled.shapes.len(), 1);

        let pixmap = render(&culled);
        let c = pixmap.get_pixel(0, 0);
        assert!((c.r - 1.0).abs() < 1e-6);
    }

    #[test]
    fn shape_fully_outside_canvas_is_dropped() {
        let mut doc = Document::new(4, 4);
        doc.fill(
            &{
                let mut p = crate::geometry::Path::new();
                p.move_to(Point::new(-20.0, -20.0));
                p.line_to(Point::new(-10.0, -20.0));
                p.line_to(Point::new(-10.0, -10.0));
                p.line_to(Point::new(-20.0, -10.0));
                p.close();
                p
            },
            Paint::Solid(Color::new(1.0, 1.0, 1.0, 1.0)),
        );
        let scene = doc.into_scene();
        assert_eq!(scene.shapes.len(), 1);
        let culled = cull_offscreen_shapes(&scene);
        assert!(culled.shapes.is_empty());
    }

    #[test]
    fn no_fallbacks_on_a_clean_scene() {
        let mut doc = Document::new(2, 2);
        doc.fill(
            &{
                let mut p = crate::geometry::Path::new();
                p.move_to(Point::new(0.0, 0.0));
                p.line_to(Point::new(2.0, 0.0));
                p.line_to(Point::new(2.0, 2.0));
                p.close();
                p
            },
            Paint::Solid(Color::new(1.0, 1.0, 1.0, 1.0)),
        );
        let (_, diagnostics) = render_with_diagnostics(&doc.into_scene());
        assert_eq!(diagnostics, Diagnostics::default());
    }
}
