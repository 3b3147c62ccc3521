// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
//! Module: sweep rasterizer
//! Mirrors: rlottie_core/src/renderer/cpu.rs's module split and
//! debug_assert discipline; the algorithm itself has no teacher
//! counterpart (see DESIGN.md).

mod area;
mod event;

use smallvec::SmallVec;

use crate::geometry::{Point, Segment};
use crate::pixmap::{Color, Pixmap};
use crate::scene::Scene;
use event::{Event, EventKind, EventQueue};

/// A flattened, shape-tagged edge. Built fresh per [`rasterize`] call
/// from [`Scene::shapes`]; `shape_index` is this edge's position among
/// `scene.shapes`, used both for the non-zero winding rule and to order
/// Porter-Duff compositing.
#[derive(Debug, Clone, Copy)]
struct Edge {
    segment: Segment,
    direction: i8,
    shape_index: usize,
}

/// The sweep line's active-edge set. Bounded by how many edges cross a
/// given scanline at once, which for typical vector art stays well
/// under a handful even for dozens of overlapping shapes.
type ActiveEdges = SmallVec<[usize; 16]>;

/// Render `scene` to a fresh [`Pixmap`] via the analytic-coverage
/// sweep. Callers are responsible for handling a degenerate scene
/// (zero width/height) before calling in; this function assumes
/// positive dimensions.
pub fn rasterize(scene: &Scene) -> Pixmap {
    let mut pixmap = Pixmap::new(scene.width as usize, scene.height as usize);

    let edges: Vec<Edge> = scene
        .shapes
        .iter()
        .enumerate()
        .flat_map(|(shape_index, shape)| {
            shape.edges.iter().map(move |&(segment, direction)| Edge {
                segment,
                direction,
                shape_index,
            })
        })
        .collect();
    if edges.is_empty() {
        return pixmap;
    }

    let mut queue = EventQueue::new();
    for (edge_id, edge) in edges.iter().enumerate() {
        queue.push(Event {
            y: edge.segment.y_lo,
            kind: EventKind::Start,
            edge_id,
        });
        queue.push(Event {
            y: edge.segment.y_hi,
            kind: EventKind::End,
            edge_id,
        });
    }

    let mut active: ActiveEdges = SmallVec::new();
    let mut current_y = match queue.peek_y() {
        Some(y) => y,
        None => return pixmap,
    };

    while !queue.is_empty() || !active.is_empty() {
        let next_event_y = queue.peek_y().unwrap_or(f32::INFINITY);

        if active.is_empty() {
            current_y = next_event_y;
        } else {
            loop {
                active.sort_by(|&a, &b| {
                    let xa = edges[a].segment.line.x_at(current_y);
                    let xb = edges[b].segment.line.x_at(current_y);
                    xa.partial_cmp(&xb)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| {
                            edges[a]
                                .segment
                                .line
                                .m
                                .partial_cmp(&edges[b].segment.line.m)
                                .unwrap_or(std::cmp::Ordering::Equal)
                        })
                });

                let mut next_y = next_event_y;
                for w in active.windows(2) {
                    let a = &edges[w[0]].segment.line;
                    let b = &edges[w[1]].segment.line;
                    if a.m != b.m {
                        if let Some(y) = a.intersect_y(b) {
                            if y > current_y && y < next_y {
                                next_y = y;
                            }
                        }
                    }
                }

                rasterize_strip(current_y, next_y, &active, &edges, scene, &mut pixmap);

                if next_y >= next_event_y {
                    current_y = next_event_y;
                    break;
                }
                current_y = next_y;
            }
        }

        // Apply every event exactly at current_y before the next strip.
        while let Some(y) = queue.peek_y() {
            if y != current_y {
                break;
            }
            let ev = queue.pop().expect("peeked event must pop");
            match ev.kind {
                EventKind::Start => active.push(ev.edge_id),
                EventKind::End => {
                    if let Some(pos) = active.iter().position(|&id| id == ev.edge_id) {
                        active.remove(pos);
                    }
                }
            }
        }
    }

    pixmap
}

/// Clamp `(y0, y1)` to the canvas and to pixel rows, then rasterize
/// each row-clipped sub-strip.
fn rasterize_strip(
    y0: f32,
    y1: f32,
    active: &[usize],
    edges: &[Edge],
    scene: &Scene,
    pixmap: &mut Pixmap,
) {
    if y1 <= y0 || active.len() < 2 {
        return;
    }
    let canvas_h = scene.height as f32;
    let y0 = y0.max(0.0);
    let y1 = y1.min(canvas_h);
    if y1 <= y0 {
        return;
    }

    let row_start = y0.floor() as usize;
    let row_end = (y1.ceil() as usize).min(scene.height as usize);
    for row in row_start..row_end {
        let ry0 = y0.max(row as f32);
        let ry1 = y1.min(row as f32 + 1.0);
        if ry1 <= ry0 {
            continue;
        }
        rasterize_row(row, ry0, ry1, active, edges, scene, pixmap);
    }
}

/// Stage C: walk `active` left to right, maintaining per-shape winding,
/// and paint every pixel-trapezoid intersection between consecutive
/// edges while the active-shape set is non-empty.
fn rasterize_row(
    row: usize,
    ry0: f32,
    ry1: f32,
    active: &[usize],
    edges: &[Edge],
    scene: &Scene,
    pixmap: &mut Pixmap,
) {
    let mut winding: SmallVec<[(usize, i32); 8]> = SmallVec::new();
    let mut active_shapes: SmallVec<[usize; 8]> = SmallVec::new();
    let canvas_w = scene.width as usize;

    for pair in active.windows(2) {
        let left = &edges[pair[0]];
        let right = &edges[pair[1]];

        update_winding(&mut winding, left.shape_index, left.direction as i32);
        active_shapes.clear();
        active_shapes.extend(winding.iter().filter(|(_, w)| *w != 0).map(|(s, _)| *s));
        if active_shapes.is_empty() {
            continue;
        }
        active_shapes.sort_unstable();

        let xl0 = left.segment.line.x_at(ry0);
        let xl1 = left.segment.line.x_at(ry1);
        let xr0 = right.segment.line.x_at(ry0);
        let xr1 = right.segment.line.x_at(ry1);

        let min_x = xl0.min(xl1).min(xr0).min(xr1).max(0.0);
        let max_x = xl0.max(xl1).max(xr0).max(xr1).min(canvas_w as f32);
        if max_x <= min_x {
            continue;
        }
        let col_start = min_x.floor() as usize;
        let col_end = (max_x.ceil() as usize).min(canvas_w);

        for col in col_start..col_end {
            let a = area::trapezoid_pixel_area(ry0, ry1, xl0, xl1, xr0, xr1, col as f32);
            if a <= 0.0 {
                continue;
            }
            let center = Point::new(col as f32 + 0.5, row as f32 + 0.5);
            let color = blend_active_shapes(&active_shapes, scene, center);
            pixmap.add_pixel(col, row, color * a);
        }
    }
}

/// Add `delta` to `shape_index`'s winding count, inserting on first
/// sight and dropping the entry once it returns to zero.
fn update_winding(winding: &mut SmallVec<[(usize, i32); 8]>, shape_index: usize, delta: i32) {
    if let Some(entry) = winding.iter_mut().find(|(s, _)| *s == shape_index) {
        entry.1 += delta;
        if entry.1 == 0 {
            winding.retain(|(s, _)| *s != shape_index);
        }
    } else if delta != 0 {
        winding.push((shape_index, delta));
    }
}

/// Composite the active shapes' paints at `p`, ascending by shape index
/// (insertion/draw order), using Porter-Duff "over" on premultiplied
/// color.
fn blend_active_shapes(shape_indices: &[usize], scene: &Scene, p: Point) -> Color {
    let mut acc = Color::TRANSPARENT;
    for &idx in shape_indices {
        let straight = scene.shapes[idx].paint.eval(p);
        acc = straight.premultiply().over(acc);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Paint;
    use crate::scene::Document;

    fn square_path(x0: f32, y0: f32, x1: f32, y1: f32) -> crate::geometry::Path {
        let mut p = crate::geometry::Path::new();
        p.move_to(Point::new(x0, y0));
        p.line_to(Point::new(x1, y0));
        p.line_to(Point::new(x1, y1));
        p.line_to(Point::new(x0, y1));
        p.close();
        p
    }

    #[test]
    fn full_canvas_opaque_square_covers_every_pixel() {
        // P1 (conservation of area), restricted to a single shape.
        let mut doc = Document::new(4, 4);
        doc.fill(
            &square_path(0.0, 0.0, 4.0, 4.0),
            Paint::Solid(Color::new(1.0, 0.0, 0.0, 1.0)),
        );
        let pixmap = rasterize(&doc.into_scene());
        let total_alpha: f32 = pixmap.pixels().map(|(_, _, c)| c.a).sum();
        assert!((total_alpha - 16.0).abs() < 1e-3);
    }

    #[test]
    fn half_covered_pixel_gets_half_alpha() {
        let mut doc = Document::new(2, 1);
        doc.fill(
            &square_path(0.0, 0.0, 0.5, 1.0),
            Paint::Solid(Color::new(1.0, 1.0, 1.0, 1.0)),
        );
        let pixmap = rasterize(&doc.into_scene());
        let c = pixmap.get_pixel(0, 0);
        assert!((c.a - 0.5).abs() < 1e-3);
        assert_eq!(pixmap.get_pixel(1, 0).a, 0.0);
    }

    #[test]
    fn nested_opposite_winding_rectangles_punch_a_hole() {
        // P4: opposite-winding concentric rectangles leave a hole.
        let mut doc = Document::new(6, 6);
        doc.fill(
            &square_path(0.0, 0.0, 6.0, 6.0),
            Paint::Solid(Color::new(1.0, 1.0, 1.0, 1.0)),
        );
        // Reverse winding: traverse the inner square the opposite way.
        let mut inner = crate::geometry::Path::new();
        inner.move_to(Point::new(2.0, 2.0));
        inner.line_to(Point::new(2.0, 4.0));
        inner.line_to(Point::new(4.0, 4.0));
        inner.line_to(Point::new(4.0, 2.0));
        inner.close();
        doc.fill(&inner, Paint::Solid(Color::new(1.0, 1.0, 1.0, 1.0)));
        let pixmap = rasterize(&doc.into_scene());
        assert_eq!(pixmap.get_pixel(3, 3).a, 0.0);
        assert!((pixmap.get_pixel(0, 0).a - 1.0).abs() < 1e-3);
    }

    #[test]
    fn transparent_paint_leaves_pixmap_unchanged() {
        // P3.
        let mut doc = Document::new(3, 3);
        doc.fill(
            &square_path(0.0, 0.0, 3.0, 3.0),
            Paint::Solid(Color::TRANSPARENT),
        );
        let pixmap = rasterize(&doc.into_scene());
        for (_, _, c) in pixmap.pixels() {
            assert_eq!(c, Color::TRANSPARENT);
        }
    }

    #[test]
    fn later_shape_composites_over_earlier_one() {
        // P5, the common case: fully opaque top shape wins outright.
        let mut doc = Document::new(2, 2);
        doc.fill(
            &square_path(0.0, 0.0, 2.0, 2.0),
            Paint::Solid(Color::new(1.0, 0.0, 0.0, 1.0)),
        );
        doc.fill(
            &square_path(0.0, 0.0, 2.0, 2.0),
            Paint::Solid(Color::new(0.0, 1.0, 0.0, 1.0)),
        );
        let pixmap = rasterize(&doc.into_scene());
        let c = pixmap.get_pixel(0, 0);
        assert!((c.g - 1.0).abs() < 1e-3);
        assert!(c.r.abs() < 1e-3);
    }
}
