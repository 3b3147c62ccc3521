// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
use proptest::prelude::*;
use raster_core::geometry::{Path, PathSeg, Point, Segment};
use raster_core::paint::Paint;
use raster_core::pixmap::Color;
use raster_core::scene::{Scene, Shape};


fn square_edges(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<(Segment, i8)> {
    let pts = [
        Point::new(x0, y0),
        Point::new(x1, y0),
        Point::new(x1, y1),
        Point::new(x0, y1),
    ];
    let mut edges = Vec::new();
    for i in 0..4 {
        let a = pts[i];
        let b = pts[(i + 1) % 4];
        if let Some(seg) = Segment::new(a, b) {
            let direction = if a.y < b.y { 1 } else { -1 };
            edges.push((seg, direction));
        }
    }
    edges
}

proptest! {
    /// P1: a single opaque shape covering the whole canvas sums to
    /// `width*height*alpha`.
    #[test]
    fn conservation_of_area(w in 1u32..12, h in 1u32..12, a in 0.1f32..1.0) {
        let mut scene = Scene::new(w, h);
        scene.shapes.push(Shape {
            edges: square_edges(0.0, 0.0, w as f32, h as f32),
            paint: Paint::Solid(Color::new(1.0, 1.0, 1.0, a)),
        });
        let pixmap = raster_core::render(&scene);
        let total: f32 = pixmap.pixels().map(|(_, _, c)| c.a).sum();
        let expect = (w * h) as f32 * a;
        prop_assert!((total - expect).abs() < 0.1 * (w * h) as f32 + 0.1);
    }

    /// P2: coverage never goes negative or past full.
    #[test]
    fn no_negative_or_overflowing_coverage(w in 2u32..10, h in 2u32..10) {
        let mut scene = Scene::new(w, h);
        scene.shapes.push(Shape {
            edges: square_edges(0.3, 0.3, w as f32 - 0.3, h as f32 - 0.3),
            paint: Paint::Solid(Color::new(1.0, 0.0, 0.0, 1.0)),
        });
        let pixmap = raster_core::render(&scene);
        for (_, _, c) in pixmap.pixels() {
            prop_assert!(c.a >= -1e-4 && c.a <= 1.0 + 1e-4);
        }
    }

    /// P6: adding a pair of opposite-direction edges coincident with an
    /// existing one (net winding change zero) must not move any pixel.
    #[test]
    fn redundant_coincident_edges_are_idempotent(w in 2u32..8, h in 2u32..8) {
        let mut scene_a = Scene::new(w, h);
        scene_a.shapes.push(Shape {
            edges: square_edges(0.5, 0.5, w as f32 - 0.5, h as f32 - 0.5),
            paint: Paint::Solid(Color::new(0.0, 1.0, 0.0, 1.0)),
        });

        let mut scene_b = scene_a.clone();
        let dup = scene_b.shapes[0].edges[0];
        scene_b.shapes[0].edges.push(dup);
        scene_b.shapes[0].edges.push((dup.0, -dup.1));

        let pa = raster_core::render(&scene_a);
        let pb = raster_core::render(&scene_b);
        for ((_, _, ca), (_, _, cb)) in pa.pixels().zip(pb.pixels()) {
            prop_assert!((ca.a - cb.a).abs() < 1e-4);
        }
    }

    /// The flattener must terminate within a bounded vertex count for
    /// any path built from a short, bounded command sequence.
    #[test]
    fn path_flatten_is_bounded(cmds in proptest::collection::vec(path_seg_strategy(), 1..8)) {
        let mut path = Path::new();
        let mut started = false;
        for seg in &cmds {
            match seg.clone() {
                PathSeg::MoveTo(p) => {
                    path.move_to(p);
                    started = true;
                }
                PathSeg::LineTo(p) => if started { path.line_to(p); },
                PathSeg::CubicTo(c1, c2, p) => if started { path.cubic_to(c1, c2, p); },
                PathSeg::QuadTo(c, p) => if started { path.quad_to(c, p); },
                PathSeg::ArcTo { .. } => {}
                PathSeg::Close => if started { path.close(); started = false; },
            }
        }
        let subpaths = path.flatten(1.0);
        let total_points: usize = subpaths.iter().map(|s| s.points.len()).sum();
        prop_assert!(total_points <= 4096);
    }
}

fn path_seg_strategy() -> impl Strategy<Value = PathSeg> {
    prop_oneof![
        testutil::point_strategy().prop_map(PathSeg::MoveTo),
        testutil::point_strategy().prop_map(PathSeg::LineTo),
        (
            testutil::point_strategy(),
            testutil::point_strategy(),
            testutil::point_strategy()
        )
            .prop_map(|(c1, c2, p)| PathSeg::CubicTo(c1, c2, p)),
        Just(PathSeg::Close),
    ]
}
