// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
//! Renders a small hand-built scene — a gradient-filled, stroked square
//! overlapping a translated circle-ish octagon — and writes the
//! dithered 8-bit RGBA bytes to a file.
//!
//! This binary does not parse a scene description file: the external
//! parser that produces a `Scene` is outside this crate's scope (spec
//! §6 "Scene input"). It exists to exercise the public render/dither
//! path end to end against something other than a unit test.

use std::env;
use std::fs::File;
use std::process::ExitCode;

use raster_core::geometry::{Path, Point, Transform};
use raster_core::paint::{GradientStop, LinearGradient, Paint, PaintServer};
use raster_core::pixmap::Color;
use raster_core::scene::{Document, Style};

fn build_demo_scene(width: u32, height: u32) -> raster_core::Scene {
    let mut doc = Document::new(width, height);

    let mut square = Path::new();
    square.move_to(Point::new(20.0, 20.0));
    square.line_to(Point::new(180.0, 20.0));
    square.line_to(Point::new(180.0, 180.0));
    square.line_to(Point::new(20.0, 180.0));
    square.close();
    let style = Style {
        fill: Some(PaintServer::Linear(LinearGradient {
            start: Point::new(20.0, 0.0),
            end: Point::new(180.0, 0.0),
            stops: vec![
                GradientStop { pos: 0.0, color: Color::new(0.1, 0.3, 0.9, 1.0) },
                GradientStop { pos: 1.0, color: Color::new(0.9, 0.2, 0.3, 1.0) },
            ],
        })),
        fill_opacity: 1.0,
        stroke: Some(PaintServer::Solid(Color::new(0.0, 0.0, 0.0, 1.0))),
        stroke_opacity: 1.0,
        stroke_width: 3.0,
    };
    doc.draw(&square, &style, &Transform::identity());

    let mut octagon = Path::new();
    let center = Point::new(130.0, 130.0);
    let radius = 55.0;
    for i in 0..8 {
        let theta = std::f32::consts::PI * 2.0 * i as f32 / 8.0;
        let p = Point::new(center.x + radius * theta.cos(), center.y + radius * theta.sin());
        if i == 0 {
            octagon.move_to(p);
        } else {
            octagon.line_to(p);
        }
    }
    octagon.close();
    doc.fill(&octagon, Paint::Solid(Color::new(1.0, 1.0, 1.0, 0.6)));

    doc.into_scene()
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let Some(output_path) = args.get(1) else {
        eprintln!("usage: raster_demos <output-path>");
        return ExitCode::FAILURE;
    };

    let scene = build_demo_scene(200, 200);
    let pixmap = raster_core::render(&scene);

    let mut file = match File::create(output_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("failed to create {output_path}: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = raster_core::dither::encode(&pixmap, &mut file) {
        eprintln!("failed to encode output: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
