// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
//! Module: analytic coverage rasterizer core
//! Renders a [`scene::Scene`] of filled/stroked Bézier paths into a
//! premultiplied-alpha [`pixmap::Pixmap`] using an exact sweep-line
//! area rasterizer (no supersampling).

pub mod dither;
pub mod error;
pub mod geometry;
pub mod paint;
pub mod pixmap;
pub mod raster;
pub mod render;
pub mod scene;

pub use error::RenderError;
pub use pixmap::{Color, Pixmap};
pub use render::{render, render_with_diagnostics, Diagnostics};
pub use scene::{Document, Scene, Shape};
