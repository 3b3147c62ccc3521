// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
//! Module: paint model — solid/gradient color evaluation
//! Mirrors: rlottie_core/src/types.rs's Paint enum and renderer::cpu's
//! gradient-sampling call sites.

mod gradient;

pub use gradient::{GradientStop, LinearGradient, RadialGradient};

use std::sync::atomic::{AtomicU32, Ordering};

use crate::geometry::{Point, Transform};
use crate::pixmap::Color;

/// Process-wide tally of [`crate::error::RenderError::SingularTransform`]
/// fallbacks, read by [`crate::render::render_with_diagnostics`] as a
/// before/after delta. Rendering is single-threaded and synchronous,
/// so a plain atomic is sufficient bookkeeping without threading a
/// counter through the pure `Paint::eval` call chain.
pub(crate) static SINGULAR_TRANSFORM_COUNT: AtomicU32 = AtomicU32::new(0);
pub(crate) static EMPTY_GRADIENT_COUNT: AtomicU32 = AtomicU32::new(0);

pub(crate) fn diagnostic_counts() -> (u32, u32) {
    (
        SINGULAR_TRANSFORM_COUNT.load(Ordering::Relaxed),
        EMPTY_GRADIENT_COUNT.load(Ordering::Relaxed),
    )
}

/// A paint evaluable at any point in the space it was defined for.
/// Tagged-variant form rather than a trait object, since the full set
/// of cases is closed and small.
#[derive(Debug, Clone)]
pub enum Paint {
    /// Constant color, ignores the evaluation point.
    Solid(Color),
    /// Linear gradient, evaluated in the space the gradient's
    /// `start`/`end` points are defined in.
    Linear(LinearGradient),
    /// Radial (conical, focal-offset) gradient.
    Radial(RadialGradient),
    /// Scales a wrapped paint's straight alpha by `opacity`, leaving
    /// its RGB unchanged.
    Opacity(Box<Paint>, f32),
    /// Evaluates a wrapped paint at `transform.apply(p)` — used to
    /// bake a gradient's defining user-space into the paint so the
    /// rasterizer, which only ever knows device-space points, still
    /// samples gradients correctly.
    Transformed(Box<Paint>, Transform),
}

impl Paint {
    /// Evaluate the paint at a point. Pure and deterministic: no paint
    /// variant carries hidden state.
    pub fn eval(&self, p: Point) -> Color {
        match self {
            Paint::Solid(c) => *c,
            Paint::Linear(g) => g.eval(p),
            Paint::Radial(g) => g.eval(p),
            Paint::Opacity(inner, opacity) => {
                let c = inner.eval(p);
                Color::new(c.r, c.g, c.b, c.a * *opacity)
            }
            Paint::Transformed(inner, transform) => inner.eval(transform.apply(p)),
        }
    }
}

/// A factory that, given a shape's current user transform, produces a
/// concrete [`Paint`]. Solid colors ignore the transform; gradients
/// bake its inverse in so they evaluate in their defining user space
/// regardless of how the shape itself was transformed.
#[derive(Debug, Clone)]
pub enum PaintServer {
    Solid(Color),
    Linear(LinearGradient),
    Radial(RadialGradient),
}

impl PaintServer {
    /// Wrap `self` in an opacity scale, producing a [`Paint`].
    pub fn resolve(&self, user_transform: &Transform, opacity: f32) -> Paint {
        let base = match self {
            PaintServer::Solid(c) => Paint::Solid(*c),
            PaintServer::Linear(g) => wrap_in_inverse(Paint::Linear(g.clone()), user_transform),
            PaintServer::Radial(g) => wrap_in_inverse(Paint::Radial(g.clone()), user_transform),
        };
        if opacity >= 1.0 {
            base
        } else {
            Paint::Opacity(Box::new(base), opacity)
        }
    }
}

/// Wrap a gradient paint in the inverse of `user_transform`. A
/// singular transform resolves to transparent-black rather than
/// propagating an error.
fn wrap_in_inverse(paint: Paint, user_transform: &Transform) -> Paint {
    match user_transform.invert() {
        Some(inv) => Paint::Transformed(Box::new(paint), inv),
        None => {
            log::warn!("paint transform is not invertible, painting transparent");
            SINGULAR_TRANSFORM_COUNT.fetch_add(1, Ordering::Relaxed);
            Paint::Solid(Color::TRANSPARENT)
        }
    }
}
