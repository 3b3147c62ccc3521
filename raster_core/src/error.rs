// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
//! Module: error kinds surfaced by the core
//! Mirrors: the general shape of hand-rolled error enums across the
//! pack (manual `Display`+`Error` impls, not `thiserror`).

use std::fmt;

/// Soft-fail conditions the rasterizer resolves to a value instead of
/// propagating. Exposed so callers can log/assert on them via
/// [`crate::render::Diagnostics`] rather than scraping log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    /// `width` or `height` of the scene is zero; render produces an
    /// empty pixmap.
    DegenerateScene,
    /// A gradient's baked user transform was non-invertible; the
    /// paint evaluates to transparent-black.
    SingularTransform,
    /// A gradient had zero stops; it evaluates to transparent-black.
    EmptyGradient,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::DegenerateScene => {
                write!(f, "scene has non-positive width or height")
            }
            RenderError::SingularTransform => {
                write!(f, "paint transform is not invertible")
            }
            RenderError::EmptyGradient => write!(f, "gradient has no stops"),
        }
    }
}

impl std::error::Error for RenderError {}

/// Error surfaced while writing dithered pixel bytes to a sink;
/// unrecoverable I/O during encode is surfaced to the caller as-is.
#[derive(Debug)]
pub struct EncodeError(pub std::io::Error);

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dither encode I/O error: {}", self.0)
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<std::io::Error> for EncodeError {
    fn from(e: std::io::Error) -> Self {
        EncodeError(e)
    }
}
