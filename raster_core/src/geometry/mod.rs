// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
//! Module: geometry primitives (points, transforms, lines, paths)

mod line;
mod path;
mod point;

pub use line::{Line, Segment};
pub use path::{stroke_outline, Path, PathSeg, Subpath};
pub use point::{Point, Transform};
