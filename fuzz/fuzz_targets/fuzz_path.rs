// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
#![no_main]
use libfuzzer_sys::fuzz_target;
use raster_core::geometry::{Path, Point};

/// Decode a byte stream into a bounded sequence of path commands and
/// flatten it. The flattener must terminate and never panic on any
/// input, including NaN-producing float bit patterns and zero-length
/// chords (the recursion depth cap is the only thing standing between
/// a pathological input and an infinite subdivision).
fuzz_target!(|data: &[u8]| {
    let mut path = Path::new();
    let mut chunks = data.chunks_exact(9);
    let mut started = false;

    for chunk in chunks.by_ref() {
        let tag = chunk[0] % 4;
        let x = f32::from_le_bits(u32::from_le_bytes(chunk[1..5].try_into().unwrap()));
        let y = f32::from_le_bits(u32::from_le_bytes(chunk[5..9].try_into().unwrap()));
        let p = Point::new(x, y);
        match tag {
            0 => {
                path.move_to(p);
                started = true;
            }
            1 if started => path.line_to(p),
            2 if started => path.cubic_to(p, p, p),
            _ if started => {
                path.close();
                started = false;
            }
            _ => {}
        }
        if path.segments.len() > 256 {
            break;
        }
    }

    let subpaths = path.flatten(1.0 / 256.0);
    let total: usize = subpaths.iter().map(|s| s.points.len()).sum();
    assert!(total < 1_000_000);
});
