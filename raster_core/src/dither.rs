// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
//! Module: dithered 8-bit encoder

use std::io::Write;

use crate::error::EncodeError;
use crate::pixmap::Pixmap;

/// xorshift128+, seeded deterministically so encoder output is
/// reproducible across runs.
struct Xorshift128Plus {
    s0: u64,
    s1: u64,
}

impl Xorshift128Plus {
    fn new(seed: u64) -> Xorshift128Plus {
        // splitmix64 to spread a single seed word across both state
        // words; xorshift128+ never recovers from an all-zero state.
        let mut z = seed;
        let mut next_word = || {
            z = z.wrapping_add(0x9E3779B97F4A7C15);
            let mut x = z;
            x = (x ^ (x >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
            x = (x ^ (x >> 27)).wrapping_mul(0x94D049BB133111EB);
            x ^ (x >> 31)
        };
        Xorshift128Plus {
            s0: next_word(),
            s1: next_word(),
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut s1 = self.s0;
        let s0 = self.s1;
        self.s0 = s0;
        s1 ^= s1 << 23;
        s1 ^= s1 >> 17;
        s1 ^= s0 ^ (s0 >> 26);
        self.s1 = s1;
        self.s1.wrapping_add(self.s0)
    }

    /// Uniform float in `[0, 1)`: `ldexp(word, -64)`.
    fn next_float(&mut self) -> f32 {
        (self.next_u64() as f64 * 2f64.powi(-64)) as f32
    }
}

/// Fixed seed so repeated encodes of the same pixmap are byte-identical.
const DEFAULT_SEED: u64 = 0x5EED_F00D_C0FF_EE42;

/// Unpremultiply every pixel and dither each channel to 8 bits, writing
/// raw `width*height*4` RGBA bytes to `out`. Row-major,
/// top-to-bottom; this writes bytes only, no container/header — the
/// image file format is a separate concern this crate does not own.
pub fn encode<W: Write>(pixmap: &Pixmap, out: &mut W) -> Result<(), EncodeError> {
    encode_with_seed(pixmap, out, DEFAULT_SEED)
}

/// As [`encode`], but with an explicit PRNG seed — used by tests that
/// need a second deterministic-but-different stream.
pub fn encode_with_seed<W: Write>(
    pixmap: &Pixmap,
    out: &mut W,
    seed: u64,
) -> Result<(), EncodeError> {
    let mut rng = Xorshift128Plus::new(seed);
    let mut row_buf = Vec::with_capacity(pixmap.width() * 4);
    for y in 0..pixmap.height() {
        row_buf.clear();
        for x in 0..pixmap.width() {
            let straight = pixmap.get_pixel(x, y).unpremultiply();
            for channel in [straight.r, straight.g, straight.b, straight.a] {
                row_buf.push(dither_channel(channel, &mut rng));
            }
        }
        out.write_all(&row_buf)?;
    }
    Ok(())
}

/// `clamp(channel*255 + u, 0, 255)` rounded to the nearest byte, `u` a
/// fresh uniform `[0,1)` draw per channel.
fn dither_channel(channel: f32, rng: &mut Xorshift128Plus) -> u8 {
    let u = rng.next_float();
    (channel * 255.0 + u).clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixmap::Color;

    #[test]
    fn same_seed_is_byte_identical() {
        let mut pm = Pixmap::new(3, 3);
        pm.add_pixel(1, 1, Color::new(0.4, 0.5, 0.6, 0.8).premultiply());
        let mut a = Vec::new();
        let mut b = Vec::new();
        encode(&pm, &mut a).unwrap();
        encode(&pm, &mut b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_usually_differ() {
        let mut pm = Pixmap::new(4, 4);
        pm.add_pixel(0, 0, Color::new(0.5, 0.5, 0.5, 1.0).premultiply());
        let mut a = Vec::new();
        let mut b = Vec::new();
        encode_with_seed(&pm, &mut a, 1).unwrap();
        encode_with_seed(&pm, &mut b, 2).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn transparent_pixel_encodes_to_zero() {
        let pm = Pixmap::new(1, 1);
        let mut out = Vec::new();
        encode(&pm, &mut out).unwrap();
        assert_eq!(out, vec![0, 0, 0, 0]);
    }

    #[test]
    fn output_length_matches_dimensions() {
        let pm = Pixmap::new(5, 2);
        let mut out = Vec::new();
        encode(&pm, &mut out).unwrap();
        assert_eq!(out.len(), 5 * 2 * 4);
    }

    #[test]
    fn opaque_white_rounds_near_255() {
        let mut pm = Pixmap::new(1, 1);
        pm.add_pixel(0, 0, Color::new(1.0, 1.0, 1.0, 1.0));
        let mut out = Vec::new();
        encode(&pm, &mut out).unwrap();
        for &b in &out {
            assert!(b >= 254);
        }
    }
}
