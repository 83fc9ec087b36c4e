// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Qualitative community palette.

/// RGBA color with 8-bit components.
pub type ColorRgba8 = [u8; 4];

const fn rgb(hex: u32) -> ColorRgba8 {
    let [_, r, g, b] = hex.to_be_bytes();
    [r, g, b, 0xff]
}

/// The 20-colour categorical palette, paired dark/light hues.
pub const CATEGORY20: [ColorRgba8; 20] = [
    rgb(0x1f77b4),
    rgb(0xaec7e8),
    rgb(0xff7f0e),
    rgb(0xffbb78),
    rgb(0x2ca02c),
    rgb(0x98df8a),
    rgb(0xd62728),
    rgb(0xff9896),
    rgb(0x9467bd),
    rgb(0xc5b0d5),
    rgb(0x8c564b),
    rgb(0xc49c94),
    rgb(0xe377c2),
    rgb(0xf7b6d2),
    rgb(0x7f7f7f),
    rgb(0xc7c7c7),
    rgb(0xbcbd22),
    rgb(0xdbdb8d),
    rgb(0x17becf),
    rgb(0x9edae5),
];

/// A non-empty prefix of [`CATEGORY20`]; community ids wrap around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    len: usize,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            len: CATEGORY20.len(),
        }
    }
}

impl Palette {
    /// First `size` colours, clamped to `1..=20`.
    pub fn category20(size: usize) -> Self {
        Self {
            len: size.clamp(1, CATEGORY20.len()),
        }
    }

    /// Number of distinct colours, at least 1.
    pub fn size(&self) -> usize {
        self.len
    }

    /// Colour of `community`, reusing the palette modulo its length.
    pub fn color_for(&self, community: usize) -> ColorRgba8 {
        CATEGORY20[community % self.len]
    }
}
