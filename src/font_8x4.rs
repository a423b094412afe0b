//! 8 pixel high proportional font covering `' '` to `'_'`.
//!
//! Each glyph takes [`GLYPH_STEP`] bytes: up to five columns of two nibbles,
//! rows 0-3 then rows 4-7. Lower case letters use the upper case glyphs.

use crate::text::Font;

/// Bytes reserved per glyph in [`GLYPHS`].
pub const GLYPH_STEP: usize = 10;
/// Glyph height in pixels.
pub const HEIGHT: u8 = 8;

#[rustfmt::skip]
pub static GLYPHS: [u8; 64 * GLYPH_STEP] = [
    0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000,  // space
    0b0111, 0b0001, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000,  // !
    0b0011, 0b0000, 0b0000, 0b0000, 0b0011, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000,  // "
    0b1010, 0b0000, 0b1111, 0b0001, 0b1010, 0b0000, 0b1111, 0b0001, 0b1010, 0b0000,  // #
    0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000,  // $
    0b0011, 0b0001, 0b1011, 0b0000, 0b0100, 0b0000, 0b1010, 0b0001, 0b1001, 0b0001,  // %
    0b1010, 0b0000, 0b0101, 0b0001, 0b1001, 0b0001, 0b1010, 0b0001, 0b0000, 0b0000,  // &
    0b0011, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000,  // '
    0b1110, 0b0000, 0b0001, 0b0001, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000,  // (
    0b0001, 0b0001, 0b1110, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000,  // )
    0b0101, 0b0000, 0b0010, 0b0000, 0b0101, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000,  // *
    0b0100, 0b0000, 0b0100, 0b0000, 0b1111, 0b0001, 0b0100, 0b0000, 0b0100, 0b0000,  // +
    0b0000, 0b0001, 0b1000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000,  // ,
    0b0100, 0b0000, 0b0100, 0b0000, 0b0100, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000,  // -
    0b0000, 0b0001, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000,  // .
    0b0000, 0b0001, 0b1100, 0b0000, 0b0110, 0b0000, 0b0001, 0b0000, 0b0000, 0b0000,  // /
    0b1110, 0b0111, 0b0001, 0b1000, 0b1110, 0b0111, 0b0000, 0b0000, 0b0000, 0b0000,  // 0
    0b0010, 0b1000, 0b1111, 0b1111, 0b0000, 0b1000, 0b0000, 0b0000, 0b0000, 0b0000,  // 1
    0b0010, 0b1110, 0b0001, 0b1001, 0b1110, 0b1000, 0b0000, 0b0000, 0b0000, 0b0000,  // 2
    0b0001, 0b1001, 0b0001, 0b1001, 0b1111, 0b1111, 0b0000, 0b0000, 0b0000, 0b0000,  // 3
    0b1111, 0b0000, 0b1000, 0b0000, 0b1111, 0b1111, 0b0000, 0b0000, 0b0000, 0b0000,  // 4
    0b1111, 0b1000, 0b1001, 0b1000, 0b1001, 0b1111, 0b0000, 0b0000, 0b0000, 0b0000,  // 5
    0b1111, 0b1111, 0b1001, 0b1000, 0b1001, 0b1111, 0b0000, 0b0000, 0b0000, 0b0000,  // 6
    0b0001, 0b1111, 0b1001, 0b0000, 0b0111, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000,  // 7
    0b1111, 0b1111, 0b1001, 0b1000, 0b1111, 0b1111, 0b0000, 0b0000, 0b0000, 0b0000,  // 8
    0b1111, 0b1000, 0b1001, 0b1000, 0b1111, 0b1111, 0b0000, 0b0000, 0b0000, 0b0000,  // 9
    0b0100, 0b0010, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000,  // :
    0b0000, 0b0001, 0b1010, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000,  // ;
    0b0100, 0b0000, 0b1010, 0b0000, 0b0001, 0b0001, 0b0000, 0b0000, 0b0000, 0b0000,  // <
    0b1010, 0b0000, 0b1010, 0b0000, 0b1010, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000,  // =
    0b0001, 0b0001, 0b1010, 0b0000, 0b0100, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000,  // >
    0b0010, 0b0000, 0b0001, 0b0000, 0b1001, 0b0001, 0b0110, 0b0000, 0b0000, 0b0000,  // ?
    0b1110, 0b0000, 0b0001, 0b0000, 0b1101, 0b0000, 0b0101, 0b0001, 0b1111, 0b0000,  // @
    0b1111, 0b1111, 0b1001, 0b0000, 0b1001, 0b0000, 0b1111, 0b1111, 0b0000, 0b0000,  // A
    0b1111, 0b1111, 0b1001, 0b1000, 0b1001, 0b1000, 0b0111, 0b1111, 0b0000, 0b0000,  // B
    0b1111, 0b1111, 0b0001, 0b1000, 0b0001, 0b1000, 0b0011, 0b1100, 0b0000, 0b0000,  // C
    0b1111, 0b1111, 0b0001, 0b1000, 0b0001, 0b1000, 0b1110, 0b0111, 0b0000, 0b0000,  // D
    0b1111, 0b1111, 0b1001, 0b1000, 0b1001, 0b1000, 0b0001, 0b1000, 0b0000, 0b0000,  // E
    0b1111, 0b1111, 0b1001, 0b0000, 0b1001, 0b0000, 0b0001, 0b0000, 0b0000, 0b0000,  // F
    0b1111, 0b1111, 0b0001, 0b1000, 0b1001, 0b1000, 0b1001, 0b1111, 0b0000, 0b0000,  // G
    0b1111, 0b1111, 0b1000, 0b0000, 0b1000, 0b0000, 0b1111, 0b1111, 0b0000, 0b0000,  // H
    0b0001, 0b1000, 0b1111, 0b1111, 0b0001, 0b1000, 0b0000, 0b0000, 0b0000, 0b0000,  // I
    0b0001, 0b1100, 0b0001, 0b1000, 0b0001, 0b1000, 0b1111, 0b1111, 0b0000, 0b0000,  // J
    0b1111, 0b1111, 0b1000, 0b0000, 0b0100, 0b0001, 0b0011, 0b1110, 0b0000, 0b0000,  // K
    0b1111, 0b1111, 0b0000, 0b1000, 0b0000, 0b1000, 0b0000, 0b1000, 0b0000, 0b0000,  // L
    0b1111, 0b1111, 0b0110, 0b0000, 0b0110, 0b0000, 0b1111, 0b1111, 0b0000, 0b0000,  // M
    0b1111, 0b1111, 0b1100, 0b0000, 0b0000, 0b0011, 0b1111, 0b1111, 0b0000, 0b0000,  // N
    0b1111, 0b1111, 0b0001, 0b1000, 0b0001, 0b1000, 0b1111, 0b1111, 0b0000, 0b0000,  // O
    0b1111, 0b1111, 0b1001, 0b0000, 0b1001, 0b0000, 0b1111, 0b0000, 0b0000, 0b0000,  // P
    0b1111, 0b1111, 0b0001, 0b1010, 0b0001, 0b1100, 0b1111, 0b1111, 0b0000, 0b0000,  // Q
    0b1111, 0b1111, 0b1001, 0b0000, 0b1001, 0b0001, 0b1111, 0b1110, 0b0000, 0b0000,  // R
    0b1111, 0b1000, 0b1001, 0b1000, 0b1001, 0b1000, 0b1001, 0b1111, 0b0000, 0b0000,  // S
    0b0001, 0b0000, 0b1111, 0b1111, 0b0001, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000,  // T
    0b1111, 0b1111, 0b0000, 0b1000, 0b0000, 0b1000, 0b1111, 0b1111, 0b0000, 0b0000,  // U
    0b1111, 0b0011, 0b0000, 0b1110, 0b0000, 0b1110, 0b1111, 0b0011, 0b0000, 0b0000,  // V
    0b1111, 0b0111, 0b0000, 0b1111, 0b0000, 0b1110, 0b1111, 0b0111, 0b0000, 0b0000,  // W
    0b0111, 0b1110, 0b1100, 0b0011, 0b1100, 0b0011, 0b0111, 0b1110, 0b0000, 0b0000,  // X
    0b0111, 0b0000, 0b1000, 0b1111, 0b0111, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000,  // Y
    0b0001, 0b1100, 0b0001, 0b1011, 0b1101, 0b1000, 0b0011, 0b1000, 0b0000, 0b0000,  // Z
    0b1111, 0b0001, 0b0001, 0b0001, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000,  // [
    0b0001, 0b0000, 0b0110, 0b0000, 0b1100, 0b0000, 0b0000, 0b0001, 0b0000, 0b0000,  // \
    0b0001, 0b0001, 0b1111, 0b0001, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000,  // ]
    0b0010, 0b0000, 0b0001, 0b0000, 0b0010, 0b0000, 0b0000, 0b0000, 0b0000, 0b0000,  // ^
    0b0000, 0b0001, 0b0000, 0b0001, 0b0000, 0b0001, 0b0000, 0b0000, 0b0000, 0b0000,  // _
];

/// Width in columns of each glyph in [`GLYPHS`].
#[rustfmt::skip]
pub static WIDTHS: [u8; 64] = [
    1, 3, 3, 4, 4, 4, 4, 1,
    3, 3, 4, 4, 2, 4, 2, 4,
    4, 3, 4, 4, 4, 4, 4, 4,
    4, 4, 1, 2, 4, 4, 4, 4,
    4, 4, 4, 4, 4, 4, 4, 4,
    4, 3, 4, 4, 4, 4, 4, 4,
    4, 4, 4, 4, 4, 4, 4, 4,
    4, 4, 4, 3, 4, 3, 4, 5,
];

/// The 8x4 font with one blank column between glyphs.
pub static FONT_8X4: Font<'static> = Font {
    glyphs: &GLYPHS,
    widths: &WIDTHS,
    height: HEIGHT,
    glyph_step: GLYPH_STEP,
    gutter: 1,
};
