//! Proportional bitmap text.
//!
//! A [`Font`] is a glyph table in the framebuffer's image packing plus a width
//! per glyph. Glyphs are indexed from `' '`, lower case letters fold onto the
//! upper case glyphs and characters outside the table are skipped.

use crate::framebuffer::FrameBuffer;

const FIRST_GLYPH: u32 = ' ' as u32;

/// A bitmap font.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Font<'a> {
    /// Glyph images, `glyph_step` bytes per glyph, see
    /// [`FrameBuffer::draw_image`] for the packing.
    pub glyphs: &'a [u8],
    /// Width in columns of each glyph. Its length is the number of glyphs.
    pub widths: &'a [u8],
    /// Height in pixels shared by all glyphs.
    pub height: u8,
    /// Bytes between the starts of consecutive glyphs.
    pub glyph_step: usize,
    /// Blank columns after each glyph.
    pub gutter: u8,
}

impl Font<'_> {
    /// Table index of `c`, or `None` if the font has no glyph for it.
    pub fn glyph_index(&self, c: char) -> Option<usize> {
        let code = u32::from(c.to_ascii_uppercase());
        let index = usize::try_from(code.checked_sub(FIRST_GLYPH)?).ok()?;
        (index < self.widths.len()).then_some(index)
    }

    fn advance(&self, index: usize) -> i64 {
        i64::from(self.widths[index]) + i64::from(self.gutter)
    }

    /// Width in pixels of `text`: the sum of glyph widths plus one gutter
    /// between neighbouring glyphs, so no trailing gutter is counted.
    ///
    /// Text without any glyph in the font is 0 wide rather than `-gutter`,
    /// which keeps the result usable as a pixel extent.
    pub fn text_width(&self, text: &str) -> i32 {
        let mut glyphs = 0usize;
        let total: i64 = text
            .chars()
            .filter_map(|c| self.glyph_index(c))
            .inspect(|_| glyphs += 1)
            .map(|index| self.advance(index))
            .sum();
        if glyphs == 0 {
            return 0;
        }
        let width = total - i64::from(self.gutter);
        i32::try_from(width).unwrap_or(i32::MAX)
    }
}

impl<const COLS: usize, const ROWS: usize, const SIZE: usize> FrameBuffer<COLS, ROWS, SIZE> {
    /// Draw `text` with its top left corner at `(x, y)`.
    ///
    /// Each glyph is followed by `font.gutter` cleared columns. Glyphs past the
    /// right edge end the call; glyphs wholly left of the display are skipped
    /// but still move the cursor.
    pub fn draw_text(&mut self, text: &str, x: i32, y: i32, font: &Font<'_>) {
        let height = i64::from(font.height);
        let top = i64::from(y);
        if top + height < 0 || top >= ROWS as i64 {
            return;
        }

        let mut cursor = i64::from(x);
        for c in text.chars() {
            let Some(index) = font.glyph_index(c) else {
                continue;
            };
            if cursor >= COLS as i64 {
                break;
            }

            let width = i64::from(font.widths[index]);
            let advance = font.advance(index);
            if cursor + advance >= 0 {
                // cursor is within (-advance, COLS) so it fits an i32
                self.draw_image(
                    font.glyphs,
                    usize::from(font.widths[index]),
                    usize::from(font.height),
                    cursor as i32,
                    y,
                    index.saturating_mul(font.glyph_step),
                );
                for column in 0..i64::from(font.gutter) {
                    // an empty image reads as blank
                    self.draw_image(
                        &[],
                        1,
                        usize::from(font.height),
                        (cursor + width + column) as i32,
                        y,
                        0,
                    );
                }
            }
            cursor += advance;
        }
    }
}
