//! Image blitting into the packed framebuffer.
//!
//! Images use the framebuffer's own packing: column-major, `ceil(height / 4)`
//! bytes per column, pixel row `r` of a column in bit `r % 4` of byte `r / 4`.
//! Only the low nibble of each image byte is used.
//!
//! When the image's top edge is not on a cell boundary every source nibble
//! straddles two cells. The bits that spill past the current cell are kept as
//! a carry and merged into the next cell; after the last source nibble the
//! carry is flushed into the cell below the image.

use super::FrameBuffer;
use super::ROWS_PER_CELL;
use super::ROW_MASK;

/// Bits that did not fit into the cell just written, and which of them belong
/// to the image.
#[derive(Clone, Copy, Default)]
struct Carry {
    bits: u8,
    mask: u8,
}

/// Mask of the first `rows` rows of a nibble.
const fn leading_rows(rows: usize) -> u8 {
    if rows >= ROWS_PER_CELL {
        ROW_MASK
    } else {
        (1 << rows) - 1
    }
}

impl<const COLS: usize, const ROWS: usize, const SIZE: usize> FrameBuffer<COLS, ROWS, SIZE> {
    /// Copy a `width` x `height` image with its top left corner at `(x, y)`.
    ///
    /// `offset` is the index of the image's first byte in `image`, which lets
    /// several images (e.g. font glyphs) share one table. Parts of the image
    /// outside the display are clipped, pixels of the framebuffer outside the
    /// image are left untouched. Every cell the image covers is marked dirty.
    ///
    /// Bytes missing from `image` read as blank.
    pub fn draw_image(
        &mut self,
        image: &[u8],
        width: usize,
        height: usize,
        x: i32,
        y: i32,
        offset: usize,
    ) {
        if width == 0 || height == 0 {
            return;
        }
        let left = i64::from(x);
        let top = i64::from(y);
        let right = left.saturating_add(i64::try_from(width).unwrap_or(i64::MAX));
        let bottom = top.saturating_add(i64::try_from(height).unwrap_or(i64::MAX));
        if bottom <= 0 || top >= ROWS as i64 || right <= 0 || left >= COLS as i64 {
            return;
        }

        let words = height.div_ceil(ROWS_PER_CELL);
        let shift = y.rem_euclid(ROWS_PER_CELL as i32) as u32;
        let first_word = i64::from(y.div_euclid(ROWS_PER_CELL as i32));
        // an unaligned image touches one more cell per column than it has words
        let steps = words + usize::from(shift != 0);

        // first image column on the display, left is within (-width, COLS)
        let first = usize::try_from(-left).unwrap_or(0);
        for i in first..width {
            let column = (left + i as i64) as usize;
            if column >= COLS {
                break;
            }
            let source = words.saturating_mul(i).saturating_add(offset);

            let mut carry = Carry::default();
            for k in 0..steps {
                let (bits, mask) = if k < words {
                    let mask = leading_rows(height - k * ROWS_PER_CELL);
                    let byte = image
                        .get(source.saturating_add(k))
                        .copied()
                        .unwrap_or(0);
                    (byte & mask, mask)
                } else {
                    (0, 0)
                };

                let wide_bits = u16::from(bits) << shift;
                let wide_mask = u16::from(mask) << shift;
                let cell_bits = (wide_bits as u8 & ROW_MASK) | carry.bits;
                let cell_mask = (wide_mask as u8 & ROW_MASK) | carry.mask;
                carry = Carry {
                    bits: (wide_bits >> ROWS_PER_CELL) as u8,
                    mask: (wide_mask >> ROWS_PER_CELL) as u8,
                };

                let word = first_word + k as i64;
                if cell_mask == 0 || word < 0 || word >= Self::STRIDE as i64 {
                    continue;
                }
                self.write_cell(column * Self::STRIDE + word as usize, cell_mask, cell_bits);
            }
        }
    }
}
