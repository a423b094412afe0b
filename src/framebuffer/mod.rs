//! Packed framebuffer mirroring the HT1632 display RAM.
//!
//! The HT1632 stores the display as 4-bit RAM nibbles, each holding four
//! vertically stacked pixels of one column. The framebuffer keeps one byte
//! per nibble: the low four bits are the pixels exactly as they go out on the
//! wire, bit 7 records that the nibble changed since it was last sent.
//!
//! # Memory layout
//! Cells are ordered column by column, `ROWS / 4` cells per column:
//!
//! ```text
//! address = x * (ROWS / 4) + y / 4
//! bit     = y % 4
//! ```
//!
//! This is the chip's own RAM order, so a run of changed cells maps onto one
//! burst with consecutive addresses.
//!
//! # Example
//! ```rust
//! use ht1632::compute_address_space;
//! use ht1632::FrameBuffer;
//!
//! const COLS: usize = 32;
//! const ROWS: usize = 8;
//! const SIZE: usize = compute_address_space(COLS, ROWS);
//!
//! let mut fb = FrameBuffer::<COLS, ROWS, SIZE>::new();
//! fb.set_pixel(3, 5, true);
//! assert_eq!(fb.get_pixel(3, 5), Some(true));
//! assert_eq!(fb.address(3, 5), Some(7));
//! ```

use core::convert::Infallible;

use bitfield::bitfield;
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::prelude::OriginDimensions;
use embedded_graphics::prelude::Size;
use embedded_graphics::Pixel;

use crate::Color;

pub mod blit;
pub mod store;

/// Mask of the pixel bits of a cell.
pub const ROW_MASK: u8 = 0b0000_1111;
/// Number of pixel rows stored in one cell.
pub const ROWS_PER_CELL: usize = 4;

bitfield! {
    /// One HT1632 RAM nibble plus bookkeeping.
    ///
    /// - Bit 7: dirty, the pixels changed since the cell was last rendered
    /// - Bits 6-4: reserved, always zero
    /// - Bits 3-0: pixel rows `y0 + 3` down to `y0`
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    #[repr(transparent)]
    pub struct Cell(u8);
    impl Debug;
    dirty, set_dirty: 7;
    pub rows, set_rows_raw: 3, 0;
}

#[cfg(feature = "defmt")]
impl defmt::Format for Cell {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Cell({=u8:#x})", self.0)
    }
}

impl Cell {
    /// A blank cell that still has to be sent to the chip.
    pub const fn blank() -> Self {
        Self(0x80)
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    pub fn row(&self, k: usize) -> bool {
        self.rows() & (1 << (k % ROWS_PER_CELL)) != 0
    }

    /// Set or clear pixel row `k` and mark the cell dirty.
    pub fn set_row(&mut self, k: usize, on: bool) {
        let bit = 1 << (k % ROWS_PER_CELL);
        let bits = if on { bit } else { 0 };
        self.write_masked(bit, bits);
    }

    /// Replace the rows selected by `mask` with the same rows of `bits` and
    /// mark the cell dirty, even if no pixel changed.
    pub fn write_masked(&mut self, mask: u8, bits: u8) {
        let mask = mask & ROW_MASK;
        let rows = (self.rows() & !mask) | (bits & mask);
        self.set_rows_raw(rows);
        self.set_dirty(true);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty()
    }

    pub fn clear_dirty(&mut self) {
        self.set_dirty(false);
    }
}

/// Packed framebuffer for one drawing target.
///
/// # Type Parameters
/// - `COLS`: display width in pixels
/// - `ROWS`: display height in pixels, a multiple of 4
/// - `SIZE`: number of cells, use [`crate::compute_address_space`]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FrameBuffer<const COLS: usize, const ROWS: usize, const SIZE: usize> {
    cells: [Cell; SIZE],
}

impl<const COLS: usize, const ROWS: usize, const SIZE: usize> Default
    for FrameBuffer<COLS, ROWS, SIZE>
{
    fn default() -> Self {
        Self::new()
    }
}

impl<const COLS: usize, const ROWS: usize, const SIZE: usize> FrameBuffer<COLS, ROWS, SIZE> {
    /// Cells per column.
    pub const STRIDE: usize = ROWS / ROWS_PER_CELL;

    /// Create a blank framebuffer with every cell marked dirty.
    pub const fn new() -> Self {
        Self {
            cells: [Cell::blank(); SIZE],
        }
    }

    /// Blank every pixel and mark every cell dirty.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::blank());
    }

    /// Cell address of pixel `(x, y)`, `None` outside the display.
    pub fn address(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= COLS || y >= ROWS {
            return None;
        }
        let address = x * Self::STRIDE + y / ROWS_PER_CELL;
        (address < SIZE).then_some(address)
    }

    /// Set a single pixel. Pixels outside the display are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        if let Some(address) = self.address(x, y) {
            self.cells[address].set_row(y as usize, on);
        }
    }

    /// Get a single pixel, `None` outside the display.
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<bool> {
        self.address(x, y)
            .map(|address| self.cells[address].row(y as usize))
    }

    pub fn cell(&self, address: usize) -> Option<Cell> {
        self.cells.get(address).copied()
    }

    pub fn cells(&self) -> &[Cell; SIZE] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell; SIZE] {
        &mut self.cells
    }

    /// Number of cells waiting to be rendered.
    pub fn dirty_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_dirty()).count()
    }

    /// Overwrite the cell at `address` (rows only) and mark it dirty.
    pub(crate) fn write_cell(&mut self, address: usize, mask: u8, bits: u8) {
        if let Some(cell) = self.cells.get_mut(address) {
            cell.write_masked(mask, bits);
        }
    }
}

impl<const COLS: usize, const ROWS: usize, const SIZE: usize> OriginDimensions
    for FrameBuffer<COLS, ROWS, SIZE>
{
    fn size(&self) -> Size {
        Size::new(COLS as u32, ROWS as u32)
    }
}

impl<const COLS: usize, const ROWS: usize, const SIZE: usize> DrawTarget
    for FrameBuffer<COLS, ROWS, SIZE>
{
    type Color = Color;

    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            self.set_pixel(p.x, p.y, c.is_on());
        }
        Ok(())
    }
}

impl<const COLS: usize, const ROWS: usize, const SIZE: usize> core::fmt::Debug
    for FrameBuffer<COLS, ROWS, SIZE>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("cols", &COLS)
            .field("rows", &ROWS)
            .field("size", &SIZE)
            .field("dirty", &self.dirty_count())
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl<const COLS: usize, const ROWS: usize, const SIZE: usize> defmt::Format
    for FrameBuffer<COLS, ROWS, SIZE>
{
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "FrameBuffer<{}, {}, {}>", COLS, ROWS, SIZE);
        defmt::write!(f, " dirty: {}", self.dirty_count());
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::format;

    use super::*;
    use embedded_graphics::pixelcolor::BinaryColor;
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::Line;
    use embedded_graphics::primitives::PrimitiveStyle;

    const COLS: usize = 32;
    const ROWS: usize = 16;
    const SIZE: usize = crate::compute_address_space(COLS, ROWS);

    type TestFrameBuffer = FrameBuffer<COLS, ROWS, SIZE>;

    fn rendered() -> TestFrameBuffer {
        let mut fb = TestFrameBuffer::new();
        for cell in fb.cells_mut().iter_mut() {
            cell.clear_dirty();
        }
        fb
    }

    #[test]
    fn test_cell_layout() {
        let mut cell = Cell::default();
        assert_eq!(cell.raw(), 0);
        cell.set_row(0, true);
        cell.set_row(3, true);
        assert_eq!(cell.rows(), 0b1001);
        assert!(cell.is_dirty());
        assert_eq!(cell.raw(), 0b1000_1001);

        cell.clear_dirty();
        assert_eq!(cell.raw(), 0b0000_1001);
        cell.set_row(0, false);
        assert_eq!(cell.raw(), 0b1000_1000);
        assert!(!cell.row(0));
        assert!(cell.row(3));
    }

    #[test]
    fn test_cell_write_masked_preserves_unmasked_rows() {
        let mut cell = Cell::default();
        cell.write_masked(ROW_MASK, 0b1111);
        cell.clear_dirty();
        cell.write_masked(0b0110, 0b0000);
        assert_eq!(cell.rows(), 0b1001);
        assert!(cell.is_dirty());
    }

    #[test]
    fn test_cell_write_marks_dirty_without_change() {
        let mut cell = Cell::default();
        cell.write_masked(0b0011, 0b0000);
        assert_eq!(cell.rows(), 0);
        assert!(cell.is_dirty());
    }

    #[test]
    fn test_cell_ignores_metadata_bits_in_input() {
        let mut cell = Cell::default();
        cell.write_masked(0xFF, 0xF5);
        assert_eq!(cell.raw(), 0b1000_0101);
    }

    #[test]
    fn test_new_is_blank_and_dirty() {
        let fb = TestFrameBuffer::new();
        assert_eq!(fb.dirty_count(), SIZE);
        assert!(fb.cells().iter().all(|cell| cell.rows() == 0));
    }

    #[test]
    fn test_address_formula() {
        let fb = TestFrameBuffer::new();
        assert_eq!(fb.address(0, 0), Some(0));
        assert_eq!(fb.address(0, 3), Some(0));
        assert_eq!(fb.address(0, 4), Some(1));
        assert_eq!(fb.address(1, 0), Some(4));
        assert_eq!(fb.address(31, 15), Some(127));
        assert_eq!(fb.address(32, 0), None);
        assert_eq!(fb.address(0, 16), None);
        assert_eq!(fb.address(-1, 0), None);
        assert_eq!(fb.address(0, -1), None);
    }

    #[test]
    fn test_set_pixel() {
        let mut fb = rendered();
        fb.set_pixel(2, 6, true);
        let cell = fb.cell(2 * 4 + 1).unwrap();
        assert_eq!(cell.rows(), 0b0100);
        assert!(cell.is_dirty());
        assert_eq!(fb.dirty_count(), 1);
        assert_eq!(fb.get_pixel(2, 6), Some(true));

        fb.set_pixel(2, 6, false);
        assert_eq!(fb.get_pixel(2, 6), Some(false));
    }

    #[test]
    fn test_set_pixel_out_of_bounds_is_ignored() {
        let mut fb = rendered();
        fb.set_pixel(-1, 0, true);
        fb.set_pixel(0, -1, true);
        fb.set_pixel(COLS as i32, 0, true);
        fb.set_pixel(0, ROWS as i32, true);
        fb.set_pixel(i32::MAX, i32::MAX, true);
        assert_eq!(fb.dirty_count(), 0);
        assert_eq!(fb.get_pixel(COLS as i32, 0), None);
    }

    #[test]
    fn test_clear() {
        let mut fb = rendered();
        fb.set_pixel(5, 5, true);
        fb.clear();
        assert_eq!(fb.get_pixel(5, 5), Some(false));
        assert_eq!(fb.dirty_count(), SIZE);
    }

    #[test]
    fn test_draw_target() {
        let mut fb = rendered();
        Line::new(Point::new(0, 0), Point::new(7, 0))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut fb)
            .unwrap();
        for x in 0..8 {
            assert_eq!(fb.get_pixel(x, 0), Some(true));
        }
        assert_eq!(fb.get_pixel(8, 0), Some(false));
        assert_eq!(fb.dirty_count(), 8);
        assert_eq!(fb.size(), Size::new(32, 16));
    }

    #[test]
    fn test_debug() {
        let fb = rendered();
        assert_eq!(
            format!("{fb:?}"),
            "FrameBuffer { cols: 32, rows: 16, size: 128, dirty: 0 }"
        );
    }
}
