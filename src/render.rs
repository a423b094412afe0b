//! Flushing dirty framebuffer cells to the chips.
//!
//! The HT1632 auto-increments its RAM address after every data nibble, so a
//! run of consecutive dirty cells on one chip costs one mode ID and one
//! address plus a nibble per cell. The render pass walks the framebuffer in
//! address order and keeps a burst open for as long as the next cell is dirty,
//! lives on the same chip and sits at the next chip RAM address.

use crate::framebuffer::FrameBuffer;
use crate::select::ChipMask;

/// Where a framebuffer cell lives in hardware.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Location {
    /// Chips that show the cell.
    pub chips: ChipMask,
    /// RAM address inside those chips.
    pub address: u8,
}

impl Location {
    pub const fn new(chips: ChipMask, address: u8) -> Self {
        Self { chips, address }
    }
}

/// The wire side of a render pass.
pub trait Link {
    type Error;

    /// Chips and chip RAM address holding framebuffer cell `address`.
    fn locate(&self, address: usize) -> Location;

    /// Select `chips` and start a RAM write at `address`.
    fn open(&mut self, chips: ChipMask, address: u8) -> Result<(), Self::Error>;

    /// Write one nibble at the chip's current address.
    fn write(&mut self, nibble: u8) -> Result<(), Self::Error>;

    /// End the RAM write and release the chips.
    fn close(&mut self) -> Result<(), Self::Error>;
}

/// What a render pass sent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderStats {
    /// Number of address selects.
    pub bursts: usize,
    /// Number of data nibbles.
    pub words: usize,
}

#[derive(Clone, Copy)]
enum Burst {
    Closed,
    Open { chips: ChipMask, next: u8 },
}

/// Send the dirty cells of `buffer`, or every cell if `force` is set, and
/// mark them clean.
///
/// On error the burst in progress is abandoned; cells already sent stay clean.
pub fn render<const COLS: usize, const ROWS: usize, const SIZE: usize, L: Link>(
    buffer: &mut FrameBuffer<COLS, ROWS, SIZE>,
    force: bool,
    link: &mut L,
) -> Result<RenderStats, L::Error> {
    let mut stats = RenderStats::default();
    let mut burst = Burst::Closed;

    for (address, cell) in buffer.cells_mut().iter_mut().enumerate() {
        if !force && !cell.is_dirty() {
            if let Burst::Open { .. } = burst {
                link.close()?;
                burst = Burst::Closed;
            }
            continue;
        }

        let location = link.locate(address);
        let continues = match burst {
            Burst::Open { chips, next } => chips == location.chips && next == location.address,
            Burst::Closed => false,
        };
        if !continues {
            if let Burst::Open { .. } = burst {
                link.close()?;
            }
            link.open(location.chips, location.address)?;
            stats.bursts += 1;
        }

        link.write(cell.rows())?;
        cell.clear_dirty();
        stats.words += 1;
        burst = Burst::Open {
            chips: location.chips,
            next: location.address.wrapping_add(1),
        };
    }

    if let Burst::Open { .. } = burst {
        link.close()?;
    }
    Ok(stats)
}
