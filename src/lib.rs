//! Driver for HT1632 / HT1632C dot-matrix LED display controllers.
//!
//! The HT1632 is programmed over a three wire, bit-serial bus: an active-low
//! chip select, a write strobe (`WR`) and a data line. The chip holds the
//! display in RAM nibbles, each covering four vertically stacked pixels, and
//! auto-increments its RAM address after every data nibble it receives.
//!
//! This crate keeps one packed framebuffer per drawing target in the MCU,
//! tracks which nibbles changed since the last transfer and, on
//! [`Ht1632::render`], sends only those nibbles, grouping runs of consecutive
//! addresses into a single burst.
//!
//! # Board variants
//! - [`DirectSelect`]: one chip-select line per chip. Every chip is its own
//!   drawing target (e.g. Sure Electronics 32x16 monochrome boards chained
//!   side by side).
//! - [`ShiftSelect`]: chip selects driven through a shift register (e.g. the
//!   Sure Electronics 32x16 bicolor board). The drawing targets are the
//!   colour planes, spread over all chips.
//!
//! Both variants reserve the last framebuffer slot as an off-screen buffer
//! used by [`Transition`]s.
//!
//! # Example
//! ```rust,no_run
//! # use embedded_hal::delay::DelayNs;
//! # use embedded_hal::digital::OutputPin;
//! # fn demo<P: OutputPin, D: DelayNs>(cs: P, wr: P, data: P, delay: D) -> Result<(), ht1632::Ht1632Error> {
//! use ht1632::{compute_address_space, Config, DirectSelect, Ht1632, FONT_8X4};
//!
//! const COLS: usize = 32;
//! const ROWS: usize = 16;
//! const SIZE: usize = compute_address_space(COLS, ROWS);
//!
//! let topology = DirectSelect::new([cs])?;
//! let mut display =
//!     Ht1632::<_, _, _, _, COLS, ROWS, SIZE, 2>::new(topology, wr, data, delay, Config::default())?;
//! display.init()?;
//!
//! display.draw_text("Hello", 0, 4, &FONT_8X4);
//! display.set_pixel(31, 15, true);
//! display.render()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//! - `defmt`: log through `defmt` and implement `defmt::Format` for the public
//!   types.
//! - `log`: log through the `log` facade.
#![no_std]

#[macro_use]
mod fmt;

pub mod command;
pub mod font_8x4;
pub mod framebuffer;
pub mod gpio;
pub mod render;
pub mod select;
pub mod text;
pub mod transport;

#[cfg(test)]
mod testing;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_hal::digital::ErrorKind;

pub use command::Command;
pub use command::Commons;
pub use command::OutputDriver;
pub use font_8x4::FONT_8X4;
pub use framebuffer::store::BufferStore;
pub use framebuffer::Cell;
pub use framebuffer::FrameBuffer;
pub use gpio::ClockSource;
pub use gpio::Config;
pub use gpio::Ht1632;
pub use gpio::Transition;
pub use render::Link;
pub use render::Location;
pub use render::RenderStats;
pub use select::ChipMask;
pub use select::ChipTopology;
pub use select::DirectSelect;
pub use select::ShiftSelect;
pub use text::Font;

/// Color type used by the framebuffers: a lit or dark LED.
pub type Color = BinaryColor;

/// Number of framebuffer cells (RAM nibbles) for a `cols` x `rows` display.
///
/// ```rust
/// use ht1632::compute_address_space;
///
/// const SIZE: usize = compute_address_space(32, 16);
/// assert_eq!(SIZE, 128);
/// ```
#[must_use]
pub const fn compute_address_space(cols: usize, rows: usize) -> usize {
    cols * rows / 4
}

/// Errors reported by the driver.
///
/// Drawing calls never fail: coordinates and target indices out of range are
/// clipped or ignored. Errors come only from the pins or from a driver
/// configuration that can't describe real hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ht1632Error {
    /// An output pin reported an error.
    Pin(ErrorKind),
    /// The geometry, topology or buffer count is inconsistent.
    InvalidConfig(&'static str),
}

impl Ht1632Error {
    pub(crate) fn pin<E: embedded_hal::digital::Error>(err: E) -> Self {
        Self::Pin(err.kind())
    }
}

impl core::fmt::Display for Ht1632Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Ht1632Error::Pin(kind) => write!(f, "pin error: {kind}"),
            Ht1632Error::InvalidConfig(reason) => write!(f, "invalid configuration: {reason}"),
        }
    }
}

impl core::error::Error for Ht1632Error {}

#[cfg(feature = "defmt")]
impl defmt::Format for Ht1632Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Ht1632Error::Pin(kind) => defmt::write!(f, "Pin({})", defmt::Debug2Format(kind)),
            Ht1632Error::InvalidConfig(reason) => defmt::write!(f, "InvalidConfig({=str})", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::format;

    use super::*;

    #[test]
    fn test_compute_address_space() {
        assert_eq!(compute_address_space(32, 8), 64);
        assert_eq!(compute_address_space(32, 16), 128);
        assert_eq!(compute_address_space(24, 16), 96);
        assert_eq!(compute_address_space(0, 16), 0);
    }

    #[test]
    fn test_error_display() {
        let err = Ht1632Error::InvalidConfig("zero-sized address space");
        assert_eq!(
            format!("{err}"),
            "invalid configuration: zero-sized address space"
        );
        let err = Ht1632Error::pin(ErrorKind::Other);
        assert_eq!(err, Ht1632Error::Pin(ErrorKind::Other));
    }
}
