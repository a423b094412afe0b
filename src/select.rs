//! Chip selection.
//!
//! An HT1632 only listens to the bus while its active-low chip select is
//! asserted. Boards either wire one select line per chip to the MCU
//! ([`DirectSelect`]) or drive the selects from a shift register that the MCU
//! clocks a select pattern into ([`ShiftSelect`]).
//!
//! The topology also decides how a framebuffer address of a drawing target
//! maps onto a chip and its RAM address, see [`ChipTopology::locate`].

use embedded_hal::digital::OutputPin;

use crate::command::ADDRESS_SPACE;
use crate::render::Location;
use crate::Ht1632Error;

/// Maximum number of chips a topology can drive.
pub const MAX_CHIPS: usize = 8;

/// Set of chips, bit `i` selects chip `i`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChipMask(u8);

impl ChipMask {
    pub const NONE: Self = Self(0);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Only chip `index`; empty if `index` is out of range.
    pub const fn single(index: usize) -> Self {
        if index < MAX_CHIPS {
            Self(1 << index)
        } else {
            Self::NONE
        }
    }

    /// The first `count` chips.
    pub const fn first(count: usize) -> Self {
        if count >= MAX_CHIPS {
            Self(u8::MAX)
        } else {
            Self((1 << count) - 1)
        }
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, index: usize) -> bool {
        index < MAX_CHIPS && self.0 & (1 << index) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// How the chips of a board are selected and how drawing targets map onto
/// them.
pub trait ChipTopology {
    /// Number of chips on the bus.
    fn chip_count(&self) -> usize;

    /// Number of displayed drawing targets.
    fn target_count(&self) -> usize;

    /// Number of framebuffer cells of one drawing target.
    fn address_space(&self) -> usize;

    /// Chip and chip RAM address showing cell `address` of `target`.
    fn locate(&self, target: usize, address: usize) -> Location;

    /// Chips showing `target`.
    fn target_chips(&self, target: usize) -> ChipMask;

    /// Every chip on the bus.
    fn all_chips(&self) -> ChipMask {
        ChipMask::first(self.chip_count())
    }

    /// Assert the chip selects in `chips` and release every other one.
    fn select(&mut self, chips: ChipMask) -> Result<(), Ht1632Error>;

    /// Release every chip select.
    fn deselect(&mut self) -> Result<(), Ht1632Error> {
        self.select(ChipMask::NONE)
    }
}

/// One chip-select line per chip, each chip a drawing target of its own.
pub struct DirectSelect<P, const N: usize> {
    pins: [P; N],
    address_space: usize,
}

impl<P: OutputPin, const N: usize> DirectSelect<P, N> {
    /// Topology for `N` chips using their full RAM.
    ///
    /// # Errors
    /// Returns [`Ht1632Error::InvalidConfig`] for zero or more than
    /// [`MAX_CHIPS`] select lines.
    pub fn new(pins: [P; N]) -> Result<Self, Ht1632Error> {
        Self::with_address_space(pins, ADDRESS_SPACE)
    }

    /// Topology for `N` chips of which only `address_space` RAM nibbles are
    /// used, e.g. 64 for a chip wired with 8 commons.
    ///
    /// # Errors
    /// Returns [`Ht1632Error::InvalidConfig`] for zero or more than
    /// [`MAX_CHIPS`] select lines, or an address space larger than the chip
    /// RAM.
    pub fn with_address_space(pins: [P; N], address_space: usize) -> Result<Self, Ht1632Error> {
        if N == 0 || N > MAX_CHIPS {
            return Err(Ht1632Error::InvalidConfig("1 to 8 chip-select lines required"));
        }
        if address_space == 0 || address_space > ADDRESS_SPACE {
            return Err(Ht1632Error::InvalidConfig(
                "address space must fit the chip RAM",
            ));
        }
        Ok(Self {
            pins,
            address_space,
        })
    }

    /// Release the select lines.
    pub fn release(self) -> [P; N] {
        self.pins
    }
}

impl<P: OutputPin, const N: usize> ChipTopology for DirectSelect<P, N> {
    fn chip_count(&self) -> usize {
        N
    }

    fn target_count(&self) -> usize {
        N
    }

    fn address_space(&self) -> usize {
        self.address_space
    }

    fn locate(&self, target: usize, address: usize) -> Location {
        Location::new(ChipMask::single(target), address as u8)
    }

    fn target_chips(&self, target: usize) -> ChipMask {
        ChipMask::single(target)
    }

    fn select(&mut self, chips: ChipMask) -> Result<(), Ht1632Error> {
        for (i, pin) in self.pins.iter_mut().enumerate() {
            pin.set_state((!chips.contains(i)).into())
                .map_err(Ht1632Error::pin)?;
        }
        Ok(())
    }
}

/// Chip selects driven by a shift register, as on bicolor boards.
///
/// The register has one output per chip. Clocking in a low bit asserts the
/// select of the chip it lands on; the bit clocked in last lands on chip 0.
/// Every drawing target is a colour plane that spans all chips: each chip
/// holds `span` cells of every plane, plane `p` at chip RAM addresses
/// `p * span .. (p + 1) * span`.
pub struct ShiftSelect<CS, CLK> {
    cs: CS,
    clk: CLK,
    chips: usize,
    span: usize,
    planes: usize,
}

impl<CS: OutputPin, CLK: OutputPin> ShiftSelect<CS, CLK> {
    /// Topology for `chips` chips with `planes` colour planes of `span`
    /// cells each per chip.
    ///
    /// # Errors
    /// Returns [`Ht1632Error::InvalidConfig`] if there are no chips, more than
    /// [`MAX_CHIPS`], no planes, or the planes don't fit the chip RAM.
    pub fn new(
        cs: CS,
        clk: CLK,
        chips: usize,
        span: usize,
        planes: usize,
    ) -> Result<Self, Ht1632Error> {
        if chips == 0 || chips > MAX_CHIPS {
            return Err(Ht1632Error::InvalidConfig("1 to 8 chips required"));
        }
        if span == 0 || planes == 0 || span.saturating_mul(planes) > ADDRESS_SPACE {
            return Err(Ht1632Error::InvalidConfig(
                "colour planes must fit the chip RAM",
            ));
        }
        Ok(Self {
            cs,
            clk,
            chips,
            span,
            planes,
        })
    }

    /// The Sure Electronics 32x16 bicolor board: 4 chips, green and red
    /// planes of 32 cells each.
    ///
    /// # Errors
    /// Never fails for these parameters; the signature matches
    /// [`ShiftSelect::new`].
    pub fn bicolor_32x16(cs: CS, clk: CLK) -> Result<Self, Ht1632Error> {
        Self::new(cs, clk, 4, 32, 2)
    }

    pub fn span(&self) -> usize {
        self.span
    }

    /// Release the select and clock lines.
    pub fn release(self) -> (CS, CLK) {
        (self.cs, self.clk)
    }

    fn clock(&mut self) -> Result<(), Ht1632Error> {
        self.clk.set_high().map_err(Ht1632Error::pin)?;
        self.clk.set_low().map_err(Ht1632Error::pin)
    }
}

impl<CS: OutputPin, CLK: OutputPin> ChipTopology for ShiftSelect<CS, CLK> {
    fn chip_count(&self) -> usize {
        self.chips
    }

    fn target_count(&self) -> usize {
        self.planes
    }

    fn address_space(&self) -> usize {
        self.chips * self.span
    }

    fn locate(&self, target: usize, address: usize) -> Location {
        let chip = address / self.span;
        let offset = address % self.span + target * self.span;
        Location::new(ChipMask::single(chip), offset as u8)
    }

    fn target_chips(&self, _target: usize) -> ChipMask {
        self.all_chips()
    }

    fn select(&mut self, chips: ChipMask) -> Result<(), Ht1632Error> {
        for chip in (0..self.chips).rev() {
            self.cs
                .set_state((!chips.contains(chip)).into())
                .map_err(Ht1632Error::pin)?;
            self.clock()?;
        }
        self.cs.set_high().map_err(Ht1632Error::pin)
    }
}
