//! Bit-banged HT1632 serial transport.
//!
//! The chip samples the data line on the rising edge of `WR`. Every bit is
//! sent as: set data, settle, raise `WR`, settle, lower `WR`. `WR` therefore
//! idles low between bits and the data line only ever changes while `WR` is
//! low.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::command::Command;
use crate::command::Mode;
use crate::command::COMMAND_LEN;
use crate::command::DATA_LEN;
use crate::command::ID_LEN;
use crate::Ht1632Error;

/// Setup/hold time around each `WR` edge. The HT1632 needs a few hundred
/// nanoseconds at most; slow GPIO drivers make this a no-op in practice.
pub const SETTLE_NS: u32 = 500;

/// Write strobe and data line plus the delay used for signal settling.
pub struct Transport<WR, DATA, D> {
    wr: WR,
    data: DATA,
    delay: D,
}

impl<WR: OutputPin, DATA: OutputPin, D: DelayNs> Transport<WR, DATA, D> {
    pub fn new(wr: WR, data: DATA, delay: D) -> Self {
        Self { wr, data, delay }
    }

    /// Bring `WR` to its idle level.
    pub fn idle(&mut self) -> Result<(), Ht1632Error> {
        self.wr.set_low().map_err(Ht1632Error::pin)
    }

    pub fn delay_mut(&mut self) -> &mut D {
        &mut self.delay
    }

    /// Release the pins and the delay.
    pub fn release(self) -> (WR, DATA, D) {
        (self.wr, self.data, self.delay)
    }

    fn settle(&mut self) {
        self.delay.delay_ns(SETTLE_NS);
    }

    /// Clock a single bit into the selected chips.
    /// Precondition: `WR` is low.
    fn write_bit(&mut self, bit: bool) -> Result<(), Ht1632Error> {
        self.data.set_state(bit.into()).map_err(Ht1632Error::pin)?;
        self.settle();
        self.wr.set_high().map_err(Ht1632Error::pin)?;
        self.settle();
        self.wr.set_low().map_err(Ht1632Error::pin)
    }

    /// Send the low `len` bits of `value`, most significant first. Used for
    /// IDs, commands and addresses.
    pub fn write_msb_first(&mut self, value: u16, len: u8) -> Result<(), Ht1632Error> {
        for bit in (0..len).rev() {
            self.write_bit(value & (1 << bit) != 0)?;
        }
        Ok(())
    }

    /// Send the low `len` bits of `value`, least significant first. Used for
    /// RAM data.
    pub fn write_lsb_first(&mut self, value: u8, len: u8) -> Result<(), Ht1632Error> {
        for bit in 0..len {
            self.write_bit(value & (1 << bit) != 0)?;
        }
        Ok(())
    }

    pub fn write_mode(&mut self, mode: Mode) -> Result<(), Ht1632Error> {
        self.write_msb_first(u16::from(mode.bits()), ID_LEN)
    }

    /// Send an opcode followed by the don't-care padding bit.
    pub fn write_command(&mut self, command: Command) -> Result<(), Ht1632Error> {
        self.write_msb_first(u16::from(command.opcode()), COMMAND_LEN)?;
        self.write_bit(false)
    }

    /// Send one RAM nibble.
    pub fn write_data(&mut self, nibble: u8) -> Result<(), Ht1632Error> {
        self.write_lsb_first(nibble, DATA_LEN)
    }
}
