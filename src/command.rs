//! HT1632 wire vocabulary.
//!
//! Every transaction starts with a 3-bit mode ID. In command mode any number
//! of 9-bit command words may follow (8-bit opcode plus one don't-care bit).
//! In write mode a 7-bit start address is followed by 4-bit data words, with
//! the chip incrementing its address after every data word.

/// Bit length of the mode ID that opens every transaction.
pub const ID_LEN: u8 = 3;
/// Bit length of a command opcode, not counting the trailing padding bit.
pub const COMMAND_LEN: u8 = 8;
/// Bit length of a RAM address.
pub const ADDRESS_LEN: u8 = 7;
/// Bit length of a data word (one nibble of display RAM).
pub const DATA_LEN: u8 = 4;
/// Number of addressable RAM nibbles per chip.
pub const ADDRESS_SPACE: usize = 1 << ADDRESS_LEN;

/// Mode ID sent MSB-first at the start of a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Mode {
    /// Write RAM (`0b101`).
    Write = 0b101,
    /// Command mode (`0b100`).
    Command = 0b100,
}

impl Mode {
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Output driver type of the row/column lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputDriver {
    /// N-MOS open drain outputs.
    #[default]
    Nmos,
    /// P-MOS open drain outputs.
    Pmos,
}

/// Number of common (row) lines the chip scans.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Commons {
    /// 8 commons, 32 outputs.
    Eight,
    /// 16 commons, 24 outputs.
    #[default]
    Sixteen,
}

impl Commons {
    pub const fn rows(self) -> usize {
        match self {
            Commons::Eight => 8,
            Commons::Sixteen => 16,
        }
    }
}

/// HT1632 command opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Turn off the system oscillator and LED duty cycle generator.
    SystemDisable,
    /// Turn on the system oscillator.
    SystemEnable,
    /// Turn off the LED duty cycle generator.
    LedOff,
    /// Turn on the LED duty cycle generator.
    LedOn,
    BlinkOff,
    BlinkOn,
    /// Slave mode, clock source from an external master.
    SlaveMode,
    /// Master mode, clock source from the on-chip RC oscillator.
    RcMasterMode,
    /// Master mode, clock source from an external clock.
    ExternalClock,
    /// Output driver type and number of commons.
    ComOption(OutputDriver, Commons),
    /// PWM duty `level/16`, `level` in `1..=16`. Values outside that range are
    /// masked to the 4-bit duty field.
    Pwm(u8),
}

impl Command {
    /// The 8-bit opcode shifted out after the command mode ID.
    pub const fn opcode(self) -> u8 {
        match self {
            Command::SystemDisable => 0x00,
            Command::SystemEnable => 0x01,
            Command::LedOff => 0x02,
            Command::LedOn => 0x03,
            Command::BlinkOff => 0x08,
            Command::BlinkOn => 0x09,
            Command::SlaveMode => 0x10,
            Command::RcMasterMode => 0x18,
            Command::ExternalClock => 0x1C,
            Command::ComOption(driver, commons) => {
                let a = match driver {
                    OutputDriver::Nmos => 0,
                    OutputDriver::Pmos => 1,
                };
                let b = match commons {
                    Commons::Eight => 0,
                    Commons::Sixteen => 1,
                };
                0x20 | (a << 3) | (b << 2)
            }
            Command::Pwm(level) => 0xA0 | (level.wrapping_sub(1) & 0x0F),
        }
    }
}
