//! Host-side bus recorder for tests.
//!
//! Recording pins log every level change on a shared [`Bus`]. The bus can
//! replay the log as HT1632 frames, decoding bits on the rising edge of `WR`
//! the way the chip does.

extern crate std;

use core::cell::RefCell;
use core::convert::Infallible;
use std::rc::Rc;
use std::vec;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::ErrorType;
use embedded_hal::digital::OutputPin;

use crate::command::ADDRESS_LEN;
use crate::command::COMMAND_LEN;
use crate::command::DATA_LEN;
use crate::command::ID_LEN;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line {
    /// A chip-select line, or the serial input of the select register.
    Cs(usize),
    Wr,
    Data,
    ShiftClock,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Set(Line, bool),
    DelayNs(u32),
    DelayMs(u32),
}

/// One decoded transaction: everything clocked in while a chip set stayed
/// selected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    Commands { chips: u8, opcodes: Vec<u8> },
    Write { chips: u8, address: u8, data: Vec<u8> },
}

#[derive(Clone, Default)]
pub struct Bus {
    events: Rc<RefCell<Vec<Event>>>,
    shift_chips: Option<usize>,
}

impl Bus {
    /// Bus with one select line per chip.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bus whose chip selects come from a shift register of `chips` outputs.
    pub fn shifted(chips: usize) -> Self {
        Self {
            events: Rc::default(),
            shift_chips: Some(chips),
        }
    }

    pub fn pin(&self, line: Line) -> RecordingPin {
        RecordingPin {
            line,
            events: self.events.clone(),
        }
    }

    pub fn delay(&self) -> RecordingDelay {
        RecordingDelay {
            events: self.events.clone(),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// Total of all millisecond delays.
    pub fn delayed_ms(&self) -> u64 {
        self.events
            .borrow()
            .iter()
            .map(|event| match event {
                Event::DelayMs(ms) => u64::from(*ms),
                _ => 0,
            })
            .sum()
    }

    /// Select register outputs after replaying the log, chip 0 first.
    pub fn shift_register(&self, chips: usize) -> Vec<bool> {
        let mut register = vec![true; chips];
        let mut input = true;
        let mut clock = false;
        for event in self.events.borrow().iter() {
            match *event {
                Event::Set(Line::Cs(0), level) => input = level,
                Event::Set(Line::ShiftClock, level) => {
                    if level && !clock {
                        register.rotate_right(1);
                        register[0] = input;
                    }
                    clock = level;
                }
                _ => {}
            }
        }
        register
    }

    /// Panics if the data line changes while `WR` is high.
    pub fn assert_data_stable_while_strobed(&self) {
        let mut wr = false;
        for (i, event) in self.events.borrow().iter().enumerate() {
            match *event {
                Event::Set(Line::Wr, level) => wr = level,
                Event::Set(Line::Data, _) => {
                    assert!(!wr, "data line changed while WR was high (event {i})")
                }
                _ => {}
            }
        }
    }

    /// Bits clocked in per selection, empty selections dropped.
    pub fn transactions(&self) -> Vec<(u8, Vec<bool>)> {
        let mut direct = [true; 8];
        let mut register = vec![true; self.shift_chips.unwrap_or(0)];
        let mut input = true;
        let mut clock = false;
        let mut wr = false;
        let mut data = false;

        let mut transactions = Vec::new();
        let mut current: Option<(u8, Vec<bool>)> = None;

        for event in self.events.borrow().iter() {
            let mut selection_changed = false;
            match *event {
                Event::Set(Line::Cs(i), level) => {
                    if self.shift_chips.is_some() {
                        input = level;
                    } else {
                        direct[i] = level;
                        selection_changed = true;
                    }
                }
                Event::Set(Line::ShiftClock, level) => {
                    if level && !clock && !register.is_empty() {
                        register.rotate_right(1);
                        register[0] = input;
                        selection_changed = true;
                    }
                    clock = level;
                }
                Event::Set(Line::Data, level) => data = level,
                Event::Set(Line::Wr, level) => {
                    if level && !wr {
                        if let Some((chips, bits)) = current.as_mut() {
                            if *chips != 0 {
                                bits.push(data);
                            }
                        }
                    }
                    wr = level;
                }
                Event::DelayNs(_) | Event::DelayMs(_) => {}
            }

            if selection_changed {
                let lines: &[bool] = if self.shift_chips.is_some() {
                    &register
                } else {
                    &direct
                };
                let chips = lines
                    .iter()
                    .enumerate()
                    .filter(|(_, high)| !**high)
                    .fold(0u8, |mask, (i, _)| mask | (1 << i));
                let same = current.as_ref().is_some_and(|(c, _)| *c == chips);
                if !same {
                    if let Some(done) = current.take() {
                        if !done.1.is_empty() {
                            transactions.push(done);
                        }
                    }
                    current = Some((chips, Vec::new()));
                }
            }
        }
        if let Some(done) = current.take() {
            if !done.1.is_empty() {
                transactions.push(done);
            }
        }
        transactions
    }

    /// The recorded transactions decoded as HT1632 frames.
    pub fn frames(&self) -> Vec<Frame> {
        self.transactions()
            .into_iter()
            .map(|(chips, bits)| decode(chips, &bits))
            .collect()
    }

    /// Only the write frames.
    pub fn writes(&self) -> Vec<(u8, u8, Vec<u8>)> {
        self.frames()
            .into_iter()
            .filter_map(|frame| match frame {
                Frame::Write {
                    chips,
                    address,
                    data,
                } => Some((chips, address, data)),
                Frame::Commands { .. } => None,
            })
            .collect()
    }

    /// Every opcode sent, with the chips it went to.
    pub fn commands(&self) -> Vec<(u8, u8)> {
        self.frames()
            .into_iter()
            .flat_map(|frame| match frame {
                Frame::Commands { chips, opcodes } => {
                    opcodes.into_iter().map(|op| (chips, op)).collect()
                }
                Frame::Write { .. } => Vec::new(),
            })
            .collect()
    }
}

fn msb_first(bits: &[bool]) -> u8 {
    bits.iter().fold(0, |value, bit| (value << 1) | u8::from(*bit))
}

fn lsb_first(bits: &[bool]) -> u8 {
    bits.iter()
        .rev()
        .fold(0, |value, bit| (value << 1) | u8::from(*bit))
}

fn decode(chips: u8, bits: &[bool]) -> Frame {
    let id_len = usize::from(ID_LEN);
    assert!(bits.len() >= id_len, "transaction too short: {bits:?}");
    let (id, rest) = bits.split_at(id_len);
    match msb_first(id) {
        0b100 => {
            let word = usize::from(COMMAND_LEN) + 1;
            assert_eq!(rest.len() % word, 0, "partial command word: {bits:?}");
            let opcodes = rest
                .chunks(word)
                .map(|chunk| msb_first(&chunk[..usize::from(COMMAND_LEN)]))
                .collect();
            Frame::Commands { chips, opcodes }
        }
        0b101 => {
            let (address, payload) = rest.split_at(usize::from(ADDRESS_LEN));
            let word = usize::from(DATA_LEN);
            assert_eq!(payload.len() % word, 0, "partial data word: {bits:?}");
            Frame::Write {
                chips,
                address: msb_first(address),
                data: payload.chunks(word).map(lsb_first).collect(),
            }
        }
        id => panic!("unexpected mode id {id:#05b}"),
    }
}

pub struct RecordingPin {
    line: Line,
    events: Rc<RefCell<Vec<Event>>>,
}

impl ErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.events.borrow_mut().push(Event::Set(self.line, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.events.borrow_mut().push(Event::Set(self.line, true));
        Ok(())
    }
}

pub struct RecordingDelay {
    events: Rc<RefCell<Vec<Event>>>,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.events.borrow_mut().push(Event::DelayNs(ns));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.events.borrow_mut().push(Event::DelayMs(ms));
    }
}
