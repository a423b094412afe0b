//! Bit-banged HT1632 driver.
//!
//! [`Ht1632`] owns the select topology, the `WR`/data lines, a delay and a
//! [`BufferStore`]. Drawing calls only touch the framebuffer of the active
//! target; [`Ht1632::render`] pushes its dirty cells over the wire.

use core::convert::Infallible;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::OriginDimensions;
use embedded_graphics::geometry::Size;
use embedded_graphics::Pixel;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::command::Command;
use crate::command::Commons;
use crate::command::Mode;
use crate::command::OutputDriver;
use crate::command::ADDRESS_LEN;
use crate::framebuffer::store::BufferStore;
use crate::framebuffer::FrameBuffer;
use crate::render;
use crate::render::Link;
use crate::render::Location;
use crate::render::RenderStats;
use crate::select::ChipMask;
use crate::select::ChipTopology;
use crate::text::Font;
use crate::transport::Transport;
use crate::Color;
use crate::Ht1632Error;

/// Brightness set by [`Ht1632::init`], full PWM duty.
pub const MAX_BRIGHTNESS: u8 = 16;

/// Number of delays a fade is split into.
const FADE_STEPS: u32 = 32;

/// Where the chips take their system clock from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// On-chip RC oscillator, the power-on default. No mode command is sent;
    /// HT1632C parts misbehave when told `RC_MASTER` explicitly.
    #[default]
    OnChipRc,
    /// Send `RC_MASTER` during init.
    RcMaster,
    /// Clock from the `OSC` pin.
    External,
    /// Clock and sync from a master chip.
    Slave,
}

impl ClockSource {
    fn command(self) -> Option<Command> {
        match self {
            ClockSource::OnChipRc => None,
            ClockSource::RcMaster => Some(Command::RcMasterMode),
            ClockSource::External => Some(Command::ExternalClock),
            ClockSource::Slave => Some(Command::SlaveMode),
        }
    }
}

/// Chip configuration sent by [`Ht1632::init`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub driver: OutputDriver,
    pub commons: Commons,
    pub clock: ClockSource,
}

impl Config {
    #[must_use]
    pub fn with_driver(mut self, driver: OutputDriver) -> Self {
        self.driver = driver;
        self
    }

    #[must_use]
    pub fn with_commons(mut self, commons: Commons) -> Self {
        self.commons = commons;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: ClockSource) -> Self {
        self.clock = clock;
        self
    }
}

/// How [`Ht1632::transition`] brings the off-screen buffer onto the display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    /// Exchange the active and off-screen buffers.
    Swap,
    /// Copy the off-screen buffer into the active one.
    Copy,
    /// Dim the active chips, swap, and brighten again. Blocks for about
    /// `duration_ms`.
    Fade { duration_ms: u32 },
}

/// Select lines and serial transport, addressed as one bus.
struct Wire<T, WR, DATA, D> {
    topology: T,
    transport: Transport<WR, DATA, D>,
    /// Target whose cells [`Link::locate`] maps.
    target: usize,
}

impl<T, WR, DATA, D> Wire<T, WR, DATA, D>
where
    T: ChipTopology,
    WR: OutputPin,
    DATA: OutputPin,
    D: DelayNs,
{
    /// Send `commands` to `chips` in a single command mode transaction.
    fn send_commands(
        &mut self,
        chips: ChipMask,
        commands: impl IntoIterator<Item = Command>,
    ) -> Result<(), Ht1632Error> {
        self.topology.select(chips)?;
        self.transport.write_mode(Mode::Command)?;
        for command in commands {
            self.transport.write_command(command)?;
        }
        self.topology.deselect()
    }
}

impl<T, WR, DATA, D> Link for Wire<T, WR, DATA, D>
where
    T: ChipTopology,
    WR: OutputPin,
    DATA: OutputPin,
    D: DelayNs,
{
    type Error = Ht1632Error;

    fn locate(&self, address: usize) -> Location {
        self.topology.locate(self.target, address)
    }

    fn open(&mut self, chips: ChipMask, address: u8) -> Result<(), Ht1632Error> {
        self.topology.select(chips)?;
        self.transport.write_mode(Mode::Write)?;
        self.transport
            .write_msb_first(u16::from(address), ADDRESS_LEN)
    }

    fn write(&mut self, nibble: u8) -> Result<(), Ht1632Error> {
        self.transport.write_data(nibble)
    }

    fn close(&mut self) -> Result<(), Ht1632Error> {
        self.topology.deselect()
    }
}

/// HT1632 display driver.
///
/// # Type Parameters
/// - `T`: chip select topology, [`crate::DirectSelect`] or
///   [`crate::ShiftSelect`]
/// - `WR`, `DATA`: write strobe and data lines
/// - `D`: delay used for bit timing and fades
/// - `COLS`, `ROWS`, `SIZE`: geometry of one target, see [`FrameBuffer`]
/// - `B`: framebuffers, one per target plus the off-screen buffer
pub struct Ht1632<
    T,
    WR,
    DATA,
    D,
    const COLS: usize,
    const ROWS: usize,
    const SIZE: usize,
    const B: usize,
> {
    wire: Wire<T, WR, DATA, D>,
    store: BufferStore<COLS, ROWS, SIZE, B>,
    config: Config,
}

impl<T, WR, DATA, D, const COLS: usize, const ROWS: usize, const SIZE: usize, const B: usize>
    Ht1632<T, WR, DATA, D, COLS, ROWS, SIZE, B>
where
    T: ChipTopology,
    WR: OutputPin,
    DATA: OutputPin,
    D: DelayNs,
{
    /// Index of the off-screen buffer.
    pub const SECONDARY: usize = BufferStore::<COLS, ROWS, SIZE, B>::SECONDARY;

    /// Create a driver. Nothing is sent until [`Ht1632::init`].
    ///
    /// # Errors
    /// Returns [`Ht1632Error::InvalidConfig`] if `SIZE` doesn't match the
    /// topology's address space or the geometry, or if `B` doesn't leave one
    /// framebuffer per target plus the off-screen buffer.
    pub fn new(
        topology: T,
        wr: WR,
        data: DATA,
        delay: D,
        config: Config,
    ) -> Result<Self, Ht1632Error> {
        if topology.address_space() != SIZE {
            return Err(Ht1632Error::InvalidConfig(
                "SIZE must match the topology address space",
            ));
        }
        let store = BufferStore::new(topology.target_count())?;
        Ok(Self {
            wire: Wire {
                topology,
                transport: Transport::new(wr, data, delay),
                target: 0,
            },
            store,
            config,
        })
    }

    /// Configure every chip, blank every target and make target 0 active.
    pub fn init(&mut self) -> Result<(), Ht1632Error> {
        self.wire.transport.idle()?;
        self.wire.topology.deselect()?;

        let chips = self.wire.topology.all_chips();
        let config = self.config;
        let setup = [
            Command::SystemDisable,
            Command::ComOption(config.driver, config.commons),
        ]
        .into_iter()
        .chain(config.clock.command())
        .chain([
            Command::SystemEnable,
            Command::LedOn,
            Command::Pwm(MAX_BRIGHTNESS),
            Command::BlinkOff,
        ]);
        self.wire.send_commands(chips, setup)?;

        let targets = self.store.targets();
        for target in (0..targets).chain(core::iter::once(Self::SECONDARY)) {
            self.store.set_active(target);
            self.clear();
            self.render()?;
        }
        self.store.set_active(0);
        debug!(
            "ht1632: initialized {} chips, {} targets",
            self.wire.topology.chip_count(),
            targets
        );
        Ok(())
    }

    /// Draw into and render `target` from now on: a displayed target or
    /// [`Self::SECONDARY`]. Other indices are ignored.
    pub fn draw_target(&mut self, target: usize) {
        if !self.store.set_active(target) {
            warn!("ht1632: ignoring draw target {}", target);
        }
    }

    pub fn active_target(&self) -> usize {
        self.store.active()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Framebuffer of `target`, if it exists.
    pub fn buffer(&self, target: usize) -> Option<&FrameBuffer<COLS, ROWS, SIZE>> {
        self.store.buffer(target)
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        self.store.active_buffer_mut().set_pixel(x, y, on);
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<bool> {
        self.store.active_buffer().get_pixel(x, y)
    }

    /// See [`FrameBuffer::draw_image`].
    pub fn draw_image(
        &mut self,
        image: &[u8],
        width: usize,
        height: usize,
        x: i32,
        y: i32,
        offset: usize,
    ) {
        self.store
            .active_buffer_mut()
            .draw_image(image, width, height, x, y, offset);
    }

    /// See [`FrameBuffer::draw_text`].
    pub fn draw_text(&mut self, text: &str, x: i32, y: i32, font: &Font<'_>) {
        self.store.active_buffer_mut().draw_text(text, x, y, font);
    }

    /// See [`Font::text_width`].
    pub fn text_width(&self, text: &str, font: &Font<'_>) -> i32 {
        font.text_width(text)
    }

    /// Blank the active target. The next render rewrites it completely.
    pub fn clear(&mut self) {
        self.store.active_buffer_mut().clear();
        self.store.set_needs_rewrite(self.store.active(), true);
    }

    /// Send the active target's changes to the chips. Does nothing for the
    /// off-screen buffer.
    pub fn render(&mut self) -> Result<RenderStats, Ht1632Error> {
        let target = self.store.active();
        if !self.store.is_displayed(target) {
            return Ok(RenderStats::default());
        }
        let force = self.store.needs_rewrite(target);
        self.wire.target = target;
        let stats = render::render(self.store.active_buffer_mut(), force, &mut self.wire)?;
        self.store.set_needs_rewrite(target, false);
        trace!(
            "ht1632: rendered target {}: {} bursts, {} words",
            target,
            stats.bursts,
            stats.words
        );
        Ok(stats)
    }

    /// Send `command` to `chips`, or to the active target's chips. Nothing is
    /// sent while drawing off-screen.
    fn send_command(&mut self, chips: Option<ChipMask>, command: Command) -> Result<(), Ht1632Error> {
        let target = self.store.active();
        let chips = match chips {
            Some(chips) => chips,
            None if self.store.is_displayed(target) => self.wire.topology.target_chips(target),
            None => return Ok(()),
        };
        if chips.is_empty() {
            return Ok(());
        }
        self.wire.send_commands(chips, [command])
    }

    /// Set the PWM duty to `level/16` on `chips`, or on the active target's
    /// chips when `None`.
    pub fn set_brightness(&mut self, level: u8, chips: Option<ChipMask>) -> Result<(), Ht1632Error> {
        self.send_command(chips, Command::Pwm(level))
    }

    /// Turn hardware blinking on or off, chips chosen as for
    /// [`Ht1632::set_brightness`].
    pub fn set_blink(&mut self, on: bool, chips: Option<ChipMask>) -> Result<(), Ht1632Error> {
        let command = if on {
            Command::BlinkOn
        } else {
            Command::BlinkOff
        };
        self.send_command(chips, command)
    }

    /// Bring the off-screen buffer onto the active target. Swap and copy only
    /// change the buffers and leave sending them to the next render; a fade
    /// renders itself. Does nothing while drawing off-screen.
    pub fn transition(&mut self, transition: Transition) -> Result<(), Ht1632Error> {
        let target = self.store.active();
        if !self.store.is_displayed(target) {
            return Ok(());
        }
        debug!("ht1632: transition on target {}", target);
        match transition {
            Transition::Swap => self.store.swap(target, Self::SECONDARY),
            Transition::Copy => self.store.copy(target, Self::SECONDARY),
            Transition::Fade { duration_ms } => self.fade(target, duration_ms)?,
        }
        Ok(())
    }

    fn fade(&mut self, target: usize, duration_ms: u32) -> Result<(), Ht1632Error> {
        let step = duration_ms / FADE_STEPS;
        for level in (1..MAX_BRIGHTNESS).rev() {
            self.set_brightness(level, None)?;
            self.wire.transport.delay_mut().delay_ms(step);
        }
        self.clear();
        self.render()?;
        self.wire.transport.delay_mut().delay_ms(step);
        self.store.swap(target, Self::SECONDARY);
        self.render()?;
        self.wire.transport.delay_mut().delay_ms(step);
        for level in 2..=MAX_BRIGHTNESS {
            self.set_brightness(level, None)?;
            self.wire.transport.delay_mut().delay_ms(step);
        }
        Ok(())
    }

    /// Release the topology, pins and delay.
    pub fn release(self) -> (T, WR, DATA, D) {
        let (wr, data, delay) = self.wire.transport.release();
        (self.wire.topology, wr, data, delay)
    }
}

impl<T, WR, DATA, D, const COLS: usize, const ROWS: usize, const SIZE: usize, const B: usize>
    OriginDimensions for Ht1632<T, WR, DATA, D, COLS, ROWS, SIZE, B>
{
    fn size(&self) -> Size {
        Size::new(COLS as u32, ROWS as u32)
    }
}

/// Draws into the active target.
impl<T, WR, DATA, D, const COLS: usize, const ROWS: usize, const SIZE: usize, const B: usize>
    DrawTarget for Ht1632<T, WR, DATA, D, COLS, ROWS, SIZE, B>
{
    type Color = Color;

    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.store.active_buffer_mut().draw_iter(pixels)
    }
}

impl<T, WR, DATA, D, const COLS: usize, const ROWS: usize, const SIZE: usize, const B: usize>
    core::fmt::Debug for Ht1632<T, WR, DATA, D, COLS, ROWS, SIZE, B>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Ht1632")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
