//! The set of framebuffers a driver draws into.
//!
//! Each displayed target (a chip or a colour plane) owns one framebuffer and
//! the last slot is an off-screen buffer for preparing the next frame. Targets
//! reach their framebuffer through a slot table so that exchanging two
//! targets' contents only swaps two indices.

use super::FrameBuffer;
use crate::compute_address_space;
use crate::Ht1632Error;

/// Framebuffers, dirty state and the active target.
///
/// # Type Parameters
/// - `COLS`, `ROWS`, `SIZE`: geometry, see [`FrameBuffer`]
/// - `B`: number of framebuffers, displayed targets plus one off-screen buffer
pub struct BufferStore<const COLS: usize, const ROWS: usize, const SIZE: usize, const B: usize> {
    buffers: [FrameBuffer<COLS, ROWS, SIZE>; B],
    slots: [usize; B],
    needs_rewrite: [bool; B],
    active: usize,
    targets: usize,
}

impl<const COLS: usize, const ROWS: usize, const SIZE: usize, const B: usize>
    BufferStore<COLS, ROWS, SIZE, B>
{
    /// Index of the off-screen buffer.
    pub const SECONDARY: usize = B - 1;

    /// Allocate `B` blank framebuffers, `targets` of which are displayed.
    ///
    /// # Errors
    /// Returns [`Ht1632Error::InvalidConfig`] if the geometry doesn't match
    /// `SIZE` or the displayed targets don't leave room for the off-screen
    /// buffer.
    pub fn new(targets: usize) -> Result<Self, Ht1632Error> {
        if SIZE == 0 {
            return Err(Ht1632Error::InvalidConfig("zero-sized address space"));
        }
        if ROWS % 4 != 0 {
            return Err(Ht1632Error::InvalidConfig("rows must be a multiple of 4"));
        }
        if SIZE != compute_address_space(COLS, ROWS) {
            return Err(Ht1632Error::InvalidConfig("SIZE must equal COLS * ROWS / 4"));
        }
        if targets == 0 || B < 2 || targets > B - 1 {
            return Err(Ht1632Error::InvalidConfig(
                "buffer count must cover every target plus the off-screen buffer",
            ));
        }
        Ok(Self {
            buffers: [FrameBuffer::new(); B],
            slots: core::array::from_fn(|i| i),
            needs_rewrite: [false; B],
            active: 0,
            targets,
        })
    }

    /// Number of displayed targets.
    pub fn targets(&self) -> usize {
        self.targets
    }

    pub fn active(&self) -> usize {
        self.active
    }

    /// Whether `target` can be drawn into: a displayed target or the
    /// off-screen buffer.
    pub fn is_drawable(&self, target: usize) -> bool {
        target < self.targets || target == Self::SECONDARY
    }

    /// Whether `target` is shown on a display.
    pub fn is_displayed(&self, target: usize) -> bool {
        target < self.targets
    }

    /// Make `target` the implicit target of drawing and rendering. Returns
    /// `false` and keeps the current target if `target` isn't drawable.
    pub fn set_active(&mut self, target: usize) -> bool {
        if !self.is_drawable(target) {
            return false;
        }
        self.active = target;
        true
    }

    pub fn buffer(&self, target: usize) -> Option<&FrameBuffer<COLS, ROWS, SIZE>> {
        let slot = *self.slots.get(target)?;
        self.buffers.get(slot)
    }

    pub fn buffer_mut(&mut self, target: usize) -> Option<&mut FrameBuffer<COLS, ROWS, SIZE>> {
        let slot = *self.slots.get(target)?;
        self.buffers.get_mut(slot)
    }

    pub fn active_buffer(&self) -> &FrameBuffer<COLS, ROWS, SIZE> {
        &self.buffers[self.slots[self.active]]
    }

    pub fn active_buffer_mut(&mut self) -> &mut FrameBuffer<COLS, ROWS, SIZE> {
        &mut self.buffers[self.slots[self.active]]
    }

    /// Exchange the contents of `target` and `other` and force a full redraw
    /// of `target`. Ignored if either index is out of range.
    pub fn swap(&mut self, target: usize, other: usize) {
        if target >= B || other >= B {
            return;
        }
        self.slots.swap(target, other);
        self.needs_rewrite[target] = true;
    }

    /// Copy the contents of `source` into `target` and force a full redraw of
    /// `target`. Ignored if either index is out of range.
    pub fn copy(&mut self, target: usize, source: usize) {
        if target >= B || source >= B {
            return;
        }
        let contents = self.buffers[self.slots[source]];
        self.buffers[self.slots[target]] = contents;
        self.needs_rewrite[target] = true;
    }

    /// Whether the next render of `target` must send every cell.
    pub fn needs_rewrite(&self, target: usize) -> bool {
        self.needs_rewrite.get(target).copied().unwrap_or(false)
    }

    pub fn set_needs_rewrite(&mut self, target: usize, value: bool) {
        if let Some(flag) = self.needs_rewrite.get_mut(target) {
            *flag = value;
        }
    }
}

impl<const COLS: usize, const ROWS: usize, const SIZE: usize, const B: usize> core::fmt::Debug
    for BufferStore<COLS, ROWS, SIZE, B>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BufferStore")
            .field("buffers", &B)
            .field("targets", &self.targets)
            .field("active", &self.active)
            .field("slots", &self.slots)
            .field("needs_rewrite", &self.needs_rewrite)
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl<const COLS: usize, const ROWS: usize, const SIZE: usize, const B: usize> defmt::Format
    for BufferStore<COLS, ROWS, SIZE, B>
{
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "BufferStore<{}, {}, {}, {}> targets: {} active: {}",
            COLS,
            ROWS,
            SIZE,
            B,
            self.targets,
            self.active
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLS: usize = 32;
    const ROWS: usize = 8;
    const SIZE: usize = compute_address_space(COLS, ROWS);

    type Store = BufferStore<COLS, ROWS, SIZE, 5>;

    #[test]
    fn test_new() {
        let store = Store::new(2).unwrap();
        assert_eq!(store.targets(), 2);
        assert_eq!(store.active(), 0);
        assert_eq!(Store::SECONDARY, 4);
        for target in 0..5 {
            let fb = store.buffer(target).unwrap();
            assert_eq!(fb.dirty_count(), SIZE);
            assert!(!store.needs_rewrite(target));
        }
        assert!(store.buffer(5).is_none());
    }

    #[test]
    fn test_new_rejects_bad_configuration() {
        assert!(matches!(
            Store::new(0),
            Err(Ht1632Error::InvalidConfig(_))
        ));
        assert!(Store::new(5).is_err());
        assert!(Store::new(4).is_ok());
        assert!(BufferStore::<32, 8, 0, 2>::new(1).is_err());
        assert!(BufferStore::<32, 8, 63, 2>::new(1).is_err());
        assert!(BufferStore::<32, 6, 48, 2>::new(1).is_err());
        assert!(BufferStore::<32, 8, 64, 1>::new(1).is_err());
    }

    #[test]
    fn test_set_active() {
        let mut store = Store::new(2).unwrap();
        assert!(store.set_active(1));
        assert_eq!(store.active(), 1);
        // not a displayed target and not the off-screen buffer
        assert!(!store.set_active(2));
        assert!(!store.set_active(3));
        assert!(!store.set_active(99));
        assert_eq!(store.active(), 1);
        assert!(store.set_active(Store::SECONDARY));
        assert_eq!(store.active(), Store::SECONDARY);
        assert!(!store.is_displayed(Store::SECONDARY));
    }

    #[test]
    fn test_drawing_goes_to_active_target() {
        let mut store = Store::new(2).unwrap();
        store.set_active(1);
        store.active_buffer_mut().set_pixel(4, 4, true);
        assert_eq!(store.buffer(1).unwrap().get_pixel(4, 4), Some(true));
        assert_eq!(store.buffer(0).unwrap().get_pixel(4, 4), Some(false));
    }

    #[test]
    fn test_swap() {
        let mut store = Store::new(1).unwrap();
        store.set_active(Store::SECONDARY);
        store.active_buffer_mut().set_pixel(1, 1, true);
        store.set_active(0);
        store.active_buffer_mut().set_pixel(2, 2, true);

        store.swap(0, Store::SECONDARY);
        assert!(store.needs_rewrite(0));
        assert!(!store.needs_rewrite(Store::SECONDARY));
        let shown = store.buffer(0).unwrap();
        assert_eq!(shown.get_pixel(1, 1), Some(true));
        assert_eq!(shown.get_pixel(2, 2), Some(false));
        let hidden = store.buffer(Store::SECONDARY).unwrap();
        assert_eq!(hidden.get_pixel(2, 2), Some(true));

        store.swap(0, Store::SECONDARY);
        assert_eq!(store.buffer(0).unwrap().get_pixel(2, 2), Some(true));
    }

    #[test]
    fn test_swap_out_of_range_is_ignored() {
        let mut store = Store::new(1).unwrap();
        store.swap(0, 9);
        assert!(!store.needs_rewrite(0));
    }

    #[test]
    fn test_copy() {
        let mut store = Store::new(1).unwrap();
        store
            .buffer_mut(Store::SECONDARY)
            .unwrap()
            .set_pixel(3, 7, true);
        store.copy(0, Store::SECONDARY);
        assert!(store.needs_rewrite(0));
        assert_eq!(store.buffer(0).unwrap().get_pixel(3, 7), Some(true));

        // independent storage after the copy
        store.buffer_mut(0).unwrap().set_pixel(3, 7, false);
        assert_eq!(
            store.buffer(Store::SECONDARY).unwrap().get_pixel(3, 7),
            Some(true)
        );
    }

    #[test]
    fn test_needs_rewrite_flag() {
        let mut store = Store::new(1).unwrap();
        store.set_needs_rewrite(0, true);
        assert!(store.needs_rewrite(0));
        store.set_needs_rewrite(0, false);
        assert!(!store.needs_rewrite(0));
        store.set_needs_rewrite(42, true);
        assert!(!store.needs_rewrite(42));
    }
}
