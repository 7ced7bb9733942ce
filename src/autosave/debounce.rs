use crate::runtime::{TimerId, Timers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Slot {
    timer: TimerId,
    generation: u64,
}

/// Single-slot debounce timer.
///
/// Arming always clears the previous timer first, so at most one is live.
/// The generation stamp lets a firing callback confirm it still owns the slot.
#[derive(Debug)]
pub(crate) struct Debouncer {
    quiet_period_ms: u32,
    slot: Option<Slot>,
    generation: u64,
}

impl Debouncer {
    pub fn new(quiet_period_ms: u32) -> Self {
        Self {
            quiet_period_ms,
            slot: None,
            generation: 0,
        }
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.slot.is_some()
    }

    /// `make_callback` receives the generation to hand back to [`Debouncer::fire`].
    pub fn arm(
        &mut self,
        timers: &dyn Timers,
        make_callback: impl FnOnce(u64) -> Box<dyn FnOnce()>,
    ) {
        self.cancel(timers);
        self.generation += 1;
        let generation = self.generation;
        let timer = timers.set_timeout(self.quiet_period_ms, make_callback(generation));
        self.slot = Some(Slot { timer, generation });
    }

    pub fn cancel(&mut self, timers: &dyn Timers) {
        if let Some(slot) = self.slot.take() {
            timers.clear_timeout(slot.timer);
        }
    }

    /// Releases the slot if `generation` is still the armed one.
    pub fn fire(&mut self, generation: u64) -> bool {
        match self.slot {
            Some(slot) if slot.generation == generation => {
                self.slot = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::testing::Harness;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn counting_callback(
        debouncer: &Rc<RefCell<Debouncer>>,
        fired: &Rc<Cell<u32>>,
    ) -> impl FnOnce(u64) -> Box<dyn FnOnce()> {
        let debouncer = debouncer.clone();
        let fired = fired.clone();
        move |generation| {
            Box::new(move || {
                if debouncer.borrow_mut().fire(generation) {
                    fired.set(fired.get() + 1);
                }
            })
        }
    }

    #[test]
    fn test_rearm_replaces_pending_timer() {
        let h = Harness::new();
        let d = Rc::new(RefCell::new(Debouncer::new(1000)));
        let fired = Rc::new(Cell::new(0));

        for _ in 0..5 {
            let cb = counting_callback(&d, &fired);
            d.borrow_mut().arm(h.timers.as_ref(), cb);
            assert_eq!(h.timers.pending_count(), 1);
            h.advance(400);
        }
        assert_eq!(fired.get(), 0);

        h.advance(600);
        assert_eq!(fired.get(), 1);
        assert!(!d.borrow().is_armed());
        assert_eq!(h.timers.pending_count(), 0);
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let h = Harness::new();
        let d = Rc::new(RefCell::new(Debouncer::new(1000)));
        let fired = Rc::new(Cell::new(0));

        let cb = counting_callback(&d, &fired);
        d.borrow_mut().arm(h.timers.as_ref(), cb);
        d.borrow_mut().cancel(h.timers.as_ref());
        h.advance(5000);

        assert_eq!(fired.get(), 0);
        assert!(!d.borrow().is_armed());
    }

    #[test]
    fn test_stale_generation_is_ignored() {
        let mut d = Debouncer::new(10);
        let h = Harness::new();
        d.arm(h.timers.as_ref(), |_| Box::new(|| {}));
        d.arm(h.timers.as_ref(), |_| Box::new(|| {}));
        assert!(!d.fire(1));
        assert!(d.is_armed());
        assert!(d.fire(2));
    }
}
