use core::time;
use core::cell::RefCell;

use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Instant;

extern crate alloc;
use alloc::boxed::Box;

use super::Host;

///Granularity of event loop's timers.
const MIN_DELAY: time::Duration = time::Duration::from_millis(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
///Reference to timer armed within [EventLoop](struct.EventLoop.html).
///
///Ordered by deadline, then by order of arming.
pub struct TimerId {
    deadline: time::Duration,
    seq: u64,
}

impl TimerId {
    #[inline(always)]
    ///Returns time, relative to loop's epoch, at which timer fires.
    pub const fn deadline(&self) -> time::Duration {
        self.deadline
    }
}

struct Entry {
    callback: Box<dyn FnOnce()>,
    referenced: bool,
}

enum Clock {
    System(Instant),
    Manual(time::Duration),
}

impl Clock {
    #[inline]
    fn now(&self) -> time::Duration {
        match self {
            Clock::System(epoch) => epoch.elapsed(),
            Clock::Manual(now) => *now,
        }
    }
}

struct Inner {
    clock: Clock,
    timers: BTreeMap<TimerId, Entry>,
    seq: u64,
    refs: usize,
}

impl Inner {
    fn remove(&mut self, timer: &TimerId) -> Option<Entry> {
        let entry = self.timers.remove(timer)?;
        if entry.referenced {
            self.refs -= 1;
        }
        Some(entry)
    }

    fn first_due(&mut self, limit: time::Duration) -> Option<(TimerId, Entry)> {
        let timer = *self.timers.keys().next()?;
        if timer.deadline > limit {
            return None;
        }

        self.remove(&timer).map(|entry| (timer, entry))
    }
}

#[derive(Clone)]
///Single-threaded timer event loop.
///
///Loop owns registry of pending timers and invokes them in order of their deadlines.
///It keeps running as long as there is at least one referenced timer,
///while unreferenced timers are fired only when loop is kept alive by others.
///
///Loop can be driven by system's monotonic clock or by manual clock, which only moves when
///loop is [advanced](#method.advance), allowing to test delays spanning months.
///
///Callback panic unwinds out of the method that drives the loop, leaving loop in consistent
///state so it can be resumed.
pub struct EventLoop {
    inner: Rc<RefCell<Inner>>,
}

impl EventLoop {
    fn with_clock(clock: Clock) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                clock,
                timers: BTreeMap::new(),
                seq: 0,
                refs: 0,
            })),
        }
    }

    #[inline]
    ///Creates new loop driven by system's monotonic clock.
    pub fn new() -> Self {
        Self::with_clock(Clock::System(Instant::now()))
    }

    #[inline]
    ///Creates new loop with manual clock, starting at zero.
    pub fn manual() -> Self {
        Self::with_clock(Clock::Manual(time::Duration::from_secs(0)))
    }

    #[inline]
    ///Returns whether loop's clock is manual.
    pub fn is_manual(&self) -> bool {
        match self.inner.borrow().clock {
            Clock::Manual(_) => true,
            Clock::System(_) => false,
        }
    }

    #[inline]
    ///Returns time elapsed since loop's epoch.
    pub fn now(&self) -> time::Duration {
        self.inner.borrow().clock.now()
    }

    #[inline]
    ///Returns number of pending timers.
    pub fn len(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    #[inline]
    ///Returns whether there is no pending timer.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    ///Returns whether any pending timer keeps loop alive.
    pub fn has_ref(&self) -> bool {
        self.inner.borrow().refs > 0
    }

    #[inline]
    ///Returns deadline of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<time::Duration> {
        self.inner.borrow().timers.keys().next().map(TimerId::deadline)
    }

    fn fire_due(&self, limit: time::Duration) -> bool {
        //Borrow must end before callback is invoked as it is likely to arm new timer
        let due = self.inner.borrow_mut().first_due(limit);
        match due {
            Some((timer, entry)) => {
                log::trace!("fire timer #{} at {:?}", timer.seq, timer.deadline);
                (entry.callback)();
                true
            },
            None => false,
        }
    }

    ///Fires all timers that are already due.
    ///
    ///Timers armed by fired callbacks are left for the next turn.
    ///
    ///Returns number of fired timers.
    pub fn turn(&self) -> usize {
        let now = self.now();
        let mut fired = 0;

        while self.fire_due(now) {
            fired += 1;
        }

        fired
    }

    ///Lets `duration` pass, firing every timer that becomes due, in order.
    ///
    ///Manual clock jumps from deadline to deadline, so timers observe exactly their own deadline.
    ///System clock is slept on instead, until each deadline and finally until the end of `duration`.
    ///Timers armed by fired callbacks are fired too, if they become due within `duration`.
    ///
    ///Returns number of fired timers.
    pub fn advance(&self, duration: time::Duration) -> usize {
        let until = self.now().saturating_add(duration);
        let mut fired = 0;

        while let Some(deadline) = self.next_deadline().filter(|deadline| *deadline <= until) {
            self.wait_until(deadline);
            if self.fire_due(deadline) {
                fired += 1;
            }
        }

        self.wait_until(until);
        fired
    }

    fn wait_until(&self, time: time::Duration) {
        match self.is_manual() {
            true => self.set_manual_now(time),
            false => {
                let now = self.now();
                if time > now {
                    std::thread::sleep(time - now);
                }
            },
        }
    }

    fn set_manual_now(&self, time: time::Duration) {
        if let Clock::Manual(ref mut now) = self.inner.borrow_mut().clock {
            if time > *now {
                *now = time;
            }
        }
    }

    ///Runs loop until there is no referenced timer left.
    ///
    ///Unreferenced timers that are due while loop is running are fired too.
    ///
    ///Returns number of fired timers.
    pub fn run(&self) -> usize {
        let mut fired = 0;

        while self.has_ref() {
            let deadline = match self.next_deadline() {
                Some(deadline) => deadline,
                None => break,
            };

            self.wait_until(deadline);

            if self.fire_due(deadline) {
                fired += 1;
            }
        }

        log::debug!("event loop is idle after {} timer(s), {} unreferenced left", fired, self.len());
        fired
    }
}

impl Default for EventLoop {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl Host for EventLoop {
    type Ref = TimerId;

    fn set_timeout(&self, delay: time::Duration, callback: Box<dyn FnOnce()>) -> Self::Ref {
        let mut inner = self.inner.borrow_mut();
        inner.seq += 1;
        let timer = TimerId {
            deadline: inner.clock.now().saturating_add(core::cmp::max(delay, MIN_DELAY)),
            seq: inner.seq,
        };

        inner.refs += 1;
        inner.timers.insert(timer, Entry {
            callback,
            referenced: true,
        });

        timer
    }

    fn clear_timeout(&self, timer: &Self::Ref) {
        //Callback may own arbitrary user data so it has to be dropped outside of borrow
        let entry = self.inner.borrow_mut().remove(timer);
        drop(entry);
    }

    fn keep_alive(&self, timer: &Self::Ref) {
        let mut inner = self.inner.borrow_mut();
        let acquired = match inner.timers.get_mut(timer) {
            Some(entry) if !entry.referenced => {
                entry.referenced = true;
                true
            },
            _ => false,
        };

        if acquired {
            inner.refs += 1;
        }
    }

    fn allow_exit(&self, timer: &Self::Ref) {
        let mut inner = self.inner.borrow_mut();
        let released = match inner.timers.get_mut(timer) {
            Some(entry) if entry.referenced => {
                entry.referenced = false;
                true
            },
            _ => false,
        };

        if released {
            inner.refs -= 1;
        }
    }

    #[inline(always)]
    fn now(&self) -> time::Duration {
        EventLoop::now(self)
    }
}
