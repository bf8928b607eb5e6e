use core::time;
use core::cell::{Cell, RefCell};

extern crate alloc;
use alloc::boxed::Box;
use alloc::rc::Rc;

use crate::delay::Delay;
use crate::host::{Host, Liveness};
use super::MAX_CHUNK;

pub(crate) enum Action {
    Once(Cell<Option<Box<dyn FnOnce()>>>),
    Repeat {
        period: Delay,
        //Taken out for the duration of the call, so re-entrant tick finds it empty
        callback: Cell<Option<Box<dyn FnMut()>>>,
    },
}

impl Action {
    #[inline]
    pub(crate) fn once<F: 'static + FnOnce()>(callback: F) -> Self {
        Action::Once(Cell::new(Some(Box::new(callback))))
    }

    #[inline]
    pub(crate) fn repeat<F: 'static + FnMut()>(period: Delay, callback: F) -> Self {
        Action::Repeat {
            period,
            callback: Cell::new(Some(Box::new(callback))),
        }
    }
}

///Puts interval callback back into its slot once call is over, even if it panicked.
struct Restore<'a> {
    slot: &'a Cell<Option<Box<dyn FnMut()>>>,
    callback: Option<Box<dyn FnMut()>>,
}

impl Drop for Restore<'_> {
    #[inline]
    fn drop(&mut self) {
        self.slot.set(self.callback.take());
    }
}

struct State<R> {
    //Present only while chunk is armed
    timer: Option<R>,
    cleared: bool,
    liveness: Liveness,
    target: time::Duration,
}

///Chain of host timers that together cover single logical delay.
///
///At most one chunk is armed at any time: next one is armed only when previous fires.
pub(crate) struct Chain<H: Host> {
    host: H,
    state: RefCell<State<H::Ref>>,
    action: Action,
}

impl<H: Host> Chain<H> {
    pub(crate) fn new(host: H, action: Action, liveness: Liveness) -> Self {
        Self {
            host,
            state: RefCell::new(State {
                timer: None,
                cleared: false,
                liveness,
                target: time::Duration::from_secs(0),
            }),
            action,
        }
    }

    ///Starts chain with initial `delay`.
    pub(crate) fn start(self: &Rc<Self>, delay: Delay) {
        match delay {
            Delay::Finite(delay) => {
                self.state.borrow_mut().target = self.host.now().saturating_add(delay);
                self.arm(delay);
            },
            Delay::Infinite => log::debug!("infinite delay, no timer is armed"),
        }
    }

    fn arm(self: &Rc<Self>, remaining: time::Duration) {
        if self.is_cleared() {
            return;
        }

        //Delay of exactly MAX_CHUNK is still the last chunk
        let is_last = remaining <= MAX_CHUNK;
        let delay = match is_last {
            true => remaining,
            false => MAX_CHUNK,
        };

        let chain = Rc::clone(self);
        let timer = self.host.set_timeout(delay, Box::new(move || chain.on_chunk(is_last)));
        log::trace!("armed chunk of {:?}, {:?} remaining", delay, remaining);

        let mut state = self.state.borrow_mut();
        //Every chunk is new host timer, hence liveness has to be re-applied each time
        if let Liveness::AllowExit = state.liveness {
            self.host.allow_exit(&timer);
        }
        state.timer = Some(timer);
    }

    fn remaining(&self) -> time::Duration {
        let target = self.state.borrow().target;
        target.saturating_sub(self.host.now())
    }

    fn on_chunk(self: Rc<Self>, is_last: bool) {
        {
            let mut state = self.state.borrow_mut();
            state.timer = None;
            if state.cleared {
                return;
            }
        }

        if !is_last {
            let remaining = self.remaining();
            log::trace!("chunk rollover, {:?} remaining", remaining);
            return self.arm(remaining);
        }

        match self.action {
            Action::Once(ref callback) => if let Some(callback) = callback.take() {
                (callback)();
            },
            Action::Repeat { period, ref callback } => {
                //Next tick must be armed before invoking callback, so that its failure cannot stop repetition
                match period {
                    Delay::Finite(period) => {
                        {
                            let mut state = self.state.borrow_mut();
                            state.target = state.target.saturating_add(period);
                        }
                        self.arm(self.remaining());
                    },
                    Delay::Infinite => log::debug!("infinite period, no further ticks"),
                }

                let mut call = Restore {
                    callback: callback.take(),
                    slot: callback,
                };
                match call.callback {
                    Some(ref mut callback) => (callback)(),
                    None => log::debug!("interval is already running its callback, skip nested tick"),
                }
            },
        }
    }

    #[inline]
    pub(crate) fn is_cleared(&self) -> bool {
        self.state.borrow().cleared
    }

    #[inline]
    pub(crate) fn timer(&self) -> Option<H::Ref> {
        self.state.borrow().timer.clone()
    }

    #[inline]
    pub(crate) fn liveness(&self) -> Liveness {
        self.state.borrow().liveness
    }

    pub(crate) fn set_liveness(&self, liveness: Liveness) {
        let timer = {
            let mut state = self.state.borrow_mut();
            state.liveness = liveness;
            state.timer.clone()
        };

        if let Some(timer) = timer {
            match liveness {
                Liveness::KeepAlive => self.host.keep_alive(&timer),
                Liveness::AllowExit => self.host.allow_exit(&timer),
            }
        }
    }

    pub(crate) fn clear(&self) {
        let timer = {
            let mut state = self.state.borrow_mut();
            state.cleared = true;
            state.timer.take()
        };

        if let Some(timer) = timer {
            log::debug!("clear armed timer");
            self.host.clear_timeout(&timer);
        }

        //Callback can no longer run
        if let Action::Once(ref callback) = self.action {
            drop(callback.take());
        }
    }
}
