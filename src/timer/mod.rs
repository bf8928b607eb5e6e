use core::time;
use core::any::Any;

extern crate alloc;
use alloc::rc::Rc;

use crate::delay::Delay;
use crate::host::{Host, Liveness};

mod chain;
mod handle;
pub use handle::Handle;
use chain::{Action, Chain};

///Maximum delay, in milliseconds, that host timer accepts.
pub const MAX_CHUNK_DELAY: u32 = 2147483647;
///Maximum delay that host timer accepts.
pub const MAX_CHUNK: time::Duration = time::Duration::from_millis(MAX_CHUNK_DELAY as u64);

#[derive(Clone)]
///Timers scheduled on top of `Host`.
///
///Delays are unlimited: whatever exceeds [MAX_CHUNK](constant.MAX_CHUNK.html) is covered by
///re-arming host timer as many times as needed.
pub struct Timers<H> {
    host: H,
}

impl<H: Host> Timers<H> {
    #[inline(always)]
    ///Creates new instance on top of `host`.
    pub const fn new(host: H) -> Self {
        Self {
            host,
        }
    }

    #[inline(always)]
    ///Access underlying host.
    pub fn host(&self) -> &H {
        &self.host
    }

    #[inline(always)]
    ///Creates new schedule
    pub fn schedule(&self) -> Schedule<'_, H> {
        Schedule {
            timers: self,
            initial: Delay::ZERO,
            interval: None,
            liveness: Liveness::KeepAlive,
        }
    }

    fn start(&self, action: Action, delay: Delay, liveness: Liveness) -> Handle<H> {
        let chain = Rc::new(Chain::new(self.host.clone(), action, liveness));
        chain.start(delay);
        Handle {
            chain,
        }
    }

    ///Schedules `callback` to be invoked once after `delay`.
    ///
    ///`delay` accepts anything the native timer would, see [Delay](enum.Delay.html) for coercion rules.
    pub fn set_timeout<F: 'static + FnOnce(), D: Into<Delay>>(&self, callback: F, delay: D) -> Handle<H> {
        self.start(Action::once(callback), delay.into(), Liveness::KeepAlive)
    }

    ///Schedules `callback` to be invoked once after `delay` with provided `args`.
    pub fn set_timeout_with<A: 'static, F: 'static + FnOnce(A), D: Into<Delay>>(&self, callback: F, delay: D, args: A) -> Handle<H> {
        self.set_timeout(move || callback(args), delay)
    }

    ///Schedules `callback` to be invoked every `delay`.
    ///
    ///Each tick is measured from previous tick's deadline, rather than from the moment it fired.
    ///Next tick is armed before `callback` is invoked, so panicking `callback` does not stop repetition.
    ///
    ///If `callback` drives host's loop itself and its own tick comes due meanwhile, that tick is
    ///skipped as `callback` is still running. Following ticks are unaffected.
    pub fn set_interval<F: 'static + FnMut(), D: Into<Delay>>(&self, callback: F, delay: D) -> Handle<H> {
        let delay = delay.into();
        self.start(Action::repeat(delay, callback), delay, Liveness::KeepAlive)
    }

    ///Schedules `callback` to be invoked every `delay` with copy of `args`.
    pub fn set_interval_with<A: 'static + Clone, F: 'static + FnMut(A), D: Into<Delay>>(&self, mut callback: F, delay: D, args: A) -> Handle<H> {
        self.set_interval(move || callback(args.clone()), delay)
    }
}

///Timer's schedule
pub struct Schedule<'a, H> {
    timers: &'a Timers<H>,
    initial: Delay,
    interval: Option<Delay>,
    liveness: Liveness,
}

impl<'a, H: Host> Schedule<'a, H> {
    #[inline(always)]
    ///Sets initial `delay` to fire timer.
    pub fn initial<D: Into<Delay>>(mut self, delay: D) -> Self {
        self.initial = delay.into();
        self
    }

    #[inline(always)]
    ///Sets `period` to repeat timer after `initial` has been fired
    ///
    ///If not set, `initial` delay is used as period.
    pub fn interval<D: Into<Delay>>(mut self, period: D) -> Self {
        self.interval = Some(period.into());
        self
    }

    #[inline(always)]
    ///Lets host to exit while timer is pending, from the very first chunk.
    pub fn allow_exit(mut self) -> Self {
        self.liveness = Liveness::AllowExit;
        self
    }

    #[inline]
    ///Schedules `callback` to be invoked once after `initial` delay.
    pub fn once<F: 'static + FnOnce()>(self, callback: F) -> Handle<H> {
        self.timers.start(Action::once(callback), self.initial, self.liveness)
    }

    #[inline]
    ///Schedules `callback` to be invoked after `initial` delay and then every `interval`.
    pub fn repeat<F: 'static + FnMut()>(self, callback: F) -> Handle<H> {
        let period = self.interval.unwrap_or(self.initial);
        self.timers.start(Action::repeat(period, callback), self.initial, self.liveness)
    }
}

#[inline]
///Cancels timer scheduled with `set_timeout`.
///
///Absent handle or handle that is already cleared is ignored.
pub fn clear_timeout<H: Host>(handle: Option<&Handle<H>>) {
    if let Some(handle) = handle {
        handle.clear();
    }
}

#[inline]
///Cancels timer scheduled with `set_interval`.
///
///Behaves exactly as [clear_timeout](fn.clear_timeout.html).
pub fn clear_interval<H: Host>(handle: Option<&Handle<H>>) {
    clear_timeout(handle)
}

///Cancels timer referred by arbitrary value.
///
///Value is recognized if it is `Handle<H>` or `Option<Handle<H>>`, anything else is left untouched.
///
///Returns whether value was recognized as handle.
pub fn clear_any<H: Host>(value: &dyn Any) -> bool {
    if let Some(handle) = value.downcast_ref::<Handle<H>>() {
        handle.clear();
        true
    } else if let Some(handle) = value.downcast_ref::<Option<Handle<H>>>() {
        clear_timeout(handle.as_ref());
        true
    } else {
        false
    }
}
