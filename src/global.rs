//! Thread-local default event loop.

use crate::delay::Delay;
use crate::host::EventLoop;
use crate::timer::{Handle, Timers};

std::thread_local! {
    static DEFAULT: Timers<EventLoop> = Timers::new(EventLoop::new());
}

#[inline]
///Returns current thread's default event loop.
pub fn default_loop() -> EventLoop {
    DEFAULT.with(|timers| timers.host().clone())
}

#[inline]
///Schedules `callback` on default event loop to be invoked once after `delay`.
///
///Refer to [Timers::set_timeout](struct.Timers.html#method.set_timeout) for details.
pub fn set_timeout<F: 'static + FnOnce(), D: Into<Delay>>(callback: F, delay: D) -> Handle<EventLoop> {
    DEFAULT.with(move |timers| timers.set_timeout(callback, delay))
}

#[inline]
///Schedules `callback` on default event loop to be invoked every `delay`.
///
///Refer to [Timers::set_interval](struct.Timers.html#method.set_interval) for details.
pub fn set_interval<F: 'static + FnMut(), D: Into<Delay>>(callback: F, delay: D) -> Handle<EventLoop> {
    DEFAULT.with(move |timers| timers.set_interval(callback, delay))
}

#[inline]
///Runs default event loop until no referenced timer is left.
///
///Returns number of fired timers.
pub fn run() -> usize {
    default_loop().run()
}
