//! Host timer primitives.
//!
//!Host supplies bounded single-shot timer, its cancellation and monotonic clock.
//!Chunking of long delays is built on top of it, so host never receives delay above
//![MAX_CHUNK](../constant.MAX_CHUNK.html).

use core::time;

extern crate alloc;
use alloc::boxed::Box;

#[cfg(feature = "std")]
mod event_loop;
#[cfg(feature = "std")]
pub use event_loop::{EventLoop, TimerId};

#[cfg(target_arch = "wasm32")]
mod web;
#[cfg(target_arch = "wasm32")]
pub use web::WebHost;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
///Whether timer should prevent host from exiting.
pub enum Liveness {
    ///Timer keeps host alive until it fires.
    KeepAlive,
    ///Host may exit while timer is still pending.
    AllowExit,
}

impl Default for Liveness {
    #[inline(always)]
    fn default() -> Self {
        Liveness::KeepAlive
    }
}

///Host's bounded delay timer.
///
///All methods are invoked from the single thread that drives host's callbacks.
pub trait Host: Clone + 'static {
    ///Opaque reference to armed timer.
    type Ref: Clone + 'static;

    ///Arms single-shot timer to invoke `callback` after `delay`.
    ///
    ///`delay` never exceeds [MAX_CHUNK](../constant.MAX_CHUNK.html).
    ///
    ///`callback` must not be invoked before this method returns.
    fn set_timeout(&self, delay: time::Duration, callback: Box<dyn FnOnce()>) -> Self::Ref;

    ///Cancels timer, unless it already fired.
    fn clear_timeout(&self, timer: &Self::Ref);

    #[inline(always)]
    ///Makes timer to keep host alive.
    ///
    ///No-op by default.
    fn keep_alive(&self, _timer: &Self::Ref) {
    }

    #[inline(always)]
    ///Lets host to exit while timer is pending.
    ///
    ///No-op by default.
    fn allow_exit(&self, _timer: &Self::Ref) {
    }

    ///Returns monotonic time elapsed since host's own epoch.
    fn now(&self) -> time::Duration;
}
