//! Timers without the platform's maximum delay limit.
//!
//!Host timer primitives accept delays up to [MAX_CHUNK_DELAY](constant.MAX_CHUNK_DELAY.html)
//!milliseconds (a signed 32-bit count, ~24.8 days).
//!This crate splits longer delays into a chain of host-level waits ("chunks"), none of which
//!exceeds that limit, while measuring every chunk against a single deadline so that no drift
//!accumulates.
//!
//!## Usage
//!
//!```rust
//!use long_timer::{EventLoop, Timers, clear_timeout};
//!use core::time::Duration;
//!
//!let timers = Timers::new(EventLoop::manual());
//!let handle = timers.set_timeout(|| unreachable!(), Duration::from_secs(60 * 60 * 24 * 365));
//!clear_timeout(Some(&handle));
//!assert!(handle.is_cleared());
//!```

#![no_std]
#![warn(missing_docs)]
#![allow(clippy::style)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod delay;
mod error;
pub mod host;
mod timer;
#[cfg(feature = "std")]
mod global;

pub use delay::{Delay, MAX_SAFE_INTEGER};
pub use error::Error;
pub use host::{Host, Liveness};
#[cfg(feature = "std")]
pub use host::EventLoop;
#[cfg(target_arch = "wasm32")]
pub use host::WebHost;
pub use timer::{Timers, Handle, Schedule, clear_timeout, clear_interval, clear_any, MAX_CHUNK_DELAY, MAX_CHUNK};
#[cfg(feature = "std")]
pub use global::{default_loop, set_timeout, set_interval, run};
