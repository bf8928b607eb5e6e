use core::fmt;

extern crate alloc;
use alloc::rc::Rc;

use crate::host::{Host, Liveness};
use super::chain::Chain;

///Handle to scheduled timer.
///
///Dropping handle does not cancel timer, use [clear](#method.clear) for that.
///
///Clones refer to the same timer.
pub struct Handle<H: Host> {
    pub(crate) chain: Rc<Chain<H>>,
}

impl<H: Host> Handle<H> {
    #[inline]
    ///Returns reference to currently armed host timer.
    ///
    ///It is absent when delay is infinite, after timer is cleared or once it fired for the last time.
    ///Long delays re-arm host timer at each chunk boundary, changing its reference.
    pub fn id(&self) -> Option<H::Ref> {
        self.chain.timer()
    }

    #[inline]
    ///Returns whether timer has been cleared.
    pub fn is_cleared(&self) -> bool {
        self.chain.is_cleared()
    }

    #[inline]
    ///Returns current liveness intent.
    pub fn liveness(&self) -> Liveness {
        self.chain.liveness()
    }

    #[inline]
    ///Makes timer to keep host alive, which is default.
    ///
    ///Intent applies to every subsequent chunk of long delay.
    pub fn keep_alive(&self) -> &Self {
        self.chain.set_liveness(Liveness::KeepAlive);
        self
    }

    #[inline]
    ///Lets host to exit while timer is pending.
    ///
    ///Intent applies to every subsequent chunk of long delay.
    pub fn allow_exit(&self) -> &Self {
        self.chain.set_liveness(Liveness::AllowExit);
        self
    }

    #[inline]
    ///Cancels timer.
    ///
    ///Callback is never invoked after this point, even if host timer is about to fire.
    ///Clearing multiple times is fine.
    pub fn clear(&self) {
        self.chain.clear()
    }

    #[inline]
    ///Returns whether both handles refer to the same timer.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.chain, &other.chain)
    }
}

impl<H: Host> Clone for Handle<H> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            chain: self.chain.clone(),
        }
    }
}

impl<H: Host> fmt::Debug for Handle<H> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("Handle")
           .field("armed", &self.chain.timer().is_some())
           .field("cleared", &self.is_cleared())
           .field("liveness", &self.liveness())
           .finish()
    }
}
