#![allow(dead_code)]

use long_timer::{EventLoop, Host};
use long_timer::host::TimerId;

use core::time;
use core::cell::{Cell, RefCell};
use std::rc::Rc;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Armed(time::Duration),
    Cleared,
    KeepAlive,
    AllowExit,
}

#[derive(Clone)]
///Manual event loop that records every host call.
pub struct RecordingHost {
    pub event_loop: EventLoop,
    events: Rc<RefCell<Vec<Event>>>,
    //Added to clock reading, simulating late callbacks.
    lag: Rc<Cell<time::Duration>>,
    //Leaves host timer armed on clear, simulating chunk that is already in flight.
    ignore_clear: Rc<Cell<bool>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        init_logging();
        Self {
            event_loop: EventLoop::manual(),
            events: Rc::new(RefCell::new(Vec::new())),
            lag: Rc::new(Cell::new(time::Duration::from_secs(0))),
            ignore_clear: Rc::new(Cell::new(false)),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn armed(&self) -> Vec<time::Duration> {
        self.events.borrow().iter().filter_map(|event| match event {
            Event::Armed(delay) => Some(*delay),
            _ => None,
        }).collect()
    }

    pub fn count(&self, expected: Event) -> usize {
        self.events.borrow().iter().filter(|event| **event == expected).count()
    }

    pub fn set_lag(&self, lag: time::Duration) {
        self.lag.set(lag);
    }

    pub fn ignore_clear(&self, ignore: bool) {
        self.ignore_clear.set(ignore);
    }
}

impl Host for RecordingHost {
    type Ref = TimerId;

    fn set_timeout(&self, delay: time::Duration, callback: Box<dyn FnOnce()>) -> Self::Ref {
        self.events.borrow_mut().push(Event::Armed(delay));
        self.event_loop.set_timeout(delay, callback)
    }

    fn clear_timeout(&self, timer: &Self::Ref) {
        self.events.borrow_mut().push(Event::Cleared);
        if !self.ignore_clear.get() {
            self.event_loop.clear_timeout(timer);
        }
    }

    fn keep_alive(&self, timer: &Self::Ref) {
        self.events.borrow_mut().push(Event::KeepAlive);
        self.event_loop.keep_alive(timer);
    }

    fn allow_exit(&self, timer: &Self::Ref) {
        self.events.borrow_mut().push(Event::AllowExit);
        self.event_loop.allow_exit(timer);
    }

    fn now(&self) -> time::Duration {
        self.event_loop.now() + self.lag.get()
    }
}
