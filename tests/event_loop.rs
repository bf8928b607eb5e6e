#![cfg(not(target_arch = "wasm32"))]

mod helpers;

use long_timer::{EventLoop, Host, Timers};

use core::cell::RefCell;
use core::time;
use std::rc::Rc;

fn ms(value: u64) -> time::Duration {
    time::Duration::from_millis(value)
}

fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Box<dyn FnOnce()>) {
    let fired = Rc::new(RefCell::new(Vec::new()));
    let sink = fired.clone();
    let make = move |name: &'static str| -> Box<dyn FnOnce()> {
        let sink = sink.clone();
        Box::new(move || sink.borrow_mut().push(name))
    };
    (fired, make)
}

#[test]
fn event_loop_fires_in_deadline_order() {
    helpers::init_logging();
    let event_loop = EventLoop::manual();
    let (fired, make) = recorder();

    event_loop.set_timeout(ms(30), make("c"));
    event_loop.set_timeout(ms(10), make("a"));
    event_loop.set_timeout(ms(20), make("b1"));
    event_loop.set_timeout(ms(20), make("b2"));

    assert_eq!(event_loop.len(), 4);
    assert_eq!(event_loop.next_deadline(), Some(ms(10)));
    assert_eq!(event_loop.run(), 4);
    assert_eq!(*fired.borrow(), ["a", "b1", "b2", "c"]);
    assert_eq!(event_loop.now(), ms(30));
    assert!(event_loop.is_empty());
}

#[test]
fn event_loop_turn_fires_only_due() {
    let event_loop = EventLoop::manual();
    let (fired, make) = recorder();

    event_loop.set_timeout(ms(10), make("due"));
    event_loop.set_timeout(ms(20), make("later"));

    assert_eq!(event_loop.turn(), 0);
    assert_eq!(event_loop.advance(ms(10)), 1);
    assert_eq!(event_loop.turn(), 0);
    assert_eq!(*fired.borrow(), ["due"]);
    assert_eq!(event_loop.len(), 1);
}

#[test]
fn event_loop_clamps_zero_delay() {
    let event_loop = EventLoop::manual();
    let (_fired, make) = recorder();

    let timer = event_loop.set_timeout(ms(0), make("zero"));
    assert_eq!(timer.deadline(), ms(1));
    assert_eq!(event_loop.turn(), 0);
}

#[test]
fn event_loop_clear() {
    let event_loop = EventLoop::manual();
    let (fired, make) = recorder();

    let timer = event_loop.set_timeout(ms(10), make("cleared"));
    event_loop.set_timeout(ms(20), make("kept"));
    event_loop.clear_timeout(&timer);
    event_loop.clear_timeout(&timer);

    assert_eq!(event_loop.run(), 1);
    assert_eq!(*fired.borrow(), ["kept"]);
}

#[test]
fn event_loop_exits_without_referenced_timers() {
    let event_loop = EventLoop::manual();
    let (fired, make) = recorder();

    let idle = event_loop.set_timeout(ms(10), make("idle"));
    event_loop.allow_exit(&idle);
    event_loop.allow_exit(&idle);
    assert!(!event_loop.has_ref());
    assert_eq!(event_loop.run(), 0);
    assert_eq!(event_loop.now(), ms(0));

    //Unreferenced timer still fires while loop is kept alive
    event_loop.set_timeout(ms(50), make("alive"));
    assert_eq!(event_loop.run(), 2);
    assert_eq!(*fired.borrow(), ["idle", "alive"]);

    let late = event_loop.set_timeout(ms(10), make("late"));
    event_loop.allow_exit(&late);
    event_loop.keep_alive(&late);
    event_loop.keep_alive(&late);
    assert!(event_loop.has_ref());
    assert_eq!(event_loop.run(), 1);
    assert!(!event_loop.has_ref());
}

#[test]
fn event_loop_system_clock() {
    let event_loop = EventLoop::new();
    let (fired, make) = recorder();

    assert!(!event_loop.is_manual());
    let start = event_loop.now();
    event_loop.set_timeout(ms(20), make("a"));
    assert_eq!(event_loop.run(), 1);
    assert!(event_loop.now() - start >= ms(20));
    assert_eq!(*fired.borrow(), ["a"]);
}

#[test]
fn event_loop_system_clock_advance_fires_rearmed() {
    let event_loop = EventLoop::new();
    let timers = Timers::new(event_loop.clone());
    let count = Rc::new(core::cell::Cell::new(0));

    let calls = count.clone();
    let interval = timers.set_interval(move || calls.set(calls.get() + 1), 10);

    let start = event_loop.now();
    assert_eq!(event_loop.advance(ms(35)), 3);
    assert_eq!(count.get(), 3);
    assert!(event_loop.now() - start >= ms(35));

    interval.clear();
    assert!(event_loop.is_empty());
}

#[test]
fn default_loop_runs_timers() {
    helpers::init_logging();
    let count = Rc::new(core::cell::Cell::new(0));
    let slot = Rc::new(core::cell::Cell::new(None));

    let start = std::time::Instant::now();
    let calls = count.clone();
    let own = slot.clone();
    let interval = long_timer::set_interval(move || {
        calls.set(calls.get() + 1);
        if calls.get() == 3 {
            long_timer::clear_interval(own.take().as_ref());
        }
    }, 10);
    slot.set(Some(interval.clone()));

    let once = long_timer::set_timeout(|| (), "15");
    let never = long_timer::set_timeout(|| unreachable!(), ms(5));
    long_timer::clear_timeout(Some(&never));

    long_timer::run();

    assert_eq!(count.get(), 3);
    assert!(start.elapsed() >= ms(30));
    assert!(interval.is_cleared());
    assert!(once.id().is_none());
    assert!(long_timer::default_loop().is_empty());
}
