use core::time;

extern crate alloc;
use alloc::boxed::Box;
use alloc::string::ToString;

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen::closure::Closure;

use crate::delay::Delay;
use crate::error::Error;
use super::Host;

mod ffi {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_name = setTimeout)]
        pub fn set_timeout(closure: &JsValue, time: f64) -> JsValue;
        #[wasm_bindgen(js_name = clearTimeout)]
        pub fn clear_timeout(id: &JsValue);
        #[wasm_bindgen(js_namespace = performance)]
        pub fn now() -> f64;
        #[wasm_bindgen(js_name = Number)]
        pub fn to_number(value: &JsValue) -> f64;

        //Node's timer object, browsers return plain number instead.
        pub type Timeout;
        #[wasm_bindgen(method, catch, js_name = "ref")]
        pub fn keep_alive(this: &Timeout) -> Result<JsValue, JsValue>;
        #[wasm_bindgen(method, catch, js_name = unref)]
        pub fn allow_exit(this: &Timeout) -> Result<JsValue, JsValue>;

        pub type Function;
        #[wasm_bindgen(method, catch, js_name = call)]
        pub fn call0(this: &Function, context: &JsValue) -> Result<JsValue, JsValue>;
    }
}

#[derive(Clone, Copy, Debug, Default)]
///Host backed by JS `setTimeout` and `clearTimeout`.
///
///Timer's reference is whatever `setTimeout` returns: object in Node, which allows `ref`/`unref`,
///and number in browsers, where liveness is meaningless and ignored.
pub struct WebHost;

impl WebHost {
    #[inline]
    ///Creates new instance.
    pub const fn new() -> Self {
        Self
    }

    ///Turns JS value into callback.
    ///
    ///Fails with `InvalidArgument` if `value` is not a function.
    ///Exception thrown by callback is re-thrown into JS.
    pub fn callback(value: JsValue) -> Result<impl FnMut() + 'static, Error> {
        if !value.is_function() {
            return Err(Error::InvalidArgument("callback must be a function"));
        }

        let function: ffi::Function = value.unchecked_into();
        Ok(move || {
            if let Err(error) = function.call0(&JsValue::UNDEFINED) {
                wasm_bindgen::throw_val(error);
            }
        })
    }
}

impl Host for WebHost {
    type Ref = JsValue;

    fn set_timeout(&self, delay: time::Duration, callback: Box<dyn FnOnce()>) -> Self::Ref {
        let closure = Closure::once_into_js(move || callback());
        ffi::set_timeout(&closure, Delay::Finite(delay).as_millis_f64())
    }

    #[inline]
    fn clear_timeout(&self, timer: &Self::Ref) {
        ffi::clear_timeout(timer)
    }

    fn keep_alive(&self, timer: &Self::Ref) {
        if timer.is_object() {
            let _ = timer.unchecked_ref::<ffi::Timeout>().keep_alive();
        }
    }

    fn allow_exit(&self, timer: &Self::Ref) {
        if timer.is_object() {
            let _ = timer.unchecked_ref::<ffi::Timeout>().allow_exit();
        }
    }

    #[inline]
    fn now(&self) -> time::Duration {
        match Delay::from_millis_f64(ffi::now()) {
            Delay::Finite(now) => now,
            Delay::Infinite => time::Duration::from_secs(0),
        }
    }
}

impl From<&JsValue> for Delay {
    #[inline]
    ///Coerces JS value using `Number()`, exactly as `setTimeout` does.
    fn from(value: &JsValue) -> Self {
        Delay::from_millis_f64(ffi::to_number(value))
    }
}

impl From<Error> for JsValue {
    #[inline]
    fn from(error: Error) -> Self {
        JsValue::from_str(&error.to_string())
    }
}
