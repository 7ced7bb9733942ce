//! Event-loop seams used by the editor controllers.
//!
//! The browser implementations wrap `setTimeout`/`clearTimeout` and
//! `spawn_local`; tests swap in a manual clock and a local executor.

use futures::future::LocalBoxFuture;
use wasm_bindgen::JsCast;

#[cfg(test)]
pub(crate) mod testing;

pub(crate) type TimerId = i32;

pub(crate) trait Timers {
    /// Runs `callback` once after `delay_ms`, unless cleared first.
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerId;

    fn clear_timeout(&self, id: TimerId);

    /// Milliseconds since the epoch, as seen by this event loop.
    fn now_ms(&self) -> i64;
}

pub(crate) trait Spawner {
    fn spawn(&self, fut: LocalBoxFuture<'static, ()>);
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BrowserTimers;

impl Timers for BrowserTimers {
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerId {
        let Some(win) = web_sys::window() else {
            return 0;
        };

        let cb = wasm_bindgen::closure::Closure::once_into_js(move || callback());
        win.set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            delay_ms.min(i32::MAX as u32) as i32,
        )
        .unwrap_or(0)
    }

    fn clear_timeout(&self, id: TimerId) {
        if let Some(win) = web_sys::window() {
            win.clear_timeout_with_handle(id);
        }
    }

    fn now_ms(&self) -> i64 {
        js_sys::Date::now().round() as i64
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct LocalSpawner;

impl Spawner for LocalSpawner {
    fn spawn(&self, fut: LocalBoxFuture<'static, ()>) {
        leptos::task::spawn_local(fut);
    }
}
