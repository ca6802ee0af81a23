//! Cancellable `requestAnimationFrame` loop
//!
//! Each loop re-arms itself after every callback. `stop()` (or dropping the
//! handle) cancels the pending frame and releases the closure, so nothing
//! keeps firing after the game is torn down.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

type FrameClosure = Closure<dyn FnMut(f64)>;

struct LoopInner {
    name: &'static str,
    running: Cell<bool>,
    handle: Cell<Option<i32>>,
    closure: RefCell<Option<FrameClosure>>,
}

impl LoopInner {
    fn schedule(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(closure) = self.closure.borrow().as_ref() {
            match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
                Ok(id) => self.handle.set(Some(id)),
                Err(e) => log::error!("{} loop: requestAnimationFrame failed: {:?}", self.name, e),
            }
        }
    }
}

/// Handle to a running animation-frame loop
pub struct FrameLoop {
    inner: Rc<LoopInner>,
}

impl FrameLoop {
    /// Start calling `callback(timestamp_ms)` once per animation frame
    pub fn start<F>(name: &'static str, mut callback: F) -> Self
    where
        F: FnMut(f64) + 'static,
    {
        let inner = Rc::new(LoopInner {
            name,
            running: Cell::new(true),
            handle: Cell::new(None),
            closure: RefCell::new(None),
        });

        // Weak so the closure does not keep its own loop alive
        let weak = Rc::downgrade(&inner);
        let closure = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.handle.set(None);
            if !inner.running.get() {
                return;
            }
            callback(time);
            if inner.running.get() {
                inner.schedule();
            }
        });
        *inner.closure.borrow_mut() = Some(closure);
        inner.schedule();

        log::info!("{} loop started", name);
        Self { inner }
    }

    /// Cancel the pending frame. Safe to call more than once.
    pub fn stop(&self) {
        if !self.inner.running.replace(false) {
            return;
        }
        if let (Some(id), Some(window)) = (self.inner.handle.take(), web_sys::window()) {
            let _ = window.cancel_animation_frame(id);
        }
        log::info!("{} loop stopped", self.inner.name);
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
        // Break the closure -> callback -> captured state chain
        self.inner.closure.borrow_mut().take();
    }
}
