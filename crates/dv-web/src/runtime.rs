//! Timer and task spawner on the browser event loop.

use std::time::Duration;

use async_trait::async_trait;
use dv_router::{LocalTask, Spawn, Timer};
use js_sys::{Function, Promise};
use wasm_bindgen_futures::JsFuture;

/// `setTimeout` wrapped in a promise.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebTimer;

#[async_trait(?Send)]
impl Timer for WebTimer {
    async fn sleep(&self, duration: Duration) {
        let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
        let promise = Promise::new(&mut |resolve: Function, _reject: Function| {
            let scheduled = web_sys::window().map(|window| {
                window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis)
            });
            if !matches!(scheduled, Some(Ok(_))) {
                // No timer available; resolve immediately rather than stall.
                let _ = resolve.call0(&wasm_bindgen::JsValue::NULL);
            }
        });
        let _ = JsFuture::from(promise).await;
    }
}

/// Spawns onto the microtask queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSpawner;

impl Spawn for WebSpawner {
    fn spawn(&self, task: LocalTask) {
        wasm_bindgen_futures::spawn_local(task);
    }
}
