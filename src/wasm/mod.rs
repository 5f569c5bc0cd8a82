use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, EventTarget, PageTransitionEvent, Window};

use crate::error::{FxError, FxResult};
use crate::frame::Liveness;

mod gl;
mod letter;
mod lightbox;
mod render;

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    let liveness = Liveness::new();
    {
        let liveness = liveness.clone();
        listen(&window, "pagehide", move |event| {
            let persisted = event
                .dyn_ref::<PageTransitionEvent>()
                .is_some_and(|e| e.persisted());
            if liveness.page_hidden(persisted) {
                log::info!("page unloading, stopping effects");
            }
        })?;
    }

    // Each effect is optional: a page without its markup just skips it.
    report("constellation", render::mount(&window, &document, liveness.clone()));
    report("swarm", gl::mount(&window, &document, liveness.clone()));
    report("lightbox", lightbox::mount(&window, &document, liveness.clone()));
    report("letter", letter::mount(&document, liveness));
    Ok(())
}

fn report(effect: &str, result: FxResult<()>) {
    match result {
        Ok(()) => log::info!("{effect} mounted"),
        Err(err) => log::warn!("{effect} skipped: {err}"),
    }
}

pub(crate) fn by_id<T: JsCast>(document: &Document, id: &str) -> FxResult<T> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
        .ok_or_else(|| FxError::MissingElement(format!("#{id}")))
}

pub(crate) fn viewport(window: &Window) -> (f32, f32) {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    (dim(window.inner_width()), dim(window.inner_height()))
}

/// Registers `handler` for `event` for the lifetime of the page.
pub(crate) fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> FxResult<()> {
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Runs `f` once after `ms` milliseconds.
pub(crate) fn after(ms: u32, f: impl FnOnce() + 'static) -> FxResult<()> {
    let window = web_sys::window().ok_or(FxError::Context("window"))?;
    let callback = Closure::once_into_js(f);
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        ms.min(i32::MAX as u32) as i32,
    )?;
    Ok(())
}

/// Runs `f` once on the next animation frame.
pub(crate) fn next_frame(f: impl FnOnce() + 'static) -> FxResult<()> {
    let window = web_sys::window().ok_or(FxError::Context("window"))?;
    let callback = Closure::once_into_js(f);
    window.request_animation_frame(callback.unchecked_ref())?;
    Ok(())
}

/// Future resolving after `ms` milliseconds.
pub(crate) async fn sleep(ms: u32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                &resolve,
                ms.min(i32::MAX as u32) as i32,
            );
        }
    });
    let _ = JsFuture::from(promise).await;
}
