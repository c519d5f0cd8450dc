// web/ - DOM mount layer (wasm32 only)
//
// Owns everything that touches the browser: the animation-frame loop,
// event listeners, canvas blits and the reduced-motion query. The numeric
// cores never see a web_sys type.

mod orbit;
mod ripple;

pub use orbit::OrbitCanvas;
pub use ripple::RippleCanvas;

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::anyhow;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, ImageData, Window};

use crate::frame::Scheduler;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("backdrop-engine loaded");
}

// ============================================================================
// Host helpers
// ============================================================================

pub(crate) fn host_window() -> anyhow::Result<Window> {
    web_sys::window().ok_or_else(|| anyhow!("no window"))
}

pub(crate) fn js_err(e: JsValue) -> anyhow::Error {
    anyhow!("{e:?}")
}

/// anyhow -> JsValue, only at the exported boundary
pub(crate) fn to_js(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{e:#}"))
}

/// Plain JS object -> config; undefined/null give the defaults
pub(crate) fn decode<T: DeserializeOwned + Default>(value: JsValue) -> anyhow::Result<T> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| anyhow!("bad config: {e}"))
}

/// Read once at mount, never watched
pub fn prefers_reduced_motion() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
        .is_some_and(|q| q.matches())
}

pub(crate) fn context_2d(canvas: &HtmlCanvasElement) -> anyhow::Result<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .map_err(js_err)?
        .ok_or_else(|| anyhow!("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| anyhow!("context is not 2d"))
}

/// Copy an RGBA buffer onto the canvas at the origin
pub(crate) fn blit(ctx: &CanvasRenderingContext2d, pixels: &[u8], w: u32, h: u32) -> anyhow::Result<()> {
    if w == 0 || h == 0 {
        return Ok(());
    }
    let img = ImageData::new_with_u8_clamped_array_and_sh(Clamped(pixels), w, h).map_err(js_err)?;
    ctx.put_image_data(&img, 0.0, 0.0).map_err(js_err)
}

/// Resolves on the next display refresh
pub(crate) async fn next_frame(window: &Window) -> anyhow::Result<()> {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if window.request_animation_frame(&resolve).is_err() {
            // Never refresh-driven here, resolve straight away
            let _ = resolve.call0(&JsValue::UNDEFINED);
        }
    });
    JsFuture::from(promise).await.map_err(js_err)?;
    Ok(())
}

// ============================================================================
// requestAnimationFrame scheduler
// ============================================================================

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// `Scheduler` backed by requestAnimationFrame. The callback it requests is
/// installed once and re-requested every frame; `release` drops it, which
/// also breaks the Rc cycle between the callback and the state it captures.
pub(crate) struct RafScheduler {
    window: Window,
    callback: FrameCallback,
}

impl RafScheduler {
    pub fn new(window: Window) -> Self {
        Self { window, callback: Rc::new(RefCell::new(None)) }
    }

    pub fn install(&self, f: impl FnMut(f64) + 'static) {
        *self.callback.borrow_mut() = Some(Closure::new(f));
    }

    pub fn release(&self) {
        let old = self.callback.borrow_mut().take();
        drop(old);
    }
}

impl Scheduler for RafScheduler {
    fn request(&mut self) -> Option<i32> {
        let cb = self.callback.borrow();
        let f = cb.as_ref()?;
        self.window.request_animation_frame(f.as_ref().unchecked_ref()).ok()
    }

    fn cancel(&mut self, id: i32) {
        let _ = self.window.cancel_animation_frame(id);
    }
}

// ============================================================================
// Listener registry
// ============================================================================

/// Every listener a mount adds, so teardown can take them all back off.
#[derive(Default)]
pub(crate) struct Listeners {
    entries: Vec<(EventTarget, &'static str, Closure<dyn FnMut(Event)>)>,
}

impl Listeners {
    pub fn add(&mut self, target: &EventTarget, kind: &'static str, f: impl FnMut(Event) + 'static) -> anyhow::Result<()> {
        let cb = Closure::<dyn FnMut(Event)>::new(f);
        target.add_event_listener_with_callback(kind, cb.as_ref().unchecked_ref()).map_err(js_err)?;
        self.entries.push((target.clone(), kind, cb));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        for (target, kind, cb) in self.entries.drain(..) {
            let _ = target.remove_event_listener_with_callback(kind, cb.as_ref().unchecked_ref());
        }
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        self.clear();
    }
}
