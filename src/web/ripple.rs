// ripple.rs - Water ripple mounted on a host canvas

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Event, HtmlCanvasElement, MouseEvent, TouchEvent, Window};

use super::{Listeners, RafScheduler, blit, context_2d, decode, host_window, prefers_reduced_motion, to_js};
use crate::config::RippleConfig;
use crate::frame::FrameLoop;
use crate::ripple::{PointerInput, RippleSim, Viewport};

struct Surface {
    window: Window,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    sim: RippleSim,
    frames: FrameLoop,
    sched: RafScheduler,
    listeners: Listeners,
    /// False under reduced motion: no loop, just the still backdrop
    animate: bool,
}

impl Surface {
    /// Backing size in device pixels
    fn display_size(&self) -> (u32, u32) {
        let dpr = self.window.device_pixel_ratio().max(1.0);
        let w = (self.canvas.client_width().max(0) as f64 * dpr).round() as u32;
        let h = (self.canvas.client_height().max(0) as f64 * dpr).round() as u32;
        (w, h)
    }

    fn present(&self) {
        if let Err(e) = blit(&self.ctx, self.sim.pixels(), self.sim.width(), self.sim.height()) {
            log::warn!("ripple blit failed: {e:#}");
        }
    }

    /// Client coordinates -> canvas-local CSS pixels plus the mapping to
    /// buffer pixels, measured at event time
    fn local(&self, client_x: i32, client_y: i32) -> (f32, f32, Viewport) {
        let rect = self.canvas.get_bounding_client_rect();
        let view = Viewport::new(rect.width() as f32, rect.height() as f32, self.canvas.width(), self.canvas.height());
        (client_x as f32 - rect.left() as f32, client_y as f32 - rect.top() as f32, view)
    }

    fn pointer(&mut self, input: PointerInput) {
        let view = Viewport::identity(self.sim.width(), self.sim.height());
        self.sim.pointer(input, &view);
    }

    fn pointer_at(&mut self, client_x: i32, client_y: i32, make: impl Fn(f32, f32) -> PointerInput) {
        let (x, y, view) = self.local(client_x, client_y);
        self.sim.pointer(make(x, y), &view);
    }

    /// Cancel, rebuild at the new size, start over. A still surface is
    /// only redrawn.
    fn reinit(&mut self) {
        let (w, h) = self.display_size();
        if w == 0 || h == 0 {
            return;
        }
        if self.animate {
            self.frames.stop(&mut self.sched);
        }
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        self.sim.resize(w, h);
        if !self.animate {
            self.sim.render_still();
        }
        self.present();
        if self.animate {
            self.frames = FrameLoop::new();
            self.frames.start(&mut self.sched);
        }
        log::debug!("ripple reinit {w}x{h}");
    }

    fn teardown(&mut self) {
        self.frames.stop(&mut self.sched);
        self.sched.release();
        self.listeners.clear();
    }
}

/// Ripple animation bound to an existing `<canvas>`
#[wasm_bindgen]
pub struct RippleCanvas {
    surface: Rc<RefCell<Surface>>,
}

#[wasm_bindgen]
impl RippleCanvas {
    /// `config` is an optional plain object (camelCase `RippleConfig` fields)
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config: JsValue) -> Result<RippleCanvas, JsValue> {
        Self::mount(canvas, config).map_err(to_js)
    }

    pub fn teardown(&mut self) {
        if let Ok(mut s) = self.surface.try_borrow_mut() {
            s.teardown();
            log::debug!("ripple torn down");
        }
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.surface.borrow().frames.is_running()
    }
}

impl RippleCanvas {
    fn mount(canvas: HtmlCanvasElement, config: JsValue) -> anyhow::Result<Self> {
        let window = host_window()?;
        let config: RippleConfig = decode(config)?;
        let ctx = context_2d(&canvas)?;

        let mut surface = Surface {
            sched: RafScheduler::new(window.clone()),
            window,
            canvas,
            ctx,
            sim: RippleSim::new(0, 0, config),
            frames: FrameLoop::new(),
            listeners: Listeners::default(),
            animate: !prefers_reduced_motion(),
        };
        let (w, h) = surface.display_size();
        surface.canvas.set_width(w);
        surface.canvas.set_height(h);
        surface.sim.resize(w, h);
        surface.present();

        let surface = Rc::new(RefCell::new(surface));
        Self::watch_resize(&surface)?;

        if !surface.borrow().animate {
            log::debug!("ripple: reduced motion, static backdrop");
            return Ok(Self { surface });
        }

        Self::wire(&surface)?;

        {
            let mut s = surface.borrow_mut();
            let s = &mut *s;
            s.frames.start(&mut s.sched);
            log::debug!("ripple mounted {w}x{h}, {} listeners", s.listeners.len());
        }
        Ok(Self { surface })
    }

    fn wire(surface: &Rc<RefCell<Surface>>) -> anyhow::Result<()> {
        let state = surface.clone();
        surface.borrow().sched.install(move |now: f64| {
            let Ok(mut s) = state.try_borrow_mut() else { return };
            if !s.frames.begin_frame() {
                return;
            }
            s.sim.tick(now);
            s.present();
            let s = &mut *s;
            s.frames.end_frame(&mut s.sched);
        });

        let mut s = surface.borrow_mut();
        let canvas = s.canvas.clone();
        let listeners = &mut s.listeners;

        listeners.add(&canvas, "mousemove", on_mouse(surface, |x, y| PointerInput::Move { x, y }))?;
        listeners.add(&canvas, "mousedown", on_mouse(surface, |x, y| PointerInput::Down { x, y }))?;
        listeners.add(&canvas, "mouseup", on_release(surface, PointerInput::Up))?;
        listeners.add(&canvas, "mouseleave", on_release(surface, PointerInput::Leave))?;
        listeners.add(&canvas, "touchstart", on_touch(surface, |x, y| PointerInput::TouchStart { x, y }))?;
        listeners.add(&canvas, "touchmove", on_touch(surface, |x, y| PointerInput::TouchMove { x, y }))?;
        listeners.add(&canvas, "touchend", on_release(surface, PointerInput::TouchEnd))?;
        Ok(())
    }

    /// Both the animated and the still surface follow the window size
    fn watch_resize(surface: &Rc<RefCell<Surface>>) -> anyhow::Result<()> {
        let mut s = surface.borrow_mut();
        let window = s.window.clone();
        let state = surface.clone();
        s.listeners.add(&window, "resize", move |_: Event| {
            if let Ok(mut s) = state.try_borrow_mut() {
                s.reinit();
            }
        })
    }
}

impl Drop for RippleCanvas {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn on_mouse(surface: &Rc<RefCell<Surface>>, make: fn(f32, f32) -> PointerInput) -> impl FnMut(Event) + 'static {
    let state = surface.clone();
    move |ev: Event| {
        let Some(ev) = ev.dyn_ref::<MouseEvent>() else { return };
        if let Ok(mut s) = state.try_borrow_mut() {
            s.pointer_at(ev.client_x(), ev.client_y(), make);
        }
    }
}

fn on_touch(surface: &Rc<RefCell<Surface>>, make: fn(f32, f32) -> PointerInput) -> impl FnMut(Event) + 'static {
    let state = surface.clone();
    move |ev: Event| {
        let Some(touch) = ev.dyn_ref::<TouchEvent>().and_then(|t| t.touches().get(0)) else { return };
        // Dragging on the surface must not scroll the page
        ev.prevent_default();
        if let Ok(mut s) = state.try_borrow_mut() {
            s.pointer_at(touch.client_x(), touch.client_y(), make);
        }
    }
}

fn on_release(surface: &Rc<RefCell<Surface>>, input: PointerInput) -> impl FnMut(Event) + 'static {
    let state = surface.clone();
    move |_: Event| {
        if let Ok(mut s) = state.try_borrow_mut() {
            s.pointer(input);
        }
    }
}
