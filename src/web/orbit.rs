// orbit.rs - Orrery mounted into a host container
//
// Construction returns at once; the scene is built on a later frame, once
// the container has a layout size. Anything that goes wrong there is logged
// and the mount just stays blank.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::anyhow;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CanvasRenderingContext2d, Event, HtmlCanvasElement, HtmlElement, MouseEvent, TouchEvent, WheelEvent, Window};

use super::{Listeners, RafScheduler, blit, context_2d, decode, host_window, js_err, next_frame, prefers_reduced_motion, to_js};
use crate::config::{SceneConfig, SceneOptions};
use crate::frame::{FrameLoop, Phase};
use crate::orbit::Orrery;

struct Mount {
    window: Window,
    container: HtmlElement,
    canvas: Option<HtmlCanvasElement>,
    ctx: Option<CanvasRenderingContext2d>,
    orrery: Option<Orrery>,
    options: SceneOptions,
    frames: FrameLoop,
    sched: RafScheduler,
    listeners: Listeners,
    /// Last pointer position while dragging
    drag: Option<(i32, i32)>,
}

impl Mount {
    fn container_size(&self) -> (u32, u32) {
        let rect = self.container.get_bounding_client_rect();
        (rect.width().max(0.0).round() as u32, rect.height().max(0.0).round() as u32)
    }

    fn present(&self) {
        let (Some(o), Some(ctx)) = (self.orrery.as_ref(), self.ctx.as_ref()) else { return };
        if let Err(e) = blit(ctx, o.pixels(), o.width(), o.height()) {
            log::warn!("orrery blit failed: {e:#}");
        }
    }

    fn step(&mut self) {
        if let Some(o) = self.orrery.as_mut() {
            o.tick();
        }
        self.present();
    }

    /// Redraw without advancing, for when no loop is running
    fn still(&mut self) {
        if self.frames.is_running() {
            return;
        }
        if let Some(o) = self.orrery.as_mut() {
            o.render();
        }
        self.present();
    }

    fn resize(&mut self) {
        let (w, h) = self.container_size();
        if w == 0 || h == 0 {
            return;
        }
        let (Some(canvas), Some(o)) = (self.canvas.as_ref(), self.orrery.as_mut()) else { return };
        canvas.set_width(w);
        canvas.set_height(h);
        o.resize(w, h);
        log::debug!("orrery resize {w}x{h}");
        self.still();
    }

    fn drag_to(&mut self, x: i32, y: i32) {
        let Some((px, py)) = self.drag else { return };
        self.drag = Some((x, y));
        if let Some(o) = self.orrery.as_mut() {
            o.rotate((x - px) as f32, (y - py) as f32);
        }
        self.still();
    }

    fn set_options(&mut self, options: SceneOptions) {
        self.options = options;
        if let Some(o) = self.orrery.as_mut() {
            o.set_options(options);
        }
        self.still();
    }

    /// Drop the loop, listeners and canvas. Repeatable.
    fn release(&mut self) {
        self.sched.release();
        self.listeners.clear();
        if let Some(canvas) = self.canvas.take() {
            canvas.remove();
        }
        self.ctx = None;
        if let Some(o) = self.orrery.as_mut() {
            o.clear();
        }
        self.drag = None;
    }

    fn teardown(&mut self) {
        self.frames.stop(&mut self.sched);
        self.release();
    }

    fn abort(&mut self) {
        self.frames.fail();
        self.release();
    }
}

/// Orrery animation appended into a host element
#[wasm_bindgen]
pub struct OrbitCanvas {
    mount: Rc<RefCell<Mount>>,
}

#[wasm_bindgen]
impl OrbitCanvas {
    /// Starts initialization and returns immediately. `config` is an
    /// optional plain object (camelCase `SceneConfig` fields).
    #[wasm_bindgen(constructor)]
    pub fn new(container: HtmlElement, show_orbits: bool, auto_rotate: bool, config: JsValue) -> Result<OrbitCanvas, JsValue> {
        let window = host_window().map_err(to_js)?;
        let config: SceneConfig = decode(config).map_err(to_js)?;

        let mount = Rc::new(RefCell::new(Mount {
            sched: RafScheduler::new(window.clone()),
            window,
            container,
            canvas: None,
            ctx: None,
            orrery: None,
            options: SceneOptions { show_orbits, auto_rotate },
            frames: FrameLoop::new(),
            listeners: Listeners::default(),
            drag: None,
        }));

        let task = mount.clone();
        spawn_local(async move {
            if let Err(e) = init(&task, config).await {
                log::error!("orrery init failed: {e:#}");
                if let Ok(mut m) = task.try_borrow_mut() {
                    m.abort();
                }
            }
        });

        Ok(Self { mount })
    }

    #[wasm_bindgen(js_name = setShowOrbits)]
    pub fn set_show_orbits(&mut self, show: bool) {
        if let Ok(mut m) = self.mount.try_borrow_mut() {
            let options = SceneOptions { show_orbits: show, ..m.options };
            m.set_options(options);
        }
    }

    #[wasm_bindgen(js_name = setAutoRotate)]
    pub fn set_auto_rotate(&mut self, on: bool) {
        if let Ok(mut m) = self.mount.try_borrow_mut() {
            let options = SceneOptions { auto_rotate: on, ..m.options };
            m.set_options(options);
        }
    }

    /// Safe before init has finished and safe to repeat
    pub fn teardown(&mut self) {
        if let Ok(mut m) = self.mount.try_borrow_mut() {
            m.teardown();
            log::debug!("orrery torn down");
        }
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.mount.borrow().frames.is_running()
    }

    #[wasm_bindgen(getter)]
    pub fn failed(&self) -> bool {
        self.mount.borrow().frames.phase() == Phase::Failed
    }
}

impl Drop for OrbitCanvas {
    fn drop(&mut self) {
        self.teardown();
    }
}

async fn init(mount: &Rc<RefCell<Mount>>, config: SceneConfig) -> anyhow::Result<()> {
    let window = mount.borrow().window.clone();

    // Give the host a frame to lay the container out
    next_frame(&window).await?;

    if mount.borrow().frames.phase() != Phase::Idle {
        log::debug!("orrery unmounted before init finished");
        return Ok(());
    }

    let document = window.document().ok_or_else(|| anyhow!("no document"))?;
    let canvas = document
        .create_element("canvas")
        .map_err(js_err)?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| anyhow!("created element is not a canvas"))?;
    let ctx = context_2d(&canvas)?;

    {
        let mut m = mount.borrow_mut();
        let (w, h) = m.container_size();
        canvas.set_width(w);
        canvas.set_height(h);
        let style = canvas.style();
        style.set_property("display", "block").map_err(js_err)?;
        style.set_property("width", "100%").map_err(js_err)?;
        style.set_property("height", "100%").map_err(js_err)?;
        m.container.append_child(&canvas).map_err(js_err)?;

        let options = m.options;
        m.orrery = Some(Orrery::new(w, h, config, options));
        m.canvas = Some(canvas.clone());
        m.ctx = Some(ctx);
        log::debug!("orrery mounted {w}x{h}");
    }

    watch_resize(mount, &window)?;

    if prefers_reduced_motion() {
        log::debug!("orrery: reduced motion, single frame");
        mount.borrow_mut().still();
        return Ok(());
    }

    wire(mount, &canvas, &window)?;

    let mut m = mount.borrow_mut();
    let m = &mut *m;
    if !m.frames.start(&mut m.sched) {
        return Err(anyhow!("frame loop did not start"));
    }
    Ok(())
}

fn wire(mount: &Rc<RefCell<Mount>>, canvas: &HtmlCanvasElement, window: &Window) -> anyhow::Result<()> {
    let state = mount.clone();
    mount.borrow().sched.install(move |_now: f64| {
        let Ok(mut m) = state.try_borrow_mut() else { return };
        if !m.frames.begin_frame() {
            return;
        }
        m.step();
        let m = &mut *m;
        m.frames.end_frame(&mut m.sched);
    });

    let mut m = mount.borrow_mut();
    let listeners = &mut m.listeners;

    let state = mount.clone();
    listeners.add(canvas, "mousedown", move |ev: Event| {
        let Some(ev) = ev.dyn_ref::<MouseEvent>() else { return };
        if let Ok(mut m) = state.try_borrow_mut() {
            m.drag = Some((ev.client_x(), ev.client_y()));
        }
    })?;

    // Drag keeps working when the pointer leaves the canvas
    let state = mount.clone();
    listeners.add(window, "mousemove", move |ev: Event| {
        let Some(ev) = ev.dyn_ref::<MouseEvent>() else { return };
        if let Ok(mut m) = state.try_borrow_mut() {
            m.drag_to(ev.client_x(), ev.client_y());
        }
    })?;

    let state = mount.clone();
    listeners.add(window, "mouseup", move |_: Event| {
        if let Ok(mut m) = state.try_borrow_mut() {
            m.drag = None;
        }
    })?;

    let state = mount.clone();
    listeners.add(canvas, "touchstart", move |ev: Event| {
        let Some(t) = ev.dyn_ref::<TouchEvent>().and_then(|t| t.touches().get(0)) else { return };
        if let Ok(mut m) = state.try_borrow_mut() {
            m.drag = Some((t.client_x(), t.client_y()));
        }
    })?;

    let state = mount.clone();
    listeners.add(canvas, "touchmove", move |ev: Event| {
        let Some(t) = ev.dyn_ref::<TouchEvent>().and_then(|t| t.touches().get(0)) else { return };
        if let Ok(mut m) = state.try_borrow_mut() {
            m.drag_to(t.client_x(), t.client_y());
        }
    })?;

    let state = mount.clone();
    listeners.add(canvas, "touchend", move |_: Event| {
        if let Ok(mut m) = state.try_borrow_mut() {
            m.drag = None;
        }
    })?;

    let state = mount.clone();
    listeners.add(canvas, "wheel", move |ev: Event| {
        let Some(wheel) = ev.dyn_ref::<WheelEvent>() else { return };
        ev.prevent_default();
        if let Ok(mut m) = state.try_borrow_mut() {
            if let Some(o) = m.orrery.as_mut() {
                o.zoom(wheel.delta_y() as f32);
            }
            m.still();
        }
    })?;

    Ok(())
}

/// Registered for the still frame too; `resize` redraws when no loop runs
fn watch_resize(mount: &Rc<RefCell<Mount>>, window: &Window) -> anyhow::Result<()> {
    let state = mount.clone();
    mount.borrow_mut().listeners.add(window, "resize", move |_: Event| {
        if let Ok(mut m) = state.try_borrow_mut() {
            m.resize();
        }
    })
}
