// pointer.rs - Pointer and touch input -> impulses
//
// Hover leaves a light trail, a press lands one big drop, dragging while
// pressed leaves a heavier trail. Touch start/move map onto press/drag.
// Coordinates arrive in CSS pixels and are scaled to backing-buffer pixels.

use super::field::Impulse;
use crate::config::{ImpulseSpec, RippleConfig};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerInput {
    Move { x: f32, y: f32 },
    Down { x: f32, y: f32 },
    Up,
    Leave,
    TouchStart { x: f32, y: f32 },
    TouchMove { x: f32, y: f32 },
    TouchEnd,
}

/// CSS-pixel -> buffer-pixel mapping for one canvas
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub css_w: f32,
    pub css_h: f32,
    pub buf_w: f32,
    pub buf_h: f32,
}

impl Viewport {
    pub fn new(css_w: f32, css_h: f32, buf_w: u32, buf_h: u32) -> Self {
        Self { css_w, css_h, buf_w: buf_w as f32, buf_h: buf_h as f32 }
    }

    /// Identity mapping for hosts that already speak buffer pixels
    pub fn identity(w: u32, h: u32) -> Self {
        Self::new(w as f32, h as f32, w, h)
    }

    #[inline]
    pub fn to_buffer(&self, x: f32, y: f32) -> (f32, f32) {
        let sx = if self.css_w > 0.0 { self.buf_w / self.css_w } else { 1.0 };
        let sy = if self.css_h > 0.0 { self.buf_h / self.css_h } else { 1.0 };
        (x * sx, y * sy)
    }
}

#[derive(Clone, Debug)]
pub struct PointerTracker {
    hover: ImpulseSpec,
    press: ImpulseSpec,
    drag: ImpulseSpec,
    pressed: bool,
}

impl PointerTracker {
    pub fn new(cfg: &RippleConfig) -> Self {
        Self { hover: cfg.hover, press: cfg.press, drag: cfg.drag, pressed: false }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn handle(&mut self, input: PointerInput, view: &Viewport) -> Option<Impulse> {
        let (spec, x, y) = match input {
            PointerInput::Move { x, y } => {
                let spec = if self.pressed { self.drag } else { self.hover };
                (spec, x, y)
            }
            PointerInput::Down { x, y } | PointerInput::TouchStart { x, y } => {
                self.pressed = true;
                (self.press, x, y)
            }
            PointerInput::TouchMove { x, y } => (self.drag, x, y),
            PointerInput::Up | PointerInput::Leave | PointerInput::TouchEnd => {
                self.pressed = false;
                return None;
            }
        };
        let (bx, by) = view.to_buffer(x, y);
        Some(Impulse::new(bx, by, spec.radius, spec.strength))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> PointerTracker {
        PointerTracker::new(&RippleConfig::default())
    }

    #[test]
    fn hover_press_drag_release() {
        let view = Viewport::identity(100, 100);
        let mut t = tracker();

        let hover = t.handle(PointerInput::Move { x: 10.0, y: 10.0 }, &view).unwrap();
        assert_eq!((hover.radius, hover.strength), (8.0, 40.0));

        let down = t.handle(PointerInput::Down { x: 10.0, y: 10.0 }, &view).unwrap();
        assert_eq!((down.radius, down.strength), (22.0, 280.0));

        let drag = t.handle(PointerInput::Move { x: 12.0, y: 10.0 }, &view).unwrap();
        assert_eq!((drag.radius, drag.strength), (14.0, 130.0));

        assert!(t.handle(PointerInput::Up, &view).is_none());
        let hover = t.handle(PointerInput::Move { x: 13.0, y: 10.0 }, &view).unwrap();
        assert_eq!(hover.radius, 8.0);
    }

    #[test]
    fn leaving_the_canvas_ends_a_drag() {
        let view = Viewport::identity(100, 100);
        let mut t = tracker();
        t.handle(PointerInput::Down { x: 1.0, y: 1.0 }, &view);
        t.handle(PointerInput::Leave, &view);
        assert!(!t.is_pressed());
    }

    #[test]
    fn touch_maps_to_press_and_drag() {
        let view = Viewport::identity(100, 100);
        let mut t = tracker();
        let start = t.handle(PointerInput::TouchStart { x: 5.0, y: 5.0 }, &view).unwrap();
        assert_eq!(start.strength, 280.0);
        let mv = t.handle(PointerInput::TouchMove { x: 6.0, y: 5.0 }, &view).unwrap();
        assert_eq!(mv.strength, 130.0);
        assert!(t.handle(PointerInput::TouchEnd, &view).is_none());
    }

    #[test]
    fn css_pixels_scale_to_buffer_pixels() {
        // 2x device pixel ratio
        let view = Viewport::new(400.0, 300.0, 800, 600);
        let mut t = tracker();
        let imp = t.handle(PointerInput::Move { x: 100.0, y: 50.0 }, &view).unwrap();
        assert_eq!((imp.x, imp.y), (200.0, 100.0));
    }
}
