use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, MouseEvent, Window};

use super::{by_id, listen, viewport};
use crate::color::css_rgba;
use crate::config::FlatConfig;
use crate::error::{FxError, FxResult};
use crate::flat::FlatField;
use crate::frame::{Effect, FrameDriver, Liveness};
use crate::pointer::PointerState;
use crate::render::{FlatBackground, FlatSurface};

/// Drives `driver` from `requestAnimationFrame` until its liveness is torn
/// down.
pub fn start<E: Effect + 'static>(driver: Rc<RefCell<FrameDriver<E>>>) -> FxResult<()> {
    let window = web_sys::window().ok_or(FxError::Context("window"))?;

    // `f` holds the animation-frame closure so that it can keep calling
    // `request_animation_frame` on itself. Storing it inside an `Option` lets
    // us create the `Closure` first and then reach it from within itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::new(move |now: f64| {
        if !driver.borrow_mut().step(now) {
            return;
        }
        if let (Some(window), Some(cb)) = (web_sys::window(), f.borrow().as_ref()) {
            let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }));

    if let Some(cb) = g.borrow().as_ref() {
        window.request_animation_frame(cb.as_ref().unchecked_ref())?;
    }
    Ok(())
}

struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl FlatSurface for CanvasSurface {
    fn clear(&mut self, size: Vec2) {
        self.ctx.clear_rect(0.0, 0.0, size.x as f64, size.y as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, rgb: [u8; 3], alpha: f32) {
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
        self.ctx.set_fill_style_str(&css_rgba(rgb, alpha));
        self.ctx.fill();
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, rgb: [u8; 3], alpha: f32) {
        self.ctx.begin_path();
        self.ctx.set_stroke_style_str(&css_rgba(rgb, alpha));
        self.ctx.set_line_width(1.0);
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }
}

fn fit_canvas(window: &Window, canvas: &HtmlCanvasElement) -> Vec2 {
    let (w, h) = viewport(window);
    canvas.set_width(w as u32);
    canvas.set_height(h as u32);
    Vec2::new(w, h)
}

/// Mounts the constellation on `<canvas id="constellation">`.
pub fn mount(window: &Window, document: &Document, liveness: Liveness) -> FxResult<()> {
    let canvas: HtmlCanvasElement = by_id(document, "constellation")?;
    let ctx = canvas
        .get_context("2d")?
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
        .ok_or(FxError::Context("2d"))?;

    let size = fit_canvas(window, &canvas);
    let field = FlatField::new(FlatConfig::default(), size, &mut SmallRng::from_entropy());
    let driver = Rc::new(RefCell::new(FrameDriver::new(
        FlatBackground::new(field, CanvasSurface { ctx }),
        liveness,
    )));

    {
        let driver = driver.clone();
        let window_ = window.clone();
        listen(window, "resize", move |_| {
            let size = fit_canvas(&window_, &canvas);
            driver.borrow_mut().effect_mut().resize(size);
        })?;
    }
    {
        let driver = driver.clone();
        let window_ = window.clone();
        listen(window, "mousemove", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                let (w, h) = viewport(&window_);
                let pointer =
                    PointerState::from_client(event.client_x() as f32, event.client_y() as f32, w, h);
                driver.borrow_mut().effect_mut().set_pointer(pointer);
            }
        })?;
    }
    if let Some(root) = document.document_element() {
        let driver = driver.clone();
        listen(&root, "mouseleave", move |_| {
            driver.borrow_mut().effect_mut().set_pointer(PointerState::Absent);
        })?;
    }

    start(driver)
}
