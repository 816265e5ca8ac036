use crate::canvas2d::Canvas2d;
use crate::dom;
use scene_core::Scene;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Everything one mounted scene needs per animation frame.
pub struct FrameContext {
    pub scene: Scene,
    pub canvas: web::HtmlCanvasElement,
    pub target: Canvas2d,
    /// Surface generation the canvas backing store was last sized for.
    pub backing_generation: u64,
}

impl FrameContext {
    /// Returns false once the scene has stopped.
    pub fn frame(&mut self) -> bool {
        if !self.scene.tick() {
            return false;
        }
        let surface = self.scene.surface();
        if surface.generation != self.backing_generation {
            dom::apply_backing_size(&self.canvas, &surface);
            self.backing_generation = surface.generation;
        }
        self.target.begin_frame(&surface);
        self.scene.render(&mut self.target);
        true
    }
}

type TickClosure = Closure<dyn FnMut()>;

/// Handle to a running requestAnimationFrame chain.
pub struct FrameLoop {
    running: Rc<Cell<bool>>,
    pending: Rc<Cell<Option<i32>>>,
    tick: Rc<RefCell<Option<TickClosure>>>,
}

impl FrameLoop {
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Cancel the pending frame and release the callback. Safe to call twice.
    pub fn stop(&self) {
        if !self.running.replace(false) {
            return;
        }
        if let Some(id) = self.pending.take() {
            if let Some(w) = web::window() {
                let _ = w.cancel_animation_frame(id);
            }
        }
        // Breaks the closure's reference cycle through `tick`.
        drop(self.tick.borrow_mut().take());
    }
}

fn request_frame(tick: &Rc<RefCell<Option<TickClosure>>>) -> Option<i32> {
    let window = web::window()?;
    let tick = tick.borrow();
    let callback = tick.as_ref()?;
    window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .ok()
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) -> FrameLoop {
    let running = Rc::new(Cell::new(true));
    let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let tick: Rc<RefCell<Option<TickClosure>>> = Rc::new(RefCell::new(None));

    let tick_clone = tick.clone();
    let running_tick = running.clone();
    let pending_tick = pending.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        pending_tick.set(None);
        if !running_tick.get() {
            return;
        }
        let alive = match frame_ctx.try_borrow_mut() {
            Ok(mut ctx) => ctx.frame(),
            Err(_) => true,
        };
        if alive && running_tick.get() {
            pending_tick.set(request_frame(&tick_clone));
        } else {
            running_tick.set(false);
        }
    }) as Box<dyn FnMut()>));

    pending.set(request_frame(&tick));
    FrameLoop {
        running,
        pending,
        tick,
    }
}
