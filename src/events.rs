use crate::frame::FrameContext;
use crate::{dom, input};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

/// An event listener that is removed from its target when dropped.
pub struct ListenerGuard {
    target: web::EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl ListenerGuard {
    pub fn new(
        target: &web::EventTarget,
        kind: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> anyhow::Result<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("add {kind} listener: {e:?}"))?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// Forward the canvas's new CSS size on every window resize.
pub fn wire_resize(frame_ctx: &Rc<RefCell<FrameContext>>) -> anyhow::Result<ListenerGuard> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let frame_ctx = frame_ctx.clone();
    ListenerGuard::new(&window, "resize", move |_| {
        let Ok(mut ctx) = frame_ctx.try_borrow_mut() else {
            return;
        };
        let (w, h) = dom::css_size(&ctx.canvas);
        ctx.scene.resize(w, h, dom::device_pixel_ratio());
    })
}

/// Forward pointer movement over the canvas as normalized coordinates.
pub fn wire_pointermove(frame_ctx: &Rc<RefCell<FrameContext>>) -> anyhow::Result<ListenerGuard> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let frame_ctx = frame_ctx.clone();
    ListenerGuard::new(&window, "pointermove", move |ev| {
        let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
            return;
        };
        let Ok(mut ctx) = frame_ctx.try_borrow_mut() else {
            return;
        };
        let [u, v] = input::pointer_canvas_uv(ev, &ctx.canvas);
        ctx.scene.set_pointer(u, v);
    })
}
