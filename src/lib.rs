#![cfg(target_arch = "wasm32")]
use anyhow::Context;
use scene_core::SceneConfig;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

mod canvas2d;
mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod overlay;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("scene-web starting");
    Ok(())
}

/// A mounted scene. Dropping it (or calling `free()` from JS) unmounts.
#[wasm_bindgen]
pub struct SceneHandle {
    frame_ctx: Rc<RefCell<frame::FrameContext>>,
    frame_loop: frame::FrameLoop,
    listeners: Vec<events::ListenerGuard>,
}

#[wasm_bindgen]
impl SceneHandle {
    /// Re-read the canvas size and commit it on the next frame. Window resize
    /// events still go through the debounce window.
    pub fn resize(&self) {
        if let Ok(mut ctx) = self.frame_ctx.try_borrow_mut() {
            let (w, h) = dom::css_size(&ctx.canvas);
            ctx.scene.resize_now(w, h, dom::device_pixel_ratio());
        }
    }

    #[wasm_bindgen(js_name = setPointer)]
    pub fn set_pointer(&self, u: f32, v: f32) {
        if let Ok(mut ctx) = self.frame_ctx.try_borrow_mut() {
            ctx.scene.set_pointer(u, v);
        }
    }

    /// Cancel the frame loop and detach listeners. Idempotent.
    pub fn unmount(&mut self) {
        self.frame_loop.stop();
        self.listeners.clear();
        if let Ok(mut ctx) = self.frame_ctx.try_borrow_mut() {
            ctx.scene.stop();
        }
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    /// Live entity count.
    pub fn population(&self) -> usize {
        self.frame_ctx
            .try_borrow()
            .map(|ctx| ctx.scene.pool().len())
            .unwrap_or(0)
    }
}

impl Drop for SceneHandle {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Start a scene on `<canvas id=canvas_id>`. `config_json` may be empty.
///
/// Never throws: when the canvas or its 2D context is unavailable, or the
/// configuration is rejected, this logs a warning, reveals the element with id
/// `<canvas_id>-fallback` and returns `undefined`.
#[wasm_bindgen(js_name = mountScene)]
pub fn mount_scene(canvas_id: &str, config_json: &str) -> Option<SceneHandle> {
    match try_mount(canvas_id, config_json) {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::warn!("[mount] #{canvas_id} declined to start: {e:#}");
            if let Some(document) = dom::window_document() {
                overlay::show_fallback(&document, canvas_id);
            }
            None
        }
    }
}

fn try_mount(canvas_id: &str, config_json: &str) -> anyhow::Result<SceneHandle> {
    let document = dom::window_document().context("no document")?;
    let canvas = dom::canvas_by_id(&document, canvas_id)?;
    let ctx = dom::context_2d(&canvas)?;
    let config = if config_json.trim().is_empty() {
        SceneConfig::default()
    } else {
        SceneConfig::from_json(config_json)?
    };

    let (css_w, css_h) = dom::css_size(&canvas);
    let scene = scene_core::Scene::new(config, css_w, css_h, dom::device_pixel_ratio())?;
    let surface = scene.surface();
    dom::apply_backing_size(&canvas, &surface);
    let target = canvas2d::Canvas2d::new(ctx);
    overlay::hide_fallback(&document, canvas_id);

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        scene,
        canvas,
        target,
        backing_generation: surface.generation,
    }));
    let listeners = vec![
        events::wire_resize(&frame_ctx)?,
        events::wire_pointermove(&frame_ctx)?,
    ];
    let frame_loop = frame::start_loop(frame_ctx.clone());
    Ok(SceneHandle {
        frame_ctx,
        frame_loop,
        listeners,
    })
}
