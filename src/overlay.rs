use crate::constants::{FALLBACK_SUFFIX, HIDDEN_CLASS};
use web_sys as web;

fn fallback(document: &web::Document, canvas_id: &str) -> Option<web::Element> {
    document.get_element_by_id(&format!("{canvas_id}{FALLBACK_SUFFIX}"))
}

/// Reveal the static stand-in for a scene that could not start.
pub fn show_fallback(document: &web::Document, canvas_id: &str) {
    if let Some(el) = fallback(document, canvas_id) {
        let _ = el.class_list().remove_1(HIDDEN_CLASS);
        // for pages without the CSS class
        let _ = el.set_attribute("style", "");
    }
    if let Some(canvas) = document.get_element_by_id(canvas_id) {
        let _ = canvas.set_attribute("style", "display:none");
    }
}

pub fn hide_fallback(document: &web::Document, canvas_id: &str) {
    if let Some(el) = fallback(document, canvas_id) {
        let _ = el.class_list().add_1(HIDDEN_CLASS);
        let _ = el.set_attribute("style", "display:none");
    }
}
