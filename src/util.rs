// DOM helpers shared by the scene and the stage
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, TouchList};

use crate::error::StageError;
use crate::model::Point;

pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, StageError> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
        .ok_or(StageError::NoContext)
}

/// Start loading `url`; exactly one of the callbacks runs when the browser is done.
pub fn load_image(
    url: &str,
    on_load: impl FnOnce(HtmlImageElement) + 'static,
    on_error: impl FnOnce(StageError) + 'static,
) -> Result<(), StageError> {
    let img = HtmlImageElement::new()?;
    let img_cb = img.clone();
    let mut on_load = Some(on_load);
    let onload = Closure::wrap(Box::new(move || {
        if let Some(f) = on_load.take() {
            f(img_cb.clone());
        }
    }) as Box<dyn FnMut()>);
    let src = url.to_string();
    let mut on_error = Some(on_error);
    let onerror = Closure::wrap(Box::new(move || {
        if let Some(f) = on_error.take() {
            f(StageError::ImageLoad(src.clone()));
        }
    }) as Box<dyn FnMut()>);
    img.set_onload(Some(onload.as_ref().unchecked_ref()));
    img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    // both live as long as the image element
    onload.forget();
    onerror.forget();
    img.set_src(url);
    Ok(())
}

pub fn page_points(touches: &TouchList) -> Vec<Point> {
    (0..touches.length())
        .filter_map(|i| touches.item(i))
        .map(|t| Point::new(t.page_x() as f64, t.page_y() as f64))
        .collect()
}
