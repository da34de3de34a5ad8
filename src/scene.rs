// Background photo: sized to the viewport height, painted once.
use web_sys::HtmlCanvasElement;

use crate::error::StageError;
use crate::model::SurfaceSize;
use crate::util::{context_2d, load_image};

pub struct SceneLoader {
    canvas: HtmlCanvasElement,
}

impl SceneLoader {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas }
    }

    /// Load `url` into the background canvas, then hand the resulting size to
    /// `on_ready`. A failed load leaves the canvas blank and `on_ready` is never
    /// called.
    pub fn load(
        &self,
        url: &str,
        on_ready: impl FnOnce(SurfaceSize) + 'static,
    ) -> Result<(), StageError> {
        let window = web_sys::window().ok_or(StageError::NoWindow)?;
        let canvas = self.canvas.clone();
        let ctx = context_2d(&canvas)?;
        load_image(
            url,
            move |img| {
                let viewport_h = window
                    .inner_height()
                    .ok()
                    .and_then(|v| v.as_f64())
                    .unwrap_or(600.0);
                let fit = SurfaceSize::fit_to_height(
                    img.natural_width() as f64,
                    img.natural_height() as f64,
                    viewport_h,
                );
                canvas.set_height(fit.height as u32);
                canvas.set_width(fit.width as u32);
                let size = SurfaceSize {
                    width: canvas.width() as f64,
                    height: canvas.height() as f64,
                };
                if let Err(e) = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    &img,
                    0.0,
                    0.0,
                    size.width,
                    size.height,
                ) {
                    log::warn!("background draw failed: {:?}", e);
                }
                log::info!("scene ready: {}x{}", size.width, size.height);
                on_ready(size);
            },
            |e| log::error!("{}", e),
        )
    }
}
