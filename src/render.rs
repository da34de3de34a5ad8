// Surface implementation over the overlay <canvas>
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::error::StageError;
use crate::model::{Rect, SurfaceSize, ZoomTransform};
use crate::state::Surface;
use crate::util::context_2d;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    sprite: HtmlImageElement,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, sprite: HtmlImageElement) -> Result<Self, StageError> {
        let ctx = context_2d(&canvas)?;
        Ok(Self {
            canvas,
            ctx,
            sprite,
        })
    }

    fn set_style(&self, name: &str, value: &str) {
        if let Err(e) = self.canvas.style().set_property(name, value) {
            log::warn!("set {} failed: {:?}", name, e);
        }
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> SurfaceSize {
        SurfaceSize {
            width: self.canvas.width() as f64,
            height: self.canvas.height() as f64,
        }
    }

    fn clear_rect(&mut self, area: Rect) {
        self.ctx.clear_rect(area.x, area.y, area.w, area.h);
    }

    fn draw_sprite(&mut self, src: Rect, dst: Rect) {
        let res = self
            .ctx
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &self.sprite,
                src.x,
                src.y,
                src.w,
                src.h,
                dst.x,
                dst.y,
                dst.w,
                dst.h,
            );
        if let Err(e) = res {
            log::warn!("drawImage failed: {:?}", e);
        }
    }

    fn set_transform_origin(&mut self, x_pct: f64, y_pct: f64) {
        self.set_style("transform-origin", &format!("{}% {}% 0", x_pct, y_pct));
    }

    fn set_transform(&mut self, transform: ZoomTransform) {
        self.set_style("transform", &transform.to_css());
    }
}
