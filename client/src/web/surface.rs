use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, ImageData};

use crate::surface::{PixelBlock, PixelSurface};
use crate::viewport::ScreenRect;

const LABEL_FONT: &str = "bold 10px Minecraft";
const LABEL_BACKGROUND: &str = "#ffffffbb";
/// Label box sits this far below the marker centre.
const LABEL_OFFSET_Y: f64 = 20.0;
const LABEL_HEIGHT: f64 = 12.0;

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()??
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()
}

fn create_canvas(width: u32, height: u32) -> Option<HtmlCanvasElement> {
    let document = web_sys::window()?.document()?;
    let canvas = document
        .create_element("canvas")
        .ok()?
        .dyn_into::<HtmlCanvasElement>()
        .ok()?;
    canvas.set_width(width);
    canvas.set_height(height);
    Some(canvas)
}

/// [`PixelSurface`] over a visible `<canvas>`.
///
/// Blits go through an offscreen back buffer of the same size, since a
/// canvas cannot draw onto itself at an offset.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    back: HtmlCanvasElement,
    back_ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = context_2d(&canvas)?;
        ctx.set_image_smoothing_enabled(false);
        let back = create_canvas(canvas.width(), canvas.height())?;
        let back_ctx = context_2d(&back)?;
        Some(Self {
            canvas,
            ctx,
            back,
            back_ctx,
        })
    }
}

impl PixelSurface for CanvasSurface {
    type Image = HtmlImageElement;

    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            f64::from(self.width()),
            f64::from(self.height()),
        );
    }

    fn fill_background(&mut self, rect: ScreenRect, (r, g, b): (u8, u8, u8)) {
        self.ctx.set_fill_style_str(&format!("rgb({r}, {g}, {b})"));
        self.ctx.fill_rect(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        );
    }

    fn paint_block(&mut self, x: i64, y: i64, block: &PixelBlock) {
        let data = match ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(block.rgba.as_slice()),
            block.width,
            block.height,
        ) {
            Ok(data) => data,
            Err(err) => {
                log::warn!("failed to build tile image data: {err:?}");
                return;
            }
        };
        if let Err(err) = self.ctx.put_image_data(&data, x as f64, y as f64) {
            log::warn!("failed to paint tile at ({x}, {y}): {err:?}");
        }
    }

    fn blit_self(&mut self, dx: i64, dy: i64) {
        let (w, h) = (f64::from(self.width()), f64::from(self.height()));
        self.back_ctx.clear_rect(0.0, 0.0, w, h);
        if let Err(err) = self
            .back_ctx
            .draw_image_with_html_canvas_element(&self.canvas, 0.0, 0.0)
        {
            log::warn!("failed to copy raster to back buffer: {err:?}");
            return;
        }
        self.ctx.clear_rect(0.0, 0.0, w, h);
        if let Err(err) = self
            .ctx
            .draw_image_with_html_canvas_element(&self.back, dx as f64, dy as f64)
        {
            log::warn!("failed to blit raster by ({dx}, {dy}): {err:?}");
        }
    }

    fn draw_image(&mut self, image: &HtmlImageElement, x: f64, y: f64, width: f64, height: f64) {
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(image, x, y, width, height)
            .ok();
    }

    fn draw_label(&mut self, text: &str, x: f64, y: f64) {
        let ctx = &self.ctx;
        ctx.set_font(LABEL_FONT);
        ctx.set_text_align("center");
        let text_width = ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0);

        ctx.set_fill_style_str(LABEL_BACKGROUND);
        ctx.fill_rect(
            x - text_width / 2.0 - 1.0,
            y + LABEL_OFFSET_Y,
            text_width + 1.0,
            LABEL_HEIGHT,
        );
        ctx.set_fill_style_str("black");
        ctx.fill_text(text, x, y + LABEL_OFFSET_Y + 10.0).ok();
    }
}
