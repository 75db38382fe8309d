use seedmap_shared::{CategoryCode, category_color};

use crate::viewport::ScreenRect;

pub const BACKGROUND: (u8, u8, u8) = (0, 0, 0);

/// An RGBA pixel block ready to be put on a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBlock {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl PixelBlock {
    /// Render a row-major category grid, replicating each cell into a
    /// `pix_dim x pix_dim` square. Cells missing from a short grid stay `background`.
    pub fn from_categories(
        grid: &[CategoryCode],
        width: u32,
        height: u32,
        pix_dim: u8,
        background: (u8, u8, u8),
    ) -> Self {
        let pix = u32::from(pix_dim.max(1));
        let out_w = width * pix;
        let out_h = height * pix;
        let mut rgba = Vec::with_capacity(out_w as usize * out_h as usize * 4);
        for y in 0..out_h {
            let j = (y / pix) as usize;
            for x in 0..out_w {
                let i = (x / pix) as usize;
                let (r, g, b) = grid
                    .get(j * width as usize + i)
                    .map(|&code| category_color(code))
                    .unwrap_or(background);
                rgba.extend_from_slice(&[r, g, b, 255]);
            }
        }
        Self {
            width: out_w,
            height: out_h,
            rgba,
        }
    }
}

/// The raster target the map draws into.
///
/// Coordinates are canvas pixels; anything outside the surface is clipped.
pub trait PixelSurface {
    type Image: Clone;

    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn clear(&mut self);
    fn fill_background(&mut self, rect: ScreenRect, color: (u8, u8, u8));
    fn paint_block(&mut self, x: i64, y: i64, block: &PixelBlock);
    /// Shift the existing raster by `(dx, dy)` pixels. Uncovered pixels are unspecified
    /// until the caller repaints them.
    fn blit_self(&mut self, dx: i64, dy: i64);
    fn draw_image(&mut self, image: &Self::Image, x: f64, y: f64, width: f64, height: f64);
    fn draw_label(&mut self, text: &str, x: f64, y: f64);
}

/// An RGBA image for [`RasterSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl RasterImage {
    pub fn solid(width: u32, height: u32, color: (u8, u8, u8)) -> Self {
        let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..width * height {
            rgba.extend_from_slice(&[color.0, color.1, color.2, 255]);
        }
        Self {
            width,
            height,
            rgba,
        }
    }
}

/// Headless in-memory surface. Text is not rasterized; labels are kept as a list.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
    labels: Vec<(String, f64, f64)>,
    images_drawn: usize,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; width as usize * height as usize * 4],
            labels: Vec::new(),
            images_drawn: 0,
        }
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }

    pub fn pixel(&self, x: i64, y: i64) -> Option<[u8; 4]> {
        let idx = self.index(x, y)?;
        let mut px = [0; 4];
        px.copy_from_slice(&self.rgba[idx..idx + 4]);
        Some(px)
    }

    fn put(&mut self, x: i64, y: i64, px: &[u8]) {
        if let Some(idx) = self.index(x, y) {
            self.rgba[idx..idx + 4].copy_from_slice(px);
        }
    }

    pub fn labels(&self) -> &[(String, f64, f64)] {
        &self.labels
    }

    pub fn images_drawn(&self) -> usize {
        self.images_drawn
    }

    pub fn as_rgba(&self) -> &[u8] {
        &self.rgba
    }
}

impl PixelSurface for RasterSurface {
    type Image = RasterImage;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.rgba.fill(0);
        self.labels.clear();
    }

    fn fill_background(&mut self, rect: ScreenRect, color: (u8, u8, u8)) {
        let px = [color.0, color.1, color.2, 255];
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                self.put(x, y, &px);
            }
        }
    }

    fn paint_block(&mut self, x: i64, y: i64, block: &PixelBlock) {
        let w = block.width as usize;
        for row in 0..block.height as usize {
            for col in 0..w {
                let src = (row * w + col) * 4;
                let Some(px) = block.rgba.get(src..src + 4) else {
                    return;
                };
                let px = [px[0], px[1], px[2], px[3]];
                self.put(x + col as i64, y + row as i64, &px);
            }
        }
    }

    fn blit_self(&mut self, dx: i64, dy: i64) {
        let source = std::mem::replace(
            &mut self.rgba,
            vec![0; self.width as usize * self.height as usize * 4],
        );
        let w = i64::from(self.width);
        let h = i64::from(self.height);
        for y in 0..h {
            for x in 0..w {
                let src = ((y * w + x) * 4) as usize;
                let px = [
                    source[src],
                    source[src + 1],
                    source[src + 2],
                    source[src + 3],
                ];
                self.put(x + dx, y + dy, &px);
            }
        }
    }

    fn draw_image(&mut self, image: &RasterImage, x: f64, y: f64, width: f64, height: f64) {
        self.images_drawn += 1;
        if image.width == 0 || image.height == 0 {
            return;
        }
        let x0 = x.round() as i64;
        let y0 = y.round() as i64;
        let dw = width.round().max(0.0) as i64;
        let dh = height.round().max(0.0) as i64;
        for dy in 0..dh {
            let sy = (dy * i64::from(image.height) / dh) as usize;
            for dx in 0..dw {
                let sx = (dx * i64::from(image.width) / dw) as usize;
                let src = (sy * image.width as usize + sx) * 4;
                let px = [
                    image.rgba[src],
                    image.rgba[src + 1],
                    image.rgba[src + 2],
                    image.rgba[src + 3],
                ];
                if px[3] > 0 {
                    self.put(x0 + dx, y0 + dy, &px);
                }
            }
        }
    }

    fn draw_label(&mut self, text: &str, x: f64, y: f64) {
        self.labels.push((text.to_string(), x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_replicates_cells_per_zoom() {
        // 2x1 grid: plains, river
        let block = PixelBlock::from_categories(&[1, 7], 2, 1, 2, BACKGROUND);
        assert_eq!((block.width, block.height), (4, 2));
        let px = |x: usize, y: usize| {
            let i = (y * 4 + x) * 4;
            [block.rgba[i], block.rgba[i + 1], block.rgba[i + 2]]
        };
        assert_eq!(px(0, 0), [141, 179, 96]);
        assert_eq!(px(1, 1), [141, 179, 96]);
        assert_eq!(px(2, 0), [0, 0, 255]);
        assert_eq!(px(3, 1), [0, 0, 255]);
    }

    #[test]
    fn block_pads_short_grid_with_background() {
        let block = PixelBlock::from_categories(&[1], 2, 1, 1, (9, 9, 9));
        assert_eq!(&block.rgba[4..8], &[9, 9, 9, 255]);
    }

    #[test]
    fn paint_clips_at_edges() {
        let mut surface = RasterSurface::new(4, 4);
        let block = PixelBlock::from_categories(&[7; 9], 3, 3, 1, BACKGROUND);
        surface.paint_block(2, -1, &block);
        assert_eq!(surface.pixel(2, 0), Some([0, 0, 255, 255]));
        assert_eq!(surface.pixel(3, 1), Some([0, 0, 255, 255]));
        assert_eq!(surface.pixel(3, 2), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(1, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn blit_moves_pixels_and_drops_overflow() {
        let mut surface = RasterSurface::new(4, 1);
        let block = PixelBlock::from_categories(&[1, 7, 2, 4], 4, 1, 1, BACKGROUND);
        surface.paint_block(0, 0, &block);
        surface.blit_self(1, 0);
        assert_eq!(surface.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(1, 0), Some([141, 179, 96, 255]));
        assert_eq!(surface.pixel(3, 0), Some([250, 148, 24, 255]));

        surface.blit_self(-2, 0);
        assert_eq!(surface.pixel(0, 0), Some([0, 0, 255, 255]));
        assert_eq!(surface.pixel(2, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn draw_image_scales_nearest() {
        let mut surface = RasterSurface::new(10, 10);
        let image = RasterImage::solid(2, 2, (200, 10, 10));
        surface.draw_image(&image, 3.0, 3.0, 4.0, 4.0);
        assert_eq!(surface.images_drawn(), 1);
        assert_eq!(surface.pixel(3, 3), Some([200, 10, 10, 255]));
        assert_eq!(surface.pixel(6, 6), Some([200, 10, 10, 255]));
        assert_eq!(surface.pixel(7, 7), Some([0, 0, 0, 0]));
    }
}
