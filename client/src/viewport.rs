use seedmap_shared::WorldPos;

pub const MIN_PIX_DIM: u8 = 1;
pub const MAX_PIX_DIM: u8 = 5;

/// Viewport manages the transformation between world blocks, biome cells,
/// tile-grid cells and canvas pixels.
///
/// Offsets are in tile-grid units: one unit moves the raster by `draw_dim`
/// screen pixels. `pix_dim` is the zoom, in screen pixels per biome cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportState {
    pub draw_dim: u32,
    pub pix_dim: u8,
    pub offset_x: i64,
    pub offset_z: i64,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

/// The parts of a viewport that decide where a world position lands on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewportSnapshot {
    pub offset_x: i64,
    pub offset_z: i64,
    pub pix_dim: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
}

impl PanDirection {
    pub const ALL: [PanDirection; 4] = [
        PanDirection::Up,
        PanDirection::Down,
        PanDirection::Left,
        PanDirection::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            PanDirection::Up => PanDirection::Down,
            PanDirection::Down => PanDirection::Up,
            PanDirection::Left => PanDirection::Right,
            PanDirection::Right => PanDirection::Left,
        }
    }
}

/// Axis-aligned rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl ScreenRect {
    pub fn right(&self) -> i64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i64 {
        self.y + self.height
    }

    pub fn intersects(&self, other: &ScreenRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

pub fn clamp_pix_dim(pix_dim: u8) -> u8 {
    pix_dim.clamp(MIN_PIX_DIM, MAX_PIX_DIM)
}

impl ViewportState {
    pub fn snapshot(&self) -> ViewportSnapshot {
        ViewportSnapshot {
            offset_x: self.offset_x,
            offset_z: self.offset_z,
            pix_dim: self.pix_dim,
        }
    }

    fn pix(&self) -> i64 {
        i64::from(self.pix_dim)
    }

    fn draw(&self) -> i64 {
        i64::from(self.draw_dim)
    }

    /// Screen pixels covered by one tile along either axis.
    pub fn tile_extent_px(&self) -> i64 {
        self.draw() * self.pix()
    }

    /// Offset units moved by a one-tile pan.
    pub fn pan_step(&self) -> i64 {
        self.pix()
    }

    /// Screen position of the top-left corner of a biome cell.
    pub fn cell_to_screen(&self, cx: i64, cz: i64) -> (i64, i64) {
        (
            cx * self.pix() + self.offset_x * self.draw(),
            cz * self.pix() + self.offset_z * self.draw(),
        )
    }

    /// Convert world block coordinates to screen pixels.
    pub fn world_to_screen(&self, wx: i64, wz: i64) -> (i64, i64) {
        let (cx, cz) = WorldPos::new(wx, wz).cell();
        self.cell_to_screen(cx, cz)
    }

    /// Markers are drawn only strictly inside the canvas.
    pub fn is_visible(&self, sx: i64, sz: i64) -> bool {
        sx > 0 && sz > 0 && sx < i64::from(self.canvas_width) && sz < i64::from(self.canvas_height)
    }

    /// Convert a screen pixel to the biome cell under it.
    pub fn screen_to_world(&self, px: f64, pz: f64) -> (i64, i64) {
        // floor(px / pix - offset * draw / pix), with the offset folded in
        // before dividing so exact pixel boundaries stay exact.
        let pix = self.pix() as f64;
        let cx = ((px - (self.offset_x * self.draw()) as f64) / pix).floor() as i64;
        let cz = ((pz - (self.offset_z * self.draw()) as f64) / pix).floor() as i64;
        (cx, cz)
    }

    /// Biome cell at the top-left tile of the grid. Its screen position is in `(-pix_dim, 0]`.
    pub fn grid_origin(&self) -> (i64, i64) {
        (
            (-self.offset_x * self.draw()).div_euclid(self.pix()),
            (-self.offset_z * self.draw()).div_euclid(self.pix()),
        )
    }

    /// Number of tile columns and rows needed to cover the canvas.
    pub fn visible_tile_grid(&self) -> (u32, u32) {
        let extent = self.tile_extent_px();
        let (origin_x, origin_z) = self.grid_origin();
        let (sx, sz) = self.cell_to_screen(origin_x, origin_z);
        let cols = (i64::from(self.canvas_width) - sx + extent - 1) / extent;
        let rows = (i64::from(self.canvas_height) - sz + extent - 1) / extent;
        (cols.max(1) as u32, rows.max(1) as u32)
    }

    pub fn canvas_rect(&self) -> ScreenRect {
        ScreenRect {
            x: 0,
            y: 0,
            width: i64::from(self.canvas_width),
            height: i64::from(self.canvas_height),
        }
    }

    /// Move the viewport one tile. Returns the raster shift `(dx, dy)` in pixels
    /// and the canvas strip the shift leaves uncovered.
    pub fn pan(&mut self, direction: PanDirection) -> ((i64, i64), ScreenRect) {
        let step = self.pan_step();
        let shift = self.tile_extent_px();
        let width = i64::from(self.canvas_width);
        let height = i64::from(self.canvas_height);
        match direction {
            PanDirection::Left => {
                self.offset_x += step;
                let strip = ScreenRect {
                    x: 0,
                    y: 0,
                    width: shift.min(width),
                    height,
                };
                ((shift, 0), strip)
            }
            PanDirection::Right => {
                self.offset_x -= step;
                let strip = ScreenRect {
                    x: (width - shift).max(0),
                    y: 0,
                    width: shift.min(width),
                    height,
                };
                ((-shift, 0), strip)
            }
            PanDirection::Up => {
                self.offset_z += step;
                let strip = ScreenRect {
                    x: 0,
                    y: 0,
                    width,
                    height: shift.min(height),
                };
                ((0, shift), strip)
            }
            PanDirection::Down => {
                self.offset_z -= step;
                let strip = ScreenRect {
                    x: 0,
                    y: (height - shift).max(0),
                    width,
                    height: shift.min(height),
                };
                ((0, -shift), strip)
            }
        }
    }

    /// Step the zoom by `delta`. Returns false when already at the bound.
    pub fn zoom_by(&mut self, delta: i8) -> bool {
        let next = (i16::from(self.pix_dim) + i16::from(delta))
            .clamp(i16::from(MIN_PIX_DIM), i16::from(MAX_PIX_DIM)) as u8;
        if next == self.pix_dim {
            return false;
        }
        self.pix_dim = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn vp(draw_dim: u32, pix_dim: u8, offset_x: i64, offset_z: i64) -> ViewportState {
        ViewportState {
            draw_dim,
            pix_dim,
            offset_x,
            offset_z,
            canvas_width: 500,
            canvas_height: 500,
        }
    }

    #[test]
    fn world_to_screen_quantizes_to_cells() {
        let v = vp(50, 1, 5, 5);
        assert_eq!(v.world_to_screen(0, 0), (250, 250));
        assert_eq!(v.world_to_screen(3, 3), (250, 250));
        assert_eq!(v.world_to_screen(4, -4), (251, 249));
        assert_eq!(v.world_to_screen(-1, -1), (249, 249));

        let zoomed = vp(50, 3, 5, 5);
        assert_eq!(zoomed.world_to_screen(40, 0), (10 * 3 + 250, 250));
    }

    #[test]
    fn visibility_is_strict() {
        let v = vp(50, 1, 0, 0);
        assert!(!v.is_visible(0, 10));
        assert!(!v.is_visible(10, 0));
        assert!(v.is_visible(1, 1));
        assert!(v.is_visible(499, 499));
        assert!(!v.is_visible(500, 10));
    }

    #[test]
    fn screen_to_world_at_canvas_centre() {
        let v = vp(50, 1, 5, 5);
        assert_eq!(v.screen_to_world(250.0, 250.0), (0, 0));
        assert_eq!(v.screen_to_world(249.5, 250.9), (-1, 0));
    }

    #[test]
    fn visible_grid_for_aligned_canvas() {
        assert_eq!(vp(50, 1, 5, 5).visible_tile_grid(), (10, 10));
        assert_eq!(vp(50, 2, 4, 4).visible_tile_grid(), (5, 5));
        assert_eq!(vp(60, 1, 0, 0).visible_tile_grid(), (9, 9));
    }

    #[test]
    fn grid_origin_never_leaves_a_gap() {
        for pix in MIN_PIX_DIM..=MAX_PIX_DIM {
            for offset in -7..7 {
                let v = vp(50, pix, offset, -offset);
                let (ox, oz) = v.grid_origin();
                let (sx, sz) = v.cell_to_screen(ox, oz);
                let p = i64::from(pix);
                assert!(sx <= 0 && sx > -p, "sx={sx} pix={pix} offset={offset}");
                assert!(sz <= 0 && sz > -p, "sz={sz} pix={pix} offset={offset}");

                let (cols, rows) = v.visible_tile_grid();
                assert!(sx + i64::from(cols) * v.tile_extent_px() >= 500);
                assert!(sz + i64::from(rows) * v.tile_extent_px() >= 500);
            }
        }
    }

    #[test]
    fn pan_shifts_by_one_tile_and_reverses() {
        let mut v = vp(50, 2, 3, 3);
        let before = v;

        let (shift, strip) = v.pan(PanDirection::Left);
        assert_eq!(shift, (100, 0));
        assert_eq!(strip, ScreenRect { x: 0, y: 0, width: 100, height: 500 });
        assert_eq!(v.world_to_screen(0, 0).0, before.world_to_screen(0, 0).0 + 100);

        let (shift, strip) = v.pan(PanDirection::Right);
        assert_eq!(shift, (-100, 0));
        assert_eq!(strip.x, 400);
        assert_eq!(v, before);

        let (shift, strip) = v.pan(PanDirection::Down);
        assert_eq!(shift, (0, -100));
        assert_eq!(strip.y, 400);
        v.pan(PanDirection::Up);
        assert_eq!(v, before);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut v = vp(50, MAX_PIX_DIM, 0, 0);
        assert!(!v.zoom_by(1));
        assert_eq!(v.pix_dim, MAX_PIX_DIM);
        assert!(v.zoom_by(-1));
        assert_eq!(v.pix_dim, MAX_PIX_DIM - 1);

        let mut v = vp(50, MIN_PIX_DIM, 0, 0);
        assert!(!v.zoom_by(-1));
        assert_eq!(clamp_pix_dim(0), MIN_PIX_DIM);
        assert_eq!(clamp_pix_dim(9), MAX_PIX_DIM);
    }

    #[test]
    fn snapshot_tracks_pan_and_zoom() {
        let mut v = vp(50, 1, 0, 0);
        let s1 = v.snapshot();
        v.pan(PanDirection::Up);
        assert_ne!(v.snapshot(), s1);
        v.pan(PanDirection::Down);
        assert_eq!(v.snapshot(), s1);
        v.zoom_by(1);
        assert_ne!(v.snapshot(), s1);
    }

    proptest! {
        #[test]
        fn screen_to_world_inverts_world_to_screen(
            draw_dim in 1u32..200,
            pix_dim in MIN_PIX_DIM..=MAX_PIX_DIM,
            offset_x in -1_000i64..1_000,
            offset_z in -1_000i64..1_000,
            wx in -1_000_000i64..1_000_000,
            wz in -1_000_000i64..1_000_000,
        ) {
            let v = vp(draw_dim, pix_dim, offset_x, offset_z);
            let (sx, sz) = v.world_to_screen(wx, wz);
            prop_assert_eq!(
                v.screen_to_world(sx as f64, sz as f64),
                (wx.div_euclid(4), wz.div_euclid(4))
            );
            // Every pixel inside the cell's block maps back to the same cell.
            let last = f64::from(pix_dim) - 0.5;
            prop_assert_eq!(
                v.screen_to_world(sx as f64 + last, sz as f64 + last),
                (wx.div_euclid(4), wz.div_euclid(4))
            );
        }
    }
}
