use crate::error::MapError;
use crate::viewport::{PanDirection, ScreenRect, ViewportState};

/// A structural viewport operation that issues tile requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FullRedraw,
    Pan(PanDirection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Busy,
}

/// A tile-grid cell to request: biome-cell origin and size, plus where it lands on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRegion {
    pub origin_x: i64,
    pub origin_z: i64,
    pub width: u32,
    pub height: u32,
    pub screen_x: i64,
    pub screen_y: i64,
}

impl TileRegion {
    pub fn screen_rect(&self, pix_dim: u8) -> ScreenRect {
        let pix = i64::from(pix_dim);
        ScreenRect {
            x: self.screen_x,
            y: self.screen_y,
            width: i64::from(self.width) * pix,
            height: i64::from(self.height) * pix,
        }
    }
}

/// Returned by [`TileScheduler::complete`] when the last outstanding request settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settled {
    pub operation: Operation,
    pub redraw_pending: bool,
}

/// Outstanding-request gate for structural operations.
///
/// At most one operation is in flight. A full redraw requested while busy is
/// remembered and handed back when the in-flight operation settles; pans and
/// zooms while busy are rejected.
#[derive(Debug, Default)]
pub struct TileScheduler {
    outstanding: usize,
    operation: Option<Operation>,
    redraw_pending: bool,
}

impl TileScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        if self.outstanding == 0 {
            Phase::Idle
        } else {
            Phase::Busy
        }
    }

    pub fn is_busy(&self) -> bool {
        self.phase() == Phase::Busy
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn redraw_pending(&self) -> bool {
        self.redraw_pending
    }

    /// Check that `operation` may start now.
    pub fn check_idle(&self, operation: Operation) -> Result<(), MapError> {
        if self.is_busy() {
            return Err(MapError::Busy {
                operation,
                outstanding: self.outstanding,
            });
        }
        Ok(())
    }

    /// Start an operation that will issue `count` requests. The counter is set
    /// before any request goes out.
    pub fn begin(&mut self, operation: Operation, count: usize) -> Result<(), MapError> {
        self.check_idle(operation)?;
        self.outstanding = count;
        self.operation = (count > 0).then_some(operation);
        if operation == Operation::FullRedraw {
            self.redraw_pending = false;
        }
        Ok(())
    }

    pub fn defer_redraw(&mut self) {
        self.redraw_pending = true;
    }

    /// Record one completion. Returns `Some` on the edge back to idle.
    pub fn complete(&mut self) -> Option<Settled> {
        if self.outstanding == 0 {
            log::warn!("tile completion arrived with no outstanding requests");
            return None;
        }
        self.outstanding -= 1;
        if self.outstanding > 0 {
            return None;
        }
        let operation = self.operation.take()?;
        let redraw_pending = std::mem::take(&mut self.redraw_pending);
        Some(Settled {
            operation,
            redraw_pending,
        })
    }
}

fn region_at(viewport: &ViewportState, col: i64, row: i64) -> TileRegion {
    let (origin_x, origin_z) = viewport.grid_origin();
    let draw = i64::from(viewport.draw_dim);
    let cx = origin_x + col * draw;
    let cz = origin_z + row * draw;
    let (screen_x, screen_y) = viewport.cell_to_screen(cx, cz);
    TileRegion {
        origin_x: cx,
        origin_z: cz,
        width: viewport.draw_dim,
        height: viewport.draw_dim,
        screen_x,
        screen_y,
    }
}

/// Every tile covering the canvas, column by column.
pub fn full_grid(viewport: &ViewportState) -> Vec<TileRegion> {
    let (cols, rows) = viewport.visible_tile_grid();
    let mut regions = Vec::with_capacity(cols as usize * rows as usize);
    for col in 0..i64::from(cols) {
        for row in 0..i64::from(rows) {
            regions.push(region_at(viewport, col, row));
        }
    }
    regions
}

/// Tiles of the grid that overlap `strip`. For a tile-aligned canvas and a
/// one-tile pan strip this is a single column or row.
pub fn edge_strip(viewport: &ViewportState, strip: ScreenRect) -> Vec<TileRegion> {
    full_grid(viewport)
        .into_iter()
        .filter(|region| region.screen_rect(viewport.pix_dim).intersects(&strip))
        .collect()
}
