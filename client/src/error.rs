use crate::overlay::PointKind;
use crate::scheduler::Operation;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("tile draw dimension must be positive")]
    InvalidDrawDim,
    #[error("canvas must be at least 1x1 pixels, got {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },
    #[error("{operation:?} rejected: {outstanding} tile requests still outstanding")]
    Busy {
        operation: Operation,
        outstanding: usize,
    },
    #[error("tile at ({origin_x}, {origin_z}) returned {actual} cells, expected {expected}")]
    TileSizeMismatch {
        origin_x: i64,
        origin_z: i64,
        expected: usize,
        actual: usize,
    },
    #[error("{kind:?} point ({x}, {z}) lies outside the world border")]
    PointOutOfBounds { kind: PointKind, x: i64, z: i64 },
    #[error("marker asset {src} failed to load: {reason}")]
    AssetLoad { src: String, reason: String },
}
