use serde::{Deserialize, Serialize};

use seedmap_shared::{Seed, StructureKind, WORLD_BORDER};

use crate::error::MapError;
use crate::surface::BACKGROUND;
use crate::viewport::{ViewportState, clamp_pix_dim};

pub const DEFAULT_DRAW_DIM: u32 = 50;
pub const DEFAULT_PIX_DIM: u8 = 1;
pub const DEFAULT_STRONGHOLD_COUNT: u32 = 3;
pub const DEFAULT_STRUCTURE_REGION_RADIUS: u32 = 50;
pub const DEFAULT_GAME_VERSION: &str = "1.16";
pub const SETTINGS_STORAGE_KEY: &str = "seedmap_settings";

/// Construction-time parameters of a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub draw_dim: u32,
    pub pix_dim: u8,
    /// Initial offsets in tile-grid units; `None` centres the world origin.
    pub offset_x: Option<i64>,
    pub offset_z: Option<i64>,
    pub background: (u8, u8, u8),
    pub stronghold_count: u32,
    pub structure_region_radius: u32,
    pub world_border: i64,
    pub game_version: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            canvas_width: 500,
            canvas_height: 500,
            draw_dim: DEFAULT_DRAW_DIM,
            pix_dim: DEFAULT_PIX_DIM,
            offset_x: None,
            offset_z: None,
            background: BACKGROUND,
            stronghold_count: DEFAULT_STRONGHOLD_COUNT,
            structure_region_radius: DEFAULT_STRUCTURE_REGION_RADIUS,
            world_border: WORLD_BORDER,
            game_version: DEFAULT_GAME_VERSION.to_string(),
        }
    }
}

impl MapConfig {
    pub fn with_canvas(canvas_width: u32, canvas_height: u32) -> Self {
        Self {
            canvas_width,
            canvas_height,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), MapError> {
        if self.draw_dim == 0 {
            return Err(MapError::InvalidDrawDim);
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(MapError::EmptyCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        Ok(())
    }

    /// Initial viewport. Zoom is clamped into range.
    pub fn viewport(&self) -> ViewportState {
        let draw = i64::from(self.draw_dim.max(1));
        ViewportState {
            draw_dim: self.draw_dim,
            pix_dim: clamp_pix_dim(self.pix_dim),
            offset_x: self
                .offset_x
                .unwrap_or(i64::from(self.canvas_width) / draw / 2),
            offset_z: self
                .offset_z
                .unwrap_or(i64::from(self.canvas_height) / draw / 2),
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
        }
    }
}

/// User-facing settings persisted by the web app between visits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub seed: Option<Seed>,
    pub game_version: String,
    pub show_spawn: bool,
    pub show_strongholds: bool,
    pub show_coordinate_labels: bool,
    pub structures: Vec<StructureKind>,
    pub pix_dim: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            game_version: DEFAULT_GAME_VERSION.to_string(),
            show_spawn: false,
            show_strongholds: false,
            show_coordinate_labels: true,
            structures: Vec::new(),
            pix_dim: DEFAULT_PIX_DIM,
        }
    }
}

impl Settings {
    pub fn map_config(&self, canvas_width: u32, canvas_height: u32) -> MapConfig {
        MapConfig {
            pix_dim: clamp_pix_dim(self.pix_dim),
            game_version: self.game_version.clone(),
            ..MapConfig::with_canvas(canvas_width, canvas_height)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_viewport_centres_origin() {
        let vp = MapConfig::default().viewport();
        assert_eq!((vp.offset_x, vp.offset_z), (5, 5));
        assert_eq!(vp.pix_dim, 1);
        assert_eq!(vp.world_to_screen(0, 0), (250, 250));
    }

    #[test]
    fn explicit_offsets_and_zoom_clamp() {
        let config = MapConfig {
            offset_x: Some(-2),
            offset_z: Some(7),
            pix_dim: 12,
            ..MapConfig::default()
        };
        let vp = config.viewport();
        assert_eq!((vp.offset_x, vp.offset_z, vp.pix_dim), (-2, 7, 5));
    }

    #[test]
    fn validate_rejects_degenerate_configs() {
        assert_eq!(
            MapConfig {
                draw_dim: 0,
                ..MapConfig::default()
            }
            .validate(),
            Err(MapError::InvalidDrawDim)
        );
        assert_eq!(
            MapConfig::with_canvas(0, 10).validate(),
            Err(MapError::EmptyCanvas {
                width: 0,
                height: 10
            })
        );
        assert!(MapConfig::default().validate().is_ok());
    }

    #[test]
    fn settings_fill_missing_fields_from_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"seed": -42, "structures": ["village"]}"#).unwrap();
        assert_eq!(settings.seed, Some(-42));
        assert_eq!(settings.structures, vec![StructureKind::Village]);
        assert_eq!(settings.game_version, DEFAULT_GAME_VERSION);
        assert!(settings.show_coordinate_labels);
    }
}
