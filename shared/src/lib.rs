pub mod biomes;
pub mod structures;
pub mod world;

pub use biomes::{BIOMES, Biome, CategoryCode, biome_label, category_color};
pub use structures::StructureKind;
pub use world::{BLOCKS_PER_CELL, Seed, WORLD_BORDER, WorldPos, parse_seed};
