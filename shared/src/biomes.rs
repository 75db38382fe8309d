/// Biome category code as produced by the world engine.
pub type CategoryCode = u8;

/// A known biome category: engine code, display label and map color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Biome {
    pub code: CategoryCode,
    pub label: &'static str,
    pub color: (u8, u8, u8),
}

const fn biome(code: CategoryCode, label: &'static str, r: u8, g: u8, b: u8) -> Biome {
    Biome {
        code,
        label,
        color: (r, g, b),
    }
}

/// Overworld, nether and end biomes, ordered by code.
pub const BIOMES: &[Biome] = &[
    biome(0, "Ocean", 0, 0, 112),
    biome(1, "Plains", 141, 179, 96),
    biome(2, "Desert", 250, 148, 24),
    biome(3, "Mountains", 96, 96, 96),
    biome(4, "Forest", 5, 102, 33),
    biome(5, "Taiga", 11, 102, 89),
    biome(6, "Swamp", 7, 249, 178),
    biome(7, "River", 0, 0, 255),
    biome(8, "Nether Wastes", 191, 59, 59),
    biome(9, "The End", 128, 128, 255),
    biome(10, "Frozen Ocean", 112, 112, 214),
    biome(11, "Frozen River", 160, 160, 255),
    biome(12, "Snowy Tundra", 255, 255, 255),
    biome(13, "Snowy Mountains", 160, 160, 160),
    biome(14, "Mushroom Fields", 255, 0, 255),
    biome(15, "Mushroom Field Shore", 160, 0, 255),
    biome(16, "Beach", 250, 222, 85),
    biome(17, "Desert Hills", 210, 95, 18),
    biome(18, "Wooded Hills", 34, 85, 28),
    biome(19, "Taiga Hills", 22, 57, 51),
    biome(20, "Mountain Edge", 114, 120, 154),
    biome(21, "Jungle", 83, 123, 9),
    biome(22, "Jungle Hills", 44, 66, 5),
    biome(23, "Jungle Edge", 98, 139, 23),
    biome(24, "Deep Ocean", 0, 0, 48),
    biome(25, "Stone Shore", 162, 162, 132),
    biome(26, "Snowy Beach", 250, 240, 192),
    biome(27, "Birch Forest", 48, 116, 68),
    biome(28, "Birch Forest Hills", 31, 95, 50),
    biome(29, "Dark Forest", 64, 81, 26),
    biome(30, "Snowy Taiga", 49, 85, 74),
    biome(31, "Snowy Taiga Hills", 36, 63, 54),
    biome(32, "Giant Tree Taiga", 89, 102, 81),
    biome(33, "Giant Tree Taiga Hills", 69, 79, 62),
    biome(34, "Wooded Mountains", 80, 112, 80),
    biome(35, "Savanna", 189, 178, 95),
    biome(36, "Savanna Plateau", 167, 157, 100),
    biome(37, "Badlands", 217, 69, 21),
    biome(38, "Wooded Badlands Plateau", 176, 151, 101),
    biome(39, "Badlands Plateau", 202, 140, 101),
    biome(40, "Small End Islands", 128, 128, 255),
    biome(41, "End Midlands", 128, 128, 255),
    biome(42, "End Highlands", 128, 128, 255),
    biome(43, "End Barrens", 128, 128, 255),
    biome(44, "Warm Ocean", 0, 0, 172),
    biome(45, "Lukewarm Ocean", 0, 0, 144),
    biome(46, "Cold Ocean", 32, 32, 112),
    biome(47, "Deep Warm Ocean", 0, 0, 80),
    biome(48, "Deep Lukewarm Ocean", 0, 0, 64),
    biome(49, "Deep Cold Ocean", 32, 32, 56),
    biome(50, "Deep Frozen Ocean", 64, 64, 144),
    biome(127, "The Void", 0, 0, 0),
    biome(129, "Sunflower Plains", 181, 219, 136),
    biome(130, "Desert Lakes", 255, 188, 64),
    biome(131, "Gravelly Mountains", 136, 136, 136),
    biome(132, "Flower Forest", 45, 142, 73),
    biome(133, "Taiga Mountains", 51, 142, 129),
    biome(134, "Swamp Hills", 47, 255, 218),
    biome(140, "Ice Spikes", 180, 220, 220),
    biome(149, "Modified Jungle", 123, 163, 49),
    biome(151, "Modified Jungle Edge", 138, 179, 63),
    biome(155, "Tall Birch Forest", 88, 156, 108),
    biome(156, "Tall Birch Hills", 71, 135, 90),
    biome(157, "Dark Forest Hills", 104, 121, 66),
    biome(158, "Snowy Taiga Mountains", 89, 125, 114),
    biome(160, "Giant Spruce Taiga", 129, 142, 121),
    biome(161, "Giant Spruce Taiga Hills", 109, 119, 102),
    biome(162, "Modified Gravelly Mountains", 120, 152, 120),
    biome(163, "Shattered Savanna", 229, 218, 135),
    biome(164, "Shattered Savanna Plateau", 207, 197, 140),
    biome(165, "Eroded Badlands", 255, 109, 61),
    biome(166, "Modified Wooded Badlands Plateau", 216, 191, 141),
    biome(167, "Modified Badlands Plateau", 242, 180, 141),
    biome(168, "Bamboo Jungle", 118, 142, 20),
    biome(169, "Bamboo Jungle Hills", 59, 71, 10),
    biome(170, "Soul Sand Valley", 82, 41, 33),
    biome(171, "Crimson Forest", 221, 8, 8),
    biome(172, "Warped Forest", 73, 144, 123),
    biome(173, "Basalt Deltas", 64, 54, 54),
];

pub fn biome_by_code(code: CategoryCode) -> Option<&'static Biome> {
    BIOMES
        .binary_search_by_key(&code, |b| b.code)
        .ok()
        .map(|idx| &BIOMES[idx])
}

pub fn biome_label(code: CategoryCode) -> Option<&'static str> {
    biome_by_code(code).map(|b| b.label)
}

/// Map color for a category code.
/// Codes missing from the table get a deterministic color from the CRC32 of the code,
/// so unknown categories from newer engine versions still render distinguishably.
pub fn category_color(code: CategoryCode) -> (u8, u8, u8) {
    if let Some(b) = biome_by_code(code) {
        return b.color;
    }
    let hash = crc32fast::hash(&[code]);
    let bytes = hash.to_be_bytes();
    (bytes[0], bytes[1], bytes[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_and_unique() {
        for pair in BIOMES.windows(2) {
            assert!(
                pair[0].code < pair[1].code,
                "codes out of order: {} then {}",
                pair[0].code,
                pair[1].code
            );
        }
    }

    #[test]
    fn lookup_known_codes() {
        assert_eq!(biome_label(0), Some("Ocean"));
        assert_eq!(biome_label(1), Some("Plains"));
        assert_eq!(biome_label(173), Some("Basalt Deltas"));
        assert_eq!(category_color(7), (0, 0, 255));
    }

    #[test]
    fn unknown_code_has_no_label_but_stable_color() {
        assert_eq!(biome_label(250), None);
        assert_eq!(category_color(250), category_color(250));
        assert_ne!(category_color(250), category_color(251));
    }
}
