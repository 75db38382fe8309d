use serde::{Deserialize, Serialize};

/// World seed.
pub type Seed = i64;

/// Number of world blocks covered by one biome cell.
pub const BLOCKS_PER_CELL: i64 = 4;

/// Absolute distance from the origin beyond which no point can exist.
pub const WORLD_BORDER: i64 = 30_000_000;

/// A position in world block coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: i64,
    pub z: i64,
}

impl WorldPos {
    pub const fn new(x: i64, z: i64) -> Self {
        Self { x, z }
    }

    /// Biome cell containing this block.
    pub fn cell(self) -> (i64, i64) {
        (
            self.x.div_euclid(BLOCKS_PER_CELL),
            self.z.div_euclid(BLOCKS_PER_CELL),
        )
    }

    pub fn within_border(self, border: i64) -> bool {
        self.x.abs() <= border && self.z.abs() <= border
    }
}

/// Seed typed by a user: a decimal integer, or any other text hashed the way
/// the game hashes text seeds (Java `String::hashCode`). Blank input is no seed.
pub fn parse_seed(text: &str) -> Option<Seed> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(seed) = text.parse::<i64>() {
        return Some(seed);
    }
    let hash = text
        .encode_utf16()
        .fold(0i32, |acc, unit| acc.wrapping_mul(31).wrapping_add(i32::from(unit)));
    Some(i64::from(hash))
}

impl std::fmt::Display for WorldPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_floors_negative_coordinates() {
        assert_eq!(WorldPos::new(0, 0).cell(), (0, 0));
        assert_eq!(WorldPos::new(3, 7).cell(), (0, 1));
        assert_eq!(WorldPos::new(-1, -4).cell(), (-1, -1));
        assert_eq!(WorldPos::new(-5, 4).cell(), (-2, 1));
    }

    #[test]
    fn parse_seed_accepts_numbers_and_text() {
        assert_eq!(parse_seed(" -42 "), Some(-42));
        assert_eq!(parse_seed("9223372036854775807"), Some(i64::MAX));
        assert_eq!(parse_seed(""), None);
        assert_eq!(parse_seed("   "), None);
        // "a".hashCode() == 97, "hello".hashCode() == 99162322
        assert_eq!(parse_seed("a"), Some(97));
        assert_eq!(parse_seed("hello"), Some(99_162_322));
        // Overflows i64, so it is hashed as text and stays within i32.
        let big = parse_seed("99999999999999999999").unwrap();
        assert!(i32::try_from(big).is_ok());
    }

    #[test]
    fn display_matches_label_format() {
        assert_eq!(WorldPos::new(-120, 48).to_string(), "(-120, 48)");
    }

    #[test]
    fn border_check_is_inclusive() {
        assert!(WorldPos::new(WORLD_BORDER, -WORLD_BORDER).within_border(WORLD_BORDER));
        assert!(!WorldPos::new(WORLD_BORDER + 1, 0).within_border(WORLD_BORDER));
    }
}
