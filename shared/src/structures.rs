use serde::{Deserialize, Serialize};

/// Structure kinds the engine can locate, numbered as the engine expects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    DesertPyramid,
    JunglePyramid,
    SwampHut,
    Igloo,
    Village,
    OceanRuin,
    Shipwreck,
    Monument,
    Mansion,
    Outpost,
    RuinedPortal,
    Treasure,
    Fortress,
    Bastion,
    EndCity,
}

impl StructureKind {
    pub const ALL: [StructureKind; 15] = [
        StructureKind::DesertPyramid,
        StructureKind::JunglePyramid,
        StructureKind::SwampHut,
        StructureKind::Igloo,
        StructureKind::Village,
        StructureKind::OceanRuin,
        StructureKind::Shipwreck,
        StructureKind::Monument,
        StructureKind::Mansion,
        StructureKind::Outpost,
        StructureKind::RuinedPortal,
        StructureKind::Treasure,
        StructureKind::Fortress,
        StructureKind::Bastion,
        StructureKind::EndCity,
    ];

    /// Engine-side structure id.
    pub fn engine_id(self) -> u32 {
        match self {
            StructureKind::DesertPyramid => 1,
            StructureKind::JunglePyramid => 2,
            StructureKind::SwampHut => 3,
            StructureKind::Igloo => 4,
            StructureKind::Village => 5,
            StructureKind::OceanRuin => 6,
            StructureKind::Shipwreck => 7,
            StructureKind::Monument => 8,
            StructureKind::Mansion => 9,
            StructureKind::Outpost => 10,
            StructureKind::RuinedPortal => 11,
            StructureKind::Treasure => 12,
            StructureKind::Fortress => 13,
            StructureKind::Bastion => 14,
            StructureKind::EndCity => 15,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StructureKind::DesertPyramid => "Desert Pyramid",
            StructureKind::JunglePyramid => "Jungle Pyramid",
            StructureKind::SwampHut => "Swamp Hut",
            StructureKind::Igloo => "Igloo",
            StructureKind::Village => "Village",
            StructureKind::OceanRuin => "Ocean Ruin",
            StructureKind::Shipwreck => "Shipwreck",
            StructureKind::Monument => "Ocean Monument",
            StructureKind::Mansion => "Woodland Mansion",
            StructureKind::Outpost => "Pillager Outpost",
            StructureKind::RuinedPortal => "Ruined Portal",
            StructureKind::Treasure => "Buried Treasure",
            StructureKind::Fortress => "Nether Fortress",
            StructureKind::Bastion => "Bastion Remnant",
            StructureKind::EndCity => "End City",
        }
    }

    /// Marker image for the overlay. Nether and end structures have none.
    pub fn marker_src(self) -> Option<&'static str> {
        match self {
            StructureKind::DesertPyramid => Some("/img/temple.png"),
            StructureKind::JunglePyramid => Some("/img/jungle.png"),
            StructureKind::SwampHut => Some("/img/hut.png"),
            StructureKind::Igloo => Some("/img/igloo.png"),
            StructureKind::Village => Some("/img/village.png"),
            StructureKind::OceanRuin => Some("/img/ocean.png"),
            StructureKind::Shipwreck => Some("/img/wood.jpg"),
            StructureKind::Monument => Some("/img/guardian.png"),
            StructureKind::Mansion => Some("/img/mansion.png"),
            StructureKind::Outpost => Some("/img/outpost.png"),
            StructureKind::RuinedPortal => Some("/img/portal.png"),
            StructureKind::Treasure => Some("/img/treasure.png"),
            StructureKind::Fortress | StructureKind::Bastion | StructureKind::EndCity => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StructureKind;

    #[test]
    fn engine_ids_are_one_based() {
        for (idx, kind) in StructureKind::ALL.into_iter().enumerate() {
            assert_eq!(kind.engine_id(), idx as u32 + 1);
        }
    }

    #[test]
    fn nether_and_end_structures_have_no_marker() {
        assert!(StructureKind::Fortress.marker_src().is_none());
        assert!(StructureKind::Bastion.marker_src().is_none());
        assert!(StructureKind::EndCity.marker_src().is_none());
        assert_eq!(StructureKind::Village.marker_src(), Some("/img/village.png"));
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&StructureKind::RuinedPortal).unwrap();
        assert_eq!(json, "\"ruined_portal\"");
        let kind: StructureKind = serde_json::from_str("\"end_city\"").unwrap();
        assert_eq!(kind, StructureKind::EndCity);
    }
}
