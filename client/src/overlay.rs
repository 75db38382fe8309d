use std::collections::{BTreeMap, BTreeSet, HashSet};

use seedmap_shared::{StructureKind, WorldPos};

use crate::assets::MarkerAsset;
use crate::error::MapError;
use crate::viewport::ViewportState;

/// A family of overlay points fetched with one point-finder call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PointKind {
    Spawn,
    Strongholds,
    Structure(StructureKind),
}

impl PointKind {
    pub fn asset(self) -> MarkerAsset {
        match self {
            PointKind::Spawn => MarkerAsset::Spawn,
            PointKind::Strongholds => MarkerAsset::Stronghold,
            PointKind::Structure(kind) => MarkerAsset::Structure(kind),
        }
    }
}

/// One overlay point placed on the current viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub kind: PointKind,
    pub pos: WorldPos,
    pub screen: (i64, i64),
}

impl Marker {
    pub fn label(&self) -> String {
        self.pos.to_string()
    }
}

/// Points of interest for the active seed, plus which kinds are shown.
///
/// Shown flags outlive a seed change; the points do not.
#[derive(Debug, Default)]
pub struct OverlayState {
    spawn_shown: bool,
    spawn: Option<WorldPos>,
    strongholds_shown: bool,
    strongholds: Option<Vec<WorldPos>>,
    structures_shown: BTreeSet<StructureKind>,
    structures: BTreeMap<StructureKind, Vec<WorldPos>>,
    in_flight: HashSet<PointKind>,
}

impl OverlayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_shown(&self, kind: PointKind) -> bool {
        match kind {
            PointKind::Spawn => self.spawn_shown,
            PointKind::Strongholds => self.strongholds_shown,
            PointKind::Structure(s) => self.structures_shown.contains(&s),
        }
    }

    /// Returns true if the flag changed.
    pub fn set_shown(&mut self, kind: PointKind, shown: bool) -> bool {
        if self.is_shown(kind) == shown {
            return false;
        }
        match kind {
            PointKind::Spawn => self.spawn_shown = shown,
            PointKind::Strongholds => self.strongholds_shown = shown,
            PointKind::Structure(s) => {
                if shown {
                    self.structures_shown.insert(s);
                } else {
                    self.structures_shown.remove(&s);
                }
            }
        }
        true
    }

    /// Replace the set of shown structure kinds. Returns true if it changed.
    pub fn set_visible_structures(&mut self, kinds: &[StructureKind]) -> bool {
        let next: BTreeSet<StructureKind> = kinds.iter().copied().collect();
        if next == self.structures_shown {
            return false;
        }
        self.structures_shown = next;
        true
    }

    pub fn visible_structures(&self) -> impl Iterator<Item = StructureKind> + '_ {
        self.structures_shown.iter().copied()
    }

    pub fn has_points(&self, kind: PointKind) -> bool {
        match kind {
            PointKind::Spawn => self.spawn.is_some(),
            PointKind::Strongholds => self.strongholds.is_some(),
            PointKind::Structure(s) => self.structures.contains_key(&s),
        }
    }

    pub fn points(&self, kind: PointKind) -> Vec<WorldPos> {
        match kind {
            PointKind::Spawn => self.spawn.into_iter().collect(),
            PointKind::Strongholds => self.strongholds.clone().unwrap_or_default(),
            PointKind::Structure(s) => self.structures.get(&s).cloned().unwrap_or_default(),
        }
    }

    /// True when `kind` has neither cached points nor a fetch in flight.
    /// Marks it in flight so the caller issues exactly one request.
    pub fn claim_fetch(&mut self, kind: PointKind) -> bool {
        if self.has_points(kind) || self.in_flight.contains(&kind) {
            return false;
        }
        self.in_flight.insert(kind);
        true
    }

    pub fn is_fetching(&self, kind: PointKind) -> bool {
        self.in_flight.contains(&kind)
    }

    /// Store point-finder results, dropping points outside `border`.
    /// Returns the rejected points as errors for logging.
    pub fn accept(&mut self, kind: PointKind, points: Vec<WorldPos>, border: i64) -> Vec<MapError> {
        self.in_flight.remove(&kind);
        let (kept, rejected): (Vec<WorldPos>, Vec<WorldPos>) =
            points.into_iter().partition(|p| p.within_border(border));
        match kind {
            PointKind::Spawn => self.spawn = kept.first().copied(),
            PointKind::Strongholds => self.strongholds = Some(kept),
            PointKind::Structure(s) => {
                self.structures.insert(s, kept);
            }
        }
        rejected
            .into_iter()
            .map(|p| MapError::PointOutOfBounds {
                kind,
                x: p.x,
                z: p.z,
            })
            .collect()
    }

    /// Drop all fetched points. Returns the shown kinds, which need fetching again.
    pub fn reset_for_new_seed(&mut self) -> Vec<PointKind> {
        self.spawn = None;
        self.strongholds = None;
        self.structures.clear();
        self.in_flight.clear();
        self.shown_kinds()
    }

    pub fn shown_kinds(&self) -> Vec<PointKind> {
        let mut kinds = Vec::new();
        if self.spawn_shown {
            kinds.push(PointKind::Spawn);
        }
        if self.strongholds_shown {
            kinds.push(PointKind::Strongholds);
        }
        kinds.extend(self.structures_shown.iter().map(|&s| PointKind::Structure(s)));
        kinds
    }

    /// Visible markers for the shown kinds, or for `only` when given.
    pub fn markers(&self, viewport: &ViewportState, only: Option<PointKind>) -> Vec<Marker> {
        let mut markers = Vec::new();
        for kind in self.shown_kinds() {
            if only.is_some_and(|o| o != kind) {
                continue;
            }
            for pos in self.points(kind) {
                let screen = viewport.world_to_screen(pos.x, pos.z);
                if viewport.is_visible(screen.0, screen.1) {
                    markers.push(Marker { kind, pos, screen });
                }
            }
        }
        markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> ViewportState {
        ViewportState {
            draw_dim: 50,
            pix_dim: 1,
            offset_x: 5,
            offset_z: 5,
            canvas_width: 500,
            canvas_height: 500,
        }
    }

    #[test]
    fn claim_fetch_once_per_kind() {
        let mut overlay = OverlayState::new();
        assert!(overlay.claim_fetch(PointKind::Spawn));
        assert!(!overlay.claim_fetch(PointKind::Spawn));
        overlay.accept(PointKind::Spawn, vec![WorldPos::new(8, 8)], 1_000);
        assert!(!overlay.claim_fetch(PointKind::Spawn));
        // Showing is the caller's decision, not the fetch's.
        assert!(!overlay.is_shown(PointKind::Spawn));
    }

    #[test]
    fn accept_drops_out_of_border_points() {
        let mut overlay = OverlayState::new();
        let errors = overlay.accept(
            PointKind::Strongholds,
            vec![WorldPos::new(100, 100), WorldPos::new(5_000, 0)],
            1_000,
        );
        assert_eq!(
            errors,
            vec![MapError::PointOutOfBounds {
                kind: PointKind::Strongholds,
                x: 5_000,
                z: 0
            }]
        );
        assert_eq!(overlay.points(PointKind::Strongholds), vec![WorldPos::new(100, 100)]);
    }

    #[test]
    fn seed_reset_keeps_flags_and_clears_points() {
        let mut overlay = OverlayState::new();
        overlay.set_shown(PointKind::Spawn, true);
        overlay.accept(PointKind::Spawn, vec![WorldPos::new(8, 8)], 1_000);
        overlay.set_shown(PointKind::Structure(StructureKind::Village), true);
        overlay.claim_fetch(PointKind::Structure(StructureKind::Village));

        let refetch = overlay.reset_for_new_seed();
        assert_eq!(
            refetch,
            vec![PointKind::Spawn, PointKind::Structure(StructureKind::Village)]
        );
        assert!(!overlay.has_points(PointKind::Spawn));
        assert!(!overlay.is_fetching(PointKind::Structure(StructureKind::Village)));
        assert!(overlay.is_shown(PointKind::Spawn));
    }

    #[test]
    fn markers_skip_hidden_kinds_and_offscreen_points() {
        let mut overlay = OverlayState::new();
        overlay.accept(
            PointKind::Strongholds,
            vec![WorldPos::new(400, -400), WorldPos::new(4_000, 0)],
            WORLD,
        );
        overlay.set_shown(PointKind::Strongholds, true);
        overlay.accept(PointKind::Spawn, vec![WorldPos::new(0, 0)], WORLD);

        let markers = overlay.markers(&viewport(), None);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].kind, PointKind::Strongholds);
        assert_eq!(markers[0].screen, (350, 150));
        assert_eq!(markers[0].label(), "(400, -400)");

        assert!(overlay.markers(&viewport(), Some(PointKind::Spawn)).is_empty());
    }

    #[test]
    fn visible_structures_replace_the_set() {
        let mut overlay = OverlayState::new();
        assert!(overlay.set_visible_structures(&[StructureKind::Village, StructureKind::Igloo]));
        assert!(!overlay.set_visible_structures(&[StructureKind::Igloo, StructureKind::Village]));
        assert!(overlay.set_visible_structures(&[StructureKind::Igloo]));
        assert_eq!(
            overlay.visible_structures().collect::<Vec<_>>(),
            vec![StructureKind::Igloo]
        );
    }

    const WORLD: i64 = seedmap_shared::WORLD_BORDER;
}
