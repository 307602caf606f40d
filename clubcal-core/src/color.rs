//! Per-entity colors for one rendered view.
//!
//! Each owner id hashes to a slot of a small fixed palette. Within a visible
//! set, ids are walked in sorted order and an id whose slot is taken retries
//! with a salted hash. The map is rebuilt for every view, so an entity may
//! get a different color when the visible set changes.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::entity::EntityRef;

/// Salted retries before accepting a collision.
pub const MAX_COLOR_RETRIES: u32 = 16;

/// One palette entry as CSS hex colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteColor {
    pub background: &'static str,
    pub text: &'static str,
    pub border: &'static str,
}

pub const PALETTE: [PaletteColor; 8] = [
    // blue
    PaletteColor {
        background: "#DBEAFE",
        text: "#1E40AF",
        border: "#93C5FD",
    },
    // green
    PaletteColor {
        background: "#DCFCE7",
        text: "#166534",
        border: "#86EFAC",
    },
    // amber
    PaletteColor {
        background: "#FEF3C7",
        text: "#92400E",
        border: "#FCD34D",
    },
    // pink
    PaletteColor {
        background: "#FCE7F3",
        text: "#9D174D",
        border: "#F9A8D4",
    },
    // violet
    PaletteColor {
        background: "#EDE9FE",
        text: "#5B21B6",
        border: "#C4B5FD",
    },
    // orange
    PaletteColor {
        background: "#FFEDD5",
        text: "#9A3412",
        border: "#FDBA74",
    },
    // teal
    PaletteColor {
        background: "#CCFBF1",
        text: "#115E59",
        border: "#5EEAD4",
    },
    // red
    PaletteColor {
        background: "#FEE2E2",
        text: "#991B1B",
        border: "#FCA5A5",
    },
];

/// Rolling `h * 31 + unit` over UTF-16 code units with 32-bit wraparound.
pub fn entity_hash(id: &str) -> i32 {
    id.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32))
}

/// Palette index for an id, ignoring other ids.
pub fn palette_slot(id: &str) -> usize {
    entity_hash(id).unsigned_abs() as usize % PALETTE.len()
}

fn salted_slot(id: &str, attempt: u32) -> usize {
    palette_slot(&format!("{id}-{attempt}"))
}

/// The color chosen for one entity in this view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorAssignment {
    pub slot: usize,
    /// Salt that produced `slot`; 0 for the plain hash
    pub attempt: u32,
    pub color: PaletteColor,
}

/// Owner → color for the current visible set.
///
/// Keyed by the typed owner, so a district and a zone sharing an id are
/// colored separately.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorMap {
    assignments: BTreeMap<EntityRef, ColorAssignment>,
}

impl ColorMap {
    pub fn get(&self, owner: &EntityRef) -> Option<&ColorAssignment> {
        self.assignments.get(owner)
    }

    /// Color for an owner, falling back to its unsalted slot when the owner
    /// was not part of the assigned set.
    pub fn color_for(&self, owner: &EntityRef) -> PaletteColor {
        self.get(owner)
            .map(|a| a.color)
            .unwrap_or(PALETTE[palette_slot(&owner.id)])
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityRef, &ColorAssignment)> {
        self.assignments.iter()
    }
}

/// Serialized as a map keyed by `kind:id`.
impl Serialize for ColorMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.assignments.len()))?;
        for (owner, assignment) in &self.assignments {
            map.serialize_entry(&owner.to_string(), assignment)?;
        }
        map.end()
    }
}

/// Assign colors to a set of owners, avoiding repeated slots where the
/// salted retries allow it. Slots come from the owner id; owners are walked
/// by id, then kind. Duplicates are assigned once.
pub fn assign_colors<'a>(owners: impl IntoIterator<Item = &'a EntityRef>) -> ColorMap {
    let mut sorted: Vec<&EntityRef> = owners.into_iter().collect();
    sorted.sort_unstable_by(|a, b| a.id.cmp(&b.id).then(a.kind.cmp(&b.kind)));
    sorted.dedup();

    let mut claimed: HashSet<usize> = HashSet::new();
    let mut assignments = BTreeMap::new();

    for owner in sorted {
        let id = owner.id.as_str();
        let base = palette_slot(id);
        let (slot, attempt) = if claimed.contains(&base) {
            (1..=MAX_COLOR_RETRIES)
                .map(|attempt| (salted_slot(id, attempt), attempt))
                .find(|(slot, _)| !claimed.contains(slot))
                .unwrap_or((base, 0))
        } else {
            (base, 0)
        };

        claimed.insert(slot);
        assignments.insert(
            owner.clone(),
            ColorAssignment {
                slot,
                attempt,
                color: PALETTE[slot],
            },
        );
    }

    ColorMap { assignments }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn club(id: &str) -> EntityRef {
        EntityRef::club(id)
    }

    #[test]
    fn test_hash_matches_string_hash_code() {
        assert_eq!(entity_hash(""), 0);
        assert_eq!(entity_hash("abc"), 96354);
        // wraps past i32::MAX
        assert_eq!(entity_hash("club-a"), -1357359862);
        assert_eq!(palette_slot("club-a"), 6);
    }

    #[test]
    fn test_slot_is_deterministic() {
        let zone = EntityRef::zone("zone-1");
        assert_eq!(palette_slot("zone-1"), palette_slot("zone-1"));
        let first = assign_colors([&zone]);
        let second = assign_colors([&zone]);
        assert_eq!(first, second);
        assert_eq!(first.get(&zone).unwrap().slot, palette_slot("zone-1"));
    }

    #[test]
    fn test_collision_retries_with_salt() {
        // club-a and district-1 both hash to slot 6
        assert_eq!(palette_slot("district-1"), 6);
        let district = EntityRef::district("district-1");

        let colors = assign_colors(&[district.clone(), club("club-a")]);
        let club_color = colors.get(&club("club-a")).unwrap();
        let district_color = colors.get(&district).unwrap();

        assert_eq!((club_color.slot, club_color.attempt), (6, 0));
        assert_eq!((district_color.slot, district_color.attempt), (2, 1));
    }

    #[test]
    fn test_order_of_input_does_not_matter() {
        let zone = EntityRef::zone("zone-1");
        let district = EntityRef::district("district-1");
        let a = assign_colors(&[
            zone.clone(),
            club("club-a"),
            district.clone(),
            club("club-b"),
        ]);
        let b = assign_colors(&[
            club("club-b"),
            district,
            club("club-a"),
            zone,
            club("club-a"),
        ]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
    }

    #[test]
    fn test_colliding_ids_fill_palette_before_repeating() {
        // all nine hash to slot 0 unsalted
        let ids = [
            "club-7", "club-12", "club-23", "club-34", "club-45", "club-56", "club-67", "club-70",
            "club-78",
        ];
        assert!(ids.iter().all(|id| palette_slot(id) == 0));

        let refs: Vec<EntityRef> = ids.iter().map(|id| club(id)).collect();
        let colors = assign_colors(&refs);
        let mut sorted = ids.to_vec();
        sorted.sort();

        let first_eight: HashSet<usize> = sorted[..8]
            .iter()
            .map(|id| colors.get(&club(id)).unwrap().slot)
            .collect();
        assert_eq!(first_eight.len(), PALETTE.len());

        // the ninth has nowhere to go and keeps its plain slot
        let last = colors.get(&club(sorted[8])).unwrap();
        assert_eq!((last.slot, last.attempt), (0, 0));
    }

    #[test]
    fn test_color_depends_on_visible_set() {
        let district = EntityRef::district("district-1");
        let alone = assign_colors([&district]);
        let shared = assign_colors(&[district.clone(), club("club-a")]);

        assert_eq!(alone.get(&district).unwrap().slot, 6);
        assert_eq!(shared.get(&district).unwrap().slot, 2);
    }

    #[test]
    fn test_shared_id_across_kinds_gets_two_colors() {
        let district = EntityRef::district("x");
        let zone = EntityRef::zone("x");

        let colors = assign_colors(&[zone.clone(), district.clone()]);

        assert_eq!(colors.len(), 2);
        assert_ne!(colors.get(&district).unwrap().slot, colors.get(&zone).unwrap().slot);
        // district sorts before zone, so it keeps the plain slot
        assert_eq!(colors.get(&district).unwrap().attempt, 0);
        assert_eq!(colors.get(&zone).unwrap().attempt, 1);
    }

    #[test]
    fn test_serializes_with_typed_keys() {
        let colors = assign_colors(&[club("club-a")]);
        let json = serde_json::to_value(&colors).unwrap();

        assert_eq!(json["club:club-a"]["slot"], 6);
        assert_eq!(json["club:club-a"]["color"]["text"], PALETTE[6].text);
    }
}
