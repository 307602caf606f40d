//! The district → zone → club organizational tree.
//!
//! Every event is posted on behalf of exactly one entity. The directory is
//! the in-memory view of the tree that scope resolution walks; it is filled
//! from whatever storage the caller uses.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CalendarError;

/// The three levels of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    District,
    Zone,
    Club,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::District => "district",
            EntityKind::Zone => "zone",
            EntityKind::Club => "club",
        }
    }

    /// The level directly above this one (None for districts).
    pub fn parent_kind(&self) -> Option<EntityKind> {
        match self {
            EntityKind::District => None,
            EntityKind::Zone => Some(EntityKind::District),
            EntityKind::Club => Some(EntityKind::Zone),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            EntityKind::District => "District",
            EntityKind::Zone => "Zone",
            EntityKind::Club => "Club",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "district" => Ok(EntityKind::District),
            "zone" => Ok(EntityKind::Zone),
            "club" => Ok(EntityKind::Club),
            other => Err(CalendarError::Config(format!(
                "Unknown entity type '{other}'. Expected district, zone or club"
            ))),
        }
    }
}

/// A typed pointer to an entity (`entity_type` + `entity_id`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: String,
}

impl EntityRef {
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        EntityRef {
            kind,
            id: id.into(),
        }
    }

    pub fn district(id: impl Into<String>) -> Self {
        Self::new(EntityKind::District, id)
    }

    pub fn zone(id: impl Into<String>) -> Self {
        Self::new(EntityKind::Zone, id)
    }

    pub fn club(id: impl Into<String>) -> Self {
        Self::new(EntityKind::Club, id)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// A node of the tree with its display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub id: String,
    pub name: String,
    /// Zone id for clubs, district id for zones, None for districts.
    pub parent_id: Option<String>,
}

impl Entity {
    pub fn district(id: &str, name: &str) -> Self {
        Entity {
            kind: EntityKind::District,
            id: id.to_string(),
            name: name.to_string(),
            parent_id: None,
        }
    }

    pub fn zone(id: &str, name: &str, district_id: &str) -> Self {
        Entity {
            kind: EntityKind::Zone,
            id: id.to_string(),
            name: name.to_string(),
            parent_id: Some(district_id.to_string()),
        }
    }

    pub fn club(id: &str, name: &str, zone_id: &str) -> Self {
        Entity {
            kind: EntityKind::Club,
            id: id.to_string(),
            name: name.to_string(),
            parent_id: Some(zone_id.to_string()),
        }
    }

    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(self.kind, self.id.clone())
    }

    /// Human-readable label, e.g. `Club "Harbour Lions"`.
    pub fn label(&self) -> String {
        format!("{} \"{}\"", self.kind.label(), self.name)
    }
}

/// In-memory index of the organizational tree.
#[derive(Debug, Clone, Default)]
pub struct EntityDirectory {
    entities: BTreeMap<EntityRef, Entity>,
}

impl EntityDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entities(entities: impl IntoIterator<Item = Entity>) -> Self {
        let mut directory = Self::new();
        for entity in entities {
            directory.insert(entity);
        }
        directory
    }

    /// Add or replace an entity.
    pub fn insert(&mut self, entity: Entity) {
        self.entities.insert(entity.entity_ref(), entity);
    }

    pub fn get(&self, entity: &EntityRef) -> Option<&Entity> {
        self.entities.get(entity)
    }

    pub fn name_of(&self, entity: &EntityRef) -> Option<&str> {
        self.get(entity).map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// The stored parent id of an entity, whether or not the parent exists.
    pub fn parent_of(&self, entity: &EntityRef) -> Option<&str> {
        self.get(entity)?.parent_id.as_deref()
    }

    /// The zone a club belongs to, if the zone is known.
    pub fn zone_of_club(&self, club_id: &str) -> Option<&Entity> {
        let club = self.get(&EntityRef::club(club_id))?;
        self.get(&EntityRef::zone(club.parent_id.as_deref()?))
    }

    /// The district a zone belongs to, if the district is known.
    pub fn district_of_zone(&self, zone_id: &str) -> Option<&Entity> {
        let zone = self.get(&EntityRef::zone(zone_id))?;
        self.get(&EntityRef::district(zone.parent_id.as_deref()?))
    }

    /// Whether the entity and its whole ancestry up to a district exist.
    pub fn resolves(&self, entity: &EntityRef) -> bool {
        match entity.kind {
            EntityKind::District => self.get(entity).is_some(),
            EntityKind::Zone => self.district_of_zone(&entity.id).is_some(),
            EntityKind::Club => self
                .zone_of_club(&entity.id)
                .is_some_and(|zone| self.district_of_zone(&zone.id).is_some()),
        }
    }

    /// Ids of resolvable zones whose parent is `district_id`.
    pub fn zones_in_district(&self, district_id: &str) -> Vec<String> {
        self.children_of(EntityKind::Zone, district_id)
    }

    /// Ids of resolvable clubs whose parent is `zone_id`.
    pub fn clubs_in_zone(&self, zone_id: &str) -> Vec<String> {
        self.children_of(EntityKind::Club, zone_id)
    }

    /// Ids of clubs whose zone belongs to `district_id`.
    pub fn clubs_in_district(&self, district_id: &str) -> Vec<String> {
        self.zones_in_district(district_id)
            .iter()
            .flat_map(|zone_id| self.clubs_in_zone(zone_id))
            .collect()
    }

    fn children_of(&self, kind: EntityKind, parent_id: &str) -> Vec<String> {
        self.entities
            .values()
            .filter(|e| e.kind == kind && e.parent_id.as_deref() == Some(parent_id))
            .filter(|e| self.resolves(&e.entity_ref()))
            .map(|e| e.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_directory;

    #[test]
    fn test_parse_entity_kind() {
        assert_eq!("club".parse::<EntityKind>().unwrap(), EntityKind::Club);
        assert_eq!(" Zone ".parse::<EntityKind>().unwrap(), EntityKind::Zone);
        assert!("region".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_children_lookups() {
        let dir = sample_directory();

        assert_eq!(dir.zones_in_district("district-1"), vec!["zone-1", "zone-2"]);
        assert_eq!(dir.clubs_in_zone("zone-1"), vec!["club-a", "club-b"]);
        assert_eq!(
            dir.clubs_in_district("district-1"),
            vec!["club-a", "club-b", "club-c"]
        );
        assert!(dir.clubs_in_zone("zone-unknown").is_empty());
    }

    #[test]
    fn test_resolves_requires_full_ancestry() {
        let mut dir = sample_directory();
        dir.insert(Entity::club("club-lost", "Lost Club", "zone-missing"));
        dir.insert(Entity::zone("zone-adrift", "Adrift", "district-missing"));
        dir.insert(Entity::club("club-adrift", "Adrift Club", "zone-adrift"));

        assert!(dir.resolves(&EntityRef::club("club-a")));
        assert!(dir.resolves(&EntityRef::zone("zone-2")));
        assert!(!dir.resolves(&EntityRef::club("club-lost")));
        assert!(!dir.resolves(&EntityRef::zone("zone-adrift")));
        assert!(!dir.resolves(&EntityRef::club("club-adrift")));
        assert!(!dir.resolves(&EntityRef::district("nowhere")));
    }

    #[test]
    fn test_same_id_different_kind_is_distinct() {
        let mut dir = EntityDirectory::new();
        dir.insert(Entity::district("x", "District X"));
        dir.insert(Entity::zone("x", "Zone X", "x"));

        assert_eq!(dir.len(), 2);
        assert_eq!(dir.name_of(&EntityRef::zone("x")), Some("Zone X"));
        assert_eq!(dir.zones_in_district("x"), vec!["x"]);
    }
}
