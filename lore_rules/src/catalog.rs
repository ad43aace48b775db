//! Entry definitions - the declarative catalog of learnable information.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::rarity::Rarity;

/// Definition of a single learnable information entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryDef {
    /// Stable identifier referenced by player records and requirements.
    pub id: String,

    /// Human-readable name.
    pub name: String,

    /// Rarity level controlling transferability and loss-vulnerability.
    #[serde(default)]
    pub rarity: Rarity,

    /// Entry that must be learned before this one becomes available.
    #[serde(default)]
    pub requires: Option<String>,

    /// Bonus grants of the form `"bonus_id"` or `"bonus_id:tier"`.
    #[serde(default)]
    pub bonuses: Vec<String>,

    /// Host-defined payload (icons, lore lines) carried but not interpreted.
    #[serde(default)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl EntryDef {
    /// Create a new entry definition with the given ID and display name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rarity: Rarity::Common,
            requires: None,
            bonuses: Vec::new(),
            extra: HashMap::new(),
        }
    }

    /// Set the rarity level.
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Require another entry to be learned before this one.
    pub fn with_requirement(mut self, entry_id: impl Into<String>) -> Self {
        self.requires = Some(entry_id.into());
        self
    }

    /// Add a bonus grant.
    pub fn with_bonus(mut self, bonus: impl Into<String>) -> Self {
        self.bonuses.push(bonus.into());
        self
    }
}

/// The catalog of all entry definitions, keyed by entry ID.
///
/// Built once from declarative definitions at startup and read-only
/// afterwards. Lookups for IDs that were never declared fall back to the
/// least restrictive rarity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryCatalog {
    entries: HashMap<String, EntryDef>,
}

impl EntryCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition, replacing any previous one with the same ID.
    pub fn add(&mut self, def: EntryDef) {
        self.entries.insert(def.id.clone(), def);
    }

    /// Get a definition by ID.
    pub fn get(&self, id: &str) -> Option<&EntryDef> {
        self.entries.get(id)
    }

    /// Whether an entry with this ID is declared.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Rarity of an entry.
    ///
    /// Undeclared IDs default to [`Rarity::Common`] with a logged warning.
    pub fn rarity_of(&self, id: &str) -> Rarity {
        match self.entries.get(id) {
            Some(def) => def.rarity,
            None => {
                tracing::warn!(entry = %id, "rarity lookup for undeclared entry, defaulting to COMMON");
                Rarity::Common
            }
        }
    }

    /// Display name of an entry, or the raw ID when undeclared.
    pub fn name_of<'a>(&'a self, id: &'a str) -> &'a str {
        self.entries.get(id).map(|def| def.name.as_str()).unwrap_or(id)
    }

    /// Iterate over all `(dependent, required)` prerequisite pairs.
    pub fn requirements(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .filter_map(|def| def.requires.as_deref().map(|req| (def.id.as_str(), req)))
    }

    /// Iterate over all definitions.
    pub fn iter(&self) -> impl Iterator<Item = &EntryDef> {
        self.entries.values()
    }

    /// Number of declared entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no declared entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<EntryDef> for EntryCatalog {
    fn from_iter<I: IntoIterator<Item = EntryDef>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for def in iter {
            catalog.add(def);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> EntryCatalog {
        [
            EntryDef::new("morse", "Morse Code"),
            EntryDef::new("ciphers", "Field Ciphers")
                .with_rarity(Rarity::Rare)
                .with_requirement("morse")
                .with_bonus("decode_speed:2"),
            EntryDef::new("mole_identity", "The Mole's Identity").with_rarity(Rarity::Legendary),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_entry_def_builder() {
        let def = EntryDef::new("ciphers", "Field Ciphers")
            .with_rarity(Rarity::Rare)
            .with_requirement("morse")
            .with_bonus("decode_speed:2");

        assert_eq!(def.id, "ciphers");
        assert_eq!(def.rarity, Rarity::Rare);
        assert_eq!(def.requires.as_deref(), Some("morse"));
        assert_eq!(def.bonuses, vec!["decode_speed:2"]);
        assert!(def.extra.is_empty());
    }

    #[test]
    fn test_entry_def_defaults_to_common() {
        let def = EntryDef::new("morse", "Morse Code");
        assert_eq!(def.rarity, Rarity::Common);
        assert!(def.requires.is_none());
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.contains("ciphers"));
        assert_eq!(catalog.rarity_of("mole_identity"), Rarity::Legendary);
        assert_eq!(catalog.name_of("ciphers"), "Field Ciphers");
    }

    #[test]
    fn test_undeclared_entry_defaults() {
        let catalog = sample_catalog();
        assert!(!catalog.contains("ghost"));
        assert_eq!(catalog.rarity_of("ghost"), Rarity::Common);
        assert_eq!(catalog.name_of("ghost"), "ghost");
    }

    #[test]
    fn test_add_replaces_same_id() {
        let mut catalog = sample_catalog();
        catalog.add(EntryDef::new("morse", "Morse Code, Revised").with_rarity(Rarity::Uncommon));

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.rarity_of("morse"), Rarity::Uncommon);
        assert_eq!(catalog.name_of("morse"), "Morse Code, Revised");
    }

    #[test]
    fn test_requirement_pairs() {
        let catalog = sample_catalog();
        let pairs: Vec<(&str, &str)> = catalog.requirements().collect();
        assert_eq!(pairs, vec![("ciphers", "morse")]);
    }

    #[test]
    fn test_entry_def_json_roundtrip() {
        let json = r#"{
            "id": "dead_drops",
            "name": "Dead Drops",
            "rarity": "UNCOMMON",
            "requires": "morse",
            "extra": {"icon": "chest"}
        }"#;

        let def: EntryDef = serde_json::from_str(json).unwrap();
        assert_eq!(def.rarity, Rarity::Uncommon);
        assert_eq!(def.requires.as_deref(), Some("morse"));
        assert!(def.bonuses.is_empty());
        assert_eq!(def.extra["icon"], serde_json::json!("chest"));

        let back = serde_json::to_string(&def).unwrap();
        let reparsed: EntryDef = serde_json::from_str(&back).unwrap();
        assert_eq!(reparsed.id, def.id);
        assert_eq!(reparsed.rarity, def.rarity);
    }
}
