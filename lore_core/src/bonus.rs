//! Bonus grants attached to learned entries.
//!
//! Entry definitions may declare grants like `"chest_loot"` or
//! `"chest_loot:2"`. A player has a bonus when at least one entry they have
//! learned grants it; tiers take the maximum across all granting entries.

use std::collections::HashMap;

use lore_rules::{EntryCatalog, PlayerId};

use crate::store::KnowledgeStore;

/// Registry of declared bonus grants, keyed by entry ID.
#[derive(Debug, Clone, Default)]
pub struct BonusRegistry {
    grants: HashMap<String, Vec<String>>,
}

impl BonusRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every declared grant from the catalog.
    pub fn from_catalog(catalog: &EntryCatalog) -> Self {
        let mut registry = Self::new();
        for def in catalog.iter() {
            if !def.bonuses.is_empty() {
                registry.register(&def.id, def.bonuses.clone());
            }
        }
        registry
    }

    /// Associate a list of grants with an entry, replacing earlier ones.
    pub fn register(&mut self, entry_id: impl Into<String>, bonuses: Vec<String>) {
        self.grants.insert(entry_id.into(), bonuses);
    }

    /// Whether the player holds at least one learned entry granting
    /// `bonus_id`.
    pub fn has_bonus(
        &self,
        store: &mut KnowledgeStore,
        player: PlayerId,
        bonus_id: &str,
    ) -> bool {
        self.grants.iter().any(|(entry_id, bonuses)| {
            store.has_learned(player, entry_id)
                && bonuses.iter().any(|grant| grant_matches(grant, bonus_id))
        })
    }

    /// Highest tier of `bonus_id` granted by the player's learned entries.
    ///
    /// An untiered grant counts as tier 1. A malformed tier suffix is logged
    /// and skipped. Returns 0 when the player has no matching grant.
    pub fn bonus_tier(
        &self,
        store: &mut KnowledgeStore,
        player: PlayerId,
        bonus_id: &str,
    ) -> u32 {
        let mut max_tier = 0;
        for (entry_id, bonuses) in &self.grants {
            if !store.has_learned(player, entry_id) {
                continue;
            }
            for grant in bonuses {
                if grant == bonus_id {
                    max_tier = max_tier.max(1);
                } else if let Some(suffix) = tier_suffix(grant, bonus_id) {
                    match suffix.parse::<u32>() {
                        Ok(tier) => max_tier = max_tier.max(tier),
                        Err(_) => {
                            tracing::warn!(
                                entry = %entry_id,
                                grant = %grant,
                                "ignoring grant with malformed tier"
                            );
                        }
                    }
                }
            }
        }
        max_tier
    }
}

/// `"chest_loot"` and `"chest_loot:2"` both grant `chest_loot`;
/// `"chest_loot_plus"` does not.
fn grant_matches(grant: &str, bonus_id: &str) -> bool {
    grant == bonus_id || tier_suffix(grant, bonus_id).is_some()
}

fn tier_suffix<'a>(grant: &'a str, bonus_id: &str) -> Option<&'a str> {
    grant.strip_prefix(bonus_id)?.strip_prefix(':')
}

#[cfg(test)]
mod tests {
    use super::*;
    use lore_rules::EntryDef;
    use tempfile::TempDir;

    fn registry() -> BonusRegistry {
        let catalog: EntryCatalog = [
            EntryDef::new("scavenging", "Scavenging").with_bonus("chest_loot"),
            EntryDef::new("treasure_maps", "Treasure Maps").with_bonus("chest_loot:3"),
            EntryDef::new("haggling", "Haggling").with_bonus("trade_discount:2"),
            EntryDef::new("bad_luck", "Bad Luck").with_bonus("chest_loot:lots"),
            EntryDef::new("plain", "Plain Knowledge"),
        ]
        .into_iter()
        .collect();
        BonusRegistry::from_catalog(&catalog)
    }

    fn temp_store() -> (TempDir, KnowledgeStore) {
        let dir = TempDir::new().unwrap();
        let store = KnowledgeStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_unlearned_entries_grant_nothing() {
        let registry = registry();
        let (_dir, mut store) = temp_store();
        let player = PlayerId::new();

        assert!(!registry.has_bonus(&mut store, player, "chest_loot"));
        assert_eq!(registry.bonus_tier(&mut store, player, "chest_loot"), 0);
    }

    #[test]
    fn test_untiered_grant_counts_as_tier_one() {
        let registry = registry();
        let (_dir, mut store) = temp_store();
        let player = PlayerId::new();

        store.learn(player, "scavenging");
        assert!(registry.has_bonus(&mut store, player, "chest_loot"));
        assert_eq!(registry.bonus_tier(&mut store, player, "chest_loot"), 1);
    }

    #[test]
    fn test_tier_is_maximum_across_entries() {
        let registry = registry();
        let (_dir, mut store) = temp_store();
        let player = PlayerId::new();

        store.learn(player, "scavenging");
        store.learn(player, "treasure_maps");
        assert_eq!(registry.bonus_tier(&mut store, player, "chest_loot"), 3);
    }

    #[test]
    fn test_bonus_ids_do_not_prefix_match() {
        let mut registry = BonusRegistry::new();
        registry.register("lucky", vec!["chest_loot_plus".to_string()]);

        let (_dir, mut store) = temp_store();
        let player = PlayerId::new();
        store.learn(player, "lucky");

        assert!(!registry.has_bonus(&mut store, player, "chest_loot"));
        assert!(registry.has_bonus(&mut store, player, "chest_loot_plus"));
    }

    #[test]
    fn test_malformed_tier_is_skipped() {
        let registry = registry();
        let (_dir, mut store) = temp_store();
        let player = PlayerId::new();

        store.learn(player, "bad_luck");
        // the grant still matches, but contributes no tier
        assert!(registry.has_bonus(&mut store, player, "chest_loot"));
        assert_eq!(registry.bonus_tier(&mut store, player, "chest_loot"), 0);
    }

    #[test]
    fn test_separate_bonus_ids_do_not_mix() {
        let registry = registry();
        let (_dir, mut store) = temp_store();
        let player = PlayerId::new();

        store.learn(player, "haggling");
        assert_eq!(registry.bonus_tier(&mut store, player, "trade_discount"), 2);
        assert_eq!(registry.bonus_tier(&mut store, player, "chest_loot"), 0);
    }
}
