//! Rarity taxonomy for information entries.

use serde::{Deserialize, Serialize};

/// Rarity levels for information entries, from most common to most guarded.
///
/// The first four levels can be taught to another player and are at risk
/// during an exchange; `Legendary` and `TopSecret` can neither be taught nor
/// lost when receiving.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    TopSecret,
}

/// Immutable per-level attributes of a rarity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RarityProfile {
    /// Name shown to players.
    pub display_name: &'static str,
    /// Color tag used by host-side rendering.
    pub color: &'static str,
    /// Whether entries of this rarity can be taught to another player.
    pub transferable: bool,
    /// Whether entries of this rarity can be lost when receiving a transfer.
    pub loss_vulnerable: bool,
    /// Multiplicative power factor.
    pub power_factor: f64,
}

// Indexed by discriminant; order matches the enum.
const PROFILES: [RarityProfile; 6] = [
    RarityProfile {
        display_name: "Common",
        color: "white",
        transferable: true,
        loss_vulnerable: true,
        power_factor: 1.00,
    },
    RarityProfile {
        display_name: "Uncommon",
        color: "green",
        transferable: true,
        loss_vulnerable: true,
        power_factor: 1.25,
    },
    RarityProfile {
        display_name: "Rare",
        color: "blue",
        transferable: true,
        loss_vulnerable: true,
        power_factor: 1.60,
    },
    RarityProfile {
        display_name: "Epic",
        color: "dark_purple",
        transferable: true,
        loss_vulnerable: true,
        power_factor: 2.15,
    },
    RarityProfile {
        display_name: "Legendary",
        color: "gold",
        transferable: false,
        loss_vulnerable: false,
        power_factor: 3.50,
    },
    RarityProfile {
        display_name: "Top Secret",
        color: "dark_red",
        transferable: false,
        loss_vulnerable: false,
        power_factor: 5.00,
    },
];

impl Rarity {
    /// Every rarity level, in taxonomy order.
    pub const ALL: [Rarity; 6] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::TopSecret,
    ];

    /// Look up the immutable profile for this rarity.
    pub fn profile(self) -> &'static RarityProfile {
        &PROFILES[self as usize]
    }

    /// Whether entries of this rarity can be taught to another player.
    pub fn is_transferable(self) -> bool {
        self.profile().transferable
    }

    /// Whether entries of this rarity can be lost when receiving a transfer.
    pub fn is_loss_vulnerable(self) -> bool {
        self.profile().loss_vulnerable
    }

    /// Multiplicative power factor for this rarity.
    pub fn power_factor(self) -> f64 {
        self.profile().power_factor
    }

    /// Name shown to players.
    pub fn display_name(self) -> &'static str {
        self.profile().display_name
    }

    /// Color tag used by host-side rendering.
    pub fn color(self) -> &'static str {
        self.profile().color
    }

    /// Parse a rarity from its configuration name (case-insensitive).
    ///
    /// Unknown names fall back to [`Rarity::Common`] with a logged warning.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "COMMON" => Rarity::Common,
            "UNCOMMON" => Rarity::Uncommon,
            "RARE" => Rarity::Rare,
            "EPIC" => Rarity::Epic,
            "LEGENDARY" => Rarity::Legendary,
            "TOP_SECRET" => Rarity::TopSecret,
            _ => {
                tracing::warn!(rarity = %name, "unknown rarity name, defaulting to COMMON");
                Rarity::Common
            }
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
