//! The asymmetric teach exchange.
//!
//! `teach` moves one entry from a giver to a receiver. The receiver gains
//! the entry but risks permanently losing others it already holds; the giver
//! permanently loses the entry and everything that depends on it. All checks
//! run before any mutation, and both players are flushed before the call
//! returns.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use lore_rules::{EntryCatalog, PlayerId, TransferConfig};

use crate::graph::DependencyGraph;
use crate::store::KnowledgeStore;

/// Outcome of a [`TransferEngine::teach`] call.
///
/// Validation failures are ordinary outcomes, not errors; the loss lists
/// exist only on `Success`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeachOutcome {
    /// The transfer completed and both players have been persisted.
    Success {
        /// Entries the receiver permanently lost to the reception roll.
        receiver_losses: Vec<String>,
        /// Entries the giver permanently lost to cascade obsolescence.
        giver_losses: Vec<String>,
    },
    /// The entry's rarity forbids teaching it (Legendary / TopSecret).
    NotTransferable,
    /// The giver does not hold the entry.
    GiverDoesNotHave,
    /// The receiver already holds the entry.
    ReceiverAlreadyHas,
    /// The entry is permanently blocked for the receiver.
    ReceiverBlocked,
}

impl TeachOutcome {
    /// Whether the transfer went through.
    pub fn is_success(&self) -> bool {
        matches!(self, TeachOutcome::Success { .. })
    }
}

/// Applies the asymmetric exchange against a [`KnowledgeStore`].
pub struct TransferEngine {
    catalog: EntryCatalog,
    graph: DependencyGraph,
    config: TransferConfig,
    rng: StdRng,
}

impl TransferEngine {
    /// Create an engine for the given catalog and configuration.
    ///
    /// The dependency graph is derived from the catalog's requirement
    /// declarations once, here.
    pub fn new(catalog: EntryCatalog, config: TransferConfig) -> Self {
        Self::with_rng(catalog, config, StdRng::from_entropy())
    }

    /// Create an engine with a caller-supplied RNG, for deterministic runs.
    pub fn with_rng(catalog: EntryCatalog, config: TransferConfig, rng: StdRng) -> Self {
        let graph = DependencyGraph::from_catalog(&catalog);
        Self {
            catalog,
            graph,
            config,
            rng,
        }
    }

    /// The catalog this engine was built from.
    pub fn catalog(&self) -> &EntryCatalog {
        &self.catalog
    }

    /// The dependency graph derived from the catalog.
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Teach `entry_id` from `giver` to `receiver`.
    ///
    /// Preconditions are checked in order and short-circuit without touching
    /// any state. On success, three effects are committed before returning:
    /// the receiver gains the entry, every other loss-vulnerable entry the
    /// receiver holds faces an independent loss roll, and the giver
    /// permanently loses the entry plus everything depending on it.
    pub fn teach(
        &mut self,
        store: &mut KnowledgeStore,
        giver: PlayerId,
        receiver: PlayerId,
        entry_id: &str,
    ) -> TeachOutcome {
        if !self.catalog.rarity_of(entry_id).is_transferable() {
            return TeachOutcome::NotTransferable;
        }
        if !store.has_learned(giver, entry_id) {
            return TeachOutcome::GiverDoesNotHave;
        }
        if store.has_learned(receiver, entry_id) {
            return TeachOutcome::ReceiverAlreadyHas;
        }
        if store.is_blocked(receiver, entry_id) {
            return TeachOutcome::ReceiverBlocked;
        }

        store.grant(receiver, entry_id);

        let receiver_losses = self.apply_reception_loss(store, receiver, entry_id);
        let giver_losses = self.apply_cascade_loss(store, giver, entry_id);

        store.persist(receiver);
        store.persist(giver);

        tracing::debug!(
            %giver,
            %receiver,
            entry = %entry_id,
            receiver_lost = receiver_losses.len(),
            giver_lost = giver_losses.len(),
            "transfer complete"
        );

        TeachOutcome::Success {
            receiver_losses,
            giver_losses,
        }
    }

    /// Roll an independent loss trial for every vulnerable entry the
    /// receiver held before the grant. The snapshot is frozen before the
    /// first roll; the just-granted entry is immune.
    fn apply_reception_loss(
        &mut self,
        store: &mut KnowledgeStore,
        receiver: PlayerId,
        just_learned: &str,
    ) -> Vec<String> {
        let mut lost = Vec::new();
        let probability = self.config.loss_probability();
        if probability <= 0.0 {
            return lost;
        }

        let mut snapshot: Vec<String> = store.all_learned(receiver).iter().cloned().collect();
        snapshot.retain(|id| id != just_learned);

        for entry_id in snapshot {
            if !self.catalog.rarity_of(&entry_id).is_loss_vulnerable() {
                continue;
            }
            if self.rng.gen::<f64>() < probability {
                store.block(receiver, &entry_id);
                lost.push(entry_id);
            }
        }
        lost
    }

    /// Block the taught entry and its transitive dependents for the giver.
    /// Everything in the closure is blocked even if never learned; only the
    /// entries the giver actually held are reported as losses.
    fn apply_cascade_loss(
        &self,
        store: &mut KnowledgeStore,
        giver: PlayerId,
        entry_id: &str,
    ) -> Vec<String> {
        let mut lost = Vec::new();
        for obsolete in self.graph.cascade_from(entry_id) {
            if store.block(giver, &obsolete) {
                lost.push(obsolete);
            }
        }
        lost
    }
}
