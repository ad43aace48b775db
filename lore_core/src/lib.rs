//! # Lore Core
//!
//! The progression engine for Lorebound. This crate interfaces with
//! `lore_rules`, tracks what every player has learned, and applies the
//! asymmetric exchange mechanic when one player teaches another.
//!
//! ## Core Components
//!
//! - **store**: Per-player learned/blocked state with lazy file persistence
//! - **graph**: Inverted prerequisite relation used for cascade obsolescence
//! - **transfer**: The asymmetric teach algorithm (grant, random receiver
//!   loss, giver cascade)
//! - **bonus**: Bonus grants attached to learned entries
//!
//! ## Design Philosophy
//!
//! - **Explicit state**: All player state lives in a store object passed by
//!   reference; there is no process-wide registry
//! - **Failures are values**: Transfer validation failures are reported in
//!   the outcome, never raised as errors
//! - **Degrade, don't abort**: Persistence and configuration problems are
//!   logged and survived; in-memory state remains the source of truth

pub mod bonus;
pub mod graph;
pub mod store;
pub mod transfer;

pub use bonus::*;
pub use graph::*;
pub use store::*;
pub use transfer::*;
