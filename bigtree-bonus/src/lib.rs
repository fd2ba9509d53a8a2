//! Bonus and PIN engine for BigTree
//!
//! Computes monthly commissions and rank qualification over a
//! `bigtree-network` sponsor tree:
//!
//! - **Bonus categories**: first (stairstep), leadership, ruby, monthly depth,
//!   plus placeholders for the categories not modeled yet
//! - **PIN qualification**: SP, SPS, GP and PT from the ledger and monthly records
//! - **Finalization**: snapshots each ABO's month into its record book
//! - **Sessions**: one editable network per scenario, persisted through a
//!   [`NetworkStore`]
//!
//! # Example
//!
//! ```ignore
//! use bigtree_bonus::{BonusConfig, BonusEngine};
//! use bigtree_network::{MemberClass, Network};
//!
//! let mut network = Network::new();
//! let top = network.add_root(MemberClass::Abo, "Top", 700.0)?;
//! network.add_child(top, MemberClass::Abo, "Child", 500.0)?;
//!
//! let config = BonusConfig::default();
//! let summary = BonusEngine::new(&network, &config).summary(top)?;
//! println!("{}", summary.describe()); // [First]177.0
//! ```

pub mod categories;
pub mod config;
pub mod engine;
pub mod finalize;
pub mod handle;
pub mod pin;
pub mod session;
pub mod store;
pub mod types;
pub mod volumes;

pub use categories::{standard_categories, BonusCategory};
pub use config::BonusConfig;
pub use engine::{reset_base, BonusEngine, BonusSummary, CategoryOutcome};
pub use finalize::{finalize_all, finalize_month};
pub use handle::SessionHandle;
pub use session::{FocusedSummary, Session, VolumeChange};
pub use store::{JsonFileStore, MemoryStore, NetworkStore, SaveOutcome, StoreError};
pub use types::{BonusError, Qualification, Result};
