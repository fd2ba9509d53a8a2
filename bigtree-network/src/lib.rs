//! Distributor network model for BigTree
//!
//! Holds the sponsor tree and everything that lives on it:
//!
//! - **Members**: ABOs, online members and offline customers
//! - **Volume ledger**: personal and group volume with incremental rollups
//! - **Monthly records**: finalized per-ABO snapshots of volume, bonus and PIN
//! - **Calendar**: months and the September-based fiscal year
//!
//! Bonus and PIN calculations live in `bigtree-bonus`, which reads this model
//! on demand.
//!
//! # Example
//!
//! ```ignore
//! use bigtree_network::{MemberClass, Network, DEFAULT_PV};
//!
//! let mut network = Network::new();
//! let you = network.add_root(MemberClass::Abo, "You", DEFAULT_PV)?;
//! let partner = network.add_child(you, MemberClass::Abo, "A", DEFAULT_PV)?;
//! network.add_personal(partner, 100.0)?;
//! assert_eq!(network.get(you)?.volume().group(), 140.0);
//! ```

pub mod error;
pub mod member;
pub mod month;
pub mod persist;
pub mod pin;
pub mod record;
pub mod scenarios;
pub mod tree;
pub mod volume;

pub use error::{NetworkError, Result};
pub use member::{AboProfile, Member, MemberClass, MemberId, MemberKind};
pub use month::{FiscalMonth, Month, MonthRange, FISCAL_YEAR_START_MONTH};
pub use persist::{records_digest, MemberRecord, ROOT_SPONSOR};
pub use pin::PinTitle;
pub use record::{BonusAmounts, BonusKind, MonthlyRecord, PinCount, RecordBook};
pub use scenarios::Scenario;
pub use tree::{Network, Node};
pub use volume::{validate_amount, VolumeLedger, DEFAULT_PV};
