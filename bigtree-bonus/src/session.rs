//! Editing session over one scenario's network.
//!
//! A [`Session`] owns the network, the bonus plan, the focused ABO, the
//! reporting month and the change-tracking flag. Hosts drive every edit
//! through it rather than touching shared state.

use bigtree_network::{
    Member, MemberClass, MemberId, MemberRecord, Month, Network, Scenario, DEFAULT_PV,
};
use serde::Serialize;
use tracing::debug;

use crate::config::BonusConfig;
use crate::engine::{self, BonusEngine};
use crate::finalize;
use crate::types::Result;

/// A personal volume edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VolumeChange {
    Add(f64),
    Subtract(f64),
    Set(f64),
}

/// Display lines for the focused ABO.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocusedSummary {
    pub member: MemberId,
    /// `[name]-PIN: Total bonus=...`
    pub overview: String,
    pub volumes: String,
    pub bonuses: String,
    /// Reporting month, when the scenario has one
    pub month: Option<String>,
}

pub struct Session {
    scenario: Scenario,
    network: Network,
    config: BonusConfig,
    focused: Option<MemberId>,
    month: Option<Month>,
    track_change: bool,
}

impl Session {
    /// Session over an existing network. Focus starts on the last top-level ABO.
    pub fn new(scenario: Scenario, network: Network, config: BonusConfig) -> Self {
        let focused = network
            .roots()
            .iter()
            .rev()
            .copied()
            .find(|r| network.member(*r).map_or(false, Member::is_abo));
        Self {
            scenario,
            network,
            config,
            focused,
            month: scenario.start_month(),
            track_change: false,
        }
    }

    /// Session over the scenario's built-in network.
    pub fn with_default_network(
        scenario: Scenario,
        owner: &str,
        config: BonusConfig,
    ) -> Result<Self> {
        let network = scenario.default_network(owner)?;
        Ok(Self::new(scenario, network, config))
    }

    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn config(&self) -> &BonusConfig {
        &self.config
    }

    /// Bonus view over the current network.
    pub fn engine(&self) -> BonusEngine<'_> {
        BonusEngine::new(&self.network, &self.config)
    }

    /// Flat records for persistence.
    pub fn records(&self) -> Vec<MemberRecord> {
        self.network.to_records()
    }

    // ---- members ----

    /// Add a member under `parent`, or as a new top-level tree. Missing names
    /// and volumes get defaults. A default name is only used up once the
    /// member exists.
    pub fn add_member(
        &mut self,
        parent: Option<MemberId>,
        class: MemberClass,
        name: Option<String>,
        personal: Option<f64>,
    ) -> Result<MemberId> {
        let personal = personal.unwrap_or(DEFAULT_PV);
        let given = name.clone().unwrap_or_default();
        let id = match parent {
            Some(parent) => self.network.add_child(parent, class, given, personal)?,
            None => self.network.add_root(class, given, personal)?,
        };
        if name.is_none() {
            let generated = self.network.next_default_name(class);
            self.network.rename(id, generated)?;
        }
        Ok(id)
    }

    /// Remove a subtree. Focus is cleared when it was inside it.
    pub fn remove_member(&mut self, id: MemberId) -> Result<usize> {
        if let Some(focused) = self.focused {
            if self.network.contains_sponsor(focused, id) {
                self.focused = None;
            }
        }
        Ok(self.network.remove(id)?)
    }

    pub fn rename(&mut self, id: MemberId, name: impl Into<String>) -> Result<()> {
        Ok(self.network.rename(id, name)?)
    }

    /// Apply a personal volume edit and roll it up.
    pub fn adjust_volume(&mut self, id: MemberId, change: VolumeChange) -> Result<()> {
        match change {
            VolumeChange::Add(amount) => self.network.add_personal(id, amount)?,
            VolumeChange::Subtract(amount) => {
                self.network.subtract_personal(id, amount)?;
            }
            VolumeChange::Set(target) => self.network.reset_personal(id, target)?,
        }
        Ok(())
    }

    /// Snapshot volume and bonus bases for a subtree.
    pub fn reset_base(&mut self, id: MemberId) -> Result<()> {
        engine::reset_base(&mut self.network, &self.config, id)
    }

    // ---- navigation ----

    pub fn children(&self, id: MemberId) -> Vec<MemberId> {
        self.network.children(id).to_vec()
    }

    pub fn independent_partners(&self, id: MemberId) -> Result<Vec<MemberId>> {
        let engine = self.engine();
        engine.require_abo(id)?;
        Ok(engine.independent_partners(id))
    }

    /// Depth below the top of its tree.
    pub fn level(&self, id: MemberId) -> Result<usize> {
        Ok(self.network.level(id)?)
    }

    /// ABO whose summary is displayed.
    pub fn focused(&self) -> Option<MemberId> {
        self.focused
    }

    /// Focus an ABO, or clear the focus.
    pub fn focus(&mut self, id: Option<MemberId>) -> Result<()> {
        if let Some(id) = id {
            self.engine().require_abo(id)?;
        }
        self.focused = id;
        Ok(())
    }

    pub fn focused_summary(&self) -> Result<Option<FocusedSummary>> {
        let Some(id) = self.focused else {
            return Ok(None);
        };

        let engine = self.engine();
        let member = engine.require_abo(id)?;
        let summary = engine.summary(id)?;
        Ok(Some(FocusedSummary {
            member: id,
            overview: format!(
                "[{}]-{}: Total bonus={:.1}",
                member.name,
                engine.pin_title(id)?,
                summary.total
            ),
            volumes: engine.volume_line(id)?,
            bonuses: summary.describe(),
            month: self.month.map(|m| m.to_string()),
        }))
    }

    // ---- months ----

    pub fn month(&self) -> Option<Month> {
        self.month
    }

    pub fn set_month(&mut self, month: Option<Month>) {
        self.month = month;
    }

    /// Step the reporting month forward. No-op without a reporting month.
    pub fn next_month(&mut self) -> Option<Month> {
        self.month = self.month.map(|m| m.succ());
        self.month
    }

    /// Step the reporting month back.
    pub fn previous_month(&mut self) -> Option<Month> {
        self.month = self.month.map(|m| m.pred());
        self.month
    }

    /// Finalize every ABO for the reporting month. Returns how many records
    /// were written; zero without a reporting month.
    pub fn finalize_current_month(&mut self) -> Result<usize> {
        let Some(month) = self.month else {
            debug!(scenario = ?self.scenario, "No reporting month, nothing to finalize");
            return Ok(0);
        };
        Ok(finalize::finalize_all(&mut self.network, &self.config, month)?.len())
    }

    // ---- change tracking ----

    pub fn is_tracking_changes(&self) -> bool {
        self.track_change
    }

    /// Flip change tracking. Turning it on resets every tree's base.
    pub fn toggle_change_tracking(&mut self) -> Result<bool> {
        self.track_change = !self.track_change;
        if self.track_change {
            for root in self.network.roots().to_vec() {
                self.reset_base(root)?;
            }
        }
        Ok(self.track_change)
    }
}
