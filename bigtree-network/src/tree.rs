//! The sponsor tree.
//!
//! Nodes live in an arena keyed by [`MemberId`]; a member's id is its link
//! back to its node. Volume rollups are incremental: every personal-volume
//! change and every graft or prune pushes a signed delta up the sponsor chain,
//! so `group` is always current without walking subtrees on read.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{NetworkError, Result};
use crate::member::{Member, MemberClass, MemberId};
use crate::volume::validate_amount;

/// Tree position wrapping one member.
#[derive(Debug, Clone)]
pub struct Node {
    member: Member,
    parent: Option<MemberId>,
    children: Vec<MemberId>,
    expanded: bool,
}

impl Node {
    fn new(member: Member) -> Self {
        Self {
            member,
            parent: None,
            children: Vec::new(),
            expanded: true,
        }
    }

    pub fn member(&self) -> &Member {
        &self.member
    }

    /// Sponsor, `None` for a top-level member.
    pub fn parent(&self) -> Option<MemberId> {
        self.parent
    }

    /// Children in insertion (display) order.
    pub fn children(&self) -> &[MemberId] {
        &self.children
    }

    /// Display flag.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// No sponsored members.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A forest of sponsor trees.
#[derive(Debug, Clone)]
pub struct Network {
    nodes: HashMap<MemberId, Node>,
    roots: Vec<MemberId>,
    next_stamp: u64,
    name_counters: [u32; 3],
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl Network {
    /// An empty network whose stamps start at the current time in milliseconds.
    pub fn new() -> Self {
        let seed = chrono::Utc::now().timestamp_millis().max(1) as u64;
        Self::with_stamp_seed(seed)
    }

    /// An empty network whose first stamp is `seed` (at least 1).
    pub fn with_stamp_seed(seed: u64) -> Self {
        Self {
            nodes: HashMap::new(),
            roots: Vec::new(),
            next_stamp: seed.max(1),
            name_counters: [0; 3],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether a member with this stamp exists.
    pub fn contains(&self, id: MemberId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Top-level nodes in display order.
    pub fn roots(&self) -> &[MemberId] {
        &self.roots
    }

    /// Tree position of a member.
    pub fn node(&self, id: MemberId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.nodes.get(&id).map(|n| &n.member)
    }

    pub fn member_mut(&mut self, id: MemberId) -> Option<&mut Member> {
        self.nodes.get_mut(&id).map(|n| &mut n.member)
    }

    /// Look up a member or fail with [`NetworkError::MemberNotFound`].
    pub fn get(&self, id: MemberId) -> Result<&Member> {
        self.member(id).ok_or(NetworkError::MemberNotFound(id))
    }

    fn node_ref(&self, id: MemberId) -> Result<&Node> {
        self.nodes.get(&id).ok_or(NetworkError::MemberNotFound(id))
    }

    fn node_mut(&mut self, id: MemberId) -> Result<&mut Node> {
        self.nodes.get_mut(&id).ok_or(NetworkError::MemberNotFound(id))
    }

    /// Sponsor of a member, `None` for roots and unknown ids.
    pub fn sponsor(&self, id: MemberId) -> Option<MemberId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Direct downline in display order. Empty for unknown ids.
    pub fn children(&self, id: MemberId) -> &[MemberId] {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Every direct downline member, whatever its class.
    pub fn support_members(&self, id: MemberId) -> &[MemberId] {
        self.children(id)
    }

    /// Direct downline members that are ABOs.
    pub fn abo_partners(&self, id: MemberId) -> Vec<MemberId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.member(*c).map_or(false, Member::is_abo))
            .collect()
    }

    // ---- creation ----

    fn allocate_stamp(&mut self) -> Result<MemberId> {
        let id = MemberId(self.next_stamp);
        self.next_stamp = self
            .next_stamp
            .checked_add(1)
            .ok_or(NetworkError::InvalidStamp(self.next_stamp))?;
        Ok(id)
    }

    /// Next generated name for a class, e.g. `abo3`.
    pub fn next_default_name(&mut self, class: MemberClass) -> String {
        let counter = &mut self.name_counters[class.ordinal() as usize];
        *counter += 1;
        format!("{}{}", class.default_name_prefix(), counter)
    }

    /// Create a new top-level member.
    pub fn add_root(
        &mut self,
        class: MemberClass,
        name: impl Into<String>,
        personal: f64,
    ) -> Result<MemberId> {
        validate_amount(personal)?;
        let id = self.allocate_stamp()?;
        self.insert_member(Member::new(id, class, name, personal)?)?;
        Ok(id)
    }

    /// Create a member directly under `sponsor`.
    pub fn add_child(
        &mut self,
        sponsor: MemberId,
        class: MemberClass,
        name: impl Into<String>,
        personal: f64,
    ) -> Result<MemberId> {
        self.ensure_can_sponsor(sponsor)?;
        let id = self.add_root(class, name, personal)?;
        self.attach(id, sponsor)?;
        Ok(id)
    }

    /// Insert a detached member with a caller-chosen stamp.
    pub(crate) fn insert_member(&mut self, member: Member) -> Result<()> {
        let id = member.id();
        if self.nodes.contains_key(&id) {
            return Err(NetworkError::DuplicateStamp(id));
        }
        let after = id
            .stamp()
            .checked_add(1)
            .ok_or(NetworkError::InvalidStamp(id.stamp()))?;
        self.next_stamp = self.next_stamp.max(after);
        self.nodes.insert(id, Node::new(member));
        self.roots.push(id);
        Ok(())
    }

    fn ensure_can_sponsor(&self, sponsor: MemberId) -> Result<()> {
        if self.get(sponsor)?.is_abo() {
            Ok(())
        } else {
            Err(NetworkError::NotASponsor(sponsor))
        }
    }

    // ---- structure ----

    /// Graft a top-level subtree under `sponsor`, rolling its group volume up
    /// the new ancestor chain.
    pub fn attach(&mut self, member: MemberId, sponsor: MemberId) -> Result<()> {
        self.ensure_can_sponsor(sponsor)?;
        if self.node_ref(member)?.parent.is_some() {
            return Err(NetworkError::AlreadyAttached(member));
        }
        if self.contains_sponsor(sponsor, member) {
            return Err(NetworkError::WouldCycle { member, sponsor });
        }

        self.roots.retain(|r| *r != member);
        self.node_mut(member)?.parent = Some(sponsor);
        self.node_mut(sponsor)?.children.push(member);
        self.add_group_to_sponsor(member)?;

        debug!(member = %member, sponsor = %sponsor, "Attached subtree");
        Ok(())
    }

    /// Prune a subtree from its sponsor. The subtree becomes a top-level
    /// tree and its group volume is pulled from the old ancestor chain.
    pub fn detach(&mut self, member: MemberId) -> Result<()> {
        let Some(sponsor) = self.node_ref(member)?.parent else {
            return Ok(());
        };

        self.subtract_group_from_sponsor(member)?;
        self.node_mut(sponsor)?.children.retain(|c| *c != member);
        self.node_mut(member)?.parent = None;
        self.roots.push(member);

        debug!(member = %member, sponsor = %sponsor, "Detached subtree");
        Ok(())
    }

    /// Detach a subtree and drop it. Returns the number of members removed.
    pub fn remove(&mut self, member: MemberId) -> Result<usize> {
        self.detach(member)?;
        let doomed = self.preorder(member);
        self.roots.retain(|r| *r != member);
        for id in &doomed {
            self.nodes.remove(id);
        }

        debug!(member = %member, removed = doomed.len(), "Removed subtree");
        Ok(doomed.len())
    }

    /// Push this subtree's group volume up the sponsor chain.
    pub(crate) fn add_group_to_sponsor(&mut self, member: MemberId) -> Result<()> {
        let node = self.node_ref(member)?;
        let (group, parent) = (node.member.volume.group(), node.parent);
        self.propagate_group(parent, group);
        Ok(())
    }

    /// Pull this subtree's group volume from the sponsor chain.
    pub(crate) fn subtract_group_from_sponsor(&mut self, member: MemberId) -> Result<()> {
        let node = self.node_ref(member)?;
        let (group, parent) = (node.member.volume.group(), node.parent);
        self.propagate_group(parent, -group);
        Ok(())
    }

    fn propagate_group(&mut self, start: Option<MemberId>, delta: f64) {
        let mut cursor = start;
        while let Some(id) = cursor {
            match self.nodes.get_mut(&id) {
                Some(node) => {
                    node.member.volume.apply_group_delta(delta);
                    cursor = node.parent;
                }
                None => break,
            }
        }
    }

    // ---- volume ----

    /// Add personal volume and roll it up the sponsor chain.
    pub fn add_personal(&mut self, member: MemberId, amount: f64) -> Result<()> {
        validate_amount(amount)?;
        let node = self.node_mut(member)?;
        let delta = node.member.volume.credit_personal(amount);
        let parent = node.parent;
        self.propagate_group(parent, delta);

        debug!(member = %member, amount, "Added personal volume");
        Ok(())
    }

    /// Subtract personal volume, clamped at zero. Returns the amount actually
    /// subtracted.
    pub fn subtract_personal(&mut self, member: MemberId, amount: f64) -> Result<f64> {
        validate_amount(amount)?;
        let node = self.node_mut(member)?;
        let effective = node.member.volume.debit_personal(amount);
        let parent = node.parent;
        self.propagate_group(parent, -effective);

        debug!(member = %member, amount = effective, "Subtracted personal volume");
        Ok(effective)
    }

    /// Set personal volume to `target`.
    pub fn reset_personal(&mut self, member: MemberId, target: f64) -> Result<()> {
        validate_amount(target)?;
        let change = target - self.get(member)?.volume.personal();
        if change >= 0.0 {
            self.add_personal(member, change)
        } else {
            self.subtract_personal(member, -change).map(|_| ())
        }
    }

    /// Snapshot group volume as the base for every member in the subtree.
    pub fn reset_base(&mut self, member: MemberId) -> Result<()> {
        self.node_ref(member)?;
        for id in self.preorder(member) {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.member.volume.reset_base();
            }
        }
        Ok(())
    }

    // ---- display state ----

    pub fn rename(&mut self, member: MemberId, name: impl Into<String>) -> Result<()> {
        self.node_mut(member)?.member.name = name.into();
        Ok(())
    }

    pub fn expand(&mut self, member: MemberId) -> Result<()> {
        self.node_mut(member)?.expanded = true;
        Ok(())
    }

    pub fn collapse(&mut self, member: MemberId) -> Result<()> {
        self.node_mut(member)?.expanded = false;
        Ok(())
    }

    /// Flip the expanded flag, returning the new value.
    pub fn toggle_expanded(&mut self, member: MemberId) -> Result<bool> {
        let node = self.node_mut(member)?;
        node.expanded = !node.expanded;
        Ok(node.expanded)
    }

    // ---- navigation ----

    /// Distance to the root of the member's tree.
    pub fn level(&self, member: MemberId) -> Result<usize> {
        let mut level = 0;
        let mut cursor = self.node_ref(member)?.parent;
        while let Some(id) = cursor {
            level += 1;
            cursor = self.sponsor(id);
        }
        Ok(level)
    }

    /// Top of the tree holding `member`.
    pub fn root_of(&self, member: MemberId) -> Option<MemberId> {
        let mut current = member;
        if !self.contains(current) {
            return None;
        }
        while let Some(parent) = self.sponsor(current) {
            current = parent;
        }
        Some(current)
    }

    /// Search `from` and then its sponsor chain for `stamp`.
    pub fn find_in_sponsor_chain(&self, from: MemberId, stamp: u64) -> Option<MemberId> {
        let mut cursor = self.contains(from).then_some(from);
        while let Some(id) = cursor {
            if id.stamp() == stamp {
                return Some(id);
            }
            cursor = self.sponsor(id);
        }
        None
    }

    /// Whether `sponsor` is `node` itself or one of its ancestors.
    pub fn contains_sponsor(&self, node: MemberId, sponsor: MemberId) -> bool {
        node == sponsor || self.is_upline(node, sponsor)
    }

    /// Whether `leader` is a strict ancestor of `member`.
    pub fn is_upline(&self, member: MemberId, leader: MemberId) -> bool {
        let mut cursor = self.sponsor(member);
        while let Some(id) = cursor {
            if id == leader {
                return true;
            }
            cursor = self.sponsor(id);
        }
        false
    }

    /// Line of sponsorship from `member` up to `top`, both included.
    /// `None` if `top` is not in the member's sponsor chain.
    pub fn line_of_sponsorship(&self, member: MemberId, top: MemberId) -> Option<Vec<MemberId>> {
        if !self.contains(member) {
            return None;
        }
        let mut line = vec![member];
        if member == top {
            return Some(line);
        }
        let mut cursor = self.sponsor(member);
        while let Some(id) = cursor {
            line.push(id);
            if id == top {
                return Some(line);
            }
            cursor = self.sponsor(id);
        }
        None
    }

    /// Subtree members in pre-order, starting with `member`.
    pub fn preorder(&self, member: MemberId) -> Vec<MemberId> {
        let mut order = Vec::new();
        if !self.contains(member) {
            return order;
        }
        let mut stack = vec![member];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    /// Every member, tree by tree, in pre-order.
    pub fn preorder_all(&self) -> Vec<MemberId> {
        self.roots.iter().flat_map(|r| self.preorder(*r)).collect()
    }

    /// Members in the subtree, the member included.
    pub fn subtree_size(&self, member: MemberId) -> usize {
        self.preorder(member).len()
    }

    /// Group volume rebuilt from personal volumes, bypassing the rollup.
    pub fn recomputed_group(&self, member: MemberId) -> f64 {
        self.preorder(member)
            .iter()
            .filter_map(|id| self.member(*id))
            .map(|m| m.volume().personal())
            .sum()
    }
}
