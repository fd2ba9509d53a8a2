//! Built-in starting networks.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::member::{MemberClass, MemberId};
use crate::month::Month;
use crate::tree::Network;
use crate::volume::DEFAULT_PV;

/// The workspaces a session can open, each with its own stored network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Sample networks illustrating the bonus plan
    Network,
    /// The owner's own planned downline
    Planning,
    /// Free-form simulation starting from a single ABO
    Simulation,
}

impl Scenario {
    /// Key the scenario's network is stored under.
    pub fn store_key(&self) -> &'static str {
        match self {
            Self::Network => "NETWORK",
            Self::Planning => "PLANNING",
            Self::Simulation => "SIMULATION",
        }
    }

    /// Reporting month a fresh session of this scenario starts in.
    pub fn start_month(&self) -> Option<Month> {
        match self {
            Self::Network => None,
            Self::Planning | Self::Simulation => Some(Month::new(2018, 9)),
        }
    }

    /// Build the default network. `owner` names the root of the planning tree.
    pub fn default_network(&self, owner: &str) -> Result<Network> {
        let mut network = Network::new();
        match self {
            Self::Network => build_sample_networks(&mut network)?,
            Self::Planning => build_planning(&mut network, owner)?,
            Self::Simulation => {
                network.add_root(MemberClass::Abo, "Me", DEFAULT_PV)?;
            }
        }
        for root in network.roots().to_vec() {
            network.reset_base(root)?;
        }
        Ok(network)
    }
}

fn abo(network: &mut Network, sponsor: MemberId, name: String) -> Result<MemberId> {
    network.add_child(sponsor, MemberClass::Abo, name, DEFAULT_PV)
}

/// Single, Basic, and the three stages of the 6-4-2 model.
fn build_sample_networks(network: &mut Network) -> Result<()> {
    network.add_root(MemberClass::Abo, "Single", DEFAULT_PV)?;

    let basic = network.add_root(MemberClass::Abo, "Basic", DEFAULT_PV)?;
    let you = abo(network, basic, "You".into())?;
    abo(network, you, "A".into())?;
    abo(network, you, "B".into())?;

    let six = network.add_root(MemberClass::Abo, "You-6", DEFAULT_PV)?;
    add_642(network, six, 1)?;

    let six_four = network.add_root(MemberClass::Abo, "You-64", DEFAULT_PV)?;
    add_642(network, six_four, 2)?;

    let six_four_two = network.add_root(MemberClass::Abo, "You-642", DEFAULT_PV)?;
    add_642(network, six_four_two, 3)?;
    Ok(())
}

/// Grow a 6-4-2 downline `depth` levels deep (1 to 3).
fn add_642(network: &mut Network, top: MemberId, depth: u8) -> Result<()> {
    for i in 1..=6 {
        let a = abo(network, top, format!("A-{}", i))?;
        if depth < 2 {
            continue;
        }
        for j in 1..=4 {
            let b = abo(network, a, format!("B-{}{}", i, j))?;
            if depth < 3 {
                continue;
            }
            for k in 1..=2 {
                abo(network, b, format!("C-{}{}{}", i, j, k))?;
            }
        }
    }
    Ok(())
}

fn build_planning(network: &mut Network, owner: &str) -> Result<()> {
    let me = network.add_root(MemberClass::Abo, owner, DEFAULT_PV)?;
    for partner in ["Partner A", "Partner B", "Partner C"] {
        abo(network, me, partner.into())?;
    }
    network.add_child(me, MemberClass::OnMember, "Member A", DEFAULT_PV)?;
    network.add_child(me, MemberClass::OffMember, "Customer A", DEFAULT_PV)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_named(network: &Network, name: &str) -> MemberId {
        *network
            .roots()
            .iter()
            .find(|r| network.get(**r).unwrap().name == name)
            .unwrap()
    }

    #[test]
    fn test_sample_networks() {
        let net = Scenario::Network.default_network("Owner").unwrap();
        let names: Vec<_> = net
            .roots()
            .iter()
            .map(|r| net.get(*r).unwrap().name.clone())
            .collect();
        assert_eq!(names, ["Single", "Basic", "You-6", "You-64", "You-642"]);

        let six = root_named(&net, "You-6");
        let volume = net.get(six).unwrap().volume();
        assert_eq!(volume.group(), 140.0);
        assert_eq!(volume.group_change(), 0.0);
        assert_eq!(net.children(six).len(), 6);

        assert_eq!(net.subtree_size(root_named(&net, "You-64")), 1 + 6 + 24);
        assert_eq!(net.subtree_size(root_named(&net, "You-642")), 1 + 6 + 24 + 48);
        assert_eq!(net.subtree_size(root_named(&net, "Basic")), 4);
    }

    #[test]
    fn test_planning_network() {
        let net = Scenario::Planning.default_network("Kim").unwrap();
        let me = net.roots()[0];
        assert_eq!(net.get(me).unwrap().name, "Kim");
        assert_eq!(net.children(me).len(), 5);
        assert_eq!(net.abo_partners(me).len(), 3);
        assert_eq!(Scenario::Planning.start_month(), Some(Month::new(2018, 9)));
        assert_eq!(Scenario::Planning.store_key(), "PLANNING");
    }

    #[test]
    fn test_simulation_network() {
        let net = Scenario::Simulation.default_network("ignored").unwrap();
        assert_eq!(net.len(), 1);
        assert_eq!(net.get(net.roots()[0]).unwrap().name, "Me");
    }
}
