//! Bonus plan configuration.
//!
//! Defaults reproduce the standard plan. Every section can be overridden from
//! YAML; missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::types::{BonusError, Result};

/// PV to BV conversion ratio.
pub const PV_TO_BV_RATIO: f64 = 1.0;

/// First bonus stairstep as `(minimum group PV, rate)`, highest first.
pub const FIRST_BONUS_STEPS: [(f64, f64); 7] = [
    (1000.0, 0.21),
    (680.0, 0.18),
    (400.0, 0.15),
    (240.0, 0.12),
    (120.0, 0.09),
    (60.0, 0.06),
    (20.0, 0.03),
];

pub const LEADERSHIP_RATE: f64 = 0.06;
pub const LEADERSHIP_MINIMUM_ASSURE: f64 = 60.0;
pub const LEADERSHIP_FULL_PV: f64 = 1000.0;
pub const LEADERSHIP_PARTIAL_PV: f64 = 400.0;

pub const RUBY_FULL_PV: f64 = 2000.0;
pub const RUBY_RATE: f64 = 0.02;

pub const MONTHLY_DEPTH_FULL_BV: f64 = 1000.0;
pub const MONTHLY_DEPTH_RATE: f64 = 0.01;

pub const SP_PV_MINIMUM: f64 = 1000.0;
pub const SP_PV_CONDITION: f64 = 400.0;
pub const GP_SP_MONTHS: u32 = 3;
pub const PT_SP_MONTHS: u32 = 6;
pub const PT_SP_STREAK: u32 = 3;

/// Full bonus plan configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusConfig {
    /// PV to BV conversion ratio
    pub pv_to_bv: f64,
    pub first: FirstBonusConfig,
    pub leadership: LeadershipConfig,
    pub ruby: RubyConfig,
    pub monthly_depth: MonthlyDepthConfig,
    pub pin: PinConfig,
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            pv_to_bv: PV_TO_BV_RATIO,
            first: FirstBonusConfig::default(),
            leadership: LeadershipConfig::default(),
            ruby: RubyConfig::default(),
            monthly_depth: MonthlyDepthConfig::default(),
            pin: PinConfig::default(),
        }
    }
}

impl BonusConfig {
    /// Load and validate config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Convert point value to business volume.
    pub fn pv_to_bv(&self, pv: f64) -> f64 {
        pv * self.pv_to_bv
    }

    /// Stairstep rate for a group PV: the first step whose minimum is met.
    pub fn first_bonus_rate(&self, group_pv: f64) -> f64 {
        self.first
            .steps
            .iter()
            .find(|step| group_pv >= step.min_pv)
            .map_or(0.0, |step| step.rate)
    }

    /// Highest stairstep rate. Reaching it makes an ABO independent.
    pub fn max_first_bonus_rate(&self) -> f64 {
        self.first.steps.iter().map(|s| s.rate).fold(0.0, f64::max)
    }

    /// Reject rates outside `0..=1`, negative thresholds and unordered steps.
    pub fn validate(&self) -> Result<()> {
        if !(self.pv_to_bv.is_finite() && self.pv_to_bv > 0.0) {
            return Err(invalid(format!("pv_to_bv must be positive, got {}", self.pv_to_bv)));
        }

        let steps = &self.first.steps;
        if steps.is_empty() {
            return Err(invalid("first bonus needs at least one step"));
        }
        for step in steps {
            check_rate("first bonus step rate", step.rate)?;
            check_volume("first bonus step minimum", step.min_pv)?;
        }
        if steps.windows(2).any(|w| w[0].min_pv <= w[1].min_pv) {
            return Err(invalid("first bonus steps must be ordered by descending minimum"));
        }

        check_rate("leadership.rate", self.leadership.rate)?;
        check_volume("leadership.minimum_assure", self.leadership.minimum_assure)?;
        check_volume("leadership.full_pv", self.leadership.full_pv)?;
        check_volume("leadership.partial_pv", self.leadership.partial_pv)?;
        check_rate("ruby.rate", self.ruby.rate)?;
        check_volume("ruby.full_pv", self.ruby.full_pv)?;
        check_rate("monthly_depth.rate", self.monthly_depth.rate)?;
        check_volume("monthly_depth.full_bv", self.monthly_depth.full_bv)?;
        check_volume("pin.sp_pv_minimum", self.pin.sp_pv_minimum)?;
        check_volume("pin.sp_pv_condition", self.pin.sp_pv_condition)?;
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> BonusError {
    BonusError::InvalidConfig(message.into())
}

fn check_rate(field: &str, rate: f64) -> Result<()> {
    if (0.0..=1.0).contains(&rate) {
        Ok(())
    } else {
        Err(invalid(format!("{} must be within 0..=1, got {}", field, rate)))
    }
}

fn check_volume(field: &str, volume: f64) -> Result<()> {
    if volume.is_finite() && volume >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{} must be non-negative, got {}", field, volume)))
    }
}

/// One stairstep level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateStep {
    /// Minimum group PV for this rate
    pub min_pv: f64,
    pub rate: f64,
}

/// First (performance) bonus configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirstBonusConfig {
    /// Steps ordered by descending minimum
    pub steps: Vec<RateStep>,
}

impl Default for FirstBonusConfig {
    fn default() -> Self {
        Self {
            steps: FIRST_BONUS_STEPS
                .iter()
                .map(|&(min_pv, rate)| RateStep { min_pv, rate })
                .collect(),
        }
    }
}

/// Leadership bonus configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadershipConfig {
    pub rate: f64,
    /// Pass-up guaranteed to the upline by a qualified ABO
    pub minimum_assure: f64,
    /// Personal group PV at which the bonus is paid in full
    pub full_pv: f64,
    /// Personal group PV that qualifies with a single independent line
    pub partial_pv: f64,
}

impl Default for LeadershipConfig {
    fn default() -> Self {
        Self {
            rate: LEADERSHIP_RATE,
            minimum_assure: LEADERSHIP_MINIMUM_ASSURE,
            full_pv: LEADERSHIP_FULL_PV,
            partial_pv: LEADERSHIP_PARTIAL_PV,
        }
    }
}

/// Ruby bonus configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RubyConfig {
    /// Personal group PV needed to qualify
    pub full_pv: f64,
    pub rate: f64,
}

impl Default for RubyConfig {
    fn default() -> Self {
        Self {
            full_pv: RUBY_FULL_PV,
            rate: RUBY_RATE,
        }
    }
}

/// Monthly depth bonus configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthlyDepthConfig {
    /// Personal group BV each first-line independent is assumed to carry
    pub full_bv: f64,
    pub rate: f64,
}

impl Default for MonthlyDepthConfig {
    fn default() -> Self {
        Self {
            full_bv: MONTHLY_DEPTH_FULL_BV,
            rate: MONTHLY_DEPTH_RATE,
        }
    }
}

/// PIN qualification thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinConfig {
    /// Personal group PV that alone qualifies as SP
    pub sp_pv_minimum: f64,
    /// Personal group PV that qualifies as SP with one independent line
    pub sp_pv_condition: f64,
    /// SP months within a year needed for GP
    pub gp_sp_months: u32,
    /// SP months within the fiscal year needed for PT
    pub pt_sp_months: u32,
    /// Consecutive SP months needed for PT
    pub pt_sp_streak: u32,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            sp_pv_minimum: SP_PV_MINIMUM,
            sp_pv_condition: SP_PV_CONDITION,
            gp_sp_months: GP_SP_MONTHS,
            pt_sp_months: PT_SP_MONTHS,
            pt_sp_streak: PT_SP_STREAK,
        }
    }
}
