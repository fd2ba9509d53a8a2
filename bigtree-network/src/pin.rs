//! PIN (rank) titles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Rank titles ordered from lowest to highest.
///
/// The derived ordering follows declaration order, which is the order the
/// qualification engine scans (in reverse).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PinTitle {
    None,
    Sp,
    Sps,
    Gp,
    Pt,
    FPt,
    Rb,
    FRb,
    Sa,
    FSa,
    Em,
    FEm,
    Dia,
    FDia,
    Edc,
    FEdc,
    Ddc,
    FDdc,
    Tdc,
    FTdc,
    Cr,
    FCr,
    Ca,
    FCa,
}

impl PinTitle {
    /// Every title, lowest first.
    pub const ALL: [PinTitle; 24] = [
        Self::None,
        Self::Sp,
        Self::Sps,
        Self::Gp,
        Self::Pt,
        Self::FPt,
        Self::Rb,
        Self::FRb,
        Self::Sa,
        Self::FSa,
        Self::Em,
        Self::FEm,
        Self::Dia,
        Self::FDia,
        Self::Edc,
        Self::FEdc,
        Self::Ddc,
        Self::FDdc,
        Self::Tdc,
        Self::FTdc,
        Self::Cr,
        Self::FCr,
        Self::Ca,
        Self::FCa,
    ];

    /// Titles from highest to lowest.
    pub fn all_descending() -> impl Iterator<Item = PinTitle> {
        Self::ALL.into_iter().rev()
    }

    /// Short code such as `SP` or `F_DIA`.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Sp => "SP",
            Self::Sps => "SPS",
            Self::Gp => "GP",
            Self::Pt => "PT",
            Self::FPt => "F_PT",
            Self::Rb => "RB",
            Self::FRb => "F_RB",
            Self::Sa => "SA",
            Self::FSa => "F_SA",
            Self::Em => "EM",
            Self::FEm => "F_EM",
            Self::Dia => "DIA",
            Self::FDia => "F_DIA",
            Self::Edc => "EDC",
            Self::FEdc => "F_EDC",
            Self::Ddc => "DDC",
            Self::FDdc => "F_DDC",
            Self::Tdc => "TDC",
            Self::FTdc => "F_TDC",
            Self::Cr => "CR",
            Self::FCr => "F_CR",
            Self::Ca => "CA",
            Self::FCa => "F_CA",
        }
    }

    /// Name as shown on the rank ladder.
    pub fn full_name(&self) -> &'static str {
        match self {
            Self::None => "No-PIN",
            Self::Sp => "Silver Producer",
            Self::Sps => "Silver Producer Sponsor",
            Self::Gp => "Gold Producer",
            Self::Pt => "Platinum",
            Self::FPt => "Founders Platinum",
            Self::Rb => "Ruby",
            Self::FRb => "Founders Ruby",
            Self::Sa => "Sapphire",
            Self::FSa => "Founders Sapphire",
            Self::Em => "Emerald",
            Self::FEm => "Founders Emerald",
            Self::Dia => "Diamond",
            Self::FDia => "Founders Diamond",
            Self::Edc => "Executive Diamond",
            Self::FEdc => "Founders Executive Diamond",
            Self::Ddc => "Double Diamond",
            Self::FDdc => "Founders Double Diamond",
            Self::Tdc => "Triple Diamond",
            Self::FTdc => "Founders Triple Diamond",
            Self::Cr => "Crown",
            Self::FCr => "Founders Crown",
            Self::Ca => "Crown Ambassador",
            Self::FCa => "Founders Crown Ambassador",
        }
    }
}

impl Default for PinTitle {
    fn default() -> Self {
        Self::None
    }
}

impl fmt::Display for PinTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}
