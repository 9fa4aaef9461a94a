//! Facility identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TownError;

/// The five mutually exclusive town facilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityId {
    /// Party management and contracts.
    Guild,
    /// Rest and recovery.
    Inn,
    /// Equipment trade and storage.
    Shop,
    /// Resurrection and blessings.
    Temple,
    /// Spell instruction and item analysis.
    MagicGuild,
}

impl FacilityId {
    /// Every facility, in town-gate order.
    pub const ALL: [FacilityId; 5] = [
        Self::Guild,
        Self::Inn,
        Self::Shop,
        Self::Temple,
        Self::MagicGuild,
    ];

    /// The facility id as a stable token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guild => "guild",
            Self::Inn => "inn",
            Self::Shop => "shop",
            Self::Temple => "temple",
            Self::MagicGuild => "magic_guild",
        }
    }
}

impl fmt::Display for FacilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FacilityId {
    type Err = TownError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "guild" => Ok(Self::Guild),
            "inn" => Ok(Self::Inn),
            "shop" => Ok(Self::Shop),
            "temple" => Ok(Self::Temple),
            "magic_guild" | "magic guild" | "arcanum" => Ok(Self::MagicGuild),
            other => Err(TownError::UnknownFacility(other.to_string())),
        }
    }
}
