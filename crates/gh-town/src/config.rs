//! Facility display profiles.
//!
//! Profiles carry the name, icon, and welcome line a frontend shows at the
//! door. They are presentation data only: lookup always succeeds, falling
//! back to built-in defaults, so an absent or partial configuration never
//! blocks a facility from functioning.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::facility::FacilityId;

/// Display metadata for one facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityProfile {
    /// Sign over the door.
    pub name: String,
    /// Map glyph.
    pub icon: String,
    /// Line spoken on entry.
    pub welcome_message: String,
}

impl FacilityProfile {
    /// Create a profile.
    pub fn new(
        name: impl Into<String>,
        icon: impl Into<String>,
        welcome_message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            welcome_message: welcome_message.into(),
        }
    }
}

fn default_profile(id: FacilityId) -> FacilityProfile {
    match id {
        FacilityId::Guild => FacilityProfile::new(
            "Adventurers' Guild",
            "⚔",
            "Welcome, traveler. Contracts and comrades await.",
        ),
        FacilityId::Inn => FacilityProfile::new(
            "The Silver Flagon",
            "🛏",
            "Rooms are warm and the stew is hot.",
        ),
        FacilityId::Shop => {
            FacilityProfile::new("Torvald's Trading Post", "⚖", "Buy cheap, sell dear.")
        }
        FacilityId::Temple => FacilityProfile::new(
            "Temple of the Radiant Dawn",
            "✨",
            "The Dawn turns none away.",
        ),
        FacilityId::MagicGuild => FacilityProfile::new(
            "The Arcanum",
            "✦",
            "Mind your step among the grimoires.",
        ),
    }
}

/// Profile lookup table with total fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacilityDirectory {
    #[serde(default)]
    profiles: HashMap<FacilityId, FacilityProfile>,
}

impl FacilityDirectory {
    /// An empty directory; every lookup falls back to the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the profile for one facility.
    pub fn insert(&mut self, id: FacilityId, profile: FacilityProfile) {
        self.profiles.insert(id, profile);
    }

    /// The profile for a facility. Never fails.
    pub fn profile(&self, id: FacilityId) -> FacilityProfile {
        self.profiles
            .get(&id)
            .cloned()
            .unwrap_or_else(|| default_profile(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_directory_falls_back() {
        let dir = FacilityDirectory::new();
        assert_eq!(dir.profile(FacilityId::Inn).name, "The Silver Flagon");
        assert_eq!(dir.profile(FacilityId::Temple).icon, "✨");
    }

    #[test]
    fn overrides_win() {
        let mut dir = FacilityDirectory::new();
        dir.insert(
            FacilityId::Inn,
            FacilityProfile::new("The Rusty Tankard", "🍺", "Mind the fleas."),
        );
        assert_eq!(dir.profile(FacilityId::Inn).name, "The Rusty Tankard");
        // Others still fall back.
        assert_eq!(dir.profile(FacilityId::Shop).name, "Torvald's Trading Post");
    }

    #[test]
    fn partial_config_deserializes() {
        let json = r#"{
            "profiles": {
                "inn": {
                    "name": "The Rusty Tankard",
                    "icon": "B",
                    "welcome_message": "Mind the fleas."
                }
            }
        }"#;
        let dir: FacilityDirectory = serde_json::from_str(json).unwrap();
        assert_eq!(dir.profile(FacilityId::Inn).name, "The Rusty Tankard");
        assert_eq!(dir.profile(FacilityId::Guild).name, "Adventurers' Guild");
    }

    #[test]
    fn empty_json_deserializes() {
        let dir: FacilityDirectory = serde_json::from_str("{}").unwrap();
        assert_eq!(dir.profile(FacilityId::MagicGuild).name, "The Arcanum");
    }
}
