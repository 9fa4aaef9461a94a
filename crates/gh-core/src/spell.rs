use std::fmt;

use serde::{Deserialize, Serialize};

/// Catalog identifier for a spell, e.g. `halito`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpellId(String);

impl SpellId {
    /// Create a spell ID from a slug.
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// The slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two schools of magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellSchool {
    /// Arcane magic.
    Mage,
    /// Divine magic.
    Priest,
}

impl fmt::Display for SpellSchool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mage => write!(f, "mage"),
            Self::Priest => write!(f, "priest"),
        }
    }
}

/// A teachable spell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spell {
    /// Catalog identifier.
    pub id: SpellId,
    /// Display name.
    pub name: String,
    /// School the spell belongs to.
    pub school: SpellSchool,
    /// Spell circle, 1 or higher. Higher tiers demand higher character levels.
    pub tier: u32,
    /// Tuition in gold.
    pub price: u32,
}

impl Spell {
    /// Create a spell.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        school: SpellSchool,
        tier: u32,
        price: u32,
    ) -> Self {
        Self {
            id: SpellId::new(id),
            name: name.into(),
            school,
            tier: tier.max(1),
            price,
        }
    }
}
