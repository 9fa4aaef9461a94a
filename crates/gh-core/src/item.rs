use std::fmt;

use serde::{Deserialize, Serialize};

/// Catalog identifier for an item, e.g. `long_sword`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create an item ID from a slug.
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// The slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Broad item categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Melee or ranged weapon.
    Weapon,
    /// Body armor.
    Armor,
    /// Off-hand protection.
    Shield,
    /// Consumable drink.
    Potion,
    /// Single-use written magic.
    Scroll,
    /// A tome that teaches a spell when studied.
    Spellbook,
    /// Oddities of unknown purpose.
    Curio,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Weapon => "weapon",
            Self::Armor => "armor",
            Self::Shield => "shield",
            Self::Potion => "potion",
            Self::Scroll => "scroll",
            Self::Spellbook => "spellbook",
            Self::Curio => "curio",
        };
        write!(f, "{s}")
    }
}

/// A concrete item instance, carried or stocked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Catalog identifier.
    pub id: ItemId,
    /// True name, hidden while unidentified.
    pub name: String,
    /// Category.
    pub kind: ItemKind,
    /// List price in gold.
    pub price: u32,
    /// Whether the party knows what this is.
    pub identified: bool,
}

impl Item {
    /// Create an identified item.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ItemKind, price: u32) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.into(),
            kind,
            price,
            identified: true,
        }
    }

    /// Create an unidentified item; its true name stays hidden until an
    /// analysis service reveals it.
    pub fn unidentified(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: ItemKind,
        price: u32,
    ) -> Self {
        Self {
            identified: false,
            ..Self::new(id, name, kind, price)
        }
    }

    /// The name to show the player: the true name once identified,
    /// otherwise just `?kind`.
    pub fn display_name(&self) -> String {
        if self.identified {
            self.name.clone()
        } else {
            format!("?{}", self.kind)
        }
    }
}
