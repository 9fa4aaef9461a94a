//! Caller-supplied arguments for a facility action.
//!
//! `ActionParams` is the UI-facing input record: a bag of typed optional
//! identifiers plus the `confirmed` flag of the confirm-then-execute
//! protocol. Each service immediately parses the bag into its own closed
//! request enum, so which identifiers an action needs (and how the confirm
//! and commit shapes differ) is a compile-checked match, not a probe.

use serde::{Deserialize, Serialize};

use gh_core::{CharacterClass, CharacterId, ItemId, SpellId};

/// Arguments for one `execute_service` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionParams {
    /// Target or acting party member (or roster candidate).
    pub character: Option<CharacterId>,
    /// Item in question.
    pub item: Option<ItemId>,
    /// Spell in question.
    pub spell: Option<SpellId>,
    /// Unit count for purchases.
    pub quantity: Option<u32>,
    /// Free-text name (party renaming).
    pub name: Option<String>,
    /// Target class for a class change.
    pub class: Option<CharacterClass>,
    /// Second half of the confirm-then-execute protocol.
    pub confirmed: bool,
}

impl ActionParams {
    /// Empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the character.
    pub fn with_character(mut self, id: CharacterId) -> Self {
        self.character = Some(id);
        self
    }

    /// Set the item.
    pub fn with_item(mut self, id: ItemId) -> Self {
        self.item = Some(id);
        self
    }

    /// Set the spell.
    pub fn with_spell(mut self, id: SpellId) -> Self {
        self.spell = Some(id);
        self
    }

    /// Set the quantity.
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Set the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the class.
    pub fn with_class(mut self, class: CharacterClass) -> Self {
        self.class = Some(class);
        self
    }

    /// Mark the params as the commit half of the protocol.
    pub fn confirm(mut self) -> Self {
        self.confirmed = true;
        self
    }
}
