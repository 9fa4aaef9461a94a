use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::item::{Item, ItemId};
use crate::spell::{SpellId, SpellSchool};

/// Unique identifier for every character, whether a party member or a guild
/// roster candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    /// Generate a new random character ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Adventuring professions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    /// Front-line weapon specialist.
    Fighter,
    /// Arcane caster.
    Mage,
    /// Divine caster and healer.
    Priest,
    /// Lockpick and scout.
    Thief,
    /// Scholar of both magic schools.
    Bishop,
    /// Warrior with arcane training.
    Samurai,
    /// Warrior with divine training.
    Lord,
    /// Assassin.
    Ninja,
}

impl CharacterClass {
    /// Try to parse a class from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fighter" => Some(Self::Fighter),
            "mage" => Some(Self::Mage),
            "priest" => Some(Self::Priest),
            "thief" => Some(Self::Thief),
            "bishop" => Some(Self::Bishop),
            "samurai" => Some(Self::Samurai),
            "lord" => Some(Self::Lord),
            "ninja" => Some(Self::Ninja),
            _ => None,
        }
    }

    /// Returns true if this class can study spells of the given school.
    pub fn can_study(&self, school: SpellSchool) -> bool {
        match school {
            SpellSchool::Mage => matches!(self, Self::Mage | Self::Bishop | Self::Samurai),
            SpellSchool::Priest => matches!(self, Self::Priest | Self::Bishop | Self::Lord),
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Fighter => "fighter",
            Self::Mage => "mage",
            Self::Priest => "priest",
            Self::Thief => "thief",
            Self::Bishop => "bishop",
            Self::Samurai => "samurai",
            Self::Lord => "lord",
            Self::Ninja => "ninja",
        };
        write!(f, "{s}")
    }
}

/// A character's condition, from healthy to irrecoverably lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterStatus {
    /// Healthy.
    Normal,
    /// Poisoned; curable at an inn or temple.
    Poisoned,
    /// Paralyzed; curable at an inn or temple.
    Paralyzed,
    /// Turned to stone; beyond town services.
    Stoned,
    /// Dead but whole; a temple can resurrect.
    Dead,
    /// Reduced to ashes; a temple can still try, at a premium.
    Ashes,
    /// Gone forever.
    Lost,
}

impl CharacterStatus {
    /// Returns true if the character is up and walking around.
    pub fn is_alive(&self) -> bool {
        matches!(self, Self::Normal | Self::Poisoned | Self::Paralyzed)
    }

    /// Returns true for ailments a night's rest can clear.
    pub fn is_minor_ailment(&self) -> bool {
        matches!(self, Self::Poisoned | Self::Paralyzed)
    }

    /// Returns true for the two states a temple resurrection can recover.
    pub fn is_recoverable_death(&self) -> bool {
        matches!(self, Self::Dead | Self::Ashes)
    }
}

impl fmt::Display for CharacterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Normal => "normal",
            Self::Poisoned => "poisoned",
            Self::Paralyzed => "paralyzed",
            Self::Stoned => "stoned",
            Self::Dead => "dead",
            Self::Ashes => "ashes",
            Self::Lost => "lost",
        };
        write!(f, "{s}")
    }
}

/// A single adventurer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    /// Unique identifier.
    pub id: CharacterId,
    /// Display name.
    pub name: String,
    /// Profession.
    pub class: CharacterClass,
    /// Experience level (1 or higher).
    pub level: u32,
    /// Current hit points.
    pub hp: u32,
    /// Maximum hit points.
    pub max_hp: u32,
    /// Current magic points.
    pub mp: u32,
    /// Maximum magic points.
    pub max_mp: u32,
    /// Current condition.
    pub status: CharacterStatus,
    /// Remaining resurrection budget. Each successful resurrection spends
    /// one point; at zero the temple can do nothing more.
    pub vitality: u32,
    /// Carried items.
    pub inventory: Vec<Item>,
    /// Spells the character has learned.
    pub known_spells: Vec<SpellId>,
}

impl Character {
    /// Maximum number of items a character can carry.
    pub const MAX_PACK: usize = 8;

    /// Create a fresh level-1 character.
    pub fn new(name: impl Into<String>, class: CharacterClass) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            class,
            level: 1,
            hp: 8,
            max_hp: 8,
            mp: 4,
            max_mp: 4,
            status: CharacterStatus::Normal,
            vitality: 10,
            inventory: Vec::new(),
            known_spells: Vec::new(),
        }
    }

    /// Set the level (minimum 1).
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.max(1);
        self
    }

    /// Set current and maximum hit points.
    pub fn with_hp(mut self, hp: u32, max_hp: u32) -> Self {
        self.hp = hp.min(max_hp);
        self.max_hp = max_hp;
        self
    }

    /// Set current and maximum magic points.
    pub fn with_mp(mut self, mp: u32, max_mp: u32) -> Self {
        self.mp = mp.min(max_mp);
        self.max_mp = max_mp;
        self
    }

    /// Set the condition.
    pub fn with_status(mut self, status: CharacterStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the resurrection budget.
    pub fn with_vitality(mut self, vitality: u32) -> Self {
        self.vitality = vitality;
        self
    }

    /// Returns true if the character is up and walking around.
    pub fn is_alive(&self) -> bool {
        self.status.is_alive()
    }

    /// Returns true if a night's rest would do anything: missing hit or
    /// magic points, or a minor ailment. Always false for the dead.
    pub fn needs_rest(&self) -> bool {
        self.is_alive()
            && (self.hp < self.max_hp || self.mp < self.max_mp || self.status.is_minor_ailment())
    }

    /// Fully heal and clear minor ailments. Returns true if anything changed.
    /// Has no effect on characters that are not alive.
    pub fn restore(&mut self) -> bool {
        if !self.needs_rest() {
            return false;
        }
        self.hp = self.max_hp;
        self.mp = self.max_mp;
        if self.status.is_minor_ailment() {
            self.status = CharacterStatus::Normal;
        }
        true
    }

    /// Returns true if the character already knows the spell.
    pub fn knows_spell(&self, spell: &SpellId) -> bool {
        self.known_spells.contains(spell)
    }

    /// Learn a spell. Duplicates are ignored.
    pub fn learn_spell(&mut self, spell: SpellId) {
        if !self.knows_spell(&spell) {
            self.known_spells.push(spell);
        }
    }

    /// Returns true if the pack has room for `count` more items.
    pub fn can_carry(&self, count: usize) -> bool {
        self.inventory.len() + count <= Self::MAX_PACK
    }

    /// Add an item to the pack.
    pub fn give_item(&mut self, item: Item) -> CoreResult<()> {
        if !self.can_carry(1) {
            return Err(CoreError::PackFull(self.name.clone()));
        }
        self.inventory.push(item);
        Ok(())
    }

    /// Remove and return an item from the pack.
    pub fn take_item(&mut self, id: &ItemId) -> Option<Item> {
        let pos = self.inventory.iter().position(|i| &i.id == id)?;
        Some(self.inventory.remove(pos))
    }

    /// Look up a carried item.
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.inventory.iter().find(|i| &i.id == id)
    }

    /// Look up a carried item mutably.
    pub fn item_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.inventory.iter_mut().find(|i| &i.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemKind;

    fn potion() -> Item {
        Item::new("potion", "Potion of Dios", ItemKind::Potion, 100)
    }

    #[test]
    fn new_character_defaults() {
        let c = Character::new("Aldric", CharacterClass::Fighter);
        assert_eq!(c.level, 1);
        assert_eq!(c.status, CharacterStatus::Normal);
        assert_eq!(c.vitality, 10);
        assert!(c.is_alive());
        assert!(!c.needs_rest());
    }

    #[test]
    fn builder_clamps() {
        let c = Character::new("Aldric", CharacterClass::Fighter)
            .with_level(0)
            .with_hp(50, 20);
        assert_eq!(c.level, 1);
        assert_eq!(c.hp, 20);
    }

    #[test]
    fn needs_rest_on_damage_or_ailment() {
        let hurt = Character::new("A", CharacterClass::Fighter).with_hp(3, 10);
        assert!(hurt.needs_rest());

        let poisoned =
            Character::new("B", CharacterClass::Thief).with_status(CharacterStatus::Poisoned);
        assert!(poisoned.needs_rest());

        let dead = Character::new("C", CharacterClass::Mage)
            .with_hp(0, 10)
            .with_status(CharacterStatus::Dead);
        assert!(!dead.needs_rest());
    }

    #[test]
    fn restore_heals_and_cures() {
        let mut c = Character::new("A", CharacterClass::Fighter)
            .with_hp(3, 10)
            .with_mp(0, 6)
            .with_status(CharacterStatus::Poisoned);
        assert!(c.restore());
        assert_eq!(c.hp, 10);
        assert_eq!(c.mp, 6);
        assert_eq!(c.status, CharacterStatus::Normal);
        assert!(!c.restore());
    }

    #[test]
    fn restore_leaves_the_dead_alone() {
        let mut c = Character::new("A", CharacterClass::Fighter)
            .with_hp(0, 10)
            .with_status(CharacterStatus::Dead);
        assert!(!c.restore());
        assert_eq!(c.hp, 0);
        assert_eq!(c.status, CharacterStatus::Dead);
    }

    #[test]
    fn spell_learning_ignores_duplicates() {
        let mut c = Character::new("A", CharacterClass::Mage);
        let halito = SpellId::new("halito");
        c.learn_spell(halito.clone());
        c.learn_spell(halito.clone());
        assert_eq!(c.known_spells.len(), 1);
        assert!(c.knows_spell(&halito));
    }

    #[test]
    fn pack_capacity() {
        let mut c = Character::new("A", CharacterClass::Fighter);
        for _ in 0..Character::MAX_PACK {
            c.give_item(potion()).unwrap();
        }
        assert!(matches!(
            c.give_item(potion()),
            Err(CoreError::PackFull(_))
        ));
    }

    #[test]
    fn take_item_removes() {
        let mut c = Character::new("A", CharacterClass::Fighter);
        c.give_item(potion()).unwrap();
        let id = ItemId::new("potion");
        assert!(c.item(&id).is_some());
        let taken = c.take_item(&id).unwrap();
        assert_eq!(taken.name, "Potion of Dios");
        assert!(c.item(&id).is_none());
        assert!(c.take_item(&id).is_none());
    }

    #[test]
    fn class_school_access() {
        use SpellSchool::{Mage, Priest};
        assert!(CharacterClass::Mage.can_study(Mage));
        assert!(!CharacterClass::Mage.can_study(Priest));
        assert!(CharacterClass::Bishop.can_study(Mage));
        assert!(CharacterClass::Bishop.can_study(Priest));
        assert!(CharacterClass::Lord.can_study(Priest));
        assert!(!CharacterClass::Fighter.can_study(Mage));
    }

    #[test]
    fn status_predicates() {
        assert!(CharacterStatus::Poisoned.is_alive());
        assert!(CharacterStatus::Poisoned.is_minor_ailment());
        assert!(CharacterStatus::Dead.is_recoverable_death());
        assert!(CharacterStatus::Ashes.is_recoverable_death());
        assert!(!CharacterStatus::Lost.is_recoverable_death());
        assert!(!CharacterStatus::Stoned.is_alive());
    }

    #[test]
    fn display_forms() {
        assert_eq!(CharacterClass::Samurai.to_string(), "samurai");
        assert_eq!(CharacterStatus::Ashes.to_string(), "ashes");
        let c = Character::new("A", CharacterClass::Fighter);
        assert_eq!(c.id.to_string().len(), 8);
    }

    #[test]
    fn class_parse_roundtrip() {
        for class in [
            CharacterClass::Fighter,
            CharacterClass::Mage,
            CharacterClass::Priest,
            CharacterClass::Thief,
            CharacterClass::Bishop,
            CharacterClass::Samurai,
            CharacterClass::Lord,
            CharacterClass::Ninja,
        ] {
            assert_eq!(CharacterClass::parse(&class.to_string()), Some(class));
        }
        assert_eq!(CharacterClass::parse("bard"), None);
    }
}
