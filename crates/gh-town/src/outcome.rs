//! The uniform result of every facility action.
//!
//! An [`Outcome`] is a tagged value: success, error, warning, info, or a
//! confirmation request. Confirmations carry a typed quote in
//! [`OutcomeData`] with everything the caller needs to re-invoke the action
//! with `confirmed` set. Outcomes are value objects: created fresh per call,
//! owned by the caller, and never mutated after return.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use gh_core::{CharacterId, CharacterStatus, ItemId, SpellId};

/// Classification of an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// The action committed.
    Success,
    /// The action was invalid or hit an internal fault; nothing happened.
    Error,
    /// A recoverable business rule refused the action; nothing happened.
    Warning,
    /// Informational, typically a selection list or a no-op notice.
    Info,
    /// A quote awaiting confirmation; nothing has committed yet.
    Confirm,
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Confirm => "confirm",
        };
        write!(f, "{s}")
    }
}

/// A free-form metadata value attached to an outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    /// A text value.
    String(String),
    /// A 64-bit signed integer value.
    Integer(i64),
    /// A boolean value.
    Boolean(bool),
}

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<i64> for MetaValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<bool> for MetaValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// One row of a character selection list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterEntry {
    /// Member or candidate id.
    pub id: CharacterId,
    /// Display name.
    pub name: String,
    /// Experience level.
    pub level: u32,
    /// Current condition.
    pub status: CharacterStatus,
}

/// One row of a shelf listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WareEntry {
    /// Catalog id.
    pub item: ItemId,
    /// Display name.
    pub name: String,
    /// Unit price in gold.
    pub price: u32,
    /// Units in stock.
    pub stock: u32,
}

/// One row of a spell curriculum listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellEntry {
    /// Catalog id.
    pub spell: SpellId,
    /// Display name.
    pub name: String,
    /// Spell circle.
    pub tier: u32,
    /// Tuition in gold.
    pub price: u32,
}

/// One row of a carried- or stored-item listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEntry {
    /// Catalog id.
    pub item: ItemId,
    /// Name as the party currently knows it.
    pub name: String,
    /// Carrying member's name, or `None` for vaulted items.
    pub owner: Option<String>,
}

/// Typed payload of an outcome.
///
/// Quotes are emitted by the first half of a confirm-then-execute flow and
/// embed the identifiers and cost needed to re-invoke the action confirmed.
/// Receipts are emitted by committed actions; lists by selection steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutcomeData {
    /// Quoted price of a night at the inn.
    RestQuote {
        /// Total cost in gold.
        cost: u32,
    },
    /// The party rested.
    Rested {
        /// Gold actually charged.
        cost: u32,
        /// Members that needed and received healing.
        healed: u32,
    },
    /// Quoted price of curing a member's ailment.
    CureQuote {
        /// Target member.
        character: CharacterId,
        /// Cost in gold.
        cost: u32,
    },
    /// A member was cured.
    Cured {
        /// Target member.
        character: CharacterId,
        /// Gold charged.
        cost: u32,
    },
    /// Quoted price of a resurrection.
    ResurrectQuote {
        /// Target member.
        character: CharacterId,
        /// Cost in gold.
        cost: u32,
    },
    /// A member returned to life.
    Resurrected {
        /// Target member.
        character: CharacterId,
        /// Gold charged.
        cost: u32,
        /// Resurrection budget remaining after this one.
        vitality_left: u32,
    },
    /// Quoted price of a blessing.
    BlessingQuote {
        /// Cost in gold.
        cost: u32,
    },
    /// The party was blessed.
    Blessed {
        /// Gold charged.
        cost: u32,
    },
    /// Quoted price of a purchase.
    PurchaseQuote {
        /// Catalog id.
        item: ItemId,
        /// Units requested.
        quantity: u32,
        /// Total cost in gold.
        cost: u32,
    },
    /// A purchase went through.
    Purchased {
        /// Catalog id.
        item: ItemId,
        /// Units bought.
        quantity: u32,
        /// Gold charged.
        cost: u32,
        /// Units left on the shelf.
        stock_left: u32,
        /// Gold left in the purse.
        gold_left: u32,
    },
    /// A sale went through.
    Sold {
        /// Catalog id.
        item: ItemId,
        /// Gold paid out.
        payout: u32,
        /// Gold now in the purse.
        gold_left: u32,
    },
    /// Quoted fee for identifying an item.
    AnalyzeQuote {
        /// The item in question.
        item: ItemId,
        /// Fee in gold.
        cost: u32,
    },
    /// An item was identified.
    Analyzed {
        /// The item in question.
        item: ItemId,
        /// Its revealed true name.
        name: String,
        /// Fee charged.
        cost: u32,
    },
    /// Quoted tuition for teaching a spell.
    LearnQuote {
        /// Studying member.
        character: CharacterId,
        /// The spell.
        spell: SpellId,
        /// Tuition in gold.
        cost: u32,
    },
    /// A spell was learned.
    SpellLearned {
        /// Studying member.
        character: CharacterId,
        /// The spell.
        spell: SpellId,
        /// Tuition charged.
        cost: u32,
    },
    /// An item went into the vault.
    Stored {
        /// The item.
        item: ItemId,
    },
    /// An item came out of the vault.
    Retrieved {
        /// The item.
        item: ItemId,
    },
    /// The party's membership changed.
    RosterChanged {
        /// Members now in the party.
        party_size: usize,
    },
    /// A character selection list.
    Characters(Vec<CharacterEntry>),
    /// A shelf listing.
    Wares(Vec<WareEntry>),
    /// A curriculum listing.
    Spells(Vec<SpellEntry>),
    /// A carried- or stored-item listing.
    Items(Vec<ItemEntry>),
}

/// The uniform result of a facility action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Whether the action committed. Always false for error and confirm
    /// outcomes; false for warnings, which refuse without mutating.
    pub success: bool,
    /// The single line shown to the player.
    pub message: String,
    /// Typed payload, when the action has one.
    pub data: Option<OutcomeData>,
    /// Classification.
    pub kind: OutcomeKind,
    /// Accumulated error details.
    pub errors: Vec<String>,
    /// Accumulated warning details.
    pub warnings: Vec<String>,
    /// Free-form metadata for the caller.
    pub metadata: HashMap<String, MetaValue>,
}

impl Outcome {
    fn base(kind: OutcomeKind, success: bool, message: impl Into<String>) -> Self {
        Self {
            success,
            message: message.into(),
            data: None,
            kind,
            errors: Vec::new(),
            warnings: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    /// A committed action.
    pub fn ok(message: impl Into<String>) -> Self {
        Self::base(OutcomeKind::Success, true, message)
    }

    /// A committed action with a payload.
    pub fn ok_with(message: impl Into<String>, data: OutcomeData) -> Self {
        let mut o = Self::ok(message);
        o.data = Some(data);
        o
    }

    /// A failed action; nothing happened.
    pub fn error(message: impl Into<String>) -> Self {
        Self::base(OutcomeKind::Error, false, message)
    }

    /// A failed action with detail lines.
    pub fn error_all(message: impl Into<String>, errors: Vec<String>) -> Self {
        let mut o = Self::error(message);
        o.errors = errors;
        o
    }

    /// A business-rule refusal; nothing happened, the player can retry.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::base(OutcomeKind::Warning, false, message)
    }

    /// A refusal with a payload.
    pub fn warning_with(message: impl Into<String>, data: OutcomeData) -> Self {
        let mut o = Self::warning(message);
        o.data = Some(data);
        o
    }

    /// An informational outcome.
    pub fn info(message: impl Into<String>) -> Self {
        Self::base(OutcomeKind::Info, true, message)
    }

    /// An informational outcome with a payload, e.g. a selection list.
    pub fn info_with(message: impl Into<String>, data: OutcomeData) -> Self {
        let mut o = Self::info(message);
        o.data = Some(data);
        o
    }

    /// A quote awaiting confirmation. Not yet committed, so not a success.
    pub fn confirm(message: impl Into<String>, data: OutcomeData) -> Self {
        let mut o = Self::base(OutcomeKind::Confirm, false, message);
        o.data = Some(data);
        o
    }

    /// True for committed actions and info notices.
    pub fn is_success(&self) -> bool {
        self.success && self.kind != OutcomeKind::Error
    }

    /// True for failed actions.
    pub fn is_error(&self) -> bool {
        self.kind == OutcomeKind::Error
    }

    /// True when the outcome is a warning or carries warning details.
    pub fn is_warning(&self) -> bool {
        self.kind == OutcomeKind::Warning || !self.warnings.is_empty()
    }

    /// True when the caller must re-invoke with `confirmed` to commit.
    pub fn needs_confirmation(&self) -> bool {
        self.kind == OutcomeKind::Confirm
    }

    /// Append an error detail, forcing the outcome into the error state.
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.kind = OutcomeKind::Error;
        self.success = false;
    }

    /// Append a warning detail, forcing the kind to warning unless the
    /// outcome is already an error.
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
        if self.kind != OutcomeKind::Error {
            self.kind = OutcomeKind::Warning;
        }
    }

    /// Attach a metadata entry.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Look up a metadata entry.
    pub fn meta(&self, key: &str) -> Option<&MetaValue> {
        self.metadata.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_is_success() {
        let o = Outcome::ok("done");
        assert!(o.is_success());
        assert!(!o.is_error());
        assert!(!o.is_warning());
        assert!(!o.needs_confirmation());
    }

    #[test]
    fn confirm_is_not_success() {
        let o = Outcome::confirm("pay 50?", OutcomeData::RestQuote { cost: 50 });
        assert!(!o.success);
        assert!(o.needs_confirmation());
        assert!(!o.is_success());
        assert_eq!(o.data, Some(OutcomeData::RestQuote { cost: 50 }));
    }

    #[test]
    fn error_is_not_success() {
        let o = Outcome::error("no");
        assert!(!o.success);
        assert!(o.is_error());
        assert!(!o.is_success());
    }

    #[test]
    fn warning_refuses_without_success() {
        let o = Outcome::warning("not enough gold");
        assert!(o.is_warning());
        assert!(!o.is_success());
    }

    #[test]
    fn add_error_forces_error_state() {
        let mut o = Outcome::ok("fine so far");
        o.add_error("something broke");
        assert!(o.is_error());
        assert!(!o.success);
        assert_eq!(o.errors.len(), 1);
    }

    #[test]
    fn add_warning_keeps_success_flag() {
        let mut o = Outcome::ok("done, mostly");
        o.add_warning("one bed was short");
        assert!(o.is_warning());
        assert!(o.success);
        assert_eq!(o.kind, OutcomeKind::Warning);
    }

    #[test]
    fn add_warning_does_not_downgrade_error() {
        let mut o = Outcome::error("broken");
        o.add_warning("also this");
        assert_eq!(o.kind, OutcomeKind::Error);
        assert!(o.is_warning()); // warnings list is non-empty
    }

    #[test]
    fn metadata_roundtrip() {
        let o = Outcome::ok("blessed").with_meta("blessed", true).with_meta(
            "cost",
            500i64,
        );
        assert_eq!(o.meta("blessed"), Some(&MetaValue::Boolean(true)));
        assert_eq!(o.meta("cost"), Some(&MetaValue::Integer(500)));
        assert_eq!(o.meta("missing"), None);
    }

    #[test]
    fn serde_roundtrip() {
        let o = Outcome::confirm(
            "pay 600?",
            OutcomeData::ResurrectQuote {
                character: gh_core::CharacterId::new(),
                cost: 600,
            },
        );
        let json = serde_json::to_string(&o).unwrap();
        let back: Outcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, o);
    }
}
