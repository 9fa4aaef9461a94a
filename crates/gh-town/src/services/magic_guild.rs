//! The magic guild: spell instruction, spellbooks, and item analysis.
//!
//! Instruction is the long flow of the town: pick a student, pick a spell,
//! confirm the tuition, commit. Each step is distinguished by which
//! identifiers the params carry; a missing identifier yields a selection
//! list, never an error.

use std::rc::Rc;
use std::str::FromStr;

use tracing::debug;

use gh_core::{
    Character, CharacterId, Item, ItemId, ItemKind, Party, SharedParty, Spell, SpellId,
    SpellSchool,
};

use crate::error::{TownError, TownResult};
use crate::facility::FacilityId;
use crate::menu::{MenuItem, ServiceType};
use crate::outcome::{Outcome, OutcomeData, SpellEntry};
use crate::params::ActionParams;
use crate::service::{
    FacilityService, WareRow, carried_entries, character_entries, find_carried, find_ware,
    find_ware_index, gold_gate, parse_action, resolve_recipient, stock_gate, ware_entries,
};

/// Smallest analysis fee, for items whose half-price would be a pittance.
const MIN_ANALYZE_FEE: u32 = 50;

/// Actions the magic guild offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagicGuildAction {
    /// Teach a spell to a member.
    Learn,
    /// Buy a spellbook.
    BuyBook,
    /// Identify an unidentified item.
    Analyze,
}

impl MagicGuildAction {
    /// The action id as a stable token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Learn => "learn",
            Self::BuyBook => "buy_book",
            Self::Analyze => "analyze",
        }
    }
}

impl FromStr for MagicGuildAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "learn" => Ok(Self::Learn),
            "buy_book" => Ok(Self::BuyBook),
            "analyze" => Ok(Self::Analyze),
            _ => Err(()),
        }
    }
}

/// Typed rendition of one magic-guild request.
enum MagicRequest {
    LearnSelectStudent,
    LearnSelectSpell {
        student: CharacterId,
    },
    LearnQuote {
        student: CharacterId,
        spell: SpellId,
    },
    LearnCommit {
        student: CharacterId,
        spell: SpellId,
    },
    BrowseBooks,
    BookQuote {
        item: ItemId,
        quantity: u32,
        recipient: Option<CharacterId>,
    },
    BookCommit {
        item: ItemId,
        quantity: u32,
        recipient: Option<CharacterId>,
    },
    AnalyzeSelect,
    AnalyzeQuote {
        item: ItemId,
    },
    AnalyzeCommit {
        item: ItemId,
    },
}

fn request(action: MagicGuildAction, params: &ActionParams) -> MagicRequest {
    match action {
        MagicGuildAction::Learn => match (params.character, &params.spell, params.confirmed) {
            (None, _, _) => MagicRequest::LearnSelectStudent,
            (Some(student), None, _) => MagicRequest::LearnSelectSpell { student },
            (Some(student), Some(spell), false) => MagicRequest::LearnQuote {
                student,
                spell: spell.clone(),
            },
            (Some(student), Some(spell), true) => MagicRequest::LearnCommit {
                student,
                spell: spell.clone(),
            },
        },
        MagicGuildAction::BuyBook => match (&params.item, params.confirmed) {
            (None, _) => MagicRequest::BrowseBooks,
            (Some(item), false) => MagicRequest::BookQuote {
                item: item.clone(),
                quantity: params.quantity.unwrap_or(1),
                recipient: params.character,
            },
            (Some(item), true) => MagicRequest::BookCommit {
                item: item.clone(),
                quantity: params.quantity.unwrap_or(1),
                recipient: params.character,
            },
        },
        MagicGuildAction::Analyze => match (&params.item, params.confirmed) {
            (None, _) => MagicRequest::AnalyzeSelect,
            (Some(item), false) => MagicRequest::AnalyzeQuote { item: item.clone() },
            (Some(item), true) => MagicRequest::AnalyzeCommit { item: item.clone() },
        },
    }
}

/// The magic guild service.
#[derive(Debug)]
pub struct MagicGuildService {
    party: Option<SharedParty>,
    curriculum: Vec<Spell>,
    books: Vec<WareRow>,
}

/// Result of a precondition chain: refuse with an outcome, or proceed at
/// the given cost.
enum Gate {
    Refuse(Box<Outcome>),
    Proceed(u32),
}

impl MagicGuildService {
    /// Create a magic guild with the standard curriculum and book stock.
    pub fn new() -> Self {
        Self {
            party: None,
            curriculum: default_curriculum(),
            books: default_books(),
        }
    }

    /// The spells on offer.
    pub fn curriculum(&self) -> &[Spell] {
        &self.curriculum
    }

    /// The spellbooks on the shelf.
    pub fn books(&self) -> &[WareRow] {
        &self.books
    }

    /// Highest spell tier a character of this level may study.
    fn max_tier(level: u32) -> u32 {
        (level + 1) / 2
    }

    fn find_spell(&self, id: &SpellId) -> TownResult<&Spell> {
        self.curriculum
            .iter()
            .find(|s| &s.id == id)
            .ok_or_else(|| TownError::SpellNotFound(id.clone()))
    }

    /// Spells this member could take up right now.
    fn teachable(&self, member: &Character) -> Vec<SpellEntry> {
        self.curriculum
            .iter()
            .filter(|s| {
                member.class.can_study(s.school)
                    && s.tier <= Self::max_tier(member.level)
                    && !member.knows_spell(&s.id)
            })
            .map(|s| SpellEntry {
                spell: s.id.clone(),
                name: s.name.clone(),
                tier: s.tier,
                price: s.price,
            })
            .collect()
    }

    /// Shared guard chain for the learn quote and commit.
    fn learn_gate(&self, party: &Party, student: CharacterId, spell: &SpellId) -> TownResult<Gate> {
        let member = party
            .member(student)
            .ok_or(TownError::MemberNotFound(student))?;
        let spell = self.find_spell(spell)?;
        if !member.is_alive() {
            return Ok(Gate::Refuse(Box::new(Outcome::error(format!(
                "{} is in no state to study",
                member.name
            )))));
        }
        if member.knows_spell(&spell.id) {
            return Ok(Gate::Refuse(Box::new(Outcome::warning(format!(
                "{} already knows {}",
                member.name, spell.name
            )))));
        }
        if !member.class.can_study(spell.school) {
            return Ok(Gate::Refuse(Box::new(Outcome::warning(format!(
                "a {} cannot study {} magic",
                member.class, spell.school
            )))));
        }
        if spell.tier > Self::max_tier(member.level) {
            return Ok(Gate::Refuse(Box::new(Outcome::warning(format!(
                "{} is too advanced for {}",
                spell.name, member.name
            )))));
        }
        if let Some(short) = gold_gate(spell.price, party.gold) {
            return Ok(Gate::Refuse(Box::new(short)));
        }
        Ok(Gate::Proceed(spell.price))
    }

    fn quote_learn(&self, student: CharacterId, spell_id: &SpellId) -> TownResult<Outcome> {
        let party_rc = self.party.as_ref().ok_or(TownError::NoPartyBound)?;
        let party = party_rc.borrow();
        match self.learn_gate(&party, student, spell_id)? {
            Gate::Refuse(o) => Ok(*o),
            Gate::Proceed(cost) => {
                let spell = self.find_spell(spell_id)?;
                let name = party
                    .member(student)
                    .map(|m| m.name.clone())
                    .unwrap_or_default();
                Ok(Outcome::confirm(
                    format!("Teaching {} to {name} costs {cost} gold. Proceed?", spell.name),
                    OutcomeData::LearnQuote {
                        character: student,
                        spell: spell_id.clone(),
                        cost,
                    },
                ))
            }
        }
    }

    fn commit_learn(&mut self, student: CharacterId, spell_id: &SpellId) -> TownResult<Outcome> {
        let party_rc = Rc::clone(self.party.as_ref().ok_or(TownError::NoPartyBound)?);
        let mut party = party_rc.borrow_mut();
        let cost = match self.learn_gate(&party, student, spell_id)? {
            Gate::Refuse(o) => return Ok(*o),
            Gate::Proceed(cost) => cost,
        };
        let spell_name = self.find_spell(spell_id)?.name.clone();

        party.try_debit_gold(cost)?;
        let member = party
            .member_mut(student)
            .ok_or(TownError::MemberNotFound(student))?;
        member.learn_spell(spell_id.clone());
        debug!(student = %member.name, spell = %spell_id, cost, "spell taught");
        Ok(Outcome::ok_with(
            format!("{} commits {} to memory.", member.name, spell_name),
            OutcomeData::SpellLearned {
                character: student,
                spell: spell_id.clone(),
                cost,
            },
        ))
    }

    fn quote_book(
        &self,
        item: &ItemId,
        quantity: u32,
        recipient: Option<CharacterId>,
    ) -> TownResult<Outcome> {
        let party_rc = self.party.as_ref().ok_or(TownError::NoPartyBound)?;
        let party = party_rc.borrow();
        let row = find_ware(&self.books, item)?;
        if let Some(short) = stock_gate(row, quantity) {
            return Ok(short);
        }
        let recipient_id = resolve_recipient(&party, recipient)?;
        let carrier = party
            .member(recipient_id)
            .ok_or(TownError::MemberNotFound(recipient_id))?;
        if !carrier.can_carry(quantity as usize) {
            return Ok(Outcome::warning(format!(
                "{} cannot carry that much",
                carrier.name
            )));
        }
        let cost = row.item.price * quantity;
        if let Some(short) = gold_gate(cost, party.gold) {
            return Ok(short);
        }
        Ok(Outcome::confirm(
            format!("{} x{quantity} for {cost} gold. Proceed?", row.item.display_name()),
            OutcomeData::PurchaseQuote {
                item: item.clone(),
                quantity,
                cost,
            },
        ))
    }

    fn commit_book(
        &mut self,
        item: &ItemId,
        quantity: u32,
        recipient: Option<CharacterId>,
    ) -> TownResult<Outcome> {
        let party_rc = Rc::clone(self.party.as_ref().ok_or(TownError::NoPartyBound)?);
        let mut party = party_rc.borrow_mut();
        let idx = find_ware_index(&self.books, item)?;

        let row = &self.books[idx];
        if let Some(short) = stock_gate(row, quantity) {
            return Ok(short);
        }
        let recipient_id = resolve_recipient(&party, recipient)?;
        let carrier = party
            .member(recipient_id)
            .ok_or(TownError::MemberNotFound(recipient_id))?;
        if !carrier.can_carry(quantity as usize) {
            return Ok(Outcome::warning(format!(
                "{} cannot carry that much",
                carrier.name
            )));
        }
        let cost = row.item.price * quantity;
        if let Some(short) = gold_gate(cost, party.gold) {
            return Ok(short);
        }

        let goods = row.item.clone();
        party.try_debit_gold(cost)?;
        self.books[idx].stock -= quantity;
        let carrier = party
            .member_mut(recipient_id)
            .ok_or(TownError::MemberNotFound(recipient_id))?;
        for _ in 0..quantity {
            carrier.give_item(goods.clone())?;
        }

        let stock_left = self.books[idx].stock;
        let gold_left = party.gold;
        Ok(Outcome::ok_with(
            format!("{} x{quantity} bought for {cost} gold.", goods.display_name()),
            OutcomeData::Purchased {
                item: item.clone(),
                quantity,
                cost,
                stock_left,
                gold_left,
            },
        ))
    }

    fn analyze_fee(item: &Item) -> u32 {
        (item.price / 2).max(MIN_ANALYZE_FEE)
    }

    fn quote_analyze(&self, item_id: &ItemId) -> TownResult<Outcome> {
        let party_rc = self.party.as_ref().ok_or(TownError::NoPartyBound)?;
        let party = party_rc.borrow();
        let (_, item) = find_carried(&party, item_id)
            .ok_or_else(|| TownError::ItemNotFound(item_id.clone()))?;
        if item.identified {
            return Ok(Outcome::info(format!(
                "{} is already well understood",
                item.name
            )));
        }
        let cost = Self::analyze_fee(&item);
        if let Some(short) = gold_gate(cost, party.gold) {
            return Ok(short);
        }
        Ok(Outcome::confirm(
            format!("Divining the nature of the {} costs {cost} gold. Proceed?", item.kind),
            OutcomeData::AnalyzeQuote {
                item: item_id.clone(),
                cost,
            },
        ))
    }

    fn commit_analyze(&mut self, item_id: &ItemId) -> TownResult<Outcome> {
        let party_rc = Rc::clone(self.party.as_ref().ok_or(TownError::NoPartyBound)?);
        let mut party = party_rc.borrow_mut();
        let (owner, item) = find_carried(&party, item_id)
            .ok_or_else(|| TownError::ItemNotFound(item_id.clone()))?;
        if item.identified {
            return Ok(Outcome::info(format!(
                "{} is already well understood",
                item.name
            )));
        }
        let cost = Self::analyze_fee(&item);
        if let Some(short) = gold_gate(cost, party.gold) {
            return Ok(short);
        }

        party.try_debit_gold(cost)?;
        let member = party
            .member_mut(owner)
            .ok_or(TownError::MemberNotFound(owner))?;
        let carried = member
            .item_mut(item_id)
            .ok_or_else(|| TownError::ItemNotFound(item_id.clone()))?;
        carried.identified = true;
        let name = carried.name.clone();
        Ok(Outcome::ok_with(
            format!("The sages pronounce it: {name}."),
            OutcomeData::Analyzed {
                item: item_id.clone(),
                name,
                cost,
            },
        ))
    }
}

impl Default for MagicGuildService {
    fn default() -> Self {
        Self::new()
    }
}

impl FacilityService for MagicGuildService {
    fn facility_id(&self) -> FacilityId {
        FacilityId::MagicGuild
    }

    fn menu_items(&self) -> Vec<MenuItem> {
        let (bound, any_student, any_unknown) = match &self.party {
            Some(p) => {
                let p = p.borrow();
                (
                    true,
                    p.members.iter().any(|m| !self.teachable(m).is_empty()),
                    p.members
                        .iter()
                        .any(|m| m.inventory.iter().any(|i| !i.identified)),
                )
            }
            None => (false, false, false),
        };
        vec![
            MenuItem::new(MagicGuildAction::Learn.as_str(), "Study", ServiceType::Wizard)
                .with_description("Take instruction in a new spell")
                .enabled(bound && any_student),
            MenuItem::new(MagicGuildAction::BuyBook.as_str(), "Spellbooks", ServiceType::List)
                .with_description("Browse the book shelf")
                .enabled(bound),
            MenuItem::new(MagicGuildAction::Analyze.as_str(), "Analyze", ServiceType::Wizard)
                .with_description("Identify an unknown item")
                .enabled(bound && any_unknown),
        ]
    }

    fn can_execute(&self, action: &str) -> bool {
        action.parse::<MagicGuildAction>().is_ok()
    }

    fn validate_params(&self, _action: &str, params: &ActionParams) -> TownResult<()> {
        if !self.has_party() {
            return Err(TownError::NoPartyBound);
        }
        if params.quantity == Some(0) {
            return Err(TownError::MalformedParams(
                "quantity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn execute_action(&mut self, action: &str, params: &ActionParams) -> TownResult<Outcome> {
        let action = parse_action(FacilityId::MagicGuild, action)?;
        match request(action, params) {
            MagicRequest::LearnSelectStudent => {
                let party_rc = self.party.as_ref().ok_or(TownError::NoPartyBound)?;
                let party = party_rc.borrow();
                let students = character_entries(&party, |m| {
                    m.is_alive() && !self.teachable(m).is_empty()
                });
                if students.is_empty() {
                    return Ok(Outcome::info("No one here is ready for new spells."));
                }
                Ok(Outcome::info_with(
                    "Who shall study?",
                    OutcomeData::Characters(students),
                ))
            }
            MagicRequest::LearnSelectSpell { student } => {
                let party_rc = self.party.as_ref().ok_or(TownError::NoPartyBound)?;
                let party = party_rc.borrow();
                let member = party
                    .member(student)
                    .ok_or(TownError::MemberNotFound(student))?;
                let spells = self.teachable(member);
                if spells.is_empty() {
                    return Ok(Outcome::info(format!(
                        "There is nothing left to teach {}.",
                        member.name
                    )));
                }
                Ok(Outcome::info_with(
                    format!("What shall {} study?", member.name),
                    OutcomeData::Spells(spells),
                ))
            }
            MagicRequest::LearnQuote { student, spell } => self.quote_learn(student, &spell),
            MagicRequest::LearnCommit { student, spell } => self.commit_learn(student, &spell),
            MagicRequest::BrowseBooks => Ok(Outcome::info_with(
                "The book shelf.",
                OutcomeData::Wares(ware_entries(&self.books)),
            )),
            MagicRequest::BookQuote {
                item,
                quantity,
                recipient,
            } => self.quote_book(&item, quantity, recipient),
            MagicRequest::BookCommit {
                item,
                quantity,
                recipient,
            } => self.commit_book(&item, quantity, recipient),
            MagicRequest::AnalyzeSelect => {
                let party_rc = self.party.as_ref().ok_or(TownError::NoPartyBound)?;
                let party = party_rc.borrow();
                let unknown = carried_entries(&party, |i| !i.identified);
                if unknown.is_empty() {
                    return Ok(Outcome::info("The party carries no mysteries."));
                }
                Ok(Outcome::info_with(
                    "Which item shall be divined?",
                    OutcomeData::Items(unknown),
                ))
            }
            MagicRequest::AnalyzeQuote { item } => self.quote_analyze(&item),
            MagicRequest::AnalyzeCommit { item } => self.commit_analyze(&item),
        }
    }

    fn bind_party(&mut self, party: SharedParty) {
        self.party = Some(party);
    }

    fn unbind_party(&mut self) {
        self.party = None;
    }

    fn party(&self) -> Option<&SharedParty> {
        self.party.as_ref()
    }

    fn action_cost(&self, action: &str, params: &ActionParams) -> Option<u32> {
        let action: MagicGuildAction = action.parse().ok()?;
        match action {
            MagicGuildAction::Learn => {
                let spell = self.find_spell(params.spell.as_ref()?).ok()?;
                Some(spell.price)
            }
            MagicGuildAction::BuyBook => {
                let row = find_ware(&self.books, params.item.as_ref()?).ok()?;
                Some(row.item.price * params.quantity.unwrap_or(1))
            }
            MagicGuildAction::Analyze => {
                let party = self.party.as_ref()?.borrow();
                let (_, item) = find_carried(&party, params.item.as_ref()?)?;
                Some(Self::analyze_fee(&item))
            }
        }
    }
}

/// The standard curriculum.
fn default_curriculum() -> Vec<Spell> {
    vec![
        Spell::new("halito", "Halito", SpellSchool::Mage, 1, 100),
        Spell::new("mogref", "Mogref", SpellSchool::Mage, 1, 100),
        Spell::new("dilto", "Dilto", SpellSchool::Mage, 2, 250),
        Spell::new("mahalito", "Mahalito", SpellSchool::Mage, 3, 500),
        Spell::new("dios", "Dios", SpellSchool::Priest, 1, 100),
        Spell::new("badios", "Badios", SpellSchool::Priest, 1, 100),
        Spell::new("matu", "Matu", SpellSchool::Priest, 2, 250),
        Spell::new("dial", "Dial", SpellSchool::Priest, 3, 500),
    ]
}

/// The standard book shelf.
fn default_books() -> Vec<WareRow> {
    vec![
        WareRow::new(
            Item::new("tome_halito", "Tome of Halito", ItemKind::Spellbook, 300),
            2,
        ),
        WareRow::new(
            Item::new("tome_dios", "Tome of Dios", ItemKind::Spellbook, 300),
            2,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use gh_core::CharacterClass;

    fn guild_and_party(gold: u32) -> (MagicGuildService, SharedParty, CharacterId) {
        let mut p = Party::new("Band", gold);
        p.add_member(Character::new("Merrin", CharacterClass::Mage).with_level(5))
            .unwrap();
        let merrin = p.member_by_name("Merrin").unwrap().id;
        let party = p.shared();
        let mut g = MagicGuildService::new();
        g.bind_party(Rc::clone(&party));
        (g, party, merrin)
    }

    fn halito() -> SpellId {
        SpellId::new("halito")
    }

    #[test]
    fn learn_walks_through_every_step() {
        let (mut guild, party, merrin) = guild_and_party(1000);

        // No student named: who shall study?
        let step1 = guild.execute_action("learn", &ActionParams::new()).unwrap();
        assert!(matches!(step1.data, Some(OutcomeData::Characters(_))));

        // Student named: what shall they study?
        let step2 = guild
            .execute_action("learn", &ActionParams::new().with_character(merrin))
            .unwrap();
        match &step2.data {
            Some(OutcomeData::Spells(spells)) => {
                // A level-5 mage may study up to tier 3 mage spells.
                assert!(spells.iter().any(|s| s.spell == halito()));
                assert!(spells.iter().all(|s| s.tier <= 3));
                assert!(spells.iter().all(|s| s.spell.as_str() != "dios"));
            }
            other => panic!("expected spells, got {other:?}"),
        }

        // Spell named: quote.
        let quote = guild
            .execute_action(
                "learn",
                &ActionParams::new().with_character(merrin).with_spell(halito()),
            )
            .unwrap();
        assert!(quote.needs_confirmation());

        // Confirmed: commit.
        let done = guild
            .execute_action(
                "learn",
                &ActionParams::new()
                    .with_character(merrin)
                    .with_spell(halito())
                    .confirm(),
            )
            .unwrap();
        assert!(done.is_success());
        assert!(party.borrow().member(merrin).unwrap().knows_spell(&halito()));
        assert_eq!(party.borrow().gold, 900);
    }

    #[test]
    fn known_spell_is_refused() {
        let (mut guild, party, merrin) = guild_and_party(1000);
        party.borrow_mut().member_mut(merrin).unwrap().learn_spell(halito());
        let refused = guild
            .execute_action(
                "learn",
                &ActionParams::new()
                    .with_character(merrin)
                    .with_spell(halito())
                    .confirm(),
            )
            .unwrap();
        assert!(refused.is_warning());
        assert!(refused.message.contains("already knows"));
        assert_eq!(party.borrow().gold, 1000);
    }

    #[test]
    fn wrong_school_is_refused() {
        let (mut guild, party, merrin) = guild_and_party(1000);
        let refused = guild
            .execute_action(
                "learn",
                &ActionParams::new()
                    .with_character(merrin)
                    .with_spell(SpellId::new("dios"))
                    .confirm(),
            )
            .unwrap();
        assert!(refused.is_warning());
        assert!(refused.message.contains("cannot study"));
        assert_eq!(party.borrow().gold, 1000);
    }

    #[test]
    fn advanced_spell_needs_levels() {
        let mut p = Party::new("Band", 1000);
        p.add_member(Character::new("Novice", CharacterClass::Mage).with_level(1))
            .unwrap();
        let novice = p.member_by_name("Novice").unwrap().id;
        let party = p.shared();
        let mut guild = MagicGuildService::new();
        guild.bind_party(Rc::clone(&party));

        let refused = guild
            .execute_action(
                "learn",
                &ActionParams::new()
                    .with_character(novice)
                    .with_spell(SpellId::new("mahalito"))
                    .confirm(),
            )
            .unwrap();
        assert!(refused.is_warning());
        assert!(refused.message.contains("too advanced"));
    }

    #[test]
    fn tuition_gate_checks_gold() {
        let (mut guild, party, merrin) = guild_and_party(50);
        let refused = guild
            .execute_action(
                "learn",
                &ActionParams::new()
                    .with_character(merrin)
                    .with_spell(halito())
                    .confirm(),
            )
            .unwrap();
        assert!(refused.is_warning());
        assert_eq!(party.borrow().gold, 50);
        assert!(!party.borrow().member(merrin).unwrap().knows_spell(&halito()));
    }

    #[test]
    fn book_purchase_uses_stock_semantics() {
        let (mut guild, party, merrin) = guild_and_party(1000);
        let params = ActionParams::new()
            .with_item(ItemId::new("tome_halito"))
            .with_quantity(3)
            .with_character(merrin)
            .confirm();
        let refused = guild.execute_action("buy_book", &params).unwrap();
        assert!(refused.is_warning());
        assert!(refused.message.contains("insufficient stock"));
        assert_eq!(party.borrow().gold, 1000);

        let done = guild
            .execute_action(
                "buy_book",
                &ActionParams::new()
                    .with_item(ItemId::new("tome_halito"))
                    .with_character(merrin)
                    .confirm(),
            )
            .unwrap();
        assert!(done.is_success());
        assert_eq!(party.borrow().gold, 700);
        assert_eq!(guild.books()[0].stock, 1);
    }

    #[test]
    fn analyze_reveals_true_names() {
        let (mut guild, party, merrin) = guild_and_party(1000);
        party
            .borrow_mut()
            .member_mut(merrin)
            .unwrap()
            .give_item(Item::unidentified("odd_ring", "Ring of Warding", ItemKind::Curio, 800))
            .unwrap();

        let listing = guild.execute_action("analyze", &ActionParams::new()).unwrap();
        match &listing.data {
            Some(OutcomeData::Items(rows)) => assert_eq!(rows[0].name, "?curio"),
            other => panic!("expected items, got {other:?}"),
        }

        let ring = ItemId::new("odd_ring");
        let quote = guild
            .execute_action("analyze", &ActionParams::new().with_item(ring.clone()))
            .unwrap();
        assert_eq!(
            quote.data,
            Some(OutcomeData::AnalyzeQuote {
                item: ring.clone(),
                cost: 400
            })
        );

        let done = guild
            .execute_action("analyze", &ActionParams::new().with_item(ring.clone()).confirm())
            .unwrap();
        assert!(done.is_success());
        assert!(done.message.contains("Ring of Warding"));
        assert_eq!(party.borrow().gold, 600);
        let p = party.borrow();
        let item = p.member(merrin).unwrap().item(&ring).unwrap();
        assert!(item.identified);
    }

    #[test]
    fn analyze_fee_has_a_floor() {
        let trinket = Item::unidentified("bead", "Lucky Bead", ItemKind::Curio, 20);
        assert_eq!(MagicGuildService::analyze_fee(&trinket), 50);
    }

    #[test]
    fn analyzing_the_known_is_informational() {
        let (mut guild, party, merrin) = guild_and_party(1000);
        party
            .borrow_mut()
            .member_mut(merrin)
            .unwrap()
            .give_item(Item::new("rope", "Rope", ItemKind::Curio, 10))
            .unwrap();
        let note = guild
            .execute_action(
                "analyze",
                &ActionParams::new().with_item(ItemId::new("rope")).confirm(),
            )
            .unwrap();
        assert_eq!(note.kind, crate::outcome::OutcomeKind::Info);
        assert_eq!(party.borrow().gold, 1000);
    }
}
