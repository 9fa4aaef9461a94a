//! The temple: resurrection, cures, and blessings.
//!
//! Resurrection pricing follows the old rites: one hundred gold per level of
//! the fallen, half again when only ashes remain. Every commit re-checks
//! status, vitality, and gold against live party state; the quote is a
//! display artifact, never a promise.

use std::rc::Rc;
use std::str::FromStr;

use tracing::debug;

use gh_core::{CharacterId, CharacterStatus, Party, SharedParty};

use crate::error::{TownError, TownResult};
use crate::facility::FacilityId;
use crate::menu::{MenuItem, ServiceType};
use crate::outcome::{Outcome, OutcomeData};
use crate::params::ActionParams;
use crate::service::{FacilityService, character_entries, gold_gate, parse_action};

/// Flat price of a blessing.
const BLESSING_COST: u32 = 500;

/// Actions the temple offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempleAction {
    /// Bring a dead member back.
    Resurrect,
    /// A party-wide blessing.
    Blessing,
    /// Clear a member's minor ailment.
    Cure,
}

impl TempleAction {
    /// The action id as a stable token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resurrect => "resurrect",
            Self::Blessing => "blessing",
            Self::Cure => "cure",
        }
    }
}

impl FromStr for TempleAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resurrect" => Ok(Self::Resurrect),
            "blessing" => Ok(Self::Blessing),
            "cure" => Ok(Self::Cure),
            _ => Err(()),
        }
    }
}

/// Typed rendition of one temple request.
enum TempleRequest {
    ResurrectSelect,
    ResurrectQuote { character: CharacterId },
    ResurrectCommit { character: CharacterId },
    BlessingQuote,
    BlessingCommit,
    CureSelect,
    CureQuote { character: CharacterId },
    CureCommit { character: CharacterId },
}

fn request(action: TempleAction, params: &ActionParams) -> TempleRequest {
    match (action, params.character, params.confirmed) {
        (TempleAction::Resurrect, None, _) => TempleRequest::ResurrectSelect,
        (TempleAction::Resurrect, Some(character), false) => {
            TempleRequest::ResurrectQuote { character }
        }
        (TempleAction::Resurrect, Some(character), true) => {
            TempleRequest::ResurrectCommit { character }
        }
        (TempleAction::Blessing, _, false) => TempleRequest::BlessingQuote,
        (TempleAction::Blessing, _, true) => TempleRequest::BlessingCommit,
        (TempleAction::Cure, None, _) => TempleRequest::CureSelect,
        (TempleAction::Cure, Some(character), false) => TempleRequest::CureQuote { character },
        (TempleAction::Cure, Some(character), true) => TempleRequest::CureCommit { character },
    }
}

/// The temple service.
#[derive(Debug, Default)]
pub struct TempleService {
    party: Option<SharedParty>,
}

/// Result of a precondition chain: refuse with an outcome, or proceed at
/// the given cost.
enum Gate {
    Refuse(Box<Outcome>),
    Proceed(u32),
}

impl TempleService {
    /// Create a temple.
    pub fn new() -> Self {
        Self::default()
    }

    fn resurrect_cost(level: u32, status: CharacterStatus) -> u32 {
        let base = level * 100;
        if status == CharacterStatus::Ashes {
            base * 3 / 2
        } else {
            base
        }
    }

    /// Shared guard chain for resurrect quote and commit. Returns the cost
    /// when every precondition holds.
    fn resurrect_gate(party: &Party, character: CharacterId) -> TownResult<Gate> {
        let member = party
            .member(character)
            .ok_or(TownError::MemberNotFound(character))?;
        if !member.status.is_recoverable_death() {
            return Ok(Gate::Refuse(Box::new(Outcome::error(format!(
                "{} is not in need of resurrection",
                member.name
            )))));
        }
        if member.vitality == 0 {
            // Terminal for this target: no retry can succeed.
            return Ok(Gate::Refuse(Box::new(Outcome::error(format!(
                "{}'s vitality is spent; no rite can reach them now",
                member.name
            )))));
        }
        let cost = Self::resurrect_cost(member.level, member.status);
        if let Some(short) = gold_gate(cost, party.gold) {
            return Ok(Gate::Refuse(Box::new(short)));
        }
        Ok(Gate::Proceed(cost))
    }

    fn quote_resurrect(party: &Party, character: CharacterId) -> TownResult<Outcome> {
        match Self::resurrect_gate(party, character)? {
            Gate::Refuse(o) => Ok(*o),
            Gate::Proceed(cost) => {
                let name = party
                    .member(character)
                    .map(|m| m.name.clone())
                    .unwrap_or_default();
                Ok(Outcome::confirm(
                    format!("Raising {name} will cost {cost} gold. Proceed?"),
                    OutcomeData::ResurrectQuote { character, cost },
                ))
            }
        }
    }

    fn commit_resurrect(party: &mut Party, character: CharacterId) -> TownResult<Outcome> {
        let cost = match Self::resurrect_gate(party, character)? {
            Gate::Refuse(o) => return Ok(*o),
            Gate::Proceed(cost) => cost,
        };

        party.try_debit_gold(cost)?;
        let member = party
            .member_mut(character)
            .ok_or(TownError::MemberNotFound(character))?;
        member.status = CharacterStatus::Normal;
        member.hp = 1;
        member.vitality -= 1;
        debug!(name = %member.name, cost, "resurrection performed");
        Ok(Outcome::ok_with(
            format!("{} draws breath again.", member.name),
            OutcomeData::Resurrected {
                character,
                cost,
                vitality_left: member.vitality,
            },
        ))
    }

    fn quote_blessing(party: &Party) -> Outcome {
        if let Some(short) = gold_gate(BLESSING_COST, party.gold) {
            return short;
        }
        Outcome::confirm(
            format!("A blessing for the party costs {BLESSING_COST} gold. Proceed?"),
            OutcomeData::BlessingQuote {
                cost: BLESSING_COST,
            },
        )
    }

    fn commit_blessing(party: &mut Party) -> TownResult<Outcome> {
        if let Some(short) = gold_gate(BLESSING_COST, party.gold) {
            return Ok(short);
        }
        party.try_debit_gold(BLESSING_COST)?;
        Ok(Outcome::ok_with(
            "Light settles on the party's shoulders.",
            OutcomeData::Blessed {
                cost: BLESSING_COST,
            },
        )
        .with_meta("blessed", true))
    }

    fn cure_gate(party: &Party, character: CharacterId) -> TownResult<Gate> {
        let member = party
            .member(character)
            .ok_or(TownError::MemberNotFound(character))?;
        if member.status == CharacterStatus::Normal {
            return Ok(Gate::Refuse(Box::new(Outcome::info(format!(
                "{} needs no cure",
                member.name
            )))));
        }
        if !member.status.is_minor_ailment() {
            return Ok(Gate::Refuse(Box::new(Outcome::error(format!(
                "{} is beyond a simple cure",
                member.name
            )))));
        }
        let cost = member.level * 10;
        if let Some(short) = gold_gate(cost, party.gold) {
            return Ok(Gate::Refuse(Box::new(short)));
        }
        Ok(Gate::Proceed(cost))
    }

    fn quote_cure(party: &Party, character: CharacterId) -> TownResult<Outcome> {
        match Self::cure_gate(party, character)? {
            Gate::Refuse(o) => Ok(*o),
            Gate::Proceed(cost) => {
                let name = party
                    .member(character)
                    .map(|m| m.name.clone())
                    .unwrap_or_default();
                Ok(Outcome::confirm(
                    format!("Curing {name} will cost {cost} gold. Proceed?"),
                    OutcomeData::CureQuote { character, cost },
                ))
            }
        }
    }

    fn commit_cure(party: &mut Party, character: CharacterId) -> TownResult<Outcome> {
        let cost = match Self::cure_gate(party, character)? {
            Gate::Refuse(o) => return Ok(*o),
            Gate::Proceed(cost) => cost,
        };

        party.try_debit_gold(cost)?;
        let member = party
            .member_mut(character)
            .ok_or(TownError::MemberNotFound(character))?;
        member.status = CharacterStatus::Normal;
        Ok(Outcome::ok_with(
            format!("{} stands straight again.", member.name),
            OutcomeData::Cured { character, cost },
        ))
    }
}

impl FacilityService for TempleService {
    fn facility_id(&self) -> FacilityId {
        FacilityId::Temple
    }

    fn menu_items(&self) -> Vec<MenuItem> {
        let (bound, any_dead, any_ailing) = match &self.party {
            Some(p) => {
                let p = p.borrow();
                (
                    true,
                    p.members.iter().any(|m| m.status.is_recoverable_death()),
                    p.members.iter().any(|m| m.status.is_minor_ailment()),
                )
            }
            None => (false, false, false),
        };
        vec![
            MenuItem::new(TempleAction::Resurrect.as_str(), "Resurrect", ServiceType::Wizard)
                .with_description("Bring a fallen member back to life")
                .enabled(bound && any_dead),
            MenuItem::new(TempleAction::Cure.as_str(), "Cure", ServiceType::Wizard)
                .with_description("Clear poison or paralysis")
                .enabled(bound && any_ailing),
            MenuItem::new(TempleAction::Blessing.as_str(), "Blessing", ServiceType::Action)
                .with_description("A blessing for the road ahead")
                .enabled(bound),
        ]
    }

    fn can_execute(&self, action: &str) -> bool {
        action.parse::<TempleAction>().is_ok()
    }

    fn validate_params(&self, _action: &str, _params: &ActionParams) -> TownResult<()> {
        if !self.has_party() {
            return Err(TownError::NoPartyBound);
        }
        Ok(())
    }

    fn execute_action(&mut self, action: &str, params: &ActionParams) -> TownResult<Outcome> {
        let action = parse_action(FacilityId::Temple, action)?;
        let party_rc = Rc::clone(self.party.as_ref().ok_or(TownError::NoPartyBound)?);
        match request(action, params) {
            TempleRequest::ResurrectSelect => {
                let party = party_rc.borrow();
                let fallen =
                    character_entries(&party, |m| m.status.is_recoverable_death());
                if fallen.is_empty() {
                    return Ok(Outcome::info("No one here needs resurrection."));
                }
                Ok(Outcome::info_with(
                    "Who shall be raised?",
                    OutcomeData::Characters(fallen),
                ))
            }
            TempleRequest::ResurrectQuote { character } => {
                Self::quote_resurrect(&party_rc.borrow(), character)
            }
            TempleRequest::ResurrectCommit { character } => {
                Self::commit_resurrect(&mut party_rc.borrow_mut(), character)
            }
            TempleRequest::BlessingQuote => Ok(Self::quote_blessing(&party_rc.borrow())),
            TempleRequest::BlessingCommit => Self::commit_blessing(&mut party_rc.borrow_mut()),
            TempleRequest::CureSelect => {
                let party = party_rc.borrow();
                let ailing = character_entries(&party, |m| m.status.is_minor_ailment());
                if ailing.is_empty() {
                    return Ok(Outcome::info("No one here needs a cure."));
                }
                Ok(Outcome::info_with(
                    "Who shall be cured?",
                    OutcomeData::Characters(ailing),
                ))
            }
            TempleRequest::CureQuote { character } => {
                Self::quote_cure(&party_rc.borrow(), character)
            }
            TempleRequest::CureCommit { character } => {
                Self::commit_cure(&mut party_rc.borrow_mut(), character)
            }
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
        let action: TempleAction = action.parse().ok()?;
        let party = self.party.as_ref()?.borrow();
        match action {
            TempleAction::Blessing => Some(BLESSING_COST),
            TempleAction::Resurrect => {
                let member = party.member(params.character?)?;
                Some(Self::resurrect_cost(member.level, member.status))
            }
            TempleAction::Cure => {
                let member = party.member(params.character?)?;
                Some(member.level * 10)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gh_core::{Character, CharacterClass};

    fn party_with_dead(
        gold: u32,
        status: CharacterStatus,
        level: u32,
    ) -> (SharedParty, CharacterId) {
        let mut p = Party::new("Band", gold);
        p.add_member(Character::new("Aldric", CharacterClass::Fighter).with_level(6))
            .unwrap();
        p.add_member(
            Character::new("Tam", CharacterClass::Thief)
                .with_level(level)
                .with_hp(0, 14)
                .with_status(status)
                .with_vitality(10),
        )
        .unwrap();
        let id = p.member_by_name("Tam").unwrap().id;
        (p.shared(), id)
    }

    fn temple_with(party: &SharedParty) -> TempleService {
        let mut t = TempleService::new();
        t.bind_party(Rc::clone(party));
        t
    }

    #[test]
    fn resurrect_quote_then_commit() {
        let (party, tam) = party_with_dead(1000, CharacterStatus::Dead, 5);
        let mut temple = temple_with(&party);

        let quote = temple
            .execute_action("resurrect", &ActionParams::new().with_character(tam))
            .unwrap();
        assert!(quote.needs_confirmation());
        assert_eq!(
            quote.data,
            Some(OutcomeData::ResurrectQuote {
                character: tam,
                cost: 500
            })
        );

        let done = temple
            .execute_action(
                "resurrect",
                &ActionParams::new().with_character(tam).confirm(),
            )
            .unwrap();
        assert!(done.is_success());
        let p = party.borrow();
        let revived = p.member(tam).unwrap();
        assert_eq!(revived.status, CharacterStatus::Normal);
        assert_eq!(revived.hp, 1);
        assert_eq!(revived.vitality, 9);
        assert_eq!(p.gold, 500);
    }

    #[test]
    fn ashes_cost_half_again() {
        let (party, tam) = party_with_dead(1000, CharacterStatus::Ashes, 4);
        let mut temple = temple_with(&party);
        let quote = temple
            .execute_action("resurrect", &ActionParams::new().with_character(tam))
            .unwrap();
        // 400 * 1.5 = 600, floored arithmetic.
        assert_eq!(
            quote.data,
            Some(OutcomeData::ResurrectQuote {
                character: tam,
                cost: 600
            })
        );
    }

    #[test]
    fn spent_vitality_is_terminal() {
        let mut p = Party::new("Band", 5000);
        p.add_member(
            Character::new("Tam", CharacterClass::Thief)
                .with_level(5)
                .with_hp(0, 14)
                .with_status(CharacterStatus::Dead)
                .with_vitality(0),
        )
        .unwrap();
        let tam = p.member_by_name("Tam").unwrap().id;
        let party = p.shared();
        let mut temple = temple_with(&party);

        let refused = temple
            .execute_action(
                "resurrect",
                &ActionParams::new().with_character(tam).confirm(),
            )
            .unwrap();
        assert!(refused.is_error());
        assert!(refused.message.contains("vitality"));
        assert_eq!(party.borrow().gold, 5000);
    }

    #[test]
    fn short_purse_leaves_the_dead_dead() {
        let (party, tam) = party_with_dead(100, CharacterStatus::Dead, 5);
        let mut temple = temple_with(&party);
        let refused = temple
            .execute_action(
                "resurrect",
                &ActionParams::new().with_character(tam).confirm(),
            )
            .unwrap();
        assert!(refused.is_warning());
        let p = party.borrow();
        assert_eq!(p.gold, 100);
        assert_eq!(p.member(tam).unwrap().status, CharacterStatus::Dead);
        assert_eq!(p.member(tam).unwrap().vitality, 10);
    }

    #[test]
    fn living_member_cannot_be_resurrected() {
        let (party, _) = party_with_dead(1000, CharacterStatus::Dead, 5);
        let aldric = party.borrow().member_by_name("Aldric").unwrap().id;
        let mut temple = temple_with(&party);
        let refused = temple
            .execute_action("resurrect", &ActionParams::new().with_character(aldric))
            .unwrap();
        assert!(refused.is_error());
    }

    #[test]
    fn resurrect_without_target_lists_the_fallen() {
        let (party, tam) = party_with_dead(1000, CharacterStatus::Dead, 5);
        let mut temple = temple_with(&party);
        let list = temple
            .execute_action("resurrect", &ActionParams::new())
            .unwrap();
        assert!(list.is_success());
        match list.data {
            Some(OutcomeData::Characters(entries)) => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].id, tam);
            }
            other => panic!("expected character list, got {other:?}"),
        }
    }

    #[test]
    fn blessing_debits_flat_fee_and_flags() {
        let (party, _) = party_with_dead(1000, CharacterStatus::Dead, 5);
        let mut temple = temple_with(&party);

        let quote = temple
            .execute_action("blessing", &ActionParams::new())
            .unwrap();
        assert!(quote.needs_confirmation());

        let done = temple
            .execute_action("blessing", &ActionParams::new().confirm())
            .unwrap();
        assert!(done.is_success());
        assert_eq!(
            done.meta("blessed"),
            Some(&crate::outcome::MetaValue::Boolean(true))
        );
        assert_eq!(party.borrow().gold, 500);
    }

    #[test]
    fn cure_flow() {
        let mut p = Party::new("Band", 1000);
        p.add_member(
            Character::new("Sera", CharacterClass::Priest)
                .with_level(5)
                .with_status(CharacterStatus::Poisoned),
        )
        .unwrap();
        let sera = p.member_by_name("Sera").unwrap().id;
        let party = p.shared();
        let mut temple = temple_with(&party);

        let quote = temple
            .execute_action("cure", &ActionParams::new().with_character(sera))
            .unwrap();
        assert_eq!(
            quote.data,
            Some(OutcomeData::CureQuote {
                character: sera,
                cost: 50
            })
        );

        let done = temple
            .execute_action("cure", &ActionParams::new().with_character(sera).confirm())
            .unwrap();
        assert!(done.is_success());
        let p = party.borrow();
        assert_eq!(p.member(sera).unwrap().status, CharacterStatus::Normal);
        assert_eq!(p.gold, 950);
    }

    #[test]
    fn cure_of_the_healthy_is_informational() {
        let (party, _) = party_with_dead(1000, CharacterStatus::Dead, 5);
        let aldric = party.borrow().member_by_name("Aldric").unwrap().id;
        let mut temple = temple_with(&party);
        let note = temple
            .execute_action("cure", &ActionParams::new().with_character(aldric).confirm())
            .unwrap();
        assert_eq!(note.kind, crate::outcome::OutcomeKind::Info);
        assert_eq!(party.borrow().gold, 1000);
    }

    #[test]
    fn cure_cannot_reach_the_dead() {
        let (party, tam) = party_with_dead(1000, CharacterStatus::Dead, 5);
        let mut temple = temple_with(&party);
        let refused = temple
            .execute_action("cure", &ActionParams::new().with_character(tam))
            .unwrap();
        assert!(refused.is_error());
    }

    #[test]
    fn unknown_member_is_a_fault() {
        let (party, _) = party_with_dead(1000, CharacterStatus::Dead, 5);
        let mut temple = temple_with(&party);
        let err = temple.execute_action(
            "resurrect",
            &ActionParams::new().with_character(CharacterId::new()),
        );
        assert!(matches!(err, Err(TownError::MemberNotFound(_))));
    }

    #[test]
    fn menu_reflects_party_state() {
        let (party, _) = party_with_dead(1000, CharacterStatus::Dead, 5);
        let temple = temple_with(&party);
        let menu = temple.menu_items();
        let by_id = |id: &str| menu.iter().find(|m| m.id == id).unwrap();
        assert!(by_id("resurrect").enabled);
        assert!(!by_id("cure").enabled);
        assert!(by_id("blessing").enabled);
    }
}
