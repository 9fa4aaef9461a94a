//! The inn: a night's rest for the whole party.

use std::rc::Rc;
use std::str::FromStr;

use gh_core::{Party, SharedParty};

use crate::error::{TownError, TownResult};
use crate::facility::FacilityId;
use crate::menu::{MenuItem, ServiceType};
use crate::outcome::{Outcome, OutcomeData};
use crate::params::ActionParams;
use crate::service::{FacilityService, gold_gate, parse_action};

/// Base nightly rate, multiplied by the party's average living level.
const BASE_REST_COST: u32 = 10;

/// Actions the inn offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InnAction {
    /// Rest the whole party.
    Rest,
}

impl InnAction {
    /// The action id as a stable token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rest => "rest",
        }
    }
}

impl FromStr for InnAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rest" => Ok(Self::Rest),
            _ => Err(()),
        }
    }
}

/// The inn service.
#[derive(Debug)]
pub struct InnService {
    party: Option<SharedParty>,
    base_cost: u32,
}

impl InnService {
    /// Create an inn with the standard nightly rate.
    pub fn new() -> Self {
        Self {
            party: None,
            base_cost: BASE_REST_COST,
        }
    }

    fn rest_cost(&self, party: &Party) -> TownResult<u32> {
        Ok(self.base_cost * party.average_living_level()?)
    }

    fn quote_rest(&self, party: &Party) -> TownResult<Outcome> {
        if party.living_count() == 0 {
            return Ok(Outcome::error("No one in the party is standing."));
        }
        if !party.living_members().any(|m| m.needs_rest()) {
            return Ok(Outcome::info("The party is already well rested."));
        }
        let cost = self.rest_cost(party)?;
        if let Some(short) = gold_gate(cost, party.gold) {
            return Ok(short);
        }
        Ok(Outcome::confirm(
            format!("A night's rest for the party costs {cost} gold. Proceed?"),
            OutcomeData::RestQuote { cost },
        ))
    }

    fn commit_rest(&self, party: &mut Party) -> TownResult<Outcome> {
        // Same guards as the quote, re-checked against live state.
        if party.living_count() == 0 {
            return Ok(Outcome::error("No one in the party is standing."));
        }
        if !party.living_members().any(|m| m.needs_rest()) {
            return Ok(Outcome::info("The party is already well rested."));
        }
        let cost = self.rest_cost(party)?;
        if let Some(short) = gold_gate(cost, party.gold) {
            return Ok(short);
        }

        party.try_debit_gold(cost)?;
        let mut healed = 0;
        for member in party.members.iter_mut().filter(|m| m.is_alive()) {
            if member.restore() {
                healed += 1;
            }
        }
        Ok(Outcome::ok_with(
            format!("The party wakes refreshed. {cost} gold well spent."),
            OutcomeData::Rested { cost, healed },
        ))
    }
}

impl Default for InnService {
    fn default() -> Self {
        Self::new()
    }
}

impl FacilityService for InnService {
    fn facility_id(&self) -> FacilityId {
        FacilityId::Inn
    }

    fn menu_items(&self) -> Vec<MenuItem> {
        let ready = self
            .party
            .as_ref()
            .is_some_and(|p| p.borrow().living_count() > 0);
        vec![
            MenuItem::new(InnAction::Rest.as_str(), "Rest", ServiceType::Action)
                .with_description("A night's rest for the whole party")
                .enabled(ready),
        ]
    }

    fn can_execute(&self, action: &str) -> bool {
        action.parse::<InnAction>().is_ok()
    }

    fn validate_params(&self, _action: &str, _params: &ActionParams) -> TownResult<()> {
        if !self.has_party() {
            return Err(TownError::NoPartyBound);
        }
        Ok(())
    }

    fn execute_action(&mut self, action: &str, params: &ActionParams) -> TownResult<Outcome> {
        let InnAction::Rest = parse_action(FacilityId::Inn, action)?;
        let party_rc = Rc::clone(self.party.as_ref().ok_or(TownError::NoPartyBound)?);
        if params.confirmed {
            self.commit_rest(&mut party_rc.borrow_mut())
        } else {
            self.quote_rest(&party_rc.borrow())
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

    fn action_cost(&self, action: &str, _params: &ActionParams) -> Option<u32> {
        let _: InnAction = action.parse().ok()?;
        let party = self.party.as_ref()?;
        self.rest_cost(&party.borrow()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gh_core::{Character, CharacterClass, CharacterStatus};

    fn wounded_party(gold: u32) -> SharedParty {
        let mut p = Party::new("Band", gold);
        p.add_member(
            Character::new("Aldric", CharacterClass::Fighter)
                .with_level(6)
                .with_hp(4, 20),
        )
        .unwrap();
        p.add_member(
            Character::new("Merrin", CharacterClass::Mage)
                .with_level(5)
                .with_mp(0, 12),
        )
        .unwrap();
        p.shared()
    }

    fn inn_with(party: &SharedParty) -> InnService {
        let mut inn = InnService::new();
        inn.bind_party(Rc::clone(party));
        inn
    }

    #[test]
    fn quote_prices_by_average_living_level() {
        let party = wounded_party(1000);
        let mut inn = inn_with(&party);
        let quote = inn.execute_action("rest", &ActionParams::new()).unwrap();
        assert!(quote.needs_confirmation());
        // (6 + 5) / 2 = 5, times the base 10.
        assert_eq!(quote.data, Some(OutcomeData::RestQuote { cost: 50 }));
    }

    #[test]
    fn commit_heals_everyone_and_charges() {
        let party = wounded_party(1000);
        let mut inn = inn_with(&party);
        let done = inn
            .execute_action("rest", &ActionParams::new().confirm())
            .unwrap();
        assert!(done.is_success());
        assert_eq!(done.data, Some(OutcomeData::Rested { cost: 50, healed: 2 }));
        let p = party.borrow();
        assert_eq!(p.gold, 950);
        assert!(p.members.iter().all(|m| m.hp == m.max_hp && m.mp == m.max_mp));
    }

    #[test]
    fn short_purse_warns_and_changes_nothing() {
        let party = wounded_party(40);
        let mut inn = inn_with(&party);
        let refused = inn
            .execute_action("rest", &ActionParams::new().confirm())
            .unwrap();
        assert!(refused.is_warning());
        let p = party.borrow();
        assert_eq!(p.gold, 40);
        assert_eq!(p.member_by_name("Aldric").unwrap().hp, 4);
    }

    #[test]
    fn well_rested_party_is_not_charged() {
        let party = Party::new("Fresh", 500);
        let party = {
            let mut p = party;
            p.add_member(Character::new("Aldric", CharacterClass::Fighter).with_level(6))
                .unwrap();
            p.shared()
        };
        let mut inn = inn_with(&party);
        let done = inn
            .execute_action("rest", &ActionParams::new().confirm())
            .unwrap();
        assert_eq!(done.kind, crate::outcome::OutcomeKind::Info);
        assert!(done.message.contains("already well"));
        assert_eq!(party.borrow().gold, 500);
    }

    #[test]
    fn rest_cures_minor_ailments() {
        let mut p = Party::new("Band", 1000);
        p.add_member(
            Character::new("Tam", CharacterClass::Thief)
                .with_level(4)
                .with_status(CharacterStatus::Poisoned),
        )
        .unwrap();
        let party = p.shared();
        let mut inn = inn_with(&party);
        inn.execute_action("rest", &ActionParams::new().confirm())
            .unwrap();
        assert_eq!(
            party.borrow().member_by_name("Tam").unwrap().status,
            CharacterStatus::Normal
        );
    }

    #[test]
    fn dead_members_stay_dead_and_do_not_price() {
        let mut p = Party::new("Band", 1000);
        p.add_member(Character::new("Aldric", CharacterClass::Fighter).with_level(9))
            .unwrap();
        p.add_member(
            Character::new("Tam", CharacterClass::Thief)
                .with_level(1)
                .with_hp(0, 14)
                .with_status(CharacterStatus::Dead),
        )
        .unwrap();
        // Aldric needs nothing, so resting is a no-op even though Tam is down.
        let party = p.shared();
        let mut inn = inn_with(&party);
        let done = inn
            .execute_action("rest", &ActionParams::new().confirm())
            .unwrap();
        assert!(done.message.contains("already well"));
        assert_eq!(
            party.borrow().member_by_name("Tam").unwrap().status,
            CharacterStatus::Dead
        );
    }

    #[test]
    fn an_all_dead_party_cannot_rest() {
        let mut p = Party::new("Ghosts", 1000);
        p.add_member(
            Character::new("Tam", CharacterClass::Thief)
                .with_hp(0, 14)
                .with_status(CharacterStatus::Dead),
        )
        .unwrap();
        let party = p.shared();
        let mut inn = inn_with(&party);
        let refused = inn
            .execute_action("rest", &ActionParams::new().confirm())
            .unwrap();
        assert!(refused.is_error());
        assert_eq!(party.borrow().gold, 1000);
    }

    #[test]
    fn unknown_action_is_rejected() {
        let party = wounded_party(100);
        let mut inn = inn_with(&party);
        assert!(!inn.can_execute("gamble"));
        assert!(matches!(
            inn.execute_action("gamble", &ActionParams::new()),
            Err(TownError::UnknownAction { .. })
        ));
    }

    #[test]
    fn unbound_service_reports_costs_unknowable() {
        let inn = InnService::new();
        assert!(!inn.has_party());
        assert_eq!(inn.action_cost("rest", &ActionParams::new()), None);
        assert!(!inn.can_afford("rest", &ActionParams::new()));
        assert!(inn.menu_items().iter().all(|m| !m.enabled));
    }
}
