//! The adventurers' guild: membership, class changes, and the party's name.
//!
//! The guild keeps a roster of candidates waiting for work. Registering
//! moves a candidate into the party; dismissing moves a member back. The
//! roster, like the shop's vault, survives between visits.

use std::rc::Rc;
use std::str::FromStr;

use tracing::debug;

use gh_core::{Character, CharacterClass, CharacterId, SharedParty};

use crate::error::{TownError, TownResult};
use crate::facility::FacilityId;
use crate::menu::{MenuItem, ServiceType};
use crate::outcome::{CharacterEntry, Outcome, OutcomeData};
use crate::params::ActionParams;
use crate::service::{FacilityService, character_entries, parse_action};

/// Level a member must reach before the guild will retrain them.
const CLASS_CHANGE_LEVEL: u32 = 5;

/// Actions the guild offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuildAction {
    /// Add a roster candidate to the party.
    Register,
    /// Return a member to the roster.
    Dismiss,
    /// Retrain a member into a new class.
    ChangeClass,
    /// Rename the party.
    RenameParty,
}

impl GuildAction {
    /// The action id as a stable token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Dismiss => "dismiss",
            Self::ChangeClass => "change_class",
            Self::RenameParty => "rename_party",
        }
    }
}

impl FromStr for GuildAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "register" => Ok(Self::Register),
            "dismiss" => Ok(Self::Dismiss),
            "change_class" => Ok(Self::ChangeClass),
            "rename_party" => Ok(Self::RenameParty),
            _ => Err(()),
        }
    }
}

/// Typed rendition of one guild request.
enum GuildRequest {
    RegisterSelect,
    Register { candidate: CharacterId },
    DismissSelect,
    Dismiss { member: CharacterId },
    ChangeClassSelect,
    ChangeClass {
        member: CharacterId,
        class: CharacterClass,
    },
    Rename { name: String },
}

fn request(action: GuildAction, params: &ActionParams) -> TownResult<GuildRequest> {
    Ok(match action {
        GuildAction::Register => match params.character {
            Some(candidate) => GuildRequest::Register { candidate },
            None => GuildRequest::RegisterSelect,
        },
        GuildAction::Dismiss => match params.character {
            Some(member) => GuildRequest::Dismiss { member },
            None => GuildRequest::DismissSelect,
        },
        GuildAction::ChangeClass => match (params.character, params.class) {
            (Some(member), Some(class)) => GuildRequest::ChangeClass { member, class },
            _ => GuildRequest::ChangeClassSelect,
        },
        GuildAction::RenameParty => {
            let name = params
                .name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .ok_or_else(|| {
                    TownError::MalformedParams("a party name is required".to_string())
                })?;
            GuildRequest::Rename { name }
        }
    })
}

/// The guild service.
#[derive(Debug)]
pub struct GuildService {
    party: Option<SharedParty>,
    roster: Vec<Character>,
}

impl GuildService {
    /// Create a guild with the standard candidate roster.
    pub fn new() -> Self {
        Self::with_roster(default_roster())
    }

    /// Create a guild with a custom roster.
    pub fn with_roster(roster: Vec<Character>) -> Self {
        Self {
            party: None,
            roster,
        }
    }

    /// Candidates waiting for work.
    pub fn roster(&self) -> &[Character] {
        &self.roster
    }

    fn roster_entries(&self) -> Vec<CharacterEntry> {
        self.roster
            .iter()
            .map(|c| CharacterEntry {
                id: c.id,
                name: c.name.clone(),
                level: c.level,
                status: c.status,
            })
            .collect()
    }

    fn register(&mut self, candidate: CharacterId) -> TownResult<Outcome> {
        let party_rc = Rc::clone(self.party.as_ref().ok_or(TownError::NoPartyBound)?);
        let mut party = party_rc.borrow_mut();
        let pos = self
            .roster
            .iter()
            .position(|c| c.id == candidate)
            .ok_or(TownError::CandidateNotFound(candidate))?;
        if party.is_full() {
            return Ok(Outcome::warning(format!(
                "the party is full ({} members)",
                party.members.len()
            )));
        }

        let recruit = self.roster.remove(pos);
        let name = recruit.name.clone();
        party.add_member(recruit)?;
        debug!(name = %name, "candidate registered");
        Ok(Outcome::ok_with(
            format!("{name} joins the party."),
            OutcomeData::RosterChanged {
                party_size: party.members.len(),
            },
        ))
    }

    fn dismiss(&mut self, member: CharacterId) -> TownResult<Outcome> {
        let party_rc = Rc::clone(self.party.as_ref().ok_or(TownError::NoPartyBound)?);
        let mut party = party_rc.borrow_mut();
        let dismissed = party.remove_member(member)?;
        let name = dismissed.name.clone();
        self.roster.push(dismissed);
        Ok(Outcome::ok_with(
            format!("{name} returns to the roster."),
            OutcomeData::RosterChanged {
                party_size: party.members.len(),
            },
        ))
    }

    fn change_class(&mut self, member: CharacterId, class: CharacterClass) -> TownResult<Outcome> {
        let party_rc = Rc::clone(self.party.as_ref().ok_or(TownError::NoPartyBound)?);
        let mut party = party_rc.borrow_mut();
        let target = party
            .member_mut(member)
            .ok_or(TownError::MemberNotFound(member))?;
        if target.level < CLASS_CHANGE_LEVEL {
            return Ok(Outcome::warning(format!(
                "{} has not proven themselves yet (level {CLASS_CHANGE_LEVEL} required)",
                target.name
            )));
        }
        if target.class == class {
            return Ok(Outcome::warning(format!(
                "{} is already a {class}",
                target.name
            )));
        }

        // Retraining starts over at level 1; the body remembers, the rank
        // does not.
        target.class = class;
        target.level = 1;
        Ok(Outcome::ok(format!(
            "{} takes up the path of the {class}.",
            target.name
        )))
    }

    fn rename(&self, name: &str) -> TownResult<Outcome> {
        let party_rc = self.party.as_ref().ok_or(TownError::NoPartyBound)?;
        let mut party = party_rc.borrow_mut();
        party.rename(name);
        Ok(Outcome::ok(format!("The party is now known as {name}.")))
    }
}

impl Default for GuildService {
    fn default() -> Self {
        Self::new()
    }
}

impl FacilityService for GuildService {
    fn facility_id(&self) -> FacilityId {
        FacilityId::Guild
    }

    fn menu_items(&self) -> Vec<MenuItem> {
        let (bound, has_members, has_room) = match &self.party {
            Some(p) => {
                let p = p.borrow();
                (true, !p.members.is_empty(), !p.is_full())
            }
            None => (false, false, false),
        };
        vec![
            MenuItem::new(GuildAction::Register.as_str(), "Register", ServiceType::Wizard)
                .with_description("Recruit a candidate from the roster")
                .enabled(bound && has_room && !self.roster.is_empty()),
            MenuItem::new(GuildAction::Dismiss.as_str(), "Dismiss", ServiceType::Wizard)
                .with_description("Return a member to the roster")
                .enabled(bound && has_members),
            MenuItem::new(
                GuildAction::ChangeClass.as_str(),
                "Change Class",
                ServiceType::Wizard,
            )
            .with_description("Retrain a proven member")
            .enabled(bound && has_members),
            MenuItem::new(
                GuildAction::RenameParty.as_str(),
                "Rename Party",
                ServiceType::Panel,
            )
            .with_description("Register the party under a new name")
            .enabled(bound),
        ]
    }

    fn can_execute(&self, action: &str) -> bool {
        action.parse::<GuildAction>().is_ok()
    }

    fn validate_params(&self, action: &str, params: &ActionParams) -> TownResult<()> {
        if !self.has_party() {
            return Err(TownError::NoPartyBound);
        }
        if let Ok(GuildAction::RenameParty) = action.parse::<GuildAction>()
            && params.name.as_deref().is_some_and(|n| n.trim().is_empty())
        {
            return Err(TownError::MalformedParams(
                "a party name is required".to_string(),
            ));
        }
        Ok(())
    }

    fn execute_action(&mut self, action: &str, params: &ActionParams) -> TownResult<Outcome> {
        let action = parse_action(FacilityId::Guild, action)?;
        match request(action, params)? {
            GuildRequest::RegisterSelect => {
                if self.roster.is_empty() {
                    return Ok(Outcome::info("The roster is empty; no one is for hire."));
                }
                Ok(Outcome::info_with(
                    "Candidates for hire.",
                    OutcomeData::Characters(self.roster_entries()),
                ))
            }
            GuildRequest::Register { candidate } => self.register(candidate),
            GuildRequest::DismissSelect => {
                let party_rc = self.party.as_ref().ok_or(TownError::NoPartyBound)?;
                let party = party_rc.borrow();
                Ok(Outcome::info_with(
                    "Who shall be dismissed?",
                    OutcomeData::Characters(character_entries(&party, |_| true)),
                ))
            }
            GuildRequest::Dismiss { member } => self.dismiss(member),
            GuildRequest::ChangeClassSelect => {
                let party_rc = self.party.as_ref().ok_or(TownError::NoPartyBound)?;
                let party = party_rc.borrow();
                Ok(Outcome::info_with(
                    "Name a member and a class to retrain them into.",
                    OutcomeData::Characters(character_entries(&party, |m| {
                        m.level >= CLASS_CHANGE_LEVEL
                    })),
                ))
            }
            GuildRequest::ChangeClass { member, class } => self.change_class(member, class),
            GuildRequest::Rename { name } => self.rename(&name),
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
        // Guild services are free of charge.
        let _: GuildAction = action.parse().ok()?;
        Some(0)
    }
}

/// The standard roster of candidates.
fn default_roster() -> Vec<Character> {
    vec![
        Character::new("Bronn", CharacterClass::Fighter).with_level(3),
        Character::new("Elissa", CharacterClass::Priest).with_level(2),
        Character::new("Wick", CharacterClass::Thief),
        Character::new("Morgana", CharacterClass::Mage).with_level(4),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use gh_core::Party;

    fn guild_and_party(members: usize) -> (GuildService, SharedParty) {
        let mut p = Party::new("Band", 1000);
        for i in 0..members {
            p.add_member(Character::new(format!("M{i}"), CharacterClass::Fighter).with_level(6))
                .unwrap();
        }
        let party = p.shared();
        let mut g = GuildService::new();
        g.bind_party(Rc::clone(&party));
        (g, party)
    }

    #[test]
    fn register_moves_candidate_into_party() {
        let (mut guild, party) = guild_and_party(1);
        let bronn = guild.roster()[0].id;
        let done = guild
            .execute_action("register", &ActionParams::new().with_character(bronn))
            .unwrap();
        assert!(done.is_success());
        assert_eq!(
            done.data,
            Some(OutcomeData::RosterChanged { party_size: 2 })
        );
        assert_eq!(guild.roster().len(), 3);
        assert!(party.borrow().member(bronn).is_some());
    }

    #[test]
    fn full_party_refuses_recruits() {
        let (mut guild, party) = guild_and_party(6);
        let bronn = guild.roster()[0].id;
        let refused = guild
            .execute_action("register", &ActionParams::new().with_character(bronn))
            .unwrap();
        assert!(refused.is_warning());
        assert!(refused.message.contains("full"));
        assert_eq!(guild.roster().len(), 4);
        assert_eq!(party.borrow().members.len(), 6);
    }

    #[test]
    fn dismiss_returns_member_to_roster() {
        let (mut guild, party) = guild_and_party(2);
        let id = party.borrow().members[0].id;
        let done = guild
            .execute_action("dismiss", &ActionParams::new().with_character(id))
            .unwrap();
        assert!(done.is_success());
        assert_eq!(party.borrow().members.len(), 1);
        assert_eq!(guild.roster().len(), 5);
        // The roster survives the party leaving.
        guild.unbind_party();
        guild.clear_transient();
        assert_eq!(guild.roster().len(), 5);
    }

    #[test]
    fn class_change_requires_rank() {
        let (mut guild, party) = guild_and_party(0);
        party
            .borrow_mut()
            .add_member(Character::new("Green", CharacterClass::Fighter).with_level(4))
            .unwrap();
        let green = party.borrow().member_by_name("Green").unwrap().id;
        let refused = guild
            .execute_action(
                "change_class",
                &ActionParams::new()
                    .with_character(green)
                    .with_class(CharacterClass::Samurai),
            )
            .unwrap();
        assert!(refused.is_warning());
        assert!(refused.message.contains("level 5"));
        assert_eq!(
            party.borrow().member(green).unwrap().class,
            CharacterClass::Fighter
        );
    }

    #[test]
    fn class_change_resets_level() {
        let (mut guild, party) = guild_and_party(1);
        let id = party.borrow().members[0].id;
        let done = guild
            .execute_action(
                "change_class",
                &ActionParams::new()
                    .with_character(id)
                    .with_class(CharacterClass::Lord),
            )
            .unwrap();
        assert!(done.is_success());
        let p = party.borrow();
        let m = p.member(id).unwrap();
        assert_eq!(m.class, CharacterClass::Lord);
        assert_eq!(m.level, 1);
    }

    #[test]
    fn same_class_is_refused() {
        let (mut guild, party) = guild_and_party(1);
        let id = party.borrow().members[0].id;
        let refused = guild
            .execute_action(
                "change_class",
                &ActionParams::new()
                    .with_character(id)
                    .with_class(CharacterClass::Fighter),
            )
            .unwrap();
        assert!(refused.is_warning());
        assert!(refused.message.contains("already"));
    }

    #[test]
    fn rename_party() {
        let (mut guild, party) = guild_and_party(1);
        let done = guild
            .execute_action("rename_party", &ActionParams::new().with_name("The Red Wolves"))
            .unwrap();
        assert!(done.is_success());
        assert_eq!(party.borrow().name, "The Red Wolves");
    }

    #[test]
    fn rename_needs_a_name() {
        let (mut guild, _) = guild_and_party(1);
        assert!(matches!(
            guild.execute_action("rename_party", &ActionParams::new()),
            Err(TownError::MalformedParams(_))
        ));
        assert!(matches!(
            guild.execute_action("rename_party", &ActionParams::new().with_name("   ")),
            Err(TownError::MalformedParams(_))
        ));
    }

    #[test]
    fn register_without_candidate_lists_roster() {
        let (mut guild, _) = guild_and_party(1);
        let list = guild.execute_action("register", &ActionParams::new()).unwrap();
        match list.data {
            Some(OutcomeData::Characters(entries)) => assert_eq!(entries.len(), 4),
            other => panic!("expected characters, got {other:?}"),
        }
    }

    #[test]
    fn unknown_candidate_is_a_fault() {
        let (mut guild, _) = guild_and_party(1);
        assert!(matches!(
            guild.execute_action(
                "register",
                &ActionParams::new().with_character(CharacterId::new())
            ),
            Err(TownError::CandidateNotFound(_))
        ));
    }
}
