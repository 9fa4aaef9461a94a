//! The facility service contract and shared action helpers.
//!
//! Every facility implements [`FacilityService`]: enumerate menu items,
//! gate and execute named actions against the bound party, and answer cost
//! questions. The free functions below are the pieces every implementation
//! shares: action-id parsing, purchase gates, selection-list building.
//! They take their data as parameters rather than inheriting it.

use std::str::FromStr;

use gh_core::{Character, CharacterId, Item, ItemId, Party, SharedParty};

use crate::error::{TownError, TownResult};
use crate::facility::FacilityId;
use crate::menu::MenuItem;
use crate::outcome::{CharacterEntry, ItemEntry, Outcome, WareEntry};
use crate::params::ActionParams;

/// Per-facility business logic.
///
/// Implementations must never mutate the party outside
/// [`execute_action`](Self::execute_action), and inside it only after every
/// guard for the request has passed. A partially applied action is a bug,
/// not an outcome.
pub trait FacilityService {
    /// Which facility this service belongs to.
    fn facility_id(&self) -> FacilityId;

    /// The service catalog. Safe to call at any time; with no party bound
    /// every item is disabled.
    fn menu_items(&self) -> Vec<MenuItem>;

    /// Cheap membership check: is `action` in this facility's catalog?
    fn can_execute(&self, action: &str) -> bool;

    /// Shape gate: a bound party plus any per-action parameter requirements.
    fn validate_params(&self, action: &str, params: &ActionParams) -> TownResult<()>;

    /// Run an action. The only place state mutates.
    fn execute_action(&mut self, action: &str, params: &ActionParams) -> TownResult<Outcome>;

    /// Bind the visiting party.
    fn bind_party(&mut self, party: SharedParty);

    /// Release the visiting party.
    fn unbind_party(&mut self);

    /// The bound party, if any.
    fn party(&self) -> Option<&SharedParty>;

    /// Whether a party is bound.
    fn has_party(&self) -> bool {
        self.party().is_some()
    }

    /// Gold cost of an action given these params, when it can be priced.
    fn action_cost(&self, action: &str, params: &ActionParams) -> Option<u32>;

    /// Whether the bound party could pay for the action. False when no
    /// party is bound or the action cannot be priced.
    fn can_afford(&self, action: &str, params: &ActionParams) -> bool {
        let Some(party) = self.party() else {
            return false;
        };
        match self.action_cost(action, params) {
            Some(cost) => party.borrow().can_afford(cost),
            None => false,
        }
    }

    /// Drop confirm-scoped scratch state. Durable service state (shelves,
    /// vault, roster) survives. The default implementation has nothing to
    /// drop because the confirm protocol carries its context in the params.
    fn clear_transient(&mut self) {}
}

/// One shelf row: an item and how many are in stock.
#[derive(Debug, Clone, PartialEq)]
pub struct WareRow {
    /// The stocked item.
    pub item: Item,
    /// Units on the shelf.
    pub stock: u32,
}

impl WareRow {
    /// Create a shelf row.
    pub fn new(item: Item, stock: u32) -> Self {
        Self { item, stock }
    }
}

/// Parse an action id into a facility's closed action enum.
pub(crate) fn parse_action<A: FromStr>(facility: FacilityId, action: &str) -> TownResult<A> {
    action.parse().map_err(|_| TownError::UnknownAction {
        facility,
        action: action.to_string(),
    })
}

/// Warning outcome for a purse that cannot cover `cost`.
pub(crate) fn insufficient_gold(cost: u32, held: u32) -> Outcome {
    Outcome::warning(format!(
        "not enough gold: {cost} needed, {held} in the purse"
    ))
}

/// Stock gate for a purchase. Warning when the shelf cannot cover the
/// request; `None` when it can.
pub(crate) fn stock_gate(row: &WareRow, quantity: u32) -> Option<Outcome> {
    if quantity > row.stock {
        return Some(Outcome::warning(format!(
            "insufficient stock: only {} of {} left",
            row.stock,
            row.item.display_name()
        )));
    }
    None
}

/// Gold gate for a priced action. Warning when the purse is short; `None`
/// when it covers the cost.
pub(crate) fn gold_gate(cost: u32, gold: u32) -> Option<Outcome> {
    if gold < cost {
        return Some(insufficient_gold(cost, gold));
    }
    None
}

/// Find a shelf row by item id.
pub(crate) fn find_ware<'a>(rows: &'a [WareRow], id: &ItemId) -> TownResult<&'a WareRow> {
    rows.iter()
        .find(|r| &r.item.id == id)
        .ok_or_else(|| TownError::ItemNotFound(id.clone()))
}

/// Index of a shelf row by item id.
pub(crate) fn find_ware_index(rows: &[WareRow], id: &ItemId) -> TownResult<usize> {
    rows.iter()
        .position(|r| &r.item.id == id)
        .ok_or_else(|| TownError::ItemNotFound(id.clone()))
}

/// Build a selection list of members matching `filter`.
pub(crate) fn character_entries<F>(party: &Party, filter: F) -> Vec<CharacterEntry>
where
    F: Fn(&Character) -> bool,
{
    party
        .members
        .iter()
        .filter(|m| filter(m))
        .map(|m| CharacterEntry {
            id: m.id,
            name: m.name.clone(),
            level: m.level,
            status: m.status,
        })
        .collect()
}

/// Build a shelf listing.
pub(crate) fn ware_entries(rows: &[WareRow]) -> Vec<WareEntry> {
    rows.iter()
        .map(|r| WareEntry {
            item: r.item.id.clone(),
            name: r.item.display_name(),
            price: r.item.price,
            stock: r.stock,
        })
        .collect()
}

/// Build a listing of items carried by party members, with owner names.
/// `filter` narrows by item, e.g. to unidentified pieces only.
pub(crate) fn carried_entries<F>(party: &Party, filter: F) -> Vec<ItemEntry>
where
    F: Fn(&Item) -> bool,
{
    party
        .members
        .iter()
        .flat_map(|m| {
            m.inventory
                .iter()
                .filter(|i| filter(i))
                .map(|i| ItemEntry {
                    item: i.id.clone(),
                    name: i.display_name(),
                    owner: Some(m.name.clone()),
                })
        })
        .collect()
}

/// Find which member carries the item.
pub(crate) fn find_carried(party: &Party, id: &ItemId) -> Option<(CharacterId, Item)> {
    party
        .members
        .iter()
        .find_map(|m| m.item(id).map(|i| (m.id, i.clone())))
}

/// Resolve the member a delivery should go to: the named one, or the first
/// living member when unnamed.
pub(crate) fn resolve_recipient(
    party: &Party,
    named: Option<CharacterId>,
) -> TownResult<CharacterId> {
    match named {
        Some(id) => {
            party.member(id).ok_or(TownError::MemberNotFound(id))?;
            Ok(id)
        }
        None => party
            .living_members()
            .next()
            .map(|m| m.id)
            .ok_or(TownError::Core(gh_core::CoreError::NoLivingMembers)),
    }
}
