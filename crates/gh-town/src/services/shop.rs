//! The trading post: equipment for sale, and a vault for the overflow.
//!
//! Purchases gate on stock before gold, so an oversized request is refused
//! before any price is even computed. The vault is durable service state:
//! it survives the party leaving and coming back.

use std::rc::Rc;
use std::str::FromStr;

use tracing::debug;

use gh_core::{CharacterId, Item, ItemId, ItemKind, SharedParty};

use crate::error::{TownError, TownResult};
use crate::facility::FacilityId;
use crate::menu::{MenuItem, ServiceType};
use crate::outcome::{ItemEntry, Outcome, OutcomeData};
use crate::params::ActionParams;
use crate::service::{
    FacilityService, WareRow, carried_entries, find_ware, find_ware_index, gold_gate,
    parse_action, resolve_recipient, stock_gate, ware_entries,
};

/// How many items the vault holds.
const VAULT_CAPACITY: usize = 20;

/// Actions the shop offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopAction {
    /// Buy from the shelves.
    Buy,
    /// Sell a carried item.
    Sell,
    /// Leave an item in the vault.
    Store,
    /// Take an item back out of the vault.
    Retrieve,
}

impl ShopAction {
    /// The action id as a stable token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Store => "store",
            Self::Retrieve => "retrieve",
        }
    }
}

impl FromStr for ShopAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            "store" => Ok(Self::Store),
            "retrieve" => Ok(Self::Retrieve),
            _ => Err(()),
        }
    }
}

/// Typed rendition of one shop request.
enum ShopRequest {
    Browse,
    BuyQuote {
        item: ItemId,
        quantity: u32,
        recipient: Option<CharacterId>,
    },
    BuyCommit {
        item: ItemId,
        quantity: u32,
        recipient: Option<CharacterId>,
    },
    SellSelect,
    Sell {
        seller: CharacterId,
        item: ItemId,
    },
    StoreSelect,
    Store {
        owner: CharacterId,
        item: ItemId,
    },
    RetrieveSelect,
    Retrieve {
        item: ItemId,
        recipient: Option<CharacterId>,
    },
}

fn request(action: ShopAction, params: &ActionParams) -> ShopRequest {
    let quantity = params.quantity.unwrap_or(1);
    match action {
        ShopAction::Buy => match (&params.item, params.confirmed) {
            (None, _) => ShopRequest::Browse,
            (Some(item), false) => ShopRequest::BuyQuote {
                item: item.clone(),
                quantity,
                recipient: params.character,
            },
            (Some(item), true) => ShopRequest::BuyCommit {
                item: item.clone(),
                quantity,
                recipient: params.character,
            },
        },
        ShopAction::Sell => match (params.character, &params.item) {
            (Some(seller), Some(item)) => ShopRequest::Sell {
                seller,
                item: item.clone(),
            },
            _ => ShopRequest::SellSelect,
        },
        ShopAction::Store => match (params.character, &params.item) {
            (Some(owner), Some(item)) => ShopRequest::Store {
                owner,
                item: item.clone(),
            },
            _ => ShopRequest::StoreSelect,
        },
        ShopAction::Retrieve => match &params.item {
            Some(item) => ShopRequest::Retrieve {
                item: item.clone(),
                recipient: params.character,
            },
            None => ShopRequest::RetrieveSelect,
        },
    }
}

/// The shop service.
#[derive(Debug)]
pub struct ShopService {
    party: Option<SharedParty>,
    wares: Vec<WareRow>,
    vault: Vec<Item>,
}

impl ShopService {
    /// Create a shop with the standard shelves.
    pub fn new() -> Self {
        Self::with_wares(default_wares())
    }

    /// Create a shop with custom shelves.
    pub fn with_wares(wares: Vec<WareRow>) -> Self {
        Self {
            party: None,
            wares,
            vault: Vec::new(),
        }
    }

    /// Current shelf contents.
    pub fn wares(&self) -> &[WareRow] {
        &self.wares
    }

    /// Current vault contents.
    pub fn vault(&self) -> &[Item] {
        &self.vault
    }

    fn quote_buy(
        &self,
        item: &ItemId,
        quantity: u32,
        recipient: Option<CharacterId>,
    ) -> TownResult<Outcome> {
        let party_rc = self.party.as_ref().ok_or(TownError::NoPartyBound)?;
        let party = party_rc.borrow();
        let row = find_ware(&self.wares, item)?;
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
            format!(
                "{} x{} for {} gold. Proceed?",
                row.item.display_name(),
                quantity,
                cost
            ),
            OutcomeData::PurchaseQuote {
                item: item.clone(),
                quantity,
                cost,
            },
        ))
    }

    fn commit_buy(
        &mut self,
        item: &ItemId,
        quantity: u32,
        recipient: Option<CharacterId>,
    ) -> TownResult<Outcome> {
        let party_rc = Rc::clone(self.party.as_ref().ok_or(TownError::NoPartyBound)?);
        let mut party = party_rc.borrow_mut();
        let idx = find_ware_index(&self.wares, item)?;

        // Re-run every gate against live state before touching anything.
        let row = &self.wares[idx];
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
        self.wares[idx].stock -= quantity;
        let carrier = party
            .member_mut(recipient_id)
            .ok_or(TownError::MemberNotFound(recipient_id))?;
        for _ in 0..quantity {
            carrier.give_item(goods.clone())?;
        }
        debug!(item = %item, quantity, cost, "purchase completed");

        let stock_left = self.wares[idx].stock;
        let gold_left = party.gold;
        Ok(Outcome::ok_with(
            format!("{} x{} bought for {} gold.", goods.display_name(), quantity, cost),
            OutcomeData::Purchased {
                item: item.clone(),
                quantity,
                cost,
                stock_left,
                gold_left,
            },
        ))
    }

    fn sell(&mut self, seller: CharacterId, item: &ItemId) -> TownResult<Outcome> {
        let party_rc = Rc::clone(self.party.as_ref().ok_or(TownError::NoPartyBound)?);
        let mut party = party_rc.borrow_mut();
        let member = party
            .member_mut(seller)
            .ok_or(TownError::MemberNotFound(seller))?;
        let Some(goods) = member.take_item(item) else {
            return Err(TownError::ItemNotFound(item.clone()));
        };
        let payout = goods.price / 2;
        party.credit_gold(payout);

        // Back on the shelf: top up an existing row or open a new one.
        match find_ware_index(&self.wares, item) {
            Ok(idx) => self.wares[idx].stock += 1,
            Err(_) => self.wares.push(WareRow::new(goods.clone(), 1)),
        }

        let gold_left = party.gold;
        Ok(Outcome::ok_with(
            format!("{} sold for {} gold.", goods.display_name(), payout),
            OutcomeData::Sold {
                item: item.clone(),
                payout,
                gold_left,
            },
        ))
    }

    fn store(&mut self, owner: CharacterId, item: &ItemId) -> TownResult<Outcome> {
        let party_rc = Rc::clone(self.party.as_ref().ok_or(TownError::NoPartyBound)?);
        let mut party = party_rc.borrow_mut();
        if self.vault.len() >= VAULT_CAPACITY {
            return Ok(Outcome::warning("the vault is full"));
        }
        let member = party
            .member_mut(owner)
            .ok_or(TownError::MemberNotFound(owner))?;
        let Some(goods) = member.take_item(item) else {
            return Err(TownError::ItemNotFound(item.clone()));
        };
        let name = goods.display_name();
        self.vault.push(goods);
        Ok(Outcome::ok_with(
            format!("{name} locked away in the vault."),
            OutcomeData::Stored { item: item.clone() },
        ))
    }

    fn retrieve(
        &mut self,
        item: &ItemId,
        recipient: Option<CharacterId>,
    ) -> TownResult<Outcome> {
        let party_rc = Rc::clone(self.party.as_ref().ok_or(TownError::NoPartyBound)?);
        let mut party = party_rc.borrow_mut();
        let pos = self
            .vault
            .iter()
            .position(|i| &i.id == item)
            .ok_or_else(|| TownError::ItemNotFound(item.clone()))?;
        let recipient_id = resolve_recipient(&party, recipient)?;
        let carrier = party
            .member(recipient_id)
            .ok_or(TownError::MemberNotFound(recipient_id))?;
        if !carrier.can_carry(1) {
            return Ok(Outcome::warning(format!(
                "{} cannot carry any more",
                carrier.name
            )));
        }

        let goods = self.vault.remove(pos);
        let name = goods.display_name();
        let carrier = party
            .member_mut(recipient_id)
            .ok_or(TownError::MemberNotFound(recipient_id))?;
        carrier.give_item(goods)?;
        Ok(Outcome::ok_with(
            format!("{name} retrieved from the vault."),
            OutcomeData::Retrieved { item: item.clone() },
        ))
    }

    fn vault_entries(&self) -> Vec<ItemEntry> {
        self.vault
            .iter()
            .map(|i| ItemEntry {
                item: i.id.clone(),
                name: i.display_name(),
                owner: None,
            })
            .collect()
    }
}

impl Default for ShopService {
    fn default() -> Self {
        Self::new()
    }
}

impl FacilityService for ShopService {
    fn facility_id(&self) -> FacilityId {
        FacilityId::Shop
    }

    fn menu_items(&self) -> Vec<MenuItem> {
        let bound = self.has_party();
        vec![
            MenuItem::new(ShopAction::Buy.as_str(), "Buy", ServiceType::List)
                .with_description("Browse the shelves")
                .enabled(bound),
            MenuItem::new(ShopAction::Sell.as_str(), "Sell", ServiceType::Wizard)
                .with_description("Sell for half the list price")
                .enabled(bound),
            MenuItem::new(ShopAction::Store.as_str(), "Store", ServiceType::Wizard)
                .with_description("Leave an item in the vault")
                .enabled(bound),
            MenuItem::new(ShopAction::Retrieve.as_str(), "Retrieve", ServiceType::List)
                .with_description("Take an item out of the vault")
                .enabled(bound && !self.vault.is_empty()),
        ]
    }

    fn can_execute(&self, action: &str) -> bool {
        action.parse::<ShopAction>().is_ok()
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
        let action = parse_action(FacilityId::Shop, action)?;
        match request(action, params) {
            ShopRequest::Browse => Ok(Outcome::info_with(
                "The shelves on offer.",
                OutcomeData::Wares(ware_entries(&self.wares)),
            )),
            ShopRequest::BuyQuote {
                item,
                quantity,
                recipient,
            } => self.quote_buy(&item, quantity, recipient),
            ShopRequest::BuyCommit {
                item,
                quantity,
                recipient,
            } => self.commit_buy(&item, quantity, recipient),
            ShopRequest::SellSelect | ShopRequest::StoreSelect => {
                let party_rc = self.party.as_ref().ok_or(TownError::NoPartyBound)?;
                let party = party_rc.borrow();
                Ok(Outcome::info_with(
                    "Name a member and one of their items.",
                    OutcomeData::Items(carried_entries(&party, |_| true)),
                ))
            }
            ShopRequest::Sell { seller, item } => self.sell(seller, &item),
            ShopRequest::Store { owner, item } => self.store(owner, &item),
            ShopRequest::RetrieveSelect => Ok(Outcome::info_with(
                "The vault's contents.",
                OutcomeData::Items(self.vault_entries()),
            )),
            ShopRequest::Retrieve { item, recipient } => self.retrieve(&item, recipient),
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
        let action: ShopAction = action.parse().ok()?;
        match action {
            ShopAction::Buy => {
                let item = params.item.as_ref()?;
                let row = find_ware(&self.wares, item).ok()?;
                Some(row.item.price * params.quantity.unwrap_or(1))
            }
            ShopAction::Sell | ShopAction::Store | ShopAction::Retrieve => Some(0),
        }
    }
}

/// The standard trading-post shelves.
fn default_wares() -> Vec<WareRow> {
    vec![
        WareRow::new(Item::new("long_sword", "Long Sword", ItemKind::Weapon, 200), 3),
        WareRow::new(Item::new("leather_armor", "Leather Armor", ItemKind::Armor, 150), 4),
        WareRow::new(Item::new("round_shield", "Round Shield", ItemKind::Shield, 120), 2),
        WareRow::new(Item::new("dios_potion", "Potion of Dios", ItemKind::Potion, 100), 8),
        WareRow::new(
            Item::new("latumofis_scroll", "Scroll of Latumofis", ItemKind::Scroll, 250),
            2,
        ),
    ]
}
