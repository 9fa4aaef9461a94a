//! Town facility layer for Gildenhall.
//!
//! A party of adventurers visits mutually exclusive facilities (guild, inn,
//! shop, temple, magic guild), each offering a small catalog of services.
//! Every service action runs through the same shape: a typed request, a
//! validation pipeline, and a uniform [`Outcome`]. Costly actions use a
//! confirm-then-execute protocol: the first call returns a quote, the second
//! (with `confirmed` set) re-validates everything against live party state
//! and commits atomically.
//!
//! The [`FacilityRegistry`] owns one lazily-created [`FacilityController`]
//! per facility and enforces that at most one is active at a time, which is
//! also the mechanism that gives the active facility exclusive mutation
//! rights over the shared party.

pub mod config;
pub mod controller;
pub mod error;
pub mod facility;
pub mod menu;
pub mod outcome;
pub mod params;
pub mod registry;
pub mod service;
pub mod services;

pub use config::{FacilityDirectory, FacilityProfile};
pub use controller::{FacilityController, FacilityView};
pub use error::{TownError, TownResult};
pub use facility::FacilityId;
pub use menu::{MenuItem, ServiceType};
pub use outcome::{
    CharacterEntry, ItemEntry, MetaValue, Outcome, OutcomeData, OutcomeKind, SpellEntry, WareEntry,
};
pub use params::ActionParams;
pub use registry::FacilityRegistry;
pub use service::{FacilityService, WareRow};
pub use services::{GuildService, InnService, MagicGuildService, ShopService, TempleService};
