//! The facility registry: one town, one active facility.
//!
//! The registry owns a lazily-created controller per facility and is the
//! single source of truth for which facility the party is inside. Entering
//! one facility first exits the current one; the current-facility record is
//! cleared before the old controller is even asked to exit, so a refusing
//! controller can never wedge the registry on a phantom visit.
//!
//! This is an owned instance. Construct it at application start and hand
//! it to the frontend; there is no global.

use std::collections::HashMap;

use tracing::debug;

use gh_core::SharedParty;

use crate::config::{FacilityDirectory, FacilityProfile};
use crate::controller::{FacilityController, FacilityView};
use crate::error::{TownError, TownResult};
use crate::facility::FacilityId;
use crate::menu::MenuItem;
use crate::outcome::Outcome;
use crate::params::ActionParams;
use crate::service::FacilityService;
use crate::services::{GuildService, InnService, MagicGuildService, ShopService, TempleService};

/// Directory of facilities and keeper of the single-active invariant.
pub struct FacilityRegistry {
    controllers: HashMap<FacilityId, FacilityController>,
    current: Option<FacilityId>,
    party: Option<SharedParty>,
    directory: FacilityDirectory,
}

impl FacilityRegistry {
    /// Create a registry with default display profiles.
    pub fn new() -> Self {
        Self::with_directory(FacilityDirectory::default())
    }

    /// Create a registry with a custom profile directory.
    pub fn with_directory(directory: FacilityDirectory) -> Self {
        Self {
            controllers: HashMap::new(),
            current: None,
            party: None,
            directory,
        }
    }

    fn build_service(id: FacilityId) -> Box<dyn FacilityService> {
        match id {
            FacilityId::Guild => Box::new(GuildService::new()),
            FacilityId::Inn => Box::new(InnService::new()),
            FacilityId::Shop => Box::new(ShopService::new()),
            FacilityId::Temple => Box::new(TempleService::new()),
            FacilityId::MagicGuild => Box::new(MagicGuildService::new()),
        }
    }

    /// The cached controller for `id`, created on first use.
    fn controller_mut(&mut self, id: FacilityId) -> &mut FacilityController {
        self.controllers.entry(id).or_insert_with(|| {
            FacilityController::new(Self::build_service(id), self.directory.profile(id))
        })
    }

    /// Walk the party into a facility, leaving the current one first if a
    /// different facility is active. Re-entering the active facility is a
    /// no-op success. A failure to exit the current facility propagates
    /// without entering the new one.
    pub fn enter_facility(&mut self, id: FacilityId, party: SharedParty) -> TownResult<()> {
        if self.current == Some(id) {
            return Ok(());
        }
        if self.current.is_some() {
            self.exit_current_facility()?;
        }
        let ctrl = self.controller_mut(id);
        if !ctrl.enter(party.clone()) {
            return Err(TownError::AlreadyActive(id));
        }
        self.current = Some(id);
        self.party = Some(party);
        debug!(facility = %id, "party entered facility");
        Ok(())
    }

    /// Walk the party out of the active facility. Success no-op when none
    /// is active. The current-facility record is cleared unconditionally,
    /// even when the controller refuses, so the registry never believes a
    /// facility is active when it is not.
    pub fn exit_current_facility(&mut self) -> TownResult<()> {
        let Some(id) = self.current.take() else {
            return Ok(());
        };
        self.party = None;
        let exited = self
            .controllers
            .get_mut(&id)
            .is_some_and(FacilityController::exit);
        if exited {
            debug!(facility = %id, "party left facility");
            Ok(())
        } else {
            Err(TownError::ExitRefused(id))
        }
    }

    /// The active facility, if any.
    pub fn current_facility(&self) -> Option<FacilityId> {
        self.current
    }

    /// Whether the party is inside any facility.
    pub fn is_in_facility(&self) -> bool {
        self.current.is_some()
    }

    /// The party currently on a visit, if any.
    pub fn current_party(&self) -> Option<&SharedParty> {
        self.party.as_ref()
    }

    /// Read access to a controller, if it has been created.
    pub fn controller(&self, id: FacilityId) -> Option<&FacilityController> {
        self.controllers.get(&id)
    }

    /// Attach a view to one facility's controller, creating it if needed.
    pub fn attach_view(&mut self, id: FacilityId, view: Box<dyn FacilityView>) {
        self.controller_mut(id).set_view(view);
    }

    /// The display profile for a facility.
    pub fn profile(&self, id: FacilityId) -> FacilityProfile {
        self.directory.profile(id)
    }

    /// Menu of the active facility; empty when none is active.
    pub fn menu(&self) -> Vec<MenuItem> {
        match self.current {
            Some(id) => self
                .controllers
                .get(&id)
                .map(FacilityController::menu_items)
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// Run an action against the active facility.
    pub fn execute(&mut self, action: &str, params: &ActionParams) -> Outcome {
        match self.current {
            Some(id) => match self.controllers.get_mut(&id) {
                Some(ctrl) => ctrl.execute_service(action, params),
                None => Outcome::error("no facility is active"),
            },
            None => Outcome::error("no facility is active"),
        }
    }

    /// Count of controllers currently reporting an active visit. The
    /// single-active invariant keeps this at most 1.
    pub fn active_count(&self) -> usize {
        self.controllers.values().filter(|c| c.is_active()).count()
    }
}

impl Default for FacilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
