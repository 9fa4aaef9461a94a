//! Facility lifecycle: binding a party visit to a service.
//!
//! A controller is a two-state machine, Inactive and Active. Entering binds
//! the party into the service and notifies the optional view; exiting
//! unbinds and drops transient service state. Every execution path returns
//! an [`Outcome`]; internal faults are trapped here, never propagated.

use tracing::{debug, warn};

use gh_core::SharedParty;

use crate::config::FacilityProfile;
use crate::facility::FacilityId;
use crate::menu::MenuItem;
use crate::outcome::Outcome;
use crate::params::ActionParams;
use crate::service::FacilityService;

/// UI hook for facility enter/exit moments. The core treats the view as
/// opaque and optional: a headless controller is fully functional.
pub trait FacilityView {
    /// Called after the facility activates.
    fn entered(&mut self, profile: &FacilityProfile);
    /// Called after the facility deactivates.
    fn exited(&mut self);
}

/// Lifecycle wrapper around one facility service.
pub struct FacilityController {
    facility_id: FacilityId,
    service: Box<dyn FacilityService>,
    profile: FacilityProfile,
    view: Option<Box<dyn FacilityView>>,
    active: bool,
}

impl FacilityController {
    /// Create an inactive controller.
    pub fn new(service: Box<dyn FacilityService>, profile: FacilityProfile) -> Self {
        let facility_id = service.facility_id();
        Self {
            facility_id,
            service,
            profile,
            view: None,
            active: false,
        }
    }

    /// Which facility this controller manages.
    pub fn facility_id(&self) -> FacilityId {
        self.facility_id
    }

    /// The display profile the controller was built with.
    pub fn profile(&self) -> &FacilityProfile {
        &self.profile
    }

    /// Whether a visit is underway.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Attach a view. Replaces any existing one.
    pub fn set_view(&mut self, view: Box<dyn FacilityView>) {
        self.view = Some(view);
    }

    /// Detach the view, returning the controller to headless operation.
    pub fn clear_view(&mut self) {
        self.view = None;
    }

    /// Read access to the underlying service, e.g. for cost queries.
    pub fn service(&self) -> &dyn FacilityService {
        &*self.service
    }

    /// Activate the facility and bind the visiting party.
    ///
    /// Returns false (leaving state untouched) when already active.
    pub fn enter(&mut self, party: SharedParty) -> bool {
        if self.active {
            warn!(facility = %self.facility_id, "enter refused: already active");
            return false;
        }
        self.service.bind_party(party);
        self.active = true;
        if let Some(view) = &mut self.view {
            view.entered(&self.profile);
        }
        debug!(facility = %self.facility_id, "facility entered");
        true
    }

    /// Deactivate the facility, unbinding the party and dropping transient
    /// service state.
    ///
    /// Returns false when already inactive.
    pub fn exit(&mut self) -> bool {
        if !self.active {
            warn!(facility = %self.facility_id, "exit refused: not active");
            return false;
        }
        self.service.unbind_party();
        self.service.clear_transient();
        self.active = false;
        if let Some(view) = &mut self.view {
            view.exited();
        }
        debug!(facility = %self.facility_id, "facility exited");
        true
    }

    /// Run one service action through the gate pipeline:
    /// `can_execute` → `validate_params` → `execute_action`, short-circuiting
    /// with an error outcome at the first failing gate. A fault escaping the
    /// service is trapped and converted; this method never fails.
    pub fn execute_service(&mut self, action: &str, params: &ActionParams) -> Outcome {
        if !self.active {
            return Outcome::error("facility not active");
        }
        if !self.service.can_execute(action) {
            return Outcome::error(format!(
                "{} offers no action '{action}'",
                self.facility_id
            ));
        }
        if let Err(e) = self.service.validate_params(action, params) {
            return Outcome::error(e.to_string());
        }
        match self.service.execute_action(action, params) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(facility = %self.facility_id, action, error = %e, "service fault trapped");
                Outcome::error(e.to_string())
            }
        }
    }

    /// The service catalog while active; empty while inactive.
    pub fn menu_items(&self) -> Vec<MenuItem> {
        if !self.active {
            return Vec::new();
        }
        self.service.menu_items()
    }
}
