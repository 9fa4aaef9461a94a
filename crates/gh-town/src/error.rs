//! Error types for the town facility layer.

use gh_core::{CharacterId, CoreError, ItemId, SpellId};

use crate::facility::FacilityId;

/// Alias for `Result<T, TownError>`.
pub type TownResult<T> = Result<T, TownError>;

/// Errors that can occur in the facility layer.
///
/// These are internal faults and validation failures; business-rule refusals
/// (not enough gold, out of stock) are expressed as warning [`Outcome`]s
/// instead. Any `TownError` that escapes a service is trapped at the
/// controller boundary and converted to an error outcome.
///
/// [`Outcome`]: crate::outcome::Outcome
#[derive(Debug, thiserror::Error)]
pub enum TownError {
    /// The facility name did not match any known facility.
    #[error("unknown facility: {0}")]
    UnknownFacility(String),

    /// The action id is not in this facility's catalog.
    #[error("{facility} offers no action '{action}'")]
    UnknownAction {
        /// The facility that was asked.
        facility: FacilityId,
        /// The unrecognized action id.
        action: String,
    },

    /// The service was asked to act without a bound party.
    #[error("no party is bound to the facility")]
    NoPartyBound,

    /// The supplied parameters fail a shape requirement.
    #[error("malformed parameters: {0}")]
    MalformedParams(String),

    /// The named character is not in the party.
    #[error("no such party member: {0}")]
    MemberNotFound(CharacterId),

    /// The named character is not on the guild roster.
    #[error("no such roster candidate: {0}")]
    CandidateNotFound(CharacterId),

    /// The item is neither stocked nor carried where the action looked.
    #[error("no such item: {0}")]
    ItemNotFound(ItemId),

    /// The spell is not in the curriculum.
    #[error("no such spell: {0}")]
    SpellNotFound(SpellId),

    /// A facility was asked to activate while already active.
    #[error("facility already active: {0}")]
    AlreadyActive(FacilityId),

    /// The active controller refused to deactivate.
    #[error("facility refused to exit: {0}")]
    ExitRefused(FacilityId),

    /// A party-model fault surfaced mid-action.
    #[error("{0}")]
    Core(#[from] CoreError),
}
