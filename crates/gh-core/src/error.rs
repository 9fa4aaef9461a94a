use crate::character::CharacterId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when manipulating a party.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The party already has the maximum number of members.
    #[error("the party is full ({0} members)")]
    PartyFull(usize),

    /// The requested member ID does not exist in the party.
    #[error("member not found: {0}")]
    MemberNotFound(CharacterId),

    /// A gold debit exceeds the party's funds.
    #[error("insufficient gold: need {needed}, have {held}")]
    InsufficientGold {
        /// The amount the debit asked for.
        needed: u32,
        /// The amount the party holds.
        held: u32,
    },

    /// An operation needed at least one living member.
    #[error("no living members in the party")]
    NoLivingMembers,

    /// A character's pack has no room for another item.
    #[error("{0} cannot carry any more")]
    PackFull(String),
}
