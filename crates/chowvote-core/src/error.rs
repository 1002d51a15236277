//! Error types for party operations.
//!
//! No [`PartyError`] is fatal: the registry turns each one into an `error`
//! event for the sender and leaves every party untouched.

use chowvote_types::{PartyCode, Phase};

/// Errors that can occur while applying a client event to the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PartyError {
    /// No live party has the given code.
    #[error("party not found: {0}")]
    PartyNotFound(PartyCode),

    /// The sending connection is not a member of the party it addressed.
    #[error("sender is not a member of party {0}")]
    UnknownSender(PartyCode),

    /// The event is not valid in the party's current phase.
    #[error("event not allowed in phase {phase}")]
    WrongPhase {
        /// The phase the party was in.
        phase: Phase,
    },

    /// A phase transition was requested by someone other than the host.
    #[error("only the host may advance party {0}")]
    NotHost(PartyCode),

    /// Every code tried was already live.
    #[error("no free party code after {attempts} attempts")]
    CodesExhausted {
        /// Number of codes drawn before giving up.
        attempts: u32,
    },
}

impl PartyError {
    /// Message shown to the client in the `error` event.
    pub fn client_message(&self) -> String {
        match self {
            Self::PartyNotFound(_) => String::from("Party not found"),
            Self::UnknownSender(_) => String::from("You are not a member of this party"),
            Self::WrongPhase { phase } => format!("Action not allowed during the {phase} phase"),
            Self::NotHost(_) => String::from("Only the host can do that"),
            Self::CodesExhausted { .. } => String::from("Could not create a party, try again"),
        }
    }
}
