//! Enumeration types for Chowvote.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A party's position in the game.
///
/// Phases advance `Lobby -> Adding -> Voting -> Results` and never move
/// backwards during a party's lifetime.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Phase {
    /// Members are gathering; nothing has been proposed yet.
    #[default]
    Lobby,
    /// Members are proposing restaurants.
    Adding,
    /// Members are casting their liked sets.
    Voting,
    /// Every member has voted and a winner is known.
    Results,
}

impl Phase {
    /// Lowercase wire name of the phase.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lobby => "lobby",
            Self::Adding => "adding",
            Self::Voting => "voting",
            Self::Results => "results",
        }
    }
}

impl core::fmt::Display for Phase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
