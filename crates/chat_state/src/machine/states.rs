//! Session phases - the two lifecycle states of a chat session

use serde::{Deserialize, Serialize};

/// Lifecycle phase of a session.
///
/// There are exactly two: a request is either outstanding or it is not.
/// There is no retry phase; failures transition straight back to `Idle`
/// with an error message appended to the conversation.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No outstanding request, awaiting user input.
    #[default]
    Idle,
    /// A request has been issued and no terminal event has arrived yet.
    Awaiting,
}

impl SessionPhase {
    /// Check if this phase allows a new submit.
    pub fn accepts_user_input(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Get a human-readable description of the current phase.
    pub fn description(&self) -> &str {
        match self {
            Self::Idle => "Ready for input",
            Self::Awaiting => "Waiting for the fusion engine",
        }
    }
}
