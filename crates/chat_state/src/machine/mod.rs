//! State machine module
//!
//! Contains the session fold: phases, transitions, and the owned session
//! data the transitions update.

mod states;
mod transitions;

pub use states::SessionPhase;
pub use transitions::{ERROR_REPLY, Session, SessionInput, StateTransition};
