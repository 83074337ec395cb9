pub mod clues;
pub mod conditions;
pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod generic;
pub mod nervousness;
pub mod session;
pub mod state;
pub mod stress;
pub mod variants;

pub use clues::{ClueLocation, ResolvedClue};
pub use conditions::{ClueLedger, NoClues};
pub use config::EngineConfig;
pub use engine::{ResolvedResponse, ResponseSource, Resolver};
pub use error::InterrogationError;
pub use evidence::present_evidence;
pub use session::{Exchange, InterrogationSession, SessionSnapshot, SuspectRoster};
pub use state::ConversationState;
pub use stress::{InterrogationTone, StressZone};
