use std::collections::{BTreeSet, HashSet};

use dossier_formats::{ConditionType, ResponseCondition, TagId, TagResponse};

use crate::state::ConversationState;

/// Read access to the clues the player has discovered so far. The clue
/// registry lives outside the interrogation core.
pub trait ClueLedger {
    fn is_clue_found(&self, clue_id: &str) -> bool;
}

/// Ledger for hosts that do not track clues; nothing is ever discovered.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClues;

impl ClueLedger for NoClues {
    fn is_clue_found(&self, _clue_id: &str) -> bool {
        false
    }
}

impl ClueLedger for BTreeSet<String> {
    fn is_clue_found(&self, clue_id: &str) -> bool {
        self.contains(clue_id)
    }
}

impl ClueLedger for HashSet<String> {
    fn is_clue_found(&self, clue_id: &str) -> bool {
        self.contains(clue_id)
    }
}

pub fn evaluate(
    condition: &ResponseCondition,
    state: &ConversationState,
    clues: &dyn ClueLedger,
) -> bool {
    let target = || TagId::new(condition.target_id.as_str());
    match condition.kind {
        ConditionType::TagAsked => state.times_asked(&target()) >= condition.min_count,
        ConditionType::TagNotAsked => state.times_asked(&target()) == 0,
        ConditionType::ClueDiscovered => clues.is_clue_found(&condition.target_id),
        ConditionType::ClueNotDiscovered => !clues.is_clue_found(&condition.target_id),
        ConditionType::TruthUnlocked => state.is_truth_unlocked(&target()),
        ConditionType::StressAbove => state.stress() >= condition.threshold,
        ConditionType::StressBelow => state.stress() < condition.threshold,
        ConditionType::Unrecognized => false,
    }
}

/// An empty condition list always holds.
pub fn all_met(
    conditions: &[ResponseCondition],
    state: &ConversationState,
    clues: &dyn ClueLedger,
) -> bool {
    conditions
        .iter()
        .all(|condition| evaluate(condition, state, clues))
}

/// Picks the reply for the `times_asked`-th ask from an ordered list.
///
/// Starts at the clamped index, walks forward to the first reply whose
/// conditions hold, then backward, and settles for the last reply when none
/// qualifies. Returns `None` only for an empty list.
pub fn first_eligible<'r>(
    responses: &'r [TagResponse],
    times_asked: u32,
    state: &ConversationState,
    clues: &dyn ClueLedger,
) -> Option<&'r TagResponse> {
    let last = responses.len().checked_sub(1)?;
    let start = (times_asked as usize).min(last);
    let eligible = |response: &&TagResponse| all_met(response.conditions(), state, clues);

    responses[start..]
        .iter()
        .find(eligible)
        .or_else(|| responses[..start].iter().rev().find(eligible))
        .or(responses.last())
}
