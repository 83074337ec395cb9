use std::collections::{BTreeMap, BTreeSet};

use dossier_formats::TagId;
use serde::Serialize;

use crate::stress::{InterrogationTone, StressZone};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneCursors {
    pub lawyered_up: usize,
    pub rattled: usize,
    pub shutdown: usize,
}

/// Per-suspect conversation memory for one interrogation session.
///
/// Only the resolver mutates it; callers read through the accessors. Truth
/// unlocks are one-way for the lifetime of the session and every per-tag
/// counter only ever grows until [`ConversationState::reset`].
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ConversationState {
    times_asked: BTreeMap<TagId, u32>,
    truth_unlocked: BTreeSet<TagId>,
    denied_tags: BTreeSet<TagId>,
    used_unlocked_initial_for: BTreeSet<TagId>,
    times_asked_since_unlock: BTreeMap<TagId, u32>,
    generic_question_count: u32,
    stress: f32,
    tone: InterrogationTone,
    contradictions_used: BTreeSet<(TagId, TagId)>,
    zone_cursors: ZoneCursors,
}

impl ConversationState {
    pub fn new(initial_stress: f32) -> Self {
        ConversationState {
            stress: initial_stress.clamp(0.0, 1.0),
            ..ConversationState::default()
        }
    }

    /// Clears every counter and set and restores the starting stress.
    pub fn reset(&mut self, initial_stress: f32) {
        *self = ConversationState::new(initial_stress);
    }

    pub fn times_asked(&self, tag: &TagId) -> u32 {
        self.times_asked.get(tag).copied().unwrap_or(0)
    }

    pub fn times_asked_str(&self, tag: &str) -> u32 {
        self.times_asked(&TagId::new(tag))
    }

    pub fn is_truth_unlocked(&self, tag: &TagId) -> bool {
        self.truth_unlocked.contains(tag)
    }

    pub fn is_denied(&self, tag: &TagId) -> bool {
        self.denied_tags.contains(tag)
    }

    pub fn has_used_unlocked_initial(&self, tag: &TagId) -> bool {
        self.used_unlocked_initial_for.contains(tag)
    }

    pub fn times_asked_since_unlock(&self, tag: &TagId) -> u32 {
        self.times_asked_since_unlock.get(tag).copied().unwrap_or(0)
    }

    pub fn generic_question_count(&self) -> u32 {
        self.generic_question_count
    }

    pub fn truth_unlocked(&self) -> impl Iterator<Item = &TagId> {
        self.truth_unlocked.iter()
    }

    pub fn denied_tags(&self) -> impl Iterator<Item = &TagId> {
        self.denied_tags.iter()
    }

    pub fn used_unlocked_initial_for(&self) -> impl Iterator<Item = &TagId> {
        self.used_unlocked_initial_for.iter()
    }

    pub fn is_contradiction_used(&self, tag: &TagId, evidence: &TagId) -> bool {
        self.contradictions_used
            .contains(&(tag.clone(), evidence.clone()))
    }

    pub fn stress(&self) -> f32 {
        self.stress
    }

    pub fn zone(&self) -> StressZone {
        StressZone::from_stress(self.stress)
    }

    pub fn tone(&self) -> InterrogationTone {
        self.tone
    }

    /// True when nothing has been asked and no flag has been raised.
    pub fn is_pristine(&self) -> bool {
        self.times_asked.is_empty()
            && self.truth_unlocked.is_empty()
            && self.denied_tags.is_empty()
            && self.used_unlocked_initial_for.is_empty()
            && self.times_asked_since_unlock.is_empty()
            && self.generic_question_count == 0
            && self.contradictions_used.is_empty()
    }

    /// Counts one resolved ask of `tag` and returns the new total.
    pub(crate) fn record_ask(&mut self, tag: &TagId) -> u32 {
        let count = self.times_asked.entry(tag.clone()).or_insert(0);
        *count += 1;
        *count
    }

    /// Returns true when `tag` was not unlocked before.
    pub(crate) fn unlock_truth(&mut self, tag: &TagId) -> bool {
        self.truth_unlocked.insert(tag.clone())
    }

    pub(crate) fn mark_denied(&mut self, tag: &TagId) -> bool {
        self.denied_tags.insert(tag.clone())
    }

    pub(crate) fn mark_unlocked_initial_used(&mut self, tag: &TagId) {
        debug_assert!(self.truth_unlocked.contains(tag));
        self.used_unlocked_initial_for.insert(tag.clone());
        self.times_asked_since_unlock.insert(tag.clone(), 0);
    }

    pub(crate) fn advance_followup_cursor(&mut self, tag: &TagId) -> u32 {
        let cursor = self.times_asked_since_unlock.entry(tag.clone()).or_insert(0);
        let current = *cursor;
        *cursor += 1;
        current
    }

    pub(crate) fn next_generic_question(&mut self) -> u32 {
        self.generic_question_count += 1;
        self.generic_question_count
    }

    pub(crate) fn add_stress(&mut self, delta: f32) -> f32 {
        self.stress = (self.stress + delta).clamp(0.0, 1.0);
        self.stress
    }

    pub(crate) fn set_tone(&mut self, tone: InterrogationTone) {
        self.tone = tone;
    }

    /// Returns true the first time a given (tag, evidence) pair is used.
    pub(crate) fn mark_contradiction(&mut self, tag: &TagId, evidence: &TagId) -> bool {
        self.contradictions_used
            .insert((tag.clone(), evidence.clone()))
    }

    pub(crate) fn zone_cursors_mut(&mut self) -> &mut ZoneCursors {
        &mut self.zone_cursors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_and_unlocks_accumulate() {
        let mut state = ConversationState::new(0.3);
        let alibi = TagId::new("alibi");
        assert_eq!(state.record_ask(&alibi), 1);
        assert_eq!(state.record_ask(&TagId::new("ALIBI")), 2);
        assert_eq!(state.times_asked_str("Alibi"), 2);

        assert!(state.unlock_truth(&alibi));
        assert!(!state.unlock_truth(&alibi));
        state.mark_unlocked_initial_used(&alibi);
        assert_eq!(state.advance_followup_cursor(&alibi), 0);
        assert_eq!(state.advance_followup_cursor(&alibi), 1);
        assert_eq!(state.times_asked_since_unlock(&alibi), 2);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut state = ConversationState::new(0.3);
        let tag = TagId::new("witness");
        state.record_ask(&tag);
        state.unlock_truth(&tag);
        state.mark_denied(&tag);
        state.next_generic_question();
        state.set_tone(InterrogationTone::Firm);
        state.add_stress(0.4);

        state.reset(0.3);
        let once = state.clone();
        state.reset(0.3);
        assert_eq!(state, once);
        assert!(state.is_pristine());
        assert_eq!(state.tone(), InterrogationTone::Neutral);
        assert!((state.stress() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn stress_is_clamped() {
        let mut state = ConversationState::new(0.9);
        assert_eq!(state.add_stress(0.5), 1.0);
        assert_eq!(state.add_stress(-3.0), 0.0);
        assert_eq!(state.zone(), StressZone::LawyeredUp);
    }
}
