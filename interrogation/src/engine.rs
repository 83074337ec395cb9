use dossier_formats::{ResponseType, SuspectDossier, TagId, TagInteraction, TagResponse};
use rand::Rng;
use serde::Serialize;

use crate::clues::{resolve_clues, ResolvedClue};
use crate::conditions::{first_eligible, ClueLedger};
use crate::config::EngineConfig;
use crate::generic;
use crate::nervousness;
use crate::state::ConversationState;
use crate::stress::{
    StressZone, DEFAULT_LAWYERED_UP_LINE, DEFAULT_SHUTDOWN_LINE, REPEATED_QUESTION_STRESS,
    REPEAT_STRESS_AFTER, TRUTH_UNLOCK_STRESS,
};
use crate::variants;

/// Which track produced a delivered line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseSource {
    Generic,
    Progressive,
    Variant { variant_id: String },
    UnlockedInitialDenied,
    UnlockedInitialNotDenied,
    UnlockedFollowup,
    StressZone { zone: StressZone },
    Contradiction { evidence: TagId },
    /// The list that should have supplied a line was empty.
    Empty,
}

/// A reply ready for presentation, detached from the authored catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedResponse {
    pub tag_id: TagId,
    pub response_sequence: Vec<String>,
    pub is_lie: bool,
    pub response_delay_override: f32,
    pub response_type: ResponseType,
    pub stress_impact: f32,
    pub source: ResponseSource,
    /// Tags whose truth this reply unlocked for the first time.
    pub newly_unlocked: Vec<TagId>,
    pub newly_denied: bool,
    pub clickable_clues: Vec<ResolvedClue>,
}

impl ResolvedResponse {
    pub(crate) fn new(tag_id: TagId, response: TagResponse, source: ResponseSource) -> Self {
        let clickable_clues = resolve_clues(&response);
        ResolvedResponse {
            tag_id,
            response_sequence: response.response_sequence,
            is_lie: response.is_lie,
            response_delay_override: response.response_delay_override,
            response_type: response.response_type,
            stress_impact: response.stress_impact,
            source,
            newly_unlocked: Vec::new(),
            newly_denied: false,
            clickable_clues,
        }
    }

    pub fn combined(&self) -> String {
        self.response_sequence.join(". ")
    }
}

/// Resolves asks against one suspect's catalog. Borrowed per call so the
/// dossier, config and generator stay owned by the session.
pub struct Resolver<'a, R: Rng + ?Sized> {
    dossier: &'a SuspectDossier,
    config: &'a EngineConfig,
    clues: &'a dyn ClueLedger,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> Resolver<'a, R> {
    pub fn new(
        dossier: &'a SuspectDossier,
        config: &'a EngineConfig,
        clues: &'a dyn ClueLedger,
        rng: &'a mut R,
    ) -> Self {
        Resolver {
            dossier,
            config,
            clues,
            rng,
        }
    }

    /// Answers one ask of `tag_id`, updating `state` as the suspect remembers
    /// it. `tag_type` only matters for logging here; question text comes
    /// from [`Resolver::question_for_tag`].
    pub fn resolve(
        &mut self,
        state: &mut ConversationState,
        tag_id: &str,
        tag_type: &str,
    ) -> ResolvedResponse {
        let dossier = self.dossier;
        state.add_stress(state.tone().stress_delta());

        if self.config.stress_zone_gating {
            if let Some(gated) = zone_reply(dossier, state, TagId::new(tag_id)) {
                log::debug!(
                    "[{}] {tag_id}: answered from {} zone",
                    dossier.citizen_id,
                    state.zone().as_str()
                );
                return gated;
            }
        }

        let Some(interaction) = dossier.interaction(tag_id) else {
            let response = generic::resolve_generic(dossier, state);
            log::debug!(
                "[{}] {tag_id} ({tag_type}) unknown; generic #{}",
                dossier.citizen_id,
                state.generic_question_count()
            );
            return ResolvedResponse::new(TagId::new(tag_id), response, ResponseSource::Generic);
        };

        let tag = interaction.tag_id.clone();
        let (response, source, newly_denied) = if state.is_truth_unlocked(&tag) {
            let (response, source) = self.select_unlocked(state, interaction);
            (response, source, false)
        } else {
            self.select_locked(state, interaction)
        };

        let count = state.record_ask(&tag);
        let adjusted = nervousness::adjust(&response, count, dossier.nervousness_level);
        state.add_stress(adjusted.stress_impact);
        if count > REPEAT_STRESS_AFTER {
            state.add_stress(REPEATED_QUESTION_STRESS);
        }
        let newly_unlocked = propagate_unlocks(dossier, state, interaction);

        log::debug!(
            "[{}] {tag} ask #{count} via {source:?}, lie={}, stress={:.2}",
            dossier.citizen_id,
            adjusted.is_lie,
            state.stress()
        );
        let mut resolved = ResolvedResponse::new(tag, adjusted, source);
        resolved.newly_denied = newly_denied;
        resolved.newly_unlocked = newly_unlocked;
        resolved
    }

    /// Question text for a tag. Known tags use their authored question;
    /// others draw a template for `tag_type`. Never touches conversation state.
    pub fn question_for_tag(
        &mut self,
        tag_id: &str,
        tag_type: &str,
        display_name: Option<&str>,
    ) -> String {
        match self.dossier.interaction(tag_id) {
            Some(interaction) => interaction.formatted_question(),
            None => generic::question_for_tag_type(
                self.dossier,
                display_name.unwrap_or(tag_id),
                tag_type,
                &self.config.default_question,
                &mut *self.rng,
            ),
        }
    }

    fn select_unlocked(
        &mut self,
        state: &mut ConversationState,
        interaction: &'a TagInteraction,
    ) -> (TagResponse, ResponseSource) {
        let tag = &interaction.tag_id;
        if !state.has_used_unlocked_initial(tag) {
            let (response, source) = match unlocked_initial(interaction, state.is_denied(tag)) {
                Some((response, source)) => (response.clone(), source),
                None => self.progressive(state, interaction),
            };
            state.mark_unlocked_initial_used(tag);
            return (response.as_truthful(), source);
        }

        let cursor = state.advance_followup_cursor(tag);
        let followups = &interaction.unlocked_followup_responses;
        let (response, source) = match followups.len().checked_sub(1) {
            Some(last) => (
                followups[(cursor as usize).min(last)].clone(),
                ResponseSource::UnlockedFollowup,
            ),
            None => self.progressive(state, interaction),
        };
        (response.as_truthful(), source)
    }

    fn select_locked(
        &mut self,
        state: &mut ConversationState,
        interaction: &'a TagInteraction,
    ) -> (TagResponse, ResponseSource, bool) {
        let (mut response, mut source) = self.progressive(state, interaction);

        let rattled = self.config.stress_zone_gating && state.zone() == StressZone::Rattled;
        if rattled && !matches!(source, ResponseSource::Variant { .. }) {
            let cursor = &mut state.zone_cursors_mut().rattled;
            if let Some(line) = next_zone_line(&self.dossier.rattled_responses, cursor) {
                response = TagResponse {
                    response_type: ResponseType::Nervous,
                    ..TagResponse::new([line])
                };
                source = ResponseSource::StressZone {
                    zone: StressZone::Rattled,
                };
            }
        }

        let newly_denied = response.is_lie && state.mark_denied(&interaction.tag_id);
        (response, source, newly_denied)
    }

    /// Variant groups first, then the plain progressive list, both indexed
    /// by how often the tag has been asked so far.
    fn progressive(
        &mut self,
        state: &ConversationState,
        interaction: &'a TagInteraction,
    ) -> (TagResponse, ResponseSource) {
        let asked = state.times_asked(&interaction.tag_id);
        let eligible = variants::eligible_groups(&interaction.response_variants, state, self.clues);
        if let Some(group) = variants::pick_weighted(&eligible, &mut *self.rng) {
            if let Some(response) = first_eligible(&group.responses, asked, state, self.clues) {
                let source = ResponseSource::Variant {
                    variant_id: group.variant_id.clone(),
                };
                return (response.clone(), source);
            }
            log::warn!(
                "[{}] variant {:?} on {} has no responses",
                self.dossier.citizen_id, group.variant_id, interaction.tag_id
            );
        }

        match first_eligible(&interaction.responses, asked, state, self.clues) {
            Some(response) => (response.clone(), ResponseSource::Progressive),
            None => {
                log::warn!(
                    "[{}] {} has no responses; replying with a blank line",
                    self.dossier.citizen_id, interaction.tag_id
                );
                (TagResponse::empty(), ResponseSource::Empty)
            }
        }
    }
}

/// First reveal after an unlock. A denied tag prefers its confession; the
/// confession still beats the follow-ups when it is the only initial line.
fn unlocked_initial(
    interaction: &TagInteraction,
    denied: bool,
) -> Option<(&TagResponse, ResponseSource)> {
    let confession = interaction
        .unlocked_initial_response_if_previously_denied
        .as_ref()
        .filter(|response| response.has_content());
    let candid = interaction
        .unlocked_initial_response_if_not_denied
        .as_ref()
        .filter(|response| response.has_content());

    match (confession, candid) {
        (Some(response), _) if denied => Some((response, ResponseSource::UnlockedInitialDenied)),
        (_, Some(response)) => Some((response, ResponseSource::UnlockedInitialNotDenied)),
        (Some(response), None) => Some((response, ResponseSource::UnlockedInitialDenied)),
        (None, None) => interaction
            .unlocked_followup_responses
            .first()
            .map(|response| (response, ResponseSource::UnlockedFollowup)),
    }
}

pub(crate) fn propagate_unlocks(
    dossier: &SuspectDossier,
    state: &mut ConversationState,
    interaction: &TagInteraction,
) -> Vec<TagId> {
    let mut unlocked = Vec::new();
    for target in &interaction.unlocks_truth_for_tag_ids {
        if state.unlock_truth(target) {
            state.add_stress(TRUTH_UNLOCK_STRESS);
            log::info!(
                "[{}] {} unlocked truth for {target}",
                dossier.citizen_id, interaction.tag_id
            );
            unlocked.push(target.clone());
        }
    }
    unlocked
}

/// Short-circuit reply for the zones where the suspect stops engaging.
fn zone_reply(
    dossier: &SuspectDossier,
    state: &mut ConversationState,
    tag: TagId,
) -> Option<ResolvedResponse> {
    let zone = state.zone();
    let cursors = state.zone_cursors_mut();
    let (line, response_type) = match zone {
        StressZone::Shutdown => (
            next_zone_line(&dossier.shutdown_responses, &mut cursors.shutdown)
                .unwrap_or_else(|| DEFAULT_SHUTDOWN_LINE.to_string()),
            ResponseType::Hostile,
        ),
        StressZone::LawyeredUp => (
            next_zone_line(&dossier.lawyered_up_responses, &mut cursors.lawyered_up)
                .unwrap_or_else(|| DEFAULT_LAWYERED_UP_LINE.to_string()),
            ResponseType::Defensive,
        ),
        _ => return None,
    };
    let response = TagResponse {
        response_type,
        ..TagResponse::new([line])
    };
    Some(ResolvedResponse::new(
        tag,
        response,
        ResponseSource::StressZone { zone },
    ))
}

fn next_zone_line(lines: &[String], cursor: &mut usize) -> Option<String> {
    if lines.is_empty() {
        return None;
    }
    let line = lines[*cursor % lines.len()].clone();
    *cursor += 1;
    Some(line)
}
