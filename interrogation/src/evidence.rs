use dossier_formats::{SuspectDossier, TagId, TagResponse};

use crate::engine::{ResolvedResponse, ResponseSource};
use crate::nervousness;
use crate::state::ConversationState;
use crate::stress::CONTRADICTION_STRESS;

const SILENCE: &str = "...";

/// Confronts the suspect with `evidence_tag_id`.
///
/// Picks the first interaction that lied about something this evidence
/// disproves and has not already been confronted with it. The caught tag
/// becomes truth-unlocked and denied, and the reply is always truthful.
/// The confession stands in for a missing contradiction line only while the
/// tag's one-time reveal is unused. Returns `None` when the evidence
/// contradicts nothing; the caller should then ask about it normally. Ask
/// counters are left untouched.
pub fn present_evidence(
    dossier: &SuspectDossier,
    state: &mut ConversationState,
    evidence_tag_id: &str,
) -> Option<ResolvedResponse> {
    let evidence = TagId::new(evidence_tag_id);
    let Some(interaction) = dossier.tag_interactions.iter().find(|interaction| {
        interaction.has_lies()
            && interaction.is_contradicted_by(evidence_tag_id)
            && !state.is_contradiction_used(&interaction.tag_id, &evidence)
    }) else {
        log::debug!(
            "[{}] evidence {evidence} contradicts nothing",
            dossier.citizen_id
        );
        return None;
    };

    let tag = interaction.tag_id.clone();
    state.add_stress(state.tone().stress_delta());
    state.mark_contradiction(&tag, &evidence);
    let newly_unlocked = state.unlock_truth(&tag);
    let newly_denied = state.mark_denied(&tag);
    state.add_stress(CONTRADICTION_STRESS);

    let contradiction = interaction
        .contradiction_response
        .as_ref()
        .filter(|response| response.has_content());
    let confession = interaction
        .unlocked_initial_response_if_previously_denied
        .as_ref()
        .filter(|response| response.has_content() && !state.has_used_unlocked_initial(&tag));
    let base = match (contradiction, confession) {
        (Some(response), _) => response.clone(),
        (None, Some(response)) => {
            state.mark_unlocked_initial_used(&tag);
            response.clone()
        }
        (None, None) => TagResponse::new([SILENCE]),
    };

    let adjusted = nervousness::adjust(&base.as_truthful(), 1, dossier.nervousness_level);
    state.add_stress(adjusted.stress_impact);
    log::info!(
        "[{}] {evidence} contradicts {tag}; stress now {:.2}",
        dossier.citizen_id,
        state.stress()
    );

    let mut resolved =
        ResolvedResponse::new(tag.clone(), adjusted, ResponseSource::Contradiction { evidence });
    resolved.newly_denied = newly_denied;
    if newly_unlocked {
        resolved.newly_unlocked.push(tag);
    }
    Some(resolved)
}
