use dossier_formats::{SuspectDossier, TagResponse};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::nervousness;
use crate::state::ConversationState;

/// Reply for a tag the suspect knows nothing specific about. Walks the
/// generic list one step per unknown question and repeats the last entry.
pub fn resolve_generic(dossier: &SuspectDossier, state: &mut ConversationState) -> TagResponse {
    let count = state.next_generic_question();
    let Some(last) = dossier.generic_responses.len().checked_sub(1) else {
        log::warn!(
            "[{}] genericResponses is empty; replying with a blank line",
            dossier.citizen_id
        );
        return TagResponse::empty();
    };
    let index = (count as usize - 1).min(last);
    nervousness::adjust(
        &dossier.generic_responses[index],
        count,
        dossier.nervousness_level,
    )
}

/// Random question template for `tag_type`, with `{tag}` replaced by
/// `display_name`. Falls back to `default_template` for unknown types.
pub fn question_for_tag_type<R: Rng + ?Sized>(
    dossier: &SuspectDossier,
    display_name: &str,
    tag_type: &str,
    default_template: &str,
    rng: &mut R,
) -> String {
    let template = dossier
        .generic_questions_for(tag_type)
        .and_then(|question| question.questions.choose(rng))
        .map(String::as_str)
        .unwrap_or(default_template);
    template.replace("{tag}", display_name)
}
