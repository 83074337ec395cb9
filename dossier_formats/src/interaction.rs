use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::condition::ResponseCondition;
use crate::response::TagResponse;
use crate::tag::TagId;

pub const DEFAULT_TAG_QUESTION: &str = "Tell me about '{tag}'";

fn default_tag_question() -> String {
    DEFAULT_TAG_QUESTION.to_string()
}

fn default_weight() -> f32 {
    1.0
}

/// Everything a suspect can say about one topic they actually know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagInteraction {
    pub tag_id: TagId,
    #[serde(default = "default_tag_question")]
    pub tag_question: String,
    /// Indexed by how often the tag has been asked before truth is unlocked.
    #[serde(default)]
    pub responses: Vec<TagResponse>,
    #[serde(default)]
    pub unlocks_truth_for_tag_ids: BTreeSet<TagId>,
    #[serde(default)]
    pub unlocked_initial_response_if_previously_denied: Option<TagResponse>,
    #[serde(default)]
    pub unlocked_initial_response_if_not_denied: Option<TagResponse>,
    #[serde(default)]
    pub unlocked_followup_responses: Vec<TagResponse>,
    #[serde(default)]
    pub contradicted_by_evidence_tag_ids: BTreeSet<TagId>,
    #[serde(default)]
    pub contradiction_response: Option<TagResponse>,
    #[serde(default)]
    pub response_variants: Vec<ResponseVariantGroup>,
}

impl TagInteraction {
    pub fn new(tag_id: impl Into<TagId>) -> Self {
        TagInteraction {
            tag_id: tag_id.into(),
            tag_question: default_tag_question(),
            responses: Vec::new(),
            unlocks_truth_for_tag_ids: BTreeSet::new(),
            unlocked_initial_response_if_previously_denied: None,
            unlocked_initial_response_if_not_denied: None,
            unlocked_followup_responses: Vec::new(),
            contradicted_by_evidence_tag_ids: BTreeSet::new(),
            contradiction_response: None,
            response_variants: Vec::new(),
        }
    }

    pub fn formatted_question(&self) -> String {
        self.tag_question.replace("{tag}", self.tag_id.as_str())
    }

    pub fn has_lies(&self) -> bool {
        self.responses.iter().any(|response| response.is_lie)
    }

    pub fn is_contradicted_by(&self, evidence_tag: &str) -> bool {
        self.contradicted_by_evidence_tag_ids
            .iter()
            .any(|tag| tag.matches(evidence_tag))
    }

    /// Every authored reply on this interaction, in authoring order.
    pub fn all_responses(&self) -> impl Iterator<Item = &TagResponse> {
        self.responses
            .iter()
            .chain(self.contradiction_response.iter())
            .chain(self.unlocked_initial_response_if_previously_denied.iter())
            .chain(self.unlocked_initial_response_if_not_denied.iter())
            .chain(self.unlocked_followup_responses.iter())
            .chain(
                self.response_variants
                    .iter()
                    .flat_map(|group| group.responses.iter()),
            )
    }
}

/// Conditioned, weighted alternative reply list for a tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseVariantGroup {
    #[serde(default)]
    pub variant_id: String,
    #[serde(default = "default_weight")]
    pub weight: f32,
    #[serde(default)]
    pub conditions: Option<Vec<ResponseCondition>>,
    #[serde(default)]
    pub responses: Vec<TagResponse>,
}

impl ResponseVariantGroup {
    pub fn new(variant_id: impl Into<String>, responses: Vec<TagResponse>) -> Self {
        ResponseVariantGroup {
            variant_id: variant_id.into(),
            weight: default_weight(),
            conditions: None,
            responses,
        }
    }

    pub fn conditions(&self) -> &[ResponseCondition] {
        self.conditions.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_interaction() {
        let raw = r#"{
            "tagId": "Alibi",
            "responses": [{"responseSequence": ["I was home."], "isLie": true}],
            "unlocksTruthForTagIds": ["witness", "WITNESS"],
            "responseVariants": [{"variantId": "rattled", "responses": []}]
        }"#;
        let interaction: TagInteraction = serde_json::from_str(raw).unwrap();
        assert_eq!(interaction.tag_question, DEFAULT_TAG_QUESTION);
        assert_eq!(interaction.unlocks_truth_for_tag_ids.len(), 1);
        assert!(interaction.has_lies());
        assert_eq!(interaction.response_variants[0].weight, 1.0);
        assert!(interaction.unlocked_initial_response_if_not_denied.is_none());
    }

    #[test]
    fn question_substitutes_tag() {
        let mut interaction = TagInteraction::new("the docks");
        interaction.tag_question = "Why were you at {tag}?".to_string();
        assert_eq!(interaction.formatted_question(), "Why were you at the docks?");
    }

    #[test]
    fn evidence_lookup_ignores_case() {
        let mut interaction = TagInteraction::new("alibi");
        interaction
            .contradicted_by_evidence_tag_ids
            .insert(TagId::new("Bus Ticket"));
        assert!(interaction.is_contradicted_by("bus ticket"));
        assert!(!interaction.is_contradicted_by("receipt"));
    }
}
