use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interaction::TagInteraction;
use crate::response::TagResponse;

pub const DEFAULT_NERVOUSNESS: f32 = 0.3;

#[derive(Debug, Error)]
pub enum DossierError {
    #[error("failed to read dossier {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse dossier {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Question templates used for a tag type the suspect has no specific lines for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericQuestion {
    pub tag_type: String,
    #[serde(default = "default_question_templates")]
    pub questions: Vec<String>,
}

impl GenericQuestion {
    pub fn new(tag_type: &str, questions: &[&str]) -> Self {
        GenericQuestion {
            tag_type: tag_type.to_string(),
            questions: questions.iter().map(|q| q.to_string()).collect(),
        }
    }
}

fn default_question_templates() -> Vec<String> {
    [
        "Tell me about '{tag}'",
        "What do you know about '{tag}'?",
        "Do you know anything about '{tag}'?",
    ]
    .iter()
    .map(|q| q.to_string())
    .collect()
}

pub fn default_generic_questions() -> Vec<GenericQuestion> {
    vec![
        GenericQuestion::new(
            "person",
            &[
                "Tell me about '{tag}'",
                "Do you know '{tag}'?",
                "What's your relationship with '{tag}'?",
            ],
        ),
        GenericQuestion::new(
            "location",
            &[
                "Tell me about '{tag}'",
                "Have you been to '{tag}'?",
                "What do you know about '{tag}'?",
            ],
        ),
        GenericQuestion::new(
            "item",
            &[
                "Tell me about '{tag}'",
                "Do you recognize '{tag}'?",
                "What do you know about '{tag}'?",
            ],
        ),
        GenericQuestion::new(
            "date",
            &[
                "Tell me about '{tag}'",
                "What happened on '{tag}'?",
                "Do you remember '{tag}'?",
            ],
        ),
        GenericQuestion::new(
            "time",
            &[
                "Tell me about '{tag}'",
                "What were you doing at '{tag}'?",
                "Do you remember '{tag}'?",
            ],
        ),
    ]
}

pub fn default_generic_responses() -> Vec<TagResponse> {
    vec![
        TagResponse::new(["I don't know anything about that."]),
        TagResponse::new(["I already told you, I don't know."]),
        TagResponse::new(["Why do you keep asking me about things I don't know?"]),
    ]
}

fn default_nervousness() -> f32 {
    DEFAULT_NERVOUSNESS
}

fn default_initial_stress() -> f32 {
    -1.0
}

/// Interrogation-facing slice of a suspect: identity, temperament and the
/// authored dialogue catalog. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuspectDossier {
    #[serde(rename = "citizenID")]
    pub citizen_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default = "default_nervousness")]
    pub nervousness_level: f32,
    /// Negative means "derive from nervousness".
    #[serde(default = "default_initial_stress")]
    pub initial_stress: f32,
    #[serde(default)]
    pub tag_interactions: Vec<TagInteraction>,
    #[serde(default = "default_generic_questions")]
    pub generic_questions: Vec<GenericQuestion>,
    #[serde(default = "default_generic_responses")]
    pub generic_responses: Vec<TagResponse>,
    #[serde(default)]
    pub lawyered_up_responses: Vec<String>,
    #[serde(default)]
    pub rattled_responses: Vec<String>,
    #[serde(default)]
    pub shutdown_responses: Vec<String>,
}

impl SuspectDossier {
    pub fn new(
        citizen_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        SuspectDossier {
            citizen_id: citizen_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            nervousness_level: DEFAULT_NERVOUSNESS,
            initial_stress: default_initial_stress(),
            tag_interactions: Vec::new(),
            generic_questions: default_generic_questions(),
            generic_responses: default_generic_responses(),
            lawyered_up_responses: Vec::new(),
            rattled_responses: Vec::new(),
            shutdown_responses: Vec::new(),
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, DossierError> {
        serde_json::from_str(raw).map_err(|source| DossierError::Parse {
            origin: "<inline>".to_string(),
            source,
        })
    }

    pub fn from_json_file(path: &Path) -> Result<Self, DossierError> {
        let raw = fs::read_to_string(path).map_err(|source| DossierError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| DossierError::Parse {
            origin: path.display().to_string(),
            source,
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Case-insensitive lookup of the interaction for `tag_id`.
    pub fn interaction(&self, tag_id: &str) -> Option<&TagInteraction> {
        self.tag_interactions
            .iter()
            .find(|interaction| interaction.tag_id.matches(tag_id))
    }

    pub fn has_knowledge_about(&self, tag_id: &str) -> bool {
        self.interaction(tag_id).is_some()
    }

    pub fn generic_questions_for(&self, tag_type: &str) -> Option<&GenericQuestion> {
        self.generic_questions
            .iter()
            .find(|question| question.tag_type.eq_ignore_ascii_case(tag_type))
    }
}
