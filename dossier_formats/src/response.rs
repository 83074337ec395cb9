use serde::{Deserialize, Serialize};

use crate::condition::ResponseCondition;

/// Category hint carried alongside a line, consumed by the chat UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResponseType {
    #[default]
    Normal,
    Defensive,
    Cooperative,
    Nervous,
    Hostile,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl HighlightColor {
    pub const YELLOW: HighlightColor = HighlightColor {
        r: 1.0,
        g: 1.0,
        b: 0.0,
        a: 1.0,
    };
}

impl Default for HighlightColor {
    fn default() -> Self {
        HighlightColor::YELLOW
    }
}

/// A span of a reply that, once clicked, adds a note to the notebook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClickableClueSegment {
    pub clue_id: String,
    pub clickable_text: String,
    pub note_text: String,
    pub highlight_color: HighlightColor,
    pub one_time_only: bool,
}

impl Default for ClickableClueSegment {
    fn default() -> Self {
        ClickableClueSegment {
            clue_id: String::new(),
            clickable_text: String::new(),
            note_text: String::new(),
            highlight_color: HighlightColor::YELLOW,
            one_time_only: true,
        }
    }
}

impl ClickableClueSegment {
    pub fn new(
        clue_id: impl Into<String>,
        clickable_text: impl Into<String>,
        note_text: impl Into<String>,
    ) -> Self {
        ClickableClueSegment {
            clue_id: clue_id.into(),
            clickable_text: clickable_text.into(),
            note_text: note_text.into(),
            ..ClickableClueSegment::default()
        }
    }

    pub fn exists_in(&self, line: &str) -> bool {
        !self.clickable_text.is_empty()
            && line
                .to_ascii_lowercase()
                .contains(&self.clickable_text.to_ascii_lowercase())
    }
}

/// One deliverable reply; `response_sequence` renders as consecutive bubbles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TagResponse {
    pub response_sequence: Vec<String>,
    pub is_lie: bool,
    pub response_delay_override: f32,
    pub clickable_clues: Vec<ClickableClueSegment>,
    pub conditions: Option<Vec<ResponseCondition>>,
    pub stress_impact: f32,
    pub response_type: ResponseType,
}

impl Default for TagResponse {
    fn default() -> Self {
        TagResponse {
            response_sequence: vec![String::new()],
            is_lie: false,
            response_delay_override: 0.0,
            clickable_clues: Vec::new(),
            conditions: None,
            stress_impact: 0.0,
            response_type: ResponseType::Normal,
        }
    }
}

impl TagResponse {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TagResponse {
            response_sequence: lines.into_iter().map(Into::into).collect(),
            ..TagResponse::default()
        }
    }

    pub fn lie<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TagResponse {
            is_lie: true,
            ..TagResponse::new(lines)
        }
    }

    /// Reply with no bubbles at all, substituted when authored content has a
    /// gap where a reply was required.
    pub fn empty() -> Self {
        TagResponse {
            response_sequence: Vec::new(),
            ..TagResponse::default()
        }
    }

    pub fn has_content(&self) -> bool {
        !self.response_sequence.is_empty()
    }

    pub fn conditions(&self) -> &[ResponseCondition] {
        self.conditions.as_deref().unwrap_or(&[])
    }

    pub fn combined(&self) -> String {
        self.response_sequence.join(". ")
    }

    /// Copy of this reply with the lie flag cleared. Authored data stays as is.
    pub fn as_truthful(&self) -> TagResponse {
        TagResponse {
            is_lie: false,
            ..self.clone()
        }
    }
}
