use serde::{Deserialize, Serialize};

/// Gate kinds understood by the engine. Content naming any other kind
/// deserializes as `Unrecognized`, which never holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionType {
    /// `target_id` asked at least `min_count` times.
    TagAsked,
    /// `target_id` never asked.
    TagNotAsked,
    ClueDiscovered,
    ClueNotDiscovered,
    TruthUnlocked,
    /// Stress at or above `threshold`.
    StressAbove,
    /// Stress strictly below `threshold`.
    StressBelow,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseCondition {
    #[serde(rename = "type")]
    pub kind: ConditionType,
    #[serde(default)]
    pub target_id: String,
    #[serde(default = "default_min_count")]
    pub min_count: u32,
    #[serde(default)]
    pub threshold: f32,
}

fn default_min_count() -> u32 {
    1
}

impl ResponseCondition {
    pub fn new(kind: ConditionType, target_id: impl Into<String>) -> Self {
        ResponseCondition {
            kind,
            target_id: target_id.into(),
            min_count: default_min_count(),
            threshold: 0.0,
        }
    }

    pub fn tag_asked(target_id: impl Into<String>, min_count: u32) -> Self {
        ResponseCondition {
            min_count,
            ..ResponseCondition::new(ConditionType::TagAsked, target_id)
        }
    }

    pub fn stress_above(threshold: f32) -> Self {
        ResponseCondition {
            threshold,
            ..ResponseCondition::new(ConditionType::StressAbove, "")
        }
    }

    pub fn stress_below(threshold: f32) -> Self {
        ResponseCondition {
            threshold,
            ..ResponseCondition::new(ConditionType::StressBelow, "")
        }
    }
}
