use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use interrogation::InterrogationTone;
use serde::Deserialize;

/// One scripted detective action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptStep {
    Ask {
        tag: String,
        #[serde(default)]
        tag_type: String,
        #[serde(default)]
        display_name: Option<String>,
    },
    PresentEvidence {
        evidence: String,
    },
    Tone {
        tone: InterrogationTone,
    },
    Discover {
        clue: String,
    },
    /// Suspends the current suspect and starts or resumes another.
    Switch {
        suspect: String,
    },
    Reset,
}

impl ScriptStep {
    /// Parses `TAG[:TYPE]` as given to `--ask`.
    pub fn parse_ask(raw: &str) -> ScriptStep {
        let (tag, tag_type) = raw.split_once(':').unwrap_or((raw, ""));
        ScriptStep::Ask {
            tag: tag.trim().to_string(),
            tag_type: tag_type.trim().to_string(),
            display_name: None,
        }
    }
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read script: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse script json: {}", path.display()))
}
