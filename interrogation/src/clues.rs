use dossier_formats::{HighlightColor, TagResponse};
use regex::RegexBuilder;
use serde::Serialize;

/// Where a clue's clickable text first shows up in a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClueLocation {
    pub message_index: usize,
    pub start: usize,
    pub end: usize,
}

/// Clickable clue as handed to the note-taking UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedClue {
    pub clue_id: String,
    pub clickable_text: String,
    pub note_text: String,
    pub highlight_color: HighlightColor,
    pub one_time_only: bool,
    pub location: Option<ClueLocation>,
}

pub fn resolve_clues(response: &TagResponse) -> Vec<ResolvedClue> {
    response
        .clickable_clues
        .iter()
        .map(|clue| ResolvedClue {
            clue_id: clue.clue_id.clone(),
            clickable_text: clue.clickable_text.clone(),
            note_text: clue.note_text.clone(),
            highlight_color: clue.highlight_color,
            one_time_only: clue.one_time_only,
            location: locate(&response.response_sequence, &clue.clickable_text),
        })
        .collect()
}

/// Case-insensitive search for `text` across the reply bubbles, byte offsets
/// relative to the matching bubble.
pub fn locate(lines: &[String], text: &str) -> Option<ClueLocation> {
    if text.is_empty() {
        return None;
    }
    let pattern = RegexBuilder::new(&regex::escape(text))
        .case_insensitive(true)
        .build()
        .ok()?;
    lines.iter().enumerate().find_map(|(message_index, line)| {
        pattern.find(line).map(|found| ClueLocation {
            message_index,
            start: found.start(),
            end: found.end(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_formats::ClickableClueSegment;

    #[test]
    fn finds_text_in_later_bubble() {
        let lines = vec![
            "Fine.".to_string(),
            "I was at the Blue Lantern (yes, that one).".to_string(),
        ];
        let location = locate(&lines, "blue lantern (yes").unwrap();
        assert_eq!(location.message_index, 1);
        assert_eq!(&lines[1][location.start..location.end], "Blue Lantern (yes");
        assert!(locate(&lines, "harbor").is_none());
        assert!(locate(&lines, "").is_none());
    }

    #[test]
    fn carries_clue_metadata() {
        let mut response = TagResponse::new(["Ask the night porter."]);
        let mut clue = ClickableClueSegment::new("porter", "night porter", "Check with porter");
        clue.one_time_only = false;
        response.clickable_clues.push(clue);

        let resolved = resolve_clues(&response);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].clue_id, "porter");
        assert!(!resolved[0].one_time_only);
        assert_eq!(
            resolved[0].location,
            Some(ClueLocation {
                message_index: 0,
                start: 8,
                end: 20
            })
        );
    }
}
