use dossier_formats::TagResponse;

/// Asks beyond this count make the suspect visibly agitated.
pub const AGITATION_ASK_THRESHOLD: u32 = 3;
pub const HIGH_NERVOUSNESS: f32 = 0.7;
pub const HIGH_NERVOUSNESS_DELAY: f32 = 2.5;
pub const BASE_AGITATION_DELAY: f32 = 1.8;

/// Returns a copy of `base` with its reply delay stretched once the same
/// question has been pushed past the agitation threshold.
pub fn adjust(base: &TagResponse, times_asked: u32, nervousness: f32) -> TagResponse {
    let mut adjusted = base.clone();
    if times_asked > AGITATION_ASK_THRESHOLD {
        let floor = if nervousness > HIGH_NERVOUSNESS {
            HIGH_NERVOUSNESS_DELAY
        } else {
            BASE_AGITATION_DELAY
        };
        adjusted.response_delay_override = adjusted.response_delay_override.max(floor);
    }
    adjusted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_early_asks_alone() {
        let base = TagResponse::lie(["No idea."]);
        let adjusted = adjust(&base, 3, 0.95);
        assert_eq!(adjusted, base);
    }

    #[test]
    fn stretches_delay_by_temperament() {
        let base = TagResponse::new(["Again?"]);
        assert_eq!(adjust(&base, 4, 0.9).response_delay_override, 2.5);
        assert_eq!(adjust(&base, 4, 0.7).response_delay_override, 1.8);

        let slow = TagResponse {
            response_delay_override: 4.0,
            ..base
        };
        let adjusted = adjust(&slow, 9, 0.9);
        assert_eq!(adjusted.response_delay_override, 4.0);
        assert_eq!(adjusted.response_sequence, slow.response_sequence);
    }
}
