use dossier_formats::ResponseVariantGroup;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::conditions::{all_met, ClueLedger};
use crate::state::ConversationState;

/// Weights below this are lifted so a mis-authored group stays drawable.
pub const MIN_VARIANT_WEIGHT: f32 = 0.01;

pub fn eligible_groups<'a>(
    groups: &'a [ResponseVariantGroup],
    state: &ConversationState,
    clues: &dyn ClueLedger,
) -> Vec<&'a ResponseVariantGroup> {
    groups
        .iter()
        .filter(|group| all_met(group.conditions(), state, clues))
        .collect()
}

/// Weighted draw among eligible groups. A single candidate is returned
/// without touching the generator.
pub fn pick_weighted<'a, R: Rng + ?Sized>(
    eligible: &[&'a ResponseVariantGroup],
    rng: &mut R,
) -> Option<&'a ResponseVariantGroup> {
    match eligible {
        [] => None,
        [only] => Some(*only),
        _ => {
            let weights = eligible
                .iter()
                .map(|group| group.weight.max(MIN_VARIANT_WEIGHT));
            match WeightedIndex::new(weights) {
                Ok(index) => Some(eligible[index.sample(rng)]),
                Err(_) => eligible.last().copied(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::NoClues;
    use dossier_formats::{ResponseCondition, TagResponse};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn group(id: &str, weight: f32) -> ResponseVariantGroup {
        ResponseVariantGroup {
            weight,
            ..ResponseVariantGroup::new(id, vec![TagResponse::new([id])])
        }
    }

    #[test]
    fn filters_by_conditions() {
        let state = ConversationState::new(0.3);
        let mut gated = group("late", 1.0);
        gated.conditions = Some(vec![ResponseCondition::tag_asked("alibi", 1)]);
        let groups = vec![group("open", 1.0), gated];

        let eligible = eligible_groups(&groups, &state, &NoClues);
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].variant_id, "open");
    }

    #[test]
    fn seeded_draws_repeat() {
        let groups = vec![group("a", 1.0), group("b", 3.0), group("c", 0.0)];
        let eligible: Vec<&ResponseVariantGroup> = groups.iter().collect();

        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..16)
                .map(|_| pick_weighted(&eligible, &mut rng).unwrap().variant_id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(7), draw(7));
    }

    #[test]
    fn heavier_groups_win_more_often() {
        let groups = vec![group("rare", 1.0), group("common", 99.0)];
        let eligible: Vec<&ResponseVariantGroup> = groups.iter().collect();
        let mut rng = StdRng::seed_from_u64(42);
        let common = (0..1000)
            .filter(|_| pick_weighted(&eligible, &mut rng).unwrap().variant_id == "common")
            .count();
        assert!(common > 900, "common drawn {common} times");
    }

    #[test]
    fn single_candidate_is_returned_directly() {
        let groups = vec![group("only", 0.0)];
        let eligible: Vec<&ResponseVariantGroup> = groups.iter().collect();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_weighted(&eligible, &mut rng).unwrap().variant_id, "only");
        assert!(pick_weighted(&[], &mut rng).is_none());
    }
}
