use dossier_formats::SuspectDossier;
use serde::{Deserialize, Serialize};

pub const LAWYERED_UP_MAX: f32 = 0.2;
pub const DEFLECTING_MAX: f32 = 0.4;
pub const SWEET_SPOT_MAX: f32 = 0.7;
pub const RATTLED_MAX: f32 = 0.8;

/// Added once the same tag has been asked more than `REPEAT_STRESS_AFTER` times.
pub const REPEATED_QUESTION_STRESS: f32 = 0.05;
pub const REPEAT_STRESS_AFTER: u32 = 2;
pub const TRUTH_UNLOCK_STRESS: f32 = 0.2;
pub const CONTRADICTION_STRESS: f32 = 0.3;

const DERIVED_STRESS_FLOOR: f32 = 0.25;
const DERIVED_STRESS_CEILING: f32 = 0.45;

pub const DEFAULT_SHUTDOWN_LINE: &str = "...";
pub const DEFAULT_LAWYERED_UP_LINE: &str = "I want to speak to a lawyer.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StressZone {
    LawyeredUp,
    Deflecting,
    SweetSpot,
    Rattled,
    Shutdown,
}

impl StressZone {
    pub fn from_stress(stress: f32) -> Self {
        if stress < LAWYERED_UP_MAX {
            StressZone::LawyeredUp
        } else if stress < DEFLECTING_MAX {
            StressZone::Deflecting
        } else if stress < SWEET_SPOT_MAX {
            StressZone::SweetSpot
        } else if stress < RATTLED_MAX {
            StressZone::Rattled
        } else {
            StressZone::Shutdown
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StressZone::LawyeredUp => "lawyered_up",
            StressZone::Deflecting => "deflecting",
            StressZone::SweetSpot => "sweet_spot",
            StressZone::Rattled => "rattled",
            StressZone::Shutdown => "shutdown",
        }
    }
}

/// How the detective is pressing the suspect; nudges stress on every ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterrogationTone {
    Calm,
    #[default]
    Neutral,
    Firm,
}

impl InterrogationTone {
    pub fn stress_delta(self) -> f32 {
        match self {
            InterrogationTone::Calm => -0.08,
            InterrogationTone::Neutral => 0.02,
            InterrogationTone::Firm => 0.10,
        }
    }
}

/// Stress a fresh session starts from: the authored value when set,
/// otherwise a band scaled by nervousness.
pub fn initial_stress(dossier: &SuspectDossier) -> f32 {
    if dossier.initial_stress >= 0.0 {
        dossier.initial_stress.clamp(0.0, 1.0)
    } else {
        let t = dossier.nervousness_level.clamp(0.0, 1.0);
        DERIVED_STRESS_FLOOR + (DERIVED_STRESS_CEILING - DERIVED_STRESS_FLOOR) * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_boundaries_are_half_open() {
        assert_eq!(StressZone::from_stress(0.0), StressZone::LawyeredUp);
        assert_eq!(StressZone::from_stress(0.2), StressZone::Deflecting);
        assert_eq!(StressZone::from_stress(0.4), StressZone::SweetSpot);
        assert_eq!(StressZone::from_stress(0.7), StressZone::Rattled);
        assert_eq!(StressZone::from_stress(0.8), StressZone::Shutdown);
        assert_eq!(StressZone::from_stress(1.0), StressZone::Shutdown);
    }

    #[test]
    fn initial_stress_prefers_authored_value() {
        let mut dossier = SuspectDossier::new("C-1", "Ada", "Vance");
        dossier.nervousness_level = 1.0;
        assert!((initial_stress(&dossier) - 0.45).abs() < 1e-6);
        dossier.nervousness_level = 0.0;
        assert!((initial_stress(&dossier) - 0.25).abs() < 1e-6);
        dossier.initial_stress = 1.7;
        assert_eq!(initial_stress(&dossier), 1.0);
    }
}
