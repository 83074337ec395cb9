//! Authoring checks over a single dossier. The engine tolerates every defect
//! reported here at runtime; the report exists so writers find the gaps
//! before a player does.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::condition::ConditionType;
use crate::dossier::SuspectDossier;
use crate::interaction::TagInteraction;
use crate::response::TagResponse;
use crate::tag::TagId;

const BREAKDOWN_STRESS: f32 = 0.8;
const UNRESPONSIVE_NERVOUSNESS: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LintFinding {
    pub severity: Severity,
    pub category: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LintReport {
    pub citizen_id: String,
    pub findings: Vec<LintFinding>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.findings
            .iter()
            .any(|finding| finding.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &LintFinding> {
        self.findings
            .iter()
            .filter(|finding| finding.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &LintFinding> {
        self.findings
            .iter()
            .filter(|finding| finding.severity == Severity::Warning)
    }

    fn error(&mut self, category: &'static str, message: String) {
        self.findings.push(LintFinding {
            severity: Severity::Error,
            category,
            message,
        });
    }

    fn warn(&mut self, category: &'static str, message: String) {
        self.findings.push(LintFinding {
            severity: Severity::Warning,
            category,
            message,
        });
    }
}

pub fn lint_dossier(dossier: &SuspectDossier) -> LintReport {
    let mut report = LintReport {
        citizen_id: dossier.citizen_id.clone(),
        findings: Vec::new(),
    };

    check_unique_tags(dossier, &mut report);
    check_temperament(dossier, &mut report);

    if dossier.generic_responses.is_empty() {
        report.warn(
            "POOL",
            "genericResponses is empty; unknown tags will get a blank reply".to_string(),
        );
    }

    let known: BTreeSet<&TagId> = dossier
        .tag_interactions
        .iter()
        .map(|interaction| &interaction.tag_id)
        .collect();

    for interaction in &dossier.tag_interactions {
        check_pools(interaction, &mut report);
        check_unlock_targets(interaction, &known, &mut report);
        check_contradictions(interaction, &mut report);
        check_variants(dossier, interaction, &mut report);
        for response in interaction.all_responses() {
            check_clickable_text(interaction, response, &mut report);
            check_conditions(
                interaction,
                response.conditions().iter().map(|c| (c.kind, c.min_count)),
                &mut report,
            );
        }
    }

    report
}

fn check_unique_tags(dossier: &SuspectDossier, report: &mut LintReport) {
    let mut seen = BTreeSet::new();
    for interaction in &dossier.tag_interactions {
        if interaction.tag_id.is_empty() {
            report.error("UNIQUE", "interaction with an empty tagId".to_string());
        } else if !seen.insert(&interaction.tag_id) {
            report.error(
                "UNIQUE",
                format!(
                    "duplicate tagId '{}'; only the first is reachable",
                    interaction.tag_id
                ),
            );
        }
    }
}

fn check_temperament(dossier: &SuspectDossier, report: &mut LintReport) {
    if !(0.0..=1.0).contains(&dossier.nervousness_level) {
        report.error(
            "STRESS",
            format!(
                "nervousnessLevel {} is outside [0, 1]",
                dossier.nervousness_level
            ),
        );
    } else if dossier.nervousness_level < UNRESPONSIVE_NERVOUSNESS {
        report.warn(
            "STRESS",
            format!(
                "nervousnessLevel {} is very low; suspect may not react to pressure",
                dossier.nervousness_level
            ),
        );
    }

    if dossier.initial_stress > BREAKDOWN_STRESS {
        report.warn(
            "STRESS",
            format!(
                "initialStress {} starts next to the breakdown zone",
                dossier.initial_stress
            ),
        );
    }
}

fn check_pools(interaction: &TagInteraction, report: &mut LintReport) {
    if interaction.responses.is_empty() {
        report.warn(
            "POOL",
            format!(
                "tag '{}' has no responses; locked asks will get a blank reply",
                interaction.tag_id
            ),
        );
    }
}

fn check_unlock_targets(
    interaction: &TagInteraction,
    known: &BTreeSet<&TagId>,
    report: &mut LintReport,
) {
    for target in &interaction.unlocks_truth_for_tag_ids {
        if !known.contains(target) {
            report.error(
                "XREF",
                format!(
                    "tag '{}' unlocks truth for '{}', which this suspect has no interaction for",
                    interaction.tag_id, target
                ),
            );
        }
    }
}

fn check_contradictions(interaction: &TagInteraction, report: &mut LintReport) {
    if !interaction.contradicted_by_evidence_tag_ids.is_empty() && !interaction.has_lies() {
        report.warn(
            "XREF",
            format!(
                "tag '{}' lists contradicting evidence but none of its responses is a lie",
                interaction.tag_id
            ),
        );
    }
}

fn check_variants(
    dossier: &SuspectDossier,
    interaction: &TagInteraction,
    report: &mut LintReport,
) {
    for group in &interaction.response_variants {
        if group.responses.is_empty() {
            report.warn(
                "POOL",
                format!(
                    "variant '{}' on tag '{}' has no responses",
                    group.variant_id, interaction.tag_id
                ),
            );
        }
        if group.weight.is_nan() || group.weight <= 0.0 {
            report.warn(
                "WEIGHT",
                format!(
                    "variant '{}' on tag '{}' has non-positive weight {}",
                    group.variant_id, interaction.tag_id, group.weight
                ),
            );
        }
        check_conditions(
            interaction,
            group.conditions().iter().map(|c| (c.kind, c.min_count)),
            report,
        );
        for condition in group.conditions() {
            if condition.kind == ConditionType::StressAbove
                && dossier.initial_stress >= 0.0
                && condition.threshold <= dossier.initial_stress
            {
                report.warn(
                    "STRESS",
                    format!(
                        "variant '{}' on tag '{}' triggers at stress {} but the suspect starts at {}",
                        group.variant_id,
                        interaction.tag_id,
                        condition.threshold,
                        dossier.initial_stress
                    ),
                );
            }
        }
    }
}

fn check_conditions(
    interaction: &TagInteraction,
    conditions: impl Iterator<Item = (ConditionType, u32)>,
    report: &mut LintReport,
) {
    for (kind, min_count) in conditions {
        if kind == ConditionType::Unrecognized {
            report.warn(
                "COND",
                format!(
                    "tag '{}' has a condition of unknown type; it will never hold",
                    interaction.tag_id
                ),
            );
        } else if kind == ConditionType::TagAsked && min_count == 0 {
            report.warn(
                "COND",
                format!(
                    "tag '{}' has a TagAsked condition with minCount 0; it always holds",
                    interaction.tag_id
                ),
            );
        }
    }
}

fn check_clickable_text(
    interaction: &TagInteraction,
    response: &TagResponse,
    report: &mut LintReport,
) {
    for clue in &response.clickable_clues {
        let found = response
            .response_sequence
            .iter()
            .any(|line| clue.exists_in(line));
        if !found {
            report.error(
                "CLICK",
                format!(
                    "tag '{}': clickable text \"{}\" (clue '{}') does not appear in its response",
                    interaction.tag_id, clue.clickable_text, clue.clue_id
                ),
            );
        }
    }
}
