use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use dossier_formats::{
    ConditionType, ResponseCondition, ResponseVariantGroup, SuspectDossier, TagId,
    TagInteraction, TagResponse,
};
use interrogation::{
    ConversationState, EngineConfig, InterrogationSession, NoClues, ResponseSource, Resolver,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::NamedTempFile;

const ALIBI_DOSSIER: &str = r#"{
    "citizenID": "C-0451",
    "firstName": "Vera",
    "lastName": "Kasimir",
    "nervousnessLevel": 0.4,
    "tagInteractions": [
        {
            "tagId": "alibi",
            "responses": [
                { "responseSequence": ["I was at home, reading."], "isLie": true },
                { "responseSequence": ["I told you, I was home."], "isLie": false }
            ],
            "unlocksTruthForTagIds": ["witness"]
        },
        {
            "tagId": "witness",
            "unlockedInitialResponseIfPreviouslyDenied": {
                "responseSequence": ["Actually, I lied about my alibi."],
                "isLie": true
            }
        }
    ]
}"#;

fn session_for(dossier: SuspectDossier) -> InterrogationSession {
    InterrogationSession::new(Arc::new(dossier), EngineConfig::default().with_seed(17))
}

fn ledger_suspect() -> SuspectDossier {
    let mut dossier = SuspectDossier::new("C-12", "Ivo", "Lark");
    let mut ledger = TagInteraction::new("ledger");
    ledger.responses = vec![
        TagResponse::lie(["Never seen it."]),
        TagResponse::lie(["I keep no books."]),
        TagResponse::new(["Maybe I wrote in it once."]),
    ];
    ledger.unlocks_truth_for_tag_ids.insert(TagId::new("ledger"));
    ledger.unlocked_initial_response_if_not_denied = Some(TagResponse::new(["It's mine."]));
    ledger.unlocked_followup_responses = vec![
        TagResponse::new(["The numbers are the club's."]),
        TagResponse::lie(["That's everything."]),
    ];
    dossier.tag_interactions.push(ledger);
    dossier
}

#[test]
fn alibi_lie_unlocks_witness_confession() -> Result<()> {
    let mut file = NamedTempFile::new().context("creating dossier file")?;
    file.write_all(ALIBI_DOSSIER.as_bytes())
        .context("writing dossier file")?;
    let dossier = SuspectDossier::from_json_file(file.path()).context("loading dossier")?;
    let mut session = session_for(dossier);

    let first = session.resolve("alibi", "alibi");
    assert_eq!(first.response_sequence, ["I was at home, reading."]);
    assert!(first.is_lie);
    let state = session.state();
    assert_eq!(state.denied_tags().collect::<Vec<_>>(), [&TagId::new("alibi")]);
    assert_eq!(
        state.truth_unlocked().collect::<Vec<_>>(),
        [&TagId::new("witness")]
    );

    let confession = session.resolve("witness", "person");
    assert_eq!(
        confession.response_sequence,
        ["Actually, I lied about my alibi."]
    );
    assert!(!confession.is_lie);
    assert_eq!(
        session.state().used_unlocked_initial_for().collect::<Vec<_>>(),
        [&TagId::new("witness")]
    );
    assert!(session.dossier().interaction("witness").is_some_and(|witness| {
        witness
            .unlocked_initial_response_if_previously_denied
            .as_ref()
            .is_some_and(|authored| authored.is_lie)
    }));
    Ok(())
}

#[test]
fn generic_replies_walk_then_repeat_last() {
    let mut session = session_for(SuspectDossier::new("C-2", "Pim", "Oster"));
    let picks: Vec<String> = ["moon", "tide", "kettle", "pigeon"]
        .iter()
        .map(|tag| session.resolve(tag, "item").combined())
        .collect();
    let authored: Vec<String> = session
        .dossier()
        .generic_responses
        .iter()
        .map(TagResponse::combined)
        .collect();
    let expected = [0, 1, 2, 2].map(|index| authored[index].clone());
    assert_eq!(picks, expected);
    assert_eq!(session.state().times_asked_str("moon"), 0);
}

#[test]
fn nervous_suspect_slows_down_after_third_ask() {
    let mut dossier = SuspectDossier::new("C-3", "Jory", "Finch");
    dossier.nervousness_level = 0.9;
    let mut session = session_for(dossier);
    let delays: Vec<f32> = (0..5)
        .map(|_| session.resolve("lighthouse", "location").response_delay_override)
        .collect();
    assert!(delays[..3].iter().all(|delay| *delay < 2.5));
    assert!(delays[3] >= 2.5);
    assert!(delays[4] >= 2.5);
}

#[test]
fn repeated_asks_clamp_to_last_authored_reply() {
    let mut dossier = ledger_suspect();
    dossier.tag_interactions[0].unlocks_truth_for_tag_ids.clear();
    let mut session = session_for(dossier);

    let lines: Vec<String> = (0..6)
        .map(|_| session.resolve("ledger", "item").combined())
        .collect();
    assert_eq!(lines[0], "Never seen it.");
    assert_eq!(lines[1], "I keep no books.");
    assert!(lines[2..].iter().all(|line| line == "Maybe I wrote in it once."));
}

#[test]
fn counters_only_grow_and_lies_become_denials() {
    let mut dossier = ledger_suspect();
    dossier.tag_interactions[0].unlocks_truth_for_tag_ids.clear();
    let mut session = session_for(dossier);
    let ledger = TagId::new("ledger");

    let mut previous = 0;
    for _ in 0..5 {
        let reply = session.resolve("Ledger", "item");
        let asked = session.state().times_asked(&ledger);
        assert_eq!(asked, previous + 1);
        previous = asked;
        if reply.is_lie {
            assert!(session.state().is_denied(&ledger));
        }
    }
    assert!(session.state().is_denied(&ledger));
}

#[test]
fn unlocked_tag_never_lies_and_reveals_once() {
    let mut session = session_for(ledger_suspect());
    let ledger = TagId::new("ledger");

    let first = session.resolve("ledger", "item");
    assert!(first.is_lie);
    assert!(session.state().is_truth_unlocked(&ledger));

    let replies: Vec<_> = (0..6).map(|_| session.resolve("ledger", "item")).collect();
    assert!(replies.iter().all(|reply| !reply.is_lie));
    assert!(session.state().is_truth_unlocked(&ledger));

    let reveals = replies
        .iter()
        .filter(|reply| {
            matches!(
                reply.source,
                ResponseSource::UnlockedInitialDenied | ResponseSource::UnlockedInitialNotDenied
            )
        })
        .count();
    assert_eq!(reveals, 1);
    assert_eq!(replies[0].combined(), "It's mine.");
    assert_eq!(replies[5].combined(), "That's everything.");
}

#[test]
fn reset_twice_matches_reset_once() {
    let mut session = session_for(ledger_suspect());
    for tag in ["ledger", "ledger", "harbor"] {
        session.resolve(tag, "item");
    }

    session.reset();
    let once = session.state().clone();
    session.reset();
    assert_eq!(session.state(), &once);
    assert!(once.is_pristine());
    assert_eq!(once.generic_question_count(), 0);
}

#[test]
fn seeded_variant_draws_are_reproducible() {
    let mut dossier = SuspectDossier::new("C-5", "Nell", "Ashby");
    let mut rumor = TagInteraction::new("rumor");
    rumor.responses = vec![TagResponse::new(["Just talk."])];
    rumor.response_variants = ["coy", "curt", "chatty"]
        .iter()
        .map(|id| ResponseVariantGroup::new(*id, vec![TagResponse::new([*id])]))
        .collect();
    dossier.tag_interactions.push(rumor);

    let draw = |seed: u64| {
        let config = EngineConfig::default().with_seed(seed);
        let mut state = ConversationState::new(0.4);
        let mut rng = StdRng::seed_from_u64(seed);
        (0..12)
            .map(|_| {
                Resolver::new(&dossier, &config, &NoClues, &mut rng)
                    .resolve(&mut state, "rumor", "rumor")
                    .combined()
            })
            .collect::<Vec<_>>()
    };
    let first = draw(99);
    assert_eq!(first, draw(99));
    assert!(first.iter().all(|line| ["coy", "curt", "chatty"].contains(&line.as_str())));
}

#[test]
fn ineligible_groups_fall_back_to_plain_list() {
    let mut dossier = SuspectDossier::new("C-6", "Tam", "Oyelaran");
    let mut dock = TagInteraction::new("dock");
    dock.responses = vec![TagResponse::new(["I work the dock."])];
    let mut late = ResponseVariantGroup::new("late", vec![TagResponse::new(["Again the dock?"])]);
    late.conditions = Some(vec![ResponseCondition::tag_asked("dock", 2)]);
    let mut broken = ResponseVariantGroup::new("broken", vec![TagResponse::new(["??"])]);
    broken.conditions = Some(vec![ResponseCondition::new(ConditionType::Unrecognized, "")]);
    dock.response_variants = vec![late, broken];
    dossier.tag_interactions.push(dock);

    let mut session = session_for(dossier);
    let sources: Vec<ResponseSource> = (0..3)
        .map(|_| session.resolve("dock", "location").source)
        .collect();
    assert_eq!(sources[0], ResponseSource::Progressive);
    assert_eq!(sources[1], ResponseSource::Progressive);
    assert_eq!(
        sources[2],
        ResponseSource::Variant {
            variant_id: "late".to_string()
        }
    );
}

#[test]
fn contradiction_unlocks_truth_once() {
    let mut dossier = ledger_suspect();
    let ledger = &mut dossier.tag_interactions[0];
    ledger.unlocks_truth_for_tag_ids.clear();
    ledger
        .contradicted_by_evidence_tag_ids
        .insert(TagId::new("bank_slip"));
    ledger.contradiction_response = Some(TagResponse::new(["Fine. Those are my figures."]));
    let mut session = session_for(dossier);

    let reply = session
        .present_evidence("bank_slip")
        .expect("evidence should contradict the ledger");
    assert_eq!(reply.combined(), "Fine. Those are my figures.");
    assert!(session.state().is_truth_unlocked(&TagId::new("ledger")));
    assert_eq!(session.state().times_asked_str("ledger"), 0);
    assert!(session.present_evidence("bank_slip").is_none());
    assert_eq!(
        session.events(),
        [
            "contradiction ledger bank_slip",
            "denial ledger",
            "truth.unlock ledger"
        ]
    );

    let followup = session.resolve("ledger", "item");
    assert!(!followup.is_lie);
}

#[test]
fn stress_zones_never_change_selection_without_gating() {
    let mut dossier = ledger_suspect();
    dossier.tag_interactions[0].unlocks_truth_for_tag_ids.clear();
    dossier.shutdown_responses = vec!["Get out.".to_string()];

    for initial in [0.0, 0.3, 0.75, 0.99] {
        dossier.initial_stress = initial;
        let mut session = session_for(dossier.clone());
        let reply = session.resolve("ledger", "item");
        assert_eq!(reply.combined(), "Never seen it.", "initial stress {initial}");
        assert_eq!(reply.source, ResponseSource::Progressive);
    }
}
