use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use dossier_formats::{lint_dossier, Severity, SuspectDossier};
use interrogation::{EngineConfig, Exchange, InterrogationSession, SuspectRoster};

mod cli;
mod script;

use cli::{Command, LintArgs, RunArgs, StepSource};
use script::ScriptStep;

fn main() -> Result<()> {
    env_logger::init();
    match cli::parse()? {
        Command::Lint(args) => run_lint(args),
        Command::Run(args) => run_interrogation(args),
    }
}

fn run_lint(args: LintArgs) -> Result<()> {
    let mut failing = 0;
    for path in &args.dossiers {
        let dossier = SuspectDossier::from_json_file(path)
            .with_context(|| format!("loading dossier {}", path.display()))?;
        let report = lint_dossier(&dossier);
        if report.is_clean() {
            println!("{}: clean", report.citizen_id);
            continue;
        }
        for finding in &report.findings {
            let label = match finding.severity {
                Severity::Error => "ERROR",
                Severity::Warning => "WARN",
            };
            println!(
                "{}: [{label}] {}: {}",
                report.citizen_id, finding.category, finding.message
            );
        }
        if report.has_errors() {
            failing += 1;
        }
    }
    if failing > 0 {
        bail!("{failing} dossier(s) failed lint");
    }
    Ok(())
}

fn run_interrogation(args: RunArgs) -> Result<()> {
    let mut config =
        EngineConfig::from_json_file(args.config.as_deref()).context("loading engine config")?;
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if args.zone_gating {
        config.stress_zone_gating = true;
    }

    let mut roster = SuspectRoster::new(config);
    let mut first = None;
    for path in &args.dossiers {
        let citizen_id = roster
            .load_dossier_file(path)
            .with_context(|| format!("loading dossier {}", path.display()))?;
        first.get_or_insert(citizen_id);
    }
    let suspect = args
        .suspect
        .or(first)
        .context("no dossier was loaded")?;

    let steps = match args.steps {
        StepSource::Asks(steps) => steps,
        StepSource::Script(path) => script::load_script(&path)?,
    };

    begin(&mut roster, &suspect)?;
    for step in &steps {
        apply_step(&mut roster, step, args.verbose)?;
    }

    if args.verbose {
        for snapshot in roster.snapshot() {
            println!("events for {}:", snapshot.citizen_id);
            for event in &snapshot.events {
                println!("  {event}");
            }
        }
    }

    if let Some(path) = args.transcript_json.as_deref() {
        write_transcript(&roster, path)?;
    }
    Ok(())
}

fn begin(roster: &mut SuspectRoster, citizen_id: &str) -> Result<()> {
    let session = roster
        .begin(citizen_id)
        .with_context(|| format!("starting interrogation of {citizen_id}"))?;
    println!(
        "== {} ({}) ==",
        session.full_name(),
        session.citizen_id()
    );
    Ok(())
}

fn apply_step(roster: &mut SuspectRoster, step: &ScriptStep, verbose: bool) -> Result<()> {
    if let ScriptStep::Switch { suspect } = step {
        roster.suspend();
        return begin(roster, suspect);
    }

    let session = roster
        .active_mut()
        .context("no suspect is being interrogated")?;
    match step {
        ScriptStep::Ask {
            tag,
            tag_type,
            display_name,
        } => {
            session.ask(tag, tag_type, display_name.as_deref());
            print_last_exchange(session);
        }
        ScriptStep::PresentEvidence { evidence } => {
            if session.present_evidence(evidence).is_none() {
                log::info!("{evidence} contradicts nothing; asking about it instead");
                session.ask(evidence, "evidence", None);
            }
            print_last_exchange(session);
        }
        ScriptStep::Tone { tone } => {
            session.set_tone(*tone);
            println!("(tone: {tone:?})");
        }
        ScriptStep::Discover { clue } => {
            session.discover_clue(clue.as_str());
        }
        ScriptStep::Reset => {
            session.reset();
            println!("(conversation reset)");
        }
        ScriptStep::Switch { .. } => {}
    }

    if verbose {
        println!(
            "   stress {:.2} ({})",
            session.stress(),
            session.stress_zone().as_str()
        );
    }
    Ok(())
}

fn print_last_exchange(session: &InterrogationSession) {
    let Some(Exchange {
        question,
        evidence,
        response,
    }) = session.transcript().last()
    else {
        return;
    };
    match (question, evidence) {
        (Some(question), _) => println!("> {question}"),
        (None, Some(evidence)) => println!("> [presents {evidence}]"),
        (None, None) => {}
    }
    let marker = if response.is_lie { " [lie]" } else { "" };
    println!("{}: {}{marker}", session.full_name(), response.combined());
    for clue in &response.clickable_clues {
        if clue.location.is_some() {
            println!("   clue: {} ({})", clue.clickable_text, clue.clue_id);
        }
    }
}

fn write_transcript(roster: &SuspectRoster, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&roster.snapshot())
        .context("serializing interrogation snapshot")?;
    fs::write(path, json)
        .with_context(|| format!("writing transcript to {}", path.display()))?;
    println!("transcript written to {}", path.display());
    Ok(())
}
