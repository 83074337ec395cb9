use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use crate::script::ScriptStep;

#[derive(Parser, Debug)]
#[command(
    about = "Runs scripted interrogations against suspect dossiers",
    version
)]
pub struct Args {
    /// Suspect dossier JSON file (repeat for several suspects)
    #[arg(long = "dossier", value_name = "PATH", required = true)]
    pub dossiers: Vec<PathBuf>,

    /// Citizen id to interrogate first (default: the first dossier)
    #[arg(long)]
    pub suspect: Option<String>,

    /// Optional JSON engine config
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed for variant draws and question templates (overrides the config)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Let stress zones override normal reply selection
    #[arg(long)]
    pub zone_gating: bool,

    /// Ask about a tag, optionally typed as TAG:TYPE (repeatable)
    #[arg(long = "ask", value_name = "TAG[:TYPE]")]
    pub asks: Vec<String>,

    /// JSON list of interrogation steps to run instead of --ask
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Path to write the session snapshots as JSON
    #[arg(long)]
    pub transcript_json: Option<PathBuf>,

    /// Check the dossiers for authoring defects and exit
    #[arg(long)]
    pub lint: bool,

    /// Print stress after every step and the event log at the end
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug)]
pub enum Command {
    Lint(LintArgs),
    Run(RunArgs),
}

#[derive(Debug)]
pub struct LintArgs {
    pub dossiers: Vec<PathBuf>,
}

#[derive(Debug)]
pub enum StepSource {
    Asks(Vec<ScriptStep>),
    Script(PathBuf),
}

#[derive(Debug)]
pub struct RunArgs {
    pub dossiers: Vec<PathBuf>,
    pub suspect: Option<String>,
    pub config: Option<PathBuf>,
    pub seed: Option<u64>,
    pub zone_gating: bool,
    pub steps: StepSource,
    pub transcript_json: Option<PathBuf>,
    pub verbose: bool,
}

pub fn parse() -> Result<Command> {
    let args = Args::parse();
    args.into_command()
}

impl Args {
    fn into_command(self) -> Result<Command> {
        if self.lint {
            if !self.asks.is_empty() || self.script.is_some() {
                bail!("--lint cannot be combined with --ask or --script");
            }
            if self.transcript_json.is_some() {
                bail!("--transcript-json has nothing to record with --lint");
            }
            return Ok(Command::Lint(LintArgs {
                dossiers: self.dossiers,
            }));
        }

        let steps = match (self.script, self.asks.is_empty()) {
            (Some(_), false) => bail!("--script and --ask are mutually exclusive"),
            (Some(path), true) => StepSource::Script(path),
            (None, false) => {
                StepSource::Asks(self.asks.iter().map(|ask| ScriptStep::parse_ask(ask)).collect())
            }
            (None, true) => bail!("nothing to do: pass --ask, --script or --lint"),
        };

        Ok(Command::Run(RunArgs {
            dossiers: self.dossiers,
            suspect: self.suspect,
            config: self.config,
            seed: self.seed,
            zone_gating: self.zone_gating,
            steps,
            transcript_json: self.transcript_json,
            verbose: self.verbose,
        }))
    }
}
