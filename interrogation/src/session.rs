use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use dossier_formats::{SuspectDossier, TagId};
use rand::rngs::StdRng;
use serde::Serialize;

use crate::conditions::ClueLedger;
use crate::config::EngineConfig;
use crate::engine::{ResolvedResponse, ResponseSource, Resolver};
use crate::error::InterrogationError;
use crate::evidence;
use crate::state::ConversationState;
use crate::stress::{self, InterrogationTone, StressZone};

/// One line of the interrogation transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exchange {
    pub question: Option<String>,
    pub evidence: Option<TagId>,
    pub response: ResolvedResponse,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub citizen_id: String,
    pub full_name: String,
    pub stress_zone: StressZone,
    pub state: ConversationState,
    pub transcript: Vec<Exchange>,
    pub events: Vec<String>,
}

/// A running interrogation of one suspect.
#[derive(Debug)]
pub struct InterrogationSession {
    dossier: Arc<SuspectDossier>,
    config: EngineConfig,
    state: ConversationState,
    rng: StdRng,
    clues: BTreeSet<String>,
    transcript: Vec<Exchange>,
    events: Vec<String>,
}

impl InterrogationSession {
    pub fn new(dossier: Arc<SuspectDossier>, config: EngineConfig) -> Self {
        let rng = config.rng();
        Self::with_rng(dossier, config, rng)
    }

    pub fn with_rng(dossier: Arc<SuspectDossier>, config: EngineConfig, rng: StdRng) -> Self {
        let state = ConversationState::new(stress::initial_stress(&dossier));
        InterrogationSession {
            dossier,
            config,
            state,
            rng,
            clues: BTreeSet::new(),
            transcript: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn citizen_id(&self) -> &str {
        &self.dossier.citizen_id
    }

    pub fn full_name(&self) -> String {
        self.dossier.full_name()
    }

    pub fn has_knowledge_about(&self, tag_id: &str) -> bool {
        self.dossier.has_knowledge_about(tag_id)
    }

    pub fn dossier(&self) -> &SuspectDossier {
        &self.dossier
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn transcript(&self) -> &[Exchange] {
        &self.transcript
    }

    pub fn events(&self) -> &[String] {
        &self.events
    }

    pub fn stress(&self) -> f32 {
        self.state.stress()
    }

    pub fn stress_zone(&self) -> StressZone {
        self.state.zone()
    }

    pub fn tone(&self) -> InterrogationTone {
        self.state.tone()
    }

    pub fn set_tone(&mut self, tone: InterrogationTone) {
        if self.state.tone() != tone {
            self.log_event(format!("tone {tone:?}"));
        }
        self.state.set_tone(tone);
    }

    /// Records a clue in the session's own ledger, used by [`Self::resolve`].
    pub fn discover_clue(&mut self, clue_id: impl Into<String>) -> bool {
        let clue_id = clue_id.into();
        let added = self.clues.insert(clue_id.clone());
        if added {
            self.log_event(format!("clue {clue_id}"));
        }
        added
    }

    pub fn resolve(&mut self, tag_id: &str, tag_type: &str) -> ResolvedResponse {
        let resolved = Resolver::new(&self.dossier, &self.config, &self.clues, &mut self.rng)
            .resolve(&mut self.state, tag_id, tag_type);
        self.note_outcome(&resolved);
        resolved
    }

    /// Resolves against a clue ledger owned by the host instead of the
    /// session's own.
    pub fn resolve_with_clues(
        &mut self,
        tag_id: &str,
        tag_type: &str,
        clues: &dyn ClueLedger,
    ) -> ResolvedResponse {
        let resolved = Resolver::new(&self.dossier, &self.config, clues, &mut self.rng)
            .resolve(&mut self.state, tag_id, tag_type);
        self.note_outcome(&resolved);
        resolved
    }

    pub fn question_for_tag(
        &mut self,
        tag_id: &str,
        tag_type: &str,
        display_name: Option<&str>,
    ) -> String {
        Resolver::new(&self.dossier, &self.config, &self.clues, &mut self.rng)
            .question_for_tag(tag_id, tag_type, display_name)
    }

    /// Question then answer, appended to the transcript.
    pub fn ask(
        &mut self,
        tag_id: &str,
        tag_type: &str,
        display_name: Option<&str>,
    ) -> ResolvedResponse {
        let question = self.question_for_tag(tag_id, tag_type, display_name);
        let response = self.resolve(tag_id, tag_type);
        self.transcript.push(Exchange {
            question: Some(question),
            evidence: None,
            response: response.clone(),
        });
        response
    }

    pub fn present_evidence(&mut self, evidence_tag_id: &str) -> Option<ResolvedResponse> {
        let response = evidence::present_evidence(&self.dossier, &mut self.state, evidence_tag_id)?;
        self.log_event(format!(
            "contradiction {} {evidence_tag_id}",
            response.tag_id
        ));
        self.note_outcome(&response);
        self.transcript.push(Exchange {
            question: None,
            evidence: Some(TagId::new(evidence_tag_id)),
            response: response.clone(),
        });
        Some(response)
    }

    /// Forgets the whole conversation, clues and transcript included.
    pub fn reset(&mut self) {
        self.state.reset(stress::initial_stress(&self.dossier));
        self.clues.clear();
        self.transcript.clear();
        self.events.clear();
        self.log_event("reset");
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            citizen_id: self.dossier.citizen_id.clone(),
            full_name: self.full_name(),
            stress_zone: self.stress_zone(),
            state: self.state.clone(),
            transcript: self.transcript.clone(),
            events: self.events.clone(),
        }
    }

    fn note_outcome(&mut self, resolved: &ResolvedResponse) {
        if resolved.source == ResponseSource::Generic {
            let count = self.state.generic_question_count();
            self.log_event(format!("generic {count}"));
        }
        if resolved.newly_denied {
            self.log_event(format!("denial {}", resolved.tag_id));
        }
        for tag in &resolved.newly_unlocked {
            self.log_event(format!("truth.unlock {tag}"));
        }
    }

    fn log_event(&mut self, event: impl Into<String>) {
        self.events.push(event.into());
    }
}

/// Every suspect of a case, each with an independent session.
#[derive(Debug, Default)]
pub struct SuspectRoster {
    config: EngineConfig,
    dossiers: BTreeMap<String, (u64, Arc<SuspectDossier>)>,
    sessions: BTreeMap<String, InterrogationSession>,
    active: Option<String>,
}

impl SuspectRoster {
    pub fn new(config: EngineConfig) -> Self {
        SuspectRoster {
            config,
            ..SuspectRoster::default()
        }
    }

    pub fn register(&mut self, dossier: SuspectDossier) -> Result<(), InterrogationError> {
        if self.dossiers.contains_key(&dossier.citizen_id) {
            return Err(InterrogationError::DuplicateSuspect(dossier.citizen_id));
        }
        let index = self.dossiers.len() as u64;
        self.dossiers
            .insert(dossier.citizen_id.clone(), (index, Arc::new(dossier)));
        Ok(())
    }

    /// Loads and registers a dossier file, returning its citizen id.
    pub fn load_dossier_file(&mut self, path: &Path) -> Result<String, InterrogationError> {
        let dossier = SuspectDossier::from_json_file(path)?;
        let citizen_id = dossier.citizen_id.clone();
        self.register(dossier)?;
        Ok(citizen_id)
    }

    pub fn citizen_ids(&self) -> impl Iterator<Item = &str> {
        self.dossiers.keys().map(String::as_str)
    }

    /// Starts or resumes the interrogation of `citizen_id` and makes it the
    /// active one.
    pub fn begin(
        &mut self,
        citizen_id: &str,
    ) -> Result<&mut InterrogationSession, InterrogationError> {
        let (index, dossier) = self
            .dossiers
            .get(citizen_id)
            .ok_or_else(|| InterrogationError::UnknownSuspect(citizen_id.to_string()))?;
        let config = &self.config;
        self.active = Some(citizen_id.to_string());
        let session = self
            .sessions
            .entry(citizen_id.to_string())
            .or_insert_with(|| {
                log::info!("begin interrogation of {citizen_id}");
                InterrogationSession::with_rng(
                    Arc::clone(dossier),
                    config.clone(),
                    config.rng_for(*index),
                )
            });
        Ok(session)
    }

    /// Leaves the active interrogation; its state is kept for later.
    pub fn suspend(&mut self) {
        self.active = None;
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_mut(&mut self) -> Option<&mut InterrogationSession> {
        let id = self.active.as_ref()?;
        self.sessions.get_mut(id)
    }

    pub fn session(&self, citizen_id: &str) -> Option<&InterrogationSession> {
        self.sessions.get(citizen_id)
    }

    pub fn session_mut(&mut self, citizen_id: &str) -> Option<&mut InterrogationSession> {
        self.sessions.get_mut(citizen_id)
    }

    pub fn reset(&mut self, citizen_id: &str) -> Result<(), InterrogationError> {
        if !self.dossiers.contains_key(citizen_id) {
            return Err(InterrogationError::UnknownSuspect(citizen_id.to_string()));
        }
        if let Some(session) = self.sessions.get_mut(citizen_id) {
            session.reset();
        }
        Ok(())
    }

    pub fn reset_all(&mut self) {
        for session in self.sessions.values_mut() {
            session.reset();
        }
    }

    pub fn snapshot(&self) -> Vec<SessionSnapshot> {
        self.sessions.values().map(InterrogationSession::snapshot).collect()
    }
}
