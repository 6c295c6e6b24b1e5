//! The evaluation form: linked judge and project fields, five criterion
//! scores and the password-gated submission.

use std::time::{Duration, Instant};

use itertools::Itertools;
use log::{info, warn};
use serde::Serialize;

use crate::remote::{PasswordGate, ScoreSink};
use crate::roster::{Judge, Project, Roster};
use crate::score::{Score, ScoreScale};

/// How long a success or error banner stays up.
pub const STATUS_RESET: Duration = Duration::from_secs(5);

/// The four autocomplete fields of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Email,
    JudgeName,
    Title,
    Team,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Email, Field::JudgeName, Field::Title, Field::Team];

    pub fn label(self) -> &'static str {
        match self {
            Field::Email => "Judge e-mail",
            Field::JudgeName => "Judge name",
            Field::Title => "Project title",
            Field::Team => "Team number",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    Mastery,
    OralPresentation,
    UseOfResources,
    ProposalFulfilment,
    Creativity,
}

impl Criterion {
    pub const ALL: [Criterion; 5] = [
        Criterion::Mastery,
        Criterion::OralPresentation,
        Criterion::UseOfResources,
        Criterion::ProposalFulfilment,
        Criterion::Creativity,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Criterion::Mastery => "Command of the topic",
            Criterion::OralPresentation => "Oral presentation and team integration",
            Criterion::UseOfResources => "Use of resources",
            Criterion::ProposalFulfilment => "Fulfilment of the proposal and team organisation",
            Criterion::Creativity => "Innovation and creativity",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Payload understood by the spreadsheet script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub email: String,
    #[serde(rename = "nomeAvaliador")]
    pub judge_name: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "numeroEquipe")]
    pub team: String,
    #[serde(rename = "dominioTema")]
    pub mastery: String,
    #[serde(rename = "exposicaoOral")]
    pub oral_presentation: String,
    #[serde(rename = "usoRecursos")]
    pub use_of_resources: String,
    #[serde(rename = "cumprimentoProposta")]
    pub proposal_fulfilment: String,
    #[serde(rename = "inovacaoCriatividade")]
    pub creativity: String,
    #[serde(rename = "observacoes")]
    pub remarks: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    Idle,
    Submitting,
    Success(Instant),
    Error(Instant),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Required fields are empty; nothing was sent.
    Incomplete(Vec<&'static str>),
    /// The validation service refused the password.
    WrongPassword,
    /// The password could not be checked.
    ValidationFailed(String),
    /// The password was accepted but the evaluation could not be sent.
    DeliveryFailed(String),
    /// The evaluation went out. Whether it was stored cannot be observed.
    Sent,
}

impl SubmitOutcome {
    fn password_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Sent | SubmitOutcome::DeliveryFailed(_))
    }
}

/// Everything a submission needs once it has left the form, so the network
/// round trips can run off the UI thread.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    password: String,
    password_validated: bool,
    submission: Submission,
}

impl PendingSubmission {
    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    pub fn run(&self, gate: &dyn PasswordGate, sink: &dyn ScoreSink) -> SubmitOutcome {
        if !self.password_validated {
            match gate.validate(&self.password) {
                Ok(true) => info!("password accepted"),
                Ok(false) => return SubmitOutcome::WrongPassword,
                Err(err) => {
                    warn!("password check failed: {err}");
                    return SubmitOutcome::ValidationFailed(err.to_string());
                }
            }
        }

        match sink.submit(&self.submission) {
            Ok(()) => SubmitOutcome::Sent,
            Err(err) => {
                warn!("cannot send evaluation: {err}");
                SubmitOutcome::DeliveryFailed(err.to_string())
            }
        }
    }
}

pub struct EvaluationForm {
    roster: Roster,
    scale: ScoreScale,

    pub email: String,
    pub judge_name: String,
    pub title: String,
    pub team: String,
    scores: [String; 5],
    pub remarks: String,
    pub password: String,
    /// List every project instead of only the selected judge's ones.
    pub show_all_projects: bool,

    project_has_remarks: bool,
    password_validated: bool,
    status: SubmitStatus,
    notice: Option<String>,
}

impl EvaluationForm {
    pub fn new(roster: Roster, scale: ScoreScale) -> Self {
        Self {
            roster,
            scale,
            email: String::new(),
            judge_name: String::new(),
            title: String::new(),
            team: String::new(),
            scores: Default::default(),
            remarks: String::new(),
            password: String::new(),
            show_all_projects: false,
            project_has_remarks: false,
            password_validated: false,
            status: SubmitStatus::Idle,
            notice: None,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn scale(&self) -> &ScoreScale {
        &self.scale
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Email => &self.email,
            Field::JudgeName => &self.judge_name,
            Field::Title => &self.title,
            Field::Team => &self.team,
        }
    }

    /// Applies a value to one of the autocomplete fields and fills in the
    /// field linked to it when the value names a known judge or project.
    pub fn set_field(&mut self, field: Field, value: &str) {
        match field {
            Field::Email => {
                self.email = value.to_string();
                if let Some(judge) = self.roster.judge_by_email(value) {
                    self.judge_name = judge.name.clone();
                }
            }

            Field::JudgeName => {
                self.judge_name = value.to_string();
                if let Some(judge) = self.roster.judge_by_name(value) {
                    self.email = judge.email();
                }
            }

            Field::Title => {
                self.title = value.to_string();
                if let Some(project) = self.roster.project_by_title(value).cloned() {
                    self.select_project(&project);
                }
            }

            Field::Team => {
                self.team = value.to_string();
                if let Some(project) = self.roster.project_by_team(value).cloned() {
                    self.select_project(&project);
                }
            }
        }
    }

    fn select_project(&mut self, project: &Project) {
        self.title = project.title.clone();
        self.team = project.team.clone();
        self.project_has_remarks = project.has_remarks;
    }

    /// Candidates offered by a field's choice list.
    pub fn candidates(&self, field: Field) -> Vec<String> {
        match field {
            Field::Email => self.roster.emails(),
            Field::JudgeName => self.roster.display_names(),
            Field::Title => self
                .visible_projects()
                .into_iter()
                .map(|project| project.title.clone())
                .collect(),
            Field::Team => self.roster.teams(),
        }
    }

    pub fn selected_judge(&self) -> Option<&Judge> {
        self.roster.judge_by_name(&self.judge_name)
    }

    pub fn visible_projects(&self) -> Vec<&Project> {
        let judge = if self.show_all_projects { None } else { self.selected_judge() };
        self.roster.projects_for(judge)
    }

    /// The organisers hold remarks about the selected project's team.
    pub fn project_has_remarks(&self) -> bool {
        self.project_has_remarks
    }

    pub fn score(&self, criterion: Criterion) -> &str {
        &self.scores[criterion.index()]
    }

    /// Applies a raw edit to a score. Returns `false`, leaving the score
    /// untouched, when the text is not a valid score.
    pub fn set_score(&mut self, criterion: Criterion, text: &str) -> bool {
        match self.scale.edit(text) {
            Some(value) => {
                self.scores[criterion.index()] = value;
                true
            }
            None => false,
        }
    }

    pub fn increment(&mut self, criterion: Criterion) {
        if let Some(value) = self.scale.increment(self.score(criterion)) {
            self.scores[criterion.index()] = value;
        }
    }

    pub fn decrement(&mut self, criterion: Criterion) {
        if let Some(value) = self.scale.decrement(self.score(criterion)) {
            self.scores[criterion.index()] = value;
        }
    }

    pub fn set_score_from_slider(&mut self, criterion: Criterion, position: f32) {
        self.scores[criterion.index()] = self.scale.from_slider(position);
    }

    pub fn total(&self) -> Score {
        Score::total(self.scores.iter().map(String::as_str))
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    pub fn password_validated(&self) -> bool {
        self.password_validated
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Labels of the required fields that are still empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let fields = Field::ALL
            .into_iter()
            .filter(|&field| self.value(field).trim().is_empty())
            .map(Field::label);

        let scores = Criterion::ALL
            .into_iter()
            .filter(|&criterion| self.score(criterion).is_empty())
            .map(Criterion::label);

        fields.chain(scores).collect()
    }

    pub fn submission(&self) -> Submission {
        let score = |criterion: Criterion| self.scale.value(self.score(criterion)).to_string();

        Submission {
            email: self.email.trim().to_string(),
            judge_name: self.judge_name.clone(),
            title: capitalize_first(&self.title),
            team: self.team.to_lowercase(),
            mastery: score(Criterion::Mastery),
            oral_presentation: score(Criterion::OralPresentation),
            use_of_resources: score(Criterion::UseOfResources),
            proposal_fulfilment: score(Criterion::ProposalFulfilment),
            creativity: score(Criterion::Creativity),
            remarks: self.remarks.clone(),
        }
    }

    /// Starts a submission. Incomplete forms are refused right away; otherwise
    /// the form switches to [`SubmitStatus::Submitting`] until
    /// [`EvaluationForm::finish_submit`] is called with the outcome.
    pub fn begin_submit(&mut self) -> Option<PendingSubmission> {
        if self.status == SubmitStatus::Submitting {
            return None;
        }

        let missing = self.missing_fields();
        if !missing.is_empty() {
            self.apply(SubmitOutcome::Incomplete(missing), Instant::now());
            return None;
        }

        self.status = SubmitStatus::Submitting;
        Some(PendingSubmission {
            password: self.password.clone(),
            password_validated: self.password_validated,
            submission: self.submission(),
        })
    }

    pub fn finish_submit(&mut self, outcome: SubmitOutcome, now: Instant) {
        self.apply(outcome, now);
    }

    /// Runs a whole submission on the calling thread.
    pub fn submit(&mut self, gate: &dyn PasswordGate, sink: &dyn ScoreSink, now: Instant) -> SubmitOutcome {
        let Some(pending) = self.begin_submit() else {
            return match self.missing_fields() {
                missing if !missing.is_empty() => SubmitOutcome::Incomplete(missing),
                _ => SubmitOutcome::ValidationFailed("a submission is already running".into()),
            };
        };

        let outcome = pending.run(gate, sink);
        self.apply(outcome.clone(), now);
        outcome
    }

    /// Clears a success or error banner once it has been shown long enough.
    pub fn tick(&mut self, now: Instant) {
        if let SubmitStatus::Success(since) | SubmitStatus::Error(since) = self.status {
            if now.saturating_duration_since(since) >= STATUS_RESET {
                self.status = SubmitStatus::Idle;
            }
        }
    }

    fn apply(&mut self, outcome: SubmitOutcome, now: Instant) {
        if outcome.password_accepted() {
            self.password_validated = true;
        }

        let (status, notice) = match outcome {
            SubmitOutcome::Incomplete(missing) => (
                SubmitStatus::Idle,
                Some(format!("Please fill in: {}", missing.iter().join(", "))),
            ),
            SubmitOutcome::WrongPassword => (SubmitStatus::Idle, Some("Incorrect password".to_string())),
            SubmitOutcome::ValidationFailed(_) | SubmitOutcome::DeliveryFailed(_) => (
                SubmitStatus::Error(now),
                Some("Could not send the evaluation. Check your connection and try again.".to_string()),
            ),
            SubmitOutcome::Sent => (SubmitStatus::Success(now), None),
        };

        self.status = status;
        self.notice = notice;
    }
}

/// Upper-cases the first character and lower-cases the rest.
fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}
