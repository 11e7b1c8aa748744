use serde::Serialize;
use std::borrow::Cow;
use tracing::debug;

use crate::history::{HistoryEntry, HistoryLedger};
use crate::manual::{compose_manual_query, ManualField, ManualOverride};
use crate::result::GenerationResult;
use crate::validator::{validate, ValidationIssue};

/// Where the session is in the generation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum GenerationState {
    #[default]
    Idle,
    Pending,
    Success,
    Failed,
}

/// Interactive session state, owned by whoever drives the controller
#[derive(Debug, Default, Serialize)]
pub struct Session {
    objective: String,
    state: GenerationState,
    result: Option<GenerationResult>,
    issues: Vec<ValidationIssue>,
    error: Option<String>,
    manual: ManualOverride,
    history: HistoryLedger,
    #[serde(skip)]
    sequence: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objective(&self) -> &str {
        &self.objective
    }

    pub fn set_objective(&mut self, objective: impl Into<String>) {
        self.objective = objective.into();
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    /// A request is in flight; callers should not start another one
    pub fn is_busy(&self) -> bool {
        self.state == GenerationState::Pending
    }

    pub fn result(&self) -> Option<&GenerationResult> {
        self.result.as_ref()
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn manual(&self) -> &ManualOverride {
        &self.manual
    }

    pub fn history(&self) -> &HistoryLedger {
        &self.history
    }

    /// The AI query when a result is active, else the composed manual query
    pub fn current_query(&self) -> Cow<'_, str> {
        match &self.result {
            Some(result) => Cow::Borrowed(result.query.as_str()),
            None => Cow::Owned(compose_manual_query(&self.manual)),
        }
    }

    /// Sets a manual field. Drops the active AI result and any reported
    /// failure, then re-validates the composed query.
    pub fn set_manual_field(&mut self, field: ManualField, value: impl Into<String>) {
        self.manual.set(field, value);
        self.result = None;
        if matches!(
            self.state,
            GenerationState::Success | GenerationState::Failed
        ) {
            self.state = GenerationState::Idle;
            self.error = None;
        }
        self.issues = validate(&compose_manual_query(&self.manual));
        debug!(field = %field, issues = self.issues.len(), "Manual field updated");
    }

    /// Clears every manual field
    pub fn clear_manual(&mut self) {
        self.manual.clear();
        if self.result.is_none() {
            self.issues.clear();
        }
    }

    /// Restores objective and result from the ledger entry at `index` (0 = newest)
    pub fn recall(&mut self, index: usize) -> bool {
        let Some(entry) = self.history.get(index) else {
            return false;
        };
        let objective = entry.objective().to_string();
        let result = entry.result().clone();

        // Validation is recomputed, never taken from when the entry was recorded
        self.issues = validate(&result.query);
        self.objective = objective;
        self.result = Some(result);
        self.manual.clear();
        self.error = None;
        self.state = GenerationState::Success;
        // A reply still in flight must not overwrite the recalled entry
        self.sequence += 1;
        true
    }

    pub(crate) fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Idle -> Pending; returns the new sequence number
    pub(crate) fn enter_pending(&mut self, clear_result: bool) -> u64 {
        self.sequence += 1;
        self.state = GenerationState::Pending;
        self.error = None;
        if clear_result {
            self.issues.clear();
            self.result = None;
        }
        self.sequence
    }

    pub(crate) fn apply_result(&mut self, objective: String, result: GenerationResult) {
        self.issues = validate(&result.query);
        self.history.record(HistoryEntry::new(objective, result.clone()));
        self.result = Some(result);
        self.manual.clear();
        self.state = GenerationState::Success;
    }

    pub(crate) fn apply_error(&mut self, message: String) {
        self.error = Some(message);
        self.state = GenerationState::Failed;
    }

    /// Leaves Pending after a request that does not produce a result
    pub(crate) fn settle(&mut self) {
        self.state = if self.result.is_some() {
            GenerationState::Success
        } else {
            GenerationState::Idle
        };
    }
}
